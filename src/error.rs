//! Error types shared across the crate.

use thiserror::Error;

use crate::crs::Crs;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by CRS handling, geometry operations and the
/// pixel-grid algebra. All of these are local, synchronous failures:
/// an operation either returns a fully-formed value or one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be resolved to a CRS by the projection engine.
    #[error("cannot interpret {crs:?} as a CRS")]
    InvalidCrs {
        crs: String,
        #[source]
        source: proj::ProjCreateError,
    },

    /// Two geometries with differing CRS values (absent counts as a
    /// distinct value) were combined in an operation requiring equality.
    #[error("CRS mismatch: {lhs:?} vs {rhs:?}")]
    CrsMismatch {
        lhs: Option<Crs>,
        rhs: Option<Crs>,
    },

    /// Reprojection was attempted on a geometry that carries no CRS.
    #[error("cannot reproject a geometry without a CRS")]
    MissingCrs,

    /// Alignment must lie in `[0, |resolution|)` on each axis.
    #[error("alignment {align} is outside [0, {resolution}) for axis resolution")]
    InvalidAlignment { align: f64, resolution: f64 },

    /// Two geoboxes whose pixel lattices are not related by a
    /// whole-pixel, unit-scale translation (or whose CRSs differ)
    /// were combined conservatively.
    #[error("incompatible grids: {0}")]
    IncompatibleGrids(String),

    /// A union or intersection was requested over zero geoboxes.
    #[error("no geoboxes supplied")]
    EmptyInput,

    /// A geometry kind outside what the operation supports.
    #[error("{operation} is not supported for {kind} geometry")]
    UnsupportedGeometry {
        operation: &'static str,
        kind: &'static str,
    },

    /// WKT input could not be parsed into a supported geometry.
    #[error("invalid WKT: {0}")]
    Wkt(String),

    /// GeoJSON input could not be converted into a supported geometry.
    #[error("invalid GeoJSON geometry: {0}")]
    GeoJson(#[from] geojson::Error),
}
