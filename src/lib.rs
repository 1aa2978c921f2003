#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
//! `geobox` provides georeferenced geometry and raster-grid primitives
//! on top of [PROJ](https://proj.org) and [`geo`](https://docs.rs/geo):
//! vector shapes and rectangular pixel grids tied to a coordinate
//! reference system, reprojection between CRSs (including across the
//! antimeridian), and a conservative algebra for combining pixel grids
//! that share a lattice.
//!
//! The building blocks:
//!
//! 1. [`Crs`] wraps a projection-engine CRS definition. Parsing is
//!    cached process-wide (or per [`CrsCache`] if you inject your own),
//!    and coordinate transforms between two CRSs are memoized per
//!    thread, so repeated reprojection between the same pair reuses one
//!    engine transform.
//! 2. [`Geometry`] pairs a 2D shape with an optional CRS. Operations
//!    combining two geometries insist on equal CRSs. [`Geometry::to_crs`]
//!    densifies edges before transforming and can split shapes along
//!    the dateline.
//! 3. [`GeoBox`] is a rectangular grid of pixels: width, height, an
//!    axis-aligned [`Affine`] transform and a CRS. Grids sharing a
//!    pixel lattice combine via [`geobox_union_conservative`] and
//!    [`geobox_intersection_conservative`]; incompatible lattices fail
//!    rather than resample.
//!
//! # Requirements
//!
//! Transform construction and CRS parsing are delegated to libproj via
//! the [`proj`] crate. The `pkg_config` and `bundled_proj` features are
//! forwarded to it to control how libproj is located or built.
//!
//! # Example
//!
//! ```
//! use geobox::{Crs, GeoBox, bbox, geobox_union_conservative};
//!
//! let wgs84 = Crs::new("EPSG:4326").unwrap();
//! let footprint = bbox(148.0, -36.0, 150.0, -35.0, Some(wgs84));
//!
//! // quarter-degree pixels, y axis flipped as usual for rasters
//! let grid = GeoBox::from_geopolygon(&footprint, (-0.25, 0.25), None, None).unwrap();
//! assert_eq!(grid.shape(), (4, 8));
//! assert_eq!(grid.resolution(), (-0.25, 0.25));
//!
//! let east = grid.slice(.., 4..8);
//! let whole = geobox_union_conservative(&[grid.clone(), east]).unwrap();
//! assert_eq!(whole, grid);
//! ```

mod affine;
mod bbox;
mod crs;
mod error;
mod geobox;
mod geometry;
mod reproject;
mod transform;

pub use crate::affine::Affine;
pub use crate::bbox::{BoundingBox, bbox_intersection, bbox_union};
pub use crate::crs::{Crs, CrsCache};
pub use crate::error::{Error, Result};
pub use crate::geobox::{
    Coordinate, GeoBox, bounding_box_in_pixel_domain, geobox_intersection_conservative,
    geobox_union_conservative, scaled_down_geobox,
};
pub use crate::geometry::{
    Geometry, bbox, line, multiline, multipoint, multipolygon, point, polygon,
    polygon_from_transform, sides, unary_intersection, unary_union,
};
pub use crate::reproject::crs_units_per_degree;
pub use crate::transform::Transformer;
