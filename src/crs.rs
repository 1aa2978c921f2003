//! Coordinate Reference System values and the CRS parse cache.
//!
//! [`Crs`] is a cheap immutable handle: parsing a CRS string is
//! expensive in the projection engine, so parsed definitions are shared
//! through a [`CrsCache`]. Two `Crs` values built from the same string
//! through the same cache share one definition.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};

use log::debug;
use proj::Proj;

use crate::error::{Error, Result};

/// Parsed CRS state shared between equal handles.
#[derive(Debug)]
pub(crate) struct CrsRepr {
    canonical: String,
    epsg: Option<i32>,
    def: Option<String>,
    geographic: bool,
}

/// A Coordinate Reference System.
///
/// Wraps a definition resolved by the projection engine from a string:
/// an `EPSG:<code>` identifier, a PROJ string or a WKT document.
///
/// ```
/// use geobox::Crs;
///
/// let wgs84 = Crs::new("EPSG:4326").unwrap();
/// assert_eq!(wgs84.epsg(), Some(4326));
/// assert!(wgs84.geographic());
/// assert_eq!(wgs84, Crs::new("epsg:4326").unwrap());
/// ```
#[derive(Clone)]
pub struct Crs {
    repr: Arc<CrsRepr>,
}

impl Crs {
    /// Parse a CRS through the process-wide cache.
    pub fn new(crs: &str) -> Result<Crs> {
        Crs::parse_with(global_cache(), crs)
    }

    /// Parse an EPSG code through the process-wide cache.
    pub fn from_epsg(code: i32) -> Result<Crs> {
        Crs::new(&format!("EPSG:{code}"))
    }

    /// Parse a CRS through an explicitly supplied cache.
    ///
    /// Useful in tests and in applications that want to own cache
    /// lifetime instead of relying on the process-wide instance.
    pub fn parse_with(cache: &CrsCache, crs: &str) -> Result<Crs> {
        Ok(Crs {
            repr: cache.get_or_parse(crs)?,
        })
    }

    /// The string this CRS was parsed from.
    pub fn canonical(&self) -> &str {
        &self.repr.canonical
    }

    /// EPSG code, when the CRS was addressed by one.
    pub fn epsg(&self) -> Option<i32> {
        self.repr.epsg
    }

    /// Definition string resolved by the projection engine, when the
    /// engine reports one for this CRS.
    pub fn definition(&self) -> Option<&str> {
        self.repr.def.as_deref()
    }

    /// True for geographic (longitude/latitude, degree-unit) CRSs.
    pub fn geographic(&self) -> bool {
        self.repr.geographic
    }

    /// True for projected (planar) CRSs.
    pub fn projected(&self) -> bool {
        !self.repr.geographic
    }

    /// Dimension names in array axis order (y, x).
    pub fn dimensions(&self) -> (&'static str, &'static str) {
        if self.repr.geographic {
            ("latitude", "longitude")
        } else {
            ("y", "x")
        }
    }

    /// Dimension units in array axis order (y, x).
    pub fn units(&self) -> (String, String) {
        if self.repr.geographic {
            return ("degrees_north".to_owned(), "degrees_east".to_owned());
        }
        let unit = self
            .repr
            .def
            .as_deref()
            .and_then(projected_unit)
            .unwrap_or_else(|| "metre".to_owned());
        (unit.clone(), unit)
    }

    /// Stable identity of the shared definition, used to key the
    /// transform cache. Valid for as long as the owning cache lives,
    /// which keeps every definition alive.
    pub(crate) fn token(&self) -> usize {
        Arc::as_ptr(&self.repr) as usize
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Crs) -> bool {
        if Arc::ptr_eq(&self.repr, &other.repr) {
            return true;
        }
        if let (Some(a), Some(b)) = (self.repr.epsg, other.repr.epsg) {
            return a == b;
        }
        match (&self.repr.def, &other.repr.def) {
            (Some(a), Some(b)) => a == b,
            _ => self.repr.canonical == other.repr.canonical,
        }
    }
}

impl Eq for Crs {}

impl Hash for Crs {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr
            .def
            .as_deref()
            .unwrap_or(&self.repr.canonical)
            .hash(state);
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.repr.canonical)
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Crs({:?})", self.repr.canonical)
    }
}

/// Synchronized map from CRS strings to parsed definitions.
///
/// Parsing a given string is idempotent, so entries are kept for the
/// lifetime of the cache and shared between all `Crs` handles built
/// through it.
#[derive(Default)]
pub struct CrsCache {
    map: Mutex<HashMap<String, Arc<CrsRepr>>>,
}

impl CrsCache {
    pub fn new() -> Self {
        CrsCache::default()
    }

    fn get_or_parse(&self, crs: &str) -> Result<Arc<CrsRepr>> {
        let mut map = self.map.lock().expect("CRS cache poisoned");
        if let Some(repr) = map.get(crs) {
            return Ok(Arc::clone(repr));
        }

        debug!("parsing CRS {crs:?}");
        let handle = Proj::new(crs).map_err(|source| Error::InvalidCrs {
            crs: crs.to_owned(),
            source,
        })?;
        let def = handle.def().ok().filter(|d| !d.is_empty());
        let repr = Arc::new(CrsRepr {
            canonical: crs.to_owned(),
            epsg: parse_epsg(crs),
            geographic: detect_geographic(crs, def.as_deref()),
            def,
        });
        map.insert(crs.to_owned(), Arc::clone(&repr));
        Ok(repr)
    }
}

/// The process-wide parse cache backing [`Crs::new`].
pub(crate) fn global_cache() -> &'static CrsCache {
    static CACHE: OnceLock<CrsCache> = OnceLock::new();
    CACHE.get_or_init(CrsCache::new)
}

fn parse_epsg(crs: &str) -> Option<i32> {
    let (authority, code) = crs.trim().split_once(':')?;
    if !authority.eq_ignore_ascii_case("EPSG") {
        return None;
    }
    code.trim().parse().ok()
}

/// Geographic-CRS detection.
///
/// The engine binding reports no axis metadata, so the resolved PROJ
/// definition is inspected first. When the engine returns no definition
/// at all, probe instead: degree coordinates survive a hop to EPSG:4326
/// nearly unchanged only for geographic CRSs.
fn detect_geographic(canonical: &str, def: Option<&str>) -> bool {
    if let Some(def) = def {
        return def.contains("proj=longlat") || def.contains("proj=latlong");
    }
    let Ok(probe) = Proj::new_known_crs(canonical, "EPSG:4326", None) else {
        return false;
    };
    let (lon, lat) = (12.25_f64, 47.11_f64);
    match probe.convert((lon, lat)) {
        Ok((x, y)) => (x - lon).abs() < 0.5 && (y - lat).abs() < 0.5,
        Err(_) => false,
    }
}

fn projected_unit(def: &str) -> Option<String> {
    let token = def
        .split_whitespace()
        .find_map(|t| t.trim_start_matches('+').strip_prefix("units="))?;
    Some(
        match token {
            "m" => "metre",
            "ft" => "foot",
            "us-ft" => "US survey foot",
            other => other,
        }
        .to_owned(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(crs: &Crs) -> u64 {
        let mut h = DefaultHasher::new();
        crs.hash(&mut h);
        h.finish()
    }

    #[test]
    fn parsing_is_cached_and_equal() {
        let a = Crs::new("EPSG:4326").unwrap();
        let b = Crs::new("EPSG:4326").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.token(), b.token());
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn equality_by_epsg_code_ignores_spelling() {
        let a = Crs::new("EPSG:3857").unwrap();
        let b = Crs::new("epsg:3857").unwrap();
        assert_ne!(a.token(), b.token());
        assert_eq!(a, b);
        assert_ne!(a, Crs::new("EPSG:4326").unwrap());
    }

    #[test]
    fn geographic_flag() {
        assert!(Crs::new("EPSG:4326").unwrap().geographic());
        assert!(Crs::new("+proj=longlat +datum=WGS84 +no_defs").unwrap().geographic());
        let merc = Crs::new("EPSG:3857").unwrap();
        assert!(merc.projected());
        assert_eq!(merc.dimensions(), ("y", "x"));
        assert_eq!(
            Crs::new("EPSG:4326").unwrap().dimensions(),
            ("latitude", "longitude")
        );
    }

    #[test]
    fn epsg_recovered_from_identifier_only() {
        assert_eq!(Crs::new("EPSG:32755").unwrap().epsg(), Some(32755));
        assert_eq!(
            Crs::new("+proj=longlat +datum=WGS84 +no_defs").unwrap().epsg(),
            None
        );
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(matches!(
            Crs::new("not a crs at all"),
            Err(Error::InvalidCrs { .. })
        ));
    }

    #[test]
    fn injected_cache_is_independent() {
        let cache = CrsCache::new();
        let a = Crs::parse_with(&cache, "EPSG:4326").unwrap();
        let b = Crs::new("EPSG:4326").unwrap();
        assert_ne!(a.token(), b.token());
        assert_eq!(a, b);
    }
}
