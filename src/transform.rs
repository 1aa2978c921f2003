//! Coordinate-transform construction and caching.
//!
//! Building a transform between two CRSs is an expensive projection-
//! engine setup, so transforms are memoized keyed by the identity of
//! the two parsed CRS definitions. Projection-engine handles are not
//! `Send`, so the memo lives in thread-local storage: each thread pays
//! the construction cost at most once per CRS pair. The CRS parse
//! cache keeps definitions (and therefore identity tokens) alive.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use proj::Proj;

use crate::crs::Crs;
use crate::error::{Error, Result};

/// A coordinate-transform function between two CRSs.
///
/// Maps `(x, y)` points of the source CRS into the destination CRS,
/// always in x/y (longitude/latitude) axis order on both sides.
///
/// A point the engine cannot convert comes back as `(NaN, NaN)`: a NaN
/// on either output axis forces the other axis to NaN as well, so
/// downstream consumers (segmentation, bounds) see each point as either
/// fully valid or fully invalid.
#[derive(Clone)]
pub struct Transformer {
    proj: Rc<Proj>,
}

impl Transformer {
    /// Transform a single point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        match self.proj.convert((x, y)) {
            Ok((x, y)) if x.is_nan() || y.is_nan() => (f64::NAN, f64::NAN),
            Ok(out) => out,
            Err(_) => (f64::NAN, f64::NAN),
        }
    }
}

thread_local! {
    static TRANSFORMS: RefCell<HashMap<(usize, usize), Rc<Proj>>> =
        RefCell::new(HashMap::new());
}

impl Crs {
    /// A transform function mapping coordinates of `self` into `other`.
    ///
    /// Repeated calls for the same pair of parsed CRS values reuse one
    /// underlying engine transform per thread.
    pub fn transformer_to_crs(&self, other: &Crs) -> Result<Transformer> {
        let key = (self.token(), other.token());
        if let Some(proj) = TRANSFORMS.with(|cache| cache.borrow().get(&key).cloned()) {
            return Ok(Transformer { proj });
        }

        debug!("building coordinate transform {self} -> {other}");
        let proj = Proj::new_known_crs(self.canonical(), other.canonical(), None).map_err(
            |source| Error::InvalidCrs {
                crs: format!("{self} -> {other}"),
                source,
            },
        )?;
        let proj = Rc::new(proj);
        TRANSFORMS.with(|cache| cache.borrow_mut().insert(key, Rc::clone(&proj)));
        Ok(Transformer { proj })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn known_conversion() {
        let wgs84 = Crs::new("EPSG:4326").unwrap();
        let merc = Crs::new("EPSG:3857").unwrap();
        let tr = wgs84.transformer_to_crs(&merc).unwrap();

        let (x, y) = tr.apply(0.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);

        let (x, _) = tr.apply(180.0, 0.0);
        assert_relative_eq!(x, 20037508.342789244, max_relative = 1e-6);
    }

    #[test]
    fn transforms_are_memoized_per_pair() {
        let wgs84 = Crs::new("EPSG:4326").unwrap();
        let merc = Crs::new("EPSG:3857").unwrap();
        let a = wgs84.transformer_to_crs(&merc).unwrap();
        let b = wgs84.transformer_to_crs(&merc).unwrap();
        assert!(Rc::ptr_eq(&a.proj, &b.proj));

        // opposite direction is a distinct transform
        let rev = merc.transformer_to_crs(&wgs84).unwrap();
        assert!(!Rc::ptr_eq(&a.proj, &rev.proj));
    }

    #[test]
    fn failed_points_are_nan_on_both_axes() {
        let wgs84 = Crs::new("EPSG:4326").unwrap();
        let merc = Crs::new("EPSG:3857").unwrap();
        let tr = wgs84.transformer_to_crs(&merc).unwrap();

        let (x, y) = tr.apply(0.0, 95.0);
        assert!(x.is_nan());
        assert!(y.is_nan());
    }
}
