//! Geometry reprojection between CRSs.
//!
//! Reprojection is resolution-aware: the source geometry is densified
//! first so that straight edges survive being curved by the transform,
//! and can optionally be chopped along the antimeridian when the
//! destination is geographic, so shapes straddling longitude ±180° do
//! not come out with edges spanning the whole longitude range.

use geo::{BoundingRect, Intersects, MapCoords};
use geo_types::{
    Coord, Geometry as GeoGeometry, LineString, MultiPolygon, Polygon, coord,
};
use log::debug;

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::geometry::{self, Geometry, densify_coords, intersect_geoms};
use crate::transform::Transformer;

impl Geometry {
    /// Convert to a different CRS with default settings: densification
    /// at 1 degree (geographic source) or 100 000 CRS units, no
    /// antimeridian handling.
    pub fn to_crs(&self, crs: &Crs) -> Result<Geometry> {
        self.to_crs_with(crs, None, false)
    }

    /// Convert to a different CRS.
    ///
    /// `resolution` bounds edge length before transforming (pass
    /// `f64::INFINITY` to disable densification entirely); `None`
    /// selects the default of 1 degree for geographic sources and
    /// 100 000 units otherwise.
    ///
    /// With `wrapdateline` the geometry is split along the
    /// antimeridian before transforming, when the destination CRS is
    /// geographic and the source projection is continuous there. This
    /// only helps for source CRSs that are smooth over the dateline;
    /// for others the geometry is transformed as-is.
    pub fn to_crs_with(
        &self,
        crs: &Crs,
        resolution: Option<f64>,
        wrapdateline: bool,
    ) -> Result<Geometry> {
        if self.crs() == Some(crs) {
            return Ok(self.clone());
        }
        let src = self.crs().ok_or(Error::MissingCrs)?;

        let resolution =
            resolution.unwrap_or(if src.geographic() { 1.0 } else { 100_000.0 });
        let transform = src.transformer_to_crs(crs)?;

        let mut geom = if resolution.is_finite() {
            self.segmented(resolution)?.into_geom()
        } else {
            self.geom().clone()
        };

        if wrapdateline && crs.geographic() {
            let rtransform = crs.transformer_to_crs(src)?;
            geom = chop_along_antimeridian(geom, &transform, &rtransform)?;
        }

        let geom = geom.map_coords(|Coord { x, y }| {
            let (x, y) = transform.apply(x, y);
            coord! { x: x, y: y }
        });
        Ok(Geometry::from_parts(geom, Some(crs.clone())))
    }
}

/// Split `geom` (in source-CRS coordinates) along the antimeridian.
///
/// Two dense lines just left and right of longitude ±180° are mapped
/// back into the source CRS; if the left one crosses the geometry, the
/// geometry is intersected with a two-polygon chopper bounding its left
/// and right portions. Geometry that does not touch the dateline, or a
/// source projection that is not smooth across it, comes back
/// unchanged.
fn chop_along_antimeridian(
    geom: GeoGeometry<f64>,
    transform: &Transformer,
    rtransform: &Transformer,
) -> Result<GeoGeometry<f64>> {
    let Some(bounds) = geom.bounding_rect() else {
        return Ok(geom);
    };
    let (minx, miny) = (bounds.min().x, bounds.min().y);
    let (maxx, maxy) = (bounds.max().x, bounds.max().y);
    let (midx, midy) = ((minx + maxx) / 2.0, (miny + maxy) / 2.0);
    let (_mid_lon, mid_lat) = transform.apply(midx, midy);

    let eps = 1.0e-9;
    if !is_smooth_across_dateline(mid_lat, transform, rtransform, eps) {
        debug!("source projection is not smooth across the antimeridian, not chopping");
        return Ok(geom);
    }

    let dateline_in_src = |lon: f64| -> Vec<Coord<f64>> {
        let span = [coord! { x: lon, y: -90.0 }, coord! { x: lon, y: 90.0 }];
        densify_coords(&span, 1.0)
            .into_iter()
            .map(|c| {
                let (x, y) = rtransform.apply(c.x, c.y);
                coord! { x: x, y: y }
            })
            .collect()
    };

    let left_of_dt = dateline_in_src(180.0 - eps);
    if !LineString::new(left_of_dt.clone()).intersects(&geom) {
        return Ok(geom);
    }
    let right_of_dt = dateline_in_src(-180.0 + eps);

    let mut ring = vec![coord! { x: minx, y: maxy }, coord! { x: minx, y: miny }];
    ring.extend(left_of_dt);
    ring.push(coord! { x: minx, y: maxy });
    let left_poly = Polygon::new(LineString::new(ring), Vec::new());

    let mut ring = vec![coord! { x: maxx, y: maxy }, coord! { x: maxx, y: miny }];
    ring.extend(right_of_dt);
    ring.push(coord! { x: maxx, y: maxy });
    let right_poly = Polygon::new(LineString::new(ring), Vec::new());

    let chopper = MultiPolygon::new(vec![left_poly, right_poly]);
    intersect_geoms(&geom, &GeoGeometry::MultiPolygon(chopper))
}

/// Probe whether the source projection behaves continuously across the
/// dateline at the given latitude.
///
/// The thresholds are empirically tuned values carried over from long
/// use: squared source-space distance of 1.0 between points just either
/// side of ±180°, and squared round-trip error of `2 * eps` when
/// mapping those points back to lon/lat.
fn is_smooth_across_dateline(
    mid_lat: f64,
    transform: &Transformer,
    rtransform: &Transformer,
    eps: f64,
) -> bool {
    fn dist2(x: f64, y: f64) -> f64 {
        x * x + y * y
    }

    let (left_x, left_y) = rtransform.apply(180.0 - eps, mid_lat);
    let (right_x, right_y) = rtransform.apply(-180.0 + eps, mid_lat);

    if dist2(right_x - left_x, right_y - left_y) > 1.0 {
        return false;
    }

    let (left_lon, left_lat) = transform.apply(left_x, left_y);
    let (right_lon, right_lat) = transform.apply(right_x, right_y);
    if dist2(left_lon - 180.0 + eps, left_lat - mid_lat) > 2.0 * eps
        || dist2(right_lon + 180.0 - eps, right_lat - mid_lat) > 2.0 * eps
    {
        return false;
    }

    true
}

/// Number of CRS units per degree for a projected CRS at a lon/lat
/// location: a factor `s` such that `s * degrees` gives CRS units.
pub fn crs_units_per_degree(crs: &Crs, lon: f64, lat: f64) -> Result<f64> {
    let step = 0.1;
    let lon2 = if lon + step > 180.0 { lon - step } else { lon + step };

    let ll = geometry::line(vec![(lon, lat), (lon2, lat)], Some(Crs::new("EPSG:4326")?));
    let xy = ll.to_crs_with(crs, Some(f64::INFINITY), false)?;
    Ok(xy.length() / step)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::bbox;
    use approx::assert_relative_eq;

    fn wgs84() -> Crs {
        Crs::new("EPSG:4326").unwrap()
    }

    fn webmerc() -> Crs {
        Crs::new("EPSG:3857").unwrap()
    }

    #[test]
    fn same_crs_is_an_identity() {
        let g = bbox(0.0, 0.0, 10.0, 10.0, Some(wgs84()));
        let same = g.to_crs(&Crs::new("epsg:4326").unwrap()).unwrap();
        assert_eq!(same, g);
    }

    #[test]
    fn reprojecting_without_a_crs_fails() {
        let g = bbox(0.0, 0.0, 10.0, 10.0, None);
        assert!(matches!(g.to_crs(&wgs84()), Err(Error::MissingCrs)));
    }

    #[test]
    fn known_web_mercator_bounds() {
        let g = bbox(0.0, 0.0, 10.0, 10.0, Some(wgs84()));
        let out = g.to_crs(&webmerc()).unwrap();
        assert_eq!(out.crs(), Some(&webmerc()));

        let bb = out.bounding_box().unwrap();
        assert_relative_eq!(bb.left, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bb.bottom, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bb.right, 1113194.9079327357, max_relative = 1e-6);
        assert_relative_eq!(bb.top, 1118889.9748579901, max_relative = 1e-6);
    }

    #[test]
    fn default_resolution_densifies_edges() {
        let g = bbox(0.0, 0.0, 10.0, 10.0, Some(wgs84()));
        let out = g.to_crs(&webmerc()).unwrap();
        // 1-degree default step turns each 10-degree edge into 10 segments
        assert_eq!(out.coords().len(), 41);

        let sparse = g.to_crs_with(&webmerc(), Some(f64::INFINITY), false).unwrap();
        assert_eq!(sparse.coords().len(), 5);
    }

    #[test]
    fn round_trip_preserves_bounds() {
        let g = bbox(114.0, -42.0, 153.0, -9.0, Some(wgs84()));
        let back = g.to_crs(&webmerc()).unwrap().to_crs(&wgs84()).unwrap();
        let bb = back.bounding_box().unwrap();
        assert_relative_eq!(bb.left, 114.0, epsilon = 1e-3);
        assert_relative_eq!(bb.bottom, -42.0, epsilon = 1e-3);
        assert_relative_eq!(bb.right, 153.0, epsilon = 1e-3);
        assert_relative_eq!(bb.top, -9.0, epsilon = 1e-3);
    }

    #[test]
    fn units_per_degree_at_the_equator() {
        let s = crs_units_per_degree(&webmerc(), 0.0, 0.0).unwrap();
        assert_relative_eq!(s, 111319.49079327357, max_relative = 1e-6);
        // near the dateline the probe steps backwards instead
        let s = crs_units_per_degree(&webmerc(), 179.95, 0.0).unwrap();
        assert_relative_eq!(s, 111319.49079327357, max_relative = 1e-6);
    }

    #[test]
    fn dateline_chopping_splits_straddling_polygons() {
        let albers = Crs::new("EPSG:3577").unwrap();
        let src = bbox(175.0, -40.0, 185.0, -30.0, Some(wgs84()))
            .to_crs(&albers)
            .unwrap();

        // without chopping the inverse transform folds longitudes back
        // into [-180, 180] and the result spans nearly the whole range
        let naive = src.to_crs(&wgs84()).unwrap();
        assert!(naive.bounding_box().unwrap().span_x() > 300.0);

        let wrapped = src.to_crs_with(&wgs84(), None, true).unwrap();
        let parts = wrapped.parts();
        assert!(parts.len() >= 2, "expected a split geometry, got {parts:?}");
        for part in &parts {
            let bb = part.bounding_box().unwrap();
            assert!(
                bb.span_x() < 30.0,
                "part spans {} degrees of longitude",
                bb.span_x()
            );
        }
    }

    #[test]
    fn web_mercator_is_not_smooth_across_the_dateline() {
        // ±180° map to opposite ends of the x axis, so chopping is
        // skipped and the geometry passes through unchanged
        let merc_box = bbox(19_000_000.0, -4_000_000.0, 20_100_000.0, -3_000_000.0,
                            Some(webmerc()));
        let out = merc_box.to_crs_with(&wgs84(), None, true).unwrap();
        assert_eq!(out.parts().len(), 1);
    }
}
