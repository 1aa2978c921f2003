//! Rectangular pixel grids tied to a CRS.
//!
//! A [`GeoBox`] is the location and resolution of a grid of pixels: a
//! width and height, an axis-aligned affine transform mapping pixel
//! indices to CRS coordinates, and the CRS itself. Pixel `(0, 0)` is
//! the *corner* of the top-left pixel, not its center.
//!
//! Geoboxes on the same pixel lattice (same CRS, resolution and
//! alignment, whole-pixel offsets) can be combined conservatively:
//! union and intersection operate in the pixel domain of a reference
//! geobox and fail rather than resample when lattices differ.

use std::ops::{Bound, RangeBounds};

use crate::affine::Affine;
use crate::bbox::{BoundingBox, bbox_intersection, bbox_union};
use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::geometry::{Geometry, polygon_from_transform};

/// Axis labels for one dimension of a geobox: the CRS coordinate of
/// every pixel center, with units and signed resolution. This is the
/// surface consumed by labelled-array integrations.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub values: Vec<f64>,
    pub units: String,
    pub resolution: f64,
}

/// Location and resolution of a rectangular grid of pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBox {
    width: usize,
    height: usize,
    affine: Affine,
    crs: Option<Crs>,
}

impl GeoBox {
    /// Construct from explicit shape and transform.
    ///
    /// # Panics
    ///
    /// The affine transform must be axis-aligned (no shear or
    /// rotation); anything else is a programming error.
    pub fn new(width: usize, height: usize, affine: Affine, crs: Option<Crs>) -> GeoBox {
        assert!(
            affine.is_axis_aligned(),
            "only axis-aligned geoboxes are supported"
        );
        GeoBox {
            width,
            height,
            affine,
            crs,
        }
    }

    /// Grid covering the bounding box of `geopolygon` at the given
    /// `(y, x)` resolution, with pixel edges snapped outward onto the
    /// resolution/alignment lattice.
    ///
    /// When `crs` is given and differs from the geometry's, the
    /// geometry is reprojected first. `align` shifts the lattice and
    /// must lie in `[0, |resolution|)` per axis.
    pub fn from_geopolygon(
        geopolygon: &Geometry,
        resolution: (f64, f64),
        crs: Option<&Crs>,
        align: Option<(f64, f64)>,
    ) -> Result<GeoBox> {
        let align = align.unwrap_or((0.0, 0.0));
        for (a, r) in [(align.0, resolution.0), (align.1, resolution.1)] {
            if !(0.0..r.abs()).contains(&a) {
                return Err(Error::InvalidAlignment {
                    align: a,
                    resolution: r,
                });
            }
        }

        let reprojected;
        let geopolygon = match crs {
            Some(crs) => {
                reprojected = geopolygon.to_crs(crs)?;
                &reprojected
            }
            None => geopolygon,
        };
        let crs = geopolygon.crs().cloned();

        let bounds = geopolygon
            .bounding_box()
            .ok_or(Error::UnsupportedGeometry {
                operation: "from_geopolygon",
                kind: "empty geometry",
            })?;
        let (offx, width) = align_pix(bounds.left, bounds.right, resolution.1, align.1);
        let (offy, height) = align_pix(bounds.bottom, bounds.top, resolution.0, align.0);
        let affine = Affine::translation(offx, offy) * Affine::scale(resolution.1, resolution.0);
        Ok(GeoBox::new(width, height, affine, crs))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape in array axis order: `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Signed pixel size in `(y, x)` order.
    pub fn resolution(&self) -> (f64, f64) {
        (self.affine.e, self.affine.a)
    }

    /// Sub-pixel position of the grid origin on each axis, in
    /// `(y, x)` order; values lie in `[0, |resolution|)`.
    pub fn alignment(&self) -> (f64, f64) {
        (
            self.affine.yoff().rem_euclid(self.affine.e.abs()),
            self.affine.xoff().rem_euclid(self.affine.a.abs()),
        )
    }

    /// Dimension names in array axis order.
    pub fn dimensions(&self) -> (&'static str, &'static str) {
        match &self.crs {
            Some(crs) => crs.dimensions(),
            None => ("y", "x"),
        }
    }

    /// The polygon swept by the grid outline in CRS coordinates.
    pub fn extent(&self) -> Geometry {
        polygon_from_transform(
            self.width as f64,
            self.height as f64,
            &self.affine,
            self.crs.clone(),
        )
    }

    /// Grid extent reprojected to EPSG:4326 (unless already
    /// geographic or CRS-less).
    pub fn geographic_extent(&self) -> Result<Geometry> {
        match &self.crs {
            None => Ok(self.extent()),
            Some(crs) if crs.geographic() => Ok(self.extent()),
            Some(_) => self.extent().to_crs(&Crs::new("EPSG:4326")?),
        }
    }

    /// Center-of-pixel coordinate labels per dimension, in array axis
    /// order (y first).
    pub fn coordinates(&self) -> [(&'static str, Coordinate); 2] {
        let (yres, xres) = self.resolution();
        let (yoff, xoff) = (self.affine.yoff(), self.affine.xoff());

        let ys = (0..self.height)
            .map(|i| i as f64 * yres + (yoff + yres / 2.0))
            .collect();
        let xs = (0..self.width)
            .map(|i| i as f64 * xres + (xoff + xres / 2.0))
            .collect();

        let (yunits, xunits) = match &self.crs {
            Some(crs) => crs.units(),
            None => ("1".to_owned(), "1".to_owned()),
        };
        let (ydim, xdim) = self.dimensions();
        [
            (ydim, Coordinate { values: ys, units: yunits, resolution: yres }),
            (xdim, Coordinate { values: xs, units: xunits, resolution: xres }),
        ]
    }

    /// Sub-window of the grid given row and column ranges.
    ///
    /// Open bounds normalise against the current shape and ranges are
    /// clamped to it; the ranges are unit-step by construction.
    pub fn slice(
        &self,
        rows: impl RangeBounds<usize>,
        cols: impl RangeBounds<usize>,
    ) -> GeoBox {
        let (y0, y1) = normalise_range(rows, self.height);
        let (x0, x1) = normalise_range(cols, self.width);
        let affine = self.affine * Affine::translation(x0 as f64, y0 as f64);
        GeoBox::new(x1 - x0, y1 - y0, affine, self.crs.clone())
    }

    /// Grid grown by `ybuff`/`xbuff` CRS units on each side, rounded
    /// outward to whole pixels.
    pub fn buffered(&self, ybuff: f64, xbuff: f64) -> GeoBox {
        let (yres, xres) = self.resolution();
        let by = round_to_res(ybuff, yres);
        let bx = round_to_res(xbuff, xres);
        let affine = self.affine * Affine::translation(-(bx as f64), -(by as f64));
        GeoBox::new(
            self.width + 2 * bx,
            self.height + 2 * by,
            affine,
            self.crs.clone(),
        )
    }
}

/// Snap `[low, high)` outward onto the `res`/`off` lattice for one
/// axis, returning the aligned origin and pixel count.
///
/// A negative `res` flips the axis: the high edge is snapped instead
/// and the origin is the top. The 0.1-pixel term is a deadband so an
/// edge landing almost exactly on a pixel boundary does not pick up an
/// extra pixel through floating-point jitter.
fn align_pix(low: f64, high: f64, res: f64, off: f64) -> (f64, usize) {
    let (val, width) = if res < 0.0 {
        let res = -res;
        let val = ((high - off) / res).ceil() * res + off;
        (val, ((val - low - 0.1 * res) / res).ceil())
    } else {
        let val = ((low - off) / res).floor() * res + off;
        (val, ((high - val - 0.1 * res) / res).ceil())
    };
    (val, width.max(1.0) as usize)
}

fn round_to_res(value: f64, res: f64) -> usize {
    let res = res.abs();
    ((value - 0.1 * res) / res).ceil().max(0.0) as usize
}

fn normalise_range(bounds: impl RangeBounds<usize>, dim: usize) -> (usize, usize) {
    let start = match bounds.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s + 1,
        Bound::Unbounded => 0,
    };
    let end = match bounds.end_bound() {
        Bound::Included(&e) => e + 1,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => dim,
    };
    let end = end.min(dim);
    (start.min(end), end)
}

fn isclose(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

fn is_almost_int(x: f64, tol: f64) -> bool {
    (x - x.round()).abs() < tol
}

/// Bounding box of `geobox` expressed in `reference`'s pixel
/// coordinates.
///
/// Requires compatible lattices: same CRS, same pixel size and
/// orientation, whole-pixel relative translation. Fails with
/// [`Error::IncompatibleGrids`] otherwise.
pub fn bounding_box_in_pixel_domain(geobox: &GeoBox, reference: &GeoBox) -> Result<BoundingBox> {
    let tol = 1.0e-8;

    if reference.crs != geobox.crs {
        return Err(Error::IncompatibleGrids(
            "cannot combine geoboxes in different CRSs".to_owned(),
        ));
    }

    let inv = reference
        .affine
        .inverse()
        .ok_or_else(|| Error::IncompatibleGrids("reference transform is singular".to_owned()))?;
    let t = inv * geobox.affine;

    if !(isclose(t.a, 1.0)
        && isclose(t.b, 0.0)
        && is_almost_int(t.c, tol)
        && isclose(t.d, 0.0)
        && isclose(t.e, 1.0)
        && is_almost_int(t.f, tol))
    {
        return Err(Error::IncompatibleGrids(
            "pixel grids are not related by a whole-pixel translation".to_owned(),
        ));
    }

    let (tx, ty) = (t.c.round(), t.f.round());
    Ok(BoundingBox::new(
        tx,
        ty,
        tx + geobox.width as f64,
        ty + geobox.height as f64,
    ))
}

/// Geobox covering all of `geoboxes`, which must share a pixel
/// lattice. The first element acts as the reference grid.
pub fn geobox_union_conservative(geoboxes: &[GeoBox]) -> Result<GeoBox> {
    let reference = geoboxes.first().ok_or(Error::EmptyInput)?;

    let boxes = geoboxes
        .iter()
        .map(|geobox| bounding_box_in_pixel_domain(geobox, reference))
        .collect::<Result<Vec<_>>>()?;
    let bounds = bbox_union(boxes);

    let affine = reference.affine * Affine::translation(bounds.left, bounds.bottom);
    Ok(GeoBox::new(
        bounds.span_x() as usize,
        bounds.span_y() as usize,
        affine,
        reference.crs.clone(),
    ))
}

/// Geobox contained in every one of `geoboxes`, which must share a
/// pixel lattice. Disjoint inputs produce an empty geobox in canonical
/// form (the inverted edge collapsed onto its partner).
pub fn geobox_intersection_conservative(geoboxes: &[GeoBox]) -> Result<GeoBox> {
    let reference = geoboxes.first().ok_or(Error::EmptyInput)?;

    let boxes = geoboxes
        .iter()
        .map(|geobox| bounding_box_in_pixel_domain(geobox, reference))
        .collect::<Result<Vec<_>>>()?;
    let mut bounds = bbox_intersection(boxes);

    if bounds.left > bounds.right {
        bounds.right = bounds.left;
    }
    if bounds.bottom > bounds.top {
        bounds.top = bounds.bottom;
    }

    let affine = reference.affine * Affine::translation(bounds.left, bounds.bottom);
    Ok(GeoBox::new(
        bounds.span_x() as usize,
        bounds.span_y() as usize,
        affine,
        reference.crs.clone(),
    ))
}

/// Geobox of an image scaled down by an integer factor `scaler > 1`.
///
/// Shape is padded (ceil-divided), never truncated, when not a
/// multiple of `scaler`. Pixel (0, 0) sits at the corner of the
/// top-left pixel, so scaling composes with the transform without any
/// half-pixel correction.
pub fn scaled_down_geobox(src: &GeoBox, scaler: usize) -> GeoBox {
    assert!(scaler > 1, "scaler must be an integer greater than 1");

    let width = src.width.div_ceil(scaler);
    let height = src.height.div_ceil(scaler);
    let affine = src.affine * Affine::scale(scaler as f64, scaler as f64);
    GeoBox::new(width, height, affine, src.crs.clone())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_grid(width: usize, height: usize, origin: (f64, f64)) -> GeoBox {
        // y-flipped unit grid, origin at the top-left corner
        let affine = Affine::translation(origin.0, origin.1) * Affine::scale(1.0, -1.0);
        GeoBox::new(width, height, affine, None)
    }

    #[test]
    fn align_pix_snaps_outward() {
        assert_eq!(align_pix(0.0, 10.0, 1.0, 0.0), (0.0, 10));
        assert_eq!(align_pix(-0.5, 10.2, 1.0, 0.0), (-1.0, 12));
        // flipped axis snaps the high edge
        assert_eq!(align_pix(0.0, 10.0, -1.0, 0.0), (10.0, 10));
        assert_eq!(align_pix(0.3, 10.0, -1.0, 0.0), (10.0, 10));
        // never less than one pixel
        assert_eq!(align_pix(5.0, 5.0, 1.0, 0.0), (5.0, 1));
        // alignment shifts the lattice
        assert_eq!(align_pix(0.0, 10.0, 1.0, 0.5), (-0.5, 11));
    }

    #[test]
    fn align_pix_deadband_absorbs_jitter() {
        // an edge a hair above a pixel boundary must not add a pixel
        let (off, width) = align_pix(0.0, 10.0 + 1e-9, 1.0, 0.0);
        assert_eq!((off, width), (0.0, 10));
        let (off, width) = align_pix(-1e-9, 10.0, -1.0, 0.0);
        assert_eq!((off, width), (10.0, 10));
    }

    #[test]
    #[should_panic(expected = "axis-aligned")]
    fn sheared_transforms_are_rejected() {
        let sheared = Affine::new(1.0, 0.2, 0.0, 0.0, 1.0, 0.0);
        let _ = GeoBox::new(1, 1, sheared, None);
    }

    #[test]
    fn resolution_and_alignment_follow_the_affine() {
        let gb = unit_grid(10, 5, (100.25, 50.0));
        assert_eq!(gb.shape(), (5, 10));
        assert_eq!(gb.resolution(), (-1.0, 1.0));
        let (ay, ax) = gb.alignment();
        assert_relative_eq!(ay, 0.0);
        assert_relative_eq!(ax, 0.25);
        assert_eq!(gb.dimensions(), ("y", "x"));
        assert!(!gb.is_empty());
        assert!(unit_grid(0, 5, (0.0, 0.0)).is_empty());
    }

    #[test]
    fn extent_traces_the_outline() {
        let gb = unit_grid(10, 5, (0.0, 5.0));
        let bb = gb.extent().bounding_box().unwrap();
        assert_eq!(bb, crate::bbox::BoundingBox::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn coordinates_label_pixel_centers() {
        let gb = unit_grid(4, 2, (0.0, 2.0));
        let [(ydim, y), (xdim, x)] = gb.coordinates();
        assert_eq!((ydim, xdim), ("y", "x"));
        assert_eq!(y.values, vec![1.5, 0.5]);
        assert_eq!(x.values, vec![0.5, 1.5, 2.5, 3.5]);
        assert_eq!(y.resolution, -1.0);
        assert_eq!(x.units, "1");
    }

    #[test]
    fn slice_translates_the_transform() {
        let gb = unit_grid(10, 10, (0.0, 10.0));
        let sub = gb.slice(2..5, 3..9);
        assert_eq!(sub.shape(), (3, 6));
        // pixel (0,0) of the window is pixel (2,3) of the parent
        assert_relative_eq!(sub.affine().xoff(), 3.0);
        assert_relative_eq!(sub.affine().yoff(), 8.0);
        assert_eq!(sub.resolution(), gb.resolution());

        // open and overlong ranges clamp to the shape
        assert_eq!(gb.slice(.., ..), gb);
        assert_eq!(gb.slice(5.., ..50).shape(), (5, 10));
    }

    #[test]
    fn buffered_rounds_to_whole_pixels() {
        let gb = unit_grid(10, 10, (0.0, 10.0));
        let grown = gb.buffered(1.0, 2.0);
        assert_eq!(grown.shape(), (12, 14));
        assert_relative_eq!(grown.affine().xoff(), -2.0);
        assert_relative_eq!(grown.affine().yoff(), 11.0);

        // sub-deadband buffers change nothing
        let same = gb.buffered(0.05, 0.05);
        assert_eq!(same, gb);
    }

    #[test]
    fn scaled_down_pads_odd_shapes() {
        let gb = GeoBox::new(5, 4, Affine::identity(), None);
        let down = scaled_down_geobox(&gb, 2);
        assert_eq!(down.shape(), (2, 3));
        assert_eq!(down.resolution(), (2.0, 2.0));
        // the outline keeps its origin corner
        assert_relative_eq!(down.affine().xoff(), 0.0);
        assert_relative_eq!(down.affine().yoff(), 0.0);
    }

    #[test]
    fn pixel_domain_requires_whole_pixel_offsets() {
        let a = unit_grid(10, 10, (0.0, 10.0));
        let b = unit_grid(10, 10, (10.0, 10.0));
        let bb = bounding_box_in_pixel_domain(&b, &a).unwrap();
        assert_eq!(bb, BoundingBox::new(10.0, 0.0, 20.0, 10.0));

        let shifted = unit_grid(10, 10, (10.5, 10.0));
        assert!(matches!(
            bounding_box_in_pixel_domain(&shifted, &a),
            Err(Error::IncompatibleGrids(_))
        ));

        let coarser = GeoBox::new(
            10,
            10,
            Affine::translation(0.0, 10.0) * Affine::scale(2.0, -2.0),
            None,
        );
        assert!(matches!(
            bounding_box_in_pixel_domain(&coarser, &a),
            Err(Error::IncompatibleGrids(_))
        ));
    }

    #[test]
    fn union_of_a_single_geobox_is_itself() {
        let gb = unit_grid(7, 3, (2.0, 9.0));
        assert_eq!(geobox_union_conservative(std::slice::from_ref(&gb)).unwrap(), gb);
        assert!(matches!(
            geobox_union_conservative(&[]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn adjacent_grids_combine() {
        let a = unit_grid(10, 10, (0.0, 10.0));
        let b = unit_grid(10, 10, (10.0, 10.0));

        let u = geobox_union_conservative(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(u.shape(), (10, 20));
        assert_eq!(u.resolution(), a.resolution());
        assert_relative_eq!(u.affine().xoff(), 0.0);
        assert_relative_eq!(u.affine().yoff(), 10.0);

        let i = geobox_intersection_conservative(&[a, b]).unwrap();
        assert_eq!(i.width(), 0);
        assert!(i.is_empty());
    }

    #[test]
    fn overlapping_grids_intersect() {
        let a = unit_grid(10, 10, (0.0, 10.0));
        let b = unit_grid(10, 10, (4.0, 10.0));
        let i = geobox_intersection_conservative(&[a, b]).unwrap();
        assert_eq!(i.shape(), (10, 6));
        assert_relative_eq!(i.affine().xoff(), 4.0);
    }
}
