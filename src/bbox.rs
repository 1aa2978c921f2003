//! Axis-aligned bounding boxes in cartesian coordinates.

use crate::affine::Affine;

/// Bounding box, defining an extent in cartesian coordinates.
///
/// `left <= right` and `bottom <= top` is the expected arrangement, but
/// the constructor does not enforce it: the grid algebra uses inverted
/// boxes (`left > right`) to represent an empty intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        BoundingBox {
            left,
            bottom,
            right,
            top,
        }
    }

    /// BoundingBox from x and y ranges, in either order per axis.
    pub fn from_xy(x: (f64, f64), y: (f64, f64)) -> Self {
        let (x1, x2) = if x.0 <= x.1 { (x.0, x.1) } else { (x.1, x.0) };
        let (y1, y2) = if y.0 <= y.1 { (y.0, y.1) } else { (y.1, y.0) };
        BoundingBox::new(x1, y1, x2, y2)
    }

    /// BoundingBox spanned by two corner points.
    pub fn from_points(p1: (f64, f64), p2: (f64, f64)) -> Self {
        BoundingBox::from_xy((p1.0, p2.0), (p1.1, p2.1))
    }

    pub fn span_x(&self) -> f64 {
        self.right - self.left
    }

    pub fn span_y(&self) -> f64 {
        self.top - self.bottom
    }

    /// A new box expanded symmetrically in the y and x dimensions.
    pub fn buffered(&self, ybuff: f64, xbuff: f64) -> Self {
        BoundingBox::new(
            self.left - xbuff,
            self.bottom - ybuff,
            self.right + xbuff,
            self.top + ybuff,
        )
    }

    /// The four corners of the box.
    pub fn points(&self) -> [(f64, f64); 4] {
        [
            (self.left, self.bottom),
            (self.left, self.top),
            (self.right, self.bottom),
            (self.right, self.top),
        ]
    }

    /// Map all four corners through a linear transform and take the
    /// bounding box of the result. Only meaningful for the axis-aligned
    /// transforms used elsewhere in this crate; a rotated transform
    /// yields the box of the rotated corners, not a rotated box.
    pub fn transform(&self, transform: &Affine) -> Self {
        let mut pts = self.points().into_iter().map(|(x, y)| transform.apply(x, y));
        let (x0, y0) = pts.next().expect("four corners");
        let (mut left, mut bottom, mut right, mut top) = (x0, y0, x0, y0);
        for (x, y) in pts {
            left = left.min(x);
            bottom = bottom.min(y);
            right = right.max(x);
            top = top.max(y);
        }
        BoundingBox::new(left, bottom, right, top)
    }
}

/// Enclosing bounding box of a sequence of boxes.
///
/// The empty sequence yields the fold's neutral element: a fully
/// inverted box with `+inf` lows and `-inf` highs.
pub fn bbox_union(boxes: impl IntoIterator<Item = BoundingBox>) -> BoundingBox {
    let mut out = BoundingBox::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for bb in boxes {
        out.left = out.left.min(bb.left);
        out.bottom = out.bottom.min(bb.bottom);
        out.right = out.right.max(bb.right);
        out.top = out.top.max(bb.top);
    }
    out
}

/// Overlap bounding box of a sequence of boxes.
///
/// Disjoint inputs produce an inverted box (`left > right` and/or
/// `bottom > top`) rather than an error.
pub fn bbox_intersection(boxes: impl IntoIterator<Item = BoundingBox>) -> BoundingBox {
    let mut out = BoundingBox::new(
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::INFINITY,
    );
    for bb in boxes {
        out.left = out.left.max(bb.left);
        out.bottom = out.bottom.max(bb.bottom);
        out.right = out.right.min(bb.right);
        out.top = out.top.min(bb.top);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_xy_sorts_each_axis() {
        let bb = BoundingBox::from_xy((10.0, -2.0), (5.0, 1.0));
        assert_eq!(bb, BoundingBox::new(-2.0, 1.0, 10.0, 5.0));
        assert_eq!(
            BoundingBox::from_points((0.0, 1.0), (2.0, 3.0)),
            BoundingBox::new(0.0, 1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn buffered_expands_symmetrically() {
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 4.0).buffered(1.0, 2.0);
        assert_eq!(bb, BoundingBox::new(-2.0, -1.0, 12.0, 5.0));
        assert_relative_eq!(bb.span_x(), 14.0);
        assert_relative_eq!(bb.span_y(), 6.0);
    }

    #[test]
    fn transform_rederives_axis_aligned_box() {
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 5.0);
        // y-flipping grid transform
        let tr = Affine::translation(100.0, 50.0) * Affine::scale(2.0, -2.0);
        assert_eq!(bb.transform(&tr), BoundingBox::new(100.0, 40.0, 120.0, 50.0));
    }

    #[test]
    fn union_is_commutative_and_idempotent() {
        let a = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let b = BoundingBox::new(1.0, -1.0, 3.0, 1.0);
        assert_eq!(bbox_union([a, b]), bbox_union([b, a]));
        assert_eq!(bbox_union([a, b]), BoundingBox::new(0.0, -1.0, 3.0, 2.0));
        assert_eq!(bbox_union([a, a]), a);
    }

    #[test]
    fn intersection_of_disjoint_boxes_is_inverted() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(2.0, 2.0, 3.0, 3.0);
        let out = bbox_intersection([a, b]);
        assert!(out.left > out.right);
        assert!(out.bottom > out.top);
        assert_eq!(bbox_intersection([a, b]), bbox_intersection([b, a]));
    }

    #[test]
    fn empty_folds_yield_neutral_elements() {
        let u = bbox_union([]);
        assert_eq!(bbox_union([u, BoundingBox::new(0.0, 0.0, 1.0, 1.0)]),
                   BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let i = bbox_intersection([]);
        assert_eq!(bbox_intersection([i, BoundingBox::new(0.0, 0.0, 1.0, 1.0)]),
                   BoundingBox::new(0.0, 0.0, 1.0, 1.0));
    }
}
