//! 2D geometry values carrying an optional CRS.
//!
//! [`Geometry`] pairs a shape from the geometry engine with the CRS its
//! coordinates are expressed in. Every operation returns a new value;
//! operations combining two geometries require their CRS values to be
//! equal (an absent CRS counts as its own distinct value) and fail with
//! [`Error::CrsMismatch`] otherwise.
//!
//! Coordinates are strictly 2D. Three-dimensional input is truncated to
//! its first two components at the format boundary (GeoJSON), since the
//! engine's coordinate type is 2D by construction.

use geo::{
    Area, BooleanOps, BoundingRect, Centroid, ConvexHull, CoordsIter, HasDimensions, Intersects,
    MapCoords, Relate,
};
use geo_types::{
    Coord, Geometry as GeoGeometry, GeometryCollection, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, coord,
};
use wkt::ToWkt;

use crate::affine::Affine;
use crate::bbox::BoundingBox;
use crate::crs::Crs;
use crate::error::{Error, Result};

/// A 2D geometry with an optional CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    geom: GeoGeometry<f64>,
    crs: Option<Crs>,
}

impl Geometry {
    /// Wrap an engine shape, tagging it with `crs`.
    ///
    /// The engine's auxiliary variants (`Line`, `Rect`, `Triangle`) are
    /// normalised into the six supported kinds, so downstream
    /// processing deals with exactly: Point, MultiPoint, LineString,
    /// MultiLineString, Polygon, MultiPolygon and collections thereof.
    pub fn new(geom: impl Into<GeoGeometry<f64>>, crs: Option<Crs>) -> Geometry {
        Geometry {
            geom: normalize(geom.into()),
            crs,
        }
    }

    /// Build from a GeoJSON geometry. Extra (Z) coordinates in the
    /// input positions are dropped.
    pub fn from_geojson(geom: geojson::Geometry, crs: Option<Crs>) -> Result<Geometry> {
        let geom = GeoGeometry::<f64>::try_from(geom)?;
        Ok(Geometry::new(geom, crs))
    }

    /// GeoJSON representation of the shape (the CRS is not encoded).
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.geom))
    }

    /// Parse a WKT string.
    pub fn from_wkt(wkt: &str, crs: Option<Crs>) -> Result<Geometry> {
        let parsed: wkt::Wkt<f64> = wkt.parse().map_err(|e| Error::Wkt(format!("{e}")))?;
        let geom = GeoGeometry::<f64>::try_from(parsed).map_err(|e| Error::Wkt(format!("{e}")))?;
        Ok(Geometry::new(geom, crs))
    }

    /// WKT representation of the shape.
    pub fn to_wkt(&self) -> String {
        self.geom.wkt_string()
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Borrow the underlying engine shape.
    pub fn geom(&self) -> &GeoGeometry<f64> {
        &self.geom
    }

    pub fn into_geom(self) -> GeoGeometry<f64> {
        self.geom
    }

    pub(crate) fn from_parts(geom: GeoGeometry<f64>, crs: Option<Crs>) -> Geometry {
        Geometry { geom, crs }
    }

    /// Shape kind name (`"Polygon"`, `"LineString"`, ...).
    pub fn kind(&self) -> &'static str {
        kind_name(&self.geom)
    }

    /// Explicit emptiness predicate: true when the shape contains no
    /// coordinates.
    pub fn is_empty(&self) -> bool {
        self.geom.is_empty()
    }

    /// Axis-aligned bounds, `None` for an empty shape.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let rect = self.geom.bounding_rect()?;
        Some(BoundingBox::new(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
        ))
    }

    /// Bounding rectangle as a polygon in the same CRS.
    pub fn envelope(&self) -> Option<Geometry> {
        let bb = self.bounding_box()?;
        Some(bbox(bb.left, bb.bottom, bb.right, bb.top, self.crs.clone()))
    }

    pub fn centroid(&self) -> Option<Geometry> {
        let c = self.geom.centroid()?;
        Some(Geometry::from_parts(GeoGeometry::Point(c), self.crs.clone()))
    }

    /// Convex hull of all coordinates, in the same CRS.
    pub fn convex_hull(&self) -> Geometry {
        let points: MultiPoint<f64> =
            MultiPoint::new(self.geom.coords_iter().map(Point::from).collect());
        Geometry::from_parts(GeoGeometry::Polygon(points.convex_hull()), self.crs.clone())
    }

    pub fn area(&self) -> f64 {
        self.geom.unsigned_area()
    }

    /// Total length of all line work (perimeter for polygonal shapes,
    /// 0 for points).
    pub fn length(&self) -> f64 {
        geom_length(&self.geom)
    }

    /// All coordinates in traversal order.
    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.geom.coords_iter().map(|c| (c.x, c.y)).collect()
    }

    /// Members of a multi-geometry or collection, each carrying this
    /// geometry's CRS; a simple shape yields itself.
    pub fn parts(&self) -> Vec<Geometry> {
        let wrap = |geom| Geometry::from_parts(geom, self.crs.clone());
        match &self.geom {
            GeoGeometry::MultiPoint(mp) => {
                mp.iter().map(|p| wrap(GeoGeometry::Point(*p))).collect()
            }
            GeoGeometry::MultiLineString(mls) => mls
                .iter()
                .map(|ls| wrap(GeoGeometry::LineString(ls.clone())))
                .collect(),
            GeoGeometry::MultiPolygon(mp) => mp
                .iter()
                .map(|p| wrap(GeoGeometry::Polygon(p.clone())))
                .collect(),
            GeoGeometry::GeometryCollection(gc) => gc.iter().map(|g| wrap(g.clone())).collect(),
            other => vec![wrap(other.clone())],
        }
    }

    /// Exterior ring of a polygon.
    pub fn exterior(&self) -> Option<Geometry> {
        match &self.geom {
            GeoGeometry::Polygon(p) => Some(Geometry::from_parts(
                GeoGeometry::LineString(p.exterior().clone()),
                self.crs.clone(),
            )),
            _ => None,
        }
    }

    /// Interior rings of a polygon.
    pub fn interiors(&self) -> Vec<Geometry> {
        match &self.geom {
            GeoGeometry::Polygon(p) => p
                .interiors()
                .iter()
                .map(|ls| {
                    Geometry::from_parts(GeoGeometry::LineString(ls.clone()), self.crs.clone())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The point at `distance` along a line, clamped to its end.
    pub fn interpolate(&self, distance: f64) -> Result<Geometry> {
        let GeoGeometry::LineString(ls) = &self.geom else {
            return Err(Error::UnsupportedGeometry {
                operation: "interpolate",
                kind: self.kind(),
            });
        };
        let coords = &ls.0;
        let Some(&first) = coords.first() else {
            return Err(Error::UnsupportedGeometry {
                operation: "interpolate",
                kind: "empty LineString",
            });
        };
        let mut walked = 0.0;
        let mut at = first;
        for pair in coords.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            let seg = (p2.x - p1.x).hypot(p2.y - p1.y);
            if walked + seg >= distance && seg > 0.0 {
                let t = ((distance - walked) / seg).clamp(0.0, 1.0);
                at = coord! { x: p1.x + (p2.x - p1.x) * t, y: p1.y + (p2.y - p1.y) * t };
                return Ok(Geometry::from_parts(
                    GeoGeometry::Point(Point::from(at)),
                    self.crs.clone(),
                ));
            }
            walked += seg;
            at = p2;
        }
        Ok(Geometry::from_parts(
            GeoGeometry::Point(Point::from(at)),
            self.crs.clone(),
        ))
    }

    /// Apply `f` to every coordinate, preserving shape structure and
    /// CRS tag.
    pub fn transformed<F>(&self, f: F) -> Geometry
    where
        F: Fn(f64, f64) -> (f64, f64) + Copy,
    {
        let geom = self.geom.map_coords(|Coord { x, y }| {
            let (x, y) = f(x, y);
            coord! { x: x, y: y }
        });
        Geometry::from_parts(geom, self.crs.clone())
    }

    /// Add points so that no edge of the geometry is longer than
    /// `resolution`. Needed before reprojecting: straight edges in one
    /// CRS curve in another unless subdivided first. An infinite
    /// resolution is a no-op.
    pub fn segmented(&self, resolution: f64) -> Result<Geometry> {
        Ok(Geometry::from_parts(
            segmentize(&self.geom, resolution)?,
            self.crs.clone(),
        ))
    }

    fn check_crs(&self, other: &Geometry) -> Result<()> {
        if self.crs == other.crs {
            Ok(())
        } else {
            Err(Error::CrsMismatch {
                lhs: self.crs.clone(),
                rhs: other.crs.clone(),
            })
        }
    }

    pub fn intersects(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.intersects(&other.geom))
    }

    pub fn contains(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_contains())
    }

    pub fn within(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_within())
    }

    pub fn crosses(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_crosses())
    }

    pub fn disjoint(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_disjoint())
    }

    pub fn touches(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_touches())
    }

    pub fn overlaps(&self, other: &Geometry) -> Result<bool> {
        self.check_crs(other)?;
        Ok(self.geom.relate(&other.geom).is_overlaps())
    }

    /// Union of two polygonal geometries.
    pub fn union(&self, other: &Geometry) -> Result<Geometry> {
        self.check_crs(other)?;
        let out = to_multi_polygon(&self.geom, "union")?
            .union(&to_multi_polygon(&other.geom, "union")?);
        Ok(Geometry::from_parts(
            GeoGeometry::MultiPolygon(out),
            self.crs.clone(),
        ))
    }

    /// Intersection of this geometry with another. At least one operand
    /// must be polygonal; point and line operands are clipped against
    /// the polygonal one.
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry> {
        self.check_crs(other)?;
        let geom = intersect_geoms(&self.geom, &other.geom)?;
        Ok(Geometry::from_parts(geom, self.crs.clone()))
    }

    /// Part of this polygonal geometry not covered by `other`.
    pub fn difference(&self, other: &Geometry) -> Result<Geometry> {
        self.check_crs(other)?;
        let out = to_multi_polygon(&self.geom, "difference")?
            .difference(&to_multi_polygon(&other.geom, "difference")?);
        Ok(Geometry::from_parts(
            GeoGeometry::MultiPolygon(out),
            self.crs.clone(),
        ))
    }

    /// Parts of either polygonal geometry not covered by the other.
    pub fn symmetric_difference(&self, other: &Geometry) -> Result<Geometry> {
        self.check_crs(other)?;
        let out = to_multi_polygon(&self.geom, "symmetric_difference")?
            .xor(&to_multi_polygon(&other.geom, "symmetric_difference")?);
        Ok(Geometry::from_parts(
            GeoGeometry::MultiPolygon(out),
            self.crs.clone(),
        ))
    }
}

/// Union of multiple polygonal geometries.
///
/// Returns `Ok(None)` for an empty input; all inputs must agree on CRS.
pub fn unary_union<'a>(
    geoms: impl IntoIterator<Item = &'a Geometry>,
) -> Result<Option<Geometry>> {
    let mut iter = geoms.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    let crs = first.crs.clone();
    let mut acc = to_multi_polygon(&first.geom, "unary_union")?;
    for g in iter {
        if g.crs != crs {
            return Err(Error::CrsMismatch {
                lhs: crs,
                rhs: g.crs.clone(),
            });
        }
        acc = acc.union(&to_multi_polygon(&g.geom, "unary_union")?);
    }
    Ok(Some(Geometry::from_parts(
        GeoGeometry::MultiPolygon(acc),
        crs,
    )))
}

/// Intersection of multiple geometries, folded left to right.
pub fn unary_intersection<'a>(
    geoms: impl IntoIterator<Item = &'a Geometry>,
) -> Result<Option<Geometry>> {
    let mut iter = geoms.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    let mut acc = first.clone();
    for g in iter {
        acc = acc.intersection(g)?;
    }
    Ok(Some(acc))
}

/// Create a 2D Point.
pub fn point(x: f64, y: f64, crs: Option<Crs>) -> Geometry {
    Geometry::from_parts(GeoGeometry::Point(Point::new(x, y)), crs)
}

/// Create a 2D MultiPoint.
pub fn multipoint(coords: Vec<(f64, f64)>, crs: Option<Crs>) -> Geometry {
    let points = coords.into_iter().map(Point::from).collect();
    Geometry::from_parts(GeoGeometry::MultiPoint(MultiPoint::new(points)), crs)
}

/// Create a 2D LineString (connected set of lines).
pub fn line(coords: Vec<(f64, f64)>, crs: Option<Crs>) -> Geometry {
    Geometry::from_parts(GeoGeometry::LineString(LineString::from(coords)), crs)
}

/// Create a 2D MultiLineString (multiple disconnected sets of lines).
pub fn multiline(coords: Vec<Vec<(f64, f64)>>, crs: Option<Crs>) -> Geometry {
    let lines = coords.into_iter().map(LineString::from).collect();
    Geometry::from_parts(
        GeoGeometry::MultiLineString(MultiLineString::new(lines)),
        crs,
    )
}

/// Create a 2D Polygon from an exterior ring and zero or more holes.
pub fn polygon(
    exterior: Vec<(f64, f64)>,
    interiors: Vec<Vec<(f64, f64)>>,
    crs: Option<Crs>,
) -> Geometry {
    let poly = Polygon::new(
        LineString::from(exterior),
        interiors.into_iter().map(LineString::from).collect(),
    );
    Geometry::from_parts(GeoGeometry::Polygon(poly), crs)
}

/// Create a 2D MultiPolygon.
pub fn multipolygon(coords: Vec<Vec<Vec<(f64, f64)>>>, crs: Option<Crs>) -> Geometry {
    let polys = coords
        .into_iter()
        .map(|rings| {
            let mut rings = rings.into_iter().map(LineString::from);
            let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
            Polygon::new(exterior, rings.collect())
        })
        .collect();
    Geometry::from_parts(GeoGeometry::MultiPolygon(MultiPolygon::new(polys)), crs)
}

/// Create a rectangular 2D Polygon from its edges.
pub fn bbox(left: f64, bottom: f64, right: f64, top: f64, crs: Option<Crs>) -> Geometry {
    polygon(
        vec![
            (left, bottom),
            (left, top),
            (right, top),
            (right, bottom),
            (left, bottom),
        ],
        Vec::new(),
        crs,
    )
}

/// The polygon swept by mapping the pixel-space rectangle
/// `[0, width] x [0, height]` through an affine transform.
pub fn polygon_from_transform(
    width: f64,
    height: f64,
    transform: &Affine,
    crs: Option<Crs>,
) -> Geometry {
    let corners = [
        (0.0, 0.0),
        (0.0, height),
        (width, height),
        (width, 0.0),
        (0.0, 0.0),
    ];
    polygon(
        corners.iter().map(|&(x, y)| transform.apply(x, y)).collect(),
        Vec::new(),
        crs,
    )
}

/// One line geometry per side of the polygon's exterior ring.
pub fn sides(poly: &Geometry) -> Vec<Geometry> {
    let Some(exterior) = poly.exterior() else {
        return Vec::new();
    };
    let pts = exterior.coords();
    pts.windows(2)
        .map(|pair| line(vec![pair[0], pair[1]], poly.crs.clone()))
        .collect()
}

/// Insert interpolated points so consecutive coordinates are at most
/// `resolution` apart. Inserted points sit at multiples of `resolution`
/// along each over-long segment; original points are always kept.
pub(crate) fn densify_coords(coords: &[Coord<f64>], resolution: f64) -> Vec<Coord<f64>> {
    if !resolution.is_finite() || coords.is_empty() {
        return coords.to_vec();
    }
    let mut out = vec![coords[0]];
    for pair in coords.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let length = (p2.x - p1.x).hypot(p2.y - p1.y);
        if length > resolution {
            let mut d = resolution;
            while d < length {
                let t = d / length;
                out.push(coord! {
                    x: p1.x + (p2.x - p1.x) * t,
                    y: p1.y + (p2.y - p1.y) * t,
                });
                d += resolution;
            }
        }
        out.push(p2);
    }
    out
}

fn densify_line(ls: &LineString<f64>, resolution: f64) -> LineString<f64> {
    LineString::new(densify_coords(&ls.0, resolution))
}

fn densify_polygon(poly: &Polygon<f64>, resolution: f64) -> Polygon<f64> {
    Polygon::new(
        densify_line(poly.exterior(), resolution),
        poly.interiors()
            .iter()
            .map(|ring| densify_line(ring, resolution))
            .collect(),
    )
}

pub(crate) fn segmentize(geom: &GeoGeometry<f64>, resolution: f64) -> Result<GeoGeometry<f64>> {
    match geom {
        GeoGeometry::Point(_) | GeoGeometry::MultiPoint(_) => Ok(geom.clone()),
        GeoGeometry::LineString(ls) => {
            Ok(GeoGeometry::LineString(densify_line(ls, resolution)))
        }
        GeoGeometry::MultiLineString(mls) => Ok(GeoGeometry::MultiLineString(
            MultiLineString::new(mls.iter().map(|ls| densify_line(ls, resolution)).collect()),
        )),
        GeoGeometry::Polygon(poly) => {
            Ok(GeoGeometry::Polygon(densify_polygon(poly, resolution)))
        }
        GeoGeometry::MultiPolygon(mp) => Ok(GeoGeometry::MultiPolygon(MultiPolygon::new(
            mp.iter().map(|p| densify_polygon(p, resolution)).collect(),
        ))),
        GeoGeometry::GeometryCollection(gc) => {
            let members = gc
                .iter()
                .map(|g| segmentize(g, resolution))
                .collect::<Result<Vec<_>>>()?;
            Ok(GeoGeometry::GeometryCollection(GeometryCollection(members)))
        }
        GeoGeometry::Line(_) | GeoGeometry::Rect(_) | GeoGeometry::Triangle(_) => {
            Err(Error::UnsupportedGeometry {
                operation: "segmentation",
                kind: kind_name(geom),
            })
        }
    }
}

fn normalize(geom: GeoGeometry<f64>) -> GeoGeometry<f64> {
    match geom {
        GeoGeometry::Line(l) => GeoGeometry::LineString(LineString::from(l)),
        GeoGeometry::Rect(r) => GeoGeometry::Polygon(r.to_polygon()),
        GeoGeometry::Triangle(t) => GeoGeometry::Polygon(t.to_polygon()),
        GeoGeometry::GeometryCollection(gc) => GeoGeometry::GeometryCollection(
            GeometryCollection(gc.0.into_iter().map(normalize).collect()),
        ),
        other => other,
    }
}

pub(crate) fn kind_name(geom: &GeoGeometry<f64>) -> &'static str {
    match geom {
        GeoGeometry::Point(_) => "Point",
        GeoGeometry::MultiPoint(_) => "MultiPoint",
        GeoGeometry::LineString(_) => "LineString",
        GeoGeometry::MultiLineString(_) => "MultiLineString",
        GeoGeometry::Polygon(_) => "Polygon",
        GeoGeometry::MultiPolygon(_) => "MultiPolygon",
        GeoGeometry::GeometryCollection(_) => "GeometryCollection",
        GeoGeometry::Line(_) => "Line",
        GeoGeometry::Rect(_) => "Rect",
        GeoGeometry::Triangle(_) => "Triangle",
    }
}

fn ring_length(ls: &LineString<f64>) -> f64 {
    ls.0.windows(2)
        .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
        .sum()
}

fn geom_length(geom: &GeoGeometry<f64>) -> f64 {
    match geom {
        GeoGeometry::Point(_) | GeoGeometry::MultiPoint(_) => 0.0,
        GeoGeometry::LineString(ls) => ring_length(ls),
        GeoGeometry::MultiLineString(mls) => mls.iter().map(ring_length).sum(),
        GeoGeometry::Polygon(p) => {
            ring_length(p.exterior()) + p.interiors().iter().map(ring_length).sum::<f64>()
        }
        GeoGeometry::MultiPolygon(mp) => mp
            .iter()
            .map(|p| {
                ring_length(p.exterior()) + p.interiors().iter().map(ring_length).sum::<f64>()
            })
            .sum(),
        GeoGeometry::GeometryCollection(gc) => gc.iter().map(geom_length).sum(),
        GeoGeometry::Line(l) => (l.end.x - l.start.x).hypot(l.end.y - l.start.y),
        GeoGeometry::Rect(r) => 2.0 * (r.width() + r.height()),
        GeoGeometry::Triangle(t) => {
            let p = t.to_polygon();
            ring_length(p.exterior())
        }
    }
}

/// View a polygonal shape as a MultiPolygon; other kinds are outside
/// the engine's boolean algebra.
pub(crate) fn to_multi_polygon(
    geom: &GeoGeometry<f64>,
    operation: &'static str,
) -> Result<MultiPolygon<f64>> {
    match geom {
        GeoGeometry::Polygon(p) => Ok(MultiPolygon::new(vec![p.clone()])),
        GeoGeometry::MultiPolygon(mp) => Ok(mp.clone()),
        other => Err(Error::UnsupportedGeometry {
            operation,
            kind: kind_name(other),
        }),
    }
}

pub(crate) fn intersect_geoms(
    a: &GeoGeometry<f64>,
    b: &GeoGeometry<f64>,
) -> Result<GeoGeometry<f64>> {
    if let Ok(bp) = to_multi_polygon(b, "intersection") {
        return intersect_with_polygonal(a, &bp);
    }
    if let Ok(ap) = to_multi_polygon(a, "intersection") {
        return intersect_with_polygonal(b, &ap);
    }
    Err(Error::UnsupportedGeometry {
        operation: "intersection",
        kind: kind_name(a),
    })
}

/// Intersection of an arbitrary shape with a polygonal clip region.
fn intersect_with_polygonal(
    geom: &GeoGeometry<f64>,
    clip: &MultiPolygon<f64>,
) -> Result<GeoGeometry<f64>> {
    match geom {
        GeoGeometry::Polygon(p) => {
            Ok(GeoGeometry::MultiPolygon(MultiPolygon::new(vec![p.clone()]).intersection(clip)))
        }
        GeoGeometry::MultiPolygon(mp) => Ok(GeoGeometry::MultiPolygon(mp.intersection(clip))),
        GeoGeometry::LineString(ls) => Ok(GeoGeometry::MultiLineString(
            clip.clip(&MultiLineString::new(vec![ls.clone()]), false),
        )),
        GeoGeometry::MultiLineString(mls) => {
            Ok(GeoGeometry::MultiLineString(clip.clip(mls, false)))
        }
        GeoGeometry::Point(p) => {
            let kept = if p.intersects(clip) {
                vec![*p]
            } else {
                Vec::new()
            };
            Ok(GeoGeometry::MultiPoint(MultiPoint::new(kept)))
        }
        GeoGeometry::MultiPoint(mp) => Ok(GeoGeometry::MultiPoint(MultiPoint::new(
            mp.iter().filter(|p| p.intersects(clip)).copied().collect(),
        ))),
        GeoGeometry::GeometryCollection(gc) => {
            let members = gc
                .iter()
                .map(|g| intersect_with_polygonal(g, clip))
                .collect::<Result<Vec<_>>>()?;
            Ok(GeoGeometry::GeometryCollection(GeometryCollection(
                members.into_iter().filter(|g| !g.is_empty()).collect(),
            )))
        }
        GeoGeometry::Line(_) | GeoGeometry::Rect(_) | GeoGeometry::Triangle(_) => {
            Err(Error::UnsupportedGeometry {
                operation: "intersection",
                kind: kind_name(geom),
            })
        }
    }
}
