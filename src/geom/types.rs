//! Core geometric value types.
//!
//! All coordinates are double-precision planar projected values (metres).
//! Geometry values are transient: the decoder creates them for one feature
//! row, the clip/simplify stages consume them, and the SVG layer renders
//! them. Nothing here carries identity or persists across rows.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 2D point with an elevation component.
///
/// Clipping and region tests only ever look at x/y; z rides along and is
/// averaged on synthesized intersection points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointZ {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PointZ {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        PointZ { x, y, z }
    }

    /// True when two points coincide in the plane, ignoring elevation.
    pub fn same_xy(&self, other: &PointZ) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Componentwise closeness check with an absolute tolerance.
    pub fn is_close(&self, other: &PointZ, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// An ordered, open point sequence (first point is generally not the last).
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    pub points: Vec<PointZ>,
}

/// A closed boundary: by convention the first point equals the last, or the
/// sequence is treated as implicitly closed by the clipper.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    pub points: Vec<PointZ>,
}

/// A polygon as an ordered ring list: exterior boundary first, holes after.
///
/// The pipeline processes each ring independently; combining exterior and
/// holes is left to the renderer's fill rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<LinearRing>,
}

/// The closed set of geometry variants the decoder can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    PointZ(PointZ),
    LineString(LineString),
    Polygon(Polygon),
}

/// An axis-aligned clip rectangle in the same coordinate space as the
/// geometries. Invariant: `north >= south` and `east >= west`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn new(north: f64, east: f64, south: f64, west: f64) -> Self {
        debug_assert!(north >= south, "bounding box north < south");
        debug_assert!(east >= west, "bounding box east < west");
        BoundingBox {
            north,
            east,
            south,
            west,
        }
    }

    /// Rectangle of the given extent centred on (north, east).
    pub fn from_center(north: f64, east: f64, height: f64, width: f64) -> Self {
        BoundingBox::new(
            north + height / 2.0,
            east + width / 2.0,
            north - height / 2.0,
            east - width / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}
