//! Cohen-Sutherland region classification.
//!
//! A point is classified against the clip rectangle with a 4-bit mask over
//! {LEFT, RIGHT, BOTTOM, TOP}; `INSIDE` is the empty mask. The bit tests use
//! strict comparisons, so a point exactly on the rectangle boundary carries
//! the `INSIDE` code - the clipper depends on that to converge once it has
//! moved an endpoint onto an edge. [`is_inside`] is the stricter predicate
//! that also excludes the boundary itself; the two agree everywhere except
//! exactly on the boundary.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::types::{BoundingBox, PointZ};

/// 4-bit outside-region mask relative to a clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutCode(u8);

impl OutCode {
    pub const INSIDE: OutCode = OutCode(0);
    pub const LEFT: OutCode = OutCode(0b0001);
    pub const RIGHT: OutCode = OutCode(0b0010);
    pub const BOTTOM: OutCode = OutCode(0b0100);
    pub const TOP: OutCode = OutCode(0b1000);

    pub fn is_inside(self) -> bool {
        self == OutCode::INSIDE
    }

    pub fn contains(self, side: OutCode) -> bool {
        self.0 & side.0 != 0
    }
}

impl BitAnd for OutCode {
    type Output = OutCode;

    fn bitand(self, rhs: OutCode) -> OutCode {
        OutCode(self.0 & rhs.0)
    }
}

impl BitOr for OutCode {
    type Output = OutCode;

    fn bitor(self, rhs: OutCode) -> OutCode {
        OutCode(self.0 | rhs.0)
    }
}

impl BitOrAssign for OutCode {
    fn bitor_assign(&mut self, rhs: OutCode) {
        self.0 |= rhs.0;
    }
}

/// Computes the outside-region code of a point relative to the rectangle.
///
/// The LEFT/RIGHT and BOTTOM/TOP pairs are mutually exclusive: a point is
/// never both left and right of the same rectangle.
pub fn outcode(p: &PointZ, bb: &BoundingBox) -> OutCode {
    let mut code = OutCode::INSIDE;
    if p.x < bb.west {
        code |= OutCode::LEFT;
    } else if p.x > bb.east {
        code |= OutCode::RIGHT;
    }
    if p.y < bb.south {
        code |= OutCode::BOTTOM;
    } else if p.y > bb.north {
        code |= OutCode::TOP;
    }
    code
}

/// Strict containment: points exactly on the rectangle boundary are outside.
pub fn is_inside(p: &PointZ, bb: &BoundingBox) -> bool {
    bb.west < p.x && p.x < bb.east && bb.south < p.y && p.y < bb.north
}
