//! Polygon and polyline clipping against an axis-aligned rectangle.
//!
//! Two complementary algorithms cover the two input shapes:
//!
//! - [`sutherland_hodgman`] clips closed rings against the four half-planes
//!   of the rectangle. Open polylines can also be routed through it by
//!   temporarily closing them; the synthetic closing point is removed again
//!   after clipping.
//! - [`cohen_sutherland`] clips genuinely open polylines one segment at a
//!   time, producing zero or more disjoint fragments when the line leaves
//!   and re-enters the rectangle.
//!
//! [`clip_poly`] dispatches on the closure convention: a sequence whose
//! first and last point coincide in the plane is treated as a ring.

use tracing::trace;

use super::outcode::{outcode, OutCode};
use super::types::{BoundingBox, PointZ};
use crate::error::{Error, Result};

/// Per-segment iteration cap for the Cohen-Sutherland loop. Exceeding it
/// signals a geometric or numerical anomaly and is reported as an error
/// rather than silently tolerated.
pub const MAX_CLIP_ITERATIONS: usize = 10_000;

/// Intersection of the infinite lines through segment (c, d) and clip edge
/// (a, b), or `None` when the lines are exactly parallel (zero determinant).
///
/// The elevation of the intersection is the mean of the segment endpoints'
/// z; the clip edge has no elevation of its own.
pub fn intersection_point(c: &PointZ, d: &PointZ, a: &PointZ, b: &PointZ) -> Option<PointZ> {
    let denominator = (a.x - b.x) * (c.y - d.y) - (a.y - b.y) * (c.x - d.x);
    if denominator == 0.0 {
        return None;
    }

    let ab_cross = a.x * b.y - a.y * b.x;
    let cd_cross = c.x * d.y - c.y * d.x;
    let x_nom = ab_cross * (c.x - d.x) - (a.x - b.x) * cd_cross;
    let y_nom = ab_cross * (c.y - d.y) - (a.y - b.y) * cd_cross;

    Some(PointZ::new(
        x_nom / denominator,
        y_nom / denominator,
        (c.z + d.z) / 2.0,
    ))
}

/// The four rectangle edges, in the fixed order the polygon clipper applies
/// them.
#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Half-plane test against this single edge (not the combined outcode).
    fn is_inside(self, p: &PointZ, bb: &BoundingBox) -> bool {
        match self {
            Edge::Top => p.y < bb.north,
            Edge::Right => p.x < bb.east,
            Edge::Bottom => p.y > bb.south,
            Edge::Left => p.x > bb.west,
        }
    }

    /// Endpoints of the clip line along this edge.
    fn line(self, bb: &BoundingBox) -> (PointZ, PointZ) {
        let nw = PointZ::new(bb.west, bb.north, 0.0);
        let ne = PointZ::new(bb.east, bb.north, 0.0);
        let sw = PointZ::new(bb.west, bb.south, 0.0);
        let se = PointZ::new(bb.east, bb.south, 0.0);
        match self {
            Edge::Top => (nw, ne),
            Edge::Right => (ne, se),
            Edge::Bottom => (sw, se),
            Edge::Left => (nw, sw),
        }
    }
}

/// Sutherland-Hodgman clipping of a point sequence against the rectangle.
///
/// Closed rings (first point equals last in the plane) are clipped as-is.
/// An open polyline is closed by appending its first point to a copy of the
/// input - the caller's sequence is never mutated - and re-opened after the
/// four passes by dropping whichever endpoint turns out to be synthetic: the
/// last when the result closes on itself, the first otherwise.
///
/// Returns the empty sequence when the input lies entirely outside.
pub fn sutherland_hodgman(points: &[PointZ], bb: &BoundingBox) -> Vec<PointZ> {
    if points.is_empty() {
        return Vec::new();
    }

    let is_polyline = !points[0].same_xy(points.last().unwrap());

    let mut current = points.to_vec();
    if is_polyline {
        current.push(current[0]);
    }

    for edge in Edge::ALL {
        let (a, b) = edge.line(bb);
        let len = current.len();
        let mut clipped = Vec::with_capacity(len);

        for idx in 0..len {
            let point = current[idx];
            let previous = current[(idx + len - 1) % len];
            let inside = edge.is_inside(&point, bb);
            let previous_inside = edge.is_inside(&previous, bb);

            if inside {
                if !previous_inside {
                    if let Some(xp) = intersection_point(&previous, &point, &a, &b) {
                        clipped.push(xp);
                    }
                }
                clipped.push(point);
            } else if previous_inside {
                if let Some(xp) = intersection_point(&previous, &point, &a, &b) {
                    clipped.push(xp);
                }
            }
        }

        trace!(edge = ?edge, points = clipped.len(), "polygon clip pass");
        current = clipped;
        if current.is_empty() {
            return current;
        }
    }

    if is_polyline {
        if current[0].same_xy(current.last().unwrap()) {
            current.pop();
        } else {
            current.remove(0);
        }
    }

    current
}

/// Moves the endpoint carrying `code` onto the rectangle boundary along the
/// segment (a, b). The caller guarantees the segment actually crosses the
/// side named by `code`, so the divisor cannot be zero.
fn clip_to_boundary(a: &PointZ, b: &PointZ, code: OutCode, bb: &BoundingBox) -> PointZ {
    let z = (a.z + b.z) / 2.0;
    if code.contains(OutCode::TOP) {
        PointZ::new(
            a.x + (b.x - a.x) * (bb.north - a.y) / (b.y - a.y),
            bb.north,
            z,
        )
    } else if code.contains(OutCode::BOTTOM) {
        PointZ::new(
            a.x + (b.x - a.x) * (bb.south - a.y) / (b.y - a.y),
            bb.south,
            z,
        )
    } else if code.contains(OutCode::RIGHT) {
        PointZ::new(
            bb.east,
            a.y + (b.y - a.y) * (bb.east - a.x) / (b.x - a.x),
            z,
        )
    } else {
        PointZ::new(
            bb.west,
            a.y + (b.y - a.y) * (bb.west - a.x) / (b.x - a.x),
            z,
        )
    }
}

/// Cohen-Sutherland clipping of an open polyline against the rectangle.
///
/// The line is processed segment by segment. Segments fully inside are
/// accepted; segments sharing an outside side are rejected; everything else
/// is iteratively shortened onto the boundary. Accepted points accumulate
/// into a run, and a run ends whenever the line exits the rectangle, so the
/// output is a list of disjoint fragments (possibly empty).
///
/// Each segment's loop is bounded by [`MAX_CLIP_ITERATIONS`]; exceeding the
/// cap returns [`Error::ClipNonConvergence`].
pub fn cohen_sutherland(points: &[PointZ], bb: &BoundingBox) -> Result<Vec<Vec<PointZ>>> {
    let mut fragments: Vec<Vec<PointZ>> = Vec::new();
    let mut run: Vec<PointZ> = Vec::new();

    for window in points.windows(2) {
        let (mut a, mut b) = (window[0], window[1]);
        let mut code_a = outcode(&a, bb);
        let mut code_b = outcode(&b, bb);
        // The original classification of the segment end decides whether the
        // run terminates after this segment.
        let entry_code_b = code_b;

        let mut accepted = false;
        let mut iterations = 0;
        loop {
            if code_a.is_inside() && code_b.is_inside() {
                accepted = true;
                break;
            }
            if !(code_a & code_b).is_inside() {
                // Both endpoints share an outside side: no overlap possible.
                break;
            }

            iterations += 1;
            if iterations > MAX_CLIP_ITERATIONS {
                return Err(Error::ClipNonConvergence(MAX_CLIP_ITERATIONS));
            }

            if !code_a.is_inside() {
                a = clip_to_boundary(&a, &b, code_a, bb);
                code_a = outcode(&a, bb);
            } else {
                b = clip_to_boundary(&a, &b, code_b, bb);
                code_b = outcode(&b, bb);
            }
        }

        if accepted {
            run.push(a);
            if !entry_code_b.is_inside() {
                // The end of this segment was clipped in, so the line leaves
                // the rectangle here: close out the current fragment.
                run.push(b);
                fragments.push(std::mem::take(&mut run));
            }
        } else if !run.is_empty() {
            fragments.push(std::mem::take(&mut run));
        }
    }

    // A pending run means the final segment was accepted with an unclipped
    // end point, which has not been emitted yet.
    if !run.is_empty() {
        if let Some(last) = points.last() {
            run.push(*last);
        }
        fragments.push(run);
    }

    trace!(fragments = fragments.len(), "polyline clip");
    Ok(fragments)
}

/// Clips an arbitrary point sequence, dispatching on the closure convention:
/// sequences whose first and last point coincide in the plane go through the
/// polygon clipper (at most one output), open sequences through the polyline
/// clipper (any number of fragments).
pub fn clip_poly(points: &[PointZ], bb: &BoundingBox) -> Result<Vec<Vec<PointZ>>> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if first.same_xy(last) => {
            let ring = sutherland_hodgman(points, bb);
            if ring.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![ring])
            }
        }
        (Some(_), Some(_)) => cohen_sutherland(points, bb),
        _ => Ok(Vec::new()),
    }
}
