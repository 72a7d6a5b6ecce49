//! Per-feature processing pipeline: decode, clip, simplify.
//!
//! [`process_blob`] is the single entry point the render loop calls for each
//! database row. It turns one GeoPackage blob into zero or more drawable
//! geometries, each wholly inside the requested region. A feature that lies
//! entirely outside the region produces an empty vector, not an error;
//! errors are reserved for malformed blobs and clipper non-convergence.

use tracing::trace;

use super::clip::{clip_poly, sutherland_hodgman};
use super::outcode::{is_inside, outcode};
use super::simplify::ramer_douglas_peucker;
use super::types::{BoundingBox, Geometry, LineString, LinearRing, Polygon, PointZ};
use crate::error::Result;
use crate::gpkg::decode_gpkg_blob;

/// Decodes `blob` and optionally clips the result to `region` and simplifies
/// line work with the given tolerance (metres).
///
/// With no region every decoded geometry passes through unchanged apart from
/// simplification. With a region:
///
/// - points are kept only when strictly inside;
/// - line strings may split into several fragments, each returned as its own
///   geometry;
/// - polygons are clipped ring by ring, dropping rings (and ultimately the
///   polygon) that fall entirely outside.
pub fn process_blob(
    blob: &[u8],
    region: Option<&BoundingBox>,
    simplify: Option<f64>,
) -> Result<Vec<Geometry>> {
    let geometry = decode_gpkg_blob(blob)?;

    let Some(bb) = region else {
        return Ok(match geometry {
            Geometry::LineString(line) => vec![Geometry::LineString(LineString {
                points: maybe_simplify(line.points, simplify),
            })],
            Geometry::Polygon(polygon) => {
                vec![Geometry::Polygon(Polygon {
                    rings: polygon
                        .rings
                        .into_iter()
                        .map(|ring| LinearRing {
                            points: maybe_simplify(ring.points, simplify),
                        })
                        .collect(),
                })]
            }
            other => vec![other],
        });
    };

    let out = match geometry {
        Geometry::Point(p) => {
            let pz = PointZ::new(p.x, p.y, 0.0);
            if is_inside(&pz, bb) {
                vec![Geometry::Point(p)]
            } else {
                Vec::new()
            }
        }
        Geometry::PointZ(p) => {
            if is_inside(&p, bb) {
                vec![Geometry::PointZ(p)]
            } else {
                Vec::new()
            }
        }
        Geometry::LineString(line) => {
            if trivially_outside(&line.points, bb) {
                trace!("line string trivially outside the region");
                return Ok(Vec::new());
            }
            clip_poly(&line.points, bb)?
                .into_iter()
                .filter(|fragment| !fragment.is_empty())
                .map(|fragment| {
                    Geometry::LineString(LineString {
                        points: maybe_simplify(fragment, simplify),
                    })
                })
                .collect()
        }
        Geometry::Polygon(polygon) => {
            let mut rings = Vec::with_capacity(polygon.rings.len());
            for ring in polygon.rings {
                if trivially_outside(&ring.points, bb) {
                    continue;
                }
                let clipped = sutherland_hodgman(&ring.points, bb);
                if !clipped.is_empty() {
                    rings.push(LinearRing {
                        points: maybe_simplify(clipped, simplify),
                    });
                }
            }
            if rings.is_empty() {
                Vec::new()
            } else {
                vec![Geometry::Polygon(Polygon { rings })]
            }
        }
    };

    Ok(out)
}

/// Trivial rejection: every point shares at least one outside half-plane, so
/// the whole sequence misses the rectangle and no clipping is needed.
fn trivially_outside(points: &[PointZ], bb: &BoundingBox) -> bool {
    if points.is_empty() {
        return true;
    }
    let mut shared = outcode(&points[0], bb);
    for p in &points[1..] {
        shared = shared & outcode(p, bb);
    }
    !shared.is_inside()
}

fn maybe_simplify(points: Vec<PointZ>, simplify: Option<f64>) -> Vec<PointZ> {
    match simplify {
        Some(epsilon) if epsilon > 0.0 => ramer_douglas_peucker(&points, epsilon),
        _ => points,
    }
}
