//! Geometry to SVG element conversion and document scaffolding.
//!
//! Projected coordinates grow northwards while SVG y grows downwards, so
//! every northing is negated on the way out and the viewBox is anchored at
//! `-north`. Geometries are emitted in map units; the `height`/`width`
//! attributes in millimetres give the document its physical print size.

use crate::geom::types::{BoundingBox, Geometry, Polygon};

use super::node::SvgNode;

/// Side length of the square stand-in drawn for point features that have no
/// symbol definition, in map units.
const POINT_MARKER_SIZE: f64 = 40.0;

/// Converts one processed geometry into an SVG element carrying the given
/// class attribute.
///
/// Point features reference the symbol `href_id` from the document's
/// `<defs>` when one is given and fall back to a square marker otherwise.
/// Empty line strings and empty polygons produce `None`.
pub fn geometry_to_node(
    geometry: &Geometry,
    class: &str,
    href_id: Option<&str>,
) -> Option<SvgNode> {
    match geometry {
        Geometry::Point(p) => Some(point_node(p.x, p.y, class, href_id)),
        Geometry::PointZ(p) => Some(point_node(p.x, p.y, class, href_id)),
        Geometry::LineString(line) => {
            if line.points.is_empty() {
                return None;
            }
            let points = line
                .points
                .iter()
                .map(|p| format!("{},{}", p.x, -p.y))
                .collect::<Vec<_>>()
                .join(" ");
            Some(SvgNode::new("polyline").attr("points", points).attr("class", class))
        }
        Geometry::Polygon(polygon) => polygon_node(polygon, class),
    }
}

fn point_node(x: f64, y: f64, class: &str, href_id: Option<&str>) -> SvgNode {
    let half = POINT_MARKER_SIZE / 2.0;
    match href_id {
        Some(id) => SvgNode::new("use")
            .attr("href", format!("#{id}"))
            .attr("x", x - half)
            .attr("y", -(y + half))
            .attr("class", class),
        None => SvgNode::new("rect")
            .attr("x", x - half)
            .attr("y", -(y + half))
            .attr("height", POINT_MARKER_SIZE)
            .attr("width", POINT_MARKER_SIZE)
            .attr("class", class),
    }
}

/// A polygon with holes as a single `<path>`: one `M`/`L` subpath per ring,
/// each closed with `Z`, relying on the default nonzero fill rule.
fn polygon_node(polygon: &Polygon, class: &str) -> Option<SvgNode> {
    if polygon.rings.iter().all(|ring| ring.points.is_empty()) {
        return None;
    }
    let mut path = Vec::new();
    for ring in &polygon.rings {
        for (index, p) in ring.points.iter().enumerate() {
            let command = if index == 0 { "M" } else { "L" };
            path.push(format!("{command} {},{}", p.x, -p.y));
        }
        path.push("Z".to_string());
    }
    Some(SvgNode::new("path").attr("d", path.join(" ")).attr("class", class))
}

/// The document root: viewBox covering the region in map units, physical
/// size in millimetres, an inline stylesheet and a symbol `<defs>` block.
pub fn document(bb: &BoundingBox, height_mm: f64, width_mm: f64, css: &str, defs: &str) -> SvgNode {
    SvgNode::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr(
            "viewBox",
            format!("{} {} {} {}", bb.west, -bb.north, bb.width(), bb.height()),
        )
        .attr("height", format!("{height_mm}mm"))
        .attr("width", format!("{width_mm}mm"))
        .child(SvgNode::new("style").raw_text(css))
        .child(SvgNode::new("defs").raw_text(defs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::types::{LineString, LinearRing, Point, PointZ};

    #[test]
    fn test_point_with_symbol_reference() {
        let node = geometry_to_node(
            &Geometry::PointZ(PointZ::new(100.0, 200.0, 5.0)),
            "p_kivi p_kivi_0",
            Some("kivi"),
        )
        .unwrap();
        assert_eq!(node.name, "use");
        assert_eq!(node.attrs["href"], "#kivi");
        assert_eq!(node.attrs["x"], "80");
        assert_eq!(node.attrs["y"], "-220");
        assert_eq!(node.attrs["class"], "p_kivi p_kivi_0");
    }

    #[test]
    fn test_point_without_symbol_falls_back_to_rect() {
        let node =
            geometry_to_node(&Geometry::Point(Point { x: 100.0, y: 200.0 }), "kivi", None)
                .unwrap();
        assert_eq!(node.name, "rect");
        assert_eq!(node.attrs["x"], "80");
        assert_eq!(node.attrs["y"], "-220");
        assert_eq!(node.attrs["width"], "40");
    }

    #[test]
    fn test_line_string_negates_northings() {
        let node = geometry_to_node(
            &Geometry::LineString(LineString {
                points: vec![PointZ::new(1.0, 2.0, 0.0), PointZ::new(3.5, 4.0, 0.0)],
            }),
            "tieviiva",
            None,
        )
        .unwrap();
        assert_eq!(node.name, "polyline");
        assert_eq!(node.attrs["points"], "1,-2 3.5,-4");
    }

    #[test]
    fn test_empty_line_string_is_skipped() {
        let node = geometry_to_node(
            &Geometry::LineString(LineString { points: Vec::new() }),
            "tieviiva",
            None,
        );
        assert!(node.is_none());
    }

    #[test]
    fn test_polygon_path_with_hole() {
        let polygon = Polygon {
            rings: vec![
                LinearRing {
                    points: vec![
                        PointZ::new(0.0, 0.0, 0.0),
                        PointZ::new(10.0, 0.0, 0.0),
                        PointZ::new(10.0, 10.0, 0.0),
                    ],
                },
                LinearRing {
                    points: vec![PointZ::new(2.0, 2.0, 0.0), PointZ::new(4.0, 2.0, 0.0)],
                },
            ],
        };
        let node = geometry_to_node(&Geometry::Polygon(polygon), "jarvi", None).unwrap();
        assert_eq!(node.name, "path");
        assert_eq!(
            node.attrs["d"],
            "M 0,-0 L 10,-0 L 10,-10 Z M 2,-2 L 4,-2 Z"
        );
    }

    #[test]
    fn test_document_view_box() {
        let bb = BoundingBox::new(7_002_625.0, 403_712.5, 6_997_375.0, 396_287.5);
        let doc = document(&bb, 210.0, 297.0, "svg {}", "<g id=\"syms\"/>");
        assert_eq!(doc.attrs["viewBox"], "396287.5 -7002625 7425 5250");
        assert_eq!(doc.attrs["height"], "210mm");
        assert_eq!(doc.attrs["width"], "297mm");
        assert_eq!(doc.children.len(), 2);
    }
}
