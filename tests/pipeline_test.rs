// End-to-end test: in-memory GeoPackage rows through fetch, decode, clip,
// simplify and SVG rendering.

use gpkg2svg::geom::types::BoundingBox;
use gpkg2svg::gpkg::{encode_gpkg_blob, fetch_rows, table_names};
use gpkg2svg::process_blob;
use gpkg2svg::svg::{document, geometry_to_node, svg_to_string};
use gpkg2svg::{Geometry, LineString, LinearRing, PointZ, Polygon};
use rusqlite::Connection;

/// Builds an in-memory database shaped like a GeoPackage: a feature table
/// plus an `rtree_{table}_geom` companion. A plain table stands in for the
/// R*-tree virtual table; the prefilter SQL reads it identically.
fn gpkg_fixture() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE jarvi (fid INTEGER PRIMARY KEY, kohdeluokka INTEGER, geom BLOB);
         CREATE TABLE rtree_jarvi_geom (id INTEGER PRIMARY KEY,
             minx REAL, maxx REAL, miny REAL, maxy REAL);",
    )
    .unwrap();
    conn
}

fn insert_feature(conn: &Connection, fid: i64, geometry: &Geometry) {
    let blob = encode_gpkg_blob(geometry, 3067);
    let (minx, maxx, miny, maxy) = extent(geometry);
    conn.execute(
        "INSERT INTO jarvi (fid, kohdeluokka, geom) VALUES (?1, 36200, ?2)",
        rusqlite::params![fid, blob],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO rtree_jarvi_geom (id, minx, maxx, miny, maxy) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![fid, minx, maxx, miny, maxy],
    )
    .unwrap();
}

fn extent(geometry: &Geometry) -> (f64, f64, f64, f64) {
    let points: Vec<PointZ> = match geometry {
        Geometry::Point(p) => vec![PointZ::new(p.x, p.y, 0.0)],
        Geometry::PointZ(p) => vec![*p],
        Geometry::LineString(line) => line.points.clone(),
        Geometry::Polygon(polygon) => {
            polygon.rings.iter().flat_map(|r| r.points.clone()).collect()
        }
    };
    let mut bb = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for p in points {
        bb.0 = bb.0.min(p.x);
        bb.1 = bb.1.max(p.x);
        bb.2 = bb.2.min(p.y);
        bb.3 = bb.3.max(p.y);
    }
    bb
}

fn square(x0: f64, y0: f64, side: f64) -> Geometry {
    Geometry::Polygon(Polygon {
        rings: vec![LinearRing {
            points: vec![
                PointZ::new(x0, y0, 0.0),
                PointZ::new(x0 + side, y0, 0.0),
                PointZ::new(x0 + side, y0 + side, 0.0),
                PointZ::new(x0, y0 + side, 0.0),
                PointZ::new(x0, y0, 0.0),
            ],
        }],
    })
}

#[test]
fn test_fetch_decode_clip_render() {
    let conn = gpkg_fixture();
    // One lake inside the sheet, one overlapping its edge, one far away.
    insert_feature(&conn, 1, &square(100.0, 100.0, 50.0));
    insert_feature(&conn, 2, &square(380.0, 100.0, 50.0));
    insert_feature(&conn, 3, &square(10_000.0, 10_000.0, 50.0));

    let region = BoundingBox::new(400.0, 400.0, 0.0, 0.0);
    let names = table_names(&conn).unwrap();
    let rows = fetch_rows(&conn, "jarvi", &names, Some(&region)).unwrap();
    assert_eq!(rows.len(), 2, "index prefilter should drop the distant lake");

    let mut root = document(&region, 210.0, 297.0, "path { fill: blue }", "");
    for row in &rows {
        for geometry in process_blob(&row.geom, Some(&region), Some(0.1)).unwrap() {
            if let Some(node) = geometry_to_node(&geometry, "jarvi jarvi_0", None) {
                root.push(node);
            }
        }
    }
    assert_eq!(root.children.len(), 4, "style, defs and two lakes");

    let svg = svg_to_string(&root).unwrap();
    assert!(svg.contains("viewBox=\"0 -400 400 400\""));
    // The edge lake is clipped to the sheet: no coordinate beyond east=400.
    assert!(svg.contains("M 100,-100"));
    assert!(svg.contains("400,-"));
    assert!(!svg.contains("M 430"));
    assert!(!svg.contains("L 430"));
}

#[test]
fn test_line_feature_splits_and_simplifies() {
    let conn = gpkg_fixture();
    // A polyline that crosses the sheet, leaves, and comes back, with a
    // redundant collinear vertex inside.
    let line = Geometry::LineString(LineString {
        points: vec![
            PointZ::new(-50.0, 200.0, 0.0),
            PointZ::new(100.0, 200.0, 0.0),
            PointZ::new(200.0, 200.0, 0.0),
            PointZ::new(450.0, 200.0, 0.0),
            PointZ::new(450.0, 300.0, 0.0),
            PointZ::new(200.0, 300.0, 0.0),
        ],
    });
    insert_feature(&conn, 1, &line);

    let region = BoundingBox::new(400.0, 400.0, 0.0, 0.0);
    let names = table_names(&conn).unwrap();
    let rows = fetch_rows(&conn, "jarvi", &names, Some(&region)).unwrap();
    let geometries = process_blob(&rows[0].geom, Some(&region), Some(0.1)).unwrap();
    assert_eq!(geometries.len(), 2, "the line leaves the sheet once");

    let Geometry::LineString(first) = &geometries[0] else {
        panic!("expected a line string");
    };
    // Entry at west edge, exit at east edge, middle vertex simplified away.
    assert_eq!(first.points.len(), 2);
    assert_eq!(first.points[0], PointZ::new(0.0, 200.0, 0.0));
    assert_eq!(first.points[1], PointZ::new(400.0, 200.0, 0.0));
}

#[test]
fn test_corrupt_blob_reports_error_not_panic() {
    let conn = gpkg_fixture();
    let mut blob = encode_gpkg_blob(&square(100.0, 100.0, 50.0), 3067);
    blob.truncate(blob.len() / 2);
    conn.execute(
        "INSERT INTO jarvi (fid, kohdeluokka, geom) VALUES (1, 36200, ?1);",
        rusqlite::params![blob],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO rtree_jarvi_geom (id, minx, maxx, miny, maxy) VALUES (1, 0, 1, 0, 1);",
        [],
    )
    .unwrap();

    let region = BoundingBox::new(400.0, 400.0, 0.0, 0.0);
    let names = table_names(&conn).unwrap();
    let rows = fetch_rows(&conn, "jarvi", &names, Some(&region)).unwrap();
    let result = process_blob(&rows[0].geom, Some(&region), None);
    assert_eq!(
        result.unwrap_err().kind(),
        gpkg2svg::ErrorKind::MalformedInput
    );
}
