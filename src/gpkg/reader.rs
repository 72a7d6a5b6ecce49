//! Feature row access for GeoPackage files.
//!
//! A GeoPackage is a SQLite database; every feature table carries a
//! companion R*-tree virtual table `rtree_{table}_geom` indexing feature
//! extents. [`fetch_rows`] uses that index to prefilter by region before any
//! blob is decoded, so a whole-country file costs roughly what the selected
//! sheet covers.

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use rusqlite::Connection;
use tracing::debug;

use crate::geom::types::BoundingBox;

/// One row of a feature table, undecoded.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub fid: i64,
    /// Classification code where the table has one (column `kohdeluokka` in
    /// NLS topographic data); tables without the column yield `None`.
    pub class_code: Option<i64>,
    pub geom: Vec<u8>,
}

/// All user table names in the database, in schema order.
pub fn table_names(conn: &Connection) -> Result<IndexSet<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_schema WHERE type = 'table' AND name NOT LIKE 'sqlite_%'")
        .context("querying sqlite_schema")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<IndexSet<String>>>()?;
    Ok(names)
}

/// Fetches the rows of `table` whose indexed extent is not disjoint from the
/// region (all rows when `region` is `None`).
///
/// `table` and its R*-tree companion must both appear in `known_tables`;
/// table names cannot be bound as SQL parameters, so interpolating an
/// unvalidated name is refused outright.
pub fn fetch_rows(
    conn: &Connection,
    table: &str,
    known_tables: &IndexSet<String>,
    region: Option<&BoundingBox>,
) -> Result<Vec<FeatureRow>> {
    let index_table = format!("rtree_{table}_geom");
    if !known_tables.contains(table) || !known_tables.contains(&index_table) {
        bail!("unknown table name \u{bb}{table}\u{ab}");
    }

    let has_class_code = table_has_column(conn, table, "kohdeluokka")?;
    let class_column = if has_class_code {
        "kohdeluokka"
    } else {
        "NULL"
    };

    let mut rows = Vec::new();
    match region {
        Some(bb) => {
            // The index stores one rectangle per feature; keep a feature
            // unless its rectangle is disjoint from the region on both axes.
            let sql = format!(
                "SELECT fid, {class_column}, geom FROM {table} \
                 WHERE fid IN (SELECT id FROM {index_table} \
                 WHERE NOT ((maxy < :south OR miny > :north) AND (maxx < :west OR minx > :east)))"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mapped = stmt.query_map(
                rusqlite::named_params! {
                    ":north": bb.north,
                    ":east": bb.east,
                    ":south": bb.south,
                    ":west": bb.west,
                },
                row_to_feature,
            )?;
            for row in mapped {
                rows.push(row?);
            }
        }
        None => {
            let sql = format!("SELECT fid, {class_column}, geom FROM {table}");
            let mut stmt = conn.prepare(&sql)?;
            let mapped = stmt.query_map([], row_to_feature)?;
            for row in mapped {
                rows.push(row?);
            }
        }
    }

    debug!(table, rows = rows.len(), "fetched feature rows");
    Ok(rows)
}

fn row_to_feature(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeatureRow> {
    Ok(FeatureRow {
        fid: row.get(0)?,
        class_code: row.get(1)?,
        geom: row.get(2)?,
    })
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2")?;
    let found = stmt.exists(rusqlite::params![table, column])?;
    Ok(found)
}
