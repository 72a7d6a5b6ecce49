//! gpkg2svg - renders a map sheet from NLS GeoPackage topographic data.
//!
//! The centre point and physical output size select a bounding box in map
//! coordinates; every configured layer is fetched with the R*-tree
//! prefilter, decoded, clipped and simplified in parallel, and the
//! resulting elements are appended to the SVG document in layer order.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use rusqlite::Connection;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gpkg2svg::geom::types::BoundingBox;
use gpkg2svg::gpkg::{fetch_rows, table_names, FeatureRow};
use gpkg2svg::layers::{self, LayerSpec};
use gpkg2svg::process_blob;
use gpkg2svg::svg::{document, geometry_to_node, svg_to_file, SvgNode};

const TOPO_CSS: &str = include_str!("../../styles/topo.css");
const OVERVIEW_CSS: &str = include_str!("../../styles/overview.css");
const DEFS_SVG: &str = include_str!("../../styles/defs.svg");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    Topo,
    Overview,
}

#[derive(Parser)]
#[command(name = "gpkg2svg")]
#[command(
    version,
    about = "Converts data from the Topographic Database of the National Land Survey of Finland to SVG"
)]
struct Cli {
    /// North coordinate of the centre point of the render
    north: f64,
    /// East coordinate of the centre point of the render
    east: f64,
    /// Path of the output SVG file
    output_file: PathBuf,
    /// Paths of the input .gpkg files
    #[arg(required = true)]
    input_files: Vec<PathBuf>,

    /// Height of the output in mm
    #[arg(long, default_value_t = 210.0)]
    height: f64,
    /// Width of the output in mm
    #[arg(long, default_value_t = 297.0)]
    width: f64,
    /// Scale of the output (1 : scale)
    #[arg(long, default_value_t = 25_000)]
    scale: u32,
    /// Presentation variant of the output
    #[arg(long, value_enum, default_value = "topo")]
    variant: Variant,
    /// Custom layer table (JSON), overriding the variant's built-in table
    #[arg(long)]
    layers: Option<PathBuf>,
    /// Custom stylesheet, overriding the variant's built-in one
    #[arg(long)]
    style: Option<PathBuf>,
    /// Line simplification tolerance in map units; 0 disables
    #[arg(long, default_value_t = 0.1)]
    simplify: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let height_m = cli.height * (cli.scale as f64 / 1000.0);
    let width_m = cli.width * (cli.scale as f64 / 1000.0);
    let region = BoundingBox::from_center(cli.north, cli.east, height_m, width_m);
    info!(
        north = region.north,
        east = region.east,
        south = region.south,
        west = region.west,
        "rendering region"
    );

    let layer_table = match &cli.layers {
        Some(path) => layers::from_json_file(path)?,
        None => match cli.variant {
            Variant::Topo => layers::topographic(),
            Variant::Overview => layers::overview(),
        },
    };

    let css = match &cli.style {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading stylesheet {}", path.display()))?,
        None => match cli.variant {
            Variant::Topo => TOPO_CSS.to_string(),
            Variant::Overview => OVERVIEW_CSS.to_string(),
        },
    };

    let simplify = (cli.simplify > 0.0).then_some(cli.simplify);
    let mut root = document(&region, cli.height, cli.width, &css, DEFS_SVG);

    for gpkg_path in &cli.input_files {
        let conn = Connection::open(gpkg_path)
            .with_context(|| format!("opening {}", gpkg_path.display()))?;
        render_layers(&conn, &layer_table, &region, simplify, &mut root)?;
    }

    svg_to_file(&root, &cli.output_file)
        .with_context(|| format!("writing {}", cli.output_file.display()))?;
    info!(output = %cli.output_file.display(), "wrote SVG");
    Ok(())
}

/// Renders every configured layer from one database into `root`.
///
/// Layers are isolated from each other: a missing table or a failing fetch
/// (for instance a feature table without its R*-tree companion) is logged
/// and skipped, and the remaining layers still render.
fn render_layers(
    conn: &Connection,
    layer_table: &[LayerSpec],
    region: &BoundingBox,
    simplify: Option<f64>,
    root: &mut SvgNode,
) -> Result<()> {
    let known_tables = table_names(conn)?;

    for spec in layer_table {
        if !known_tables.contains(&spec.table) {
            warn!(table = %spec.table, "table not present, skipping layer");
            continue;
        }
        let started = Instant::now();
        let rows = match fetch_rows(conn, &spec.table, &known_tables, Some(region)) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(table = %spec.table, %err, "fetch failed, skipping layer");
                continue;
            }
        };
        let row_count = rows.len();
        for node in render_layer(spec, rows, region, simplify) {
            root.push(node);
        }
        info!(
            table = %spec.table,
            alias = %spec.alias(),
            rows = row_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "layer done"
        );
    }
    Ok(())
}

/// Decodes, clips and converts one layer's rows. Rows are processed in
/// parallel but emitted in fetch order so the output stays deterministic;
/// a row that fails to decode or clip is logged and skipped.
fn render_layer(
    spec: &LayerSpec,
    rows: Vec<FeatureRow>,
    region: &BoundingBox,
    simplify: Option<f64>,
) -> Vec<SvgNode> {
    let per_row: Vec<Vec<SvgNode>> = rows
        .par_iter()
        .map(|row| {
            if spec.class_code.is_some() && row.class_code != spec.class_code {
                return Vec::new();
            }
            let geometries = match process_blob(&row.geom, Some(region), simplify) {
                Ok(geometries) => geometries,
                Err(err) => {
                    warn!(fid = row.fid, table = %spec.table, %err, "skipping feature");
                    return Vec::new();
                }
            };
            let mut nodes = Vec::new();
            for index in 0..spec.elem_count {
                let class = format!("{0} {0}_{1}", spec.alias(), index);
                for geometry in &geometries {
                    if let Some(node) =
                        geometry_to_node(geometry, &class, spec.use_href.as_deref())
                    {
                        nodes.push(node);
                    }
                }
            }
            nodes
        })
        .collect();

    per_row.into_iter().flatten().collect()
}
