//! GeoPackage access: binary geometry blobs and SQLite feature tables.

pub mod reader;
pub mod wkb;

pub use reader::{fetch_rows, table_names, FeatureRow};
pub use wkb::{decode_gpkg_blob, decode_wkb, encode_gpkg_blob, encode_wkb, WkbOrder};
