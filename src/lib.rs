//! gpkg2svg renders vector maps from GeoPackage topographic data to SVG.
//!
//! The crate is organized around a per-feature pipeline: a binary blob is
//! decoded from its GeoPackage envelope into a typed geometry, restricted to
//! the requested map sheet by polygon/polyline clipping, thinned within a
//! tolerance, and handed to the SVG layer for presentation.
//!
//! # Modules
//! - `geom` - geometric types, clipping, simplification and the feature pipeline
//! - `gpkg` - GeoPackage blob decoding and SQLite row access
//! - `svg` - SVG element mapping and document serialization
//! - `layers` - per-feature-class render configuration

pub mod error;
pub mod geom;
pub mod gpkg;
pub mod layers;
pub mod svg;

pub use error::{Error, ErrorKind, Result};
pub use geom::pipeline::process_blob;
pub use geom::types::{BoundingBox, Geometry, LineString, LinearRing, Point, PointZ, Polygon};
