//! Geometry core: value types, clipping, simplification and the pipeline.
//!
//! # Submodules
//! - `types` - geometric primitives and the bounding box
//! - `outcode` - Cohen-Sutherland region classification
//! - `clip` - Sutherland-Hodgman and Cohen-Sutherland clipping
//! - `simplify` - Ramer-Douglas-Peucker line simplification
//! - `pipeline` - decode/clip/simplify orchestration per feature row

pub mod clip;
pub mod outcode;
pub mod pipeline;
pub mod simplify;
pub mod types;

pub use clip::{clip_poly, cohen_sutherland, intersection_point, sutherland_hodgman};
pub use outcode::{is_inside, outcode, OutCode};
pub use simplify::{perpendicular_distance, ramer_douglas_peucker};
pub use types::{BoundingBox, Geometry, LineString, LinearRing, Point, PointZ, Polygon};
