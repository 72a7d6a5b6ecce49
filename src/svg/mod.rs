//! SVG document assembly and serialization.
//!
//! The renderer builds a lightweight element tree ([`SvgNode`]) rather than
//! writing markup on the fly: geometry conversion, styling and document
//! scaffolding stay independent of serialization, and tests can assert on
//! the tree directly.

pub mod elements;
pub mod node;
pub mod writer;

pub use elements::{document, geometry_to_node};
pub use node::SvgNode;
pub use writer::{svg_to_file, svg_to_string};
