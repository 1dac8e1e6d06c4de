//! Node tree construction
//!
//! A resolved definition is read into a [`NodeDefinition`] tree and then
//! built depth-first against a [`Scene`](crate::scene::Scene). Unknown node
//! types build to nothing and are skipped by their parent.

pub mod builder;
pub mod color;
pub mod definition;

pub use builder::{build, font_style, NodeBuilder};
pub use color::{normalize_color, to_paint};
pub use definition::{FrameDefinition, NodeDefinition, ShapeProperties, TextDefinition};
