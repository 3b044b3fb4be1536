//! The syntax tree: nodes, their kinds and field names, and the owning [`Tree`].
mod kind;
mod location;
mod node;
pub(crate) mod tree;
pub mod views;

pub use kind::{FieldName, NodeKind};
pub use location::{Location, Position};
pub use node::{Descendants, Node};
pub use tree::{InputEdit, Tree};
