//! The headless DOM underneath Quire
//!
//! This crate implements a small headless DOM ([`BaseDocument`]) which is designed to be embedded in and "driven" by
//! external code. Most users will want to construct one through a wrapper:
//!
//!  - [`HtmlDocument`](https://docs.rs/quire-html/latest/quire_html/struct.HtmlDocument.html) from the
//!    [quire-html](https://docs.rs/quire-html) crate parses HTML into a [`BaseDocument`].
//!  - `Editor` from the [quire-editor](https://docs.rs/quire-editor) crate layers caret and selection handling on top.
//!
//! There is no style or layout engine here. The embedder measures boxes with whatever layout engine it has and stores
//! them on each node with [`BaseDocument::set_node_rect`]. Everything geometric (hit testing, caret rectangles) reads
//! those host-supplied rectangles.

/// The DOM implementation.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themselves, and their data.
pub mod node;

mod config;
mod mutator;
mod range;
mod schema;
mod serialize;
mod traversal;

pub mod util;

pub use config::DocumentConfig;
pub use document::BaseDocument;
pub use markup5ever::{
    LocalName, Namespace, NamespaceStaticSet, Prefix, PrefixStaticSet, QualName, local_name,
    namespace_prefix, ns,
};
pub use mutator::{AppendTextErr, DocumentMutator};
pub use node::{Attribute, DisplayOuter, ElementData, Node, NodeData, NodeFlags, TextNodeData};
pub use range::{BoundaryPoint, DomRange};
pub use schema::Schema;
pub use serialize::{SerializeFilter, Verbatim};
pub use traversal::{AncestorTraverser, TreeCursor, TreeTraverser};
pub use kurbo::{Point, Rect, Vec2};
