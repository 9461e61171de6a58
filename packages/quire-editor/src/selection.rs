use quire_dom::{BaseDocument, DomRange};

use crate::caret::CaretPosition;

/// The editor's native selection: at most one range, validated against the document on
/// every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorSelection {
    range: Option<DomRange>,
}

impl EditorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored range, whether or not it is still valid
    pub fn raw_range(&self) -> Option<DomRange> {
        self.range
    }

    pub fn set_raw_range(&mut self, range: Option<DomRange>) {
        self.range = range;
    }

    /// The stored range if its boundary points still exist in the document
    pub fn get_range(&self, doc: &BaseDocument) -> Option<DomRange> {
        let range = self.range?;
        if range.is_valid(doc) {
            Some(range)
        } else {
            tracing::debug!(?range, "Dropping stale selection range");
            None
        }
    }

    /// The node a range "is about" (`selection.getNode()`): the single node it spans, the
    /// element holding a collapsed caret, or the common ancestor element. Without a range
    /// this is `root`.
    pub fn node_of_range(doc: &BaseDocument, root: usize, range: Option<DomRange>) -> usize {
        let Some(range) = range.filter(|range| range.is_valid(doc)) else {
            return root;
        };

        let start_is_text = doc
            .get_node(range.start_container)
            .is_some_and(|node| node.is_text_node());
        let spans_one_child = range.start_container == range.end_container
            && range.end_offset == range.start_offset + 1;
        if !start_is_text && spans_one_child {
            if let Some(node) = CaretPosition::from_range_start(&range).get_node(doc, false) {
                return node;
            }
        }

        let common = range.common_ancestor_container(doc).unwrap_or(root);
        match doc.get_node(common) {
            Some(node) if node.is_text_node() => node.parent.unwrap_or(root),
            Some(_) => common,
            None => root,
        }
    }

    /// Resolve a client point to a collapsed range, through the shell's text layout when it
    /// has one and by hit testing node boxes otherwise
    pub fn range_from_point(doc: &BaseDocument, x: f32, y: f32) -> Option<DomRange> {
        if let Some((container, offset)) = doc.shell_provider.caret_position_from_point(x, y) {
            let range = DomRange::collapsed_at(container, offset);
            if range.is_valid(doc) {
                return Some(range);
            }
        }

        let hit = doc.hit(x, y)?;
        let node = doc.get_node(hit.node_id)?;
        let rect = node.rect?;

        if let Some(text) = node.text_data() {
            let len = text.len_chars();
            let ratio = (hit.x as f64 / rect.width().max(1.0)).clamp(0.0, 1.0);
            let offset = (ratio * len as f64).round() as usize;
            return Some(DomRange::collapsed_at(hit.node_id, offset.min(len)));
        }

        let is_void = node
            .local_name()
            .is_some_and(|name| doc.schema().is_short_ended(name));
        if is_void || crate::node_type::is_atomic(node) {
            let before = (hit.x as f64) < rect.width() / 2.0;
            let pos = if before {
                CaretPosition::before(doc, hit.node_id)
            } else {
                CaretPosition::after(doc, hit.node_id)
            };
            return pos.map(|pos| pos.to_range());
        }

        Some(DomRange::collapsed_at(hit.node_id, node.children.len()))
    }
}
