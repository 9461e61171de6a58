use quire_dom::{BaseDocument, BoundaryPoint, DomRange};

/// A caret location: a container node plus an offset into it.
///
/// Offsets count children for element containers and chars for text containers. The value
/// is not tied to the document; [`CaretPosition::is_valid`] checks it against one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CaretPosition {
    container: usize,
    offset: usize,
}

impl CaretPosition {
    pub fn new(container: usize, offset: usize) -> Self {
        Self { container, offset }
    }

    /// The position directly before `node` in its parent
    pub fn before(doc: &BaseDocument, node: usize) -> Option<Self> {
        let parent = doc.get_node(node)?.parent?;
        Some(Self::new(parent, doc.node_index(node)?))
    }

    /// The position directly after `node` in its parent
    pub fn after(doc: &BaseDocument, node: usize) -> Option<Self> {
        let parent = doc.get_node(node)?.parent?;
        Some(Self::new(parent, doc.node_index(node)? + 1))
    }

    pub fn from_range_start(range: &DomRange) -> Self {
        Self::new(range.start_container, range.start_offset)
    }

    pub fn from_range_end(range: &DomRange) -> Self {
        Self::new(range.end_container, range.end_offset)
    }

    pub fn container(&self) -> usize {
        self.container
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_start(&self) -> bool {
        self.offset == 0
    }

    pub fn is_at_end(&self, doc: &BaseDocument) -> bool {
        self.offset >= doc.node_length(self.container)
    }

    pub fn is_text_position(&self, doc: &BaseDocument) -> bool {
        doc.get_node(self.container).is_some_and(|node| node.is_text_node())
    }

    /// The node on the requested side of the position.
    ///
    /// Text containers answer with themselves. Element containers answer with the child
    /// before or after the offset, or `None` at a boundary.
    pub fn get_node(&self, doc: &BaseDocument, before: bool) -> Option<usize> {
        let node = doc.get_node(self.container)?;
        if node.is_text_node() {
            return Some(self.container);
        }
        if before {
            let index = self.offset.checked_sub(1)?;
            node.children.get(index).copied()
        } else {
            node.children.get(self.offset).copied()
        }
    }

    /// The container exists, is connected and the offset is in bounds
    pub fn is_valid(&self, doc: &BaseDocument) -> bool {
        doc.is_connected(self.container) && self.offset <= doc.node_length(self.container)
    }

    pub fn to_boundary_point(&self) -> BoundaryPoint {
        BoundaryPoint::new(self.container, self.offset)
    }

    /// A collapsed range at this position
    pub fn to_range(&self) -> DomRange {
        DomRange::collapsed_at(self.container, self.offset)
    }
}

impl From<BoundaryPoint> for CaretPosition {
    fn from(point: BoundaryPoint) -> Self {
        Self::new(point.node, point.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_dom::DocumentConfig;
    use quire_html::HtmlDocument;

    #[test]
    fn before_and_after_a_child() {
        let doc = HtmlDocument::from_html("<p>a<img>b</p>", DocumentConfig::default());
        let p = doc.get_node(doc.body_id()).unwrap().children[0];
        let img = doc.get_node(p).unwrap().children[1];

        let before = CaretPosition::before(&doc, img).unwrap();
        let after = CaretPosition::after(&doc, img).unwrap();
        assert_eq!(before, CaretPosition::new(p, 1));
        assert_eq!(after, CaretPosition::new(p, 2));
        assert_eq!(before.get_node(&doc, false), Some(img));
        assert_eq!(after.get_node(&doc, true), Some(img));
        assert!(CaretPosition::before(&doc, 0).is_none());
    }

    #[test]
    fn boundaries_have_no_node() {
        let doc = HtmlDocument::from_html("<p>ab</p>", DocumentConfig::default());
        let p = doc.get_node(doc.body_id()).unwrap().children[0];
        let text = doc.get_node(p).unwrap().children[0];

        let start = CaretPosition::new(p, 0);
        let end = CaretPosition::new(p, 1);
        assert!(start.is_at_start());
        assert_eq!(start.get_node(&doc, true), None);
        assert!(end.is_at_end(&doc));
        assert_eq!(end.get_node(&doc, false), None);

        let in_text = CaretPosition::new(text, 1);
        assert_eq!(in_text.get_node(&doc, true), Some(text));
        assert!(!in_text.is_at_end(&doc));
        assert!(CaretPosition::new(text, 2).is_at_end(&doc));
        assert!(!CaretPosition::new(text, 3).is_valid(&doc));
    }
}
