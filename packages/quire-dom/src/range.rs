use std::cmp::Ordering;

use crate::BaseDocument;

/// A `(node, offset)` pair. Offsets count children for element and document nodes and
/// chars for text nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: usize,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A live-DOM style range between two boundary points.
///
/// The range is a plain value: it does not track mutations. Callers re-validate with
/// [`DomRange::is_valid`] after editing the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DomRange {
    pub start_container: usize,
    pub start_offset: usize,
    pub end_container: usize,
    pub end_offset: usize,
}

impl DomRange {
    pub fn new(
        start_container: usize,
        start_offset: usize,
        end_container: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }

    pub fn collapsed_at(container: usize, offset: usize) -> Self {
        Self::new(container, offset, container, offset)
    }

    /// A range spanning exactly `node` within its parent. `None` for parentless nodes.
    pub fn select_node(doc: &BaseDocument, node: usize) -> Option<Self> {
        let parent = doc.get_node(node)?.parent?;
        let index = doc.node_index(node)?;
        Some(Self::new(parent, index, parent, index + 1))
    }

    pub fn start(&self) -> BoundaryPoint {
        BoundaryPoint::new(self.start_container, self.start_offset)
    }

    pub fn end(&self) -> BoundaryPoint {
        BoundaryPoint::new(self.end_container, self.end_offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_container == self.end_container && self.start_offset == self.end_offset
    }

    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end_container = self.start_container;
            self.end_offset = self.start_offset;
        } else {
            self.start_container = self.end_container;
            self.start_offset = self.end_offset;
        }
    }

    /// Set the start. If the new start lies after the end, the range collapses to it.
    pub fn set_start(&mut self, doc: &BaseDocument, node: usize, offset: usize) {
        self.start_container = node;
        self.start_offset = offset;
        if doc.compare_boundary_points(self.start(), self.end()) == Ordering::Greater {
            self.collapse(true);
        }
    }

    /// Set the end. If the new end lies before the start, the range collapses to it.
    pub fn set_end(&mut self, doc: &BaseDocument, node: usize, offset: usize) {
        self.end_container = node;
        self.end_offset = offset;
        if doc.compare_boundary_points(self.start(), self.end()) == Ordering::Greater {
            self.collapse(false);
        }
    }

    pub fn set_start_before(&mut self, doc: &BaseDocument, node: usize) -> bool {
        match point_before(doc, node) {
            Some(point) => {
                self.set_start(doc, point.node, point.offset);
                true
            }
            None => false,
        }
    }

    pub fn set_start_after(&mut self, doc: &BaseDocument, node: usize) -> bool {
        match point_after(doc, node) {
            Some(point) => {
                self.set_start(doc, point.node, point.offset);
                true
            }
            None => false,
        }
    }

    pub fn set_end_before(&mut self, doc: &BaseDocument, node: usize) -> bool {
        match point_before(doc, node) {
            Some(point) => {
                self.set_end(doc, point.node, point.offset);
                true
            }
            None => false,
        }
    }

    pub fn set_end_after(&mut self, doc: &BaseDocument, node: usize) -> bool {
        match point_after(doc, node) {
            Some(point) => {
                self.set_end(doc, point.node, point.offset);
                true
            }
            None => false,
        }
    }

    /// The deepest node containing both boundary points
    pub fn common_ancestor_container(&self, doc: &BaseDocument) -> Option<usize> {
        doc.common_ancestor(self.start_container, self.end_container)
    }

    /// Both containers exist, are connected and the offsets are in bounds
    pub fn is_valid(&self, doc: &BaseDocument) -> bool {
        [self.start(), self.end()].iter().all(|point| {
            doc.is_connected(point.node) && point.offset <= doc.node_length(point.node)
        })
    }

    /// Whether `point` lies within the range (inclusive of both ends)
    pub fn contains_point(&self, doc: &BaseDocument, point: BoundaryPoint) -> bool {
        doc.compare_boundary_points(self.start(), point) != Ordering::Greater
            && doc.compare_boundary_points(point, self.end()) != Ordering::Greater
    }
}

fn point_before(doc: &BaseDocument, node: usize) -> Option<BoundaryPoint> {
    let parent = doc.get_node(node)?.parent?;
    Some(BoundaryPoint::new(parent, doc.node_index(node)?))
}

fn point_after(doc: &BaseDocument, node: usize) -> Option<BoundaryPoint> {
    let parent = doc.get_node(node)?.parent?;
    Some(BoundaryPoint::new(parent, doc.node_index(node)? + 1))
}

impl BaseDocument {
    /// The DOM "length" of a node: char count for text, child count otherwise
    pub fn node_length(&self, node_id: usize) -> usize {
        self.get_node(node_id).map_or(0, |node| node.max_offset())
    }

    /// Order two boundary points
    /// ([DOM § boundary point position](https://dom.spec.whatwg.org/#concept-range-bp-position)).
    pub fn compare_boundary_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
        if a.node == b.node {
            return a.offset.cmp(&b.offset);
        }

        if self.compare_document_order(a.node, b.node) == Ordering::Greater {
            return self.compare_boundary_points(b, a).reverse();
        }

        // `a.node` precedes `b.node`. If it is also an ancestor, find the child of `a.node`
        // on the path to `b.node` and compare against its index.
        if self.is_ancestor_of(a.node, b.node) {
            let mut child = b.node;
            while let Some(parent) = self.get_node(child).and_then(|node| node.parent) {
                if parent == a.node {
                    break;
                }
                child = parent;
            }
            let child_index = self.node_index(child).unwrap_or(0);
            if child_index < a.offset {
                return Ordering::Greater;
            }
        }

        Ordering::Less
    }
}
