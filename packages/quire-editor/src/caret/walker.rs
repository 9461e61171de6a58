use std::cmp::Ordering;
use std::collections::VecDeque;

use quire_dom::{BaseDocument, TreeCursor};

use super::CaretPosition;
use crate::node_type::{ZWSP, is_atomic, is_bogus_all};

/// Steps between the legal caret positions of an editing root.
///
/// Legal positions are:
///  - every offset of every text node holding more than zero width chars,
///  - the positions directly before and after each atomic element (the caret never enters
///    one),
///  - offset 0 of an empty block, so the caret can reach empty paragraphs.
///
/// Subtrees of atomic and transient (`bogus="all"`) elements are skipped entirely.
pub struct CaretWalker<'a> {
    doc: &'a BaseDocument,
    root: usize,
}

impl<'a> CaretWalker<'a> {
    pub fn new(doc: &'a BaseDocument, root: usize) -> Self {
        Self { doc, root }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Every legal position under the root, in document order without duplicates
    pub fn positions(&self) -> Vec<CaretPosition> {
        self.iter().collect()
    }

    /// Lazily walk the legal positions under the root in document order
    pub fn iter(&self) -> Positions<'a> {
        Positions {
            doc: self.doc,
            root: self.root,
            cursor: TreeCursor::new(self.doc, self.root),
            queue: VecDeque::new(),
            last: None,
        }
    }

    /// The first legal position strictly after `pos`
    pub fn next(&self, pos: &CaretPosition) -> Option<CaretPosition> {
        if !self.is_in_root(pos) {
            return None;
        }
        self.iter()
            .find(|candidate| self.compare(candidate, pos) == Ordering::Greater)
    }

    /// The last legal position strictly before `pos`
    pub fn prev(&self, pos: &CaretPosition) -> Option<CaretPosition> {
        if !self.is_in_root(pos) {
            return None;
        }
        self.iter()
            .take_while(|candidate| self.compare(candidate, pos) == Ordering::Less)
            .last()
    }

    /// Whether `pos` is one of the positions the walker can land on
    pub fn is_legal(&self, pos: &CaretPosition) -> bool {
        self.is_in_root(pos)
            && self
                .iter()
                .take_while(|candidate| self.compare(candidate, pos) != Ordering::Greater)
                .any(|candidate| candidate == *pos)
    }

    fn is_in_root(&self, pos: &CaretPosition) -> bool {
        pos.is_valid(self.doc) && self.doc.contains(self.root, pos.container())
    }

    fn compare(&self, a: &CaretPosition, b: &CaretPosition) -> Ordering {
        self.doc
            .compare_boundary_points(a.to_boundary_point(), b.to_boundary_point())
    }
}

/// Iterator returned by [`CaretWalker::iter`].
///
/// The pre-order cursor already visits positions in document order. Adjacent atomic
/// elements share a boundary, so consecutive duplicates are dropped.
pub struct Positions<'a> {
    doc: &'a BaseDocument,
    root: usize,
    cursor: TreeCursor<'a>,
    queue: VecDeque<CaretPosition>,
    last: Option<CaretPosition>,
}

impl Positions<'_> {
    fn visit(&mut self, id: usize) {
        let doc = self.doc;
        let Some(node) = doc.get_node(id) else {
            return;
        };

        if id == self.root {
            if node.children.is_empty() {
                self.queue.push_back(CaretPosition::new(id, 0));
            }
            return;
        }

        if is_bogus_all(node) {
            self.cursor.skip_subtree();
            return;
        }

        if is_atomic(node) {
            self.queue.extend(CaretPosition::before(doc, id));
            self.queue.extend(CaretPosition::after(doc, id));
            self.cursor.skip_subtree();
            return;
        }

        if let Some(text) = node.text_data() {
            if !text.content.chars().all(|c| c == ZWSP) {
                let offsets = 0..=text.len_chars();
                self.queue
                    .extend(offsets.map(|offset| CaretPosition::new(id, offset)));
            }
            return;
        }

        if node.is_element() && node.children.is_empty() && node.is_block(doc.schema()) {
            self.queue.push_back(CaretPosition::new(id, 0));
        }
    }
}

impl Iterator for Positions<'_> {
    type Item = CaretPosition;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pos) = self.queue.pop_front() {
                if self.last == Some(pos) {
                    continue;
                }
                self.last = Some(pos);
                return Some(pos);
            }
            let id = self.cursor.next()?;
            self.visit(id);
        }
    }
}
