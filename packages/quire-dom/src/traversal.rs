use std::cmp::Ordering;

use crate::{BaseDocument, Node};

#[derive(Clone)]
/// An pre-order tree traverser for a [BaseDocument](crate::document::BaseDocument).
pub struct TreeTraverser<'a> {
    doc: &'a BaseDocument,
    stack: Vec<usize>,
}

impl<'a> TreeTraverser<'a> {
    /// Creates a new tree traverser for the given document which starts at the root node.
    pub fn new(doc: &'a BaseDocument) -> Self {
        Self::new_with_root(doc, 0)
    }

    /// Creates a new tree traverser for the given document which starts at the specified node.
    pub fn new_with_root(doc: &'a BaseDocument, root: usize) -> Self {
        let mut stack = Vec::with_capacity(32);
        stack.push(root);
        TreeTraverser { doc, stack }
    }
}
impl Iterator for TreeTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.get_node(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(id)
    }
}

#[derive(Clone)]
/// An ancestor traverser for a [BaseDocument](crate::document::BaseDocument).
pub struct AncestorTraverser<'a> {
    doc: &'a BaseDocument,
    current: usize,
}
impl<'a> AncestorTraverser<'a> {
    /// Creates a new ancestor traverser for the given document and node ID.
    pub fn new(doc: &'a BaseDocument, node_id: usize) -> Self {
        AncestorTraverser {
            doc,
            current: node_id,
        }
    }
}
impl Iterator for AncestorTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current_node = self.doc.get_node(self.current)?;
        self.current = current_node.parent?;
        Some(self.current)
    }
}

/// A pre-order cursor over a subtree that can be told not to descend into the node it
/// just yielded.
///
/// ```text
/// let mut cursor = TreeCursor::new(doc, root);
/// while let Some(id) = cursor.next() {
///     if is_opaque(id) {
///         cursor.skip_subtree();
///     }
/// }
/// ```
#[derive(Clone)]
pub struct TreeCursor<'a> {
    doc: &'a BaseDocument,
    stack: Vec<usize>,
    /// How many entries on top of `stack` are children of the last yielded node
    pending_children: usize,
}

impl<'a> TreeCursor<'a> {
    pub fn new(doc: &'a BaseDocument, root: usize) -> Self {
        let mut stack = Vec::with_capacity(32);
        stack.push(root);
        Self {
            doc,
            stack,
            pending_children: 0,
        }
    }

    /// Don't visit the descendants of the node most recently returned by `next`
    pub fn skip_subtree(&mut self) {
        let keep = self.stack.len() - self.pending_children;
        self.stack.truncate(keep);
        self.pending_children = 0;
    }
}

impl Iterator for TreeCursor<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.get_node(id)?;
        self.stack.extend(node.children.iter().rev());
        self.pending_children = node.children.len();
        Some(id)
    }
}

impl BaseDocument {
    /// Collect the nodes into a chain by traversing upwards
    pub fn node_chain(&self, node_id: usize) -> Vec<usize> {
        let mut chain = Vec::with_capacity(16);
        chain.push(node_id);
        chain.extend(
            AncestorTraverser::new(self, node_id).filter(|id| self.nodes[*id].is_element()),
        );
        chain
    }

    pub fn visit<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &Node),
    {
        TreeTraverser::new(self).for_each(|node_id| visit(node_id, &self.nodes[node_id]));
    }

    /// The nearest inclusive ancestor of `node_id` matching `predicate`, stopping before `root`
    /// when one is given.
    pub fn closest(
        &self,
        node_id: usize,
        root: Option<usize>,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<usize> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if Some(id) == root {
                return None;
            }
            let node = self.get_node(id)?;
            if predicate(node) {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    /// Check if `ancestor_id` is an ancestor of `descendant_id`
    pub fn is_ancestor_of(&self, ancestor_id: usize, descendant_id: usize) -> bool {
        AncestorTraverser::new(self, descendant_id).any(|id| id == ancestor_id)
    }

    /// `Node.contains`: whether `descendant_id` is `ancestor_id` or one of its descendants
    pub fn contains(&self, ancestor_id: usize, descendant_id: usize) -> bool {
        ancestor_id == descendant_id || self.is_ancestor_of(ancestor_id, descendant_id)
    }

    /// The deepest node that contains both `node_a` and `node_b`
    pub fn common_ancestor(&self, node_a: usize, node_b: usize) -> Option<usize> {
        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);
        chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(a, b)| a == b)
            .last()
            .map(|(a, _)| *a)
    }

    /// Compare the document order of two nodes.
    /// Returns Ordering::Less if node_a comes before node_b in document order.
    /// Returns Ordering::Greater if node_a comes after node_b.
    /// Returns Ordering::Equal if they are the same node.
    ///
    /// Nodes in different trees are ordered by the ids of their tree roots.
    pub fn compare_document_order(&self, node_a: usize, node_b: usize) -> Ordering {
        if node_a == node_b {
            return Ordering::Equal;
        }

        // Build ancestor chains from root to node (inclusive)
        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);

        // Find where the chains diverge
        let mut common_depth = 0;
        for (a, b) in chain_a.iter().zip(chain_b.iter()) {
            if a != b {
                break;
            }
            common_depth += 1;
        }

        if common_depth == 0 {
            return chain_a[0].cmp(&chain_b[0]);
        }

        // If one is an ancestor of the other
        if common_depth == chain_a.len() {
            return Ordering::Less; // node_a is ancestor of node_b
        }
        if common_depth == chain_b.len() {
            return Ordering::Greater; // node_b is ancestor of node_a
        }

        // Compare position among siblings at the divergence point
        let divergent_a = chain_a[common_depth];
        let divergent_b = chain_b[common_depth];
        let parent_id = chain_a[common_depth - 1];
        let parent = &self.nodes[parent_id];

        for &child_id in &parent.children {
            if child_id == divergent_a {
                return Ordering::Less;
            }
            if child_id == divergent_b {
                return Ordering::Greater;
            }
        }

        // Should not reach here if tree is well-formed
        Ordering::Equal
    }

    /// Build ancestor chain from root to node (inclusive), ordered [root, ..., node].
    fn ancestor_chain_from_root(&self, node_id: usize) -> Vec<usize> {
        let mut ancestors = Vec::with_capacity(16);
        let mut current = Some(node_id);
        while let Some(id) = current {
            ancestors.push(id);
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        ancestors.reverse();
        ancestors
    }
}
