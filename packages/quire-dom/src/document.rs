use crate::node::{Node, NodeData, NodeFlags, TextNodeData};
use crate::{DocumentConfig, DocumentMutator, Schema};
use kurbo::{Point, Rect, Vec2};
use markup5ever::local_name;
use quire_traits::{DummyShellProvider, HitResult, ShellProvider};
use slab::Slab;
use std::collections::HashMap;
use std::sync::Arc;

pub struct BaseDocument {
    // Scroll of the viewport over the page
    pub(crate) viewport_scroll: Point,

    /// A slab-backed tree of nodes
    ///
    /// We pin the tree to a guarantee to the nodes it creates that the tree is stable in memory.
    /// There is no way to create the tree - publicly or privately - that would invalidate that invariant.
    pub(crate) nodes: Box<Slab<Node>>,

    /// Element classification (void and block element sets)
    pub(crate) schema: Schema,

    /// The node which is currently focussed (if any)
    pub(crate) focus_node_id: Option<usize>,

    /// Map of node ID's for fast lookups
    pub(crate) nodes_to_id: HashMap<String, usize>,

    /// Counter backing [`BaseDocument::unique_id`]
    unique_id_counter: usize,

    /// Shell provider. Can be used to request a redraw, scroll nodes into view or map points to carets
    pub shell_provider: Arc<dyn ShellProvider>,
}

impl BaseDocument {
    /// Create a new (empty) [`BaseDocument`] with the specified configuration
    pub fn new(config: DocumentConfig) -> Self {
        let schema = config.schema.unwrap_or_default();
        let shell_provider = config
            .shell_provider
            .unwrap_or_else(|| Arc::new(DummyShellProvider));

        let mut doc = Self {
            viewport_scroll: Point::ZERO,
            nodes: Box::new(Slab::new()),
            schema,
            focus_node_id: None,
            nodes_to_id: HashMap::new(),
            unique_id_counter: 0,
            shell_provider,
        };

        // Initialise document with root Document node
        let root = doc.create_node(NodeData::Document);
        doc.nodes[root].flags.insert(NodeFlags::IS_IN_DOCUMENT);

        doc
    }

    pub fn set_shell_provider(&mut self, shell_provider: Arc<dyn ShellProvider>) {
        self.shell_provider = shell_provider;
    }

    pub fn tree(&self) -> &Slab<Node> {
        &self.nodes
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn mutate<'doc>(&'doc mut self) -> DocumentMutator<'doc> {
        DocumentMutator::new(self)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn root_node_mut(&mut self) -> &mut Node {
        &mut self.nodes[0]
    }

    pub fn try_root_element(&self) -> Option<&Node> {
        self.root_node()
            .children
            .iter()
            .map(|id| &self.nodes[*id])
            .find(|node| node.is_element())
    }

    /// The `<body>` element of the document, if there is one
    pub fn body(&self) -> Option<usize> {
        let html = self.try_root_element()?;
        html.children
            .iter()
            .copied()
            .find(|id| self.nodes[*id].data.is_element_with_tag_name(&local_name!("body")))
    }

    pub fn create_node(&mut self, node_data: NodeData) -> usize {
        let slab_ptr = self.nodes.as_mut() as *mut Slab<Node>;

        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(slab_ptr, id, node_data));

        id
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        let content = text.to_string();
        let data = NodeData::Text(TextNodeData::new(content));
        self.create_node(data)
    }

    /// Clone a node and its subtree. The clone is detached and keeps no layout.
    pub fn deep_clone_node(&mut self, node_id: usize) -> usize {
        // Load existing node
        let node = &self.nodes[node_id];
        let data = node.data.clone();
        let children = node.children.clone();

        // Create new node
        let new_node_id = self.create_node(data);

        // Recursively clone children
        let new_children: Vec<usize> = children
            .into_iter()
            .map(|child_id| self.deep_clone_node(child_id))
            .collect();
        for &child_id in &new_children {
            self.nodes[child_id].parent = Some(new_node_id);
        }
        self.nodes[new_node_id].children = new_children;

        new_node_id
    }

    /// Insert `inserted_node_ids` as siblings immediately before `anchor_id`.
    /// Does nothing if the anchor has no parent.
    pub fn insert_before(&mut self, anchor_id: usize, inserted_node_ids: &[usize]) {
        let Some(parent_id) = self.nodes[anchor_id].parent else {
            tracing::warn!(anchor_id, "insert_before on a parentless node");
            return;
        };

        for &id in inserted_node_ids {
            self.detach_node(id);
            let Some(anchor_idx) = self.nodes[parent_id].index_of_child(anchor_id) else {
                return;
            };
            self.nodes[parent_id].children.insert(anchor_idx, id);
            self.nodes[id].parent = Some(parent_id);
            self.sync_in_document_flag(id);
        }
    }

    /// Append `appended_node_ids` to the end of `parent_id`'s child list
    pub fn append(&mut self, parent_id: usize, appended_node_ids: &[usize]) {
        for &id in appended_node_ids {
            self.detach_node(id);
            self.nodes[parent_id].children.push(id);
            self.nodes[id].parent = Some(parent_id);
            self.sync_in_document_flag(id);
        }
    }

    /// Detach a node (and its subtree) from its parent. The nodes stay allocated and can be
    /// re-inserted. Returns the previous parent.
    pub fn remove_node(&mut self, node_id: usize) -> Option<usize> {
        let parent_id = self.detach_node(node_id)?;
        self.sync_in_document_flag(node_id);
        Some(parent_id)
    }

    fn detach_node(&mut self, node_id: usize) -> Option<usize> {
        let parent_id = self.nodes[node_id].parent.take()?;
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.retain(|id| *id != node_id);
        }
        Some(parent_id)
    }

    /// Remove a node from the tree and free it and its subtree
    pub fn remove_and_drop_node(&mut self, node_id: usize) -> Option<Node> {
        fn remove_node_ignoring_parent(doc: &mut BaseDocument, node_id: usize) -> Option<Node> {
            let node = doc.nodes.try_remove(node_id);
            if let Some(node) = &node {
                for &child in &node.children {
                    remove_node_ignoring_parent(doc, child);
                }
                if let Some(id_attr) = node.element_data().and_then(|el| el.id()) {
                    if doc.nodes_to_id.get(id_attr) == Some(&node_id) {
                        doc.nodes_to_id.remove(id_attr);
                    }
                }
            }
            node
        }

        self.detach_node(node_id);
        if self.focus_node_id == Some(node_id) {
            self.focus_node_id = None;
        }
        remove_node_ignoring_parent(self, node_id)
    }

    /// Recompute the `IS_IN_DOCUMENT` flag for a subtree from its (new) parent
    fn sync_in_document_flag(&mut self, node_id: usize) {
        let in_document = self.nodes[node_id]
            .parent
            .is_some_and(|parent_id| self.nodes[parent_id].flags.is_in_document());

        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            node.flags.set(NodeFlags::IS_IN_DOCUMENT, in_document);
            stack.extend(node.children.iter().copied());
        }
    }

    /// Whether the node exists and is reachable from the document node
    pub fn is_connected(&self, node_id: usize) -> bool {
        self.nodes
            .get(node_id)
            .is_some_and(|node| node.flags.is_in_document())
    }

    /// Index of the node within its parent's child list
    pub fn node_index(&self, node_id: usize) -> Option<usize> {
        self.nodes.get(node_id)?.child_index()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<usize> {
        let matches = |node_id: usize| {
            self.nodes.get(node_id).is_some_and(|node| {
                node.flags.is_in_document()
                    && node.element_data().and_then(|el| el.id()) == Some(id)
            })
        };

        if let Some(&node_id) = self.nodes_to_id.get(id) {
            if matches(node_id) {
                return Some(node_id);
            }
        }

        // The map is a cache: ids can be changed behind its back by cloning or reparenting
        crate::TreeTraverser::new(self).find(|node_id| matches(*node_id))
    }

    /// Generate a document-unique id with the given prefix (eg. `sel-1`)
    pub fn unique_id(&mut self, prefix: &str) -> String {
        loop {
            self.unique_id_counter += 1;
            let candidate = format!("{prefix}{}", self.unique_id_counter);
            if self.get_element_by_id(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Store the border box the embedder computed for a node, in page coordinates
    pub fn set_node_rect(&mut self, node_id: usize, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.rect = Some(rect);
        }
    }

    pub fn node_rect(&self, node_id: usize) -> Option<Rect> {
        self.nodes.get(node_id)?.rect
    }

    /// The node's border box relative to the viewport (`getBoundingClientRect`)
    pub fn client_rect(&self, node_id: usize) -> Option<Rect> {
        let rect = self.node_rect(node_id)?;
        Some(rect - self.viewport_scroll.to_vec2())
    }

    /// Hit test a point given in viewport (client) coordinates.
    ///
    /// Returns the deepest node whose border box contains the point. Later siblings are
    /// assumed to paint on top of earlier ones.
    pub fn hit(&self, x: f32, y: f32) -> Option<HitResult> {
        let point = Point::new(x as f64, y as f64) + self.viewport_scroll.to_vec2();
        self.hit_node(0, point)
    }

    fn hit_node(&self, node_id: usize, point: Point) -> Option<HitResult> {
        let node = self.nodes.get(node_id)?;

        let child_hit = node
            .children
            .iter()
            .rev()
            .find_map(|child_id| self.hit_node(*child_id, point));
        if child_hit.is_some() {
            return child_hit;
        }

        let rect = node.rect?;
        rect.contains(point).then(|| HitResult {
            node_id,
            x: (point.x - rect.x0) as f32,
            y: (point.y - rect.y0) as f32,
        })
    }

    /// Ask the shell to scroll a node into view
    pub fn scroll_into_view(&self, node_id: usize, align_to_top: bool) {
        self.shell_provider.scroll_into_view(node_id, align_to_top);
    }

    pub fn viewport_scroll(&self) -> Point {
        self.viewport_scroll
    }

    pub fn set_viewport_scroll(&mut self, scroll: Point) {
        self.viewport_scroll = scroll;
    }

    pub fn scroll_viewport_by(&mut self, x: f64, y: f64) {
        self.viewport_scroll += Vec2::new(x, y);
        self.viewport_scroll.x = self.viewport_scroll.x.max(0.0);
        self.viewport_scroll.y = self.viewport_scroll.y.max(0.0);
    }

    pub fn get_focussed_node_id(&self) -> Option<usize> {
        self.focus_node_id
    }

    pub fn set_focus_to(&mut self, focus_node_id: usize) -> bool {
        if self.focus_node_id == Some(focus_node_id) || !self.is_connected(focus_node_id) {
            return false;
        }

        tracing::debug!("Focussed node {}", focus_node_id);
        self.focus_node_id = Some(focus_node_id);
        self.shell_provider.request_redraw();
        true
    }

    pub fn clear_focus(&mut self) {
        if self.focus_node_id.take().is_some() {
            self.shell_provider.request_redraw();
        }
    }
}

impl AsRef<BaseDocument> for BaseDocument {
    fn as_ref(&self) -> &BaseDocument {
        self
    }
}

impl AsMut<BaseDocument> for BaseDocument {
    fn as_mut(&mut self) -> &mut BaseDocument {
        self
    }
}
