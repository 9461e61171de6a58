use crate::node::ElementData;
use crate::{Attribute, BaseDocument, NodeData, QualName, local_name, qual_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendTextErr {
    /// The node is not a text node
    NotTextNode,
}

pub struct DocumentMutator<'doc> {
    /// Document is public as an escape hatch, but users of this API should ideally avoid using it
    /// and prefer exposing additional functionality in DocumentMutator.
    pub doc: &'doc mut BaseDocument,

    /// Whether anything observable changed since the last flush
    changed: bool,
}

impl Drop for DocumentMutator<'_> {
    fn drop(&mut self) {
        self.flush(); // Defined at bottom of file
    }
}

impl DocumentMutator<'_> {
    pub fn new<'doc>(doc: &'doc mut BaseDocument) -> DocumentMutator<'doc> {
        DocumentMutator {
            doc,
            changed: false,
        }
    }

    pub fn node_has_parent(&self, node_id: usize) -> bool {
        self.doc.nodes[node_id].parent.is_some()
    }

    pub fn previous_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].backward(1).map(|node| node.id)
    }

    pub fn next_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].forward(1).map(|node| node.id)
    }

    pub fn last_child_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].children.last().copied()
    }

    pub fn element_name(&self, node_id: usize) -> Option<&QualName> {
        self.doc.nodes[node_id].element_data().map(|el| &el.name)
    }

    pub fn create_comment_node(&mut self) -> usize {
        self.doc.create_node(NodeData::Comment)
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.doc.create_text_node(text)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> usize {
        let data = ElementData::new(name, attrs);
        let id = self.doc.create_node(NodeData::Element(data));

        // If the node has an "id" attribute, store it in the ID map.
        if let Some(id_attr) = self.doc.nodes[id].attr(local_name!("id")) {
            self.doc.nodes_to_id.insert(id_attr.to_string(), id);
        }

        id
    }

    /// Remove all of the children from old_parent_id and append them to new_parent_id
    pub fn reparent_children(&mut self, old_parent_id: usize, new_parent_id: usize) {
        let child_ids = self.doc.nodes[old_parent_id].children.clone();
        self.append_children(new_parent_id, &child_ids);
    }

    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) {
        self.doc.append(parent_id, child_ids);
        self.changed = true;
    }

    pub fn replace_node_with(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.doc.insert_before(anchor_node_id, new_node_ids);
        self.doc.remove_node(anchor_node_id);
        self.changed = true;
    }

    /// Detach a node from the tree. It stays allocated so it can be re-inserted.
    pub fn remove_node(&mut self, node_id: usize) {
        self.doc.remove_node(node_id);
        self.changed = true;
    }

    pub fn remove_and_drop_node(&mut self, node_id: usize) {
        self.doc.remove_and_drop_node(node_id);
        self.changed = true;
    }

    pub fn insert_nodes_after(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        let Some(parent_id) = self.doc.nodes[anchor_node_id].parent else {
            return;
        };

        match self.next_sibling_id(anchor_node_id) {
            Some(next_sibling_id) => self.doc.insert_before(next_sibling_id, new_node_ids),
            None => self.doc.append(parent_id, new_node_ids),
        }
        self.changed = true;
    }

    pub fn insert_nodes_before(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.doc.insert_before(anchor_node_id, new_node_ids);
        self.changed = true;
    }

    pub fn remove_node_if_unparented(&mut self, node_id: usize) {
        if let Some(node) = self.doc.get_node(node_id) {
            if node.parent.is_none() {
                self.doc.remove_and_drop_node(node_id);
            }
        }
    }

    pub fn append_text_to_node(&mut self, node_id: usize, text: &str) -> Result<(), AppendTextErr> {
        match self.doc.nodes[node_id].text_data_mut() {
            Some(data) => {
                data.content += text;
                self.changed = true;
                Ok(())
            }
            None => Err(AppendTextErr::NotTextNode),
        }
    }

    pub fn set_node_text(&mut self, node_id: usize, value: &str) {
        let Some(text) = self.doc.nodes[node_id].text_data_mut() else {
            return;
        };

        if text.content != value {
            text.content.clear();
            text.content.push_str(value);
            self.changed = true;
        }
    }

    /// Split a text node at a char offset (`Text.splitText`).
    ///
    /// The original node keeps `[0, offset)`. A new text node holding the remainder is inserted
    /// as its next sibling (when it has a parent) and its id returned.
    pub fn split_text(&mut self, node_id: usize, offset: usize) -> Option<usize> {
        let text = self.doc.nodes[node_id].text_data_mut()?;
        let split_at = text.byte_index(offset);
        let tail = text.content.split_off(split_at);

        let new_id = self.doc.create_text_node(&tail);
        if self.node_has_parent(node_id) {
            self.insert_nodes_after(node_id, &[new_id]);
        }
        self.changed = true;
        Some(new_id)
    }

    pub fn deep_clone_node(&mut self, node_id: usize) -> usize {
        self.doc.deep_clone_node(node_id)
    }

    pub fn add_attrs_if_missing(&mut self, node_id: usize, attrs: Vec<Attribute>) {
        let Some(element_data) = self.doc.nodes[node_id].element_data() else {
            return;
        };
        let missing: Vec<Attribute> = attrs
            .into_iter()
            .filter(|attr| !element_data.has_attr(attr.name.local.clone()))
            .collect();

        for attr in missing {
            self.set_attribute(node_id, attr.name, &attr.value);
        }
    }

    pub fn set_attribute(&mut self, node_id: usize, name: QualName, value: &str) {
        let Some(element) = self.doc.nodes[node_id].element_data_mut() else {
            return;
        };

        let is_id = name.local == local_name!("id");
        let old_id = if is_id {
            element.id().map(str::to_string)
        } else {
            None
        };

        if element.attrs.set(name, value) {
            self.changed = true;
        }

        if is_id {
            if let Some(old_id) = old_id {
                if self.doc.nodes_to_id.get(&old_id) == Some(&node_id) {
                    self.doc.nodes_to_id.remove(&old_id);
                }
            }
            self.doc.nodes_to_id.insert(value.to_string(), node_id);
        }
    }

    pub fn clear_attribute(&mut self, node_id: usize, name: QualName) {
        let node = &mut self.doc.nodes[node_id];
        let Some(element) = node.element_data_mut() else {
            return;
        };

        if let Some(removed) = element.attrs.remove(&name.local) {
            if name.local == local_name!("id")
                && self.doc.nodes_to_id.get(&removed.value) == Some(&node_id)
            {
                self.doc.nodes_to_id.remove(&removed.value);
            }
            self.changed = true;
        }
    }

    /// Set a single declaration in the element's inline `style` attribute
    pub fn set_style_property(&mut self, node_id: usize, name: &str, value: &str) {
        let Some(element) = self.doc.nodes[node_id].element_data() else {
            return;
        };

        let mut declarations = style_declarations(element);
        match declarations.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(decl) => decl.1 = value.to_string(),
            None => declarations.push((name.to_string(), value.to_string())),
        }
        self.write_style(node_id, &declarations);
    }

    pub fn remove_style_property(&mut self, node_id: usize, name: &str) {
        let Some(element) = self.doc.nodes[node_id].element_data() else {
            return;
        };

        let mut declarations = style_declarations(element);
        declarations.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.write_style(node_id, &declarations);
    }

    fn write_style(&mut self, node_id: usize, declarations: &[(String, String)]) {
        if declarations.is_empty() {
            self.clear_attribute(node_id, qual_name!("style"));
            return;
        }

        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(node_id, qual_name!("style"), &style);
    }
}

impl<'doc> DocumentMutator<'doc> {
    pub fn flush(&mut self) {
        if std::mem::take(&mut self.changed) {
            self.doc.shell_provider.request_redraw();
        }
    }
}

fn style_declarations(element: &ElementData) -> Vec<(String, String)> {
    element
        .attr(local_name!("style"))
        .unwrap_or("")
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}
