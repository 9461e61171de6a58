use bitflags::bitflags;
use kurbo::{Rect, Vec2};
use markup5ever::LocalName;
use slab::Slab;

use super::{Attribute, ElementData};
use crate::Schema;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayOuter {
    Block,
    Inline,
    None,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u32 {
        /// Whether the node is "in the document" (~= is reachable from the document node)
        const IS_IN_DOCUMENT = 0b00000001;
    }
}

impl NodeFlags {
    #[inline(always)]
    pub fn is_in_document(&self) -> bool {
        self.contains(Self::IS_IN_DOCUMENT)
    }
}

pub struct Node {
    // The actual tree we belong to. This is unsafe!!
    tree: *mut Slab<Node>,

    /// Our Id
    pub id: usize,
    /// Our parent's ID
    pub parent: Option<usize>,
    // What are our children?
    pub children: Vec<usize>,

    // Flags
    pub flags: NodeFlags,

    /// Node type (Element, TextNode, etc) specific data
    pub data: NodeData,

    /// Border box in page coordinates, as computed by the embedder's layout.
    /// `None` for nodes the embedder never measured.
    pub rect: Option<Rect>,
    pub scroll_offset: Vec2,
}

impl Node {
    pub(crate) fn new(tree: *mut Slab<Node>, id: usize, data: NodeData) -> Self {
        Self {
            tree,

            id,
            parent: None,
            children: vec![],

            flags: NodeFlags::empty(),
            data,

            rect: None,
            scroll_offset: Vec2::ZERO,
        }
    }

    /// Outer display type: an inline `display` declaration wins over the schema's block list.
    pub fn display_outer(&self, schema: &Schema) -> DisplayOuter {
        let Some(el) = self.element_data() else {
            return DisplayOuter::Inline;
        };
        match el.style_property("display") {
            Some("none") => DisplayOuter::None,
            Some(
                "block" | "flex" | "grid" | "table" | "list-item" | "flow-root",
            ) => DisplayOuter::Block,
            Some(_) => DisplayOuter::Inline,
            None if schema.is_block(&el.name.local) => DisplayOuter::Block,
            None => DisplayOuter::Inline,
        }
    }

    pub fn is_block(&self, schema: &Schema) -> bool {
        self.display_outer(schema) == DisplayOuter::Block
    }
}

/// The different kinds of nodes in the DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The `Document` itself - the root node of a HTML document.
    Document,

    /// An element with attributes.
    Element(ElementData),

    /// A text node.
    Text(TextNodeData),

    /// A comment.
    Comment,
}

impl NodeData {
    pub fn downcast_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_element_with_tag_name(&self, name: &impl PartialEq<LocalName>) -> bool {
        let Some(elem) = self.downcast_element() else {
            return false;
        };
        *name == elem.name.local
    }

    pub fn attrs(&self) -> Option<&[Attribute]> {
        Some(&self.downcast_element()?.attrs)
    }

    pub fn attr(&self, name: impl PartialEq<LocalName>) -> Option<&str> {
        self.downcast_element()?.attr(name)
    }

    pub fn has_attr(&self, name: impl PartialEq<LocalName>) -> bool {
        self.downcast_element()
            .is_some_and(|elem| elem.has_attr(name))
    }
}

#[derive(Debug, Clone)]
pub struct TextNodeData {
    /// The textual content of the text node
    pub content: String,
}

impl TextNodeData {
    pub fn new(content: String) -> Self {
        Self { content }
    }

    /// Length in chars. Caret offsets into text are char offsets.
    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.content.chars().nth(offset)
    }

    /// Byte index of the char at `offset`, clamped to the end of the content
    pub fn byte_index(&self, offset: usize) -> usize {
        self.content
            .char_indices()
            .nth(offset)
            .map(|(idx, _)| idx)
            .unwrap_or(self.content.len())
    }
}

impl Node {
    pub fn tree(&self) -> &Slab<Node> {
        unsafe { &*self.tree }
    }

    #[track_caller]
    pub fn with(&self, id: usize) -> &Node {
        self.tree().get(id).unwrap()
    }

    // Get the index of the child in our child list
    pub fn index_of_child(&self, child_id: usize) -> Option<usize> {
        self.children.iter().position(|id| *id == child_id)
    }

    // Get the index of the current node in the parents child list
    pub fn child_index(&self) -> Option<usize> {
        self.tree()[self.parent?]
            .children
            .iter()
            .position(|id| *id == self.id)
    }

    // Get the nth node in the parents child list
    pub fn forward(&self, n: usize) -> Option<&Node> {
        let child_idx = self.child_index()?;
        self.tree()[self.parent?]
            .children
            .get(child_idx + n)
            .map(|id| self.with(*id))
    }

    pub fn backward(&self, n: usize) -> Option<&Node> {
        let child_idx = self.child_index()?;
        if child_idx < n {
            return None;
        }

        self.tree()[self.parent?]
            .children
            .get(child_idx - n)
            .map(|id| self.with(*id))
    }

    pub fn next_sibling(&self) -> Option<usize> {
        self.forward(1).map(|node| node.id)
    }

    pub fn previous_sibling(&self) -> Option<usize> {
        self.backward(1).map(|node| node.id)
    }

    pub fn first_child(&self) -> Option<usize> {
        self.children.first().copied()
    }

    pub fn last_child(&self) -> Option<usize> {
        self.children.last().copied()
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        match self.data {
            NodeData::Element(ref data) => Some(data),
            _ => None,
        }
    }

    pub fn element_data_mut(&mut self) -> Option<&mut ElementData> {
        match self.data {
            NodeData::Element(ref mut data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data(&self) -> Option<&TextNodeData> {
        match self.data {
            NodeData::Text(ref data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data_mut(&mut self) -> Option<&mut TextNodeData> {
        match self.data {
            NodeData::Text(ref mut data) => Some(data),
            _ => None,
        }
    }

    /// The element's local tag name, if this is an element
    pub fn local_name(&self) -> Option<&LocalName> {
        self.element_data().map(|el| &el.name.local)
    }

    pub fn is_element_named(&self, name: &str) -> bool {
        self.local_name().is_some_and(|local| &**local == name)
    }

    /// The DOM "length" of the node: char count for text, child count otherwise.
    /// Valid caret offsets into the node are `0..=max_offset()`.
    pub fn max_offset(&self) -> usize {
        match &self.data {
            NodeData::Text(data) => data.len_chars(),
            NodeData::Comment => 0,
            _ => self.children.len(),
        }
    }

    pub fn attrs(&self) -> Option<&[Attribute]> {
        Some(&self.element_data()?.attrs)
    }

    pub fn attr(&self, name: LocalName) -> Option<&str> {
        let attr = self.attrs()?.iter().find(|id| id.name.local == name)?;
        Some(&attr.value)
    }

    pub fn has_attr(&self, name: LocalName) -> bool {
        self.data.has_attr(name)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text_content(&mut out);
        out
    }

    fn write_text_content(&self, out: &mut String) {
        match &self.data {
            NodeData::Text(data) => {
                out.push_str(&data.content);
            }
            NodeData::Element(..) | NodeData::Document => {
                for child_id in self.children.iter() {
                    self.with(*child_id).write_text_content(out);
                }
            }
            NodeData::Comment => {}
        }
    }
}

/// It might be wrong to expose this since what does *equality* mean outside the dom?
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("node", &self.data)
            .field("rect", &self.rect)
            .finish()
    }
}
