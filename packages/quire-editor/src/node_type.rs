//! Node classification used throughout the caret code.
//!
//! Everything here is a pure function of a single node. Document-level questions (is the
//! node connected, is it inside a non-editable island) live with the caret utilities.

use quire_dom::{LocalName, Node, Schema};

/// Marks editor-internal nodes. `"all"` drops the whole subtree on serialization.
pub const BOGUS_ATTR: &str = "data-quire-bogus";
/// Set on the element that is the current element selection
pub const SELECTED_ATTR: &str = "data-quire-selected";
/// Set on block caret containers, valued `"before"` or `"after"`
pub const CARET_ATTR: &str = "data-quire-caret";

pub const OFFSCREEN_SELECTION_CLASS: &str = "quire-offscreen-selection";
pub const VISUAL_CARET_CLASS: &str = "quire-visual-caret";
pub const VISUAL_CARET_BEFORE_CLASS: &str = "quire-visual-caret-before";

/// The id of the paste staging element. Selections moved into it leave the fake caret alone.
pub const PASTE_BIN_ID: &str = "quire-pastebin";

/// Zero width no-break space, the content of an inline caret container
pub const ZWSP: char = '\u{FEFF}';
pub const NBSP: char = '\u{A0}';

pub fn attr<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    node.attr(LocalName::from(name))
}

fn content_editable(node: &Node) -> Option<&str> {
    attr(node, "contenteditable")
}

pub fn is_content_editable_true(node: &Node) -> bool {
    content_editable(node)
        .is_some_and(|value| value.is_empty() || value.eq_ignore_ascii_case("true"))
}

pub fn is_content_editable_false(node: &Node) -> bool {
    content_editable(node).is_some_and(|value| value.eq_ignore_ascii_case("false"))
}

pub fn is_bogus(node: &Node) -> bool {
    attr(node, BOGUS_ATTR).is_some()
}

pub fn is_bogus_all(node: &Node) -> bool {
    attr(node, BOGUS_ATTR) == Some("all")
}

pub fn is_media(node: &Node) -> bool {
    matches!(
        node.local_name().map(|name| &**name),
        Some("video" | "audio" | "iframe" | "object")
    )
}

pub fn is_table(node: &Node) -> bool {
    node.is_element_named("table")
}

pub fn is_table_cell(node: &Node) -> bool {
    node.is_element_named("td") || node.is_element_named("th")
}

pub fn is_img(node: &Node) -> bool {
    node.is_element_named("img")
}

pub fn is_br(node: &Node) -> bool {
    node.is_element_named("br")
}

/// An `<img>` laid out as a block
pub fn is_image_block(node: &Node) -> bool {
    is_img(node)
        && node
            .element_data()
            .and_then(|el| el.style_property("display"))
            .is_some_and(|display| display.eq_ignore_ascii_case("block"))
}

/// Inline elements with no caret positions inside them
pub fn is_atomic_inline(node: &Node) -> bool {
    matches!(
        node.local_name().map(|name| &**name),
        Some(
            "img" | "input" | "textarea" | "select" | "hr" | "iframe" | "video" | "audio"
                | "object" | "embed"
        )
    )
}

/// A non-editable island root that is not an editor-internal node
pub fn is_cef_node(node: &Node) -> bool {
    is_content_editable_false(node) && !is_bogus_all(node)
}

/// Elements treated as one indivisible unit by the caret: the caret can sit before or
/// after them but never inside.
pub fn is_atomic(node: &Node) -> bool {
    if !node.is_element() || is_bogus_all(node) {
        return false;
    }
    is_cef_node(node) || is_media(node) || is_table(node) || is_atomic_inline(node) || is_br(node)
}

/// The element kinds the position predicates treat as atomic: non-editable roots, media,
/// tables and block images. Inline replaced elements and `<br>` only matter to the walker.
pub fn is_atomic_element(node: &Node) -> bool {
    if !node.is_element() || is_bogus_all(node) {
        return false;
    }
    is_cef_node(node) || is_media(node) || is_table(node) || is_image_block(node)
}

/// Whether the fake caret may attach to `node`. Tables only qualify when the host asks
/// for it.
pub fn is_fake_caret_target(node: &Node, table_targets: bool) -> bool {
    if is_bogus_all(node) {
        return false;
    }
    is_content_editable_false(node) || is_media(node) || (table_targets && is_table(node))
}

pub fn is_inline_fake_caret_target(node: &Node, schema: &Schema, table_targets: bool) -> bool {
    is_fake_caret_target(node, table_targets) && !node.is_block(schema)
}
