//! Caret containers: transient nodes that give the native caret a home next to an atomic
//! element.
//!
//! Inline containers are text nodes starting with [`ZWSP`]. Block containers are
//! paragraphs marked with [`CARET_ATTR`] and `bogus="all"`, holding a bogus `<br>` so
//! they have a line box. Neither kind is ever serialized.

use quire_dom::util::{attr_name, html_name};
use quire_dom::{Attribute, BaseDocument, DomRange, qual_name};

use super::CaretPosition;
use crate::node_type::{
    BOGUS_ATTR, CARET_ATTR, ZWSP, attr, is_bogus, is_br, is_content_editable_false,
};

fn text_content(doc: &BaseDocument, node: usize) -> Option<&str> {
    Some(&doc.get_node(node)?.text_data()?.content)
}

pub fn is_caret_container_inline(doc: &BaseDocument, node: usize) -> bool {
    text_content(doc, node).is_some_and(|text| text.starts_with(ZWSP))
}

/// A block container, or a text node directly inside one
pub fn is_caret_container_block(doc: &BaseDocument, node: usize) -> bool {
    let Some(mut current) = doc.get_node(node) else {
        return false;
    };
    if current.is_text_node() {
        match current.parent.and_then(|parent| doc.get_node(parent)) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    attr(current, CARET_ATTR).is_some()
}

pub fn is_caret_container(doc: &BaseDocument, node: usize) -> bool {
    is_caret_container_inline(doc, node) || is_caret_container_block(doc, node)
}

pub fn starts_with_caret_container(doc: &BaseDocument, node: usize) -> bool {
    text_content(doc, node).is_some_and(|text| text.starts_with(ZWSP))
}

pub fn ends_with_caret_container(doc: &BaseDocument, node: usize) -> bool {
    text_content(doc, node).is_some_and(|text| text.ends_with(ZWSP))
}

/// Whether a block container holds anything besides its placeholder `<br>`
pub fn has_content(doc: &BaseDocument, node: usize) -> bool {
    let Some(node) = doc.get_node(node) else {
        return false;
    };
    match node.children.as_slice() {
        [only] => !doc.get_node(*only).is_some_and(is_br),
        _ => true,
    }
}

/// Insert (or reuse) an inline container directly before or after `node`.
///
/// An adjacent sibling that already is a container is reused. A text sibling that ends
/// (before) or starts (after) with a zero width char is split so the char becomes a
/// container of its own. Returns `None` for parentless nodes.
pub fn insert_inline(doc: &mut BaseDocument, before: bool, node: usize) -> Option<usize> {
    let current = doc.get_node(node)?;
    current.parent?;
    let sibling = if before {
        current.previous_sibling()
    } else {
        current.next_sibling()
    };

    if let Some(sibling) = sibling {
        if let Some(text) = text_content(doc, sibling) {
            let len = text.chars().count();
            if len == 1 && text.starts_with(ZWSP) {
                return Some(sibling);
            }
            if before && text.ends_with(ZWSP) {
                return doc.mutate().split_text(sibling, len - 1);
            }
            if !before && text.starts_with(ZWSP) {
                doc.mutate().split_text(sibling, 1)?;
                return Some(sibling);
            }
        }
    }

    let mut mutr = doc.mutate();
    let container = mutr.create_text_node(&ZWSP.to_string());
    if before {
        mutr.insert_nodes_before(node, &[container]);
    } else {
        mutr.insert_nodes_after(node, &[container]);
    }
    Some(container)
}

/// Insert a block container element named `name` before or after `node`
pub fn insert_block(
    doc: &mut BaseDocument,
    name: &str,
    before: bool,
    node: usize,
) -> Option<usize> {
    doc.get_node(node)?.parent?;

    let mut mutr = doc.mutate();
    let block = mutr.create_element(
        html_name(name),
        vec![
            Attribute::new(CARET_ATTR, if before { "before" } else { "after" }),
            Attribute::new(BOGUS_ATTR, "all"),
        ],
    );
    let br = mutr.create_element(qual_name!("br", html), vec![Attribute::new(BOGUS_ATTR, "1")]);
    mutr.append_children(block, &[br]);
    if before {
        mutr.insert_nodes_before(node, &[block]);
    } else {
        mutr.insert_nodes_after(node, &[block]);
    }
    Some(block)
}

/// Insert a block container for block nodes and an inline one otherwise
pub fn insert(doc: &mut BaseDocument, before: bool, node: usize) -> Option<usize> {
    let is_block = doc.get_node(node)?.is_block(doc.schema());
    if is_block {
        insert_block(doc, "p", before, node)
    } else {
        insert_inline(doc, before, node)
    }
}

/// Turn a block container into a regular paragraph once it is being typed into.
///
/// Returns the element when it was a block container.
pub fn show_caret_container_block(doc: &mut BaseDocument, node: usize) -> Option<usize> {
    if attr(doc.get_node(node)?, CARET_ATTR).is_none() {
        return None;
    }

    let trailing_bogus_br = doc
        .get_node(node)?
        .children
        .iter()
        .rev()
        .copied()
        .find(|child| doc.get_node(*child).is_some_and(is_br))
        .filter(|br| doc.get_node(*br).is_some_and(is_bogus));

    let mut mutr = doc.mutate();
    if let Some(br) = trailing_bogus_br {
        mutr.remove_and_drop_node(br);
    }
    mutr.clear_attribute(node, attr_name(CARET_ATTR));
    mutr.clear_attribute(node, attr_name(BOGUS_ATTR));
    mutr.clear_attribute(node, qual_name!("style"));
    Some(node)
}

/// Remove a caret container.
///
/// Block containers the user typed into are kept as regular content. Inline containers
/// lose their zero width chars and are dropped once empty.
pub fn remove(doc: &mut BaseDocument, node: usize) {
    if !doc.tree().contains(node) {
        return;
    }

    if let Some(text) = text_content(doc, node) {
        if !text.contains(ZWSP) {
            return;
        }
        let stripped: String = text.chars().filter(|c| *c != ZWSP).collect();
        let mut mutr = doc.mutate();
        if stripped.is_empty() {
            mutr.remove_and_drop_node(node);
        } else {
            mutr.set_node_text(node, &stripped);
        }
        return;
    }

    if !is_caret_container_block(doc, node) {
        return;
    }
    if has_content(doc, node) {
        let mut mutr = doc.mutate();
        mutr.clear_attribute(node, attr_name(CARET_ATTR));
        mutr.clear_attribute(node, attr_name(BOGUS_ATTR));
        mutr.clear_attribute(node, qual_name!("style"));
    } else {
        doc.mutate().remove_and_drop_node(node);
    }
}

/// Strip the zero width chars left next to every non-editable element under `root`
pub fn trim_inline_caret_containers(doc: &mut BaseDocument, root: usize) {
    let islands: Vec<usize> = quire_dom::TreeTraverser::new_with_root(doc, root)
        .filter(|id| doc.get_node(*id).is_some_and(is_content_editable_false))
        .collect();

    for island in islands {
        let Some(node) = doc.get_node(island) else {
            continue;
        };
        let (previous, next) = (node.previous_sibling(), node.next_sibling());

        if let Some(previous) = previous.filter(|id| ends_with_caret_container(doc, *id)) {
            trim_text(doc, previous, false);
        }
        if let Some(next) = next.filter(|id| starts_with_caret_container(doc, *id)) {
            trim_text(doc, next, true);
        }
    }
}

fn trim_text(doc: &mut BaseDocument, node: usize, at_start: bool) {
    let Some(text) = text_content(doc, node) else {
        return;
    };
    let mut chars: Vec<char> = text.chars().collect();
    if chars.len() <= 1 {
        doc.mutate().remove_and_drop_node(node);
        return;
    }
    if at_start {
        chars.remove(0);
    } else {
        chars.pop();
    }
    let trimmed: String = chars.into_iter().collect();
    doc.mutate().set_node_text(node, &trimmed);
}

/// The position is right before the zero width char of an inline container
pub fn is_before_inline(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    let Some(node) = doc.get_node(pos.container()) else {
        return false;
    };
    let Some(text) = node.text_data() else {
        return false;
    };
    text.char_at(pos.offset()) == Some(ZWSP)
        || (pos.is_at_start()
            && node
                .previous_sibling()
                .is_some_and(|previous| is_caret_container_inline(doc, previous)))
}

/// The position is right after the zero width char of an inline container
pub fn is_after_inline(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    let Some(node) = doc.get_node(pos.container()) else {
        return false;
    };
    let Some(text) = node.text_data() else {
        return false;
    };
    let previous_char = pos.offset().checked_sub(1).and_then(|offset| text.char_at(offset));
    previous_char == Some(ZWSP)
        || (pos.is_at_end(doc)
            && node
                .next_sibling()
                .is_some_and(|next| is_caret_container_inline(doc, next)))
}

pub fn is_range_in_caret_container_block(doc: &BaseDocument, range: &DomRange) -> bool {
    is_caret_container_block(doc, range.start_container)
}

/// Either end of the range lies in a caret container, including an inline container the
/// user has already typed into.
pub fn is_range_in_caret_container(doc: &BaseDocument, range: &DomRange) -> bool {
    let within = |node: usize| {
        is_caret_container(doc, node)
            || starts_with_caret_container(doc, node)
            || ends_with_caret_container(doc, node)
    };
    within(range.start_container) || within(range.end_container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_dom::DocumentConfig;
    use quire_html::HtmlDocument;
    use pretty_assertions::assert_eq;

    fn paragraph(html: &str) -> (HtmlDocument, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default());
        let p = doc.get_node(doc.body_id()).unwrap().children[0];
        (doc, p)
    }

    #[test]
    fn inline_container_is_reused() {
        let (mut doc, p) = paragraph(r#"<p>a<span contenteditable="false">x</span></p>"#);
        let cef = doc.get_node(p).unwrap().children[1];

        let first = insert_inline(&mut doc, false, cef).unwrap();
        let second = insert_inline(&mut doc, false, cef).unwrap();
        assert_eq!(first, second);
        assert!(is_caret_container_inline(&doc, first));
        assert_eq!(doc.get_node(p).unwrap().children.len(), 3);
        assert_eq!(doc.get_node(cef).unwrap().next_sibling(), Some(first));
    }

    #[test]
    fn inline_container_splits_trailing_zwsp() {
        let (mut doc, p) =
            paragraph(r#"<p>ab&#xFEFF;<span contenteditable="false">x</span></p>"#);
        let cef = doc.get_node(p).unwrap().children[1];
        let text = doc.get_node(p).unwrap().children[0];

        let container = insert_inline(&mut doc, true, cef).unwrap();
        assert_ne!(container, text);
        assert_eq!(doc.get_node(text).unwrap().text_content(), "ab");
        assert_eq!(doc.get_node(cef).unwrap().previous_sibling(), Some(container));
    }

    #[test]
    fn block_container_round_trip() {
        let (mut doc, p) = paragraph(r#"<p contenteditable="false">x</p>"#);
        let body = doc.body_id();

        let block = insert(&mut doc, true, p).unwrap();
        assert!(is_caret_container_block(&doc, block));
        assert!(!has_content(&doc, block));
        assert_eq!(
            doc.outer_html(block),
            r#"<p data-quire-caret="before" data-quire-bogus="all"><br data-quire-bogus="1"></p>"#
        );

        remove(&mut doc, block);
        assert_eq!(doc.get_node(body).unwrap().children, vec![p]);
    }

    #[test]
    fn typed_block_container_is_kept() {
        let (mut doc, p) = paragraph(r#"<p contenteditable="false">x</p>"#);
        let block = insert_block(&mut doc, "p", false, p).unwrap();
        let text = doc.create_text_node("typed");
        doc.append(block, &[text]);

        assert_eq!(show_caret_container_block(&mut doc, block), Some(block));
        assert_eq!(doc.outer_html(block), "<p>typed</p>");
        assert_eq!(show_caret_container_block(&mut doc, block), None);
    }

    #[test]
    fn trims_zwsp_around_islands() {
        let (mut doc, p) = paragraph(
            r#"<p>a&#xFEFF;<span contenteditable="false">x</span>&#xFEFF;</p>"#,
        );
        let body = doc.body_id();
        trim_inline_caret_containers(&mut doc, body);
        assert_eq!(
            doc.inner_html(p),
            r#"a<span contenteditable="false">x</span>"#
        );
    }

    #[test]
    fn inline_boundaries() {
        let (mut doc, p) = paragraph("<p>ab</p>");
        let text = doc.get_node(p).unwrap().children[0];
        let container = insert_inline(&mut doc, false, text).unwrap();

        assert!(is_before_inline(&doc, &CaretPosition::new(container, 0)));
        assert!(is_after_inline(&doc, &CaretPosition::new(container, 1)));
        assert!(is_after_inline(&doc, &CaretPosition::new(text, 2)));
        assert!(!is_after_inline(&doc, &CaretPosition::new(text, 1)));
        assert!(is_range_in_caret_container(&doc, &DomRange::collapsed_at(container, 1)));
        assert!(!is_range_in_caret_container_block(&doc, &DomRange::collapsed_at(container, 1)));
    }

    #[test]
    fn typed_inline_container_still_holds_the_range() {
        let (doc, p) = paragraph("<p>z&#xFEFF;<b>ab</b></p>");
        let typed = doc.get_node(p).unwrap().children[0];
        let bold = doc.get_node(p).unwrap().children[1];
        let plain = doc.get_node(bold).unwrap().children[0];

        assert!(!is_caret_container(&doc, typed));
        assert!(is_range_in_caret_container(&doc, &DomRange::collapsed_at(typed, 1)));
        assert!(is_range_in_caret_container(
            &doc,
            &DomRange::new(typed, 1, plain, 1)
        ));
        assert!(!is_range_in_caret_container(&doc, &DomRange::collapsed_at(plain, 1)));
    }
}
