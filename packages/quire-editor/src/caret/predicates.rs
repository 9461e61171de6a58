//! Classify a [`CaretPosition`] by what sits next to it.
//!
//! The element predicates only look at element containers: a position in a text node is
//! never "before" or "after" an element. The whitespace predicates are the reverse and
//! only answer for text containers.

use quire_dom::{BaseDocument, Node};

use super::CaretPosition;
use crate::node_type::{is_atomic_element, is_cef_node, is_image_block, is_media, is_table};

/// The child of an element container at `offset + relative`
fn child_at_relative_offset<'a>(
    doc: &'a BaseDocument,
    pos: &CaretPosition,
    relative: isize,
) -> Option<&'a Node> {
    let container = doc.get_node(pos.container())?;
    if container.is_text_node() {
        return None;
    }
    let index = pos.offset().checked_add_signed(relative)?;
    let child = *container.children.get(index)?;
    doc.get_node(child)
}

fn matches_element_position(
    doc: &BaseDocument,
    pos: &CaretPosition,
    before: bool,
    predicate: impl Fn(&Node) -> bool,
) -> bool {
    child_at_relative_offset(doc, pos, if before { 0 } else { -1 }).is_some_and(predicate)
}

pub fn is_before_content_editable_false(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, true, is_cef_node)
}

pub fn is_after_content_editable_false(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, false, is_cef_node)
}

pub fn is_before_media(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, true, is_media)
}

pub fn is_after_media(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, false, is_media)
}

pub fn is_before_table(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, true, is_table)
}

pub fn is_after_table(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, false, is_table)
}

pub fn is_before_image_block(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, true, is_image_block)
}

pub fn is_after_image_block(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, false, is_image_block)
}

pub fn is_before_atomic(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, true, is_atomic_element)
}

pub fn is_after_atomic(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    matches_element_position(doc, pos, false, is_atomic_element)
}

fn char_in_text(doc: &BaseDocument, pos: &CaretPosition, offset: Option<usize>) -> Option<char> {
    let text = doc.get_node(pos.container())?.text_data()?;
    text.char_at(offset?)
}

pub fn is_before_space(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    char_in_text(doc, pos, Some(pos.offset())).is_some_and(char::is_whitespace)
}

pub fn is_after_space(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    char_in_text(doc, pos, pos.offset().checked_sub(1)).is_some_and(char::is_whitespace)
}

pub fn is_empty_text(doc: &BaseDocument, pos: &CaretPosition) -> bool {
    doc.get_node(pos.container())
        .and_then(|node| node.text_data())
        .is_some_and(|text| text.content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_dom::DocumentConfig;
    use quire_html::HtmlDocument;
    use rstest::rstest;

    fn paragraph(html: &str) -> (HtmlDocument, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default());
        let p = doc.get_node(doc.body_id()).unwrap().children[0];
        (doc, p)
    }

    #[rstest]
    #[case::media("<p>a<video></video>b</p>", is_before_media, is_after_media)]
    #[case::cef(r#"<p>a<span contenteditable="false">x</span>b</p>"#, is_before_content_editable_false, is_after_content_editable_false)]
    #[case::table("<div>a<table></table>b</div>", is_before_table, is_after_table)]
    #[case::image_block(r#"<p>a<img style="display: block">b</p>"#, is_before_image_block, is_after_image_block)]
    fn categories_match_on_their_side(
        #[case] html: &str,
        #[case] is_before: fn(&BaseDocument, &CaretPosition) -> bool,
        #[case] is_after: fn(&BaseDocument, &CaretPosition) -> bool,
    ) {
        let (doc, p) = paragraph(html);
        let atomic = doc.get_node(p).unwrap().children[1];
        let before = CaretPosition::before(&doc, atomic).unwrap();
        let after = CaretPosition::after(&doc, atomic).unwrap();

        assert!(is_before(&doc, &before));
        assert!(!is_after(&doc, &before));
        assert!(is_after(&doc, &after));
        assert!(!is_before(&doc, &after));
        assert!(is_before_atomic(&doc, &before));
        assert!(is_after_atomic(&doc, &after));
    }

    #[test]
    fn bogus_cef_is_ignored() {
        let (doc, p) = paragraph(
            r#"<p>a<span contenteditable="false" data-quire-bogus="all"></span></p>"#,
        );
        let pos = CaretPosition::new(p, 1);
        assert!(!is_before_content_editable_false(&doc, &pos));
        assert!(!is_before_atomic(&doc, &pos));
    }

    #[test]
    fn text_positions_are_never_next_to_elements() {
        let (doc, p) = paragraph("<p>ab<video></video></p>");
        let text = doc.get_node(p).unwrap().children[0];
        for offset in 0..=2 {
            let pos = CaretPosition::new(text, offset);
            assert!(!is_before_atomic(&doc, &pos));
            assert!(!is_after_atomic(&doc, &pos));
        }
    }

    #[test]
    fn breaks_and_inline_replaced_elements_are_not_atomic() {
        let (doc, p) = paragraph("<p>a<br>b<input><img></p>");
        let children = doc.get_node(p).unwrap().children.clone();
        for node in [children[1], children[3], children[4]] {
            let before = CaretPosition::before(&doc, node).unwrap();
            let after = CaretPosition::after(&doc, node).unwrap();
            assert!(!is_before_atomic(&doc, &before));
            assert!(!is_after_atomic(&doc, &after));
        }
    }

    #[test]
    fn whitespace_checks_need_text() {
        let (doc, p) = paragraph("<p>a b<img></p>");
        let text = doc.get_node(p).unwrap().children[0];

        assert!(is_before_space(&doc, &CaretPosition::new(text, 1)));
        assert!(is_after_space(&doc, &CaretPosition::new(text, 2)));
        assert!(!is_after_space(&doc, &CaretPosition::new(text, 0)));
        assert!(!is_before_space(&doc, &CaretPosition::new(text, 3)));
        assert!(!is_before_space(&doc, &CaretPosition::new(p, 0)));
        assert!(!is_empty_text(&doc, &CaretPosition::new(p, 0)));
        assert!(!is_empty_text(&doc, &CaretPosition::new(text, 0)));
    }
}
