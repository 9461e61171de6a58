//! Document-level helpers shared by the overrides and the delete logic.

use std::cmp::Ordering;

use kurbo::Point;
use quire_dom::{BaseDocument, BoundaryPoint, DomRange, TreeTraverser};

use super::container::is_caret_container_inline;
use super::{CaretPosition, Direction};
use crate::node_type::{ZWSP, is_br, is_content_editable_false, is_content_editable_true};

/// The nearest inclusive ancestor of `node` below `root` that sets `contenteditable`
/// explicitly
pub fn get_content_editable_root(doc: &BaseDocument, root: usize, node: usize) -> Option<usize> {
    doc.closest(node, Some(root), |node| {
        is_content_editable_true(node) || is_content_editable_false(node)
    })
}

/// Whether `node` sits inside a non-editable island (excluding `node` itself)
pub fn is_in_non_editable_island(doc: &BaseDocument, root: usize, node: usize) -> bool {
    doc.get_node(node)
        .and_then(|node| node.parent)
        .and_then(|parent| get_content_editable_root(doc, root, parent))
        .and_then(|ce_root| doc.get_node(ce_root))
        .is_some_and(is_content_editable_false)
}

/// The nearest inclusive block ancestor of `node`, up to and including `root`
pub fn get_parent_block(doc: &BaseDocument, root: usize, node: usize) -> Option<usize> {
    let schema = doc.schema();
    let mut current = Some(node);
    while let Some(id) = current {
        let node = doc.get_node(id)?;
        if id == root || node.is_block(schema) {
            return Some(id);
        }
        current = node.parent;
    }
    None
}

pub fn is_in_same_block(
    doc: &BaseDocument,
    root: usize,
    a: &CaretPosition,
    b: &CaretPosition,
) -> bool {
    get_parent_block(doc, root, a.container()) == get_parent_block(doc, root, b.container())
}

/// Moving from `from` to `to` does not leave the block, or only steps over a line break
pub fn is_move_inside_same_block(
    doc: &BaseDocument,
    root: usize,
    from: &CaretPosition,
    to: &CaretPosition,
) -> bool {
    is_in_same_block(doc, root, from, to)
        || from
            .get_node(doc, false)
            .and_then(|node| doc.get_node(node))
            .is_some_and(is_br)
}

/// The range end that a `direction` operation starts from, moved out of its text node
/// when only zero width chars separate it from the text node's edge.
///
/// A caret at the edge of a text node is then expressed as an element position, so the
/// element predicates can see what lies beyond the text.
pub fn get_normalized_range_end_point(
    doc: &BaseDocument,
    direction: Direction,
    range: &DomRange,
) -> CaretPosition {
    let pos = match direction {
        Direction::Forward => CaretPosition::from_range_end(range),
        Direction::Backward => CaretPosition::from_range_start(range),
    };
    lean_out_of_text(doc, direction, pos)
}

fn lean_out_of_text(doc: &BaseDocument, direction: Direction, pos: CaretPosition) -> CaretPosition {
    let Some(text) = doc.get_node(pos.container()).and_then(|node| node.text_data()) else {
        return pos;
    };

    let leans = match direction {
        Direction::Backward => text.content.chars().take(pos.offset()).all(|c| c == ZWSP),
        Direction::Forward => text.content.chars().skip(pos.offset()).all(|c| c == ZWSP),
    };

    if !leans {
        return pos;
    }
    let leaned = match direction {
        Direction::Backward => CaretPosition::before(doc, pos.container()),
        Direction::Forward => CaretPosition::after(doc, pos.container()),
    };
    leaned.unwrap_or(pos)
}

/// Step over an inline caret container in the direction of travel.
///
/// A position inside a container moves to the neighbouring text (or the element position)
/// beyond it. A position with a container on the side of travel moves past that container.
pub fn normalize_position(doc: &BaseDocument, forward: bool, pos: CaretPosition) -> CaretPosition {
    let container = pos.container();
    if is_caret_container_inline(doc, container) {
        let Some(node) = doc.get_node(container) else {
            return pos;
        };
        let sibling = if forward {
            node.next_sibling()
        } else {
            node.previous_sibling()
        };
        if let Some(text) = sibling.and_then(|id| doc.get_node(id)).filter(|n| n.is_text_node()) {
            let offset = if forward { 0 } else { text.max_offset() };
            return CaretPosition::new(text.id, offset);
        }
        let moved = if forward {
            CaretPosition::after(doc, container)
        } else {
            CaretPosition::before(doc, container)
        };
        return moved.unwrap_or(pos);
    }

    if pos.is_text_position(doc) {
        return pos;
    }
    match pos.get_node(doc, !forward) {
        Some(node) if is_caret_container_inline(doc, node) => {
            let moved = if forward {
                CaretPosition::after(doc, node)
            } else {
                CaretPosition::before(doc, node)
            };
            moved.unwrap_or(pos)
        }
        _ => pos,
    }
}

/// Move range ends that sit inside void elements (`<img>`, `<br>`, ...) to the matching
/// position in the parent
pub fn normalize_short_ended_element_selection(doc: &BaseDocument, range: DomRange) -> DomRange {
    let is_void = |node: usize| {
        doc.get_node(node)
            .and_then(|node| node.local_name())
            .is_some_and(|name| doc.schema().is_short_ended(name))
    };

    let mut normalized = range;
    if is_void(range.start_container) {
        if range.start_offset == 0 {
            normalized.set_start_before(doc, range.start_container);
        } else {
            normalized.set_start_after(doc, range.start_container);
        }
    }
    if is_void(range.end_container) {
        if range.end_offset == 0 {
            normalized.set_end_before(doc, range.end_container);
        } else {
            normalized.set_end_after(doc, range.end_container);
        }
    }
    normalized
}

/// The client point lies in the editing root's box. Roots without geometry accept every
/// point.
pub fn is_xy_in_content_area(doc: &BaseDocument, root: usize, x: f32, y: f32) -> bool {
    match doc.client_rect(root) {
        Some(rect) => rect.contains(Point::new(x as f64, y as f64)),
        None => true,
    }
}

/// The client point lies in the box of a node covered by the (non-collapsed) range
pub fn is_xy_within_range(doc: &BaseDocument, range: &DomRange, x: f32, y: f32) -> bool {
    if range.is_collapsed() {
        return false;
    }
    let point = Point::new(x as f64, y as f64);
    let Some(common) = range.common_ancestor_container(doc) else {
        return false;
    };

    TreeTraverser::new_with_root(doc, common)
        .filter(|id| *id != common)
        .filter(|id| node_touches_range(doc, range, *id))
        .filter_map(|id| doc.client_rect(id))
        .any(|rect| rect.contains(point))
}

fn node_touches_range(doc: &BaseDocument, range: &DomRange, node: usize) -> bool {
    let Some(parent) = doc.get_node(node).and_then(|node| node.parent) else {
        return false;
    };
    let Some(index) = doc.node_index(node) else {
        return false;
    };
    let before = BoundaryPoint::new(parent, index);
    let after = BoundaryPoint::new(parent, index + 1);
    doc.compare_boundary_points(after, range.start()) == Ordering::Greater
        && doc.compare_boundary_points(before, range.end()) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_dom::DocumentConfig;
    use quire_html::HtmlDocument;
    use pretty_assertions::assert_eq;

    fn paragraph(html: &str) -> (HtmlDocument, usize, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default());
        let body = doc.body_id();
        let p = doc.get_node(body).unwrap().children[0];
        (doc, body, p)
    }

    #[test]
    fn content_editable_root_lookup() {
        let (doc, body, p) = paragraph(
            r#"<p>a<span contenteditable="false"><em contenteditable="true">b</em></span></p>"#,
        );
        let cef = doc.get_node(p).unwrap().children[1];
        let cet = doc.get_node(cef).unwrap().children[0];
        let inner = doc.get_node(cet).unwrap().children[0];

        assert_eq!(get_content_editable_root(&doc, body, inner), Some(cet));
        assert_eq!(get_content_editable_root(&doc, body, cet), Some(cet));
        assert_eq!(get_content_editable_root(&doc, body, p), None);
        assert!(is_in_non_editable_island(&doc, body, cet));
        assert!(!is_in_non_editable_island(&doc, body, cef));
    }

    #[test]
    fn endpoints_lean_out_of_text_edges() {
        let (doc, _, p) = paragraph("<p>ab<video></video>&#xFEFF;cd</p>");
        let children = doc.get_node(p).unwrap().children.clone();
        let (ab, zwsp_cd) = (children[0], children[2]);

        let at_end = DomRange::collapsed_at(ab, 2);
        assert_eq!(
            get_normalized_range_end_point(&doc, Direction::Forward, &at_end),
            CaretPosition::new(p, 1)
        );
        assert_eq!(
            get_normalized_range_end_point(&doc, Direction::Backward, &at_end),
            CaretPosition::new(ab, 2)
        );

        let after_zwsp = DomRange::collapsed_at(zwsp_cd, 1);
        assert_eq!(
            get_normalized_range_end_point(&doc, Direction::Backward, &after_zwsp),
            CaretPosition::new(p, 2)
        );
    }

    #[test]
    fn normalize_position_steps_over_containers() {
        let (mut doc, body, p) = paragraph("<p><video></video>ab</p>");
        let video = doc.get_node(p).unwrap().children[0];
        let container = super::super::container::insert_inline(&mut doc, false, video).unwrap();
        let ab = doc.get_node(p).unwrap().children[2];

        let from = CaretPosition::new(p, 2);
        let to = normalize_position(&doc, false, from);
        assert_eq!(to, CaretPosition::new(p, 1));
        assert!(is_move_inside_same_block(&doc, body, &from, &to));

        assert_eq!(
            normalize_position(&doc, true, CaretPosition::new(container, 1)),
            CaretPosition::new(ab, 0)
        );
        assert_eq!(
            normalize_position(&doc, false, CaretPosition::new(container, 0)),
            CaretPosition::new(p, 1)
        );
    }

    #[test]
    fn void_selection_moves_to_parent() {
        let (doc, _, p) = paragraph("<p><img><img></p>");
        let first = doc.get_node(p).unwrap().children[0];
        let second = doc.get_node(p).unwrap().children[1];

        let range = normalize_short_ended_element_selection(&doc, DomRange::collapsed_at(first, 1));
        assert_eq!(range, DomRange::collapsed_at(p, 1));
        let range = normalize_short_ended_element_selection(&doc, DomRange::collapsed_at(second, 0));
        assert_eq!(range, DomRange::collapsed_at(p, 1));
    }
}
