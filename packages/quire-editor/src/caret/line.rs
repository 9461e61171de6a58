//! Geometric search for the fake caret target closest to a pointer.

use kurbo::Rect;
use quire_dom::{BaseDocument, TreeCursor};

use crate::node_type::{is_atomic, is_bogus_all, is_fake_caret_target};

/// Where a pointer should put the fake caret
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FakeCaretInfo {
    pub node: usize,
    /// The pointer is nearer the node's leading edge
    pub before: bool,
}

#[derive(Clone, Copy, Debug)]
struct NodeRect {
    node: usize,
    rect: Rect,
}

impl NodeRect {
    fn distance_to_x(&self, x: f64) -> f64 {
        if x < self.rect.x0 {
            self.rect.x0 - x
        } else if x > self.rect.x1 {
            x - self.rect.x1
        } else {
            0.0
        }
    }

    fn overlaps_line(&self, line: &Rect) -> bool {
        self.rect.y0 < line.y1 && self.rect.y1 > line.y0
    }
}

fn closest_to_x(rects: impl IntoIterator<Item = NodeRect>, x: f64) -> Option<NodeRect> {
    rects
        .into_iter()
        .min_by(|a, b| a.distance_to_x(x).total_cmp(&b.distance_to_x(x)))
}

/// Client boxes of the fake caret targets under `root`, in document order
fn target_rects(doc: &BaseDocument, root: usize, table_targets: bool) -> Vec<NodeRect> {
    let mut rects = Vec::new();
    let mut cursor = TreeCursor::new(doc, root);
    while let Some(id) = cursor.next() {
        let Some(node) = doc.get_node(id) else {
            continue;
        };
        if id != root && is_bogus_all(node) {
            cursor.skip_subtree();
            continue;
        }
        if id != root && is_fake_caret_target(node, table_targets) {
            rects.extend(doc.client_rect(id).map(|rect| NodeRect { node: id, rect }));
            cursor.skip_subtree();
        }
    }
    rects
}

/// Client boxes of the text runs and atomic elements sharing a line with `line`
fn line_rects(doc: &BaseDocument, root: usize, line: &Rect) -> Vec<NodeRect> {
    let mut rects = Vec::new();
    let mut cursor = TreeCursor::new(doc, root);
    while let Some(id) = cursor.next() {
        let Some(node) = doc.get_node(id) else {
            continue;
        };
        if id == root {
            continue;
        }
        if is_bogus_all(node) {
            cursor.skip_subtree();
            continue;
        }

        let is_leaf = node.is_text_node() || is_atomic(node);
        if is_atomic(node) {
            cursor.skip_subtree();
        }
        if !is_leaf {
            continue;
        }
        if let Some(rect) = doc.client_rect(id) {
            let node_rect = NodeRect { node: id, rect };
            if node_rect.overlaps_line(line) {
                rects.push(node_rect);
            }
        }
    }
    rects
}

/// The fake caret target on the pointer's line that is closest to it horizontally.
///
/// Only targets whose box spans `client_y` are considered. When some other content on
/// that line is closer to the pointer, the native caret wins and `None` is returned.
/// `max_distance` limits how far from the target the pointer may be.
pub fn closest_fake_caret(
    doc: &BaseDocument,
    root: usize,
    client_x: f32,
    client_y: f32,
    table_targets: bool,
    max_distance: Option<f64>,
) -> Option<FakeCaretInfo> {
    let (x, y) = (client_x as f64, client_y as f64);

    let on_line = target_rects(doc, root, table_targets)
        .into_iter()
        .filter(|target| target.rect.y0 <= y && y <= target.rect.y1);
    let closest_target = closest_to_x(on_line, x)?;

    let closest = closest_to_x(line_rects(doc, root, &closest_target.rect), x)?;
    let node = doc.get_node(closest.node)?;
    if !is_fake_caret_target(node, table_targets) {
        return None;
    }
    if max_distance.is_some_and(|max| closest.distance_to_x(x) > max) {
        return None;
    }

    let to_left = (x - closest.rect.x0).abs();
    let to_right = (x - closest.rect.x1).abs();
    Some(FakeCaretInfo {
        node: closest.node,
        before: to_left < to_right,
    })
}
