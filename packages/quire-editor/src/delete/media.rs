//! Deleting media embeds (`<video>`, `<audio>`, `<iframe>`, `<object>`) as a whole.

use quire_dom::{BaseDocument, DomRange};

use super::delete_element;
use crate::caret::predicates::{is_after_media, is_before_media};
use crate::caret::utils::{get_normalized_range_end_point, is_move_inside_same_block, normalize_position};
use crate::caret::{CaretPosition, Direction};
use crate::editor::EditorCore;
use crate::node_type::is_media;
use crate::overrides::SelectionOverrides;

/// Handle backspace (`forward == false`) or delete next to or over a media element
pub fn backspace_delete(
    core: &mut EditorCore,
    overrides: &mut SelectionOverrides,
    forward: bool,
) -> bool {
    let Some(range) = overrides.get_range(core) else {
        return false;
    };

    if range.is_collapsed() {
        delete_caret(core, overrides, forward, &range)
    } else {
        delete_range(core, overrides, forward)
    }
}

fn delete_caret(
    core: &mut EditorCore,
    overrides: &mut SelectionOverrides,
    forward: bool,
    range: &DomRange,
) -> bool {
    let is_near_media = |doc: &BaseDocument, pos: &CaretPosition| {
        if forward {
            is_before_media(doc, pos)
        } else {
            is_after_media(doc, pos)
        }
    };

    let doc = &core.doc;
    let from = get_normalized_range_end_point(doc, Direction::from_forward(forward), range);
    let target = if is_near_media(doc, &from) {
        from.get_node(doc, !forward)
    } else {
        // Step over an empty inline run (a caret container) between the caret and the media
        let pos = normalize_position(doc, forward, from);
        let reachable = is_near_media(doc, &pos)
            && is_move_inside_same_block(doc, core.root, &from, &pos);
        if reachable {
            pos.get_node(doc, !forward)
        } else {
            None
        }
    };

    match target {
        Some(media) => delete_element(core, overrides, forward, media),
        None => false,
    }
}

fn delete_range(core: &mut EditorCore, overrides: &mut SelectionOverrides, forward: bool) -> bool {
    let node = overrides.selected_node(core);
    if core.doc.get_node(node).is_some_and(is_media) {
        delete_element(core, overrides, forward, node)
    } else {
        false
    }
}
