//! Deleting non-editable (`contenteditable="false"`) islands.
//!
//! The first backspace towards an island selects it, the second removes it.

use quire_dom::{BaseDocument, DomRange};

use super::delete_element;
use crate::caret::predicates::{is_after_content_editable_false, is_before_content_editable_false};
use crate::caret::utils::{
    get_normalized_range_end_point, is_in_non_editable_island, is_move_inside_same_block,
    normalize_position,
};
use crate::caret::{CaretPosition, Direction};
use crate::editor::EditorCore;
use crate::node_type::is_cef_node;
use crate::overrides::SelectionOverrides;

pub fn backspace_delete(
    core: &mut EditorCore,
    overrides: &mut SelectionOverrides,
    forward: bool,
) -> bool {
    let Some(range) = overrides.get_range(core) else {
        return false;
    };

    if range.is_collapsed() {
        select_adjacent(core, overrides, forward, &range)
    } else {
        delete_selected(core, overrides, forward)
    }
}

fn is_deletable_island(doc: &BaseDocument, root: usize, node: usize) -> bool {
    doc.get_node(node).is_some_and(is_cef_node)
        && doc.is_ancestor_of(root, node)
        && !is_in_non_editable_island(doc, root, node)
}

/// A collapsed caret against an island on the side of travel selects the island
fn select_adjacent(
    core: &mut EditorCore,
    overrides: &mut SelectionOverrides,
    forward: bool,
    range: &DomRange,
) -> bool {
    let is_near_island = |doc: &BaseDocument, pos: &CaretPosition| {
        if forward {
            is_before_content_editable_false(doc, pos)
        } else {
            is_after_content_editable_false(doc, pos)
        }
    };

    let doc = &core.doc;
    let from = get_normalized_range_end_point(doc, Direction::from_forward(forward), range);
    let pos = if is_near_island(doc, &from) {
        Some(from)
    } else {
        Some(normalize_position(doc, forward, from))
            .filter(|pos| is_near_island(doc, pos) && is_move_inside_same_block(doc, core.root, &from, pos))
    };

    let Some(island) = pos.and_then(|pos| pos.get_node(doc, !forward)) else {
        return false;
    };
    if !is_deletable_island(doc, core.root, island) {
        return false;
    }

    let range = overrides.select_node(core, island);
    let selected = overrides.set_element_selection(core, range, forward).is_some();
    if selected {
        tracing::debug!(island, "Selected island for deletion");
    }
    selected
}

/// An island that already is the element selection is removed
fn delete_selected(core: &mut EditorCore, overrides: &mut SelectionOverrides, forward: bool) -> bool {
    let node = overrides.selected_node(core);
    if !is_deletable_island(&core.doc, core.root, node) {
        return false;
    }
    delete_element(core, overrides, forward, node)
}

#[cfg(test)]
mod tests {
    use crate::{Editor, EditorConfig, NotificationKind};
    use pretty_assertions::assert_eq;
    use quire_dom::{DocumentConfig, DomRange};
    use quire_html::HtmlDocument;
    use quire_traits::HandlerResult;

    fn editor(html: &str) -> (Editor, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default());
        let editor = Editor::from_body(doc, EditorConfig::default());
        let p = editor.doc().get_node(editor.root()).unwrap().children[0];
        (editor, p)
    }

    #[test]
    fn backspace_selects_then_deletes_an_island() {
        let (mut editor, p) = editor(r#"<p>a<span contenteditable="false">x</span>b</p>"#);
        let island = editor.doc().get_node(p).unwrap().children[1];
        let b = editor.doc().get_node(p).unwrap().children[2];
        let a = editor.doc().get_node(p).unwrap().children[0];
        editor.set_rng(DomRange::collapsed_at(b, 0), None);

        assert!(editor.execute_delete_command(false));
        assert_eq!(editor.selected_element(), Some(island));
        assert!(editor.doc().is_connected(island));

        assert!(editor.execute_delete_command(false));
        assert_eq!(editor.selected_element(), None);
        assert_eq!(editor.get_content(), "<p>ab</p>");
        assert_eq!(editor.get_rng(), Some(DomRange::collapsed_at(a, 1)));
    }

    #[test]
    fn plain_text_delete_is_left_alone() {
        let (mut editor, p) = editor(r#"<p>abc<span contenteditable="false">x</span></p>"#);
        let abc = editor.doc().get_node(p).unwrap().children[0];
        editor.set_rng(DomRange::collapsed_at(abc, 1), None);
        assert!(!editor.execute_delete_command(false));
        assert!(!editor.execute_delete_command(true));
    }

    #[test]
    fn cancelled_selection_is_not_handled() {
        let (mut editor, p) = editor(r#"<p>a<span contenteditable="false">x</span></p>"#);
        let a = editor.doc().get_node(p).unwrap().children[0];
        let _veto = editor.on(NotificationKind::BeforeObjectSelected, |_, _| {
            HandlerResult::PreventDefault
        });
        editor.set_rng(DomRange::collapsed_at(a, 1), None);
        assert!(!editor.execute_delete_command(true));
        assert_eq!(editor.selected_element(), None);
    }
}
