use quire_dom::{Attribute, BaseDocument, DomRange, qual_name};

use crate::editor::EditorCore;
use crate::node_type::BOGUS_ATTR;
use crate::overrides::SelectionOverrides;

/// Remove `element` as a unit and put the caret where it was.
///
/// The element goes first; the fake caret and element selection are cleared afterwards.
/// A block left empty is padded with a bogus `<br>`. The caret moves into neighbouring
/// text when there is some, preferring the side of travel.
pub fn delete_element(
    core: &mut EditorCore,
    overrides: &mut SelectionOverrides,
    forward: bool,
    element: usize,
) -> bool {
    let Some(node) = core.doc.get_node(element) else {
        return false;
    };
    let Some(parent) = node.parent else {
        return false;
    };
    let (previous, next) = (node.previous_sibling(), node.next_sibling());

    core.doc.mutate().remove_and_drop_node(element);
    overrides.hide_fake_caret(core);
    overrides.remove_element_selection(core);
    tracing::debug!(element, forward, "Deleted atomic element");

    let doc = &mut core.doc;
    let is_sibling = |doc: &BaseDocument, id: Option<usize>| {
        id.filter(|id| doc.get_node(*id).is_some_and(|node| node.parent == Some(parent)))
    };
    let previous = is_sibling(doc, previous);
    let next = is_sibling(doc, next);

    let is_empty_block = doc
        .get_node(parent)
        .is_some_and(|node| node.children.is_empty() && node.is_block(doc.schema()));
    if is_empty_block {
        let mut mutr = doc.mutate();
        let br = mutr.create_element(
            qual_name!("br", html),
            vec![Attribute::new(BOGUS_ATTR, "1")],
        );
        mutr.append_children(parent, &[br]);
    }

    let text_end = |id: Option<usize>, at_end: bool| {
        let node = doc.get_node(id?)?;
        let text = node.text_data()?;
        Some(DomRange::collapsed_at(node.id, if at_end { text.len_chars() } else { 0 }))
    };
    let into_text = if forward {
        text_end(next, false).or_else(|| text_end(previous, true))
    } else {
        text_end(previous, true).or_else(|| text_end(next, false))
    };

    let range = into_text.unwrap_or_else(|| {
        let offset = match (previous, next) {
            (Some(previous), _) => doc.node_index(previous).map_or(0, |index| index + 1),
            (None, Some(next)) => doc.node_index(next).unwrap_or(0),
            (None, None) => 0,
        };
        DomRange::collapsed_at(parent, offset)
    });

    overrides.set_range(core, Some(range), Some(forward));
    true
}
