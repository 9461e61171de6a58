//! The selection override state machine.
//!
//! At any time the editor's selection is exactly one of: a native range, a fake caret next
//! to an atomic element, or an element selection backed by an off-screen mirror. Input
//! events and selection changes move between these states.

use std::borrow::Cow;

use quire_dom::util::attr_name;
use quire_dom::{Attribute, BaseDocument, DomRange, Node, SerializeFilter, TreeTraverser, qual_name};
use quire_traits::{ClipboardData, HandlerResult, KeyEvent, PointerEvent, UiEvent};

use crate::caret::container::{self, is_range_in_caret_container};
use crate::caret::predicates::{is_after_content_editable_false, is_before_content_editable_false};
use crate::caret::utils::{
    get_content_editable_root, get_normalized_range_end_point, get_parent_block,
    is_xy_in_content_area, is_xy_within_range, normalize_short_ended_element_selection,
};
use crate::caret::{
    CaretPosition, CaretWalker, Direction, FakeCaret, FakeCaretState, closest_fake_caret,
};
use crate::editor::EditorCore;
use crate::node_type::{
    BOGUS_ATTR, CARET_ATTR, NBSP, OFFSCREEN_SELECTION_CLASS, PASTE_BIN_ID, SELECTED_ATTR, ZWSP,
    attr, is_bogus, is_content_editable_false, is_content_editable_true,
    is_inline_fake_caret_target, is_media,
};
use crate::notify::Notification;
use crate::selection::EditorSelection;

/// A whole element standing in for the selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSelection {
    pub selected_element: usize,
}

/// Which selection representation is active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverrideState {
    #[default]
    Native,
    FakeCaret,
    Element(ElementSelection),
}

impl OverrideState {
    pub fn selected_element(&self) -> Option<usize> {
        match self {
            OverrideState::Element(selection) => Some(selection.selected_element),
            _ => None,
        }
    }

    pub fn is_fake_caret(&self) -> bool {
        matches!(self, OverrideState::FakeCaret)
    }
}

/// Drops editor-internal nodes, attributes and zero width chars while serializing
pub struct TransientFilter;

impl SerializeFilter for TransientFilter {
    fn skip_node(&self, node: &Node) -> bool {
        if node.is_element() {
            return is_bogus(node);
        }
        node.text_data()
            .is_some_and(|text| !text.content.is_empty() && text.content.chars().all(|c| c == ZWSP))
    }

    fn skip_attr(&self, _node: &Node, attr: &Attribute) -> bool {
        matches!(&*attr.name.local, SELECTED_ATTR | CARET_ATTR | BOGUS_ATTR)
    }

    fn map_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.contains(ZWSP) {
            Cow::Owned(text.chars().filter(|c| *c != ZWSP).collect())
        } else {
            Cow::Borrowed(text)
        }
    }
}

pub struct SelectionOverrides {
    state: OverrideState,
    fake_caret: FakeCaret,
    real_selection_id: String,
}

impl SelectionOverrides {
    pub fn new(core: &mut EditorCore) -> Self {
        let table_targets = core.config.capabilities.table_fake_caret;
        Self {
            state: OverrideState::Native,
            fake_caret: FakeCaret::new(core.root, table_targets),
            real_selection_id: core.doc.unique_id("sel-"),
        }
    }

    pub fn state(&self) -> OverrideState {
        self.state
    }

    pub fn fake_caret_state(&self) -> FakeCaretState {
        self.fake_caret.state()
    }

    fn is_target(&self, doc: &BaseDocument, node: usize) -> bool {
        self.fake_caret.is_target(doc, node)
    }

    /// Fire `ShowCaret` and, unless a listener cancels it, show the fake caret beside
    /// `node`. Returns the range the native selection should take.
    pub fn show_caret(
        &mut self,
        core: &mut EditorCore,
        direction: Direction,
        node: usize,
        before: bool,
        scroll_into_view: bool,
    ) -> Option<DomRange> {
        let mut notification = Notification::ShowCaret {
            target: node,
            direction,
            before,
        };
        if core.fire(&mut notification).is_default_prevented() {
            tracing::debug!(node, "ShowCaret cancelled");
            return None;
        }

        if scroll_into_view {
            core.doc
                .scroll_into_view(node, direction == Direction::Backward);
        }

        match self.fake_caret.show(&mut core.doc, core.has_focus, before, node) {
            Some(range) => {
                self.remove_element_selection(core);
                self.state = OverrideState::FakeCaret;
                Some(range)
            }
            None => {
                if self.state.is_fake_caret() {
                    self.state = OverrideState::Native;
                }
                None
            }
        }
    }

    /// Promote a block caret container that is being typed into to real content
    pub fn show_block_caret_container(&mut self, core: &mut EditorCore, node: usize) {
        let is_block_container = core
            .doc
            .get_node(node)
            .is_some_and(|node| attr(node, CARET_ATTR).is_some());
        if !is_block_container {
            return;
        }

        container::show_caret_container_block(&mut core.doc, node);
        let range = core.selection.get_range(&core.doc);
        self.set_range(core, range, None);
        core.doc.scroll_into_view(node, false);
    }

    pub fn hide_fake_caret(&mut self, core: &mut EditorCore) {
        self.fake_caret.hide(&mut core.doc);
        if self.state.is_fake_caret() {
            self.state = OverrideState::Native;
        }
    }

    /// The range reported to callers. An element selection reports a range around the
    /// selected element instead of the off-screen mirror.
    pub fn get_range(&mut self, core: &EditorCore) -> Option<DomRange> {
        let range = core.selection.get_range(&core.doc);
        let Some(selected) = self.state.selected_element() else {
            return range;
        };

        if !core.doc.is_connected(selected) {
            tracing::debug!(selected, "Selected element was detached");
            self.state = OverrideState::Native;
            return range;
        }
        DomRange::select_node(&core.doc, selected).or(range)
    }

    /// The node the current selection is about, as seen through [`Self::get_range`]
    pub fn selected_node(&mut self, core: &EditorCore) -> usize {
        let range = self.get_range(core);
        EditorSelection::node_of_range(&core.doc, core.root, range)
    }

    /// Apply a range to the selection, letting the overrides swap in a fake caret or an
    /// element selection first
    pub fn set_range(&mut self, core: &mut EditorCore, range: Option<DomRange>, forward: Option<bool>) {
        let Some(range) = range else {
            return;
        };

        let range = normalize_short_ended_element_selection(&core.doc, range);
        let range = self
            .set_element_selection(core, Some(range), forward.unwrap_or(false))
            .unwrap_or(range);

        core.selection.set_raw_range(Some(range));
        self.after_set_range(core, &range);
    }

    /// Runs once the selection changed. Only hides indicators, it never moves the selection.
    fn after_set_range(&mut self, core: &mut EditorCore, range: &DomRange) {
        let parent = core
            .doc
            .get_node(range.start_container)
            .and_then(|node| node.parent)
            .and_then(|parent| core.doc.get_node(parent));

        let in_paste_bin = parent
            .and_then(|parent| parent.element_data())
            .is_some_and(|el| el.id() == Some(PASTE_BIN_ID));
        let in_mirror = parent
            .and_then(|parent| parent.element_data())
            .is_some_and(|el| el.has_class(OFFSCREEN_SELECTION_CLASS));

        if !is_range_in_caret_container(&core.doc, range) && !in_paste_bin {
            self.hide_fake_caret(core);
        }
        if !in_mirror {
            self.remove_element_selection(core);
        }
    }

    /// Decide whether `range` should become a fake caret or an element selection.
    /// Returns the replacement range when it does.
    pub fn set_element_selection(
        &mut self,
        core: &mut EditorCore,
        range: Option<DomRange>,
        forward: bool,
    ) -> Option<DomRange> {
        let range = range?;

        if range.is_collapsed() {
            if is_range_in_caret_container(&core.doc, &range) {
                return None;
            }

            let direction = Direction::from_forward(forward);
            let pos = get_normalized_range_end_point(&core.doc, direction, &range);
            let at_end = pos.is_at_end(&core.doc);

            if let Some(node) = pos.get_node(&core.doc, !forward) {
                if self.is_target(&core.doc, node) {
                    let before = forward && !at_end;
                    return self.show_caret(core, direction, node, before, false);
                }
            }
            if let Some(node) = pos.get_node(&core.doc, forward) {
                if self.is_target(&core.doc, node) {
                    let before = if forward { false } else { !at_end };
                    return self.show_caret(core, direction, node, before, false);
                }
            }
            return None;
        }

        let doc = &core.doc;
        let mut start_container = range.start_container;
        let mut start_offset = range.start_offset;

        // `<span cef>[</span>]` selects the whole span
        let start = doc.get_node(start_container)?;
        if start.is_text_node() && start_offset == 0 {
            if let Some(parent) = start.parent.and_then(|parent| doc.get_node(parent)) {
                if is_content_editable_false(parent) {
                    start_offset = parent.child_index()?;
                    start_container = parent.parent?;
                }
            }
        }

        if !doc.get_node(start_container)?.is_element() {
            return None;
        }

        if range.end_offset == start_offset + 1 && start_container == range.end_container {
            let node = *doc.get_node(start_container)?.children.get(start_offset)?;
            let selectable = doc
                .get_node(node)
                .is_some_and(|node| is_content_editable_false(node) || is_media(node));
            if selectable {
                return self.select_element(core, node);
            }
        }
        None
    }

    /// A range around `node`, unless a `BeforeObjectSelected` listener objects
    pub fn select_node(&mut self, core: &mut EditorCore, node: usize) -> Option<DomRange> {
        let mut notification = Notification::BeforeObjectSelected { target: node };
        if core.fire(&mut notification).is_default_prevented() {
            return None;
        }
        DomRange::select_node(&core.doc, node)
    }

    /// Make `node` the element selection: mirror a clone of it off-screen, point the native
    /// selection at the clone and mark the visible node as selected.
    fn select_element(&mut self, core: &mut EditorCore, node: usize) -> Option<DomRange> {
        let clone = core.doc.deep_clone_node(node);
        let mut notification = Notification::ObjectSelected {
            target: node,
            target_clone: clone,
        };
        if core.fire(&mut notification).is_default_prevented() {
            core.doc.remove_and_drop_node(clone);
            return None;
        }

        let target_clone = match notification {
            Notification::ObjectSelected { target_clone, .. } => target_clone,
            _ => clone,
        };
        // A replacement clone must be an existing node outside the document
        let target_clone = if target_clone == clone {
            clone
        } else if core.doc.get_node(target_clone).is_some() && !core.doc.is_connected(target_clone) {
            core.doc.remove_and_drop_node(clone);
            target_clone
        } else {
            tracing::debug!(node, target_clone, "Ignoring unusable replacement clone");
            clone
        };

        let range = self.setup_offscreen_selection(core, node, target_clone, target_clone == clone)?;

        let others: Vec<usize> = TreeTraverser::new_with_root(&core.doc, core.root)
            .filter(|id| *id != node)
            .filter(|id| {
                core.doc
                    .get_node(*id)
                    .is_some_and(|n| attr(n, SELECTED_ATTR).is_some())
            })
            .collect();
        let already_marked = core
            .doc
            .get_node(node)
            .and_then(|n| attr(n, SELECTED_ATTR))
            .is_some_and(|value| !value.is_empty());

        let mut mutr = core.doc.mutate();
        for other in others {
            mutr.clear_attribute(other, attr_name(SELECTED_ATTR));
        }
        if !already_marked {
            mutr.set_attribute(node, attr_name(SELECTED_ATTR), "1");
        }
        drop(mutr);

        self.fake_caret.hide(&mut core.doc);
        self.state = OverrideState::Element(ElementSelection {
            selected_element: node,
        });
        tracing::debug!(node, "Selected element");

        Some(range)
    }

    fn real_selection_container(&self, doc: &BaseDocument, root: usize) -> Option<usize> {
        doc.get_element_by_id(&self.real_selection_id)
            .filter(|container| doc.is_ancestor_of(root, *container))
    }

    /// The clone mirrored in the off-screen container
    fn real_selection_element(&self, doc: &BaseDocument, root: usize) -> Option<usize> {
        let container = self.real_selection_container(doc, root)?;
        TreeTraverser::new_with_root(doc, container)
            .skip(1)
            .find(|id| doc.get_node(*id).is_some_and(|node| node.is_element()))
    }

    fn setup_offscreen_selection(
        &mut self,
        core: &mut EditorCore,
        node: usize,
        target_clone: usize,
        clone_unchanged: bool,
    ) -> Option<DomRange> {
        let root = core.root;
        let container = match self.real_selection_container(&core.doc, root) {
            Some(container) => container,
            None => {
                let mut mutr = core.doc.mutate();
                let container = mutr.create_element(
                    qual_name!("div", html),
                    vec![
                        Attribute::new(BOGUS_ATTR, "all"),
                        Attribute::new("class", OFFSCREEN_SELECTION_CLASS),
                        Attribute::new("id", self.real_selection_id.as_str()),
                    ],
                );
                mutr.append_children(root, &[container]);
                container
            }
        };

        let stale = core.doc.get_node(container)?.children.clone();
        let legacy = core.config.capabilities.legacy_clipboard_shim && clone_unchanged;
        let nbsp = NBSP.to_string();

        let mut mutr = core.doc.mutate();
        for child in stale {
            if child != target_clone {
                mutr.remove_and_drop_node(child);
            }
        }

        let range = if legacy {
            let spacer = mutr.create_element(
                qual_name!("p", html),
                vec![
                    Attribute::new("style", "font-size: 0"),
                    Attribute::new(BOGUS_ATTR, "all"),
                ],
            );
            let spacer_text = mutr.create_text_node(&nbsp);
            mutr.append_children(spacer, &[spacer_text]);
            mutr.append_children(container, &[spacer, target_clone]);
            DomRange::new(spacer, 1, container, 2)
        } else {
            let leading = mutr.create_text_node(&nbsp);
            let trailing = mutr.create_text_node(&nbsp);
            mutr.append_children(container, &[leading, target_clone, trailing]);
            DomRange::new(leading, 1, trailing, 0)
        };
        drop(mutr);

        if let Some(rect) = core.doc.client_rect(node) {
            let root_top = core.doc.client_rect(root).map_or(0.0, |rect| rect.y0);
            let top = format!("{}px", rect.y0 - root_top);
            core.doc.mutate().set_style_property(container, "top", &top);
        }

        core.selection.set_raw_range(Some(range));
        Some(range)
    }

    /// Unmark the selected element and drop the off-screen mirror
    pub fn remove_element_selection(&mut self, core: &mut EditorCore) {
        if let Some(selected) = self.state.selected_element() {
            if core.doc.tree().contains(selected) {
                core.doc
                    .mutate()
                    .clear_attribute(selected, attr_name(SELECTED_ATTR));
            }
            self.state = OverrideState::Native;
            tracing::debug!(selected, "Cleared element selection");
        }
        if let Some(container) = self.real_selection_container(&core.doc, core.root) {
            core.doc.mutate().remove_and_drop_node(container);
        }
    }

    pub fn destroy(&mut self, core: &mut EditorCore) {
        self.fake_caret.destroy(&mut core.doc);
        self.remove_element_selection(core);
        self.state = OverrideState::Native;
    }

    /// Route a host event through the overrides
    pub fn handle_event(&mut self, core: &mut EditorCore, event: &mut UiEvent) -> HandlerResult {
        match event {
            UiEvent::MouseDown(pointer) => self.on_mouse_down(core, pointer),
            UiEvent::MouseUp(pointer) => self.on_mouse_up(core, pointer),
            UiEvent::Click(pointer) => self.on_click(core, pointer),
            UiEvent::Tap(pointer) => self.on_tap(core, pointer),
            UiEvent::KeyPress(key) => self.on_key_press(core, key),
            UiEvent::Copy(clipboard) => self.on_copy(core, clipboard.as_mut()),
            UiEvent::Blur => {
                self.remove_element_selection(core);
                HandlerResult::Continue
            }
            UiEvent::ResizeWindow | UiEvent::FullscreenStateChanged(_) => {
                self.fake_caret.reposition(&mut core.doc);
                HandlerResult::Continue
            }
            UiEvent::Focus => HandlerResult::Continue,
        }
    }

    fn on_mouse_down(&mut self, core: &mut EditorCore, pointer: &PointerEvent) -> HandlerResult {
        let target = pointer.target;
        let (x, y) = (pointer.client_x, pointer.client_y);

        if !core.doc.contains(core.root, target) {
            return HandlerResult::Continue;
        }
        if !is_xy_in_content_area(&core.doc, core.root, x, y) {
            return HandlerResult::Continue;
        }

        if let Some(ce_root) = get_content_editable_root(&core.doc, core.root, target) {
            let ce_node = core.doc.get_node(ce_root);
            let is_cef = ce_node.is_some_and(is_content_editable_false);
            let is_cet = ce_node.is_some_and(is_content_editable_true);

            if is_cef {
                core.focus();
                let range = self.select_node(core, ce_root);
                self.set_element_selection(core, range, false);
                return HandlerResult::PreventDefault;
            }

            self.remove_element_selection(core);
            let shift_in_editable = is_cet && pointer.shift_key();
            let within_range = core
                .selection
                .get_range(&core.doc)
                .is_some_and(|range| is_xy_within_range(&core.doc, &range, x, y));
            if !shift_in_editable && !within_range {
                self.hide_fake_caret(core);
                let range = EditorSelection::range_from_point(&core.doc, x, y);
                self.set_range(core, range, None);
            }
            return HandlerResult::Continue;
        }

        if self.is_target(&core.doc, target) {
            // Nothing else selects a media element the pointer landed on
            if core.doc.get_node(target).is_some_and(is_media) {
                core.focus();
                let range = self.select_node(core, target);
                if self.set_element_selection(core, range, false).is_some() {
                    return HandlerResult::PreventDefault;
                }
            }
            return HandlerResult::Continue;
        }

        self.remove_element_selection(core);
        self.hide_fake_caret(core);

        let table_targets = core.config.capabilities.table_fake_caret;
        let snap_distance = core.config.fake_caret_snap_distance;
        let Some(info) = closest_fake_caret(&core.doc, core.root, x, y, table_targets, snap_distance)
        else {
            return HandlerResult::Continue;
        };
        if self.has_better_mouse_target(&core.doc, core.root, target, info.node) {
            return HandlerResult::Continue;
        }

        core.focus();
        let range = self.show_caret(core, Direction::Forward, info.node, info.before, false);
        self.set_range(core, range, None);
        HandlerResult::PreventDefault
    }

    /// Some hosts drop the caret right next to an inline non-editable element on mouseup.
    /// Give it a caret container there.
    fn on_mouse_up(&mut self, core: &mut EditorCore, pointer: &PointerEvent) -> HandlerResult {
        let Some(range) = self.get_range(core) else {
            return HandlerResult::Continue;
        };
        if range.is_collapsed()
            && is_xy_in_content_area(&core.doc, core.root, pointer.client_x, pointer.client_y)
        {
            let rendered = self.render_caret_at_range(core, range);
            self.set_range(core, rendered, None);
        }
        HandlerResult::Continue
    }

    fn render_caret_at_range(&mut self, core: &mut EditorCore, range: DomRange) -> Option<DomRange> {
        if is_range_in_caret_container(&core.doc, &range) {
            return None;
        }

        let table_targets = core.config.capabilities.table_fake_caret;
        let pos = get_normalized_range_end_point(&core.doc, Direction::Forward, &range);
        let is_inline_target = |doc: &BaseDocument, node: usize| {
            doc.get_node(node)
                .is_some_and(|node| is_inline_fake_caret_target(node, doc.schema(), table_targets))
        };

        if let Some(node) = pos.get_node(&core.doc, false) {
            if is_inline_target(&core.doc, node) {
                return self.show_caret(core, Direction::Forward, node, true, false);
            }
        }
        if let Some(node) = pos.get_node(&core.doc, true) {
            if is_inline_target(&core.doc, node) {
                return self.show_caret(core, Direction::Forward, node, false, false);
            }
        }
        None
    }

    fn on_click(&mut self, core: &mut EditorCore, pointer: &PointerEvent) -> HandlerResult {
        let Some(ce_root) = get_content_editable_root(&core.doc, core.root, pointer.target) else {
            return HandlerResult::Continue;
        };
        let Some(node) = core.doc.get_node(ce_root) else {
            return HandlerResult::Continue;
        };

        // Links inside a non-editable island stay inert
        if is_content_editable_false(node) {
            core.focus();
            return HandlerResult::PreventDefault;
        }

        // An editable region inside the selected element, eg. a caption
        if is_content_editable_true(node) {
            if let Some(selected) = self.state.selected_element() {
                if core.doc.contains(selected, ce_root) {
                    self.remove_element_selection(core);
                }
            }
        }
        HandlerResult::Continue
    }

    fn on_tap(&mut self, core: &mut EditorCore, pointer: &PointerEvent) -> HandlerResult {
        let Some(ce_root) = get_content_editable_root(&core.doc, core.root, pointer.target) else {
            return HandlerResult::Continue;
        };
        if !core.doc.get_node(ce_root).is_some_and(is_content_editable_false) {
            return HandlerResult::Continue;
        }

        let range = self.select_node(core, ce_root);
        self.set_element_selection(core, range, false);
        HandlerResult::PreventDefault
    }

    /// Typing over a selected non-editable element would corrupt it
    fn on_key_press(&mut self, core: &mut EditorCore, key: &KeyEvent) -> HandlerResult {
        if key.modifier_pressed() {
            return HandlerResult::Continue;
        }
        let node = self.selected_node(core);
        if core.doc.get_node(node).is_some_and(is_content_editable_false) {
            return HandlerResult::PreventDefault;
        }
        HandlerResult::Continue
    }

    /// Copy the selected element itself rather than the mirror around it
    fn on_copy(&mut self, core: &mut EditorCore, clipboard: Option<&mut ClipboardData>) -> HandlerResult {
        let capabilities = core.config.capabilities;
        if !capabilities.clipboard_data || capabilities.legacy_clipboard_shim {
            return HandlerResult::Continue;
        }
        let Some(clipboard) = clipboard else {
            return HandlerResult::Continue;
        };
        let Some(element) = self.real_selection_element(&core.doc, core.root) else {
            return HandlerResult::Continue;
        };

        let html = core.doc.outer_html_filtered(element, &TransientFilter);
        let text: String = core
            .doc
            .get_node(element)
            .map(|node| node.text_content())
            .unwrap_or_default()
            .chars()
            .filter(|c| *c != ZWSP)
            .collect();

        clipboard.clear_data();
        clipboard.set_data("text/html", html);
        clipboard.set_data("text/plain", text);
        HandlerResult::PreventDefault
    }

    /// A native caret position in the pointer's own block beats snapping to an atomic
    /// element in a neighbouring block
    fn has_better_mouse_target(
        &self,
        doc: &BaseDocument,
        root: usize,
        target: usize,
        caret_node: usize,
    ) -> bool {
        let block_below_root =
            |node: usize| get_parent_block(doc, root, node).filter(|block| *block != root);
        let Some(target_block) = block_below_root(target) else {
            return false;
        };
        let caret_block = block_below_root(caret_node);

        if let Some(caret_block) = caret_block {
            let inside_caret_block = target != caret_block
                && doc.contains(caret_block, target_block)
                && !get_content_editable_root(doc, root, target_block)
                    .and_then(|ce_root| doc.get_node(ce_root))
                    .is_some_and(is_content_editable_false);
            if inside_caret_block {
                return true;
            }
        }

        Some(target_block) != caret_block && has_normal_caret_position(doc, target_block)
    }
}

/// `element` has a caret position that is not merely beside a non-editable element
fn has_normal_caret_position(doc: &BaseDocument, element: usize) -> bool {
    let Some(first) = doc.get_node(element).and_then(|node| node.first_child()) else {
        return false;
    };
    let Some(start) = CaretPosition::before(doc, first) else {
        return false;
    };
    CaretWalker::new(doc, element)
        .next(&start)
        .is_some_and(|pos| {
            !is_before_content_editable_false(doc, &pos) && !is_after_content_editable_false(doc, &pos)
        })
}
