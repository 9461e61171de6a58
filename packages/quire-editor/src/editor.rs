use keyboard_types::Key;
use quire_dom::{BaseDocument, DomRange};
use quire_traits::{DispatchOutcome, HandlerResult, UiEvent};

use crate::caret::{Direction, FakeCaretState};
use crate::config::EditorConfig;
use crate::delete;
use crate::notify::{Disposer, Listeners, Notification, NotificationKind};
use crate::overrides::{OverrideState, SelectionOverrides, TransientFilter};
use crate::selection::EditorSelection;

/// The state every editing component works against: the document, the editing root, the
/// native selection and the notification listeners.
pub struct EditorCore {
    pub doc: BaseDocument,
    /// The editable root element (usually `<body>`)
    pub root: usize,
    pub selection: EditorSelection,
    pub config: EditorConfig,
    pub has_focus: bool,
    listeners: Listeners,
}

impl EditorCore {
    pub fn new(doc: BaseDocument, root: usize, config: EditorConfig) -> Self {
        Self {
            doc,
            root,
            selection: EditorSelection::new(),
            config,
            has_focus: false,
            listeners: Listeners::new(),
        }
    }

    /// Deliver a notification to the registered listeners
    pub fn fire(&mut self, notification: &mut Notification) -> DispatchOutcome {
        self.listeners.fire(notification, &mut self.doc)
    }

    pub fn focus(&mut self) {
        self.has_focus = true;
        self.doc.set_focus_to(self.root);
    }
}

/// An editing surface over one root element of a document.
///
/// The host feeds input through [`Editor::handle_ui_event`] and reads the outcome to
/// decide whether to run its own default action.
pub struct Editor {
    core: EditorCore,
    overrides: SelectionOverrides,
    destroyed: bool,
}

impl Editor {
    pub fn new(doc: impl Into<BaseDocument>, root: usize, config: EditorConfig) -> Self {
        let mut core = EditorCore::new(doc.into(), root, config);
        let overrides = SelectionOverrides::new(&mut core);
        Self {
            core,
            overrides,
            destroyed: false,
        }
    }

    /// Edit the document's `<body>`
    pub fn from_body(doc: impl Into<BaseDocument>, config: EditorConfig) -> Self {
        let doc = doc.into();
        let root = doc.body().unwrap_or(doc.root_node().id);
        Self::new(doc, root, config)
    }

    pub fn doc(&self) -> &BaseDocument {
        &self.core.doc
    }

    pub fn doc_mut(&mut self) -> &mut BaseDocument {
        &mut self.core.doc
    }

    pub fn root(&self) -> usize {
        self.core.root
    }

    pub fn has_focus(&self) -> bool {
        self.core.has_focus
    }

    pub fn focus(&mut self) {
        self.core.focus();
    }

    pub fn on(
        &mut self,
        kind: NotificationKind,
        handler: impl FnMut(&mut Notification, &mut BaseDocument) -> HandlerResult + 'static,
    ) -> Disposer {
        self.core.listeners.on(kind, handler)
    }

    pub fn off(&mut self, disposer: Disposer) -> bool {
        self.core.listeners.off(disposer)
    }

    fn overrides_enabled(&self) -> bool {
        !self.destroyed && self.core.config.capabilities.content_editable_false
    }

    /// Dispatch one host event.
    ///
    /// Listeners see it first as [`Notification::Input`]. Backspace and delete then get a
    /// chance to remove an atomic element, and everything else goes through the selection
    /// overrides. Copy events carry their clipboard payload back to the host in `event`.
    pub fn handle_ui_event(&mut self, event: &mut UiEvent) -> DispatchOutcome {
        if self.destroyed {
            return DispatchOutcome::Proceed;
        }

        match event {
            UiEvent::Focus => self.core.focus(),
            UiEvent::Blur => {
                self.core.has_focus = false;
                self.core.doc.clear_focus();
            }
            _ => {}
        }

        let mut input = Notification::Input(event.clone());
        if self.core.fire(&mut input).is_default_prevented() {
            return DispatchOutcome::DefaultPrevented;
        }

        if !self.overrides_enabled() {
            return DispatchOutcome::Proceed;
        }

        if let UiEvent::KeyPress(key) = event {
            let forward = match key.key {
                Key::Backspace => Some(false),
                Key::Delete => Some(true),
                _ => None,
            };
            if let Some(forward) = forward {
                if self.execute_delete_command(forward) {
                    return DispatchOutcome::DefaultPrevented;
                }
                return DispatchOutcome::Proceed;
            }
        }

        self.overrides.handle_event(&mut self.core, event).into()
    }

    /// The current selection range. An element selection reports the range around the
    /// selected element.
    pub fn get_rng(&mut self) -> Option<DomRange> {
        if !self.overrides_enabled() {
            return self.core.selection.get_range(&self.core.doc);
        }
        self.overrides.get_range(&self.core)
    }

    /// Move the selection. `forward` is the direction the caret travelled to get there,
    /// which decides the side a fake caret attaches to.
    pub fn set_rng(&mut self, range: DomRange, forward: Option<bool>) {
        if !self.overrides_enabled() {
            self.core.selection.set_raw_range(Some(range));
            return;
        }
        self.overrides.set_range(&mut self.core, Some(range), forward);
    }

    /// The node the selection is about
    pub fn selected_node(&mut self) -> usize {
        if !self.overrides_enabled() {
            let range = self.core.selection.get_range(&self.core.doc);
            return EditorSelection::node_of_range(&self.core.doc, self.core.root, range);
        }
        self.overrides.selected_node(&self.core)
    }

    pub fn show_caret(
        &mut self,
        direction: Direction,
        node: usize,
        before: bool,
        scroll_into_view: bool,
    ) -> Option<DomRange> {
        if self.destroyed {
            return None;
        }
        self.overrides
            .show_caret(&mut self.core, direction, node, before, scroll_into_view)
    }

    pub fn show_block_caret_container(&mut self, node: usize) {
        if self.destroyed {
            return;
        }
        self.overrides.show_block_caret_container(&mut self.core, node);
    }

    pub fn hide_fake_caret(&mut self) {
        self.overrides.hide_fake_caret(&mut self.core);
    }

    /// Remove a media element next to (or selected by) the caret. Returns whether the
    /// command was handled.
    pub fn backspace_delete(&mut self, forward: bool) -> bool {
        if !self.overrides_enabled() {
            return false;
        }
        delete::media::backspace_delete(&mut self.core, &mut self.overrides, forward)
    }

    /// Run every atomic-element delete path, non-editable islands first
    pub fn execute_delete_command(&mut self, forward: bool) -> bool {
        if !self.overrides_enabled() {
            return false;
        }
        delete::execute_delete_command(&mut self.core, &mut self.overrides, forward)
    }

    /// Tell the editor the host created a block (eg. on enter)
    pub fn new_block(&mut self, block: usize) {
        let mut notification = Notification::NewBlock { block };
        self.core.fire(&mut notification);
        if self.overrides_enabled() {
            self.overrides.remove_element_selection(&mut self.core);
        }
    }

    pub fn selected_element(&self) -> Option<usize> {
        self.overrides.state().selected_element()
    }

    pub fn override_state(&self) -> OverrideState {
        self.overrides.state()
    }

    pub fn fake_caret_state(&self) -> FakeCaretState {
        self.overrides.fake_caret_state()
    }

    /// The root's HTML without caret containers, selection mirrors or editor markers
    pub fn get_content(&self) -> String {
        self.core
            .doc
            .inner_html_filtered(self.core.root, &TransientFilter)
    }

    /// Drop the fake caret and element selection. Later events are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.overrides.destroy(&mut self.core);
        self.destroyed = true;
        tracing::debug!(root = self.core.root, "Editor destroyed");
    }
}
