use quire_dom::BaseDocument;
use quire_traits::{DispatchOutcome, HandlerResult, UiEvent};

use crate::caret::Direction;

/// Something the editor announces to its listeners before acting on it
#[derive(Debug, Clone)]
pub enum Notification {
    /// Raw input from the host, seen before the selection overrides handle it
    Input(UiEvent),
    /// The fake caret is about to be shown next to `target`
    ShowCaret {
        target: usize,
        direction: Direction,
        before: bool,
    },
    /// `target` is about to become an element selection
    BeforeObjectSelected { target: usize },
    /// `target` was selected as a whole. `target_clone` is the detached copy that will be
    /// mirrored into the off-screen selection container; listeners may swap in their own.
    ObjectSelected { target: usize, target_clone: usize },
    /// A new block was created by the host (eg. pressing enter)
    NewBlock { block: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Input,
    ShowCaret,
    BeforeObjectSelected,
    ObjectSelected,
    NewBlock,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Input(_) => NotificationKind::Input,
            Notification::ShowCaret { .. } => NotificationKind::ShowCaret,
            Notification::BeforeObjectSelected { .. } => NotificationKind::BeforeObjectSelected,
            Notification::ObjectSelected { .. } => NotificationKind::ObjectSelected,
            Notification::NewBlock { .. } => NotificationKind::NewBlock,
        }
    }

    pub fn is_cancelable(&self) -> bool {
        match self {
            Notification::Input(event) => event.is_cancelable(),
            Notification::NewBlock { .. } => false,
            _ => true,
        }
    }
}

pub type Handler = Box<dyn FnMut(&mut Notification, &mut BaseDocument) -> HandlerResult>;

/// Returned by [`Listeners::on`]. Pass it back to unregister the handler.
#[must_use = "dropping the disposer makes the listener impossible to remove"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Disposer {
    id: u64,
}

/// Registered notification handlers, called in registration order
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(u64, NotificationKind, Handler)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        kind: NotificationKind,
        handler: impl FnMut(&mut Notification, &mut BaseDocument) -> HandlerResult + 'static,
    ) -> Disposer {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push((id, kind, Box::new(handler)));
        Disposer { id }
    }

    /// Unregister a handler. Returns false if it was already removed.
    pub fn off(&mut self, disposer: Disposer) -> bool {
        let len = self.entries.len();
        self.entries.retain(|(id, _, _)| *id != disposer.id);
        self.entries.len() != len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `notification` to every handler registered for its kind.
    ///
    /// All handlers run even after one prevents the default. Prevention is ignored for
    /// notifications that cannot be cancelled.
    pub fn fire(
        &mut self,
        notification: &mut Notification,
        doc: &mut BaseDocument,
    ) -> DispatchOutcome {
        let kind = notification.kind();
        let mut outcome = DispatchOutcome::Proceed;
        for (_, _, handler) in self.entries.iter_mut().filter(|(_, k, _)| *k == kind) {
            outcome = outcome.and(handler(notification, doc).into());
        }

        if outcome.is_default_prevented() && !notification.is_cancelable() {
            return DispatchOutcome::Proceed;
        }
        outcome
    }
}
