//! Caret and selection handling for rich-text editing on top of a [`quire_dom::BaseDocument`].
//!
//! Native selections can only place a caret inside editable text. This crate layers a
//! parallel caret model over the document selection so users can navigate, select and
//! delete around content the native caret cannot enter: non-editable
//! (`contenteditable="false"`) islands, media embeds and tables.
//!
//! The pieces, leaf to root:
//!
//!  - [`CaretPosition`] and the [`caret::predicates`]: a `(container, offset)` value and pure
//!    "is this position next to an atomic element" queries.
//!  - [`CaretWalker`]: the legal caret positions of an editing root, in document order.
//!  - [`caret::container`]: transient zero-width text nodes and marker paragraphs that give
//!    the native caret somewhere to live next to an atomic element.
//!  - [`FakeCaret`]: a synthetic caret drawn beside an atomic element.
//!  - [`SelectionOverrides`]: the state machine deciding between a native range, the fake
//!    caret and a whole-element selection.
//!  - [`delete`]: backspace/delete handling that removes atomic elements as a unit.
//!
//! [`Editor`] ties them together and is the entry point for embedders.

pub mod caret;
mod config;
pub mod delete;
mod editor;
pub mod node_type;
mod notify;
mod overrides;
mod selection;

pub use caret::{
    CaretPosition, CaretWalker, Direction, FakeCaret, FakeCaretInfo, FakeCaretState,
};
pub use config::{Capabilities, EditorConfig};
pub use editor::{Editor, EditorCore};
pub use notify::{Disposer, Handler, Listeners, Notification, NotificationKind};
pub use overrides::{ElementSelection, OverrideState, SelectionOverrides, TransientFilter};
pub use selection::EditorSelection;
