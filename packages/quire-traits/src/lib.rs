//! Types shared between the Quire DOM, the editor core and the embedding host.
//!
//! The host translates its native input into [`UiEvent`]s, implements [`ShellProvider`]
//! to expose platform services, and reads back a [`DispatchOutcome`] to decide whether
//! to run its own default action.

pub mod events;
pub use events::{
    ClipboardData, DispatchOutcome, HandlerResult, HitResult, KeyEvent, MouseEventButton,
    MouseEventButtons, PointerEvent, UiEvent,
};

pub mod shell;
pub use shell::{DummyShellProvider, ShellProvider};
