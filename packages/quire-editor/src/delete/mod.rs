//! Backspace/delete handling for atomic elements.
//!
//! Each path inspects the selection and either handles the command (removing or selecting
//! a whole element) and returns `true`, or returns `false` so the host's plain text delete
//! runs instead.

pub mod cef;
mod element;
pub mod media;

pub use element::delete_element;

use crate::editor::EditorCore;
use crate::overrides::SelectionOverrides;

/// Try the non-editable island path, then the media path
pub fn execute_delete_command(
    core: &mut EditorCore,
    overrides: &mut SelectionOverrides,
    forward: bool,
) -> bool {
    cef::backspace_delete(core, overrides, forward)
        || media::backspace_delete(core, overrides, forward)
}
