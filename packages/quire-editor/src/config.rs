/// What the host environment supports. Switching a capability off makes the matching
/// override step aside and leave the host's native behavior in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The host can render `contenteditable="false"` islands. When off, input events are
    /// never routed to the selection overrides.
    pub content_editable_false: bool,
    /// Copy events carry a writable clipboard payload
    pub clipboard_data: bool,
    /// Wrap the element selection mirror in a zero-size paragraph so an inline non-editable
    /// element is copied verbatim. Hosts needing this cannot override copy, so copy falls
    /// back to native when it is on.
    pub legacy_clipboard_shim: bool,
    /// Treat tables as fake caret targets
    pub table_fake_caret: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            content_editable_false: true,
            clipboard_data: true,
            legacy_clipboard_shim: false,
            table_fake_caret: false,
        }
    }
}

/// Options used when constructing an [`Editor`](crate::Editor)
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    pub capabilities: Capabilities,
    /// Maximum horizontal distance (CSS px) between a pointer and an atomic element for a
    /// mousedown to snap a fake caret to it. `None` snaps from anywhere on the line.
    pub fake_caret_snap_distance: Option<f64>,
}
