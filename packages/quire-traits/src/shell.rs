/// Services provided by the embedding shell.
///
/// Every method has a no-op default so hosts only implement what they support.
pub trait ShellProvider {
    fn request_redraw(&self) {}

    /// Ask the host to scroll `node_id` into view. `align_to_top` mirrors the
    /// DOM `scrollIntoView(alignToTop)` argument.
    fn scroll_into_view(&self, node_id: usize, align_to_top: bool) {
        let _ = (node_id, align_to_top);
    }

    /// Resolve a client point to a `(container, offset)` caret position using the
    /// host's text layout. Returning `None` makes the document fall back to box hit testing.
    fn caret_position_from_point(&self, client_x: f32, client_y: f32) -> Option<(usize, usize)> {
        let _ = (client_x, client_y);
        None
    }
}

pub struct DummyShellProvider;
impl ShellProvider for DummyShellProvider {}
