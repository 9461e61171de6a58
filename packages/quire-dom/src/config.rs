use crate::Schema;
use quire_traits::ShellProvider;
use std::sync::Arc;

/// Options used when constructing a [`BaseDocument`](crate::BaseDocument)
#[derive(Default)]
pub struct DocumentConfig {
    /// Shell provider to handle redraw requests, scrolling and caret hit testing
    pub shell_provider: Option<Arc<dyn ShellProvider>>,
    /// Element classification used for block/void decisions. Defaults to the HTML schema.
    pub schema: Option<Schema>,
}
