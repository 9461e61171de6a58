use std::ops::{Deref, DerefMut};

use crate::ContentSink;

use quire_dom::{BaseDocument, DocumentConfig};

pub struct HtmlDocument {
    inner: BaseDocument,
}

impl Deref for HtmlDocument {
    type Target = BaseDocument;
    fn deref(&self) -> &BaseDocument {
        &self.inner
    }
}
impl DerefMut for HtmlDocument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
impl From<HtmlDocument> for BaseDocument {
    fn from(doc: HtmlDocument) -> BaseDocument {
        doc.inner
    }
}

impl HtmlDocument {
    /// Parse HTML into an [`HtmlDocument`]
    pub fn from_html(html: &str, config: DocumentConfig) -> Self {
        let mut doc = BaseDocument::new(config);
        ContentSink::parse_into_doc(&mut doc, html);
        HtmlDocument { inner: doc }
    }

    /// The `<body>` element. The HTML tree builder always creates one.
    pub fn body_id(&self) -> usize {
        self.inner.body().unwrap_or(0)
    }

    /// Convert the [`HtmlDocument`] into it's inner [`BaseDocument`]
    pub fn into_inner(self) -> BaseDocument {
        self.into()
    }
}
