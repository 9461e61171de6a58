//! HTML parsing for Quire documents.
//!
//! [`HtmlDocument::from_html`] parses a full HTML document (missing `<html>`, `<head>` and
//! `<body>` tags are implied, as in a browser) into a [`quire_dom::BaseDocument`].

mod html_document;
mod html_sink;

pub use html_document::HtmlDocument;
pub use html_sink::ContentSink;
