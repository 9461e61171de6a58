use std::borrow::Cow;

use crate::node::{Attribute, Node, NodeData};
use crate::BaseDocument;

/// Hooks for dropping transient nodes and attributes while serializing.
pub trait SerializeFilter {
    /// Skip the node and its whole subtree
    fn skip_node(&self, node: &Node) -> bool {
        let _ = node;
        false
    }

    fn skip_attr(&self, node: &Node, attr: &Attribute) -> bool {
        let _ = (node, attr);
        false
    }

    fn map_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Serialize everything as-is
pub struct Verbatim;
impl SerializeFilter for Verbatim {}

impl BaseDocument {
    pub fn outer_html(&self, node_id: usize) -> String {
        self.outer_html_filtered(node_id, &Verbatim)
    }

    pub fn inner_html(&self, node_id: usize) -> String {
        self.inner_html_filtered(node_id, &Verbatim)
    }

    pub fn outer_html_filtered(&self, node_id: usize, filter: &dyn SerializeFilter) -> String {
        let mut out = String::new();
        if let Some(node) = self.get_node(node_id) {
            self.write_node(&mut out, node, filter);
        }
        out
    }

    pub fn inner_html_filtered(&self, node_id: usize, filter: &dyn SerializeFilter) -> String {
        let mut out = String::new();
        if let Some(node) = self.get_node(node_id) {
            self.write_children(&mut out, node, filter);
        }
        out
    }

    fn write_children(&self, out: &mut String, node: &Node, filter: &dyn SerializeFilter) {
        for child_id in node.children.iter() {
            self.write_node(out, &self.nodes[*child_id], filter);
        }
    }

    fn write_node(&self, out: &mut String, node: &Node, filter: &dyn SerializeFilter) {
        if filter.skip_node(node) {
            return;
        }

        match &node.data {
            NodeData::Document => self.write_children(out, node, filter),
            NodeData::Comment => {}
            NodeData::Text(data) => {
                let text = filter.map_text(&data.content);
                out.push_str(&html_escape::encode_text(&text));
            }
            NodeData::Element(data) => {
                out.push('<');
                out.push_str(&data.name.local);
                for attr in data.attrs.iter() {
                    if filter.skip_attr(node, attr) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(&attr.name.local);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                    out.push('"');
                }
                out.push('>');

                // Void elements have no end tag
                if self.schema.is_short_ended(&data.name.local) {
                    return;
                }

                self.write_children(out, node, filter);
                out.push_str("</");
                out.push_str(&data.name.local);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentConfig, qual_name};
    use pretty_assertions::assert_eq;

    struct DropBogus;
    impl SerializeFilter for DropBogus {
        fn skip_node(&self, node: &Node) -> bool {
            node.element_data()
                .is_some_and(|el| el.attr(crate::LocalName::from("data-bogus")).is_some())
        }

        fn skip_attr(&self, _node: &Node, attr: &Attribute) -> bool {
            &*attr.name.local == "data-selected"
        }

        fn map_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
            Cow::Owned(text.replace('\u{FEFF}', ""))
        }
    }

    #[test]
    fn serializes_with_and_without_filter() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let mut mutr = doc.mutate();
        let p = mutr.create_element(
            qual_name!("p", html),
            vec![Attribute::new("title", "a \"b\""), Attribute::new("data-selected", "1")],
        );
        let text = mutr.create_text_node("x < y\u{FEFF}");
        let br = mutr.create_element(qual_name!("br", html), vec![]);
        let bogus = mutr.create_element(
            qual_name!("span", html),
            vec![Attribute::new("data-bogus", "all")],
        );
        mutr.append_children(0, &[p]);
        mutr.append_children(p, &[text, br, bogus]);
        drop(mutr);

        assert_eq!(
            doc.outer_html(p),
            "<p title=\"a &quot;b&quot;\" data-selected=\"1\">x &lt; y\u{FEFF}<br><span data-bogus=\"all\"></span></p>"
        );
        assert_eq!(
            doc.outer_html_filtered(p, &DropBogus),
            "<p title=\"a &quot;b&quot;\">x &lt; y<br></p>"
        );
        assert_eq!(doc.inner_html_filtered(0, &DropBogus), doc.outer_html_filtered(p, &DropBogus));
    }
}
