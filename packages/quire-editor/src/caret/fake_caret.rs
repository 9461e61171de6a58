use kurbo::{Rect, Vec2};
use quire_dom::util::attr_name;
use quire_dom::{Attribute, BaseDocument, DomRange, qual_name};

use super::CaretPosition;
use super::container;
use super::utils::is_in_non_editable_island;
use crate::node_type::{
    BOGUS_ATTR, VISUAL_CARET_BEFORE_CLASS, VISUAL_CARET_CLASS, is_fake_caret_target,
    is_table_cell,
};

/// What the fake caret currently shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FakeCaretState {
    pub visible: bool,
    /// The position next to the target the caret is drawn at
    pub position: Option<CaretPosition>,
    /// Drawn on the leading edge of the target rather than the trailing one
    pub before_atomic: bool,
}

#[derive(Clone, Copy, Debug)]
struct Shown {
    target: usize,
    before: bool,
    container: usize,
    visual_caret: Option<usize>,
}

/// A synthetic caret drawn next to an element the native caret cannot sit beside.
///
/// Showing the caret inserts a caret container next to the target and returns a range
/// inside it, so typed text lands there. Block targets also get a visual caret element
/// appended to the root, positioned from the target's box.
pub struct FakeCaret {
    root: usize,
    table_targets: bool,
    shown: Option<Shown>,
    state: FakeCaretState,
}

impl FakeCaret {
    pub fn new(root: usize, table_targets: bool) -> Self {
        Self {
            root,
            table_targets,
            shown: None,
            state: FakeCaretState::default(),
        }
    }

    pub fn state(&self) -> FakeCaretState {
        self.state
    }

    pub fn is_showing(&self) -> bool {
        self.state.visible
    }

    /// The caret container owned by the current caret
    pub fn caret_container(&self) -> Option<usize> {
        self.shown.map(|shown| shown.container)
    }

    pub fn visual_caret(&self) -> Option<usize> {
        self.shown.and_then(|shown| shown.visual_caret)
    }

    pub fn is_target(&self, doc: &BaseDocument, node: usize) -> bool {
        doc.get_node(node)
            .is_some_and(|node| is_fake_caret_target(node, self.table_targets))
    }

    /// Show the caret before or after `node`.
    ///
    /// Returns `None`, with the caret hidden, when the editor is unfocused or `node` cannot
    /// carry a fake caret.
    pub fn show(
        &mut self,
        doc: &mut BaseDocument,
        has_focus: bool,
        before: bool,
        node: usize,
    ) -> Option<DomRange> {
        self.hide(doc);

        if !has_focus || !self.can_show(doc, node) {
            tracing::debug!(node, has_focus, "Rejected fake caret target");
            return None;
        }

        let is_block = doc.get_node(node)?.is_block(doc.schema());
        let (container, range, visual_caret) = if is_block {
            let container = container::insert_block(doc, "p", before, node)?;
            let rect = self.caret_rect(doc, before, node);
            if let Some(rect) = rect {
                doc.mutate()
                    .set_style_property(container, "top", &px(rect.y0));
            }
            let visual_caret = self.append_visual_caret(doc, before, rect);
            (container, DomRange::collapsed_at(container, 0), Some(visual_caret))
        } else {
            let container = container::insert_inline(doc, before, node)?;
            let next_is_target = doc
                .get_node(container)?
                .next_sibling()
                .is_some_and(|next| self.is_target(doc, next));
            let offset = if next_is_target { 0 } else { 1 };
            (container, DomRange::collapsed_at(container, offset), None)
        };

        let position = if before {
            CaretPosition::before(doc, node)
        } else {
            CaretPosition::after(doc, node)
        };

        self.shown = Some(Shown {
            target: node,
            before,
            container,
            visual_caret,
        });
        self.state = FakeCaretState {
            visible: true,
            position,
            before_atomic: before,
        };
        tracing::debug!(node, before, is_block, "Showing fake caret");

        Some(range)
    }

    fn can_show(&self, doc: &BaseDocument, node: usize) -> bool {
        let Some(target) = doc.get_node(node) else {
            return false;
        };
        self.is_target(doc, node)
            && !is_table_cell(target)
            && doc.is_connected(node)
            && doc.is_ancestor_of(self.root, node)
            && !is_in_non_editable_island(doc, self.root, node)
    }

    fn append_visual_caret(
        &self,
        doc: &mut BaseDocument,
        before: bool,
        rect: Option<Rect>,
    ) -> usize {
        let class = if before {
            format!("{VISUAL_CARET_CLASS} {VISUAL_CARET_BEFORE_CLASS}")
        } else {
            VISUAL_CARET_CLASS.to_string()
        };

        let mut mutr = doc.mutate();
        let caret = mutr.create_element(
            qual_name!("div", html),
            vec![Attribute::new("class", class), Attribute::new(BOGUS_ATTR, "all")],
        );
        mutr.append_children(self.root, &[caret]);
        drop(mutr);

        if let Some(rect) = rect {
            write_caret_style(doc, caret, rect);
        }
        caret
    }

    /// Remove the caret container and visual caret. Does nothing when already hidden.
    pub fn hide(&mut self, doc: &mut BaseDocument) {
        container::trim_inline_caret_containers(doc, self.root);

        if let Some(shown) = self.shown.take() {
            container::remove(doc, shown.container);
            if let Some(caret) = shown.visual_caret {
                if doc.tree().contains(caret) {
                    doc.mutate().remove_and_drop_node(caret);
                }
            }
            tracing::debug!(target = shown.target, "Hid fake caret");
        }
        self.state = FakeCaretState::default();
    }

    /// Recompute the visual caret's box after the layout changed
    pub fn reposition(&mut self, doc: &mut BaseDocument) {
        let Some(shown) = self.shown else {
            return;
        };
        let Some(caret) = shown.visual_caret else {
            return;
        };
        if !doc.is_connected(shown.target) || !doc.tree().contains(caret) {
            return;
        }
        if let Some(rect) = self.caret_rect(doc, shown.before, shown.target) {
            write_caret_style(doc, caret, rect);
            if doc.tree().contains(shown.container) {
                doc.mutate()
                    .set_style_property(shown.container, "top", &px(rect.y0));
            }
        }
    }

    pub fn destroy(&mut self, doc: &mut BaseDocument) {
        self.hide(doc);
    }

    /// The caret box for the leading (`before`) or trailing edge of `node`, one pixel wide,
    /// relative to the root's content.
    ///
    /// With `<body>` as root this is the page position. Other roots subtract their own
    /// client position and add their scroll offset.
    pub fn caret_rect(&self, doc: &BaseDocument, before: bool, node: usize) -> Option<Rect> {
        let client = doc.client_rect(node)?;
        let x = if before { client.x0 } else { client.x1 };

        let root = doc.get_node(self.root)?;
        let offset = if root.is_element_named("body") {
            doc.viewport_scroll().to_vec2()
        } else {
            let root_rect = doc.client_rect(self.root).unwrap_or(Rect::ZERO);
            root.scroll_offset - Vec2::new(root_rect.x0, root_rect.y0)
        };

        let rect = Rect::new(x, client.y0, x + 1.0, client.y1);
        Some(rect + offset)
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

fn write_caret_style(doc: &mut BaseDocument, caret: usize, rect: Rect) {
    let style = format!(
        "position: absolute; left: {}; top: {}; width: {}; height: {};",
        px(rect.x0),
        px(rect.y0),
        px(rect.width()),
        px(rect.height())
    );
    doc.mutate().set_attribute(caret, attr_name("style"), &style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_dom::DocumentConfig;
    use quire_html::HtmlDocument;
    use pretty_assertions::assert_eq;

    fn fixture(html: &str) -> (HtmlDocument, usize) {
        let doc = HtmlDocument::from_html(html, DocumentConfig::default());
        let body = doc.body_id();
        (doc, body)
    }

    #[test]
    fn inline_caret_show_then_hide_restores_the_document() {
        let (mut doc, body) = fixture(r#"<p>a<span contenteditable="false">x</span>b</p>"#);
        let p = doc.get_node(body).unwrap().children[0];
        let cef = doc.get_node(p).unwrap().children[1];
        let before_html = doc.inner_html(body);

        let mut caret = FakeCaret::new(body, false);
        let range = caret.show(&mut doc, true, false, cef).unwrap();
        let container = caret.caret_container().unwrap();
        assert_eq!(range, DomRange::collapsed_at(container, 1));
        assert_eq!(doc.get_node(cef).unwrap().next_sibling(), Some(container));
        assert_eq!(
            caret.state(),
            FakeCaretState {
                visible: true,
                position: Some(CaretPosition::new(p, 2)),
                before_atomic: false,
            }
        );

        caret.hide(&mut doc);
        assert_eq!(caret.state(), FakeCaretState::default());
        assert_eq!(doc.inner_html(body), before_html);

        caret.hide(&mut doc);
        assert_eq!(doc.inner_html(body), before_html);
    }

    #[test]
    fn block_caret_gets_a_visual_indicator() {
        let (mut doc, body) = fixture(r#"<p>a</p><div contenteditable="false">x</div>"#);
        let cef = doc.get_node(body).unwrap().children[1];
        doc.set_node_rect(body, Rect::new(0.0, 0.0, 400.0, 300.0));
        doc.set_node_rect(cef, Rect::new(10.0, 40.0, 210.0, 80.0));

        let mut caret = FakeCaret::new(body, false);
        let range = caret.show(&mut doc, true, true, cef).unwrap();
        let container = caret.caret_container().unwrap();
        let visual = caret.visual_caret().unwrap();

        assert_eq!(range, DomRange::collapsed_at(container, 0));
        assert_eq!(doc.get_node(cef).unwrap().previous_sibling(), Some(container));
        assert_eq!(
            doc.outer_html(visual),
            r#"<div class="quire-visual-caret quire-visual-caret-before" data-quire-bogus="all" style="position: absolute; left: 10px; top: 40px; width: 1px; height: 40px;"></div>"#
        );

        doc.set_node_rect(cef, Rect::new(10.0, 60.0, 210.0, 100.0));
        caret.reposition(&mut doc);
        let style = doc.get_node(visual).unwrap().attr("style".into()).unwrap().to_string();
        assert!(style.contains("top: 60px;"));

        caret.destroy(&mut doc);
        assert!(!doc.tree().contains(visual));
        assert!(!doc.tree().contains(container));
    }

    #[test]
    fn rejects_invalid_targets() {
        let (mut doc, body) = fixture(
            r#"<p>a<b>plain</b><span contenteditable="false"><img contenteditable="false"></span></p>"#,
        );
        let p = doc.get_node(body).unwrap().children[0];
        let plain = doc.get_node(p).unwrap().children[1];
        let cef = doc.get_node(p).unwrap().children[2];
        let nested = doc.get_node(cef).unwrap().children[0];

        let mut caret = FakeCaret::new(body, false);
        assert_eq!(caret.show(&mut doc, false, true, cef), None);
        assert_eq!(caret.show(&mut doc, true, true, plain), None);
        assert_eq!(caret.show(&mut doc, true, true, nested), None);
        assert!(!caret.is_showing());

        doc.remove_node(cef);
        assert_eq!(caret.show(&mut doc, true, true, cef), None);
    }
}
