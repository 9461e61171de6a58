//! The html5ever tree sink that builds editable content into a [`BaseDocument`].
//!
//! Node handles are slab ids. Doctypes and quirks modes are dropped, `<template>` content
//! lands as ordinary children and processing instructions become comments.

use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell, RefMut};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeBuilderOpts, TreeSink};
use html5ever::{ParseOpts, QualName};
use quire_dom::node::Attribute;
use quire_dom::{BaseDocument, DocumentMutator};

fn to_attrs(attrs: Vec<html5ever::Attribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|attr| Attribute {
            name: attr.name,
            value: attr.value.to_string(),
        })
        .collect()
}

/// Where a text chunk goes: after the last child of a parent, or before a sibling
#[derive(Clone, Copy)]
enum TextSlot {
    Append(usize),
    Before(usize),
}

pub struct ContentSink<'doc> {
    mutator: RefCell<DocumentMutator<'doc>>,
    error_count: Cell<usize>,
}

impl<'doc> ContentSink<'doc> {
    fn new(doc: &'doc mut BaseDocument) -> Self {
        ContentSink {
            mutator: RefCell::new(doc.mutate()),
            error_count: Cell::new(0),
        }
    }

    /// Parse `html` as a full document into `doc`
    pub fn parse_into_doc<'d>(doc: &'d mut BaseDocument, html: &str) -> &'d mut BaseDocument {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        };
        html5ever::parse_document(ContentSink::new(doc), opts).one(html);
        doc
    }

    fn mutr(&self) -> RefMut<'_, DocumentMutator<'doc>> {
        self.mutator.borrow_mut()
    }

    /// Merge text into the neighbouring text node, or create one
    fn insert_text(&self, slot: TextSlot, text: &str) {
        let mut mutr = self.mutr();
        let neighbour = match slot {
            TextSlot::Append(parent) => mutr.last_child_id(parent),
            TextSlot::Before(sibling) => mutr.previous_sibling_id(sibling),
        };
        if neighbour.is_some_and(|id| mutr.append_text_to_node(id, text).is_ok()) {
            return;
        }
        let node = mutr.create_text_node(text);
        match slot {
            TextSlot::Append(parent) => mutr.append_children(parent, &[node]),
            TextSlot::Before(sibling) => mutr.insert_nodes_before(sibling, &[node]),
        }
    }
}

impl<'doc> TreeSink for ContentSink<'doc> {
    type Output = ();
    type Handle = usize;
    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        drop(self.mutator.into_inner());
        let errors = self.error_count.get();
        if errors > 0 {
            tracing::debug!(errors, "Parsed HTML with recoverable errors");
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::trace!("HTML parse error: {msg}");
        self.error_count.set(self.error_count.get() + 1);
    }

    fn get_document(&self) -> usize {
        0
    }

    fn elem_name<'a>(&'a self, target: &'a usize) -> Self::ElemName<'a> {
        Ref::map(self.mutator.borrow(), |mutr| {
            mutr.element_name(*target)
                .expect("the tree builder only asks for names of elements")
        })
    }

    fn create_element(&self, name: QualName, attrs: Vec<html5ever::Attribute>, _: ElementFlags) -> usize {
        self.mutr().create_element(name, to_attrs(attrs))
    }

    fn create_comment(&self, _text: StrTendril) -> usize {
        self.mutr().create_comment_node()
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> usize {
        self.mutr().create_comment_node()
    }

    fn append(&self, parent: &usize, child: NodeOrText<usize>) {
        match child {
            NodeOrText::AppendNode(id) => self.mutr().append_children(*parent, &[id]),
            NodeOrText::AppendText(text) => self.insert_text(TextSlot::Append(*parent), &text),
        }
    }

    fn append_before_sibling(&self, sibling: &usize, child: NodeOrText<usize>) {
        match child {
            NodeOrText::AppendNode(id) => self.mutr().insert_nodes_before(*sibling, &[id]),
            NodeOrText::AppendText(text) => self.insert_text(TextSlot::Before(*sibling), &text),
        }
    }

    fn append_based_on_parent_node(&self, element: &usize, prev_element: &usize, child: NodeOrText<usize>) {
        let has_parent = self.mutr().node_has_parent(*element);
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, _: StrTendril, _: StrTendril, _: StrTendril) {}

    fn get_template_contents(&self, target: &usize) -> usize {
        *target
    }

    fn same_node(&self, x: &usize, y: &usize) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &usize, attrs: Vec<html5ever::Attribute>) {
        self.mutr().add_attrs_if_missing(*target, to_attrs(attrs));
    }

    fn remove_from_parent(&self, target: &usize) {
        self.mutr().remove_node(*target);
    }

    fn reparent_children(&self, old_parent: &usize, new_parent: &usize) {
        self.mutr().reparent_children(*old_parent, *new_parent);
    }
}
