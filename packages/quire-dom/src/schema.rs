use markup5ever::LocalName;
use std::collections::HashSet;

/// Element names with no content model ("void" elements in HTML parlance)
const SHORT_ENDED_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "frame", "hr", "img", "input", "isindex", "link",
    "meta", "param", "embed", "source", "wbr", "track",
];

/// Element names that are laid out as blocks unless an inline style says otherwise
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section",
    "table", "ul", "td", "th", "tr", "tbody", "thead", "tfoot", "caption", "dd", "dt",
];

/// Static classification of element names.
#[derive(Debug, Clone)]
pub struct Schema {
    short_ended: HashSet<LocalName>,
    block: HashSet<LocalName>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::html()
    }
}

impl Schema {
    pub fn html() -> Self {
        Self {
            short_ended: SHORT_ENDED_ELEMENTS.iter().map(|n| LocalName::from(*n)).collect(),
            block: BLOCK_ELEMENTS.iter().map(|n| LocalName::from(*n)).collect(),
        }
    }

    pub fn is_short_ended(&self, name: &LocalName) -> bool {
        self.short_ended.contains(name)
    }

    pub fn is_block(&self, name: &LocalName) -> bool {
        self.block.contains(name)
    }

    pub fn short_ended_elements(&self) -> impl Iterator<Item = &LocalName> {
        self.short_ended.iter()
    }

    pub fn add_block_element(&mut self, name: &str) {
        self.block.insert(LocalName::from(name));
    }

    pub fn add_short_ended_element(&mut self, name: &str) {
        self.short_ended.insert(LocalName::from(name));
    }
}
