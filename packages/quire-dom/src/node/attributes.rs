use std::ops::{Deref, DerefMut};

use markup5ever::{LocalName, QualName, ns};

/// A tag attribute, e.g. `class="test"` in `<div class="test" ...>`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Attribute {
    /// The name of the attribute (e.g. the `class` in `<div class="test">`)
    pub name: QualName,
    /// The value of the attribute (e.g. the `"test"` in `<div class="test">`)
    pub value: String,
}

impl Attribute {
    /// A non-namespaced attribute. Works for names outside the static atom set such as `data-*`.
    pub fn new(local: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(local)),
            value: value.into(),
        }
    }
}

/// An element's attribute list. Attribute order is preserved for serialization.
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    inner: Vec<Attribute>,
}

impl Attributes {
    pub fn new(inner: Vec<Attribute>) -> Self {
        Self { inner }
    }

    pub fn get(&self, local: &LocalName) -> Option<&str> {
        self.inner
            .iter()
            .find(|attr| attr.name.local == *local)
            .map(|attr| attr.value.as_str())
    }

    /// Insert or overwrite. Returns true when the stored value actually changed.
    pub fn set(&mut self, name: QualName, value: &str) -> bool {
        match self.inner.iter_mut().find(|a| a.name.local == name.local) {
            Some(existing) if existing.value == value => false,
            Some(existing) => {
                existing.value.clear();
                existing.value.push_str(value);
                true
            }
            None => {
                self.inner.push(Attribute {
                    name,
                    value: value.to_string(),
                });
                true
            }
        }
    }

    /// Attributes are matched by local name only; the editor never deals in namespaced attributes.
    pub fn remove(&mut self, local: &LocalName) -> Option<Attribute> {
        let idx = self.inner.iter().position(|attr| attr.name.local == *local)?;
        Some(self.inner.remove(idx))
    }
}

impl Deref for Attributes {
    type Target = Vec<Attribute>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl DerefMut for Attributes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
