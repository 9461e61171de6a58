/// Creates an markup5ever::QualName.
/// Given a local name and an optional namespace
#[macro_export]
macro_rules! qual_name {
    ($local:tt $(, $ns:ident)?) => {
        $crate::QualName {
            prefix: None,
            ns: $crate::ns!($($ns)?),
            local: $crate::local_name!($local),
        }
    };
}

/// A non-namespaced `QualName` for attribute names outside the static atom set (`data-*` and friends)
pub fn attr_name(local: &str) -> crate::QualName {
    crate::QualName::new(None, crate::ns!(), crate::LocalName::from(local))
}

/// An HTML-namespaced `QualName` for an element tag name
pub fn html_name(local: &str) -> crate::QualName {
    crate::QualName::new(None, crate::ns!(html), crate::LocalName::from(local))
}
