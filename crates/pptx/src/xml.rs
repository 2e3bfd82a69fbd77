//! Small helpers shared by the XML part readers.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesStart;

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Unescaped attribute value, falling back to the raw bytes.
pub(crate) fn attr_value(attr: &Attribute<'_>) -> String {
    match attr.unescape_value() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
    }
}

/// Value of the attribute with the given qualified name.
pub(crate) fn get_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| attr_value(&attr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_get_attr_unescapes() {
        let mut e = BytesStart::new("p:cNvPr");
        e.push_attribute(("name", "Q&A"));
        assert_eq!(get_attr(&e, b"name").as_deref(), Some("Q&A"));
        assert_eq!(get_attr(&e, b"id"), None);
    }
}
