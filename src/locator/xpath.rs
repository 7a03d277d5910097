use crate::dom::document::{Document, NodeId};

/// Address of `document.body`.
pub const BODY_PATH: &str = "/html/body";

/// Structural address of an element, XPath-like.
///
/// - an element with a non-empty `id` is addressed as `//*[@id="…"]` and the
///   walk stops there, so paths below an IDed ancestor are anchored on it;
/// - `<body>` is always [`BODY_PATH`];
/// - an element without an element parent is just its tag name;
/// - otherwise `<parent address>/<tag>[n]` where `n` counts same-tag
///   element siblings up to and including this one.
///
/// Non-element nodes have no address (empty string).
pub fn get_xpath(doc: &Document, node: NodeId) -> String {
    let Some(tag) = doc.tag(node) else {
        return String::new();
    };

    if let Some(id) = doc.element_id(node) {
        return format!("//*[@id=\"{}\"]", id);
    }

    if doc.is_body(node) {
        return BODY_PATH.to_string();
    }

    let Some(parent) = doc.parent_element(node) else {
        return tag.to_string();
    };

    let index = doc
        .children(parent)
        .iter()
        .take_while(|c| **c != node)
        .filter(|c| doc.tag(**c) == Some(tag))
        .count()
        + 1;

    format!("{}/{}[{}]", get_xpath(doc, parent), tag, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_quotes_are_kept_verbatim() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[("id", "a\"b")]);
        assert_eq!(get_xpath(&doc, div), "//*[@id=\"a\"b\"]");
    }

    #[test]
    fn text_nodes_have_no_address() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[]);
        let text = doc.append_text(div, "x");
        assert_eq!(get_xpath(&doc, text), "");
    }
}
