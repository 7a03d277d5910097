use crate::dom::document::{Document, NodeId};

/// Levels walked (including the element itself) when building a breadcrumb.
pub const BREADCRUMB_DEPTH: usize = 4;

/// Human-readable breadcrumb such as `main#content > div.card > p`.
///
/// Walks at most [`BREADCRUMB_DEPTH`] levels upward. An IDed element ends
/// the walk as `tag#id`; other levels are `tag` or `tag.firstClass`. The
/// walk never includes `<body>` or `<html>`.
pub fn describe_element(doc: &Document, node: NodeId) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = Some(node);

    while let Some(n) = current {
        if segments.len() == BREADCRUMB_DEPTH {
            break;
        }
        let Some(tag) = doc.tag(n) else { break };
        if tag == "body" || tag == "html" {
            break;
        }

        if let Some(id) = doc.element_id(n) {
            segments.push(format!("{}#{}", tag, id));
            break;
        }

        segments.push(short_segment(doc, n));
        current = doc.parent_element(n);
    }

    if segments.is_empty() {
        return doc.tag(node).unwrap_or_default().to_string();
    }

    segments.reverse();
    segments.join(" > ")
}

/// One-level label: `tag#id`, else `tag.firstClass`, else `tag`.
pub fn short_descriptor(doc: &Document, node: NodeId) -> String {
    match (doc.tag(node), doc.element_id(node)) {
        (Some(tag), Some(id)) => format!("{}#{}", tag, id),
        (Some(_), None) => short_segment(doc, node),
        (None, _) => String::new(),
    }
}

fn short_segment(doc: &Document, node: NodeId) -> String {
    let tag = doc.tag(node).unwrap_or_default();
    match doc.first_class(node) {
        Some(class) => format!("{}.{}", tag, class),
        None => tag.to_string(),
    }
}
