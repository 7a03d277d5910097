use crate::dom::document::{Document, NodeId};
use crate::serialize::model::{FieldMap, SerializedNode};

pub const REDACTED: &str = "[REDACTED]";

/// Longest text capture, in UTF-16 code units.
pub const MAX_TEXT_UNITS: usize = 200;

/// Attribute names containing any of these are redacted.
const REDACTED_ATTRIBUTE_TERMS: &[&str] = &["password", "ssn", "card", "credit", "cvv", "pin"];

const FORM_CONTROLS: &[&str] = &["input", "textarea", "select"];

pub const STYLE_PROPERTIES: &[&str] = &[
    "display",
    "position",
    "width",
    "height",
    "margin",
    "padding",
    "background-color",
    "color",
    "font-size",
    "font-family",
    "border",
    "border-radius",
    "box-shadow",
    "overflow",
    "text-align",
];

/// What happens to the `value` attribute of form controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValuePolicy {
    /// Drop the attribute.
    #[default]
    Strip,
    /// Keep the attribute with a fixed stand-in (fixtures only).
    Placeholder(String),
}

#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
    /// How many levels of element children to include; 0 = none.
    pub depth: usize,
    pub value_policy: ValuePolicy,
}

impl SerializeOptions {
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// Serialize `node` and up to `depth` levels of element children.
pub fn serialize_element(doc: &Document, node: NodeId, depth: usize) -> SerializedNode {
    serialize_with(doc, node, &SerializeOptions::with_depth(depth), 0)
}

pub fn serialize_element_with(
    doc: &Document,
    node: NodeId,
    options: &SerializeOptions,
) -> SerializedNode {
    serialize_with(doc, node, options, 0)
}

fn serialize_with(
    doc: &Document,
    node: NodeId,
    options: &SerializeOptions,
    current_depth: usize,
) -> SerializedNode {
    let tag = doc.tag(node).unwrap_or_default().to_ascii_lowercase();
    let is_form_control = FORM_CONTROLS.contains(&tag.as_str());

    let children = if current_depth < options.depth {
        doc.element_children(node)
            .map(|child| serialize_with(doc, child, options, current_depth + 1))
            .collect()
    } else {
        vec![]
    };

    let is_leaf = doc.element_children(node).next().is_none();
    let text = if is_leaf && !is_form_control && !doc.is_content_editable(node) {
        Some(truncate_utf16(&doc.text_content(node), MAX_TEXT_UNITS)).filter(|t| !t.is_empty())
    } else {
        None
    };

    SerializedNode {
        attributes: serialize_attributes(doc, node, is_form_control, &options.value_policy),
        text,
        styles: capture_styles(doc, node),
        children,
        tag,
    }
}

fn serialize_attributes(
    doc: &Document,
    node: NodeId,
    is_form_control: bool,
    value_policy: &ValuePolicy,
) -> FieldMap {
    let mut out = FieldMap::new();
    let Some(el) = doc.element(node) else {
        return out;
    };

    for (name, value) in &el.attributes {
        if is_sensitive_attribute(name) {
            out.insert(name.as_str(), REDACTED);
        } else if is_form_control && name.eq_ignore_ascii_case("value") {
            if let ValuePolicy::Placeholder(stand_in) = value_policy {
                out.insert(name.as_str(), stand_in.as_str());
            }
        } else {
            out.insert(name.as_str(), value.as_str());
        }
    }

    out
}

pub fn is_sensitive_attribute(name: &str) -> bool {
    let lower = name.to_lowercase();
    REDACTED_ATTRIBUTE_TERMS.iter().any(|t| lower.contains(t))
}

fn capture_styles(doc: &Document, node: NodeId) -> FieldMap {
    let mut out = FieldMap::new();
    for property in STYLE_PROPERTIES {
        match doc.computed_style(node, property) {
            Some(value) if !value.is_empty() && !value.contains("data:") => {
                out.insert(*property, value);
            }
            _ => {}
        }
    }
    out
}

/// First `max_units` UTF-16 code units of `text`. A surrogate pair cut in
/// half becomes U+FFFD, which is still one unit.
pub fn truncate_utf16(text: &str, max_units: usize) -> String {
    if text.encode_utf16().count() <= max_units {
        return text.to_string();
    }
    let units: Vec<u16> = text.encode_utf16().take(max_units).collect();
    String::from_utf16_lossy(&units)
}
