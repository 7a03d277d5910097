use std::collections::HashMap;

use serde::Deserialize;

use crate::dom::document::{Document, FrameAccess, NodeId};
use crate::dom::geometry::{Rect, Viewport};
use crate::error::SnapshotError;

/// Page snapshot as emitted by the extraction script: page metadata plus the
/// full node tree starting at `<html>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub viewport: Viewport,
    pub root: SnapshotNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotNode {
    Element {
        tag: String,
        #[serde(default)]
        attributes: Vec<SnapshotAttribute>,
        #[serde(default)]
        style: HashMap<String, String>,
        #[serde(default)]
        rect: Rect,
        #[serde(default)]
        frame: FrameAccess,
        #[serde(default)]
        children: Vec<SnapshotNode>,
    },
    Text {
        text: String,
    },
    Comment {
        #[serde(default)]
        text: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotAttribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl PageSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Parse {
            context: "page snapshot".into(),
            source: e,
        })
    }

    pub fn load(path: &str) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Read {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Build the arena document; the snapshot root becomes the document element.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        build_node(&mut doc, root, &self.root);
        doc
    }
}

fn build_node(doc: &mut Document, parent: NodeId, node: &SnapshotNode) {
    match node {
        SnapshotNode::Element {
            tag,
            attributes,
            style,
            rect,
            frame,
            children,
        } => {
            let id = doc.create_element(tag);
            if let Some(el) = doc.element_mut(id) {
                el.attributes = attributes
                    .iter()
                    .map(|a| (a.name.clone(), a.value.clone()))
                    .collect();
                el.computed_style = style.clone();
                el.rect = *rect;
                el.frame_access = *frame;
            }
            doc.append_child(parent, id);
            for child in children {
                build_node(doc, id, child);
            }
        }
        SnapshotNode::Text { text } => {
            doc.append_text(parent, text);
        }
        SnapshotNode::Comment { text } => {
            let id = doc.create_comment(text);
            doc.append_child(parent, id);
        }
    }
}

/// Resolve a `/`-separated path of element-child indices (0-based) from the
/// document element, e.g. `1/0/2` = third element child of the first element
/// child of `<body>` when `<head>` comes first.
pub fn resolve_node_path(doc: &Document, path: &str) -> Result<NodeId, SnapshotError> {
    let not_found = || SnapshotError::NodeNotFound(path.to_string());
    let mut current = doc.document_element().ok_or_else(not_found)?;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let index: usize = segment.parse().map_err(|_| not_found())?;
        current = doc
            .element_children(current)
            .nth(index)
            .ok_or_else(not_found)?;
    }

    Ok(current)
}

/// First connected element whose `id` attribute equals `id`.
pub fn find_by_id(doc: &Document, id: &str) -> Option<NodeId> {
    doc.elements()
        .into_iter()
        .find(|n| doc.element_id(*n) == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "url": "https://shop.example.com/cart",
        "userAgent": "TestAgent/1.0",
        "viewport": { "width": 800, "height": 600 },
        "root": {
            "type": "element",
            "tag": "HTML",
            "children": [
                { "type": "element", "tag": "head" },
                {
                    "type": "element",
                    "tag": "body",
                    "children": [
                        { "type": "element", "tag": "div", "attributes": [{ "name": "id", "value": "main" }],
                          "rect": { "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0 },
                          "children": [ { "type": "text", "text": "hi" }, { "type": "comment", "text": "x" } ] },
                        { "type": "element", "tag": "iframe", "frame": "cross-origin" }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn snapshot_builds_document() {
        let snap = PageSnapshot::from_json(SNAPSHOT).unwrap();
        let doc = snap.to_document();

        assert_eq!(snap.viewport.width, 800);
        assert_eq!(snap.user_agent, "TestAgent/1.0");

        let body = doc.body().unwrap();
        let main = find_by_id(&doc, "main").unwrap();
        assert_eq!(doc.parent(main), Some(body));
        assert_eq!(doc.tag(doc.document_element().unwrap()), Some("html"));
        assert_eq!(doc.text_content(main), "hi");
        assert_eq!(doc.rect(main).height, 4.0);

        let iframe = resolve_node_path(&doc, "1/1").unwrap();
        assert_eq!(
            doc.element(iframe).unwrap().frame_access,
            FrameAccess::CrossOrigin
        );
    }

    #[test]
    fn bad_node_path_is_an_error() {
        let doc = PageSnapshot::from_json(SNAPSHOT).unwrap().to_document();
        assert!(resolve_node_path(&doc, "1/7").is_err());
        assert!(resolve_node_path(&doc, "x").is_err());
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        assert!(matches!(
            PageSnapshot::from_json("{\"url\": 1}"),
            Err(SnapshotError::Parse { .. })
        ));
    }
}
