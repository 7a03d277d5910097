use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dom::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// What the page lets us know about an iframe's content document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameAccess {
    /// Not recorded; callers fall back to comparing origins.
    #[default]
    Unknown,
    Accessible,
    CrossOrigin,
    /// Touching `contentDocument` threw.
    Blocked,
}

#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Always stored lower-cased.
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub rect: Rect,
    pub computed_style: HashMap<String, String>,
    pub frame_access: FrameAccess,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed DOM tree. Node 0 is always the document node.
///
/// Nodes are never freed: `detach` only unlinks a subtree, so a `NodeId`
/// held by a caller stays valid (it just stops being connected).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: vec![],
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: vec![],
        });
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if it was attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Create an element with attributes and append it under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.append_child(parent, id);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            match el
                .attributes
                .iter()
                .position(|(n, _)| n.eq_ignore_ascii_case(name))
            {
                Some(i) => el.attributes[i].1 = value.to_string(),
                None => el.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(el) = self.element_mut(node) {
            el.rect = rect;
        }
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.computed_style
                .insert(property.to_string(), value.to_string());
        }
    }

    pub fn set_frame_access(&mut self, node: NodeId, access: FrameAccess) {
        if let Some(el) = self.element_mut(node) {
            el.frame_access = access;
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn has_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node) == Some(tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    /// `parentElement`: the parent only if it is an element.
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|p| self.is_element(*p))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
    }

    /// Attribute lookup; names compare ASCII case-insensitively like HTML.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `id` attribute, if present and non-empty.
    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    pub fn first_class(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "class")?.split_whitespace().next()
    }

    pub fn rect(&self, node: NodeId) -> Rect {
        self.element(node).map(|el| el.rect).unwrap_or_default()
    }

    pub fn computed_style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .computed_style
            .get(property)
            .map(String::as_str)
    }

    /// Inclusive descendant test (`Node.contains`).
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root(), node)
    }

    /// Parent chain from the nearest parent upward, excluding `node` itself.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// All descendants of `node` in document (pre-)order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Every connected element in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|n| self.is_element(*n))
            .collect()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|n| self.has_tag(*n, tag))
            .collect()
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.root()).next()
    }

    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.element_children(html).find(|c| self.has_tag(*c, "body"))
    }

    pub fn is_body(&self, node: NodeId) -> bool {
        self.body() == Some(node)
    }

    /// `textContent`: concatenated data of every descendant text node.
    pub fn text_content(&self, node: NodeId) -> String {
        match self.kind(node) {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Comment(_) => String::new(),
            _ => self
                .descendants(node)
                .into_iter()
                .filter_map(|n| match self.kind(n) {
                    NodeKind::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// `isContentEditable`: the nearest element carrying `contenteditable` decides.
    pub fn is_content_editable(&self, node: NodeId) -> bool {
        let mut current = Some(node).filter(|n| self.is_element(*n));
        while let Some(n) = current {
            if let Some(value) = self.attribute(n, "contenteditable") {
                return match value.to_ascii_lowercase().as_str() {
                    "" | "true" | "plaintext-only" => true,
                    "false" => false,
                    _ => {
                        current = self.parent_element(n);
                        continue;
                    }
                };
            }
            current = self.parent_element(n);
        }
        false
    }
}
