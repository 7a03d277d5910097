use serde::ser::{Serialize, Serializer};

/// Insertion-ordered string map; serialises as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, String)>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Redacted snapshot of one element and (depth permitting) its element children.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SerializedNode {
    pub tag: String,
    pub attributes: FieldMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub styles: FieldMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedNode>,
}
