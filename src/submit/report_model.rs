use serde::Serialize;

use crate::dom::geometry::Viewport;
use crate::page::embeds::EmbedReport;
use crate::serialize::model::SerializedNode;

// ============================================================================
// Feedback report: the JSON body POSTed to the collection endpoint
// ============================================================================

/// One submission attempt. Built once, sent once, then dropped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    /// Full page URL at submission time
    pub url: String,

    /// URL path only
    pub path: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: u64,

    pub metadata: ClientMetadata,

    pub selection: SelectionPayload,

    pub embeds: EmbedReport,

    /// Free text typed by the user
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetadata {
    pub user_agent: String,
    pub viewport: Viewport,
}

/// Either a picked element or a page-level marker.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionPayload {
    Element(ElementPayload),
    Page,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPayload {
    pub xpath: String,
    pub tag: String,
    /// Breadcrumb, e.g. `section#pricing > div.card > button`
    pub descriptor: String,
    pub tree: SerializedNode,
    /// Nearest parent first, stopping before `<body>`.
    pub ancestors: Vec<AncestorInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorInfo {
    pub xpath: String,
    pub tag: String,
    pub descriptor: String,
}

impl FeedbackReport {
    pub fn is_page_level(&self) -> bool {
        matches!(self.selection, SelectionPayload::Page)
    }

    pub fn element(&self) -> Option<&ElementPayload> {
        match &self.selection {
            SelectionPayload::Element(e) => Some(e),
            SelectionPayload::Page => None,
        }
    }
}
