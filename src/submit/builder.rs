use std::time::{SystemTime, UNIX_EPOCH};

use crate::dom::document::NodeId;
use crate::host::page::HostPage;
use crate::locator::descriptor::{describe_element, short_descriptor};
use crate::locator::xpath::get_xpath;
use crate::page::embeds::get_embeds;
use crate::serialize::serializer::{SerializeOptions, serialize_element_with};
use crate::submit::report_model::{
    AncestorInfo, ClientMetadata, ElementPayload, FeedbackReport, SelectionPayload,
};

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Assemble a report for the current page.
///
/// `selected` is the picked element (with the breadcrumb captured when it
/// was picked, if any); `None` produces page-level feedback.
pub fn build_report(
    page: &HostPage,
    selected: Option<(NodeId, Option<&str>)>,
    feedback: &str,
    options: &SerializeOptions,
    timestamp: u64,
) -> FeedbackReport {
    let selection = match selected {
        Some((element, descriptor)) => {
            SelectionPayload::Element(element_payload(page, element, descriptor, options))
        }
        None => SelectionPayload::Page,
    };

    FeedbackReport {
        url: page.location().to_string(),
        path: page.path().to_string(),
        timestamp,
        metadata: ClientMetadata {
            user_agent: page.user_agent.clone(),
            viewport: page.viewport,
        },
        selection,
        embeds: get_embeds(page),
        feedback: feedback.to_string(),
    }
}

fn element_payload(
    page: &HostPage,
    element: NodeId,
    descriptor: Option<&str>,
    options: &SerializeOptions,
) -> ElementPayload {
    let doc = &page.document;

    ElementPayload {
        xpath: get_xpath(doc, element),
        tag: doc.tag(element).unwrap_or_default().to_string(),
        descriptor: descriptor
            .map(str::to_string)
            .unwrap_or_else(|| describe_element(doc, element)),
        tree: serialize_element_with(doc, element, options),
        ancestors: ancestor_chain(page, element),
    }
}

/// Parents of `element` up to, not including, `<body>`.
pub fn ancestor_chain(page: &HostPage, element: NodeId) -> Vec<AncestorInfo> {
    let doc = &page.document;
    let mut chain = Vec::new();
    let mut current = doc.parent_element(element);

    while let Some(node) = current {
        if doc.is_body(node) {
            break;
        }
        chain.push(AncestorInfo {
            xpath: get_xpath(doc, node),
            tag: doc.tag(node).unwrap_or_default().to_string(),
            descriptor: short_descriptor(doc, node),
        });
        current = doc.parent_element(node);
    }

    chain
}
