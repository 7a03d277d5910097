use serde_json::json;
use tracing::info;

use crate::cli::config::TargetArgs;
use crate::dom::document::NodeId;
use crate::dom::snapshot::{PageSnapshot, find_by_id, resolve_node_path};
use crate::error::{SnapshotError, SubmitError, WidgetError};
use crate::host::page::HostPage;
use crate::locator::descriptor::describe_element;
use crate::locator::xpath::get_xpath;
use crate::page::classifier::classify_page;
use crate::page::embeds::get_embeds;
use crate::serialize::serializer::{SerializeOptions, serialize_element_with};
use crate::submit::builder::{build_report, now_ms};
use crate::submit::transport::{HttpTransport, SubmissionRequest, Transport};
use crate::widget::config::WidgetConfig;

// ============================================================================
// classify subcommand
// ============================================================================

pub fn cmd_classify(snapshot_path: &str) -> Result<String, WidgetError> {
    let page = load_page(snapshot_path)?;
    let signal = classify_page(&page);
    let embeds = get_embeds(&page);

    let output = json!({
        "url": page.location().as_str(),
        "sensitive": signal.is_sensitive,
        "signal": signal.signal,
        "embeds": embeds,
    });
    Ok(to_pretty(&output)?)
}

// ============================================================================
// locate subcommand
// ============================================================================

pub fn cmd_locate(snapshot_path: &str, target: &TargetArgs) -> Result<String, WidgetError> {
    let page = load_page(snapshot_path)?;
    let node = resolve_target(&page, target)?;
    let doc = &page.document;

    match node {
        Some(node) => Ok(format!(
            "{}\n{}\n",
            get_xpath(doc, node),
            describe_element(doc, node)
        )),
        None => Ok("(page)\n".to_string()),
    }
}

// ============================================================================
// serialize subcommand
// ============================================================================

pub fn cmd_serialize(
    snapshot_path: &str,
    target: &TargetArgs,
    depth: usize,
) -> Result<String, WidgetError> {
    let page = load_page(snapshot_path)?;
    let node = match resolve_target(&page, target)? {
        Some(node) => node,
        None => page
            .document
            .body()
            .ok_or_else(|| SnapshotError::NodeNotFound("body".into()))?,
    };

    let tree = serialize_element_with(&page.document, node, &SerializeOptions::with_depth(depth));
    Ok(to_pretty(&tree)?)
}

// ============================================================================
// report subcommand
// ============================================================================

/// Build the report; with `send`, deliver it once and report the outcome.
pub fn cmd_report(
    snapshot_path: &str,
    target: &TargetArgs,
    text: &str,
    send: bool,
    config: &WidgetConfig,
) -> Result<String, WidgetError> {
    if send {
        config.validate()?;
    }
    if text.trim().is_empty() {
        return Err(SubmitError::EmptyFeedback.into());
    }

    let page = load_page(snapshot_path)?;
    let node = resolve_target(&page, target)?;
    let report = build_report(
        &page,
        node.map(|n| (n, None)),
        text,
        &config.serialize_options(),
        now_ms(),
    );

    let body = to_pretty(&report)?;
    if !send {
        return Ok(body);
    }

    let request = SubmissionRequest::new(config.resolved_endpoint(), &config.api_key, &report)?;
    HttpTransport::default().send(&request)?;
    info!(endpoint = %request.endpoint, "report delivered");
    Ok(format!("{}\nsent to {}\n", body, request.endpoint))
}

// ============================================================================
// Helpers
// ============================================================================

pub fn load_page(snapshot_path: &str) -> Result<HostPage, SnapshotError> {
    let snapshot = PageSnapshot::load(snapshot_path)?;
    HostPage::from_snapshot(&snapshot)
}

/// `--id` wins over `--node-path`; neither means page-level.
pub fn resolve_target(page: &HostPage, target: &TargetArgs) -> Result<Option<NodeId>, SnapshotError> {
    if let Some(id) = &target.id {
        return find_by_id(&page.document, id)
            .map(Some)
            .ok_or_else(|| SnapshotError::NodeNotFound(format!("#{}", id)));
    }
    match &target.node_path {
        Some(path) => resolve_node_path(&page.document, path).map(Some),
        None => Ok(None),
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| SnapshotError::Parse {
            context: "output encoding".into(),
            source: e,
        })
}
