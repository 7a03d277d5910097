use url::Url;

use crate::dom::document::{FrameAccess, NodeId};
use crate::host::page::HostPage;

pub const EMBED_TAGS: &[&str] = &["iframe", "embed", "object"];

/// Resource URL attribute of an embedding element (`src`, or `data` for `<object>`).
pub fn embed_source(page: &HostPage, node: NodeId) -> Option<&str> {
    let doc = &page.document;
    let attr = match doc.tag(node)? {
        "iframe" | "embed" => "src",
        "object" => "data",
        _ => return None,
    };
    doc.attribute(node, attr).filter(|s| !s.trim().is_empty())
}

/// Resolve an embed source against the page URL (like `new URL(src, location.href)`).
pub fn resolve_source(page: &HostPage, src: &str) -> Option<Url> {
    page.location().join(src.trim()).ok()
}

pub fn is_embed(page: &HostPage, node: NodeId) -> bool {
    page.document
        .tag(node)
        .map(|t| EMBED_TAGS.contains(&t))
        .unwrap_or(false)
}

/// Whether an iframe/embed/object shows content from another origin.
///
/// An inconclusive check counts as cross-origin: a blocked `contentDocument`
/// or a source URL that does not parse. `srcdoc` frames and `about:` or
/// `javascript:` sources inherit the page origin.
pub fn is_cross_origin_embed(page: &HostPage, node: NodeId) -> bool {
    let Some(el) = page.document.element(node) else {
        return false;
    };

    match (el.tag.as_str(), el.frame_access) {
        ("iframe", FrameAccess::CrossOrigin | FrameAccess::Blocked) => return true,
        ("iframe", FrameAccess::Accessible) => return false,
        _ => {}
    }

    if !is_embed(page, node) {
        return false;
    }
    if el.tag == "iframe" && page.document.attribute(node, "srcdoc").is_some() {
        return false;
    }

    match embed_source(page, node) {
        None => false,
        Some(src) => match resolve_source(page, src) {
            Some(url) if inherits_origin(&url) => false,
            Some(url) => url.origin() != page.location().origin(),
            None => true,
        },
    }
}

fn inherits_origin(url: &Url) -> bool {
    matches!(url.scheme(), "about" | "javascript")
}
