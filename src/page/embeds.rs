use serde::{Deserialize, Serialize};

use crate::host::page::HostPage;
use crate::page::origin::{EMBED_TAGS, embed_source, resolve_source};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedReport {
    pub has_embeds: bool,
    /// Deduplicated, first-seen order.
    pub embed_hostnames: Vec<String>,
}

/// List the hosts of every iframe/embed/object on the page.
///
/// Elements without a usable source still count towards `has_embeds`;
/// sources that do not parse are skipped.
pub fn get_embeds(page: &HostPage) -> EmbedReport {
    let doc = &page.document;
    let embeds: Vec<_> = doc
        .elements()
        .into_iter()
        .filter(|n| {
            doc.tag(*n)
                .map(|t| EMBED_TAGS.contains(&t))
                .unwrap_or(false)
        })
        .collect();

    let mut embed_hostnames: Vec<String> = Vec::new();
    for node in &embeds {
        let host = embed_source(page, *node)
            .and_then(|src| resolve_source(page, src))
            .and_then(|url| url.host_str().map(str::to_string));

        if let Some(host) = host {
            if !host.is_empty() && !embed_hostnames.contains(&host) {
                embed_hostnames.push(host);
            }
        }
    }

    EmbedReport {
        has_embeds: !embeds.is_empty(),
        embed_hostnames,
    }
}
