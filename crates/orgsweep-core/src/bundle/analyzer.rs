//! Bundle download and fragment iteration.

use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::api::client::ApiClient;
use crate::api::urls::{DeployableKind, OrgApi};
use crate::bundle::parsers::UsagePolicy;
use crate::graph::types::{ResourceGraph, revision_id};

/// Download one revision bundle and feed every configuration fragment under
/// `folder_prefix` to the extraction policy, accumulating discovered names
/// in `used`.
///
/// A failed download or corrupt archive aborts only this revision's scan; a
/// malformed individual fragment is skipped. Both are logged, neither is an
/// error to the caller.
pub fn scan_bundle(
    client: &dyn ApiClient,
    url: &str,
    folder_prefix: &str,
    policy: UsagePolicy,
    used: &mut BTreeSet<String>,
    context: &str,
) {
    let body = match client.get(url) {
        Ok(resp) if resp.is_success() => resp.body,
        Ok(resp) => {
            warn!(
                event = "core.bundle.download_failed",
                context = context,
                status = resp.status
            );
            return;
        }
        Err(e) => {
            warn!(
                event = "core.bundle.download_failed",
                context = context,
                error = %e
            );
            return;
        }
    };

    let mut archive = match ZipArchive::new(Cursor::new(body)) {
        Ok(archive) => archive,
        Err(e) => {
            warn!(
                event = "core.bundle.invalid_archive",
                context = context,
                error = %e
            );
            return;
        }
    };

    let entries: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with(folder_prefix) && n.ends_with(".xml"))
        .map(String::from)
        .collect();

    for entry_name in entries {
        let mut xml = String::new();
        match archive.by_name(&entry_name) {
            Ok(mut entry) => {
                if let Err(e) = entry.read_to_string(&mut xml) {
                    warn!(
                        event = "core.bundle.entry_unreadable",
                        context = context,
                        entry = %entry_name,
                        error = %e
                    );
                    continue;
                }
            }
            Err(e) => {
                warn!(
                    event = "core.bundle.entry_unreadable",
                    context = context,
                    entry = %entry_name,
                    error = %e
                );
                continue;
            }
        }

        if let Err(e) = policy.extract(&xml, used) {
            warn!(
                event = "core.bundle.fragment_parse_failed",
                context = context,
                entry = %entry_name,
                error = %e
            );
        }
    }
}

/// Build the "used" set for a policy by scanning every revision of every
/// surviving proxy and shared flow.
///
/// Deliberately conservative: undeployed-but-present revisions count too.
pub fn scan_surviving_revisions(
    client: &dyn ApiClient,
    api: &OrgApi,
    graph: &ResourceGraph,
    policy: UsagePolicy,
) -> BTreeSet<String> {
    let mut used = BTreeSet::new();

    info!(
        event = "core.bundle.scan_started",
        policy = ?policy,
        proxies = graph.proxies.len(),
        sharedflows = graph.sharedflows.len()
    );

    for proxy in &graph.proxies {
        for key in proxy.revisions.keys() {
            let revision = revision_id(key);
            debug!(
                event = "core.bundle.revision_scan",
                kind = "proxy",
                name = %proxy.name,
                revision = revision
            );
            let url = api.revision_bundle(DeployableKind::Proxy, &proxy.name, revision);
            scan_bundle(
                client,
                &url,
                DeployableKind::Proxy.policies_prefix(),
                policy,
                &mut used,
                &format!("proxy {}", proxy.name),
            );
        }
    }

    for sharedflow in &graph.sharedflows {
        for key in sharedflow.revisions.keys() {
            let revision = revision_id(key);
            debug!(
                event = "core.bundle.revision_scan",
                kind = "sharedflow",
                name = %sharedflow.name,
                revision = revision
            );
            let url = api.revision_bundle(DeployableKind::SharedFlow, &sharedflow.name, revision);
            scan_bundle(
                client,
                &url,
                DeployableKind::SharedFlow.policies_prefix(),
                policy,
                &mut used,
                &format!("sharedflow {}", sharedflow.name),
            );
        }
    }

    info!(event = "core.bundle.scan_completed", used = used.len());
    used
}

#[cfg(test)]
pub(crate) mod test_bundles {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    /// Build an in-memory bundle zip from (entry name, xml) pairs.
    pub fn zip_bundle(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, content) in entries {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }
}
