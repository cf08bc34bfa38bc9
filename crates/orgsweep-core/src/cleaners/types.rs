use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::client::ApiClient;
use crate::api::urls::OrgApi;
use crate::api::waiter::WaitPolicy;
use crate::cleaners::errors::CleanError;
use crate::graph::types::ResourceGraph;

/// Collaborators shared by every cleaner. The graph itself is passed as
/// `&mut` to [`Cleaner::delete`] so the single-writer discipline stays
/// visible at every call site.
pub struct CleanContext<'a> {
    pub client: &'a dyn ApiClient,
    pub api: &'a OrgApi,
    pub undeploy_wait: WaitPolicy,
    pub attachment_wait: WaitPolicy,
}

impl<'a> CleanContext<'a> {
    pub fn new(client: &'a dyn ApiClient, api: &'a OrgApi) -> Self {
        Self {
            client,
            api,
            undeploy_wait: WaitPolicy::undeploy(),
            attachment_wait: WaitPolicy::attachment(),
        }
    }
}

/// What one cleaner pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    /// Confirmed deleted remotely (or already gone) and removed from the graph.
    pub deleted: usize,
    /// Left alone on purpose: protected, or a blocking dependency exists.
    pub skipped: usize,
    /// Delete attempted and failed; entity retained for a future run.
    pub retained: usize,
}

impl CleanStats {
    pub fn merge(&mut self, other: CleanStats) {
        self.deleted += other.deleted;
        self.skipped += other.skipped;
        self.retained += other.retained;
    }
}

/// Fetch and decode a live listing. Cleaners working from a live listing
/// rather than the snapshot cannot run at all without one, so every failure
/// here is a [`CleanError`].
pub(crate) fn fetch_listing<T: DeserializeOwned>(
    client: &dyn ApiClient,
    url: &str,
    resource: &'static str,
) -> Result<T, CleanError> {
    let response = client
        .get(url)
        .map_err(|source| CleanError::ListingUnavailable { resource, source })?;
    if !response.is_success() {
        return Err(CleanError::ListingFailed {
            resource,
            status: response.status,
        });
    }
    response.json().map_err(|e| CleanError::ListingMalformed {
        resource,
        message: e.to_string(),
    })
}

/// One resource kind's deletion pass.
pub trait Cleaner {
    fn name(&self) -> &'static str;

    /// Run the pass once: decide eligibility, detach/undeploy, prune the
    /// graph, delete remotely. Blocking dependencies and failed deletes are
    /// not errors; an `Err` means the pass could not run at all (for
    /// example, a live listing was unavailable).
    fn delete(&self, graph: &mut ResourceGraph, ctx: &CleanContext) -> Result<CleanStats, CleanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_stats_merge() {
        let mut total = CleanStats {
            deleted: 1,
            skipped: 2,
            retained: 0,
        };
        total.merge(CleanStats {
            deleted: 3,
            skipped: 0,
            retained: 1,
        });
        assert_eq!(
            total,
            CleanStats {
                deleted: 4,
                skipped: 2,
                retained: 1
            }
        );
    }
}
