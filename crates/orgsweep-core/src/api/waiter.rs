//! Bounded fixed-interval polling for asynchronous remote operations.
//!
//! Timeouts are deliberately non-fatal: callers treat a `false` return as
//! "proceed anyway". The only retries in the whole system live in these
//! loops and in the transport's credential refresh.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::api::client::ApiClient;
use crate::api::types::{DeploymentState, OperationStatus};

/// Timeout and poll interval for one kind of wait. No backoff; the interval
/// is fixed and scaled to the operation kind.
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitPolicy {
    /// Undeploys converge quickly; poll fast with a moderate bound.
    pub const fn undeploy() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            interval: Duration::from_secs(2),
        }
    }

    /// Cross-region attachment operations are slow; poll less often with a
    /// much longer bound.
    pub const fn attachment() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            interval: Duration::from_secs(5),
        }
    }
}

/// Poll a revision's deployment endpoint until it no longer reports a live
/// deployment, or the timeout elapses.
///
/// Converged means a 404 (deployment record gone) or a 200 whose body lacks
/// a `DEPLOYED`/`IN_PROGRESS` state. Poll errors are logged and polling
/// continues; the clock keeps running.
pub fn wait_for_undeploy(
    client: &dyn ApiClient,
    url: &str,
    policy: WaitPolicy,
    resource: &str,
) -> bool {
    info!(event = "core.waiter.undeploy_wait_started", resource = resource);
    let deadline = Instant::now() + policy.timeout;

    loop {
        match client.get(url) {
            Ok(resp) if resp.is_not_found() => {
                info!(event = "core.waiter.undeploy_confirmed", resource = resource);
                return true;
            }
            Ok(resp) if resp.is_success() => {
                let state = resp
                    .json::<DeploymentState>()
                    .ok()
                    .and_then(|d| d.state);
                match state.as_deref() {
                    Some("DEPLOYED") | Some("IN_PROGRESS") => {}
                    _ => {
                        info!(
                            event = "core.waiter.undeploy_state_cleared",
                            resource = resource
                        );
                        return true;
                    }
                }
            }
            Ok(resp) => {
                warn!(
                    event = "core.waiter.undeploy_poll_unexpected_status",
                    resource = resource,
                    status = resp.status
                );
            }
            Err(e) => {
                warn!(
                    event = "core.waiter.undeploy_poll_error",
                    resource = resource,
                    error = %e
                );
            }
        }

        if Instant::now() >= deadline {
            warn!(event = "core.waiter.undeploy_timeout", resource = resource);
            return false;
        }
        std::thread::sleep(policy.interval);
    }
}

/// Poll a long-running operation until it reports `done`, or the timeout
/// elapses.
///
/// A completed operation carrying an `error` field is failure: logged and
/// returned as `false`, never raised.
pub fn wait_for_operation(
    client: &dyn ApiClient,
    url: &str,
    policy: WaitPolicy,
    context: &str,
) -> bool {
    info!(event = "core.waiter.operation_wait_started", context = context);
    let deadline = Instant::now() + policy.timeout;

    loop {
        match client.get(url) {
            Ok(resp) if resp.is_success() => match resp.json::<OperationStatus>() {
                Ok(status) if status.done => {
                    if let Some(error) = status.error {
                        warn!(
                            event = "core.waiter.operation_failed",
                            context = context,
                            error = %error
                        );
                        return false;
                    }
                    info!(event = "core.waiter.operation_completed", context = context);
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        event = "core.waiter.operation_status_unreadable",
                        context = context,
                        error = %e
                    );
                }
            },
            Ok(resp) => {
                warn!(
                    event = "core.waiter.operation_poll_unexpected_status",
                    context = context,
                    status = resp.status
                );
            }
            Err(e) => {
                warn!(
                    event = "core.waiter.operation_poll_error",
                    context = context,
                    error = %e
                );
            }
        }

        if Instant::now() >= deadline {
            warn!(event = "core.waiter.operation_timeout", context = context);
            return false;
        }
        std::thread::sleep(policy.interval);
    }
}

#[cfg(test)]
pub(crate) fn immediate_policy() -> WaitPolicy {
    WaitPolicy {
        timeout: Duration::from_millis(0),
        interval: Duration::from_millis(0),
    }
}
