use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional verbose mode.
///
/// By default only error-level events are emitted so stdout stays clean for
/// user-facing output. With `verbose` set, info-level and above events are
/// emitted (cleaner progress, skip decisions, wait loops).
pub fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "error" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive(
                    format!("orgsweep={level}")
                        .parse()
                        .expect("Invalid log directive"),
                )
                .add_directive(
                    format!("orgsweep_core={level}")
                        .parse()
                        .expect("Invalid log directive"),
                ),
        )
        .init();
}
