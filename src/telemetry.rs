//! Telemetry helpers for applications embedding `chart-lifecycle`.
//!
//! Lifecycle transitions are emitted through `tracing`. Hosts can either call
//! `init_default_tracing` or wire their own subscriber and filters, for
//! example `RUST_LOG=chart_lifecycle=debug` to follow every create/dispose.

/// Filter used when `RUST_LOG` is unset: lifecycle summaries from this crate,
/// only warnings from everything else.
pub const DEFAULT_LOG_DIRECTIVES: &str = "warn,chart_lifecycle=info";

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// `RUST_LOG` wins when set; otherwise `DEFAULT_LOG_DIRECTIVES` applies.
/// Returns `false` when the feature is disabled or the host application
/// already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
