//! Tracing setup for hosts embedding `chart-control`.
//!
//! The control only emits `tracing` events. Scheduler decisions (deferred,
//! coalesced and flushed calls) are logged at `debug` under
//! `chart_control::api`; per-request classification is at `trace`.

/// Filter applied when `RUST_LOG` is unset: scheduler decisions visible,
/// everything else at `info`.
pub const DEFAULT_FILTER: &str = "chart_control=info,chart_control::api=debug";

/// Installs a compact subscriber using [`DEFAULT_FILTER`] as fallback.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Installs a compact subscriber when the `telemetry` feature is enabled.
///
/// `RUST_LOG` wins over `fallback_filter`. Returns `false` when the feature is
/// disabled, the fallback does not parse, or the host already installed a
/// global subscriber.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match EnvFilter::try_new(fallback_filter) {
                Ok(filter) => filter,
                Err(_) => return false,
            },
        };
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
