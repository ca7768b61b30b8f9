#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature enabled the usual `tracing` macros are
//! re-exported here so downstream crates can log through
//! `timeslide_core::debug!` without naming `tracing` themselves. The
//! `tracing-json` feature adds a one-call JSON subscriber for production
//! hosts.
//!
//! Without either feature this module is empty and the crate carries no
//! logging dependency.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable consulted by [`init_json_logging`] for the filter
/// directive (same syntax as `RUST_LOG`).
pub const LOG_FILTER_ENV: &str = "TIMESLIDE_LOG";

/// Default filter directive when [`LOG_FILTER_ENV`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "timeslide=info,timeslide_core=info,timeslide_widgets=info";

/// Install a global JSON `tracing` subscriber.
///
/// Returns `false` if a global subscriber was already installed; the
/// existing subscriber is kept in that case.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        let _ = init_json_logging();
        assert!(!init_json_logging());
    }
}
