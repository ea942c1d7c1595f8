//! Tracing setup for the intake CLI.
//!
//! Submissions handed to the log sink are `info` events under the `intake`
//! target, so the default filter keeps them visible while silencing
//! dependencies below `warn`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,intake=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; falls back to `warn,intake=info` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=intake=debug intake submit --name Ann ...
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn default_filter_lets_intake_info_through() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).expect("valid directive");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        assert!(filter.to_string().contains("intake=info"));
    }
}
