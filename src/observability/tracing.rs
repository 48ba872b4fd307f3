//! Subscriber setup. Logs go to stderr so stdout carries only reports.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count when `RUST_LOG` is unset.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber once. `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbosity)));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(verbosity > 1)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(verbosity_filter(0), "warn");
        assert_eq!(verbosity_filter(1), "info");
        assert_eq!(verbosity_filter(2), "debug");
        assert_eq!(verbosity_filter(9), "trace");
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing(0);
        init_tracing(3);
    }
}
