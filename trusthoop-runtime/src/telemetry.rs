//! Tracing setup

use tracing_subscriber::{fmt, EnvFilter};

/// Map a verbosity count to a default filter directive
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a compact fmt subscriber. `RUST_LOG` overrides `verbosity`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(verbosity: u8) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(1);
        assert!(!init_tracing(2));
    }
}
