//! Tracing setup for the storefront binaries.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. The database engine is held at
/// `warn` so per-query chatter does not drown request logs.
fn default_directives(level: Level) -> String {
    format!("{},surrealdb=warn,surrealdb_core=warn", level.as_str().to_lowercase())
}

/// Install the global subscriber: `RUST_LOG` if set, else `level`, with
/// plain or newline-delimited JSON output. Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let (plain_layer, json_layer) = if json {
        (None, Some(fmt::layer().with_target(false).json()))
    } else {
        (Some(fmt::layer().with_target(false)), None)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_quiet_the_database() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "debug,surrealdb=warn,surrealdb_core=warn"
        );
    }

    #[test]
    fn init_tracing_twice_does_not_panic() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
    }
}
