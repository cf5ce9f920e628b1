use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

const QUIET_DEPENDENCIES: &[&str] = &["sqlx=warn", "hyper=warn", "reqwest=warn"];

fn filter_directives(level: &str) -> String {
    let level = match level.trim() {
        "" => "info",
        level => level,
    };
    std::iter::once(level)
        .chain(QUIET_DEPENDENCIES.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(level))
            .map_err(|e| anyhow!("invalid log level {level:?}: {e}"))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))
}
