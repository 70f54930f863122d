use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "mealmind_client=debug,reqwest=info";

/// Installs the global subscriber. `RUST_LOG` overrides the filter,
/// `LOG_FORMAT=json` switches to structured output.
pub fn init() -> anyhow::Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);
    install(&env_filter, json_logs)
}

fn install(filter: &str, json_logs: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json_logs {
        builder
            .with_target(false)
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter() {
        assert!(install("mealmind_client=verbose", false).is_err());
    }

    #[test]
    fn second_install_fails_instead_of_panicking() {
        let _ = install(DEFAULT_FILTER, false);
        assert!(install(DEFAULT_FILTER, true).is_err());
    }
}
