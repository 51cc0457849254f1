//! Helpers shared by the sweep and check commands.

use flagsweep::FlagsClient;
use flagsweep::rate_limit::ApiRateLimiter;
use flagsweep::retry::RetryConfig;

use crate::config::Config;

/// Resolve the project key: CLI argument first, then config/env.
pub(crate) fn resolve_project(
    cli_project: Option<String>,
    config: &Config,
) -> Result<String, Box<dyn std::error::Error>> {
    cli_project
        .or_else(|| config.service.project_key.clone())
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            "no project key given; pass one as an argument or set FLAGSWEEP_PROJECT_KEY".into()
        })
}

/// Build the API client from config plus CLI overrides.
pub(crate) fn build_client(
    config: &Config,
    host_override: Option<&str>,
    rps_override: Option<u32>,
    no_rate_limit: bool,
) -> Result<FlagsClient, Box<dyn std::error::Error>> {
    let token = config
        .service
        .access_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or("no access token configured; set FLAGSWEEP_ACCESS_TOKEN or [service].access_token")?;

    let host = host_override.unwrap_or(&config.service.host);

    let rate_limiter = if no_rate_limit || config.service.no_rate_limit {
        None
    } else {
        Some(ApiRateLimiter::new(
            rps_override.unwrap_or(config.service.requests_per_second),
        ))
    };

    Ok(FlagsClient::new(
        host,
        &token,
        RetryConfig::default(),
        rate_limiter,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_project_wins_over_config() {
        let mut config = Config::default();
        config.service.project_key = Some("from-config".to_string());

        let project =
            resolve_project(Some("from-cli".to_string()), &config).expect("should resolve");
        assert_eq!(project, "from-cli");
    }

    #[test]
    fn config_project_is_the_fallback() {
        let mut config = Config::default();
        config.service.project_key = Some("from-config".to_string());

        let project = resolve_project(None, &config).expect("should resolve");
        assert_eq!(project, "from-config");
    }

    #[test]
    fn missing_project_is_an_error() {
        let err = resolve_project(None, &Config::default()).expect_err("nothing to resolve");
        assert!(err.to_string().contains("project key"));
    }

    #[test]
    fn blank_project_is_treated_as_missing() {
        assert!(resolve_project(Some("  ".to_string()), &Config::default()).is_err());
    }

    #[test]
    fn build_client_requires_a_token() {
        let err = build_client(&Config::default(), None, None, false)
            .expect_err("no token configured");
        assert!(err.to_string().contains("access token"));
    }

    #[test]
    fn build_client_honors_host_override() {
        let mut config = Config::default();
        config.service.access_token = Some("tok".to_string());

        let client = build_client(&config, Some("https://flags.internal/"), None, true)
            .expect("client should build");
        assert_eq!(client.host(), "https://flags.internal");
    }
}
