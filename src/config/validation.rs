use crate::config::types::{Config, CrawlerConfig, ExtractConfig, ExtractKind, UserAgentConfig};
use crate::{ConfigError, UrlError, UrlResult};
use regex::Regex;
use url::Url;

/// Upper bound on the worker count
const MAX_WORKERS: usize = 1000;

/// Validates the entire configuration
///
/// Seeds are checked individually here; an empty seed list is accepted
/// because the binary may supply seeds on the command line.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extract_config(&config.extract)?;
    for seed in &config.seeds {
        validate_seed_url(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
    }
    Ok(())
}

/// Checks that a seed is a well-formed absolute `http` or `https` URL
///
/// The seed string itself is what gets enqueued; it is not rewritten.
pub fn validate_seed_url(seed: &str) -> UrlResult<Url> {
    let url = Url::parse(seed).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Validates crawler configuration
pub(crate) fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    config.timeout()?;

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
pub(crate) fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the extraction settings
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    match (config.kind, config.pattern.as_deref()) {
        (ExtractKind::Pattern, None) => Err(ConfigError::InvalidPattern(
            "kind = \"pattern\" requires a pattern".to_string(),
        )),
        (ExtractKind::Pattern, Some(pattern)) => {
            if pattern.is_empty() {
                return Err(ConfigError::InvalidPattern(
                    "pattern cannot be empty".to_string(),
                ));
            }
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;
            Ok(())
        }
        (ExtractKind::Bitcoin, _) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_workers_bounds() {
        let mut config = Config::default();
        config.crawler.workers = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.crawler.workers = MAX_WORKERS + 1;
        assert!(validate(&config).is_err());

        config.crawler.workers = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = Config::default();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e20, f64::MAX] {
            config.crawler.request_timeout = bad;
            assert!(validate(&config).is_err(), "timeout {} accepted", bad);
        }

        config.crawler.request_timeout = 0.5;
        assert!(validate(&config).is_ok());

        // Large but still representable
        config.crawler.request_timeout = 1e9;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_timeout_conversion() {
        let mut config = CrawlerConfig::default();
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(5));

        config.request_timeout = 0.25;
        assert_eq!(config.timeout().unwrap(), Duration::from_millis(250));

        config.request_timeout = 1e20;
        assert!(matches!(config.timeout(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_seed_url() {
        assert!(validate_seed_url("https://example.com/").is_ok());
        assert!(validate_seed_url("http://example.com/page?q=1").is_ok());

        assert!(matches!(
            validate_seed_url("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            validate_seed_url("not a url"),
            Err(UrlError::Parse(_))
        ));
        assert!(validate_seed_url("/relative/path").is_err());
    }

    #[test]
    fn test_invalid_seed_in_config() {
        let config = Config {
            seeds: vec!["mailto:someone@example.com".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_pattern_kind_requires_valid_regex() {
        let mut config = Config::default();
        config.extract.kind = ExtractKind::Pattern;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));

        config.extract.pattern = Some("([a-z".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));

        config.extract.pattern = Some(r"[a-z]+@[a-z]+\.com".to_string());
        assert!(validate(&config).is_ok());
    }
}
