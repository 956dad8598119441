//! Application configuration loaded from environment variables.

use cart::DEFAULT_PAGE_SIZE;
use resources::RestConfig;

/// Client configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `CART_API_URL`: REST base URL (default: `"http://localhost:1337"`)
/// - `CART_USER`: name of the signed-in user (no default)
/// - `CART_PAGE_SIZE`: cart listing limit, at least 1 (default: `1000`)
/// - `CART_HTTP_TIMEOUT_SECS`: request timeout, at least 1 (default: `10`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub user: Option<String>,
    pub page_size: usize,
    pub http_timeout_secs: u64,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("CART_API_URL").unwrap_or(defaults.api_url),
            user: lookup("CART_USER").filter(|u| !u.trim().is_empty()),
            page_size: lookup("CART_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.page_size),
            http_timeout_secs: lookup("CART_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u64| n > 0)
                .unwrap_or(defaults.http_timeout_secs),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, user: Option<String>) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(user) = user {
            self.user = Some(user);
        }
        self
    }

    /// Returns the REST client settings.
    pub fn rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.api_url.clone(),
            timeout_secs: self.http_timeout_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:1337".to_string(),
            user: None,
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:1337");
        assert_eq!(config.user, None);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        assert_eq!(Config::from_lookup(lookup_from(&[])), Config::default());
    }

    #[test]
    fn test_reads_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("CART_API_URL", "https://shop.example.com"),
            ("CART_USER", "alice"),
            ("CART_PAGE_SIZE", "50"),
            ("CART_HTTP_TIMEOUT_SECS", "3"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(config.api_url, "https://shop.example.com");
        assert_eq!(config.user.as_deref(), Some("alice"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.http_timeout_secs, 3);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("CART_PAGE_SIZE", "0"),
            ("CART_HTTP_TIMEOUT_SECS", "soon"),
            ("CART_USER", "  "),
        ]));
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.user, None);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("CART_HTTP_TIMEOUT_SECS", "0")]));
        assert_eq!(config.http_timeout_secs, 10);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::from_lookup(lookup_from(&[("CART_USER", "alice")]))
            .with_overrides(Some("http://127.0.0.1:9000".to_string()), Some("bob".to_string()));
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.user.as_deref(), Some("bob"));

        let rest = config.rest_config();
        assert_eq!(rest.base_url, "http://127.0.0.1:9000");
        assert_eq!(rest.timeout_secs, 10);
    }
}
