use crate::location::cache::DEFAULT_CAPACITY;
use crate::location::providers::{default_user_agent, DEFAULT_ENDPOINT};
use crate::location::GeocoderConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Geocoder settings
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub language: Option<String>,

    // Validator settings
    pub cache_capacity: usize,
    pub countries_file: Option<PathBuf>,

    // HTTP server settings
    pub listen_addr: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: 5,
            language: None,
            cache_capacity: DEFAULT_CAPACITY,
            countries_file: None,
            listen_addr: "127.0.0.1:3000".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with `DESTCHECK_*` environment variables.
    /// Unparseable numbers keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let endpoint = var("DESTCHECK_ENDPOINT").unwrap_or(defaults.endpoint);

        let user_agent = var("DESTCHECK_USER_AGENT").unwrap_or(defaults.user_agent);

        let timeout_secs = var("DESTCHECK_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        let language = var("DESTCHECK_LANGUAGE").filter(|v| !v.is_empty());

        let cache_capacity = var("DESTCHECK_CACHE_CAPACITY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.cache_capacity);

        let countries_file = var("DESTCHECK_COUNTRIES_FILE").map(PathBuf::from);

        let listen_addr = var("DESTCHECK_LISTEN_ADDR").unwrap_or(defaults.listen_addr);

        let debug = var("DEBUG").is_some();

        Self {
            endpoint,
            user_agent,
            timeout_secs,
            language,
            cache_capacity,
            countries_file,
            listen_addr,
            debug,
        }
    }

    /// Settings for the outbound search client.
    pub fn geocoder(&self) -> GeocoderConfig {
        GeocoderConfig {
            endpoint: self.endpoint.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            language: self.language.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint, "https://nominatim.openstreetmap.org/search");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.cache_capacity, 256);
        assert!(cfg.language.is_none());
        assert!(cfg.countries_file.is_none());
        assert!(!cfg.debug);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("DESTCHECK_ENDPOINT", "http://localhost:8088/search"),
            ("DESTCHECK_TIMEOUT_SECS", "2"),
            ("DESTCHECK_LANGUAGE", "en"),
            ("DESTCHECK_CACHE_CAPACITY", "16"),
            ("DESTCHECK_COUNTRIES_FILE", "/etc/destcheck/countries.txt"),
            ("DEBUG", "1"),
        ]));

        assert_eq!(cfg.endpoint, "http://localhost:8088/search");
        assert_eq!(cfg.timeout_secs, 2);
        assert_eq!(cfg.language.as_deref(), Some("en"));
        assert_eq!(cfg.cache_capacity, 16);
        assert_eq!(cfg.countries_file, Some(PathBuf::from("/etc/destcheck/countries.txt")));
        assert!(cfg.debug);
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("DESTCHECK_TIMEOUT_SECS", "soon"),
            ("DESTCHECK_CACHE_CAPACITY", "-3"),
            ("DESTCHECK_LANGUAGE", ""),
        ]));
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.cache_capacity, 256);
        assert!(cfg.language.is_none());
    }

    #[test]
    fn test_geocoder_projection() {
        let cfg = Config {
            timeout_secs: 3,
            language: Some("fr".into()),
            ..Config::default()
        };
        let g = cfg.geocoder();
        assert_eq!(g.timeout, Duration::from_secs(3));
        assert_eq!(g.language.as_deref(), Some("fr"));
        assert_eq!(g.user_agent, cfg.user_agent);
    }
}
