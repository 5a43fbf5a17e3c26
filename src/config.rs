use std::env;
use std::time::Duration;

pub const DEFAULT_GAMES_URL: &str = "https://api.sampleapis.com/xbox/games";
pub const DEFAULT_XUID: &str = "example_xuid";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the authenticated REST API. `None` keeps profile,
    /// achievement and stats lookups on demonstration data.
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub games_url: String,
    pub request_timeout: Duration,
    pub xuid: String,
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            api_key: None,
            games_url: DEFAULT_GAMES_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            xuid: DEFAULT_XUID.to_string(),
            offline: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key).and_then(|val| {
                let val = val.trim();
                if val.is_empty() {
                    None
                } else {
                    Some(val.to_string())
                }
            })
        };

        let api_base_url = opt("XBOX_API_URL").map(|url| url.trim_end_matches('/').to_string());
        let timeout_secs = opt("XBOX_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        let offline = opt("XBOX_OFFLINE")
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            api_base_url,
            api_key: opt("XBOX_API_KEY"),
            games_url: opt("XBOX_GAMES_URL").unwrap_or_else(|| DEFAULT_GAMES_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            xuid: opt("XBOX_XUID").unwrap_or_else(|| DEFAULT_XUID.to_string()),
            offline,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn blank_values_are_treated_as_absent() {
        let cfg = config_from(&[("XBOX_API_URL", "  "), ("XBOX_API_KEY", "")]);
        assert_eq!(cfg.api_base_url, None);
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn base_url_drops_trailing_slash_and_timeout_is_clamped() {
        let cfg = config_from(&[
            ("XBOX_API_URL", "https://xbl.example.net/v2/"),
            ("XBOX_TIMEOUT_SECS", "0"),
            ("XBOX_OFFLINE", "TRUE"),
        ]);
        assert_eq!(cfg.api_base_url.as_deref(), Some("https://xbl.example.net/v2"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(1));
        assert!(cfg.offline);
    }
}
