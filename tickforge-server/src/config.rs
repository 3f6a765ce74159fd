use std::env;

/// Default cap on candles generated for a single request, summed over symbols.
pub const DEFAULT_MAX_CANDLES: usize = 100_000;

/// Query service configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_candles: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            max_candles: DEFAULT_MAX_CANDLES,
        }
    }
}

fn lookup_str(get: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    get(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn lookup_parsed<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    get(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Read `TICKFORGE_BIND`, `TICKFORGE_PORT` and `TICKFORGE_MAX_CANDLES`.
    /// Missing or malformed values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind: lookup_str(&get, "TICKFORGE_BIND", &defaults.bind),
            port: lookup_parsed(&get, "TICKFORGE_PORT", defaults.port),
            max_candles: lookup_parsed(&get, "TICKFORGE_MAX_CANDLES", defaults.max_candles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(ServerConfig::from_lookup(vars(&[])), ServerConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = ServerConfig::from_lookup(vars(&[
            ("TICKFORGE_BIND", " 127.0.0.1 "),
            ("TICKFORGE_PORT", "9090"),
            ("TICKFORGE_MAX_CANDLES", "500"),
        ]));
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.max_candles, 500);
    }

    #[test]
    fn malformed_values_fall_back() {
        let cfg = ServerConfig::from_lookup(vars(&[
            ("TICKFORGE_BIND", "   "),
            ("TICKFORGE_PORT", "eighty"),
            ("TICKFORGE_MAX_CANDLES", "-1"),
        ]));
        assert_eq!(cfg, ServerConfig::default());
    }
}
