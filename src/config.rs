use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_REMINDER_POLL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub reminders_enabled: bool,
    pub reminder_poll: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable values use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = lookup("APP_DATA_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let reminders_enabled = lookup("REMINDERS_ENABLED")
            .map(|value| {
                !matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "0" | "false" | "off" | "no"
                )
            })
            .unwrap_or(true);
        let poll_secs = lookup("REMINDER_POLL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REMINDER_POLL_SECS)
            .max(1);

        Self {
            port,
            data_path,
            reminders_enabled,
            reminder_poll: Duration::from_secs(poll_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert!(config.reminders_enabled);
        assert_eq!(config.reminder_poll, Duration::from_secs(60));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("APP_DATA_PATH", "/tmp/goals.json"),
            ("REMINDERS_ENABLED", "off"),
            ("REMINDER_POLL_SECS", "0"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_path, PathBuf::from("/tmp/goals.json"));
        assert!(!config.reminders_enabled);
        assert_eq!(config.reminder_poll, Duration::from_secs(1));
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("PORT", "eighty")]).port, 8080);
    }
}
