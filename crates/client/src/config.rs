//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the `tower` binary needs besides the runtime's own settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Directory holding `config.toml` and the RON catalogs.
    pub data_dir: PathBuf,
    /// Save file location. `None` disables persistence.
    pub save_path: Option<PathBuf>,
    pub auto_speed: u32,
    /// Stop after this long. Runs until Ctrl-C when unset.
    pub run_for: Option<Duration>,
    /// Fetch content lazily instead of caching every catalog up front.
    pub lazy_content: bool,
    /// Artificial delay per content lookup, for exercising slow stores.
    pub content_latency: Option<Duration>,
    /// Start over even if a save exists.
    pub new_game: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            save_path: default_save_path(),
            auto_speed: 1,
            run_for: None,
            lazy_content: false,
            content_latency: None,
            new_game: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TOWER_DATA_DIR` - Content directory (default: `data`)
    /// - `TOWER_SAVE_PATH` - Save file (default: platform data dir)
    /// - `TOWER_PERSISTENCE` - Save and restore progress (default: true)
    /// - `TOWER_AUTO_SPEED` - Auto-combat speed multiplier (default: 1)
    /// - `TOWER_RUN_SECS` - Stop after this many seconds (default: run until Ctrl-C)
    /// - `TOWER_LAZY_CONTENT` - Fetch definitions on demand (default: false)
    /// - `TOWER_CONTENT_LATENCY_MS` - Delay per content lookup (default: none)
    /// - `TOWER_NEW_GAME` - Ignore an existing save (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key);
        let parse = |key: &str| read(key).and_then(|value| value.trim().parse::<u64>().ok());
        let flag = |key: &str| read(key).and_then(|value| parse_bool(&value));

        let mut config = Self::default();

        if let Some(dir) = read("TOWER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = read("TOWER_SAVE_PATH") {
            config.save_path = Some(PathBuf::from(path));
        }
        if flag("TOWER_PERSISTENCE") == Some(false) {
            config.save_path = None;
        }
        if let Some(speed) = parse("TOWER_AUTO_SPEED") {
            config.auto_speed = u32::try_from(speed).unwrap_or(u32::MAX).max(1);
        }
        config.run_for = parse("TOWER_RUN_SECS").map(Duration::from_secs);
        config.lazy_content = flag("TOWER_LAZY_CONTENT").unwrap_or(false);
        config.content_latency = parse("TOWER_CONTENT_LATENCY_MS").map(Duration::from_millis);
        config.new_game = flag("TOWER_NEW_GAME").unwrap_or(false);

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `<platform data dir>/tower/save.json`, if the platform has one.
fn default_save_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tower").map(|dirs| dirs.data_dir().join("save.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), ClientConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("TOWER_DATA_DIR", "/srv/tower"),
            ("TOWER_SAVE_PATH", "/tmp/slot.json"),
            ("TOWER_AUTO_SPEED", "4"),
            ("TOWER_RUN_SECS", "30"),
            ("TOWER_LAZY_CONTENT", "yes"),
            ("TOWER_CONTENT_LATENCY_MS", "250"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/tower"));
        assert_eq!(config.save_path, Some(PathBuf::from("/tmp/slot.json")));
        assert_eq!(config.auto_speed, 4);
        assert_eq!(config.run_for, Some(Duration::from_secs(30)));
        assert!(config.lazy_content);
        assert_eq!(config.content_latency, Some(Duration::from_millis(250)));
    }

    #[test]
    fn persistence_can_be_switched_off() {
        let config = config_from(&[
            ("TOWER_SAVE_PATH", "/tmp/slot.json"),
            ("TOWER_PERSISTENCE", "false"),
        ]);
        assert_eq!(config.save_path, None);
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = config_from(&[("TOWER_AUTO_SPEED", "fast"), ("TOWER_NEW_GAME", "maybe")]);
        assert_eq!(config.auto_speed, 1);
        assert!(!config.new_game);
    }
}
