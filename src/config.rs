use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            student_id: String::new(),
            batch: String::new(),
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("examdesk")
            .join("config.toml")
    }

    /// Clamp the tick rate to something the countdown can live with: a tick
    /// slower than a second would make the display skip.
    pub fn normalize(&mut self) {
        self.tick_rate_ms = self.tick_rate_ms.clamp(50, 1000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.tick_rate_ms, 250);
        assert!(config.student_id.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_fields() {
        let toml_str = r#"
server_url = "https://exams.example.edu"
student_id = "stu-42"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server_url, "https://exams.example.edu");
        assert_eq!(config.student_id, "stu-42");
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.server_url, deserialized.server_url);
        assert_eq!(config.tick_rate_ms, deserialized.tick_rate_ms);
    }

    #[test]
    fn test_load_from_missing_path_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"terminal-default\"\ntick_rate_ms = 100\n").unwrap();
        let config = Config::load_from(path).unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_normalize_clamps_tick_rate() {
        let mut config = Config::default();
        config.tick_rate_ms = 5;
        config.normalize();
        assert_eq!(config.tick_rate_ms, 50);

        config.tick_rate_ms = 10_000;
        config.normalize();
        assert_eq!(config.tick_rate_ms, 1000);
    }
}
