use anyhow::{Context, Result};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorProvider {
    Heuristic,
    Vertex,
    OpenAI,
}

impl Default for ExtractorProvider {
    fn default() -> Self {
        ExtractorProvider::Heuristic
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub provider: ExtractorProvider,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Civil timezone calendar instants are qualified in. Configuration,
    /// never derived from request data.
    pub timezone: String,
    pub calendar_id: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { timezone: "America/Los_Angeles".to_string(), calendar_id: "primary".to_string() }
    }
}

impl CalendarConfig {
    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| anyhow::anyhow!("Unknown timezone in config: {}", self.timezone))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3001 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            calendar: CalendarConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "snapcal", "snapcal")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.extractor.provider, ExtractorProvider::Heuristic);
        assert_eq!(config.calendar.timezone, "America/Los_Angeles");
        assert_eq!(config.calendar.calendar_id, "primary");
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_default_timezone_parses() {
        let config = Config::default();
        assert_eq!(config.calendar.tz().unwrap(), chrono_tz::America::Los_Angeles);
        let bad = CalendarConfig { timezone: "Mars/Olympus".to_string(), ..Default::default() };
        assert!(bad.tz().is_err());
    }

    #[test]
    fn test_config_save_load() -> Result<()> {
        // Create temporary directory
        let temp_dir = tempdir()?;

        // Set up temporary config directory
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());

        let config = Config::default();
        config.save()?;

        let loaded = Config::load()?;
        assert_eq!(loaded.calendar.timezone, config.calendar.timezone);
        assert_eq!(loaded.server.port, config.server.port);

        Ok(())
    }

    #[test]
    fn test_provider_names_deserialize_lowercase() {
        let config: Config =
            toml::from_str("[extractor]\nprovider = \"openai\"\n").expect("parse config");
        assert_eq!(config.extractor.provider, ExtractorProvider::OpenAI);
    }
}
