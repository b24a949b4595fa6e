use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "astro-events.toml";
pub const ENV_PREFIX: &str = "ASTRO_EVENTS";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    /// SQLite file. Without it, durable storage is unavailable.
    pub database_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub cache_cleanup_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub user_id: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Defaults, then `path` if it exists, then `ASTRO_EVENTS_*` variables.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("cache_ttl_secs", 3600)?
            .set_default("cache_cleanup_interval_secs", 600)?
            .set_default("request_timeout_secs", 30)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.cache_ttl_secs).unwrap_or(i64::MAX))
    }

    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod settings_tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    fn it_should_fall_back_to_defaults_without_a_file() {
        let dir = tempfile::tempdir().unwrap();

        let settings = Settings::load_from(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.cache_ttl(), chrono::Duration::minutes(60));
        assert_eq!(settings.cache_cleanup_interval(), Duration::from_secs(600));
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert!(settings.database_path.is_none());
    }

    #[rstest]
    fn it_should_read_overrides_from_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
api_base_url = "https://astro.example"
database_path = "data/events.sqlite3"
cache_ttl_secs = 120
user_id = "u1"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.api_base_url, "https://astro.example");
        assert_eq!(settings.database_path, Some(PathBuf::from("data/events.sqlite3")));
        assert_eq!(settings.cache_ttl(), chrono::Duration::minutes(2));
        assert_eq!(settings.user_id.as_deref(), Some("u1"));
        assert_eq!(settings.request_timeout_secs, 30);
    }
}
