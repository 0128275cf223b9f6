use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub catalog: CatalogSource,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            game: GameSettings::default(),
            database: Database::default(),
            catalog: CatalogSource::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Reads the config file, or falls back to defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            log::warn!(
                "config file {} not found, using defaults",
                path.to_string_lossy()
            );
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.game.validate()?;
        if !self.database.in_memory && self.database.path.is_none() {
            bail!("database.path is required unless database.in_memory is set");
        }
        Ok(())
    }
}

/// Read-only settings a game session is played with
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    /// rounds per game; doubled in duel mode
    pub rounds: u32,
    pub extract_duration_secs: u32,
    pub hints_enabled: bool,
    pub speed_bonus_enabled: bool,
    pub default_genre: String,
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rounds: 5,
            extract_duration_secs: 30,
            hints_enabled: true,
            speed_bonus_enabled: true,
            default_genre: "pop".to_string(),
            seed: None,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rounds == 0 {
            bail!("game.rounds must be at least 1");
        }
        if self.extract_duration_secs == 0 {
            bail!("game.extract_duration_secs must be at least 1");
        }
        if self.default_genre.trim().is_empty() {
            bail!("game.default_genre must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Database {
    pub in_memory: bool,
    pub path: Option<PathBuf>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            in_memory: false,
            path: Some(PathBuf::from("blindtest.db")),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogSource {
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    #[serde(default)]
    pub follow_symlinks: bool,
}
