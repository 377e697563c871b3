use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ArtError, Result};
use crate::imaging::{self, StoredFormat};
use crate::state::screen::ScreenSettings;
use crate::state::store::RecordStore;

/// Settings read from `<config_dir>/art-book/config.toml`.
/// Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Database file; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    /// Bounding edge of stored images
    pub max_dimension: u32,
    /// Encoder quality, 0-100
    pub quality: u8,
    pub format: StoredFormat,
    /// Default tracing filter when ART_BOOK_LOG is unset
    pub log_level: String,
    /// Where the picker opens, and which directory gates gallery access
    pub picture_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            max_dimension: imaging::MAX_DIMENSION,
            quality: imaging::ENCODE_QUALITY,
            format: StoredFormat::Png,
            log_level: "info".to_string(),
            picture_dir: None,
        }
    }
}

impl Config {
    /// Parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ArtError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    /// Load the config file from the user config directory, if there is one
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| ArtError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(ArtError::Config("max_dimension must be positive".to_string()));
        }
        if self.quality > 100 {
            return Err(ArtError::Config(format!(
                "quality must be between 0 and 100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("art-book");
        path.push("config.toml");
        Some(path)
    }

    /// Resolved database location
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(RecordStore::default_path)
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            max_dimension: self.max_dimension,
            format: self.format,
            quality: self.quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.screen_settings(), ScreenSettings::default());
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse(
            r#"
            database_path = "/tmp/arts/Arts.db"
            max_dimension = 512
            quality = 80
            format = "jpeg"
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/arts/Arts.db"));
        assert_eq!(config.max_dimension, 512);
        assert_eq!(config.format, StoredFormat::Jpeg);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.picture_dir, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(Config::parse("max_dimension = 0"), Err(ArtError::Config(_))));
        assert!(matches!(Config::parse("quality = 101"), Err(ArtError::Config(_))));
        assert!(matches!(Config::parse("format = \"gif\""), Err(ArtError::Config(_))));
        assert!(matches!(Config::parse("quality = -1"), Err(ArtError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "quality = 20").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.quality, 20);
        assert_eq!(config.max_dimension, imaging::MAX_DIMENSION);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ArtError::Config(_))));
    }
}
