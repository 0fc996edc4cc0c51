//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TOMO_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error; a malformed one is.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::catalog::{CatalogConfig, QuestionCatalog};
use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "TOMO_ROOT_FOLDER";

/// Port used when neither CLI, env nor TOML supply one
pub const DEFAULT_PORT: u16 = 5760;

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "tomo.db";

/// Directory (inside the root folder) used by the file backend
pub const SLOTS_DIR: &str = "slots";

/// Optional TOML configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub catalog: Option<CatalogConfig>,
}

impl TomlConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))
    }

    /// Port from the file, or the compiled default
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Catalog from the `[catalog]` table, or the compiled-in ToMo catalog
    pub fn catalog(&self) -> Result<QuestionCatalog> {
        match &self.catalog {
            Some(config) => QuestionCatalog::from_config(config.clone()),
            None => Ok(QuestionCatalog::default()),
        }
    }
}

/// Platform config file location (`~/.config/tomo/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tomo").join("config.toml"))
}

/// Load the TOML file at `path`
///
/// A missing file yields defaults with a warning.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            info!("Loaded config file: {}", path.display());
            TomlConfig::parse(&contents)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Config file not found at {}; using defaults", path.display());
            Ok(TomlConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve the root folder following the priority order above
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tomo"))
        .unwrap_or_else(|| PathBuf::from("./tomo_data"))
}

/// Create the root folder if missing
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        info!("Created root folder: {}", root.display());
    }
    Ok(())
}

pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

pub fn slots_dir(root: &Path) -> PathBuf {
    root.join(SLOTS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::parse(
            r#"
            root_folder = "/srv/tomo"
            port = 8080

            [catalog]
            age_groups = ["20대", "30대"]
            job_functions = ["개발"]
            questions = ["하나", "둘"]
            weights = [1.5, -1.5]
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/tomo")));
        assert_eq!(config.port_or_default(), 8080);
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.total_weight(), 0.0);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert_eq!(config.port_or_default(), DEFAULT_PORT);
        assert_eq!(config.catalog().unwrap().len(), 20);
    }

    #[test]
    fn test_mismatched_catalog_is_config_error() {
        let config = TomlConfig::parse(
            r#"
            [catalog]
            age_groups = ["20대"]
            job_functions = ["개발"]
            questions = ["하나", "둘"]
            weights = [1.0]
            "#,
        )
        .unwrap();
        assert!(matches!(config.catalog(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            TomlConfig::parse("colour = \"green\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_paths_inside_root() {
        let root = PathBuf::from("/tmp/tomo-root");
        assert_eq!(database_path(&root), root.join("tomo.db"));
        assert_eq!(slots_dir(&root), root.join("slots"));
    }
}
