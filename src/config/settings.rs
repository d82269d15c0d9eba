use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TwoFaError};

/// File name of the vault database inside the config directory.
pub const DEFAULT_DATABASE_NAME: &str = "2FA_codes.db";

/// User-level configuration, loaded from `~/.config/twofabackup.toml`.
///
/// Every field has a default so the tool works without any config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Vault database location.  Relative paths are resolved against the
    /// config directory.  Defaults to `~/.config/2FA_codes.db`.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

/// The per-user config directory, `~/.config`.
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .ok_or_else(|| TwoFaError::ConfigError("cannot determine home directory".into()))
}

impl Settings {
    /// Name of the config file we look for in the config directory.
    const FILE_NAME: &'static str = "twofabackup.toml";

    /// Load settings from `<config_dir>/twofabackup.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            TwoFaError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Full path to the vault database.
    pub fn database_path(&self, config_dir: &Path) -> PathBuf {
        match &self.database {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => config_dir.join(path),
            None => config_dir.join(DEFAULT_DATABASE_NAME),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert!(settings.database.is_none());
    }

    #[test]
    fn default_database_lives_in_config_dir() {
        let dir = Path::new("/home/user/.config");
        let path = Settings::default().database_path(dir);
        assert_eq!(path, PathBuf::from("/home/user/.config/2FA_codes.db"));
    }

    #[test]
    fn load_parses_absolute_database_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("twofabackup.toml"),
            "database = \"/srv/backup/codes.db\"\n",
        )
        .unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(
            settings.database_path(tmp.path()),
            PathBuf::from("/srv/backup/codes.db")
        );
    }

    #[test]
    fn relative_database_path_resolves_against_config_dir() {
        let settings = Settings {
            database: Some(PathBuf::from("vaults/codes.db")),
        };
        let dir = Path::new("/home/user/.config");
        assert_eq!(
            settings.database_path(dir),
            PathBuf::from("/home/user/.config/vaults/codes.db")
        );
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("twofabackup.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(TwoFaError::ConfigError(_))));
    }
}
