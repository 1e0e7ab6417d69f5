//! Engine options persisted as JSON in the per-user engine home directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Name of the options file inside the engine home.
pub const CONFIG_FILE_NAME: &str = "engine.json";

#[cfg(not(windows))]
const HOME_DIR_NAME: &str = ".sector_engine";
#[cfg(windows)]
const HOME_DIR_NAME: &str = "SectorEngine";

/// Language edition of the game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceVersion {
    Dutch,
    #[default]
    English,
    French,
    German,
    Italian,
    Polish,
    Russian,
    RussianGold,
}

impl ResourceVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceVersion::Dutch => "DUTCH",
            ResourceVersion::English => "ENGLISH",
            ResourceVersion::French => "FRENCH",
            ResourceVersion::German => "GERMAN",
            ResourceVersion::Italian => "ITALIAN",
            ResourceVersion::Polish => "POLISH",
            ResourceVersion::Russian => "RUSSIAN",
            ResourceVersion::RussianGold => "RUSSIAN_GOLD",
        }
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DUTCH" => Ok(ResourceVersion::Dutch),
            "ENGLISH" => Ok(ResourceVersion::English),
            "FRENCH" => Ok(ResourceVersion::French),
            "GERMAN" => Ok(ResourceVersion::German),
            "ITALIAN" => Ok(ResourceVersion::Italian),
            "POLISH" => Ok(ResourceVersion::Polish),
            "RUSSIAN" => Ok(ResourceVersion::Russian),
            "RUSSIAN_GOLD" => Ok(ResourceVersion::RussianGold),
            other => Err(ConfigError::UnknownResourceVersion(other.to_string())),
        }
    }
}

/// Screen resolution, stored as `"WIDTHxHEIGHT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Resolution {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidResolution(s.to_string());
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            width: width.parse().map_err(|_| invalid())?,
            height: height.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for Resolution {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        resolution.to_string()
    }
}

/// User-editable engine options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Engine home holding the options file. Never read from the file.
    #[serde(skip)]
    pub home_dir: PathBuf,

    /// Directory of the original game installation.
    #[serde(rename = "data_dir", default)]
    pub game_data_dir: PathBuf,

    #[serde(default)]
    pub mods: Vec<String>,

    #[serde(rename = "res", default)]
    pub resolution: Resolution,

    #[serde(rename = "resversion", default)]
    pub resource_version: ResourceVersion,

    #[serde(default)]
    pub fullscreen: bool,

    #[serde(default)]
    pub debug: bool,

    #[serde(rename = "nosound", default)]
    pub no_sound: bool,
}

impl EngineOptions {
    /// Path of the options file for this home.
    pub fn config_path(&self) -> PathBuf {
        self.home_dir.join(CONFIG_FILE_NAME)
    }

    /// Check that the game data directory is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_data_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingDataDir);
        }
        Ok(())
    }
}

/// Locate the per-user engine home directory.
pub fn find_home_dir() -> Result<PathBuf, ConfigError> {
    #[cfg(windows)]
    let base = dirs::document_dir();
    #[cfg(not(windows))]
    let base = dirs::home_dir();

    base.map(|dir| dir.join(HOME_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Create the home directory and an empty options file when missing.
///
/// An existing options file is never overwritten.
pub fn ensure_config_exists(home: &Path) -> Result<PathBuf, ConfigError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ConfigError::Io { path, source }
    };

    fs::create_dir_all(home).map_err(io_err(home))?;

    let config_path = home.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        info!(path = %config_path.display(), "Creating default engine options");
        fs::write(&config_path, b"{}").map_err(io_err(&config_path))?;
    }

    Ok(home.to_path_buf())
}

/// Read the options file from `home`.
pub fn load_config(home: &Path) -> Result<EngineOptions, ConfigError> {
    let path = home.join(CONFIG_FILE_NAME);
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let mut options: EngineOptions =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
    options.home_dir = home.to_path_buf();

    debug!(path = %path.display(), "Loaded engine options");
    Ok(options)
}

/// Write the options back to their home as pretty-printed JSON.
pub fn write_config(options: &EngineOptions) -> Result<(), ConfigError> {
    let path = options.config_path();
    let json = serde_json::to_string_pretty(options).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    fs::write(&path, json).map_err(|source| ConfigError::Io { path, source })
}

/// Ensure, load and validate the options stored in `home`.
pub fn load_engine_options(home: &Path) -> Result<EngineOptions, ConfigError> {
    let home = ensure_config_exists(home)?;
    let options = load_config(&home)?;
    options.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home_with_config(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), contents).unwrap();
        dir
    }

    #[test]
    fn test_ensure_creates_home_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("engine_home");

        ensure_config_exists(&home).unwrap();

        assert!(home.is_dir());
        assert_eq!(fs::read_to_string(home.join(CONFIG_FILE_NAME)).unwrap(), "{}");
    }

    #[test]
    fn test_ensure_keeps_existing_file() {
        let dir = home_with_config("Test");
        ensure_config_exists(dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            "Test"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_config(dir.path()), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = home_with_config("{ not json }");
        assert!(matches!(load_config(dir.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_defaults_and_home() {
        let dir = home_with_config("{}");
        let options = load_config(dir.path()).unwrap();

        assert_eq!(options.home_dir, dir.path());
        assert_eq!(options.resolution, Resolution::new(640, 480));
        assert_eq!(options.resource_version, ResourceVersion::English);
        assert!(options.mods.is_empty());
    }

    #[test]
    fn test_home_dir_not_read_from_file() {
        let dir = home_with_config(r#"{ "home_dir": "/aaa" }"#);
        let options = load_config(dir.path()).unwrap();
        assert_eq!(options.home_dir, dir.path());
    }

    #[test]
    fn test_load_known_fields() {
        let dir = home_with_config(
            r#"{ "data_dir": "/dd", "res": "1024x768", "resversion": "RUSSIAN_GOLD",
                 "fullscreen": true, "debug": true, "nosound": true, "mods": ["m1", "a2"] }"#,
        );
        let options = load_config(dir.path()).unwrap();

        assert_eq!(options.game_data_dir, PathBuf::from("/dd"));
        assert_eq!(options.resolution, Resolution::new(1024, 768));
        assert_eq!(options.resource_version, ResourceVersion::RussianGold);
        assert!(options.fullscreen && options.debug && options.no_sound);
        assert_eq!(options.mods, vec!["m1", "a2"]);
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let dir = home_with_config(r#"{ "resversion": "TESTUNKNOWN" }"#);
        assert!(matches!(load_config(dir.path()), Err(ConfigError::Parse { .. })));

        let dir = home_with_config(r#"{ "res": "big" }"#);
        assert!(matches!(load_config(dir.path()), Err(ConfigError::Parse { .. })));

        let dir = home_with_config(r#"{ "mods": ["a", true] }"#);
        assert!(matches!(load_config(dir.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_write_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let options = EngineOptions {
            home_dir: dir.path().to_path_buf(),
            resolution: Resolution::new(100, 100),
            ..EngineOptions::default()
        };

        write_config(&options).unwrap();

        let written = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(
            written,
            r#"{
  "data_dir": "",
  "mods": [],
  "res": "100x100",
  "resversion": "ENGLISH",
  "fullscreen": false,
  "debug": false,
  "nosound": false
}"#
        );
        assert_eq!(load_config(dir.path()).unwrap(), options);
    }

    #[test]
    fn test_load_engine_options_requires_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_engine_options(dir.path()),
            Err(ConfigError::MissingDataDir)
        ));

        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "data_dir": "/games/ja" }"#).unwrap();
        let options = load_engine_options(dir.path()).unwrap();
        assert_eq!(options.game_data_dir, PathBuf::from("/games/ja"));
    }

    #[test]
    fn test_resource_version_strings() {
        for version in [
            ResourceVersion::Dutch,
            ResourceVersion::English,
            ResourceVersion::RussianGold,
        ] {
            assert_eq!(version.to_string().parse::<ResourceVersion>().unwrap(), version);
        }
        assert!("english".parse::<ResourceVersion>().is_err());
    }

    #[test]
    fn test_find_home_dir_name() {
        if let Ok(home) = find_home_dir() {
            assert!(home.ends_with(HOME_DIR_NAME));
        }
    }
}
