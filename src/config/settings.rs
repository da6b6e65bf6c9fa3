use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_subject() -> String {
    "me".to_string()
}
fn default_display_name() -> String {
    "Akhi".to_string()
}
fn default_latitude() -> f64 {
    21.4225
}
fn default_longitude() -> f64 {
    39.8262
}
fn default_location_name() -> String {
    "Makkah".to_string()
}
fn default_calc_method() -> String {
    "UmmAlQura".to_string()
}
fn default_madhab() -> String {
    "Hanafi".to_string()
}
fn default_timezone_offset() -> i32 {
    180
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Opaque identifier used to key the check-in ledger.
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Group scope used by the dashboard leaderboard; empty = none.
    #[serde(default)]
    pub default_group: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            display_name: default_display_name(),
            default_group: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalahConfig {
    #[serde(default = "default_location_name")]
    pub location_name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days to add/subtract from Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for SalahConfig {
    fn default() -> Self {
        Self {
            location_name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FastingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub salah: SalahConfig,
    #[serde(default)]
    pub fasting: FastingConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "akhcheck").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("akhcheck.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
