use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    alarm::{AlarmSpec, Weekdays},
    error::{AlarmError, ConfigError},
};

const APP_NAME: &str = "roosty_alarm";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// chrono format string for the clock line
    pub time_format: String,
    /// file name of the alarm melody in the sounds directory
    pub sound: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sounds_dir: Option<PathBuf>,
    /// alarms added when the clock starts, never written back
    pub one_shot: Vec<OneShotEntry>,
    pub weekly: Vec<WeeklyEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: "%H:%M:%S".to_string(),
            sound: "alarm.wav".to_string(),
            sounds_dir: None,
            one_shot: vec![],
            weekly: vec![],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OneShotEntry {
    #[serde(with = "toml_datetime_compat")]
    pub date: NaiveDate,
    #[serde(with = "toml_datetime_compat")]
    pub time: NaiveTime,
    #[serde(default)]
    pub repeat_after_5min: bool,
}

impl From<&OneShotEntry> for AlarmSpec {
    fn from(entry: &OneShotEntry) -> Self {
        Self::one_shot(entry.date, entry.time.hour(), entry.time.minute())
            .with_repeat(entry.repeat_after_5min)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeeklyEntry {
    /// 0 is monday, 6 is sunday
    pub weekdays: Vec<u8>,
    #[serde(with = "toml_datetime_compat")]
    pub time: NaiveTime,
    #[serde(default)]
    pub repeat_after_5min: bool,
}

impl TryFrom<&WeeklyEntry> for AlarmSpec {
    type Error = AlarmError;

    fn try_from(entry: &WeeklyEntry) -> Result<Self, Self::Error> {
        let weekdays = Weekdays::from_indices(&entry.weekdays)?;
        Ok(
            Self::weekly(weekdays, entry.time.hour(), entry.time.minute())
                .with_repeat(entry.repeat_after_5min),
        )
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// if the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Ok(toml::from_str(&config)?)
    }

    /// like [`Config::load`] but a missing file gives the defaults
    ///
    /// # Errors
    /// if the file exists but can't be read or parsed
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// # Errors
    /// if the config can't be serialized or written
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        std::fs::write(path, config).map_err(|e| ConfigError::io(path, e))
    }

    /// the startup alarms as specs, one shot entries first
    pub fn startup_alarms(&self) -> impl Iterator<Item = Result<AlarmSpec, AlarmError>> + '_ {
        self.one_shot
            .iter()
            .map(|entry| Ok(AlarmSpec::from(entry)))
            .chain(self.weekly.iter().map(AlarmSpec::try_from))
    }

    /// # Errors
    /// if there is no home directory to put the data directory in
    pub fn sounds_dir(&self) -> Result<PathBuf, ConfigError> {
        self.sounds_dir.clone().map_or_else(Self::sounds_path, Ok)
    }

    /// # Errors
    /// if there is no home directory to put the config directory in
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = project_dirs()?.config_dir().to_path_buf();
        path.push("config.toml");
        Ok(path)
    }

    /// # Errors
    /// if there is no home directory to put the data directory in
    pub fn sounds_path() -> Result<PathBuf, ConfigError> {
        let mut path = project_dirs()?.data_dir().to_path_buf();
        path.push("sounds");
        Ok(path)
    }
}

fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("", "", APP_NAME).ok_or(ConfigError::NoProjectDirs)
}
