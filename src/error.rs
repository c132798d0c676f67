//! Error types for the alarm engine and its configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::alarm::AlarmId;

/// Rejection of a mutating call on the alarm store.
/// None of these are fatal, the store is left unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmError {
    #[error("cannot have more than {0} alarms")]
    CapacityExceeded(usize),

    #[error("invalid time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("alarm date and time must be in the future")]
    PastDate,

    #[error("a weekly alarm needs at least one weekday")]
    EmptyWeekdaySet,

    #[error("invalid weekday index {0} (expected 0-6)")]
    InvalidWeekday(u8),

    #[error("no alarm with id {0}")]
    NotFound(AlarmId),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("couldn't determine the project directories")]
    NoProjectDirs,
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
