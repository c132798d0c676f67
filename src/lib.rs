#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use alarm::{Alarm, AlarmId, AlarmSpec};
use chrono::{Duration, NaiveDateTime};
use error::AlarmError;
use scheduler::{Action, AlarmScheduler};
use store::AlarmStore;

pub mod alarm;
pub mod commands;
pub mod communication;
pub mod config;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod sounds;
pub mod store;
pub mod time_math;

/// where the clock reads the current wall time from
pub trait TimeSource {
    fn now(&self) -> NaiveDateTime;
}

/// the local wall clock of the machine
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTime;

impl TimeSource for LocalTime {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// what the presentation layer needs to draw the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub alarms: Vec<Alarm>,
    pub ringing: Option<Ringing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ringing {
    pub alarm: AlarmId,
    /// position of the alarm in [`Snapshot::alarms`]
    pub index: usize,
    pub is_repeat: bool,
}

/// The alarm engine: the alarms plus the one that is ringing.
///
/// Everything goes through `&mut self`, so whoever owns the clock serializes access to it.
/// Calls that can end a ringing alarm return the [`Action`] for the sound player.
#[derive(Debug, Clone, Default)]
pub struct AlarmClock {
    store: AlarmStore,
    scheduler: AlarmScheduler,
}

impl AlarmClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// evaluates the alarms at `now`, meant to be called once a second
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Action> {
        self.scheduler.tick(&mut self.store, now)
    }

    /// # Errors
    /// if the store is full or the spec is invalid at `now`
    pub fn add_alarm(
        &mut self,
        spec: &AlarmSpec,
        now: NaiveDateTime,
    ) -> Result<AlarmId, AlarmError> {
        self.store.add(spec, now).inspect_err(|e| {
            log::warn!("rejected alarm {spec:?}: {e}");
        })
    }

    /// removes the alarm, stopping it if it is ringing
    ///
    /// # Errors
    /// [`AlarmError::NotFound`] if there is no such alarm
    pub fn remove_alarm(&mut self, id: AlarmId) -> Result<Option<Action>, AlarmError> {
        self.store.remove(id)?;
        log::info!("alarm {id} removed");
        Ok(self.scheduler.cancel(id))
    }

    /// enables or disables the alarm, disabling the ringing alarm stops it
    ///
    /// # Errors
    /// [`AlarmError::NotFound`] if there is no such alarm
    pub fn toggle_alarm(&mut self, id: AlarmId) -> Result<Option<Action>, AlarmError> {
        if self.store.toggle_enabled(id)? {
            log::info!("alarm {id} enabled");
            Ok(None)
        } else {
            log::info!("alarm {id} disabled");
            Ok(self.scheduler.cancel(id))
        }
    }

    pub fn clear_all(&mut self) -> Option<Action> {
        self.store.clear();
        log::info!("all alarms removed");
        self.scheduler.reset()
    }

    /// the user pressed stop, `None` if nothing was ringing
    pub fn stop_ringing(&mut self, now: NaiveDateTime) -> Option<Action> {
        self.scheduler.stop(&mut self.store, now)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let ringing = self.scheduler.ringing().and_then(|ringing| {
            Some(Ringing {
                alarm: ringing.alarm,
                index: self.store.index_of(ringing.alarm)?,
                is_repeat: ringing.is_repeat_firing,
            })
        });
        Snapshot {
            alarms: self.store.list().to_vec(),
            ringing,
        }
    }

    /// time until the closest enabled alarm rings
    #[must_use]
    pub fn next_alarm_countdown(&self, now: NaiveDateTime) -> Option<Duration> {
        time_math::countdown_to_next(self.store.list(), now)
    }

    #[must_use]
    pub const fn store(&self) -> &AlarmStore {
        &self.store
    }
}
