//! Glue between the alarm engine, the sound player and the text front end.

use std::{fmt::Write, ops::ControlFlow};

use chrono::{
    format::{Item, StrftimeItems},
    NaiveDateTime,
};

use crate::{
    commands::{Command, HELP},
    communication::SoundPlayer,
    config::Config,
    scheduler::Action,
    sounds::SoundLibrary,
    time_math::format_countdown,
    AlarmClock,
};

/// Owns the clock and hands its actions to the sound player.
///
/// Player failures are logged here and otherwise ignored,
/// the clock has already moved on by the time they happen.
#[derive(Debug)]
pub struct Runtime<P> {
    clock: AlarmClock,
    player: P,
    sounds: SoundLibrary,
    sound: String,
    time_format: String,
}

impl<P: SoundPlayer> Runtime<P> {
    pub fn new(config: &Config, sounds: SoundLibrary, player: P) -> Self {
        let time_format = if is_valid_time_format(&config.time_format) {
            config.time_format.clone()
        } else {
            log::warn!("invalid time format `{}`, using default", config.time_format);
            Config::default().time_format
        };
        if sounds.find(&config.sound).is_none() {
            log::warn!(
                "sound {} not found in {}",
                config.sound,
                sounds.dir().display()
            );
        }
        Self {
            clock: AlarmClock::new(),
            player,
            sounds,
            sound: config.sound.clone(),
            time_format,
        }
    }

    /// adds the alarms listed in the config, skipping the ones that are rejected
    pub fn add_startup_alarms(&mut self, config: &Config, now: NaiveDateTime) {
        for spec in config.startup_alarms() {
            match spec.and_then(|spec| self.clock.add_alarm(&spec, now)) {
                Ok(id) => log::info!("startup alarm {id} added"),
                Err(e) => log::warn!("skipping startup alarm: {e}"),
            }
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &AlarmClock {
        &self.clock
    }

    #[must_use]
    pub fn selected_sound(&self) -> &str {
        &self.sound
    }

    /// runs one scheduler tick, returns a line to show when something changed
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<String> {
        let action = self.clock.tick(now)?;
        self.dispatch(action);
        let time = now.format(&self.time_format);
        Some(match action {
            Action::PlaySound(id) => {
                let snapshot = self.clock.snapshot();
                let alarm = self.clock.store().get(id);
                let echo = snapshot.ringing.is_some_and(|ringing| ringing.is_repeat);
                format!(
                    "[{time}] alarm {id} triggered{}: {}, type `stop` to stop it",
                    if echo { " again" } else { "" },
                    alarm.map(ToString::to_string).unwrap_or_default()
                )
            }
            Action::StopSound => format!("[{time}] alarm stopped"),
        })
    }

    /// runs a user command and returns the text to show, `Break` on quit
    pub fn execute(&mut self, command: Command, now: NaiveDateTime) -> ControlFlow<(), String> {
        let reply = match command {
            Command::Add(spec) => match self.clock.add_alarm(&spec, now) {
                Ok(id) => format!(
                    "added alarm {id}: {}",
                    self.clock
                        .store()
                        .get(id)
                        .map(ToString::to_string)
                        .unwrap_or_default()
                ),
                Err(e) => format!("couldn't add alarm: {e}"),
            },
            Command::Remove(id) => match self.clock.remove_alarm(id) {
                Ok(action) => {
                    self.dispatch_opt(action);
                    format!("removed alarm {id}")
                }
                Err(e) => e.to_string(),
            },
            Command::Toggle(id) => match self.clock.toggle_alarm(id) {
                Ok(action) => {
                    self.dispatch_opt(action);
                    let enabled = self.clock.store().get(id).is_some_and(|a| a.enabled());
                    format!(
                        "alarm {id} {}",
                        if enabled { "enabled" } else { "disabled" }
                    )
                }
                Err(e) => e.to_string(),
            },
            Command::Clear => {
                let action = self.clock.clear_all();
                self.dispatch_opt(action);
                "removed all alarms".to_string()
            }
            Command::Stop => match self.clock.stop_ringing(now) {
                Some(action) => {
                    self.dispatch(action);
                    "alarm stopped".to_string()
                }
                None => "no alarm is ringing".to_string(),
            },
            Command::List => self.list(),
            Command::Next => self.countdown_label(now),
            Command::Sounds => self.list_sounds(),
            Command::SelectSound(name) => {
                if self.sounds.find(&name).is_some() {
                    log::info!("alarm sound set to {name}");
                    self.sound = name;
                    format!("alarm sound set to {}", self.sound)
                } else {
                    format!("unknown sound {name}, see `sounds`")
                }
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return ControlFlow::Break(()),
        };
        ControlFlow::Continue(reply)
    }

    /// the "time until next alarm" label
    #[must_use]
    pub fn countdown_label(&self, now: NaiveDateTime) -> String {
        self.clock
            .next_alarm_countdown(now)
            .map_or_else(
                || "no active alarms".to_string(),
                |left| format!("next alarm in {}", format_countdown(left)),
            )
    }

    fn list(&self) -> String {
        let snapshot = self.clock.snapshot();
        if snapshot.alarms.is_empty() {
            return "no alarms".to_string();
        }
        let mut out = String::new();
        for alarm in &snapshot.alarms {
            let ringing = snapshot
                .ringing
                .is_some_and(|ringing| ringing.alarm == alarm.id());
            let _ = writeln!(
                out,
                "{:>2} [{}] {}{}{}",
                alarm.id(),
                if alarm.enabled() { "on" } else { "off" },
                alarm,
                if alarm.repeat_after_5min() { " +5min" } else { "" },
                if ringing { " (ringing)" } else { "" },
            );
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn list_sounds(&self) -> String {
        if self.sounds.sounds().is_empty() {
            return format!("no sounds in {}", self.sounds.dir().display());
        }
        self.sounds
            .sounds()
            .iter()
            .map(|sound| {
                let marker = if sound.name == self.sound { '*' } else { ' ' };
                format!("{marker} {sound}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn dispatch_opt(&mut self, action: Option<Action>) {
        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::PlaySound(id) => {
                let path = self.sounds.resolve(&self.sound);
                if let Err(e) = self.player.play(id, &path) {
                    log::error!("couldn't play {} for alarm {id}: {e}", path.display());
                }
            }
            Action::StopSound => {
                if let Err(e) = self.player.stop() {
                    log::error!("couldn't stop alarm sound: {e}");
                }
            }
        }
    }
}

fn is_valid_time_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| item != Item::Error)
}
