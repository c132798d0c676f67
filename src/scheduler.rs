use chrono::{Duration, NaiveDateTime};

use crate::{
    alarm::AlarmId,
    store::AlarmStore,
    time_math::{is_due_main, is_snooze_due},
};

/// seconds a main firing rings before it is stopped automatically
pub const AUTO_STOP_SECS: i64 = 60;
/// minutes between stopping a main firing and its snooze echo
pub const SNOOZE_MINUTES: i64 = 5;

/// what the presentation layer and the sound player should do after a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// start the alarm sound and show that this alarm triggered
    PlaySound(AlarmId),
    StopSound,
}

/// the one alarm that is ringing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingingState {
    pub alarm: AlarmId,
    /// true for the snooze echo, false for the main firing
    pub is_repeat_firing: bool,
    pub started_at: NaiveDateTime,
}

/// Decides once per tick whether an alarm starts, keeps or stops ringing.
///
/// Only one alarm can ring at a time, so the ringing state is a single optional value
/// and at most one [`Action`] comes out of a tick.
#[derive(Debug, Clone, Default)]
pub struct AlarmScheduler {
    ringing: Option<RingingState>,
}

impl AlarmScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self { ringing: None }
    }

    #[must_use]
    pub const fn ringing(&self) -> Option<RingingState> {
        self.ringing
    }

    pub fn tick(&mut self, store: &mut AlarmStore, now: NaiveDateTime) -> Option<Action> {
        if let Some(ringing) = self.ringing {
            if store.get(ringing.alarm).is_none() {
                log::warn!("ringing alarm {} no longer exists", ringing.alarm);
                self.ringing = None;
                return Some(Action::StopSound);
            }
            if !ringing.is_repeat_firing
                && now - ringing.started_at >= Duration::seconds(AUTO_STOP_SECS)
            {
                log::info!("alarm {} was not stopped, stopping it", ringing.alarm);
                return self.stop(store, now);
            }
            return None;
        }

        if let Some(alarm) = store.iter_mut().find(|alarm| is_due_main(alarm, now)) {
            alarm.last_triggered_on = Some(now.date());
            return Some(self.start(alarm.id, false, now));
        }

        // an echo is not a main firing so it ignores last_triggered_on
        if let Some(alarm) = store.iter_mut().find(|alarm| is_snooze_due(alarm, now)) {
            alarm.repeat_scheduled_at = None;
            return Some(self.start(alarm.id, true, now));
        }
        None
    }

    fn start(&mut self, alarm: AlarmId, is_repeat_firing: bool, now: NaiveDateTime) -> Action {
        if is_repeat_firing {
            log::info!("alarm {alarm} triggered again after snooze");
        } else {
            log::info!("alarm {alarm} triggered");
        }
        self.ringing = Some(RingingState {
            alarm,
            is_repeat_firing,
            started_at: now,
        });
        Action::PlaySound(alarm)
    }

    /// Stops the ringing alarm as if the user pressed stop.
    ///
    /// Stopping a main firing arms the snooze if the alarm asks for it,
    /// stopping the echo ends the cycle and retires one shot alarms.
    /// Returns `None` if nothing was ringing.
    pub fn stop(&mut self, store: &mut AlarmStore, now: NaiveDateTime) -> Option<Action> {
        let ringing = self.ringing.take()?;
        if let Some(alarm) = store.get_mut(ringing.alarm) {
            if ringing.is_repeat_firing {
                if alarm.is_one_shot() {
                    alarm.enabled = false;
                    log::info!("alarm {} disabled after its last ring", alarm.id);
                }
                alarm.repeat_scheduled_at = None;
            } else if alarm.repeat_after_5min {
                let at = now + Duration::minutes(SNOOZE_MINUTES);
                alarm.repeat_scheduled_at = Some(at);
                log::info!("alarm {} will ring again at {at}", alarm.id);
            }
        }
        Some(Action::StopSound)
    }

    /// drops the ringing state without arming anything when `alarm` is the one ringing,
    /// used when the alarm is removed or disabled while it rings
    pub fn cancel(&mut self, alarm: AlarmId) -> Option<Action> {
        match self.ringing {
            Some(ringing) if ringing.alarm == alarm => {
                self.ringing = None;
                Some(Action::StopSound)
            }
            _ => None,
        }
    }

    /// drops the ringing state unconditionally
    pub fn reset(&mut self) -> Option<Action> {
        self.ringing.take().map(|_| Action::StopSound)
    }
}
