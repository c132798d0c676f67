use chrono::NaiveDateTime;

use crate::{
    alarm::{Alarm, AlarmId, AlarmSpec},
    error::AlarmError,
};

/// most alarms the store will hold at once
pub const MAX_ALARMS: usize = 5;

/// owns the alarms in insertion order
#[derive(Debug, Clone, Default)]
pub struct AlarmStore {
    alarms: Vec<Alarm>,
    next_id: u64,
}

impl AlarmStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// validates `spec` against `now` and appends a new enabled alarm
    ///
    /// # Errors
    /// [`AlarmError::CapacityExceeded`] when the store is full, otherwise whatever
    /// [`AlarmSpec::validate`] rejects. The store is unchanged on error.
    pub fn add(&mut self, spec: &AlarmSpec, now: NaiveDateTime) -> Result<AlarmId, AlarmError> {
        if self.alarms.len() >= MAX_ALARMS {
            return Err(AlarmError::CapacityExceeded(MAX_ALARMS));
        }
        let time = spec.validate(now)?;
        let id = AlarmId(self.next_id);
        self.next_id += 1;
        let alarm = Alarm::new(id, spec, time);
        log::info!("alarm {id} added: {alarm}");
        self.alarms.push(alarm);
        Ok(id)
    }

    /// # Errors
    /// [`AlarmError::NotFound`] if there is no such alarm
    pub fn remove(&mut self, id: AlarmId) -> Result<Alarm, AlarmError> {
        let index = self.index_of(id).ok_or(AlarmError::NotFound(id))?;
        Ok(self.alarms.remove(index))
    }

    /// flips `enabled` and returns the new value,
    /// disabling an alarm also drops its pending snooze
    ///
    /// # Errors
    /// [`AlarmError::NotFound`] if there is no such alarm
    pub fn toggle_enabled(&mut self, id: AlarmId) -> Result<bool, AlarmError> {
        let alarm = self.get_mut(id).ok_or(AlarmError::NotFound(id))?;
        alarm.enabled = !alarm.enabled;
        if !alarm.enabled {
            alarm.repeat_scheduled_at = None;
        }
        Ok(alarm.enabled)
    }

    pub fn clear(&mut self) {
        self.alarms.clear();
    }

    #[must_use]
    pub fn list(&self) -> &[Alarm] {
        &self.alarms
    }

    #[must_use]
    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|alarm| alarm.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: AlarmId) -> Option<&mut Alarm> {
        self.alarms.iter_mut().find(|alarm| alarm.id == id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Alarm> {
        self.alarms.iter_mut()
    }

    /// current position of the alarm in insertion order
    #[must_use]
    pub fn index_of(&self, id: AlarmId) -> Option<usize> {
        self.alarms.iter().position(|alarm| alarm.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::*;
    use crate::alarm::Weekdays;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn monday(hour: u32) -> AlarmSpec {
        AlarmSpec::weekly(Weekdays::EMPTY.with(Weekday::Mon), hour, 0)
    }

    #[test]
    fn add_sets_fresh_state() {
        let mut store = AlarmStore::new();
        let id = store.add(&monday(7).with_repeat(true), now()).unwrap();
        let alarm = store.get(id).unwrap();
        assert!(alarm.enabled());
        assert!(alarm.repeat_after_5min());
        assert_eq!(alarm.last_triggered_on(), None);
        assert_eq!(alarm.repeat_scheduled_at(), None);
    }

    #[test]
    fn capacity_is_capped() {
        let mut store = AlarmStore::new();
        for hour in 0..5 {
            store.add(&monday(hour), now()).unwrap();
        }
        let before = store.list().to_vec();
        assert_eq!(
            store.add(&monday(6), now()),
            Err(AlarmError::CapacityExceeded(MAX_ALARMS))
        );
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn rejected_add_does_not_consume_an_id() {
        let mut store = AlarmStore::new();
        assert_eq!(
            store.add(&AlarmSpec::weekly(Weekdays::EMPTY, 7, 0), now()),
            Err(AlarmError::EmptyWeekdaySet)
        );
        assert!(store.is_empty());
        assert_eq!(store.add(&monday(7), now()), Ok(AlarmId(0)));
    }

    #[test]
    fn ids_survive_removal() {
        let mut store = AlarmStore::new();
        let first = store.add(&monday(6), now()).unwrap();
        let second = store.add(&monday(7), now()).unwrap();
        store.remove(first).unwrap();
        assert_eq!(store.index_of(second), Some(0));
        let third = store.add(&monday(8), now()).unwrap();
        assert_ne!(third, first);
        assert_eq!(store.index_of(third), Some(1));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut store = AlarmStore::new();
        let id = store.add(&monday(7), now()).unwrap();
        let missing = AlarmId(42);
        assert_eq!(store.remove(missing), Err(AlarmError::NotFound(missing)));
        assert_eq!(
            store.toggle_enabled(missing),
            Err(AlarmError::NotFound(missing))
        );
        assert_eq!(store.len(), 1);
        assert!(store.get(id).unwrap().enabled());
    }

    #[test]
    fn disabling_drops_pending_snooze() {
        let mut store = AlarmStore::new();
        let id = store.add(&monday(7).with_repeat(true), now()).unwrap();
        store.get_mut(id).unwrap().repeat_scheduled_at = Some(now());
        assert_eq!(store.toggle_enabled(id), Ok(false));
        assert_eq!(store.get(id).unwrap().repeat_scheduled_at(), None);
        assert_eq!(store.toggle_enabled(id), Ok(true));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = AlarmStore::new();
        store.add(&monday(7), now()).unwrap();
        store.add(&monday(8), now()).unwrap();
        store.clear();
        assert!(store.list().is_empty());
    }
}
