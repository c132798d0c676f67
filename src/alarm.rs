use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::AlarmError;

/// identifies an alarm for the lifetime of the store that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlarmId(pub(crate) u64);

impl AlarmId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// set of weekdays, bit 0 is monday and bit 6 is sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Weekdays(u8);

impl Weekdays {
    pub const EMPTY: Self = Self(0);

    /// builds a set from indices where 0 is monday and 6 is sunday
    ///
    /// # Errors
    /// if any index is bigger than 6
    pub fn from_indices(indices: &[u8]) -> Result<Self, AlarmError> {
        indices.iter().try_fold(Self::EMPTY, |days, &index| {
            if index > 6 {
                Err(AlarmError::InvalidWeekday(index))
            } else {
                Ok(Self(days.0 | (1 << index)))
            }
        })
    }

    #[must_use]
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << day.num_days_from_monday()))
    }

    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// the days in the set, starting at monday
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        let mut day = Weekday::Mon;
        (0..7).filter_map(move |_| {
            let current = day;
            day = day.succ();
            self.contains(current).then_some(current)
        })
    }
}

impl FromIterator<Weekday> for Weekdays {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for Weekdays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<String> = self.iter().map(|day| day.to_string()).collect();
        write!(f, "{}", days.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    /// rings once on a calendar date
    OneShot { date: NaiveDate },
    /// rings every week on the given days
    Weekly { weekdays: Weekdays },
}

/// user input for a new alarm, validated by [`AlarmSpec::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSpec {
    pub kind: AlarmKind,
    pub hour: u32,
    pub minute: u32,
    pub repeat_after_5min: bool,
}

impl AlarmSpec {
    #[must_use]
    pub const fn one_shot(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self {
            kind: AlarmKind::OneShot { date },
            hour,
            minute,
            repeat_after_5min: false,
        }
    }

    #[must_use]
    pub const fn weekly(weekdays: Weekdays, hour: u32, minute: u32) -> Self {
        Self {
            kind: AlarmKind::Weekly { weekdays },
            hour,
            minute,
            repeat_after_5min: false,
        }
    }

    #[must_use]
    pub const fn with_repeat(mut self, repeat_after_5min: bool) -> Self {
        self.repeat_after_5min = repeat_after_5min;
        self
    }

    /// checks the spec against `now` and returns the alarm time of day
    ///
    /// # Errors
    /// [`AlarmError::InvalidTime`] for an hour or minute out of range,
    /// [`AlarmError::PastDate`] for a one shot alarm that is not strictly in the future,
    /// [`AlarmError::EmptyWeekdaySet`] for a weekly alarm without days
    pub fn validate(&self, now: NaiveDateTime) -> Result<NaiveTime, AlarmError> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or(
            AlarmError::InvalidTime {
                hour: self.hour,
                minute: self.minute,
            },
        )?;
        match self.kind {
            AlarmKind::OneShot { date } if date.and_time(time) <= now => Err(AlarmError::PastDate),
            AlarmKind::Weekly { weekdays } if weekdays.is_empty() => {
                Err(AlarmError::EmptyWeekdaySet)
            }
            _ => Ok(time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    pub(crate) id: AlarmId,
    pub(crate) kind: AlarmKind,
    /// always has zero seconds
    pub(crate) time: NaiveTime,
    pub(crate) enabled: bool,
    pub(crate) repeat_after_5min: bool,
    /// day of the last main firing
    pub(crate) last_triggered_on: Option<NaiveDate>,
    /// when the snooze echo is due
    pub(crate) repeat_scheduled_at: Option<NaiveDateTime>,
}

impl Alarm {
    pub(crate) fn new(id: AlarmId, spec: &AlarmSpec, time: NaiveTime) -> Self {
        Self {
            id,
            kind: spec.kind,
            time,
            enabled: true,
            repeat_after_5min: spec.repeat_after_5min,
            last_triggered_on: None,
            repeat_scheduled_at: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> AlarmId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> &AlarmKind {
        &self.kind
    }

    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn repeat_after_5min(&self) -> bool {
        self.repeat_after_5min
    }

    #[must_use]
    pub const fn last_triggered_on(&self) -> Option<NaiveDate> {
        self.last_triggered_on
    }

    #[must_use]
    pub const fn repeat_scheduled_at(&self) -> Option<NaiveDateTime> {
        self.repeat_scheduled_at
    }

    #[must_use]
    pub const fn is_one_shot(&self) -> bool {
        matches!(self.kind, AlarmKind::OneShot { .. })
    }

    /// whether the main firing already happened on `day`
    pub(crate) fn rang_on(&self, day: NaiveDate) -> bool {
        self.last_triggered_on == Some(day)
    }

    /// whether the alarm is scheduled for the weekday of `day`
    pub(crate) fn scheduled_on(&self, day: NaiveDate) -> bool {
        match self.kind {
            AlarmKind::OneShot { date } => date == day,
            AlarmKind::Weekly { weekdays } => weekdays.contains(day.weekday()),
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // one shot: 20.10 07:30, weekly: Mon,Wed 07:30
        match self.kind {
            AlarmKind::OneShot { date } => {
                write!(f, "{} {}", date.format("%d.%m"), self.time.format("%H:%M"))
            }
            AlarmKind::Weekly { weekdays } => {
                write!(f, "{weekdays} {}", self.time.format("%H:%M"))
            }
        }
    }
}
