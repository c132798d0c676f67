//! Time arithmetic shared by the due scans and the countdown label.
//!
//! Due checks work at minute resolution, deadlines (auto stop, snooze) at
//! second resolution.

use chrono::{Datelike, Days, Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::alarm::{Alarm, AlarmKind, Weekdays};

/// whether `time` names the same hour and minute as `now`, seconds ignored
#[must_use]
pub fn same_minute(time: NaiveTime, now: NaiveDateTime) -> bool {
    time.hour() == now.hour() && time.minute() == now.minute()
}

/// the main firing of `alarm` should happen at `now`
#[must_use]
pub fn is_due_main(alarm: &Alarm, now: NaiveDateTime) -> bool {
    let today = now.date();
    alarm.enabled
        && alarm.scheduled_on(today)
        && same_minute(alarm.time, now)
        && !alarm.rang_on(today)
}

/// the snooze echo of `alarm` should happen at `now`,
/// same day suppression does not apply to it
#[must_use]
pub fn is_snooze_due(alarm: &Alarm, now: NaiveDateTime) -> bool {
    alarm.enabled && alarm.repeat_scheduled_at.is_some_and(|at| now >= at)
}

/// Days until the next day in `weekdays` on which `time` is still ahead of `now`.
///
/// Today only counts if the alarm time is strictly after `now`,
/// otherwise today's weekday wraps around to 7.
#[must_use]
pub fn weekly_day_offset(weekdays: Weekdays, time: NaiveTime, now: NaiveDateTime) -> Option<u32> {
    let today = now.weekday().num_days_from_monday();
    weekdays
        .iter()
        .map(|day| {
            let ahead = (7 + day.num_days_from_monday() - today) % 7;
            if ahead == 0 && now.date().and_time(time) <= now {
                7
            } else {
                ahead
            }
        })
        .min()
}

/// next moment strictly after `now` at which `alarm` rings, snooze echo included
#[must_use]
pub fn next_occurrence(alarm: &Alarm, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let main = match alarm.kind {
        AlarmKind::OneShot { date } => Some(date.and_time(alarm.time)),
        AlarmKind::Weekly { weekdays } => weekly_day_offset(weekdays, alarm.time, now)
            .and_then(|offset| now.date().checked_add_days(Days::new(u64::from(offset))))
            .map(|day| day.and_time(alarm.time)),
    }
    .filter(|&at| at > now);
    let snooze = alarm.repeat_scheduled_at.filter(|&at| at > now);
    main.into_iter().chain(snooze).min()
}

/// time left until the closest enabled alarm
pub fn countdown_to_next<'a>(
    alarms: impl IntoIterator<Item = &'a Alarm>,
    now: NaiveDateTime,
) -> Option<Duration> {
    alarms
        .into_iter()
        .filter(|alarm| alarm.enabled)
        .filter_map(|alarm| next_occurrence(alarm, now))
        .min()
        .map(|at| at - now)
}

/// `1d 02:03` when at least a day is left, otherwise `02:03`, seconds are dropped
#[must_use]
pub fn format_countdown(left: Duration) -> String {
    let days = left.num_days();
    let hours = left.num_hours() % 24;
    let minutes = left.num_minutes() % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}")
    } else {
        format!("{hours:02}:{minutes:02}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::*;
    use crate::alarm::{AlarmId, AlarmSpec};

    // 2026-10-19 is a monday
    fn at(d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn alarm(spec: &AlarmSpec) -> Alarm {
        let time = NaiveTime::from_hms_opt(spec.hour, spec.minute, 0).unwrap();
        Alarm::new(AlarmId(0), spec, time)
    }

    fn days(days: &[Weekday]) -> Weekdays {
        days.iter().copied().collect()
    }

    #[test]
    fn due_ignores_seconds() {
        let alarm = alarm(&AlarmSpec::weekly(days(&[Weekday::Mon]), 7, 0));
        assert!(is_due_main(&alarm, at(19, 7, 0, 0)));
        assert!(is_due_main(&alarm, at(19, 7, 0, 59)));
        assert!(!is_due_main(&alarm, at(19, 7, 1, 0)));
        // tuesday
        assert!(!is_due_main(&alarm, at(20, 7, 0, 0)));
    }

    #[test]
    fn due_is_suppressed_after_main_firing() {
        let mut alarm = alarm(&AlarmSpec::one_shot(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            7,
            0,
        ));
        alarm.last_triggered_on = Some(at(19, 7, 0, 0).date());
        assert!(!is_due_main(&alarm, at(19, 7, 0, 30)));
        alarm.enabled = false;
        alarm.last_triggered_on = None;
        assert!(!is_due_main(&alarm, at(19, 7, 0, 30)));
    }

    #[test]
    fn snooze_due_at_second_resolution() {
        let mut alarm = alarm(&AlarmSpec::weekly(days(&[Weekday::Mon]), 7, 0));
        alarm.last_triggered_on = Some(at(19, 7, 0, 0).date());
        alarm.repeat_scheduled_at = Some(at(19, 7, 5, 20));
        assert!(!is_snooze_due(&alarm, at(19, 7, 5, 19)));
        assert!(is_snooze_due(&alarm, at(19, 7, 5, 20)));
    }

    #[test]
    fn weekly_offset_wraps_when_time_passed() {
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let monday = days(&[Weekday::Mon]);
        assert_eq!(weekly_day_offset(monday, time, at(19, 8, 59, 59)), Some(0));
        assert_eq!(weekly_day_offset(monday, time, at(19, 9, 0, 0)), Some(7));
        assert_eq!(weekly_day_offset(monday, time, at(20, 8, 0, 0)), Some(6));
        let spread = days(&[Weekday::Mon, Weekday::Thu]);
        assert_eq!(weekly_day_offset(spread, time, at(19, 10, 0, 0)), Some(3));
        assert_eq!(weekly_day_offset(Weekdays::EMPTY, time, at(19, 10, 0, 0)), None);
    }

    #[test]
    fn next_occurrence_matches_due_scan() {
        let alarm = alarm(&AlarmSpec::weekly(days(&[Weekday::Mon]), 9, 0));
        let next = next_occurrence(&alarm, at(19, 9, 0, 30)).unwrap();
        assert_eq!(next, at(26, 9, 0, 0));
        assert!(is_due_main(&alarm, next));
        let mut day = at(20, 9, 0, 0);
        while day < next {
            assert!(!is_due_main(&alarm, day));
            day += Duration::days(1);
        }
    }

    #[test]
    fn past_one_shot_has_no_next_occurrence() {
        let alarm = alarm(&AlarmSpec::one_shot(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            7,
            0,
        ));
        assert_eq!(next_occurrence(&alarm, at(19, 7, 0, 0)), None);
        assert_eq!(
            next_occurrence(&alarm, at(19, 6, 0, 0)),
            Some(at(19, 7, 0, 0))
        );
    }

    #[test]
    fn pending_snooze_counts_down() {
        let mut alarm = alarm(&AlarmSpec::one_shot(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            7,
            0,
        ));
        alarm.repeat_scheduled_at = Some(at(19, 7, 6, 0));
        assert_eq!(
            countdown_to_next([&alarm], at(19, 7, 1, 0)),
            Some(Duration::minutes(5))
        );
    }

    #[test]
    fn countdown_skips_disabled_alarms() {
        let mut early = alarm(&AlarmSpec::weekly(days(&[Weekday::Mon]), 8, 0));
        early.enabled = false;
        let late = alarm(&AlarmSpec::weekly(days(&[Weekday::Mon]), 10, 30));
        assert_eq!(
            countdown_to_next([&early, &late], at(19, 7, 0, 0)),
            Some(Duration::minutes(210))
        );
        assert_eq!(countdown_to_next([&early], at(19, 7, 0, 0)), None);
    }

    #[test]
    fn countdown_label() {
        assert_eq!(format_countdown(Duration::seconds(3 * 3600 + 7 * 60 + 59)), "03:07");
        assert_eq!(
            format_countdown(Duration::days(6) + Duration::minutes(61)),
            "6d 01:01"
        );
    }
}
