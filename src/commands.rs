//! Text commands typed into the headless clock.
//!
//! ```text
//! add once 2026-10-20 07:30 [repeat]
//! add weekly mon,wed,fri 07:30 [repeat]   (days may also be 0-6, 0 is monday)
//! remove <id> | toggle <id> | clear | stop | list | next | sounds | sound <name> | help | quit
//! ```

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::alarm::{AlarmId, AlarmSpec, Weekdays};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(AlarmSpec),
    Remove(AlarmId),
    Toggle(AlarmId),
    Clear,
    Stop,
    List,
    Next,
    Sounds,
    SelectSound(String),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {what} `{value}`")]
    Invalid { what: &'static str, value: String },
}

pub const HELP: &str = "\
add once YYYY-MM-DD HH:MM [repeat]   add a one time alarm
add weekly DAYS HH:MM [repeat]       add a weekly alarm, DAYS like mon,wed or 0,2
remove ID                            delete an alarm
toggle ID                            enable or disable an alarm
clear                                delete all alarms
stop                                 stop the ringing alarm
list                                 show all alarms
next                                 time until the next alarm
sounds                               list alarm sounds
sound NAME                           pick the alarm sound
quit                                 exit";

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(CommandError::Empty)?;
        let parsed = match command.to_lowercase().as_str() {
            "add" => Self::Add(parse_add(&mut words)?),
            "remove" | "rm" | "delete" => Self::Remove(parse_id(words.next())?),
            "toggle" => Self::Toggle(parse_id(words.next())?),
            "clear" => Self::Clear,
            "stop" => Self::Stop,
            "list" | "ls" => Self::List,
            "next" => Self::Next,
            "sounds" => Self::Sounds,
            "sound" => {
                // sound file names may contain spaces
                let name = words.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    return Err(CommandError::Missing("sound name"));
                }
                return Ok(Self::SelectSound(name));
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(command.to_string())),
        };
        match words.next() {
            Some(extra) => Err(CommandError::Invalid {
                what: "trailing argument",
                value: extra.to_string(),
            }),
            None => Ok(parsed),
        }
    }
}

fn parse_add<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<AlarmSpec, CommandError> {
    let kind = words.next().ok_or(CommandError::Missing("alarm kind"))?;
    let spec = match kind {
        "once" | "date" => {
            let date = words.next().ok_or(CommandError::Missing("date"))?;
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                CommandError::Invalid {
                    what: "date",
                    value: date.to_string(),
                }
            })?;
            let (hour, minute) = parse_time(words.next())?;
            AlarmSpec::one_shot(date, hour, minute)
        }
        "weekly" => {
            let days = parse_weekdays(words.next().ok_or(CommandError::Missing("weekdays"))?)?;
            let (hour, minute) = parse_time(words.next())?;
            AlarmSpec::weekly(days, hour, minute)
        }
        other => {
            return Err(CommandError::Invalid {
                what: "alarm kind",
                value: other.to_string(),
            })
        }
    };
    match words.next() {
        None => Ok(spec),
        Some("repeat") => Ok(spec.with_repeat(true)),
        Some(extra) => Err(CommandError::Invalid {
            what: "trailing argument",
            value: extra.to_string(),
        }),
    }
}

/// `HH:MM` without range checks, the store reports out of range values
fn parse_time(word: Option<&str>) -> Result<(u32, u32), CommandError> {
    let word = word.ok_or(CommandError::Missing("time"))?;
    let invalid = || CommandError::Invalid {
        what: "time",
        value: word.to_string(),
    };
    let (hour, minute) = word.split_once(':').ok_or_else(invalid)?;
    Ok((
        hour.parse().map_err(|_| invalid())?,
        minute.parse().map_err(|_| invalid())?,
    ))
}

/// comma separated day names (`mon`, `tuesday`) or indices (`0`-`6`)
fn parse_weekdays(word: &str) -> Result<Weekdays, CommandError> {
    word.split(',')
        .filter(|day| !day.is_empty())
        .try_fold(Weekdays::EMPTY, |days, day| {
            let invalid = || CommandError::Invalid {
                what: "weekday",
                value: day.to_string(),
            };
            let parsed = match day.parse::<u8>() {
                Ok(index) => Weekdays::from_indices(&[index]).map_err(|_| invalid())?,
                Err(_) => Weekdays::EMPTY.with(day.parse::<Weekday>().map_err(|_| invalid())?),
            };
            Ok(days.iter().chain(parsed.iter()).collect())
        })
}

fn parse_id(word: Option<&str>) -> Result<AlarmId, CommandError> {
    let word = word.ok_or(CommandError::Missing("alarm id"))?;
    word.parse().map(AlarmId).map_err(|_| CommandError::Invalid {
        what: "alarm id",
        value: word.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_one_shot() {
        assert_eq!(
            "add once 2026-10-20 07:30".parse::<Command>(),
            Ok(Command::Add(AlarmSpec::one_shot(
                NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
                7,
                30
            )))
        );
    }

    #[test]
    fn add_weekly_with_repeat() {
        let days: Weekdays = [Weekday::Mon, Weekday::Wed, Weekday::Sun].into_iter().collect();
        assert_eq!(
            "add weekly mon,2,Sunday 6:05 repeat".parse::<Command>(),
            Ok(Command::Add(AlarmSpec::weekly(days, 6, 5).with_repeat(true)))
        );
    }

    #[test]
    fn out_of_range_time_is_left_to_the_store() {
        let days = Weekdays::EMPTY.with(Weekday::Fri);
        assert_eq!(
            "add weekly fri 25:00".parse::<Command>(),
            Ok(Command::Add(AlarmSpec::weekly(days, 25, 0)))
        );
    }

    #[test]
    fn empty_day_list_reaches_the_store() {
        assert_eq!(
            "add weekly , 07:00".parse::<Command>(),
            Ok(Command::Add(AlarmSpec::weekly(Weekdays::EMPTY, 7, 0)))
        );
    }

    #[test]
    fn bad_arguments() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "snooze".parse::<Command>(),
            Err(CommandError::Unknown("snooze".to_string()))
        );
        assert_eq!(
            "add weekly mon,funday 07:00".parse::<Command>(),
            Err(CommandError::Invalid {
                what: "weekday",
                value: "funday".to_string()
            })
        );
        assert_eq!(
            "add weekly 7 07:00".parse::<Command>(),
            Err(CommandError::Invalid {
                what: "weekday",
                value: "7".to_string()
            })
        );
        assert_eq!(
            "add once 2026-02-30 07:00".parse::<Command>(),
            Err(CommandError::Invalid {
                what: "date",
                value: "2026-02-30".to_string()
            })
        );
        assert_eq!(
            "remove".parse::<Command>(),
            Err(CommandError::Missing("alarm id"))
        );
        assert_eq!(
            "stop now".parse::<Command>(),
            Err(CommandError::Invalid {
                what: "trailing argument",
                value: "now".to_string()
            })
        );
    }

    #[test]
    fn simple_commands() {
        assert_eq!("toggle 3".parse::<Command>(), Ok(Command::Toggle(AlarmId(3))));
        assert_eq!("rm 0".parse::<Command>(), Ok(Command::Remove(AlarmId(0))));
        assert_eq!(
            "sound my song.mp3".parse::<Command>(),
            Ok(Command::SelectSound("my song.mp3".to_string()))
        );
        assert_eq!("QUIT".parse::<Command>(), Ok(Command::Quit));
    }
}
