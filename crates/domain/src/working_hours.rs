use bella_core::{AppError, AppResult};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

const CLOSED_TIME: &str = "00:00";
const DEFAULT_OPENING: &str = "10:00";
const DEFAULT_CLOSING: &str = "18:00";

/// Day of the salon week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

/// Opening window of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Whether the staff member works that day.
    #[serde(default)]
    pub is_working: bool,
    /// Start time as `HH:MM`.
    #[serde(default = "closed_time")]
    pub start: String,
    /// End time as `HH:MM`.
    #[serde(default = "closed_time")]
    pub end: String,
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self {
            is_working: false,
            start: closed_time(),
            end: closed_time(),
        }
    }
}

fn closed_time() -> String {
    CLOSED_TIME.to_owned()
}

/// Weekly working hours of a staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    #[serde(default)]
    monday: DaySchedule,
    #[serde(default)]
    tuesday: DaySchedule,
    #[serde(default)]
    wednesday: DaySchedule,
    #[serde(default)]
    thursday: DaySchedule,
    #[serde(default)]
    friday: DaySchedule,
    #[serde(default)]
    saturday: DaySchedule,
    #[serde(default)]
    sunday: DaySchedule,
}

impl WeeklyHours {
    /// Returns the schedule of one day.
    #[must_use]
    pub fn day(&self, day: Weekday) -> &DaySchedule {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    fn day_mut(&mut self, day: Weekday) -> &mut DaySchedule {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Toggles a working day.
    ///
    /// Opening a day with no hours seeds 10:00 to 18:00; closing it resets
    /// both times to 00:00.
    pub fn set_working(&mut self, day: Weekday, is_working: bool) {
        let schedule = self.day_mut(day);
        schedule.is_working = is_working;

        if is_working {
            if schedule.start.trim().is_empty() || schedule.start == CLOSED_TIME {
                schedule.start = DEFAULT_OPENING.to_owned();
            }
            if schedule.end.trim().is_empty() || schedule.end == CLOSED_TIME {
                schedule.end = DEFAULT_CLOSING.to_owned();
            }
        } else {
            schedule.start = closed_time();
            schedule.end = closed_time();
        }
    }

    /// Sets the hours of a working day.
    pub fn set_hours(
        &mut self,
        day: Weekday,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> AppResult<()> {
        let schedule = self.day_mut(day);
        if !schedule.is_working {
            return Err(AppError::Validation(format!(
                "{} is not a working day",
                day.label()
            )));
        }

        schedule.start = start.into();
        schedule.end = end.into();
        Ok(())
    }

    /// Returns the days whose hours are malformed or not increasing.
    #[must_use]
    pub fn invalid_days(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|day| {
                let schedule = self.day(*day);
                if !schedule.is_working {
                    return false;
                }

                match (parse_clock(&schedule.start), parse_clock(&schedule.end)) {
                    (Some(start), Some(end)) => start >= end,
                    _ => true,
                }
            })
            .collect()
    }
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}
