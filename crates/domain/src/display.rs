use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    /// Awaiting action.
    Warning,
    /// Positive or available.
    Success,
    /// Finished.
    Info,
    /// Cancelled or unavailable.
    Danger,
    /// Anything else.
    Neutral,
}

impl StatusTone {
    /// Maps a status value to its badge tone.
    #[must_use]
    pub fn for_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Warning,
            "confirmed" | "active" | "stock" => Self::Success,
            "completed" => Self::Info,
            "cancelled" | "out-stock" => Self::Danger,
            _ => Self::Neutral,
        }
    }
}

/// Rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDisplay {
    /// Text shown in the cell.
    pub text: String,
    /// Badge tone for status cells.
    pub tone: Option<StatusTone>,
}

impl CellDisplay {
    /// Creates a plain text cell.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }
}

/// Renders a raw value as the string used for search and display.
///
/// Missing and null values render as an empty string.
#[must_use]
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Formats a timestamp as `dd/MM/yyyy at hh:mm AM`.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn format_date_time(value: Option<&Value>) -> String {
    match parse_date_time(value) {
        Some(moment) => moment.format("%d/%m/%Y at %I:%M %p").to_string(),
        None => stringify(value),
    }
}

/// Formats a time of day as `hh:mm AM`.
#[must_use]
pub fn format_time(value: Option<&Value>) -> String {
    if let Some(Value::String(text)) = value
        && let Some(time) = parse_time_of_day(text)
    {
        return time.format("%I:%M %p").to_string();
    }

    match parse_date_time(value) {
        Some(moment) => moment.format("%I:%M %p").to_string(),
        None => stringify(value),
    }
}

/// Formats a service duration stored as `hours.minutes`, e.g. `1.30`.
#[must_use]
pub fn format_duration(value: Option<&Value>) -> String {
    let raw = stringify(value);
    let raw = raw.trim();
    if raw.is_empty() {
        return "0 mins".to_owned();
    }

    let (hours_part, minutes_part) = raw.split_once('.').unwrap_or((raw, ""));
    let hours = hours_part.parse::<u32>().unwrap_or(0);
    let minutes = minutes_part.parse::<u32>().unwrap_or(0);

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{hours} hr"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} mins"));
    }

    if parts.is_empty() {
        "0 mins".to_owned()
    } else {
        parts.join(" ")
    }
}

fn parse_date_time(value: Option<&Value>) -> Option<NaiveDateTime> {
    match value? {
        Value::Number(number) => {
            DateTime::from_timestamp_millis(number.as_i64()?).map(|moment| moment.naive_utc())
        }
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }

            DateTime::parse_from_rfc3339(text)
                .map(|moment| moment.naive_local())
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
                .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
        }
        _ => None,
    }
}

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{StatusTone, format_date_time, format_duration, format_time, stringify};

    #[test]
    fn stringify_renders_missing_values_as_empty() {
        assert_eq!(stringify(None), "");
        assert_eq!(stringify(Some(&json!(null))), "");
        assert_eq!(stringify(Some(&json!(25))), "25");
        assert_eq!(stringify(Some(&json!("Emma"))), "Emma");
    }

    #[test]
    fn date_time_uses_day_first_twelve_hour_format() {
        let value = json!("2025-03-07T14:05:00Z");
        assert_eq!(format_date_time(Some(&value)), "07/03/2025 at 02:05 PM");

        let date_only = json!("2025-03-07");
        assert_eq!(format_date_time(Some(&date_only)), "07/03/2025 at 12:00 AM");
    }

    #[test]
    fn unparseable_dates_are_shown_verbatim() {
        let value = json!("next tuesday");
        assert_eq!(format_date_time(Some(&value)), "next tuesday");
    }

    #[test]
    fn time_accepts_clock_strings() {
        let value = json!("09:30");
        assert_eq!(format_time(Some(&value)), "09:30 AM");
        let value = json!("18:00");
        assert_eq!(format_time(Some(&value)), "06:00 PM");
    }

    #[test]
    fn duration_splits_hours_and_minutes() {
        assert_eq!(format_duration(Some(&json!("1.30"))), "1 hr 30 mins");
        assert_eq!(format_duration(Some(&json!("2"))), "2 hr");
        assert_eq!(format_duration(Some(&json!("0.45"))), "45 mins");
        assert_eq!(format_duration(None), "0 mins");
    }

    #[test]
    fn status_tones_follow_badge_palette() {
        assert_eq!(StatusTone::for_status("pending"), StatusTone::Warning);
        assert_eq!(StatusTone::for_status("Confirmed"), StatusTone::Success);
        assert_eq!(StatusTone::for_status("completed"), StatusTone::Info);
        assert_eq!(StatusTone::for_status("out-stock"), StatusTone::Danger);
        assert_eq!(StatusTone::for_status("archived"), StatusTone::Neutral);
    }
}
