//! Meeting summary produced from an invite.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One of the two timestamps of a meeting, as written in the invite.
///
/// The fields hold the reformatted text, not parsed values: an invite with a
/// short or odd value still yields a summary, just a malformed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingTime {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    /// Time-zone identifier from the `TZID` parameter.
    pub tzid: String,
}

impl MeetingTime {
    /// Parse date and time into a naive (zone-less) timestamp.
    ///
    /// Returns `None` when the invite value was not a well-formed
    /// `YYYYMMDDTHHMM` date-time.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&format!("{} {}", self.date, self.time), "%Y-%m-%d %H:%M")
            .ok()
    }
}

/// Serialized with an extra `local` field: the ISO 8601 timestamp in the
/// invite's own zone, or `null` for values that do not parse.
impl Serialize for MeetingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let local = self
            .to_naive_datetime()
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string());

        let mut s = serializer.serialize_struct("MeetingTime", 4)?;
        s.serialize_field("date", &self.date)?;
        s.serialize_field("time", &self.time)?;
        s.serialize_field("tzid", &self.tzid)?;
        s.serialize_field("local", &local)?;
        s.end()
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} ({})", self.date, self.time, self.tzid)
    }
}

/// Start, end and join URL of a meeting.
///
/// `Display` renders the three-line clipboard text:
///
/// ```text
/// Start: 2024-01-15, 09:00 (Pacific Standard Time)
/// End: 2024-01-15, 10:00 (UTC)
/// URL: https://teams.example.com/l/meetup/abc123
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingSummary {
    pub start: MeetingTime,
    pub end: MeetingTime,
    pub url: String,
}

impl fmt::Display for MeetingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Start: {}\nEnd: {}\nURL: {}",
            self.start, self.end, self.url
        )
    }
}
