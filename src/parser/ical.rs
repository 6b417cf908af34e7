//! Field extraction from the iCalendar text of a Teams invite.
//!
//! This is not an RFC 5545 parser. Each field is sliced out of the text by
//! fixed anchor substrings matching the layout Exchange/Outlook emits, so a
//! change in that layout lands here and nowhere else.

use crate::error::{InviteError, Result};
use crate::model::summary::{MeetingSummary, MeetingTime};

const DTSTART: &str = "DTSTART;";
const DTEND: &str = "DTEND;";
const TEAMS_URL: &str = "X-MICROSOFT-SKYPETEAMSMEETINGURL:";

/// Line that follows the meeting URL in Exchange invites.
const URL_TERMINATOR: &str = "\nX-MICROSOFT-SCHEDULINGSERVICEUPDATEURL:";

/// A field the extractor knows how to locate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// `DTSTART;` with a `TZID` parameter.
    DtStart,
    /// `DTEND;` with a `TZID` parameter.
    DtEnd,
    /// `X-MICROSOFT-SKYPETEAMSMEETINGURL:`.
    TeamsMeetingUrl,
    /// Any other anchor. Extracts to an empty string.
    Unsupported(String),
}

impl FieldKey {
    /// Map an anchor string to a key.
    pub fn from_anchor(anchor: &str) -> Self {
        match anchor {
            DTSTART => FieldKey::DtStart,
            DTEND => FieldKey::DtEnd,
            TEAMS_URL => FieldKey::TeamsMeetingUrl,
            other => FieldKey::Unsupported(other.to_string()),
        }
    }

    /// The anchor substring searched for in the text.
    pub fn anchor(&self) -> &str {
        match self {
            FieldKey::DtStart => DTSTART,
            FieldKey::DtEnd => DTEND,
            FieldKey::TeamsMeetingUrl => TEAMS_URL,
            FieldKey::Unsupported(anchor) => anchor,
        }
    }
}

/// Extract one field as display text.
///
/// Time fields render as `"YYYY-MM-DD, HH:MM (TZID)"`, the URL as-is.
pub fn extract_field(key: &FieldKey, text: &str) -> Result<String> {
    match key {
        FieldKey::DtStart | FieldKey::DtEnd => {
            extract_date_time(key.anchor(), text).map(|t| t.to_string())
        }
        FieldKey::TeamsMeetingUrl => extract_meeting_url(text),
        FieldKey::Unsupported(_) => Ok(String::new()),
    }
}

/// Extract a `DTSTART;`/`DTEND;` style timestamp.
///
/// The value sits between the first `:` after the key and the end of that
/// line, less the line's last character (the `\r` of a CRLF line). Its characters `0..8` are `YYYYMMDD` and `9..13` are `HHMM`; a short
/// value gives short fields rather than an error. The time zone is whatever
/// lies between the first `=` after the key and the `:`.
pub fn extract_date_time(key: &str, text: &str) -> Result<MeetingTime> {
    let rest = text_after(key, text)?;
    let colon = rest
        .find(':')
        .ok_or_else(|| InviteError::missing_anchor(key, ":"))?;
    let newline = rest
        .find('\n')
        .ok_or_else(|| InviteError::missing_anchor(key, "\\n"))?;

    let value = rest.get(colon + 1..newline).unwrap_or("");
    let value = value
        .char_indices()
        .next_back()
        .map_or("", |(last, _)| &value[..last]);

    let date = format!(
        "{}-{}-{}",
        char_range(value, 0, 4),
        char_range(value, 4, 6),
        char_range(value, 6, 8)
    );
    let time = format!("{}:{}", char_range(value, 9, 11), char_range(value, 11, 13));

    let tz_start = rest.find('=').map_or(0, |eq| eq + 1);
    let tzid = rest.get(tz_start..colon).unwrap_or("").to_string();

    Ok(MeetingTime { date, time, tzid })
}

/// Extract the Teams join URL.
///
/// The value runs up to the scheduling-service line that follows it. All
/// whitespace is dropped, which also undoes iCalendar line folding.
pub fn extract_meeting_url(text: &str) -> Result<String> {
    let rest = text_after(TEAMS_URL, text)?;
    let end = rest
        .find(URL_TERMINATOR)
        .ok_or_else(|| InviteError::missing_anchor(TEAMS_URL, &URL_TERMINATOR[1..]))?;

    Ok(rest[..end].chars().filter(|c| !c.is_whitespace()).collect())
}

/// Build the meeting summary from decoded invite text.
pub fn build_summary(text: &str) -> Result<MeetingSummary> {
    Ok(MeetingSummary {
        start: extract_date_time(DTSTART, text)?,
        end: extract_date_time(DTEND, text)?,
        url: extract_meeting_url(text)?,
    })
}

/// Text following the first occurrence of `key`.
fn text_after<'a>(key: &str, text: &'a str) -> Result<&'a str> {
    let pos = text
        .find(key)
        .ok_or_else(|| InviteError::missing_anchor(key, key))?;
    Ok(&text[pos + key.len()..])
}

/// Characters `start..end` of `s`, clamped to its length.
fn char_range(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}
