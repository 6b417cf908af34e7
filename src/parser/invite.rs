//! Invite locator: finds the base64 body of the first `text/calendar` part.

use tracing::debug;

/// Header that opens the calendar MIME part.
const CALENDAR_HEADER: &str = "Content-Type: text/calendar;";

/// Blank line separating MIME headers from body, and one body from the next.
const BLANK_LINE: &str = "\n\n";

/// Base64 body of an embedded calendar part.
///
/// Holds the text exactly as it appears between the blank line ending the part
/// headers and the next blank line, line breaks included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Payload(String);

impl Base64Payload {
    /// Wrap text that is expected to be a base64 body.
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Locate the calendar payload inside a raw message.
///
/// Carriage returns are removed first so that CRLF and LF messages are
/// matched the same way. Returns `None` for messages without a calendar part
/// and for a calendar part whose body is not closed by a blank line. Only the
/// first calendar part in document order is considered.
pub fn locate_invite(raw_message: &str) -> Option<Base64Payload> {
    let normalized = strip_carriage_returns(raw_message);

    let start = normalized.find(CALENDAR_HEADER)?;
    let part = &normalized[start..];

    let body_start = part.find(BLANK_LINE)? + BLANK_LINE.len();
    let body = &part[body_start..];
    let body_end = body.find(BLANK_LINE)?;

    debug!(
        offset = start,
        length = body_end,
        "Located calendar part in message"
    );
    Some(Base64Payload(body[..body_end].to_string()))
}

/// `true` if the message carries a calendar part the locator can extract.
pub fn has_invite(raw_message: &str) -> bool {
    locate_invite(raw_message).is_some()
}

fn strip_carriage_returns(raw: &str) -> String {
    raw.chars().filter(|&c| c != '\r').collect()
}
