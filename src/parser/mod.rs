//! Invite extraction pipeline and message sources.
//!
//! The pipeline stages run in order: [`invite::locate_invite`] →
//! [`decode::decode_base64_to_text`] → [`ical::build_summary`].

pub mod decode;
pub mod eml;
pub mod ical;
pub mod invite;
pub mod mbox;

use crate::error::Result;
use crate::model::summary::MeetingSummary;

/// Run the full pipeline on a raw message.
///
/// Returns `Ok(None)` when the message carries no calendar invite.
pub fn summarize_message(raw_message: &str) -> Result<Option<MeetingSummary>> {
    let Some(payload) = invite::locate_invite(raw_message) else {
        return Ok(None);
    };
    let text = decode::decode_base64_to_text(&payload)?;
    ical::build_summary(&text).map(Some)
}
