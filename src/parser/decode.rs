//! Base64 decoder for calendar payloads.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use tracing::debug;

use crate::error::Result;
use crate::parser::invite::Base64Payload;

/// Lenient engine: optional padding and non-zero trailing bits are accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a calendar payload into text.
///
/// The payload is decoded to raw bytes first and only then read as UTF-8, so
/// multi-byte characters (accented attendee names and the like) survive
/// intact. MIME line breaks and other ASCII whitespace inside the payload are
/// ignored. A leading byte-order mark is dropped and malformed UTF-8 becomes
/// U+FFFD.
pub fn decode_base64_to_text(payload: &Base64Payload) -> Result<String> {
    let compact: Vec<u8> = payload
        .as_str()
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let bytes = LENIENT.decode(compact)?;

    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        debug!(
            bytes = bytes.len(),
            "Calendar payload is not valid UTF-8, replaced malformed sequences"
        );
    }
    Ok(text.into_owned())
}
