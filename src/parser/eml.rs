//! Reading individual `.eml` files (RFC 5322 messages without MBOX framing).

use std::path::Path;

use mail_parser::MessageParser;

use crate::error::{InviteError, Result};

/// Read a message file as text.
///
/// Bytes that are not valid UTF-8 are replaced; the calendar payload itself is
/// base64 and therefore plain ASCII.
pub fn read_message(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InviteError::FileNotFound(path.to_path_buf())
        } else {
            InviteError::io(path, e)
        }
    })?;
    Ok(String::from_utf8_lossy(skip_from_line(&data)).into_owned())
}

/// Decoded `Subject:` of a raw message, if it has one.
pub fn message_subject(raw_message: &[u8]) -> Option<String> {
    MessageParser::default()
        .parse_headers(skip_from_line(raw_message))
        .and_then(|msg| msg.subject().map(String::from))
}

/// Skip a BOM and the `From ` separator line that starts an MBOX message.
pub(crate) fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_from_line() {
        let data = b"From user@example.com Thu Jan 01 00:00:00 2024\nSubject: Test\n\nBody\n";
        assert!(skip_from_line(data).starts_with(b"Subject:"));
    }

    #[test]
    fn test_skip_from_line_no_from() {
        let data = b"Subject: Test\n\nBody\n";
        assert_eq!(skip_from_line(data), data);
    }

    #[test]
    fn test_message_subject_encoded_word() {
        let data = b"From: a@b.com\nSubject: =?UTF-8?B?SG9sYSBtdW5kbw==?=\n\nBody\n";
        assert_eq!(message_subject(data).as_deref(), Some("Hola mundo"));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_message("/definitely/not/here.eml");
        assert!(matches!(result, Err(InviteError::FileNotFound(_))));
    }
}
