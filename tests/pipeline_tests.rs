//! Integration tests for the invite pipeline: locate, decode, extract.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use invitecopy::error::InviteError;
use invitecopy::parser::decode::decode_base64_to_text;
use invitecopy::parser::ical::{build_summary, extract_field, FieldKey};
use invitecopy::parser::invite::{locate_invite, Base64Payload};
use invitecopy::parser::mbox::MboxReader;
use invitecopy::parser::{eml, summarize_message};

const EXPECTED_SUMMARY: &str = "Start: 2024-01-15, 09:00 (Pacific Standard Time)\n\
                                End: 2024-01-15, 10:00 (UTC)\n\
                                URL: https://teams.example.com/l/meetup/abc123";

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    eml::read_message(fixture(name)).unwrap()
}

/// Wrap an iCalendar text into a minimal MIME message, base64 lines of 76.
fn message_with_calendar(ics: &str) -> String {
    let encoded = STANDARD.encode(ics);
    let lines: Vec<&str> = encoded
        .as_bytes()
        .chunks(76)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect();
    format!(
        "Subject: Invite\r\n\
         Content-Type: multipart/alternative; boundary=\"b\"\r\n\r\n\
         --b\r\n\
         Content-Type: text/calendar; charset=\"utf-8\"; method=REQUEST\r\n\
         Content-Transfer-Encoding: base64\r\n\r\n\
         {}\r\n\r\n\
         --b--\r\n",
        lines.join("\r\n")
    )
}

// ─── Locator ────────────────────────────────────────────────────────

#[test]
fn test_plain_message_has_no_invite() {
    assert_eq!(locate_invite(&read_fixture("plain.eml")), None);
}

#[test]
fn test_locator_returns_exact_payload() {
    let body = "QkVHSU46VkNBTEVOREFS\nRU5EOlZDQUxFTkRBUg==";
    let raw = format!(
        "Content-Type: text/calendar; method=REQUEST\r\n\
         Content-Transfer-Encoding: base64\r\n\r\n\
         {}\r\n\r\n--b--\r\n",
        body.replace('\n', "\r\n")
    );
    assert_eq!(locate_invite(&raw).unwrap().as_str(), body);
}

#[test]
fn test_locator_on_fixture() {
    let payload = locate_invite(&read_fixture("teams_invite.eml")).unwrap();
    assert!(payload.as_str().starts_with("QkVHSU46VkNBTEVOREFS"));
    assert!(payload.as_str().ends_with("=="));
    assert!(!payload.as_str().contains('\r'));
}

// ─── Decoder ────────────────────────────────────────────────────────

#[test]
fn test_decode_roundtrip_multibyte() {
    for text in [
        "BEGIN:VCALENDAR",
        "ORGANIZER;CN=José Müller:mailto:jose@example.com",
        "SUMMARY:お知らせ – Café ☕",
        "",
    ] {
        let payload = Base64Payload::new(STANDARD.encode(text));
        assert_eq!(decode_base64_to_text(&payload).unwrap(), text);
    }
}

#[test]
fn test_decode_fixture_keeps_accents() {
    let payload = locate_invite(&read_fixture("teams_invite.eml")).unwrap();
    let text = decode_base64_to_text(&payload).unwrap();
    assert!(text.contains("CN=José Müller"));
    assert!(text.contains("Zoë Ångström"));
    assert!(text.contains("Quartalsplanung – Café"));
}

// ─── Extractor ──────────────────────────────────────────────────────

#[test]
fn test_extract_dtstart_pacific() {
    let text = "DTSTART;TZID=Pacific Standard Time:20240115T090000\r\n";
    assert_eq!(
        extract_field(&FieldKey::DtStart, text).unwrap(),
        "2024-01-15, 09:00 (Pacific Standard Time)"
    );
}

#[test]
fn test_extract_dtend_utc() {
    let text = "DTEND;TZID=UTC:20240115T100000\r\n";
    assert_eq!(
        extract_field(&FieldKey::DtEnd, text).unwrap(),
        "2024-01-15, 10:00 (UTC)"
    );
}

#[test]
fn test_extract_url_strips_whitespace() {
    let text = "X-MICROSOFT-SKYPETEAMSMEETINGURL:https://teams.example.com/l/meetup/abc123\n\
                X-MICROSOFT-SCHEDULINGSERVICEUPDATEURL:...";
    assert_eq!(
        extract_field(&FieldKey::TeamsMeetingUrl, text).unwrap(),
        "https://teams.example.com/l/meetup/abc123"
    );
}

#[test]
fn test_missing_field_is_reported() {
    let ics = "BEGIN:VEVENT\r\nDTSTART;TZID=UTC:20240115T090000\r\nEND:VEVENT\r\n";
    let err = build_summary(ics).unwrap_err();
    assert!(matches!(err, InviteError::MissingAnchor { ref key, .. } if key == "DTEND;"));
}

// ─── End to end ─────────────────────────────────────────────────────

#[test]
fn test_end_to_end_fixture() {
    let summary = summarize_message(&read_fixture("teams_invite.eml"))
        .unwrap()
        .unwrap();
    assert_eq!(summary.to_string(), EXPECTED_SUMMARY);
}

#[test]
fn test_end_to_end_generated_message() {
    let ics = "BEGIN:VCALENDAR\r\n\
               BEGIN:VEVENT\r\n\
               DTSTART;TZID=Pacific Standard Time:20240115T090000\r\n\
               DTEND;TZID=UTC:20240115T100000\r\n\
               X-MICROSOFT-SKYPETEAMSMEETINGURL:https://teams.example.com/l/meetup/abc123\r\n\
               X-MICROSOFT-SCHEDULINGSERVICEUPDATEURL:https://scheduler.example.com/\r\n\
               END:VEVENT\r\n\
               END:VCALENDAR\r\n";
    let summary = summarize_message(&message_with_calendar(ics))
        .unwrap()
        .unwrap();
    assert_eq!(summary.to_string(), EXPECTED_SUMMARY);
}

#[test]
fn test_pipeline_is_idempotent() {
    let raw = read_fixture("teams_invite.eml");
    let first = summarize_message(&raw).unwrap();
    let second = summarize_message(&raw).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_plain_message_summarizes_to_none() {
    assert!(summarize_message(&read_fixture("plain.eml")).unwrap().is_none());
}

#[test]
fn test_broken_base64_is_decode_error() {
    let result = summarize_message(&read_fixture("broken_invite.eml"));
    assert!(matches!(result, Err(InviteError::Decode(_))));
}

// ─── MBOX scanning ──────────────────────────────────────────────────

#[test]
fn test_scan_mixed_mbox() {
    let messages: Vec<_> = MboxReader::open(fixture("mixed.mbox"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(messages.len(), 3);

    let outcomes: Vec<_> = messages
        .iter()
        .map(|m| summarize_message(&String::from_utf8_lossy(&m.raw)))
        .collect();
    assert!(matches!(outcomes[0], Ok(None)));
    assert_eq!(
        outcomes[1].as_ref().unwrap().as_ref().unwrap().to_string(),
        EXPECTED_SUMMARY
    );
    assert!(matches!(outcomes[2], Err(InviteError::Decode(_))));

    assert_eq!(
        eml::message_subject(&messages[1].raw).as_deref(),
        Some("Quarterly planning")
    );
}

#[test]
fn test_open_missing_mbox() {
    let result = MboxReader::open(fixture("nope.mbox"));
    assert!(matches!(result, Err(InviteError::FileNotFound(_))));
}
