//! `invitecopy` - pull the meeting times and Teams join link out of a
//! calendar invite embedded in an email.
//!
//! The pipeline runs strictly forward: raw message → base64 calendar payload
//! → decoded iCalendar text → [`MeetingSummary`](model::summary::MeetingSummary).
//! The [`controller`] wires it to a mail client through the [`host`] traits.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod model;
pub mod parser;
