//! Core data model types: host identifiers, theme state, and meeting summaries.

pub mod message;
pub mod summary;
pub mod theme;
