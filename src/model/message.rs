//! Identifiers and metadata handed over by the mail client host.

use std::collections::BTreeMap;
use std::fmt;

/// Host-assigned identifier of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// Host-assigned identifier of a tab showing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata of the message currently shown in a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedMessage {
    pub id: MessageId,

    /// Decoded subject line, empty when the host does not know it.
    pub subject: String,
}

/// The host application's current theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTheme {
    /// Colour overrides of the active theme. `None` means the host runs its
    /// own default theme.
    pub colors: Option<BTreeMap<String, String>>,
}

impl HostTheme {
    /// `true` if the theme carries no explicit colour overrides.
    pub fn is_default(&self) -> bool {
        self.colors.is_none()
    }
}
