//! Host API surface the mail client provides.
//!
//! Each trait covers one host capability. Calls are async: every one of them
//! is a point where the host's scheduler may run other handlers.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::message::{DisplayedMessage, HostTheme, MessageId, TabId};

/// Message retrieval.
#[async_trait]
pub trait MailHost: Send + Sync {
    /// Full raw source of a message, headers and MIME parts included.
    async fn get_raw_message(&self, id: MessageId) -> Result<String>;

    /// The message currently shown in a tab.
    async fn get_displayed_message(&self, tab: TabId) -> Result<DisplayedMessage>;
}

/// Toolbar button state.
#[async_trait]
pub trait ActionUi: Send + Sync {
    async fn set_action_icon(&self, path: &str) -> Result<()>;

    async fn enable_action(&self, tab: TabId) -> Result<()>;

    async fn disable_action(&self, tab: TabId) -> Result<()>;
}

/// Theme introspection.
#[async_trait]
pub trait ThemeHost: Send + Sync {
    /// The host application's active theme.
    async fn get_current_theme(&self) -> Result<HostTheme>;

    /// Whether the OS asks for a dark colour scheme.
    fn prefers_dark_color_scheme(&self) -> bool;
}

/// Clipboard write access.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Everything the invite action needs from its host.
pub trait Host: MailHost + ActionUi + ThemeHost + Clipboard {}

impl<T: MailHost + ActionUi + ThemeHost + Clipboard> Host for T {}
