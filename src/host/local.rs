//! Host backed by local files and the terminal.
//!
//! Messages come from `.eml` files, each opened in its own tab. Toolbar state is recorded in memory
//! and logged, the theme comes from configuration, and the clipboard is
//! reached through an OSC 52 escape, an external program or stdout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::{ClipboardBackend, ClipboardConfig, Config};
use crate::error::{InviteError, Result};
use crate::host::{ActionUi, Clipboard, MailHost, ThemeHost};
use crate::model::message::{DisplayedMessage, HostTheme, MessageId, TabId};
use crate::parser::eml;

/// Toolbar state as last set by the action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    /// Icon path last set.
    pub icon: Option<String>,
    /// Enabled flag per tab.
    pub enabled: HashMap<TabId, bool>,
}

/// File-backed [`Host`](crate::host::Host).
pub struct LocalHost {
    messages: HashMap<MessageId, PathBuf>,
    tabs: HashMap<TabId, DisplayedMessage>,
    next_id: u64,
    prefers_dark: bool,
    theme: HostTheme,
    clipboard: ClipboardConfig,
    state: Mutex<ActionState>,
}

impl LocalHost {
    pub fn new(config: &Config) -> Self {
        let prefers_dark = config.display.prefers_dark.unwrap_or_else(|| {
            std::env::var("COLORFGBG")
                .map(|v| colorfgbg_is_dark(&v))
                .unwrap_or(false)
        });
        Self {
            messages: HashMap::new(),
            tabs: HashMap::new(),
            next_id: 1,
            prefers_dark,
            theme: HostTheme {
                colors: config.display.theme_colors.clone(),
            },
            clipboard: config.clipboard.clone(),
            state: Mutex::new(ActionState::default()),
        }
    }

    /// Display a message file in a new tab.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<(TabId, DisplayedMessage)> {
        let path = path.as_ref();
        let raw = eml::read_message(path)?;
        let subject = eml::message_subject(raw.as_bytes()).unwrap_or_default();
        Ok(self.show(path.to_path_buf(), subject))
    }

    /// Snapshot of the toolbar state.
    pub fn action_state(&self) -> ActionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn show(&mut self, path: PathBuf, subject: String) -> (TabId, DisplayedMessage) {
        let id = MessageId(self.next_id);
        let tab = TabId(self.next_id);
        self.next_id += 1;

        let message = DisplayedMessage { id, subject };
        self.messages.insert(id, path);
        self.tabs.insert(tab, message.clone());
        (tab, message)
    }

    fn set_enabled(&self, tab: TabId, enabled: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled
            .insert(tab, enabled);
    }

    async fn copy_with_command(&self, text: &str) -> Result<()> {
        let (program, args) = self
            .clipboard
            .command
            .split_first()
            .ok_or_else(|| InviteError::Clipboard("no clipboard command configured".into()))?;

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| InviteError::Clipboard(format!("cannot run '{program}': {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| InviteError::Clipboard(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| InviteError::Clipboard(e.to_string()))?;
        if !status.success() {
            return Err(InviteError::Clipboard(format!(
                "'{program}' exited with {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MailHost for LocalHost {
    async fn get_raw_message(&self, id: MessageId) -> Result<String> {
        let path = self
            .messages
            .get(&id)
            .ok_or_else(|| InviteError::Host(format!("unknown message {id}")))?;
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| InviteError::io(path, e))?;
        Ok(String::from_utf8_lossy(eml::skip_from_line(&data)).into_owned())
    }

    async fn get_displayed_message(&self, tab: TabId) -> Result<DisplayedMessage> {
        self.tabs
            .get(&tab)
            .cloned()
            .ok_or_else(|| InviteError::Host(format!("no message displayed in tab {tab}")))
    }
}

#[async_trait]
impl ActionUi for LocalHost {
    async fn set_action_icon(&self, path: &str) -> Result<()> {
        debug!(icon = path, "Set action icon");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .icon = Some(path.to_string());
        Ok(())
    }

    async fn enable_action(&self, tab: TabId) -> Result<()> {
        debug!(tab = %tab, "Enable action");
        self.set_enabled(tab, true);
        Ok(())
    }

    async fn disable_action(&self, tab: TabId) -> Result<()> {
        debug!(tab = %tab, "Disable action");
        self.set_enabled(tab, false);
        Ok(())
    }
}

#[async_trait]
impl ThemeHost for LocalHost {
    async fn get_current_theme(&self) -> Result<HostTheme> {
        Ok(self.theme.clone())
    }

    fn prefers_dark_color_scheme(&self) -> bool {
        self.prefers_dark
    }
}

#[async_trait]
impl Clipboard for LocalHost {
    async fn write_text(&self, text: &str) -> Result<()> {
        match self.clipboard.backend {
            ClipboardBackend::Osc52 => {
                let sequence = osc52_sequence(text);
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(sequence.as_bytes())
                    .await
                    .map_err(|e| InviteError::Clipboard(e.to_string()))?;
                stdout
                    .flush()
                    .await
                    .map_err(|e| InviteError::Clipboard(e.to_string()))?;
            }
            ClipboardBackend::Command => self.copy_with_command(text).await?,
            ClipboardBackend::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(format!("{text}\n").as_bytes())
                    .await
                    .map_err(|e| InviteError::Clipboard(e.to_string()))?;
            }
        }
        info!(backend = ?self.clipboard.backend, bytes = text.len(), "Wrote clipboard");
        Ok(())
    }
}

/// OSC 52 "set clipboard" escape for `text`.
fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Interpret `COLORFGBG` (`"fg;bg"` or `"fg;default;bg"`): backgrounds 0–6
/// and 8 are dark palette entries.
fn colorfgbg_is_dark(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_colorfgbg() {
        assert!(colorfgbg_is_dark("15;0"));
        assert!(colorfgbg_is_dark("15;default;8"));
        assert!(!colorfgbg_is_dark("0;15"));
        assert!(!colorfgbg_is_dark("garbage"));
    }

    #[tokio::test]
    async fn test_open_file_and_fetch() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("standup.eml");
        std::fs::write(&path, "From a@b Mon Jan 15 09:00:00 2024\nSubject: Standup\n\nBody\n")
            .unwrap();

        let mut host = LocalHost::new(&Config::default());
        let (tab, message) = host.open_file(&path).unwrap();
        assert_eq!(message.subject, "Standup");

        let shown = host.get_displayed_message(tab).await.unwrap();
        assert_eq!(shown, message);
        let raw = host.get_raw_message(message.id).await.unwrap();
        assert!(raw.starts_with("Subject: Standup"));
        assert!(raw.ends_with("Body\n"));
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let mut host = LocalHost::new(&Config::default());
        let result = host.open_file("/nonexistent/invite.eml");
        assert!(matches!(result, Err(InviteError::FileNotFound(_))));
        assert!(host.get_raw_message(MessageId(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_tab_is_host_error() {
        let host = LocalHost::new(&Config::default());
        let result = host.get_displayed_message(TabId(42)).await;
        assert!(matches!(result, Err(InviteError::Host(_))));
    }

    #[tokio::test]
    async fn test_action_state_is_recorded() {
        let host = LocalHost::new(&Config::default());
        host.set_action_icon("icon.png").await.unwrap();
        host.enable_action(TabId(1)).await.unwrap();
        host.disable_action(TabId(2)).await.unwrap();

        let state = host.action_state();
        assert_eq!(state.icon.as_deref(), Some("icon.png"));
        assert_eq!(state.enabled.get(&TabId(1)), Some(&true));
        assert_eq!(state.enabled.get(&TabId(2)), Some(&false));
    }

    #[tokio::test]
    async fn test_theme_from_config() {
        let mut config = Config::default();
        config.display.prefers_dark = Some(true);
        let host = LocalHost::new(&config);
        assert!(host.prefers_dark_color_scheme());
        assert!(host.get_current_theme().await.unwrap().is_default());
    }

    #[tokio::test]
    async fn test_command_backend_without_command_fails() {
        let mut config = Config::default();
        config.clipboard.backend = ClipboardBackend::Command;
        let host = LocalHost::new(&config);
        let result = host.write_text("x").await;
        assert!(matches!(result, Err(InviteError::Clipboard(_))));
    }
}
