//! Toolbar action: enables itself on invites and copies the meeting summary.
//!
//! Both handlers recompute everything from their event, so invocations share
//! no state. Failures never leave a handler; they are logged and reported
//! through the returned outcome.

use tracing::{debug, info, warn};

use crate::config::IconsConfig;
use crate::error::Result;
use crate::host::Host;
use crate::model::message::{DisplayedMessage, HostTheme, TabId};
use crate::model::summary::MeetingSummary;
use crate::model::theme::ThemeState;
use crate::parser::{invite, summarize_message};

/// Events delivered by the host.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A message was shown in a tab.
    MessageDisplayed {
        tab: TabId,
        message: DisplayedMessage,
    },
    /// The toolbar button was clicked in a tab.
    ActionClicked { tab: TabId },
}

/// Result of handling a display event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// The message has an invite; the action is enabled with this icon variant.
    Enabled(ThemeState),
    /// No invite; the action is disabled.
    Disabled,
    /// A host call failed.
    Failed(String),
}

/// Result of handling a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The summary was written to the clipboard.
    Copied(MeetingSummary),
    /// The displayed message has no invite; nothing was copied.
    NoInvite,
    /// Some stage failed; nothing was copied.
    Failed(String),
}

/// Result of [`InviteAction::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Display(DisplayOutcome),
    Click(ClickOutcome),
}

/// Pick the icon variant.
///
/// Dark only when the OS prefers dark and the host runs its default theme
/// (assumed dark-compatible). Any colour override means the theme is unknown,
/// so the bright variant is used.
pub fn detect_theme(prefers_dark: bool, theme: &HostTheme) -> ThemeState {
    if prefers_dark && theme.is_default() {
        ThemeState::Dark
    } else {
        ThemeState::Bright
    }
}

/// The invite toolbar action, bound to a host.
pub struct InviteAction<H> {
    host: H,
    icons: IconsConfig,
}

impl<H: Host> InviteAction<H> {
    pub fn new(host: H, icons: IconsConfig) -> Self {
        Self { host, icons }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Route a host event to its handler.
    pub async fn dispatch(&self, event: HostEvent) -> EventOutcome {
        match event {
            HostEvent::MessageDisplayed { tab, message } => {
                EventOutcome::Display(self.on_message_displayed(tab, &message).await)
            }
            HostEvent::ActionClicked { tab } => {
                EventOutcome::Click(self.on_action_clicked(tab).await)
            }
        }
    }

    /// Enable the action for messages carrying an invite, disable it otherwise.
    pub async fn on_message_displayed(
        &self,
        tab: TabId,
        message: &DisplayedMessage,
    ) -> DisplayOutcome {
        match self.try_message_displayed(tab, message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(tab = %tab, message_id = %message.id, error = %e, "Display handler failed");
                if let Err(e) = self.host.disable_action(tab).await {
                    warn!(tab = %tab, error = %e, "Failed to disable action");
                }
                DisplayOutcome::Failed(e.to_string())
            }
        }
    }

    /// Copy the summary of the invite in the tab's message to the clipboard.
    pub async fn on_action_clicked(&self, tab: TabId) -> ClickOutcome {
        match self.try_action_clicked(tab).await {
            Ok(Some(summary)) => ClickOutcome::Copied(summary),
            Ok(None) => {
                info!(tab = %tab, "No calendar invite in displayed message, nothing copied");
                ClickOutcome::NoInvite
            }
            Err(e) => {
                warn!(tab = %tab, error = %e, "Failed to copy invite summary");
                ClickOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_message_displayed(
        &self,
        tab: TabId,
        message: &DisplayedMessage,
    ) -> Result<DisplayOutcome> {
        let raw = self.host.get_raw_message(message.id).await?;
        if !invite::has_invite(&raw) {
            debug!(tab = %tab, message_id = %message.id, "No calendar invite");
            self.host.disable_action(tab).await?;
            return Ok(DisplayOutcome::Disabled);
        }

        let theme = self.update_icon().await;
        self.host.enable_action(tab).await?;
        debug!(tab = %tab, message_id = %message.id, theme = %theme, "Action enabled");
        Ok(DisplayOutcome::Enabled(theme))
    }

    async fn try_action_clicked(&self, tab: TabId) -> Result<Option<MeetingSummary>> {
        let message = self.host.get_displayed_message(tab).await?;
        let raw = self.host.get_raw_message(message.id).await?;
        let Some(summary) = summarize_message(&raw)? else {
            return Ok(None);
        };

        self.host.write_text(&summary.to_string()).await?;
        info!(
            tab = %tab,
            message_id = %message.id,
            url = %summary.url,
            "Copied invite summary to clipboard"
        );
        Ok(Some(summary))
    }

    /// Set the icon for the current theme. A failed theme query falls back to
    /// the bright variant; a failed icon update is only logged.
    async fn update_icon(&self) -> ThemeState {
        let host_theme = match self.host.get_current_theme().await {
            Ok(theme) => theme,
            Err(e) => {
                warn!(error = %e, "Theme query failed, assuming custom theme");
                HostTheme {
                    colors: Some(Default::default()),
                }
            }
        };
        let theme = detect_theme(self.host.prefers_dark_color_scheme(), &host_theme);

        if let Err(e) = self.host.set_action_icon(self.icons.path_for(theme)).await {
            warn!(error = %e, "Failed to set action icon");
        }
        theme
    }
}
