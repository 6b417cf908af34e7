//! Icon variant selection.

/// Icon shown on dark toolbars.
pub const DARK_ICON: &str = "images/calendar_white.png";

/// Icon shown on bright toolbars.
pub const BRIGHT_ICON: &str = "images/calendar_black.png";

/// Which toolbar icon variant to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeState {
    Dark,
    Bright,
}

impl ThemeState {
    /// Default icon asset for this variant.
    pub fn default_icon(self) -> &'static str {
        match self {
            ThemeState::Dark => DARK_ICON,
            ThemeState::Bright => BRIGHT_ICON,
        }
    }
}

impl std::fmt::Display for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeState::Dark => f.write_str("dark"),
            ThemeState::Bright => f.write_str("bright"),
        }
    }
}
