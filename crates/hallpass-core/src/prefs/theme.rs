//! Light/dark theme preference persistence.
//!
//! A sibling of the token store: one durable key (`theme`) holding `dark`
//! or `light`. An unreadable or invalid value falls back to the system
//! preference; persistence failures are logged and otherwise ignored, a
//! lost preference is not worth interrupting the user for.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// File name of the persisted preference.
const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub struct ThemeStore {
    dir: PathBuf,
    theme: Theme,
}

impl ThemeStore {
    /// Load the persisted preference; anything unreadable or invalid falls
    /// back to the system preference.
    pub fn load(dir: impl Into<PathBuf>, system_prefers_dark: bool) -> Self {
        let dir = dir.into();
        let fallback = if system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        };

        let theme = match std::fs::read_to_string(dir.join(THEME_KEY)) {
            Ok(value) => Theme::parse(value.trim()).unwrap_or(fallback),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(error = %e, "Failed to read theme preference");
                }
                fallback
            }
        };

        Self { dir, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Switch to a theme and persist the choice.
    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist();
    }

    /// Flip between light and dark, persisting the result.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }

    fn persist(&self) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(error = %e, "Failed to create preference directory");
            return;
        }
        if let Err(e) = std::fs::write(self.dir.join(THEME_KEY), self.theme.as_str()) {
            warn!(error = %e, "Failed to persist theme preference");
        }
    }
}
