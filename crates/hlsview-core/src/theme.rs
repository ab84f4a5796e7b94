//! Light/dark theme and the palette each one renders with
//!
//! # Usage
//!
//! ```rust
//! use hlsview_core::theme::Theme;
//!
//! let theme = Theme::Light.toggle();
//! println!("{}", theme.palette().to_css());
//! ```

use serde::{Deserialize, Serialize};

/// Color theme of the page around the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Accessible label of the toggle button
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }

    /// Color palette for this theme
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette::LIGHT,
            Theme::Dark => Palette::DARK,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Page and control colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    /// Accent for buttons and the progress bar - red-600
    pub accent: &'static str,
    /// Accent hover - red-700
    pub accent_hover: &'static str,
    /// Page background
    pub background: &'static str,
    /// Cards and panels
    pub surface: &'static str,
    /// Panel borders
    pub border: &'static str,
    /// Main text
    pub text: &'static str,
    /// Secondary text
    pub text_soft: &'static str,
    /// Error text and outlines
    pub error: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        accent: "#dc2626",
        accent_hover: "#b91c1c",
        background: "#f9fafb",
        surface: "#ffffff",
        border: "#e5e7eb",
        text: "#111827",
        text_soft: "#4b5563",
        error: "#ef4444",
    };

    pub const DARK: Palette = Palette {
        accent: "#dc2626",
        accent_hover: "#b91c1c",
        background: "#111827",
        surface: "#1f2937",
        border: "#374151",
        text: "#f3f4f6",
        text_soft: "#9ca3af",
        error: "#ef4444",
    };

    /// Render as CSS custom properties on `:root`
    pub fn to_css(&self) -> String {
        format!(
            r#":root {{
  --hlsview-accent: {};
  --hlsview-accent-hover: {};
  --hlsview-background: {};
  --hlsview-surface: {};
  --hlsview-border: {};
  --hlsview-text: {};
  --hlsview-text-soft: {};
  --hlsview-error: {};

  /* Player controls overlay */
  --hlsview-controls-gradient: linear-gradient(to top, rgba(0, 0, 0, 0.8), transparent);
  --hlsview-overlay: rgba(0, 0, 0, 0.5);
}}"#,
            self.accent,
            self.accent_hover,
            self.background,
            self.surface,
            self.border,
            self.text,
            self.text_soft,
            self.error,
        )
    }

    /// Export as JSON for JS interop
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
