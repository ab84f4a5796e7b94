//! Render model for the player controls

use crate::types::PlayerState;
use serde::Serialize;

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// What covers the video surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum Overlay {
    None,
    Loading,
    /// Error text plus a reload action
    Error(String),
}

/// Everything the control bar needs to draw itself
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsView {
    pub progress_percent: f64,
    pub volume_percent: f64,
    pub elapsed: String,
    pub total: String,
    pub play_label: &'static str,
    pub mute_label: &'static str,
    pub fullscreen_label: &'static str,
    pub overlay: Overlay,
}

impl ControlsView {
    pub fn from_state(state: &PlayerState) -> Self {
        let progress_percent = if state.duration > 0.0 {
            (state.current_time / state.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let volume_percent = if state.muted { 0.0 } else { state.volume * 100.0 };

        let overlay = match &state.error {
            Some(message) => Overlay::Error(message.clone()),
            None if !state.ready => Overlay::Loading,
            None => Overlay::None,
        };

        Self {
            progress_percent,
            volume_percent,
            elapsed: format_time(state.current_time),
            total: format_time(state.duration),
            play_label: if state.playing { "Pause" } else { "Play" },
            mute_label: if state.muted { "Unmute" } else { "Mute" },
            fullscreen_label: if state.fullscreen { "Exit fullscreen" } else { "Fullscreen" },
            overlay,
        }
    }

    /// `elapsed / total`
    pub fn time_display(&self) -> String {
        format!("{} / {}", self.elapsed, self.total)
    }
}
