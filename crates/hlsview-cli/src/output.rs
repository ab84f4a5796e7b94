//! Output formatting for CLI

use console::style;
use hlsview_core::{ControlsView, Overlay, PlaybackPhase, PlayerState};
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Serialize as pretty JSON
pub fn to_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Serialize)]
struct StateReport<'a> {
    phase: PlaybackPhase,
    state: &'a PlayerState,
    controls: ControlsView,
}

/// Render player state in the selected format
pub fn format_state(phase: PlaybackPhase, state: &PlayerState, format: OutputFormat) -> String {
    let controls = ControlsView::from_state(state);

    match format {
        OutputFormat::Json => to_json(&StateReport {
            phase,
            state,
            controls,
        }),
        OutputFormat::Text => {
            let phase_label = match phase {
                PlaybackPhase::Playing => style(phase.to_string()).green(),
                PlaybackPhase::Errored => style(phase.to_string()).red(),
                PlaybackPhase::Loading => style(phase.to_string()).yellow(),
                _ => style(phase.to_string()).dim(),
            };
            let mut line = format!(
                "[{}] {}  vol {:.0}%{}  {}{}",
                phase_label,
                controls.time_display(),
                state.volume * 100.0,
                if state.muted { " (muted)" } else { "" },
                if state.fullscreen { "fullscreen  " } else { "" },
                state.source_url,
            );
            if let Overlay::Error(message) = &controls.overlay {
                line.push_str(&format!("\n  {} {}", style("error:").red().bold(), message));
            }
            line
        }
    }
}
