//! Core types for hlsview

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a mounted player instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback phase of a player instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// Mounted, no source requested yet
    Idle,
    /// Waiting for the engine to confirm the current source
    Loading,
    /// Source loaded, playback not started
    Ready,
    /// Playback intent is on
    Playing,
    /// Playback intent is off after having played
    Paused,
    /// The engine reported a failure for the current source
    Errored,
}

impl PlaybackPhase {
    /// Check if transition to target phase is valid
    pub fn can_transition_to(&self, target: PlaybackPhase) -> bool {
        use PlaybackPhase::*;
        if *self == target {
            return true;
        }
        matches!(
            (self, target),
            // Any mounted state can start a new load
            (_, Loading) |
            // From Loading
            (Loading, Ready) | (Loading, Playing) | (Loading, Errored) |
            // From Ready
            (Ready, Playing) | (Ready, Errored) |
            // From Playing
            (Playing, Paused) | (Playing, Errored) |
            // From Paused
            (Paused, Playing) | (Paused, Errored) |
            // From Errored, the engine may still confirm the same source
            (Errored, Ready)
        )
    }

    /// Whether the engine has confirmed the current source
    pub fn is_loaded(&self) -> bool {
        matches!(self, PlaybackPhase::Ready | PlaybackPhase::Playing | PlaybackPhase::Paused)
    }
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackPhase::Idle => write!(f, "idle"),
            PlaybackPhase::Loading => write!(f, "loading"),
            PlaybackPhase::Ready => write!(f, "ready"),
            PlaybackPhase::Playing => write!(f, "playing"),
            PlaybackPhase::Paused => write!(f, "paused"),
            PlaybackPhase::Errored => write!(f, "errored"),
        }
    }
}

/// User-facing playback status of one player instance
///
/// Only [`PlaybackStateController`](crate::PlaybackStateController) writes
/// this record. Renderers get read access through the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Desired playback intent
    pub playing: bool,
    /// User mute intent
    pub muted: bool,
    /// Volume in [0, 1]
    pub volume: f64,
    /// Stream length in seconds, 0 when unknown or live
    pub duration: f64,
    /// Playback position in seconds
    pub current_time: f64,
    /// Mirrors the environment's fullscreen status
    pub fullscreen: bool,
    /// Engine confirmed the current source
    pub ready: bool,
    /// Last playback error for the current source
    pub error: Option<String>,
    /// Currently loaded stream address, empty before the first load
    pub source_url: String,
}

impl PlayerState {
    /// Initial state for a freshly mounted player
    pub fn new(auto_play: bool, muted: bool, volume: f64) -> Self {
        Self {
            playing: auto_play,
            muted,
            volume: clamp_volume(volume),
            duration: 0.0,
            current_time: 0.0,
            fullscreen: false,
            ready: false,
            error: None,
            source_url: String::new(),
        }
    }

    /// Reset the per-source fields for a new source
    pub(crate) fn reset_for_source(&mut self, url: &str) {
        self.ready = false;
        self.error = None;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.source_url = url.to_string();
    }

    /// Whether `source` names the currently loaded stream
    pub fn is_current_source(&self, source: &str) -> bool {
        !self.source_url.is_empty() && self.source_url == source
    }

    /// Clamp a position to the known duration
    pub fn clamp_position(&self, position: f64) -> f64 {
        if self.duration > 0.0 {
            position.clamp(0.0, self.duration)
        } else {
            position.max(0.0)
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(true, true, 0.8)
    }
}

/// Clamp a volume level to [0, 1]
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
