//! Seams to the playback engine and the display environment
//!
//! Both are opaque capabilities: commands go out fire-and-forget and results
//! come back later as [`PlayerEvent`]s delivered to the controller.

use serde::{Deserialize, Serialize};

/// Command surface of the external playback engine
pub trait PlaybackEngine {
    /// Start loading a stream address
    fn load(&mut self, url: &str);

    /// Start or resume decoding
    fn play(&mut self);

    /// Pause decoding
    fn pause(&mut self);

    /// Move the playhead
    fn seek_to(&mut self, seconds: f64);

    /// Set output volume in [0, 1]
    fn set_volume(&mut self, volume: f64);

    /// Mute or unmute output
    fn set_muted(&mut self, muted: bool);
}

/// Fullscreen capability of the display environment
///
/// A successful return only means the request was accepted. The actual
/// status arrives later as [`PlayerEvent::FullscreenChanged`].
pub trait DisplaySurface {
    /// Ask the environment to enter fullscreen
    fn request_fullscreen(&mut self) -> std::result::Result<(), String>;

    /// Ask the environment to leave fullscreen
    fn exit_fullscreen(&mut self) -> std::result::Result<(), String>;
}

/// Event emitted by the engine, tagged with the source it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    /// Source loaded and playable
    Ready { source: String },
    /// First frame rendered
    Started { source: String },
    /// Load or playback failure
    Error { source: String, message: String },
    /// Periodic position report
    TimeUpdate {
        source: String,
        current: f64,
        duration: f64,
    },
}

impl EngineEvent {
    /// Source this event refers to
    pub fn source(&self) -> &str {
        match self {
            EngineEvent::Ready { source }
            | EngineEvent::Started { source }
            | EngineEvent::Error { source, .. }
            | EngineEvent::TimeUpdate { source, .. } => source,
        }
    }
}

/// Any inbound notification a controller reconciles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    Engine(EngineEvent),
    FullscreenChanged(bool),
}

impl From<EngineEvent> for PlayerEvent {
    fn from(event: EngineEvent) -> Self {
        PlayerEvent::Engine(event)
    }
}

/// Result of reconciling an inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event updated state
    Applied,
    /// The event referred to a source that is no longer current
    Stale,
}

/// Command issued to a [`PlaybackEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineCommand {
    Load(String),
    Play,
    Pause,
    SeekTo(f64),
    SetVolume(f64),
    SetMuted(bool),
}

impl std::fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineCommand::Load(url) => write!(f, "load {}", url),
            EngineCommand::Play => write!(f, "play"),
            EngineCommand::Pause => write!(f, "pause"),
            EngineCommand::SeekTo(t) => write!(f, "seek {:.2}", t),
            EngineCommand::SetVolume(v) => write!(f, "volume {:.2}", v),
            EngineCommand::SetMuted(m) => write!(f, "muted {}", m),
        }
    }
}

/// Engine that records every command it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    commands: Vec<EngineCommand>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take_commands(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl PlaybackEngine for RecordingEngine {
    fn load(&mut self, url: &str) {
        self.commands.push(EngineCommand::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.commands.push(EngineCommand::Play);
    }

    fn pause(&mut self) {
        self.commands.push(EngineCommand::Pause);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.commands.push(EngineCommand::SeekTo(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.commands.push(EngineCommand::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.commands.push(EngineCommand::SetMuted(muted));
    }
}

/// Fullscreen request issued to a [`DisplaySurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceRequest {
    Enter,
    Exit,
}

/// Display surface that records requests and optionally rejects them
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    requests: Vec<SurfaceRequest>,
    rejection: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface that rejects every request with `reason`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            requests: Vec::new(),
            rejection: Some(reason.into()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> &[SurfaceRequest] {
        &self.requests
    }

    fn record(&mut self, request: SurfaceRequest) -> std::result::Result<(), String> {
        self.requests.push(request);
        match &self.rejection {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

impl DisplaySurface for RecordingSurface {
    fn request_fullscreen(&mut self) -> std::result::Result<(), String> {
        self.record(SurfaceRequest::Enter)
    }

    fn exit_fullscreen(&mut self) -> std::result::Result<(), String> {
        self.record(SurfaceRequest::Exit)
    }
}
