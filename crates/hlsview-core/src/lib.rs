//! hlsview Core - playback state controller for an HLS player UI
//!
//! This crate owns the user-facing playback state of a player whose media
//! work is done by an external engine:
//! - Player state record and phase state machine
//! - Intent handling (play/pause, mute, volume, seek, reload, fullscreen)
//! - Reconciliation of engine and environment events, with a stale-source guard
//! - Stream source checking and preset streams
//! - Control bar view model and light/dark theme palettes
//!
//! # Architecture
//!
//! ```text
//!   user intents                           engine / environment events
//!        │                                              │
//!        ▼                                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  PlaybackStateController                     │
//! │   PlayerState ─── PlaybackPhase ─── stale-source guard       │
//! └──────┬───────────────────────────────────────┬───────────────┘
//!        │ load/play/pause/seek/volume           │ fullscreen requests
//!        ▼                                       ▼
//! ┌──────────────┐                        ┌──────────────┐
//! │PlaybackEngine│                        │DisplaySurface│
//! └──────────────┘                        └──────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod shared;
pub mod source;
pub mod theme;
pub mod types;
pub mod view;

pub use config::PlayerConfig;
pub use controller::PlaybackStateController;
pub use engine::{
    DisplaySurface, EngineCommand, EngineEvent, EventOutcome, PlaybackEngine, PlayerEvent,
    RecordingEngine, RecordingSurface, SurfaceRequest,
};
pub use error::{Error, Result};
pub use shared::SharedController;
pub use source::{PresetStream, SourceLocation, StreamKind, StreamSource, PRESET_STREAMS};
pub use theme::{Palette, Theme};
pub use types::*;
pub use view::{format_time, ControlsView, Overlay};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library startup
pub fn init() {
    tracing::info!(version = VERSION, "hlsview core initialized");
}
