//! Playback state controller - single writer of [`PlayerState`]
//!
//! Translates user intents into engine commands and reconciles engine and
//! environment events back into state:
//! - Intents: load, play/pause, mute, volume, seek, reload, fullscreen
//! - Reconciliation: ready, started, error, time update, fullscreen change
//! - Stale-result guard: events for a replaced source are discarded

use crate::{
    config::PlayerConfig,
    engine::{DisplaySurface, EngineEvent, EventOutcome, PlaybackEngine, PlayerEvent},
    source::StreamSource,
    types::{clamp_volume, PlaybackPhase, PlayerId, PlayerState},
    Error, Result,
};
use tracing::{debug, info, instrument, warn};

/// Controller owning the state of one mounted player
pub struct PlaybackStateController<E, D> {
    /// Instance ID used in logs
    id: PlayerId,
    /// User-facing state record
    state: PlayerState,
    /// Current phase of the state machine
    phase: PlaybackPhase,
    /// External playback engine
    engine: E,
    /// Display environment for fullscreen requests
    surface: D,
}

impl<E: PlaybackEngine, D: DisplaySurface> PlaybackStateController<E, D> {
    /// Create an idle controller
    pub fn new(config: &PlayerConfig, engine: E, surface: D) -> Self {
        Self {
            id: PlayerId::new(),
            state: PlayerState::new(config.auto_play, config.start_muted, config.initial_volume),
            phase: PlaybackPhase::Idle,
            engine,
            surface,
        }
    }

    /// Create a controller and immediately load `url`
    pub fn mount(config: &PlayerConfig, url: &str, engine: E, surface: D) -> Result<Self> {
        let mut controller = Self::new(config, engine, surface);
        controller.load_source(url)?;
        Ok(controller)
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Read access for rendering
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Tear down the instance, returning its collaborators
    pub fn unmount(self) -> (E, D) {
        info!(player_id = %self.id, "Player unmounted");
        (self.engine, self.surface)
    }

    fn transition(&mut self, next: PlaybackPhase) {
        let current = self.phase;
        if current == next {
            return;
        }
        if !current.can_transition_to(next) {
            warn!(from = %current, to = %next, "Ignoring invalid phase transition");
            return;
        }
        self.phase = next;
        info!(player_id = %self.id, from = %current, to = %next, "Phase transition");
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Load a new source, abandoning the previous one
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn load_source(&mut self, url: &str) -> Result<()> {
        let source = StreamSource::parse(url)?;

        info!(url = %source, kind = %source.kind(), "Loading source");

        self.state.reset_for_source(source.as_str());
        self.transition(PlaybackPhase::Loading);
        self.engine.load(source.as_str());

        Ok(())
    }

    /// Flip the playback intent
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn toggle_play(&mut self) {
        match self.phase {
            PlaybackPhase::Errored => {
                warn!("Cannot play while errored, reload first");
            }
            PlaybackPhase::Idle | PlaybackPhase::Loading => {
                // Applied when the engine reports ready
                self.state.playing = !self.state.playing;
                debug!(playing = self.state.playing, "Playback intent changed before ready");
            }
            PlaybackPhase::Ready | PlaybackPhase::Playing | PlaybackPhase::Paused => {
                self.state.playing = !self.state.playing;
                if self.state.playing {
                    self.engine.play();
                    self.transition(PlaybackPhase::Playing);
                } else {
                    self.engine.pause();
                    self.transition(PlaybackPhase::Paused);
                }
            }
        }
    }

    /// Flip the mute intent. Volume is left as it is.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.engine.set_muted(self.state.muted);
        debug!(muted = self.state.muted, "Mute toggled");
    }

    /// Set the volume, clamped to [0, 1]. Zero mutes, anything above unmutes.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        if volume.is_nan() {
            return Err(Error::invalid_input("volume is not a number"));
        }

        let volume = clamp_volume(volume);
        self.state.volume = volume;
        self.state.muted = volume == 0.0;

        self.engine.set_volume(volume);
        self.engine.set_muted(self.state.muted);

        debug!(volume, muted = self.state.muted, "Volume set");
        Ok(())
    }

    /// Move the playhead. The position is provisional until the next time
    /// update from the engine.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn seek(&mut self, position: f64) -> Result<()> {
        if !position.is_finite() {
            return Err(Error::invalid_input("seek position is not a finite number"));
        }

        let clamped = self.state.clamp_position(position);
        info!(from = self.state.current_time, to = clamped, "Seeking");

        self.state.current_time = clamped;
        if self.phase != PlaybackPhase::Idle {
            self.engine.seek_to(clamped);
        }

        Ok(())
    }

    /// Load the current source again, clearing any error
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn reload(&mut self) -> Result<()> {
        if self.state.source_url.is_empty() {
            return Err(Error::NoSource);
        }

        info!(url = %self.state.source_url, "Reloading source");

        self.state.error = None;
        let url = self.state.source_url.clone();
        self.load_source(&url)
    }

    /// Ask the environment for fullscreen. State changes only when the
    /// environment reports it.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn request_fullscreen(&mut self) -> Result<()> {
        self.surface.request_fullscreen().map_err(|reason| {
            warn!(reason = %reason, "Fullscreen request rejected");
            Error::Fullscreen(reason)
        })
    }

    /// Ask the environment to leave fullscreen
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn exit_fullscreen(&mut self) -> Result<()> {
        self.surface.exit_fullscreen().map_err(|reason| {
            warn!(reason = %reason, "Fullscreen exit rejected");
            Error::Fullscreen(reason)
        })
    }

    /// Request the opposite of the last reported fullscreen status
    pub fn toggle_fullscreen(&mut self) -> Result<()> {
        if self.state.fullscreen {
            self.exit_fullscreen()
        } else {
            self.request_fullscreen()
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Apply any inbound event
    pub fn handle(&mut self, event: PlayerEvent) -> EventOutcome {
        match event {
            PlayerEvent::Engine(EngineEvent::Ready { source }) => self.on_ready(&source),
            PlayerEvent::Engine(EngineEvent::Started { source }) => self.on_started(&source),
            PlayerEvent::Engine(EngineEvent::Error { source, message }) => {
                self.on_error(&source, &message)
            }
            PlayerEvent::Engine(EngineEvent::TimeUpdate {
                source,
                current,
                duration,
            }) => self.on_time_update(&source, current, duration),
            PlayerEvent::FullscreenChanged(is_fullscreen) => {
                self.on_fullscreen_changed(is_fullscreen)
            }
        }
    }

    fn is_stale(&self, source: &str, event: &'static str) -> bool {
        if self.state.is_current_source(source) {
            return false;
        }
        debug!(
            player_id = %self.id,
            event,
            source,
            current = %self.state.source_url,
            "Discarding stale engine event"
        );
        true
    }

    /// Engine confirmed `source` is loaded and playable
    pub fn on_ready(&mut self, source: &str) -> EventOutcome {
        if self.is_stale(source, "ready") {
            return EventOutcome::Stale;
        }

        info!(player_id = %self.id, url = source, "Source ready");
        self.state.ready = true;
        self.state.error = None;

        if !self.phase.is_loaded() {
            // Intents made while loading take effect now
            self.engine.set_volume(self.state.volume);
            self.engine.set_muted(self.state.muted);

            if self.state.playing {
                self.engine.play();
                self.transition(PlaybackPhase::Playing);
            } else {
                self.transition(PlaybackPhase::Ready);
            }
        }

        EventOutcome::Applied
    }

    /// Engine rendered the first frame of `source`
    pub fn on_started(&mut self, source: &str) -> EventOutcome {
        if self.is_stale(source, "started") {
            return EventOutcome::Stale;
        }

        if self.state.error.is_none() && !self.state.ready {
            return self.on_ready(source);
        }

        EventOutcome::Applied
    }

    /// Engine failed to load or play `source`
    pub fn on_error(&mut self, source: &str, message: &str) -> EventOutcome {
        if self.is_stale(source, "error") {
            return EventOutcome::Stale;
        }

        warn!(player_id = %self.id, url = source, error = message, "Playback error");
        self.state.error = Some(message.to_string());
        self.state.playing = false;
        self.state.ready = false;
        self.transition(PlaybackPhase::Errored);

        EventOutcome::Applied
    }

    /// Engine reported position and duration for `source`
    pub fn on_time_update(&mut self, source: &str, current: f64, duration: f64) -> EventOutcome {
        if self.is_stale(source, "time_update") {
            return EventOutcome::Stale;
        }

        // Live streams report an infinite duration
        self.state.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };

        if current.is_finite() {
            self.state.current_time = self.state.clamp_position(current);
        } else {
            self.state.current_time = self.state.clamp_position(self.state.current_time);
        }

        EventOutcome::Applied
    }

    /// Environment reported the fullscreen status
    pub fn on_fullscreen_changed(&mut self, is_fullscreen: bool) -> EventOutcome {
        debug!(player_id = %self.id, fullscreen = is_fullscreen, "Fullscreen changed");
        self.state.fullscreen = is_fullscreen;
        EventOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCommand, RecordingEngine, RecordingSurface, SurfaceRequest};

    type TestController = PlaybackStateController<RecordingEngine, RecordingSurface>;

    fn controller() -> TestController {
        PlaybackStateController::new(
            &PlayerConfig::default(),
            RecordingEngine::new(),
            RecordingSurface::new(),
        )
    }

    fn ready_controller(url: &str) -> TestController {
        let mut controller = controller();
        controller.load_source(url).unwrap();
        controller.on_ready(url);
        controller.engine_mut().take_commands();
        controller
    }

    #[test]
    fn test_controller_creation() {
        let controller = controller();
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
        assert!(controller.state().playing);
        assert!(controller.state().muted);
        assert_eq!(controller.state().volume, 0.8);
    }

    #[test]
    fn test_load_source_resets_state() {
        let mut controller = ready_controller("a.m3u8");
        controller.on_time_update("a.m3u8", 30.0, 120.0);

        controller.load_source("b.m3u8").unwrap();

        let state = controller.state();
        assert_eq!(state.source_url, "b.m3u8");
        assert!(!state.ready);
        assert_eq!(state.error, None);
        assert_eq!(state.current_time, 0.0);
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
        assert_eq!(
            controller.engine().commands(),
            &[EngineCommand::Load("b.m3u8".into())]
        );
    }

    #[test]
    fn test_load_empty_url_rejected() {
        let mut controller = controller();
        let err = controller.load_source("  ").unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
        assert!(controller.engine().commands().is_empty());
    }

    #[test]
    fn test_ready_with_autoplay_starts_engine() {
        let mut controller = controller();
        controller.load_source("a.m3u8").unwrap();
        controller.engine_mut().take_commands();

        assert_eq!(controller.on_ready("a.m3u8"), EventOutcome::Applied);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
        assert_eq!(
            controller.engine().commands(),
            &[
                EngineCommand::SetVolume(0.8),
                EngineCommand::SetMuted(true),
                EngineCommand::Play,
            ]
        );
    }

    #[test]
    fn test_ready_without_autoplay() {
        let config = PlayerConfig {
            auto_play: false,
            ..Default::default()
        };
        let mut controller =
            PlaybackStateController::mount(&config, "a.m3u8", RecordingEngine::new(), RecordingSurface::new())
                .unwrap();

        controller.on_ready("a.m3u8");
        assert_eq!(controller.phase(), PlaybackPhase::Ready);
        assert!(!controller.engine().commands().contains(&EngineCommand::Play));

        controller.toggle_play();
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn test_toggle_play_pairs_commands() {
        let mut controller = ready_controller("a.m3u8");
        let before = controller.state().playing;

        controller.toggle_play();
        assert_eq!(controller.phase(), PlaybackPhase::Paused);
        controller.toggle_play();

        assert_eq!(controller.state().playing, before);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
        assert_eq!(
            controller.engine().commands(),
            &[EngineCommand::Pause, EngineCommand::Play]
        );
    }

    #[test]
    fn test_toggle_play_while_loading_sends_nothing() {
        let mut controller = controller();
        controller.load_source("a.m3u8").unwrap();
        controller.engine_mut().take_commands();

        controller.toggle_play();
        assert!(!controller.state().playing);
        assert!(controller.engine().commands().is_empty());

        controller.on_ready("a.m3u8");
        assert_eq!(controller.phase(), PlaybackPhase::Ready);
    }

    #[test]
    fn test_toggle_play_ignored_when_errored() {
        let mut controller = ready_controller("a.m3u8");
        controller.on_error("a.m3u8", "decode failure");

        controller.toggle_play();
        assert!(!controller.state().playing);
        assert_eq!(controller.phase(), PlaybackPhase::Errored);
    }

    #[test]
    fn test_toggle_mute_keeps_volume() {
        let mut controller = ready_controller("a.m3u8");
        controller.set_volume(0.4).unwrap();

        controller.toggle_mute();
        assert!(controller.state().muted);
        controller.toggle_mute();
        assert!(!controller.state().muted);
        assert_eq!(controller.state().volume, 0.4);
    }

    #[test]
    fn test_set_volume_clamps_and_mutes() {
        let mut controller = controller();

        controller.set_volume(1.7).unwrap();
        assert_eq!(controller.state().volume, 1.0);
        assert!(!controller.state().muted);

        controller.set_volume(-0.5).unwrap();
        assert_eq!(controller.state().volume, 0.0);
        assert!(controller.state().muted);

        assert!(controller.set_volume(f64::NAN).is_err());
        assert_eq!(controller.state().volume, 0.0);
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut controller = ready_controller("a.m3u8");
        controller.on_time_update("a.m3u8", 5.0, 120.0);

        controller.seek(500.0).unwrap();
        assert_eq!(controller.state().current_time, 120.0);

        controller.seek(-1.0).unwrap();
        assert_eq!(controller.state().current_time, 0.0);
        assert_eq!(
            controller.engine().commands(),
            &[EngineCommand::SeekTo(120.0), EngineCommand::SeekTo(0.0)]
        );
    }

    #[test]
    fn test_seek_unknown_duration() {
        let mut controller = ready_controller("live.m3u8");
        controller.seek(42.0).unwrap();
        assert_eq!(controller.state().current_time, 42.0);
    }

    #[test]
    fn test_seek_when_idle_skips_engine() {
        let mut controller = controller();
        controller.seek(10.0).unwrap();
        assert_eq!(controller.state().current_time, 10.0);
        assert!(controller.engine().commands().is_empty());
    }

    #[test]
    fn test_seek_rejects_non_finite_on_live_source() {
        let mut controller = ready_controller("live.m3u8");
        controller.seek(8.0).unwrap();

        for position in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = controller.seek(position).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }

        assert_eq!(controller.state().current_time, 8.0);
        assert_eq!(controller.engine().commands(), &[EngineCommand::SeekTo(8.0)]);

        let json = serde_json::to_string(controller.state()).unwrap();
        let restored: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.current_time, 8.0);
    }

    #[test]
    fn test_reload_requires_source() {
        let mut controller = controller();
        assert!(matches!(controller.reload(), Err(Error::NoSource)));
    }

    #[test]
    fn test_stale_ready_discarded() {
        let mut controller = controller();
        controller.load_source("u1.m3u8").unwrap();
        controller.load_source("u2.m3u8").unwrap();

        assert_eq!(controller.on_ready("u1.m3u8"), EventOutcome::Stale);
        assert!(!controller.state().ready);
        assert_eq!(controller.state().source_url, "u2.m3u8");
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn test_stale_error_discarded() {
        let mut controller = ready_controller("u2.m3u8");
        assert_eq!(controller.on_error("u1.m3u8", "404"), EventOutcome::Stale);
        assert_eq!(controller.state().error, None);
        assert!(controller.state().playing);
    }

    #[test]
    fn test_events_before_any_load_are_stale() {
        let mut controller = controller();
        assert_eq!(controller.on_ready(""), EventOutcome::Stale);
        assert_eq!(controller.on_error("", "boom"), EventOutcome::Stale);
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_started_marks_ready() {
        let mut controller = controller();
        controller.load_source("a.m3u8").unwrap();

        controller.on_started("a.m3u8");
        assert!(controller.state().ready);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn test_started_after_error_keeps_errored() {
        let mut controller = controller();
        controller.load_source("a.m3u8").unwrap();
        controller.on_error("a.m3u8", "decode failure");
        controller.engine_mut().take_commands();

        assert_eq!(controller.on_started("a.m3u8"), EventOutcome::Applied);
        assert!(!controller.state().ready);
        assert_eq!(controller.state().error.as_deref(), Some("decode failure"));
        assert_eq!(controller.phase(), PlaybackPhase::Errored);
        assert!(controller.engine().commands().is_empty());
    }

    #[test]
    fn test_stale_started_discarded() {
        let mut controller = controller();
        controller.load_source("u1.m3u8").unwrap();
        controller.load_source("u2.m3u8").unwrap();

        assert_eq!(controller.on_started("u1.m3u8"), EventOutcome::Stale);
        assert!(!controller.state().ready);
        assert_eq!(controller.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn test_time_update_live_duration() {
        let mut controller = ready_controller("live.m3u8");
        controller.on_time_update("live.m3u8", 12.5, f64::INFINITY);

        assert_eq!(controller.state().duration, 0.0);
        assert_eq!(controller.state().current_time, 12.5);
    }

    #[test]
    fn test_time_update_clamps_position() {
        let mut controller = ready_controller("a.m3u8");
        controller.on_time_update("a.m3u8", 130.0, 120.0);
        assert_eq!(controller.state().current_time, 120.0);
    }

    #[test]
    fn test_fullscreen_only_set_by_event() {
        let mut controller = ready_controller("a.m3u8");

        controller.request_fullscreen().unwrap();
        assert!(!controller.state().fullscreen);

        controller.on_fullscreen_changed(true);
        assert!(controller.state().fullscreen);

        controller.toggle_fullscreen().unwrap();
        assert!(controller.state().fullscreen);
        assert_eq!(
            controller.surface().requests(),
            &[SurfaceRequest::Enter, SurfaceRequest::Exit]
        );
    }

    #[test]
    fn test_fullscreen_rejection() {
        let mut controller = PlaybackStateController::new(
            &PlayerConfig::default(),
            RecordingEngine::new(),
            RecordingSurface::rejecting("permission denied"),
        );

        let err = controller.request_fullscreen().unwrap_err();
        assert!(matches!(err, Error::Fullscreen(_)));
        assert!(!controller.state().fullscreen);
    }

    #[test]
    fn test_handle_dispatches_events() {
        let mut controller = controller();
        controller.load_source("a.m3u8").unwrap();

        let outcome = controller.handle(PlayerEvent::Engine(EngineEvent::TimeUpdate {
            source: "a.m3u8".into(),
            current: 3.0,
            duration: 60.0,
        }));
        assert_eq!(outcome, EventOutcome::Applied);
        assert_eq!(controller.state().duration, 60.0);

        controller.handle(PlayerEvent::FullscreenChanged(true));
        assert!(controller.state().fullscreen);
    }
}
