//! Thread-safe wrapper for environments that deliver callbacks from
//! several threads
//!
//! All access to one instance is serialized through an instance-scoped
//! mutex, and every state change is broadcast on a watch channel.

use crate::{
    controller::PlaybackStateController,
    engine::{DisplaySurface, EventOutcome, PlaybackEngine, PlayerEvent},
    types::PlayerState,
    Result,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Shared handle to one controller
pub struct SharedController<E, D> {
    /// Serialized controller
    inner: Arc<Mutex<PlaybackStateController<E, D>>>,
    /// State change broadcaster
    state_tx: Arc<watch::Sender<PlayerState>>,
}

impl<E, D> Clone for SharedController<E, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            state_tx: Arc::clone(&self.state_tx),
        }
    }
}

impl<E, D> SharedController<E, D>
where
    E: PlaybackEngine + Send + 'static,
    D: DisplaySurface + Send + 'static,
{
    pub fn new(controller: PlaybackStateController<E, D>) -> Self {
        let (state_tx, _) = watch::channel(controller.state().clone());
        Self {
            inner: Arc::new(Mutex::new(controller)),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> PlayerState {
        self.inner.lock().await.state().clone()
    }

    /// Run `f` with exclusive access, then publish the resulting state
    pub async fn with<R>(&self, f: impl FnOnce(&mut PlaybackStateController<E, D>) -> R) -> R {
        let mut controller = self.inner.lock().await;
        let result = f(&mut *controller);

        let state = controller.state();
        self.state_tx.send_if_modified(|current| {
            if *current != *state {
                *current = state.clone();
                true
            } else {
                false
            }
        });

        result
    }

    pub async fn load_source(&self, url: &str) -> Result<()> {
        self.with(|c| c.load_source(url)).await
    }

    pub async fn toggle_play(&self) {
        self.with(|c| c.toggle_play()).await
    }

    pub async fn toggle_mute(&self) {
        self.with(|c| c.toggle_mute()).await
    }

    pub async fn set_volume(&self, volume: f64) -> Result<()> {
        self.with(|c| c.set_volume(volume)).await
    }

    pub async fn seek(&self, position: f64) -> Result<()> {
        self.with(|c| c.seek(position)).await
    }

    pub async fn reload(&self) -> Result<()> {
        self.with(|c| c.reload()).await
    }

    pub async fn request_fullscreen(&self) -> Result<()> {
        self.with(|c| c.request_fullscreen()).await
    }

    pub async fn exit_fullscreen(&self) -> Result<()> {
        self.with(|c| c.exit_fullscreen()).await
    }

    pub async fn toggle_fullscreen(&self) -> Result<()> {
        self.with(|c| c.toggle_fullscreen()).await
    }

    /// Apply one inbound event
    pub async fn handle(&self, event: PlayerEvent) -> EventOutcome {
        self.with(|c| c.handle(event)).await
    }

    /// Apply events from `events` in delivery order until the sender side
    /// is dropped
    pub fn spawn_event_pump(&self, mut events: mpsc::UnboundedReceiver<PlayerEvent>) -> JoinHandle<()> {
        let shared = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if shared.handle(event).await == EventOutcome::Stale {
                    debug!("Event pump skipped a stale event");
                }
            }
            debug!("Event channel closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::PlayerConfig,
        engine::{EngineEvent, RecordingEngine, RecordingSurface, SurfaceRequest},
    };

    fn shared() -> SharedController<RecordingEngine, RecordingSurface> {
        SharedController::new(PlaybackStateController::new(
            &PlayerConfig::default(),
            RecordingEngine::new(),
            RecordingSurface::new(),
        ))
    }

    #[tokio::test]
    async fn test_broadcasts_state_changes() {
        let shared = shared();
        let mut rx = shared.subscribe();

        shared.load_source("a.m3u8").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().source_url, "a.m3u8");

        // Stale event leaves state untouched, nothing is published
        shared
            .handle(EngineEvent::Ready { source: "old.m3u8".into() }.into())
            .await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_intent_wrappers_publish_state() {
        let shared = shared();
        shared.load_source("a.m3u8").await.unwrap();
        let mut rx = shared.subscribe();

        shared.set_volume(0.0).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().muted);

        shared.toggle_mute().await;
        assert!(!rx.borrow_and_update().muted);

        shared.request_fullscreen().await.unwrap();
        shared.toggle_fullscreen().await.unwrap();
        shared.exit_fullscreen().await.unwrap();
        // Fullscreen requests never write state
        assert!(!rx.has_changed().unwrap());

        let requests = shared.with(|c| c.surface().requests().to_vec()).await;
        assert_eq!(
            requests,
            vec![SurfaceRequest::Enter, SurfaceRequest::Enter, SurfaceRequest::Exit]
        );
    }

    #[tokio::test]
    async fn test_event_pump_applies_in_order() {
        let shared = shared();
        shared.load_source("a.m3u8").await.unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        let pump = shared.spawn_event_pump(rx);

        tx.send(EngineEvent::Ready { source: "a.m3u8".into() }.into()).unwrap();
        tx.send(
            EngineEvent::TimeUpdate {
                source: "a.m3u8".into(),
                current: 5.0,
                duration: 120.0,
            }
            .into(),
        )
        .unwrap();
        tx.send(PlayerEvent::FullscreenChanged(true)).unwrap();
        drop(tx);
        pump.await.unwrap();

        let state = shared.state().await;
        assert!(state.ready);
        assert_eq!(state.current_time, 5.0);
        assert_eq!(state.duration, 120.0);
        assert!(state.fullscreen);
    }
}
