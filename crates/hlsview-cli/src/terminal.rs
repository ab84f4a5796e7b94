//! Engine and display surface that report to the terminal
//!
//! Nothing is decoded: commands are printed so a scripted session shows
//! exactly what a real engine would have been asked to do.

use console::style;
use hlsview_core::{DisplaySurface, EngineCommand, PlaybackEngine, SurfaceRequest};
use tracing::debug;

/// Engine that prints every command it receives
#[derive(Debug, Default)]
pub struct TerminalEngine {
    issued: usize,
}

impl TerminalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands issued so far
    pub fn issued(&self) -> usize {
        self.issued
    }

    fn report(&mut self, command: EngineCommand) {
        self.issued += 1;
        debug!(command = %command, "Engine command");
        println!("  {} {}", style("engine ←").cyan(), command);
    }
}

impl PlaybackEngine for TerminalEngine {
    fn load(&mut self, url: &str) {
        self.report(EngineCommand::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.report(EngineCommand::Play);
    }

    fn pause(&mut self) {
        self.report(EngineCommand::Pause);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.report(EngineCommand::SeekTo(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.report(EngineCommand::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.report(EngineCommand::SetMuted(muted));
    }
}

/// Display surface that accepts every request and prints it
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    fn report(&self, request: SurfaceRequest) {
        let action = match request {
            SurfaceRequest::Enter => "enter fullscreen",
            SurfaceRequest::Exit => "exit fullscreen",
        };
        println!(
            "  {} {} (confirm with `fs-changed on|off`)",
            style("display ←").magenta(),
            action
        );
    }
}

impl DisplaySurface for TerminalSurface {
    fn request_fullscreen(&mut self) -> Result<(), String> {
        self.report(SurfaceRequest::Enter);
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), String> {
        self.report(SurfaceRequest::Exit);
        Ok(())
    }
}
