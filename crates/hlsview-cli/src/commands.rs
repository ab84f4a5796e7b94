//! CLI command implementations

use crate::output::{format_state, to_json, OutputFormat};
use crate::script::{parse_line, Directive, ScriptEvent};
use crate::terminal::{TerminalEngine, TerminalSurface};
use console::style;
use hlsview_core::{
    EngineEvent, PlaybackStateController, PlayerConfig, PlayerEvent, SharedController,
    StreamSource, Theme, PRESET_STREAMS,
};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type Session = SharedController<TerminalEngine, TerminalSurface>;

#[derive(Tabled, Serialize)]
struct PresetRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "URL")]
    url: &'static str,
}

/// List the preset example streams
pub fn presets(format: OutputFormat) -> anyhow::Result<()> {
    let rows = PRESET_STREAMS
        .iter()
        .map(|preset| {
            let kind = StreamSource::parse(preset.url)
                .map(|source| source.kind().to_string())
                .unwrap_or_else(|e| e.to_string());
            PresetRow {
                name: preset.name,
                kind,
                url: preset.url,
            }
        })
        .collect::<Vec<_>>();

    match format {
        OutputFormat::Json => println!("{}", to_json(&rows)),
        OutputFormat::Text => println!("{}", Table::new(rows).with(Style::rounded())),
    }

    Ok(())
}

#[derive(Serialize)]
struct CheckReport {
    url: String,
    accepted: bool,
    absolute: bool,
    kind: Option<String>,
    error: Option<String>,
}

/// Check whether a stream URL would be accepted
pub fn check(url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let report = match StreamSource::parse(url) {
        Ok(source) => CheckReport {
            url: source.to_string(),
            accepted: true,
            absolute: source.is_absolute(),
            kind: Some(source.kind().to_string()),
            error: None,
        },
        Err(e) => CheckReport {
            url: url.to_string(),
            accepted: false,
            absolute: false,
            kind: None,
            error: Some(e.to_string()),
        },
    };

    match format {
        OutputFormat::Json => println!("{}", to_json(&report)),
        OutputFormat::Text => {
            if report.accepted {
                println!("{} {}", style("accepted").green(), report.url);
                println!(
                    "  Location: {}",
                    if report.absolute { "absolute URL" } else { "relative / opaque" }
                );
                println!("  Stream: {}", report.kind.as_deref().unwrap_or("unknown"));
            } else {
                println!(
                    "{} {}",
                    style("rejected").red(),
                    report.error.as_deref().unwrap_or_default()
                );
            }
        }
    }

    if !report.accepted {
        std::process::exit(1);
    }

    Ok(())
}

/// Print the CSS variables of a theme
pub fn theme(theme: Theme, format: OutputFormat) -> anyhow::Result<()> {
    let palette = theme.palette();
    match format {
        OutputFormat::Json => println!("{}", palette.to_json()),
        OutputFormat::Text => {
            println!("/* {} theme - toggle: {} */", theme, theme.toggle_label());
            println!("{}", palette.to_css());
        }
    }
    Ok(())
}

/// Run a player session driven by a script file or stdin
pub async fn session(
    config: PlayerConfig,
    url: Option<String>,
    script: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let url = url.unwrap_or_else(|| config.default_url.clone());

    let controller =
        PlaybackStateController::mount(&config, &url, TerminalEngine::new(), TerminalSurface)?;
    info!(player_id = %controller.id(), url = %url, "Session started");
    let session = SharedController::new(controller);

    print_state(&session, format).await;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &script {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;

        let directive = match parse_line(&line) {
            Ok(Some(directive)) => directive,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, "Skipping directive: {:#}", e);
                eprintln!("{} line {}: {:#}", style("skip").yellow(), line_no, e);
                continue;
            }
        };

        if script.is_some() {
            println!("{} {}", style(">").dim(), line.trim());
        }

        match directive {
            Directive::Quit => break,
            Directive::State => {}
            directive => {
                if let Err(e) = apply(&session, directive).await {
                    eprintln!("{} {}", style("error").red(), e);
                }
            }
        }

        print_state(&session, format).await;
    }

    let issued = session.with(|c| c.engine().issued()).await;
    info!(issued, "Session finished");

    Ok(())
}

async fn apply(session: &Session, directive: Directive) -> anyhow::Result<()> {
    match directive {
        Directive::Load(url) => session.load_source(&url).await?,
        Directive::Play => session.toggle_play().await,
        Directive::Mute => session.toggle_mute().await,
        Directive::Volume(v) => session.set_volume(v).await?,
        Directive::Seek(t) => session.seek(t).await?,
        Directive::Reload => session.reload().await?,
        Directive::Fullscreen => session.request_fullscreen().await?,
        Directive::ExitFullscreen => session.exit_fullscreen().await?,
        Directive::ToggleFullscreen => session.toggle_fullscreen().await?,
        Directive::Event { source, event } => {
            let source = match source {
                Some(source) => source,
                None => session.state().await.source_url,
            };
            let event: PlayerEvent = match event {
                ScriptEvent::Ready => EngineEvent::Ready { source }.into(),
                ScriptEvent::Started => EngineEvent::Started { source }.into(),
                ScriptEvent::Error(message) => EngineEvent::Error { source, message }.into(),
                ScriptEvent::Time { current, duration } => EngineEvent::TimeUpdate {
                    source,
                    current,
                    duration,
                }
                .into(),
                ScriptEvent::FullscreenChanged(on) => PlayerEvent::FullscreenChanged(on),
            };
            let outcome = session.handle(event).await;
            println!("  {} {:?}", style("event →").blue(), outcome);
        }
        Directive::State | Directive::Quit => {}
    }
    Ok(())
}

async fn print_state(session: &Session, format: OutputFormat) {
    let (phase, state) = session.with(|c| (c.phase(), c.state().clone())).await;
    println!("{}", format_state(phase, &state, format));
}
