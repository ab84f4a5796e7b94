//! Session script directives
//!
//! One directive per line. Blank lines and lines starting with `#` are
//! skipped. Engine events apply to the current source unless the line is
//! prefixed with `@<url>`.

use anyhow::{anyhow, bail, Context};

/// Inbound notification injected by the script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    Ready,
    Started,
    Error(String),
    Time { current: f64, duration: f64 },
    FullscreenChanged(bool),
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    // User intents
    Load(String),
    Play,
    Mute,
    Volume(f64),
    Seek(f64),
    Reload,
    Fullscreen,
    ExitFullscreen,
    ToggleFullscreen,

    // Engine / environment events, optionally for another source
    Event {
        source: Option<String>,
        event: ScriptEvent,
    },

    // Session control
    State,
    Quit,
}

fn number(arg: Option<&str>, what: &str) -> anyhow::Result<f64> {
    let arg = arg.ok_or_else(|| anyhow!("missing {}", what))?;
    arg.parse::<f64>()
        .with_context(|| format!("invalid {} '{}'", what, arg))
}

/// Parse one line, `None` for blank lines and comments
pub fn parse_line(line: &str) -> anyhow::Result<Option<Directive>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (source, rest) = match line.strip_prefix('@') {
        Some(tagged) => {
            let (source, rest) = tagged
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("'@{}' has no event after the source", tagged))?;
            (Some(source.to_string()), rest.trim())
        }
        None => (None, line),
    };

    let (word, arg) = match rest.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, Some(arg.trim())),
        None => (rest, None),
    };

    let event = match word.to_lowercase().as_str() {
        "ready" => Some(ScriptEvent::Ready),
        "started" => Some(ScriptEvent::Started),
        "error" => Some(ScriptEvent::Error(
            arg.filter(|m| !m.is_empty()).unwrap_or("playback error").to_string(),
        )),
        "time" => {
            let mut parts = arg.unwrap_or_default().split_whitespace();
            let current = number(parts.next(), "current time")?;
            let duration = number(parts.next(), "duration")?;
            Some(ScriptEvent::Time { current, duration })
        }
        "fs-changed" => match arg {
            Some("on") | Some("true") => Some(ScriptEvent::FullscreenChanged(true)),
            Some("off") | Some("false") => Some(ScriptEvent::FullscreenChanged(false)),
            other => bail!("fs-changed expects on|off, got {:?}", other.unwrap_or_default()),
        },
        _ => None,
    };

    if let Some(event) = event {
        return Ok(Some(Directive::Event { source, event }));
    }
    if source.is_some() {
        bail!("only engine events can be tagged with a source");
    }

    let directive = match word.to_lowercase().as_str() {
        "load" => Directive::Load(
            arg.filter(|url| !url.is_empty())
                .ok_or_else(|| anyhow!("load expects a URL"))?
                .to_string(),
        ),
        "play" | "pause" => Directive::Play,
        "mute" | "unmute" => Directive::Mute,
        "volume" => Directive::Volume(number(arg, "volume")?),
        "seek" => Directive::Seek(number(arg, "position")?),
        "reload" => Directive::Reload,
        "fullscreen" => Directive::Fullscreen,
        "exit-fullscreen" => Directive::ExitFullscreen,
        "toggle-fullscreen" => Directive::ToggleFullscreen,
        "state" => Directive::State,
        "quit" | "exit" => Directive::Quit,
        other => bail!("unknown directive '{}'", other),
    };

    Ok(Some(directive))
}
