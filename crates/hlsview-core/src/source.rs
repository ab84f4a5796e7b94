//! Stream source checking
//!
//! Stream addresses are opaque to the controller; this module only decides
//! whether an input is acceptable and labels it for display.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Stream type inferred from the address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    Hls,
    Dash,
    Unknown,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Hls => write!(f, "HLS"),
            StreamKind::Dash => write!(f, "DASH"),
            StreamKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where a source points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A fully qualified URL
    Absolute(Url),
    /// Anything else non-empty, passed to the engine as-is
    Relative,
}

/// A checked stream address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSource {
    address: String,
    location: SourceLocation,
}

impl StreamSource {
    /// Check user input. Surrounding whitespace is dropped and an empty
    /// address is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let address = input.trim();
        if address.is_empty() {
            return Err(Error::invalid_input("stream URL is empty"));
        }

        let location = match Url::parse(address) {
            Ok(url) => SourceLocation::Absolute(url),
            Err(_) => SourceLocation::Relative,
        };

        Ok(Self {
            address: address.to_string(),
            location,
        })
    }

    /// The address handed to the engine
    pub fn as_str(&self) -> &str {
        &self.address
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self.location, SourceLocation::Absolute(_))
    }

    /// Detect the stream type from the path extension
    pub fn kind(&self) -> StreamKind {
        let path = match &self.location {
            SourceLocation::Absolute(url) => url.path().to_lowercase(),
            SourceLocation::Relative => self
                .address
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_lowercase(),
        };

        if path.ends_with(".m3u8") || path.ends_with(".m3u") {
            StreamKind::Hls
        } else if path.ends_with(".mpd") {
            StreamKind::Dash
        } else {
            StreamKind::Unknown
        }
    }
}

impl std::fmt::Display for StreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.address)
    }
}

/// A named example stream offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetStream {
    pub name: &'static str,
    pub url: &'static str,
}

/// Big Buck Bunny test stream, the default source
pub const DEFAULT_STREAM_URL: &str = "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8";

/// Example streams offered next to the URL input
pub const PRESET_STREAMS: &[PresetStream] = &[
    PresetStream {
        name: "Big Buck Bunny (test stream)",
        url: DEFAULT_STREAM_URL,
    },
    PresetStream {
        name: "Apple example stream",
        url: "https://devstreaming-cdn.apple.com/videos/streaming/examples/img_bipbop_adv_example_fmp4/master.m3u8",
    },
];
