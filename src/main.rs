//! HLS manifest tool
//!
//! Parses an M3U8 manifest, optionally rewrites the segment URIs inside its
//! first ad break, and prints the re-encoded manifest, an ad-break report,
//! or the parse totals.

use serde::Serialize;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hls_manifest::config::{LogFormat, LoggingConfig, OutputMode, ToolConfig};
use hls_manifest::{Playlist, PlaylistError, PlaylistTotals, Result};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "hls-manifest";

/// Config file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "hls-manifest.toml";

/// Output of `mode = "summary"`
#[derive(Debug, Serialize)]
struct Summary<'a> {
    elements: usize,
    segments: usize,
    variants: usize,
    breaks: usize,
    totals: &'a PlaylistTotals,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(manifest_path) = args.next() else {
        eprintln!("usage: {} <manifest.m3u8> [config.toml]", APP_NAME);
        return Err(PlaylistError::Config("missing manifest path".to_string()));
    };
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration before logging is up; report problems afterwards.
    let (config, config_error) = if Path::new(&config_path).exists() {
        match ToolConfig::from_file(&config_path) {
            Ok(config) => (config, None),
            Err(e) => (ToolConfig::default(), Some(e)),
        }
    } else {
        (ToolConfig::default(), None)
    };

    init_logging(&config.logging);
    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = config_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    let mut playlist = Playlist::parse_file(&manifest_path)?;
    tracing::info!(
        "Parsed {}: {} elements, {} segments, {} ad breaks",
        manifest_path,
        playlist.len(),
        playlist.segments().len(),
        playlist.breaks().len()
    );

    if let Some(prefix) = &config.output.break_uri_prefix {
        match playlist.replace_breaks_uri(|uri| format!("{}{}", prefix, uri)) {
            Ok(()) => tracing::info!("Rewrote ad break segment URIs with prefix {}", prefix),
            Err(e) => tracing::warn!("Not rewriting ad break segment URIs: {}", e),
        }
    }

    let output = match config.output.mode {
        OutputMode::Manifest => playlist.encode()?,
        OutputMode::Breaks => serde_json::to_string_pretty(&playlist.break_reports())? + "\n",
        OutputMode::Summary => {
            let summary = Summary {
                elements: playlist.len(),
                segments: playlist.segments().len(),
                variants: playlist.variants().len(),
                breaks: playlist.breaks().len(),
                totals: playlist.totals(),
            };
            serde_json::to_string_pretty(&summary)? + "\n"
        }
    };
    print!("{}", output);

    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so stdout carries
/// only the tool's output.
fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hls_manifest={}", config.level).into());

    let (pretty, json) = match config.format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_summary_serializes_totals() {
        let playlist: Playlist = "#EXT-X-MEDIA-SEQUENCE:3\n#EXTINF:2,\na.ts".parse().unwrap();
        let summary = Summary {
            elements: playlist.len(),
            segments: playlist.segments().len(),
            variants: 0,
            breaks: 0,
            totals: playlist.totals(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["segments"], 1);
        assert_eq!(json["totals"]["media_sequence"], 3);
        assert_eq!(json["totals"]["dvr"], 2.0);
    }
}
