//! Parse driver
//!
//! Reads a manifest line by line, classifies each line by its prefix (the
//! text up to the first `:` or whitespace) and dispatches it to the tag
//! table. Non-tag lines complete a pending segment or variant, or are kept
//! as comments.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::error::{PlaylistError, Result};
use crate::playlist::Playlist;
use crate::state::{ParseState, Phase};
use crate::tags::{others, tag_table, TagTable};

/// Prefixes reserved for tags. Unregistered lines starting with one of these
/// are kept as unsupported tags rather than comments.
const RESERVED_PREFIXES: &[&str] = &["#EXT", "#ext", "#USP"];

/// Classification key of a trimmed line.
pub fn extract_prefix(line: &str) -> &str {
    match line.find(|c: char| c == ':' || c.is_whitespace()) {
        Some(end) => &line[..end],
        None => line,
    }
}

fn is_reserved(line: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Parse a manifest from `reader` using `table`.
///
/// Fails on the first malformed line; no partial playlist is returned.
pub fn parse_with<R: Read>(reader: R, table: &TagTable) -> Result<Playlist> {
    let reader = BufReader::new(reader);
    let mut playlist = Playlist::new();
    let mut state = ParseState::new();

    for line in reader.lines() {
        let line = line?;
        parse_line(line.trim(), table, &mut playlist, &mut state)?;
    }

    if let Some(element) = state.take_pending() {
        tracing::debug!("Input ended before URI of pending {:?}, discarding it", element.kind);
    }

    let totals = state.into_totals();
    tracing::debug!(
        "Parsed playlist: {} elements, media_sequence={}, segments={}, dvr={}s",
        playlist.len(),
        totals.media_sequence,
        totals.segments_counter,
        totals.dvr
    );
    playlist.set_totals(totals);
    Ok(playlist)
}

fn parse_line(line: &str, table: &TagTable, playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    if line.is_empty() {
        return Ok(());
    }

    if line.starts_with('#') {
        if let Some(element) = state.take_pending() {
            tracing::warn!("Discarding {} without URI, next line is {:?}", element.kind, line);
        }

        let keyword = extract_prefix(line);
        if let Some(rule) = table.parse_rule(keyword) {
            return rule(line, playlist, state);
        }

        if is_reserved(line) {
            tracing::warn!("Unsupported tag {}, keeping it verbatim", keyword);
            playlist.append(others::unsupported(line));
        } else {
            playlist.append(others::comment(line));
        }
        return Ok(());
    }

    match state.phase() {
        Phase::Idle => {
            playlist.append(others::comment(line));
        }
        Phase::AwaitingSegmentUri | Phase::AwaitingVariantUri => {
            if let Some(mut element) = state.take_pending() {
                element.uri = Some(line.to_string());
                playlist.append(element);
            }
        }
    }
    Ok(())
}

impl Playlist {
    /// Parse a manifest from any byte source with the standard tag table.
    pub fn parse_reader<R: Read>(reader: R) -> Result<Self> {
        parse_with(reader, tag_table())
    }

    /// Parse a manifest file. The file is closed on every exit path.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Parsing manifest {}", path.display());
        let file = File::open(path)?;
        Self::parse_reader(file)
    }

    pub fn parse_str(text: &str) -> Result<Self> {
        Self::parse_reader(text.as_bytes())
    }
}

impl FromStr for Playlist {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}
