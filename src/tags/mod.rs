//! Tag descriptor table
//!
//! Maps tag keywords to parse rules and element kinds to encode rules. The
//! two key spaces differ (`#EXT-X-VERSION` parses into a `Version` element),
//! so each descriptor carries both.
//!
//! Rules are grouped the way RFC 8216 groups the tags:
//! - Basic tags (`#EXTM3U`, `#EXT-X-VERSION`)
//! - Media playlist tags
//! - Media segment tags
//! - Media metadata tags (`#EXT-X-DATERANGE`)
//! - Multivariant playlist tags
//! - Tags allowed in either playlist type
//! - Packager extensions and comments

pub mod basic;
pub mod exclusive;
pub mod media_metadata;
pub mod media_playlist;
pub mod media_segment;
pub mod multivariant;
pub mod others;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{PlaylistError, Result};
use crate::playlist::{Element, Playlist};
use crate::state::ParseState;

/// Parses one trimmed tag line into the playlist, or stashes a pending
/// element in the parse state.
pub type ParseRule = fn(&str, &mut Playlist, &mut ParseState) -> Result<()>;

/// Renders one element, including the trailing newline.
pub type EncodeRule = fn(&Element, &mut String) -> Result<()>;

/// One table entry.
#[derive(Debug, Clone, Copy)]
pub struct TagDescriptor {
    pub keyword: &'static str,
    pub kind: &'static str,
    pub parse: ParseRule,
    pub encode: EncodeRule,
}

/// Read-only registry consumed by the parse and encode drivers.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    parsers: HashMap<&'static str, ParseRule>,
    encoders: HashMap<&'static str, EncodeRule>,
}

impl TagTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every tag this crate knows about.
    pub fn standard() -> Self {
        let mut table = Self::new();
        basic::register(&mut table);
        media_playlist::register(&mut table);
        media_segment::register(&mut table);
        media_metadata::register(&mut table);
        multivariant::register(&mut table);
        exclusive::register(&mut table);
        others::register(&mut table);
        table
    }

    /// Add or replace a descriptor.
    pub fn register(&mut self, descriptor: TagDescriptor) {
        self.parsers.insert(descriptor.keyword, descriptor.parse);
        self.encoders.insert(descriptor.kind, descriptor.encode);
    }

    /// Add an encoder for a kind that no keyword parses into directly.
    pub fn register_encoder(&mut self, kind: &'static str, encode: EncodeRule) {
        self.encoders.insert(kind, encode);
    }

    pub fn parse_rule(&self, keyword: &str) -> Option<ParseRule> {
        self.parsers.get(keyword).copied()
    }

    pub fn encode_rule(&self, kind: &str) -> Option<EncodeRule> {
        self.encoders.get(kind).copied()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parsers.keys().copied()
    }
}

/// Shared standard table, built on first use.
pub fn tag_table() -> &'static TagTable {
    static TABLE: OnceLock<TagTable> = OnceLock::new();
    TABLE.get_or_init(TagTable::standard)
}

/// Text after `KEYWORD:`, or an empty string for a bare tag.
pub(crate) fn payload<'a>(line: &'a str, keyword: &str) -> &'a str {
    line.get(keyword.len()..)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or("")
}

/// Append an element holding the tag's value under its own keyword.
pub(crate) fn parse_value_tag(
    line: &str,
    keyword: &str,
    kind: &str,
    playlist: &mut Playlist,
) -> Result<()> {
    let value = payload(line, keyword).trim();
    playlist.append(Element::with_value(kind, keyword, value));
    Ok(())
}

/// Like [`parse_value_tag`], but an empty value is a malformed tag.
pub(crate) fn parse_required_value_tag(
    line: &str,
    keyword: &str,
    kind: &str,
    playlist: &mut Playlist,
) -> Result<()> {
    if payload(line, keyword).trim().is_empty() {
        return Err(PlaylistError::malformed_tag(line, "value is required"));
    }
    parse_value_tag(line, keyword, kind, playlist)
}

/// Append an element for a tag with no value.
pub(crate) fn parse_flag_tag(keyword: &str, kind: &str, playlist: &mut Playlist) -> Result<()> {
    playlist.append(Element::with_value(kind, keyword, ""));
    Ok(())
}

/// Write `KEYWORD:value\n`, or `KEYWORD\n` when the value is empty.
pub(crate) fn encode_value_tag(element: &Element, keyword: &str, out: &mut String) -> Result<()> {
    let value = element.attr(keyword).unwrap_or_default();
    out.push_str(keyword);
    if !value.is_empty() {
        out.push(':');
        out.push_str(value);
    }
    out.push('\n');
    Ok(())
}

/// Write `KEYWORD\n`.
pub(crate) fn encode_flag_tag(keyword: &str, out: &mut String) -> Result<()> {
    out.push_str(keyword);
    out.push('\n');
    Ok(())
}
