//! Tags allowed in both media and multivariant playlists (RFC 8216 section 4.3.5),
//! plus `#EXT-X-DEFINE` variable definitions.

use super::{encode_flag_tag, parse_flag_tag, payload, TagDescriptor, TagTable};
use crate::error::{PlaylistError, Result};
use crate::playlist::codec::{self, QuoteRule};
use crate::playlist::{kinds, Element, Playlist};
use crate::state::ParseState;

pub const INDEPENDENT_SEGMENTS_TAG: &str = "#EXT-X-INDEPENDENT-SEGMENTS";
pub const DEFINE_TAG: &str = "#EXT-X-DEFINE";
pub const START_TAG: &str = "#EXT-X-START";

const DEFINE_ORDER: &[&str] = &["NAME", "VALUE", "IMPORT", "QUERYPARAM"];

const START_ORDER: &[&str] = &["TIME-OFFSET", "PRECISE"];
const START_QUOTING: QuoteRule<'static> = QuoteRule::unquoted(&["TIME-OFFSET", "PRECISE"]);

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: INDEPENDENT_SEGMENTS_TAG,
        kind: kinds::INDEPENDENT_SEGMENTS,
        parse: parse_independent_segments,
        encode: encode_independent_segments,
    });
    table.register(TagDescriptor {
        keyword: DEFINE_TAG,
        kind: kinds::VARIABLE_DEFINE,
        parse: parse_define,
        encode: encode_define,
    });
    table.register(TagDescriptor {
        keyword: START_TAG,
        kind: kinds::START,
        parse: parse_start,
        encode: encode_start,
    });
}

fn parse_independent_segments(_line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_flag_tag(INDEPENDENT_SEGMENTS_TAG, kinds::INDEPENDENT_SEGMENTS, playlist)
}

fn parse_define(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, DEFINE_TAG));
    // Empty values are dropped on encode, so they cannot satisfy a rule.
    let present = |key: &str| attrs.get(key).is_some_and(|v| !v.is_empty());
    if attrs.values().all(|v| v.is_empty()) {
        return Err(PlaylistError::malformed_tag(line, "attribute list is required"));
    }
    if present("NAME") && !present("VALUE") {
        return Err(PlaylistError::malformed_tag(
            line,
            "VALUE attribute is required when NAME is present",
        ));
    }
    playlist.append(Element::with_attrs(kinds::VARIABLE_DEFINE, attrs));
    Ok(())
}

fn parse_start(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, START_TAG));
    if attrs.get("TIME-OFFSET").map_or(true, |v| v.is_empty()) {
        return Err(PlaylistError::malformed_tag(line, "TIME-OFFSET attribute is required"));
    }
    playlist.append(Element::with_attrs(kinds::START, attrs));
    Ok(())
}

fn encode_independent_segments(_element: &Element, out: &mut String) -> Result<()> {
    encode_flag_tag(INDEPENDENT_SEGMENTS_TAG, out)
}

fn encode_define(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, DEFINE_TAG, &element.attrs, DEFINE_ORDER, QuoteRule::default());
    Ok(())
}

fn encode_start(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, START_TAG, &element.attrs, START_ORDER, START_QUOTING);
    Ok(())
}
