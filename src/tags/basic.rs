//! Basic tags (RFC 8216 section 4.3.1), allowed in every playlist type.

use super::{encode_flag_tag, encode_value_tag, parse_flag_tag, parse_required_value_tag};
use super::{TagDescriptor, TagTable};
use crate::error::Result;
use crate::playlist::{kinds, Element, Playlist};
use crate::state::ParseState;

pub const M3U8_IDENTIFIER_TAG: &str = "#EXTM3U";
pub const VERSION_TAG: &str = "#EXT-X-VERSION";

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: M3U8_IDENTIFIER_TAG,
        kind: kinds::M3U8_IDENTIFIER,
        parse: parse_m3u8_identifier,
        encode: encode_m3u8_identifier,
    });
    table.register(TagDescriptor {
        keyword: VERSION_TAG,
        kind: kinds::VERSION,
        parse: parse_version,
        encode: encode_version,
    });
}

fn parse_m3u8_identifier(_line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_flag_tag(M3U8_IDENTIFIER_TAG, kinds::M3U8_IDENTIFIER, playlist)
}

fn parse_version(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_required_value_tag(line, VERSION_TAG, kinds::VERSION, playlist)
}

fn encode_m3u8_identifier(_element: &Element, out: &mut String) -> Result<()> {
    encode_flag_tag(M3U8_IDENTIFIER_TAG, out)
}

fn encode_version(element: &Element, out: &mut String) -> Result<()> {
    encode_value_tag(element, VERSION_TAG, out)
}
