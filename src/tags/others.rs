//! Packager extensions and non-tag lines
//!
//! `#USP-X-TIMESTAMP-MAP`, `#EXT-X-CUE-OUT` and `#EXT-X-CUE-IN` are added by
//! packagers doing SCTE-35 signalling. Comments and unsupported reserved
//! tags have no keyword of their own; the parse driver builds them directly
//! and they are written back verbatim.

use super::{encode_flag_tag, parse_flag_tag, payload, TagDescriptor, TagTable};
use crate::error::Result;
use crate::playlist::codec::{self, QuoteRule};
use crate::playlist::{keys, kinds, Element, Playlist};
use crate::state::ParseState;

pub const USP_TIMESTAMP_MAP_TAG: &str = "#USP-X-TIMESTAMP-MAP";
pub const CUE_OUT_TAG: &str = "#EXT-X-CUE-OUT";
pub const CUE_IN_TAG: &str = "#EXT-X-CUE-IN";

const USP_ORDER: &[&str] = &["MPEGTS", "LOCAL"];
const USP_QUOTING: QuoteRule<'static> = QuoteRule::unquoted(&["MPEGTS", "LOCAL"]);

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: USP_TIMESTAMP_MAP_TAG,
        kind: kinds::USP_TIMESTAMP_MAP,
        parse: parse_usp_timestamp_map,
        encode: encode_usp_timestamp_map,
    });
    table.register(TagDescriptor {
        keyword: CUE_OUT_TAG,
        kind: kinds::CUE_OUT,
        parse: parse_cue_out,
        encode: encode_cue_out,
    });
    table.register(TagDescriptor {
        keyword: CUE_IN_TAG,
        kind: kinds::CUE_IN,
        parse: parse_cue_in,
        encode: encode_cue_in,
    });
    table.register_encoder(kinds::COMMENT, encode_comment);
    table.register_encoder(kinds::UNSUPPORTED, encode_unsupported);
}

/// A comment line, or a URI line with nothing pending.
pub fn comment(line: &str) -> Element {
    Element::with_value(kinds::COMMENT, keys::COMMENT, line)
}

/// A reserved-prefix tag line with no registered rule.
pub fn unsupported(line: &str) -> Element {
    Element::with_value(kinds::UNSUPPORTED, keys::LINE, line)
}

fn parse_usp_timestamp_map(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, USP_TIMESTAMP_MAP_TAG));
    playlist.append(Element::with_attrs(kinds::USP_TIMESTAMP_MAP, attrs));
    Ok(())
}

/// `#EXT-X-CUE-OUT[:<seconds>]`. A missing duration is stored as `0`.
fn parse_cue_out(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let duration = payload(line, CUE_OUT_TAG).trim();
    let duration = if duration.is_empty() { "0" } else { duration };
    playlist.append(Element::with_value(kinds::CUE_OUT, CUE_OUT_TAG, duration));
    Ok(())
}

fn parse_cue_in(_line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_flag_tag(CUE_IN_TAG, kinds::CUE_IN, playlist)
}

fn encode_usp_timestamp_map(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, USP_TIMESTAMP_MAP_TAG, &element.attrs, USP_ORDER, USP_QUOTING);
    Ok(())
}

fn encode_cue_out(element: &Element, out: &mut String) -> Result<()> {
    out.push_str(CUE_OUT_TAG);
    out.push(':');
    out.push_str(element.attr(CUE_OUT_TAG).unwrap_or("0"));
    out.push('\n');
    Ok(())
}

fn encode_cue_in(_element: &Element, out: &mut String) -> Result<()> {
    encode_flag_tag(CUE_IN_TAG, out)
}

fn write_line(line: &str, out: &mut String) -> Result<()> {
    out.push_str(line);
    out.push('\n');
    Ok(())
}

fn encode_comment(element: &Element, out: &mut String) -> Result<()> {
    write_line(element.attr(keys::COMMENT).unwrap_or_default(), out)
}

fn encode_unsupported(element: &Element, out: &mut String) -> Result<()> {
    write_line(element.attr(keys::LINE).unwrap_or_default(), out)
}
