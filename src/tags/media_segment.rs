//! Media segment tags (RFC 8216 section 4.3.2)
//!
//! `#EXTINF` is the only multi-line tag here: its rule computes the
//! segment's derived values, advances the segment counters, and leaves the
//! element pending until the URI line arrives.

use super::{
    encode_flag_tag, encode_value_tag, parse_flag_tag, payload, TagDescriptor, TagTable,
};
use crate::error::{PlaylistError, Result};
use crate::playlist::codec::{self, QuoteRule};
use crate::playlist::{keys, kinds, Element, Playlist};
use crate::state::{format_timestamp, parse_timestamp, ParseState, Pending};

pub const EXT_INF_TAG: &str = "#EXTINF";
pub const DISCONTINUITY_TAG: &str = "#EXT-X-DISCONTINUITY";
pub const PROGRAM_DATE_TIME_TAG: &str = "#EXT-X-PROGRAM-DATE-TIME";
pub const KEY_TAG: &str = "#EXT-X-KEY";
pub const MAP_TAG: &str = "#EXT-X-MAP";

pub(crate) const KEY_ORDER: &[&str] = &["METHOD", "URI", "IV", "KEYFORMAT", "KEYFORMATVERSIONS"];
pub(crate) const KEY_QUOTING: QuoteRule<'static> = QuoteRule::unquoted(&["METHOD", "IV"]);

const MAP_ORDER: &[&str] = &["URI", "BYTERANGE"];

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: EXT_INF_TAG,
        kind: kinds::EXT_INF,
        parse: parse_ext_inf,
        encode: encode_ext_inf,
    });
    table.register(TagDescriptor {
        keyword: DISCONTINUITY_TAG,
        kind: kinds::DISCONTINUITY,
        parse: parse_discontinuity,
        encode: encode_discontinuity,
    });
    table.register(TagDescriptor {
        keyword: PROGRAM_DATE_TIME_TAG,
        kind: kinds::PROGRAM_DATE_TIME,
        parse: parse_program_date_time,
        encode: encode_program_date_time,
    });
    table.register(TagDescriptor {
        keyword: KEY_TAG,
        kind: kinds::KEY,
        parse: parse_key,
        encode: encode_key,
    });
    table.register(TagDescriptor {
        keyword: MAP_TAG,
        kind: kinds::MAP,
        parse: parse_map,
        encode: encode_map,
    });
}

/// `#EXTINF:<duration>,[<title>]`
///
/// The title is everything after the first comma, kept untrimmed. It is
/// stored only when a comma was written so `#EXTINF:4,` survives encoding.
fn parse_ext_inf(line: &str, _playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    let value = payload(line, EXT_INF_TAG);
    let (duration, title) = match value.split_once(',') {
        Some((duration, title)) => (duration.trim(), Some(title)),
        None => (value.trim(), None),
    };

    let seconds = duration
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .ok_or_else(|| PlaylistError::malformed_value(EXT_INF_TAG, duration))?;

    let mut segment = Element::with_value(kinds::EXT_INF, keys::DURATION, duration);
    if let Some(title) = title {
        segment.attrs.insert(keys::TITLE.to_string(), title.to_string());
    }
    let media_sequence = state.next_media_sequence().ok_or_else(|| {
        PlaylistError::malformed_value(
            keys::MEDIA_SEQUENCE,
            &format!("{}+{}", state.media_sequence, state.segments_counter),
        )
    })?;
    segment
        .details
        .insert(keys::MEDIA_SEQUENCE.to_string(), media_sequence.to_string());
    if let Some(time) = state.next_segment_time() {
        segment
            .details
            .insert(keys::PROGRAM_DATE_TIME.to_string(), format_timestamp(&time));
    }

    state.add_segment(seconds);
    state.pending = Some(Pending::Segment(segment));
    Ok(())
}

fn parse_discontinuity(_line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_flag_tag(DISCONTINUITY_TAG, kinds::DISCONTINUITY, playlist)
}

/// The first valid timestamp becomes the wall-clock anchor. Later ones are
/// kept as elements only.
fn parse_program_date_time(line: &str, playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    let value = payload(line, PROGRAM_DATE_TIME_TAG).trim();
    if value.is_empty() {
        return Err(PlaylistError::malformed_tag(line, "timestamp is required"));
    }

    if state.program_date_time.is_none() {
        let anchor = parse_timestamp(value)
            .ok_or_else(|| PlaylistError::malformed_value(PROGRAM_DATE_TIME_TAG, value))?;
        state.program_date_time = Some(anchor);
    }

    playlist.append(Element::with_value(
        kinds::PROGRAM_DATE_TIME,
        PROGRAM_DATE_TIME_TAG,
        value,
    ));
    Ok(())
}

fn parse_key(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, KEY_TAG));
    let method = attrs.get("METHOD").map(String::as_str).unwrap_or_default();
    let has = |key: &str| attrs.get(key).is_some_and(|v| !v.is_empty());

    if method.is_empty() {
        return Err(PlaylistError::malformed_tag(line, "METHOD attribute is required"));
    }
    if method != "NONE" && !has("URI") {
        return Err(PlaylistError::malformed_tag(
            line,
            "URI attribute is required unless METHOD is NONE",
        ));
    }
    if method == "AES-128" && !has("IV") {
        return Err(PlaylistError::malformed_tag(
            line,
            "IV attribute is required when METHOD is AES-128",
        ));
    }

    playlist.append(Element::with_attrs(kinds::KEY, attrs));
    Ok(())
}

fn parse_map(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, MAP_TAG));
    if attrs.get("URI").map_or(true, |v| v.is_empty()) {
        return Err(PlaylistError::malformed_tag(line, "URI attribute is required"));
    }
    playlist.append(Element::with_attrs(kinds::MAP, attrs));
    Ok(())
}

fn encode_ext_inf(element: &Element, out: &mut String) -> Result<()> {
    out.push_str(EXT_INF_TAG);
    out.push(':');
    out.push_str(element.attr(keys::DURATION).unwrap_or_default());
    if let Some(title) = element.attr(keys::TITLE) {
        out.push(',');
        out.push_str(title);
    }
    out.push('\n');
    out.push_str(element.uri().unwrap_or_default());
    out.push('\n');
    Ok(())
}

fn encode_discontinuity(_element: &Element, out: &mut String) -> Result<()> {
    encode_flag_tag(DISCONTINUITY_TAG, out)
}

fn encode_program_date_time(element: &Element, out: &mut String) -> Result<()> {
    encode_value_tag(element, PROGRAM_DATE_TIME_TAG, out)
}

fn encode_key(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, KEY_TAG, &element.attrs, KEY_ORDER, KEY_QUOTING);
    Ok(())
}

fn encode_map(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, MAP_TAG, &element.attrs, MAP_ORDER, QuoteRule::default());
    Ok(())
}
