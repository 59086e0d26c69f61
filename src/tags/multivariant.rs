//! Multivariant playlist tags (RFC 8216 section 4.3.4)

use super::media_segment::{KEY_ORDER, KEY_QUOTING};
use super::{payload, TagDescriptor, TagTable};
use crate::error::{PlaylistError, Result};
use crate::playlist::codec::{self, QuoteRule};
use crate::playlist::{kinds, Element, Playlist};
use crate::state::{ParseState, Pending};

pub const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF";
pub const MEDIA_TAG: &str = "#EXT-X-MEDIA";
pub const I_FRAME_STREAM_INF_TAG: &str = "#EXT-X-I-FRAME-STREAM-INF";
pub const SESSION_KEY_TAG: &str = "#EXT-X-SESSION-KEY";

const STREAM_INF_ORDER: &[&str] = &[
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "CODECS",
    "RESOLUTION",
    "FRAME-RATE",
    "VIDEO-RANGE",
    "AUDIO",
    "VIDEO",
    "SUBTITLES",
    "CLOSED-CAPTIONS",
];

const STREAM_INF_QUOTING: QuoteRule<'static> = QuoteRule::unquoted(&[
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "RESOLUTION",
    "FRAME-RATE",
    "VIDEO-RANGE",
    "PROGRAM-ID",
    "HDCP-LEVEL",
    "SCORE",
]);

// CLOSED-CAPTIONS=NONE is an enumerated value, not a group name.
const STREAM_INF_QUOTING_NO_CC: QuoteRule<'static> = QuoteRule::unquoted(&[
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "RESOLUTION",
    "FRAME-RATE",
    "VIDEO-RANGE",
    "PROGRAM-ID",
    "HDCP-LEVEL",
    "SCORE",
    "CLOSED-CAPTIONS",
]);

const MEDIA_TYPES: &[&str] = &["AUDIO", "VIDEO", "SUBTITLES", "CLOSED-CAPTIONS"];

const MEDIA_ORDER: &[&str] = &[
    "TYPE",
    "GROUP-ID",
    "LANGUAGE",
    "NAME",
    "DEFAULT",
    "AUTOSELECT",
    "CHANNELS",
    "URI",
];

const MEDIA_QUOTING: QuoteRule<'static> =
    QuoteRule::unquoted(&["TYPE", "DEFAULT", "AUTOSELECT", "FORCED"]);

const I_FRAME_ORDER: &[&str] = &[
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "CODECS",
    "RESOLUTION",
    "URI",
    "VIDEO-RANGE",
    "VIDEO",
    "SCORE",
];

const I_FRAME_QUOTING: QuoteRule<'static> = QuoteRule::unquoted(&[
    "BANDWIDTH",
    "AVERAGE-BANDWIDTH",
    "RESOLUTION",
    "VIDEO-RANGE",
    "SCORE",
]);

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: STREAM_INF_TAG,
        kind: kinds::STREAM_INF,
        parse: parse_stream_inf,
        encode: encode_stream_inf,
    });
    table.register(TagDescriptor {
        keyword: MEDIA_TAG,
        kind: kinds::MEDIA,
        parse: parse_media,
        encode: encode_media,
    });
    table.register(TagDescriptor {
        keyword: I_FRAME_STREAM_INF_TAG,
        kind: kinds::I_FRAME_STREAM_INF,
        parse: parse_i_frame_stream_inf,
        encode: encode_i_frame_stream_inf,
    });
    table.register(TagDescriptor {
        keyword: SESSION_KEY_TAG,
        kind: kinds::SESSION_KEY,
        parse: parse_session_key,
        encode: encode_session_key,
    });
}

fn has(element: &Element, key: &str) -> bool {
    element.attr(key).is_some_and(|v| !v.is_empty())
}

/// `#EXT-X-STREAM-INF:<attribute-list>` followed by the variant URI.
fn parse_stream_inf(line: &str, _playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, STREAM_INF_TAG));
    state.pending = Some(Pending::Variant(Element::with_attrs(kinds::STREAM_INF, attrs)));
    Ok(())
}

fn parse_media(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let element = Element::with_attrs(kinds::MEDIA, codec::decode_map(payload(line, MEDIA_TAG)));

    let media_type = element.attr("TYPE").unwrap_or_default();
    if !MEDIA_TYPES.contains(&media_type) {
        return Err(PlaylistError::malformed_tag(
            line,
            "TYPE must be AUDIO, VIDEO, SUBTITLES or CLOSED-CAPTIONS",
        ));
    }
    if !has(&element, "GROUP-ID") {
        return Err(PlaylistError::malformed_tag(line, "GROUP-ID attribute is required"));
    }
    if media_type == "CLOSED-CAPTIONS" && element.attr("URI").is_some() {
        return Err(PlaylistError::malformed_tag(
            line,
            "URI attribute is not allowed for CLOSED-CAPTIONS",
        ));
    }

    playlist.append(element);
    Ok(())
}

fn parse_i_frame_stream_inf(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let element = Element::with_attrs(
        kinds::I_FRAME_STREAM_INF,
        codec::decode_map(payload(line, I_FRAME_STREAM_INF_TAG)),
    );
    for required in ["BANDWIDTH", "CODECS", "URI"] {
        if !has(&element, required) {
            return Err(PlaylistError::malformed_tag(
                line,
                format!("{} attribute is required", required),
            ));
        }
    }
    playlist.append(element);
    Ok(())
}

fn parse_session_key(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    let element = Element::with_attrs(
        kinds::SESSION_KEY,
        codec::decode_map(payload(line, SESSION_KEY_TAG)),
    );

    match element.attr("METHOD").unwrap_or_default() {
        "" => return Err(PlaylistError::malformed_tag(line, "METHOD attribute is required")),
        "NONE" => return Err(PlaylistError::malformed_tag(line, "METHOD must not be NONE")),
        "AES-128" if !has(&element, "IV") => {
            return Err(PlaylistError::malformed_tag(
                line,
                "IV attribute is required when METHOD is AES-128",
            ))
        }
        _ => {}
    }
    if !has(&element, "URI") {
        return Err(PlaylistError::malformed_tag(line, "URI attribute is required"));
    }

    playlist.append(element);
    Ok(())
}

fn encode_stream_inf(element: &Element, out: &mut String) -> Result<()> {
    let quoting = if element.attr("CLOSED-CAPTIONS") == Some("NONE") {
        STREAM_INF_QUOTING_NO_CC
    } else {
        STREAM_INF_QUOTING
    };
    codec::write_tag_with_attributes(out, STREAM_INF_TAG, &element.attrs, STREAM_INF_ORDER, quoting);
    if let Some(uri) = element.uri() {
        out.push_str(uri);
        out.push('\n');
    }
    Ok(())
}

fn encode_media(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, MEDIA_TAG, &element.attrs, MEDIA_ORDER, MEDIA_QUOTING);
    Ok(())
}

fn encode_i_frame_stream_inf(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(
        out,
        I_FRAME_STREAM_INF_TAG,
        &element.attrs,
        I_FRAME_ORDER,
        I_FRAME_QUOTING,
    );
    Ok(())
}

fn encode_session_key(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(out, SESSION_KEY_TAG, &element.attrs, KEY_ORDER, KEY_QUOTING);
    Ok(())
}
