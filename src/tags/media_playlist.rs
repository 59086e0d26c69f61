//! Media playlist tags (RFC 8216 section 4.3.3)
//!
//! Global parameters of a media playlist. `#EXT-X-MEDIA-SEQUENCE` and
//! `#EXT-X-DISCONTINUITY-SEQUENCE` also seed the parse state, so their
//! values must be integers.

use super::{
    encode_flag_tag, encode_value_tag, parse_flag_tag, parse_required_value_tag, payload,
    TagDescriptor, TagTable,
};
use crate::error::{PlaylistError, Result};
use crate::playlist::{kinds, Element, Playlist};
use crate::state::ParseState;

pub const TARGET_DURATION_TAG: &str = "#EXT-X-TARGETDURATION";
pub const MEDIA_SEQUENCE_TAG: &str = "#EXT-X-MEDIA-SEQUENCE";
pub const DISCONTINUITY_SEQUENCE_TAG: &str = "#EXT-X-DISCONTINUITY-SEQUENCE";
pub const END_LIST_TAG: &str = "#EXT-X-ENDLIST";
pub const PLAYLIST_TYPE_TAG: &str = "#EXT-X-PLAYLIST-TYPE";
pub const I_FRAMES_ONLY_TAG: &str = "#EXT-X-I-FRAMES-ONLY";

/// Lowest `#EXT-X-VERSION` that allows `#EXT-X-I-FRAMES-ONLY`.
const I_FRAMES_ONLY_MIN_VERSION: u32 = 4;

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: TARGET_DURATION_TAG,
        kind: kinds::TARGET_DURATION,
        parse: parse_target_duration,
        encode: encode_target_duration,
    });
    table.register(TagDescriptor {
        keyword: MEDIA_SEQUENCE_TAG,
        kind: kinds::MEDIA_SEQUENCE,
        parse: parse_media_sequence,
        encode: encode_media_sequence,
    });
    table.register(TagDescriptor {
        keyword: DISCONTINUITY_SEQUENCE_TAG,
        kind: kinds::DISCONTINUITY_SEQUENCE,
        parse: parse_discontinuity_sequence,
        encode: encode_discontinuity_sequence,
    });
    table.register(TagDescriptor {
        keyword: END_LIST_TAG,
        kind: kinds::END_LIST,
        parse: parse_end_list,
        encode: encode_end_list,
    });
    table.register(TagDescriptor {
        keyword: PLAYLIST_TYPE_TAG,
        kind: kinds::PLAYLIST_TYPE,
        parse: parse_playlist_type,
        encode: encode_playlist_type,
    });
    table.register(TagDescriptor {
        keyword: I_FRAMES_ONLY_TAG,
        kind: kinds::I_FRAMES_ONLY,
        parse: parse_i_frames_only,
        encode: encode_i_frames_only,
    });
}

/// Parse a sequence-number tag, returning the number.
fn parse_sequence(line: &str, keyword: &str, kind: &str, playlist: &mut Playlist) -> Result<u64> {
    let value = payload(line, keyword).trim();
    let number = value
        .parse::<u64>()
        .map_err(|_| PlaylistError::malformed_value(keyword, value))?;
    playlist.append(Element::with_value(kind, keyword, value));
    Ok(number)
}

fn parse_target_duration(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_required_value_tag(line, TARGET_DURATION_TAG, kinds::TARGET_DURATION, playlist)
}

fn parse_media_sequence(line: &str, playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    state.media_sequence = parse_sequence(line, MEDIA_SEQUENCE_TAG, kinds::MEDIA_SEQUENCE, playlist)?;
    Ok(())
}

fn parse_discontinuity_sequence(line: &str, playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    state.discontinuity_sequence = parse_sequence(
        line,
        DISCONTINUITY_SEQUENCE_TAG,
        kinds::DISCONTINUITY_SEQUENCE,
        playlist,
    )?;
    Ok(())
}

fn parse_end_list(_line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    parse_flag_tag(END_LIST_TAG, kinds::END_LIST, playlist)
}

fn parse_playlist_type(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    match payload(line, PLAYLIST_TYPE_TAG).trim() {
        "VOD" | "EVENT" => parse_required_value_tag(line, PLAYLIST_TYPE_TAG, kinds::PLAYLIST_TYPE, playlist),
        _ => Err(PlaylistError::malformed_tag(line, "playlist type must be VOD or EVENT")),
    }
}

fn parse_i_frames_only(line: &str, playlist: &mut Playlist, _state: &mut ParseState) -> Result<()> {
    match playlist.version_value() {
        Some(version) if version >= I_FRAMES_ONLY_MIN_VERSION => {
            parse_flag_tag(I_FRAMES_ONLY_TAG, kinds::I_FRAMES_ONLY, playlist)
        }
        _ => Err(PlaylistError::malformed_tag(
            line,
            format!("requires EXT-X-VERSION {} or higher", I_FRAMES_ONLY_MIN_VERSION),
        )),
    }
}

fn encode_target_duration(element: &Element, out: &mut String) -> Result<()> {
    encode_value_tag(element, TARGET_DURATION_TAG, out)
}

fn encode_media_sequence(element: &Element, out: &mut String) -> Result<()> {
    encode_value_tag(element, MEDIA_SEQUENCE_TAG, out)
}

fn encode_discontinuity_sequence(element: &Element, out: &mut String) -> Result<()> {
    encode_value_tag(element, DISCONTINUITY_SEQUENCE_TAG, out)
}

fn encode_end_list(_element: &Element, out: &mut String) -> Result<()> {
    encode_flag_tag(END_LIST_TAG, out)
}

fn encode_playlist_type(element: &Element, out: &mut String) -> Result<()> {
    encode_value_tag(element, PLAYLIST_TYPE_TAG, out)
}

fn encode_i_frames_only(_element: &Element, out: &mut String) -> Result<()> {
    encode_flag_tag(I_FRAMES_ONLY_TAG, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_sequence_seeds_state() {
        let input = "#EXTM3U\n#EXT-X-TARGETDURATION:5\n#EXT-X-MEDIA-SEQUENCE:100\n#EXT-X-DISCONTINUITY-SEQUENCE:7";
        let playlist: Playlist = input.parse().unwrap();
        assert_eq!(playlist.totals().media_sequence, 100);
        assert_eq!(playlist.totals().discontinuity_sequence, 7);
        assert_eq!(playlist.media_sequence_value(), Some(100));
        assert_eq!(playlist.encode().unwrap(), format!("{}\n", input));
    }

    #[test]
    fn test_media_sequence_must_be_integer() {
        let err = "#EXT-X-MEDIA-SEQUENCE:abc".parse::<Playlist>().unwrap_err();
        match err {
            PlaylistError::MalformedValue { field, value } => {
                assert_eq!(field, MEDIA_SEQUENCE_TAG);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            "#EXT-X-DISCONTINUITY-SEQUENCE:".parse::<Playlist>(),
            Err(PlaylistError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_target_duration_requires_value() {
        assert!(matches!(
            "#EXT-X-TARGETDURATION:".parse::<Playlist>(),
            Err(PlaylistError::MalformedTag { .. })
        ));
    }

    #[test]
    fn test_playlist_type() {
        let playlist: Playlist = "#EXT-X-PLAYLIST-TYPE:VOD\n#EXT-X-ENDLIST".parse().unwrap();
        let id = playlist.find(kinds::PLAYLIST_TYPE).unwrap();
        assert_eq!(playlist[id].attr(PLAYLIST_TYPE_TAG), Some("VOD"));
        assert!(playlist.find(kinds::END_LIST).is_some());
        assert_eq!(playlist.encode().unwrap(), "#EXT-X-PLAYLIST-TYPE:VOD\n#EXT-X-ENDLIST\n");

        assert!(matches!(
            "#EXT-X-PLAYLIST-TYPE:LIVE".parse::<Playlist>(),
            Err(PlaylistError::MalformedTag { .. })
        ));
    }

    #[test]
    fn test_i_frames_only_requires_version_4() {
        let playlist: Playlist = "#EXT-X-VERSION:4\n#EXT-X-I-FRAMES-ONLY".parse().unwrap();
        assert!(playlist.find(kinds::I_FRAMES_ONLY).is_some());

        for input in ["#EXT-X-VERSION:3\n#EXT-X-I-FRAMES-ONLY", "#EXT-X-I-FRAMES-ONLY"] {
            assert!(matches!(
                input.parse::<Playlist>(),
                Err(PlaylistError::MalformedTag { .. })
            ));
        }
    }
}
