//! Media metadata tags (RFC 8216 section 4.3.2.7)
//!
//! A `#EXT-X-DATERANGE` with a non-empty `SCTE35-OUT` opens an ad break.
//! Its status and first media sequence are computed here, once, from the
//! parse state at the point the tag is read.

use super::{payload, TagDescriptor, TagTable};
use crate::breaks;
use crate::error::{PlaylistError, Result};
use crate::playlist::codec::{self, QuoteRule};
use crate::playlist::{keys, kinds, Element, Playlist};
use crate::state::ParseState;

pub const DATE_RANGE_TAG: &str = "#EXT-X-DATERANGE";

const DATE_RANGE_ORDER: &[&str] = &[
    "ID",
    "CLASS",
    "START-DATE",
    "END-DATE",
    "DURATION",
    "PLANNED-DURATION",
    "X-ASSET-URI",
    "SCTE35-OUT",
    "SCTE35-IN",
];

const DATE_RANGE_QUOTING: QuoteRule<'static> = QuoteRule::unquoted(&[
    "DURATION",
    "PLANNED-DURATION",
    "SCTE35-OUT",
    "SCTE35-IN",
    "SCTE35-CMD",
    "END-ON-NEXT",
]);

pub fn register(table: &mut TagTable) {
    table.register(TagDescriptor {
        keyword: DATE_RANGE_TAG,
        kind: kinds::DATE_RANGE,
        parse: parse_date_range,
        encode: encode_date_range,
    });
}

fn parse_date_range(line: &str, playlist: &mut Playlist, state: &mut ParseState) -> Result<()> {
    let attrs = codec::decode_map(payload(line, DATE_RANGE_TAG));
    if attrs.is_empty() {
        return Err(PlaylistError::malformed_tag(line, "attribute list is required"));
    }

    let mut element = Element::with_attrs(kinds::DATE_RANGE, attrs);
    if element.is_break_start() {
        let class = breaks::classify(state, element.attr(keys::START_DATE));
        element.details.insert(
            keys::START_MEDIA_SEQUENCE.to_string(),
            class.start_media_sequence.to_string(),
        );
        element
            .details
            .insert(keys::STATUS.to_string(), class.status.as_str().to_string());
    }

    playlist.append(element);
    Ok(())
}

fn encode_date_range(element: &Element, out: &mut String) -> Result<()> {
    codec::write_tag_with_attributes(
        out,
        DATE_RANGE_TAG,
        &element.attrs,
        DATE_RANGE_ORDER,
        DATE_RANGE_QUOTING,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaks::BreakStatus;

    #[test]
    fn test_break_before_any_segment_is_leaving_dvr() {
        let input = "#EXT-X-MEDIA-SEQUENCE:100\n\
                     #EXT-X-DATERANGE:SCTE35-OUT=0x1,ID=\"a\",START-DATE=\"2025-01-01T00:00:00Z\"";
        let playlist: Playlist = input.parse().unwrap();
        let range = &playlist[playlist.find(kinds::DATE_RANGE).unwrap()];
        assert_eq!(range.detail(keys::STATUS), Some(BreakStatus::LeavingDvr.as_str()));
        assert_eq!(range.detail(keys::START_MEDIA_SEQUENCE), Some("0"));
    }

    #[test]
    fn test_plain_date_range_has_no_details() {
        let input = r#"#EXT-X-DATERANGE:ID="splice-end",START-DATE="2025-01-01T00:00:30Z",SCTE35-IN=0xFC"#;
        let playlist: Playlist = input.parse().unwrap();
        let range = &playlist[playlist.head().unwrap()];
        assert!(range.details.is_empty());
        assert!(range.is_break_end());
        assert_eq!(playlist.encode().unwrap(), format!("{}\n", input));
    }

    #[test]
    fn test_encode_order_and_quoting() {
        let input = r#"#EXT-X-DATERANGE:SCTE35-OUT=0xFC30,PLANNED-DURATION=30.0,ID="ad-1",START-DATE="2025-01-01T00:00:00Z",X-COM-TAG="x",CLASS="com.example""#;
        let playlist: Playlist = input.parse().unwrap();
        assert_eq!(
            playlist.encode().unwrap(),
            "#EXT-X-DATERANGE:ID=\"ad-1\",CLASS=\"com.example\",START-DATE=\"2025-01-01T00:00:00Z\",PLANNED-DURATION=30.0,SCTE35-OUT=0xFC30,X-COM-TAG=\"x\"\n"
        );
    }

    #[test]
    fn test_empty_date_range_is_malformed() {
        assert!(matches!(
            "#EXT-X-DATERANGE:".parse::<Playlist>(),
            Err(PlaylistError::MalformedTag { .. })
        ));
    }
}
