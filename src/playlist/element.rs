//! Playlist elements
//!
//! An [`Element`] is one playlist construct: a tag occurrence, a comment,
//! or a two-line segment/variant record (tag + URI).

use serde::Serialize;
use std::collections::HashMap;

/// Element kind names used by the standard tag table.
pub mod kinds {
    pub const M3U8_IDENTIFIER: &str = "M3u8Identifier";
    pub const VERSION: &str = "Version";
    pub const TARGET_DURATION: &str = "TargetDuration";
    pub const MEDIA_SEQUENCE: &str = "MediaSequence";
    pub const DISCONTINUITY_SEQUENCE: &str = "DiscontinuitySequence";
    pub const I_FRAMES_ONLY: &str = "IFramesOnly";
    pub const PLAYLIST_TYPE: &str = "PlaylistType";
    pub const END_LIST: &str = "EndList";
    pub const EXT_INF: &str = "ExtInf";
    pub const DISCONTINUITY: &str = "Discontinuity";
    pub const PROGRAM_DATE_TIME: &str = "ProgramDateTime";
    pub const KEY: &str = "Key";
    pub const MAP: &str = "Map";
    pub const DATE_RANGE: &str = "DateRange";
    pub const STREAM_INF: &str = "StreamInf";
    pub const MEDIA: &str = "Media";
    pub const I_FRAME_STREAM_INF: &str = "IFrameStreamInf";
    pub const SESSION_KEY: &str = "SessionKey";
    pub const INDEPENDENT_SEGMENTS: &str = "IndependentSegments";
    pub const VARIABLE_DEFINE: &str = "VariableDefine";
    pub const START: &str = "Start";
    pub const USP_TIMESTAMP_MAP: &str = "UspTimestampMap";
    pub const CUE_OUT: &str = "CueOut";
    pub const CUE_IN: &str = "CueIn";
    pub const COMMENT: &str = "Comment";
    pub const UNSUPPORTED: &str = "Unsupported";
}

/// Attribute keys that are not tag keywords.
pub mod keys {
    pub const DURATION: &str = "Duration";
    pub const TITLE: &str = "Title";
    pub const COMMENT: &str = "Comment";
    pub const LINE: &str = "Line";
    pub const SCTE35_OUT: &str = "SCTE35-OUT";
    pub const SCTE35_IN: &str = "SCTE35-IN";
    pub const START_DATE: &str = "START-DATE";

    // derived
    pub const MEDIA_SEQUENCE: &str = "MediaSequence";
    pub const PROGRAM_DATE_TIME: &str = "ProgramDateTime";
    pub const START_MEDIA_SEQUENCE: &str = "StartMediaSequence";
    pub const STATUS: &str = "Status";
}

/// One playlist construct.
///
/// `attrs` holds values as written in the manifest; `details` holds values
/// computed while parsing that never appear in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub attrs: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Element with a single attribute, e.g. `#EXT-X-VERSION` -> `3`.
    pub fn with_value(kind: impl Into<String>, key: &str, value: impl Into<String>) -> Self {
        let mut element = Self::new(kind);
        element.attrs.insert(key.to_string(), value.into());
        element
    }

    pub fn with_attrs(kind: impl Into<String>, attrs: HashMap<String, String>) -> Self {
        Self {
            kind: kind.into(),
            attrs,
            ..Default::default()
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// True for a DateRange carrying a non-empty value under `key`.
    fn is_date_range_with(&self, key: &str) -> bool {
        self.is(kinds::DATE_RANGE) && self.attr(key).is_some_and(|v| !v.is_empty())
    }

    /// A DateRange that opens an ad break (non-empty SCTE35-OUT).
    pub fn is_break_start(&self) -> bool {
        self.is_date_range_with(keys::SCTE35_OUT)
    }

    /// A DateRange that closes an ad break (non-empty SCTE35-IN).
    pub fn is_break_end(&self) -> bool {
        self.is_date_range_with(keys::SCTE35_IN)
    }
}
