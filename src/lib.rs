//! HLS manifest parser and encoder
//!
//! Parses multivariant and media playlists (RFC 8216) into an ordered
//! document, tracks SCTE-35 ad breaks relative to the DVR window, and
//! encodes the document back to M3U8 text.

pub mod breaks;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod playlist;
pub mod state;
pub mod tags;

#[cfg(test)]
pub(crate) mod tests;

pub use breaks::{classify, BreakReport, BreakStatus, Classification, NOT_READY_TOLERANCE_MS};
pub use decode::parse_with;
pub use encode::encode_with;
pub use error::{PlaylistError, RangeError, Result};
pub use playlist::{keys, kinds, Element, ElementId, Playlist};
pub use state::{ParseState, Pending, Phase, PlaylistTotals};
pub use tags::{tag_table, TagDescriptor, TagTable};
