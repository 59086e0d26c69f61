//! Encode driver: renders a playlist back to M3U8 text, head to tail.

use crate::error::{PlaylistError, Result};
use crate::playlist::Playlist;
use crate::tags::{tag_table, TagTable};

/// Encode `playlist` using the encode rules of `table`.
///
/// An element kind without an encode rule fails the whole encode.
pub fn encode_with(playlist: &Playlist, table: &TagTable) -> Result<String> {
    let mut out = String::new();
    for element in playlist.iter() {
        let encode = table
            .encode_rule(&element.kind)
            .ok_or_else(|| PlaylistError::UnknownTag(element.kind.clone()))?;
        encode(element, &mut out)?;
    }
    Ok(out)
}

impl Playlist {
    /// Encode with the standard tag table.
    pub fn encode(&self) -> Result<String> {
        encode_with(self, tag_table())
    }
}
