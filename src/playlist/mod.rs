//! Playlist document module
//!
//! This module holds the in-memory form of an HLS manifest:
//! - Elements (one tag, comment, or segment/variant record each)
//! - The ordered document linking them together
//! - The attribute-list codec shared by every tag rule

pub mod codec;
pub mod document;
pub mod element;

pub use document::{ElementId, Playlist};
pub use element::{keys, kinds, Element};
