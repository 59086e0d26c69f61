//! Parse state
//!
//! Running totals threaded through a single parse. Later elements depend on
//! them: a segment's absolute media sequence, its wall-clock time, and the
//! classification of ad breaks relative to the DVR window.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;

use crate::playlist::Element;

/// A multi-line element waiting for its URI line.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// `#EXTINF` seen, segment URI expected next
    Segment(Element),
    /// `#EXT-X-STREAM-INF` seen, variant URI expected next
    Variant(Element),
}

/// Where the parse driver is between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingSegmentUri,
    AwaitingVariantUri,
}

/// Mutable context for one parse.
#[derive(Debug, Default)]
pub struct ParseState {
    /// First segment's sequence number, from `#EXT-X-MEDIA-SEQUENCE`
    pub media_sequence: u64,
    /// Segments seen so far
    pub segments_counter: u64,
    pub discontinuity_sequence: u64,
    /// Accumulated segment duration in seconds; the offset of the next
    /// unparsed segment from the wall-clock anchor
    pub dvr: f64,
    /// Wall-clock anchor from the first `#EXT-X-PROGRAM-DATE-TIME`
    pub program_date_time: Option<DateTime<Utc>>,
    pub pending: Option<Pending>,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.pending {
            None => Phase::Idle,
            Some(Pending::Segment(_)) => Phase::AwaitingSegmentUri,
            Some(Pending::Variant(_)) => Phase::AwaitingVariantUri,
        }
    }

    /// Take the pending element out, leaving the state idle.
    pub fn take_pending(&mut self) -> Option<Element> {
        match self.pending.take()? {
            Pending::Segment(element) | Pending::Variant(element) => Some(element),
        }
    }

    /// Absolute media sequence of the next unparsed segment, or `None` when
    /// it does not fit in a `u64`.
    pub fn next_media_sequence(&self) -> Option<u64> {
        self.media_sequence.checked_add(self.segments_counter)
    }

    /// Estimated wall-clock time of the next unparsed segment.
    pub fn next_segment_time(&self) -> Option<DateTime<Utc>> {
        self.program_date_time
            .map(|pdt| pdt + TimeDelta::nanoseconds((self.dvr * 1e9).round() as i64))
    }

    /// Account for one more segment of `duration` seconds.
    pub fn add_segment(&mut self, duration: f64) {
        self.dvr = round_float(self.dvr + duration, 4);
        self.segments_counter = self.segments_counter.saturating_add(1);
    }

    pub fn into_totals(self) -> PlaylistTotals {
        PlaylistTotals {
            media_sequence: self.media_sequence,
            segments_counter: self.segments_counter,
            discontinuity_sequence: self.discontinuity_sequence,
            dvr: self.dvr,
            program_date_time: self.program_date_time,
        }
    }
}

/// Final parse state values, kept on the playlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaylistTotals {
    pub media_sequence: u64,
    pub segments_counter: u64,
    pub discontinuity_sequence: u64,
    pub dvr: f64,
    pub program_date_time: Option<DateTime<Utc>>,
}

pub(crate) fn round_float(value: f64, precision: i32) -> f64 {
    let ratio = 10f64.powi(precision);
    (value * ratio).round() / ratio
}

/// Parse an ISO 8601 / RFC 3339 timestamp. Offsets without a colon
/// (`+0000`) are accepted as well.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_follows_pending() {
        let mut state = ParseState::new();
        assert_eq!(state.phase(), Phase::Idle);
        state.pending = Some(Pending::Segment(Element::new("ExtInf")));
        assert_eq!(state.phase(), Phase::AwaitingSegmentUri);
        state.pending = Some(Pending::Variant(Element::new("StreamInf")));
        assert_eq!(state.phase(), Phase::AwaitingVariantUri);
    }

    #[test]
    fn test_add_segment_rounds_dvr() {
        let mut state = ParseState::new();
        state.media_sequence = 100;
        for _ in 0..3 {
            state.add_segment(0.1);
        }
        assert_eq!(state.dvr, 0.3);
        assert_eq!(state.segments_counter, 3);
        assert_eq!(state.next_media_sequence(), Some(103));
    }

    #[test]
    fn test_next_media_sequence_overflow() {
        let mut state = ParseState::new();
        state.media_sequence = u64::MAX;
        assert_eq!(state.next_media_sequence(), Some(u64::MAX));
        state.add_segment(4.0);
        assert_eq!(state.next_media_sequence(), None);
    }

    #[test]
    fn test_next_segment_time() {
        let mut state = ParseState::new();
        assert!(state.next_segment_time().is_none());

        state.program_date_time = parse_timestamp("2025-01-01T00:00:00Z");
        state.add_segment(4.8);
        let next = state.next_segment_time().unwrap();
        assert_eq!(format_timestamp(&next), "2025-01-01T00:00:04.800Z");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let a = parse_timestamp("2025-01-01T12:34:56.789+00:00").unwrap();
        let b = parse_timestamp("2025-01-01T12:34:56.789+0000").unwrap();
        let c = parse_timestamp("2025-01-01T14:34:56.789+02:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
