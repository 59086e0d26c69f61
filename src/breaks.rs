//! SCTE-35 ad breaks
//!
//! An ad break starts at a `#EXT-X-DATERANGE` with a non-empty `SCTE35-OUT`
//! and ends at the next `#EXT-X-CUE-IN` or `SCTE35-IN` date range. In a
//! sliding-window live playlist the break's first segment may already have
//! scrolled out of the DVR window, or may not be packaged yet; only a
//! `Complete` break has a trustworthy first media sequence.

use chrono::TimeDelta;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{PlaylistError, RangeError};
use crate::playlist::{keys, kinds, Element, ElementId, Playlist};
use crate::state::{parse_timestamp, ParseState};

/// How far a break may start after the estimated next segment time and
/// still be treated as already present.
pub const NOT_READY_TOLERANCE_MS: i64 = 20;

/// DVR-relative state of an ad break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakStatus {
    /// Every segment of the break is in the playlist
    #[serde(rename = "complete")]
    Complete,
    /// The break's first segment has left the DVR window
    #[serde(rename = "leavingDVRLimit")]
    LeavingDvr,
    /// The break's segments are not packaged yet
    #[serde(rename = "segmentsNotReady")]
    NotReady,
}

impl BreakStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakStatus::Complete => "complete",
            BreakStatus::LeavingDvr => "leavingDVRLimit",
            BreakStatus::NotReady => "segmentsNotReady",
        }
    }
}

impl fmt::Display for BreakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreakStatus {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(BreakStatus::Complete),
            "leavingDVRLimit" => Ok(BreakStatus::LeavingDvr),
            "segmentsNotReady" => Ok(BreakStatus::NotReady),
            other => Err(PlaylistError::malformed_value(keys::STATUS, other)),
        }
    }
}

/// Classifier output, stored in the date range's details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: BreakStatus,
    /// First segment of the break; 0 unless `Complete`
    pub start_media_sequence: u64,
}

impl Classification {
    fn incomplete(status: BreakStatus) -> Self {
        Self {
            status,
            start_media_sequence: 0,
        }
    }
}

/// Classify an ad break from the parse state at the point its date range
/// is read.
pub fn classify(state: &ParseState, start_date: Option<&str>) -> Classification {
    if state.program_date_time.is_none() && state.segments_counter == 0 {
        tracing::debug!("Ad break leaving DVR limit: no segments before it, media sequence will be zero");
        return Classification::incomplete(BreakStatus::LeavingDvr);
    }

    let Some(start) = start_date.and_then(parse_timestamp) else {
        tracing::debug!(
            "Ad break leaving DVR limit: invalid START-DATE {:?}, media sequence will be zero",
            start_date
        );
        return Classification::incomplete(BreakStatus::LeavingDvr);
    };

    let Some(anchor) = state.program_date_time else {
        tracing::debug!("Ad break segments not ready: no program date time to place the break");
        return Classification::incomplete(BreakStatus::NotReady);
    };

    if anchor >= start {
        tracing::debug!(
            "Ad break leaving DVR limit: program date time {} is at or after break start {}",
            anchor,
            start
        );
        return Classification::incomplete(BreakStatus::LeavingDvr);
    }

    // state.next_segment_time() is Some whenever an anchor exists
    let next_segment = state.next_segment_time().unwrap_or(anchor);
    if start - next_segment > TimeDelta::milliseconds(NOT_READY_TOLERANCE_MS) {
        tracing::debug!(
            "Ad break segments not ready: break starts at {}, next segment at {}",
            start,
            next_segment
        );
        return Classification::incomplete(BreakStatus::NotReady);
    }

    let Some(start_media_sequence) = state.next_media_sequence() else {
        tracing::debug!(
            "Ad break segments not ready: media sequence {} + {} overflows",
            state.media_sequence,
            state.segments_counter
        );
        return Classification::incomplete(BreakStatus::NotReady);
    };

    Classification {
        status: BreakStatus::Complete,
        start_media_sequence,
    }
}

/// One ad break and the segments inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakReport {
    pub element: ElementId,
    pub id: Option<String>,
    pub start_date: Option<String>,
    pub status: Option<BreakStatus>,
    pub start_media_sequence: Option<u64>,
    pub segments: Vec<String>,
}

impl BreakReport {
    fn new(element: ElementId, range: &Element) -> Self {
        Self {
            element,
            id: range.attr("ID").map(str::to_string),
            start_date: range.attr(keys::START_DATE).map(str::to_string),
            status: range.detail(keys::STATUS).and_then(|s| s.parse().ok()),
            start_media_sequence: range
                .detail(keys::START_MEDIA_SEQUENCE)
                .and_then(|s| s.parse().ok()),
            segments: Vec::new(),
        }
    }
}

fn closes_break(element: &Element) -> bool {
    element.is(kinds::CUE_IN) || element.is_break_end()
}

impl Playlist {
    /// Date ranges that open an ad break, in order.
    pub fn breaks(&self) -> Vec<ElementId> {
        self.ids().filter(|id| self[*id].is_break_start()).collect()
    }

    /// The ad break `id` belongs to, found by walking backwards from `id`
    /// itself. A CUE-IN or SCTE35-IN date range seen first means no break.
    pub fn find_enclosing_break(&self, id: ElementId) -> Option<ElementId> {
        let mut cursor = self.contains(id).then_some(id);
        while let Some(current) = cursor {
            let element = &self[current];
            if element.is_break_start() {
                return Some(current);
            }
            if closes_break(element) {
                return None;
            }
            cursor = self.prev(current);
        }
        None
    }

    /// The ad break enclosing the segment with the given URI.
    pub fn find_segment_ad_break(&self, uri: &str) -> Option<ElementId> {
        self.find_segment(uri)
            .and_then(|id| self.find_enclosing_break(id))
    }

    /// Rewrite the URI of every segment between the first break start and
    /// the next SCTE35-IN date range.
    pub fn replace_breaks_uri<F>(&mut self, mut transform: F) -> Result<(), RangeError>
    where
        F: FnMut(&str) -> String,
    {
        self.modify_range(
            Element::is_break_start,
            Element::is_break_end,
            |element| {
                if element.is(kinds::EXT_INF) {
                    if let Some(uri) = element.uri().map(&mut transform) {
                        element.uri = Some(uri);
                    }
                }
            },
        )
    }

    /// Every ad break with the URIs of the segments it encloses.
    pub fn break_reports(&self) -> Vec<BreakReport> {
        let mut reports: Vec<BreakReport> = Vec::new();
        let mut open = false;

        for id in self.ids() {
            let element = &self[id];
            if element.is_break_start() {
                reports.push(BreakReport::new(id, element));
                open = true;
            } else if closes_break(element) {
                open = false;
            } else if open && element.is(kinds::EXT_INF) {
                if let (Some(report), Some(uri)) = (reports.last_mut(), element.uri()) {
                    report.segments.push(uri.to_string());
                }
            }
        }

        reports
    }
}
