//! Playlist document
//!
//! A playlist is an ordered, bidirectionally-traversable sequence of
//! [`Element`]s. Elements are stored in an arena and linked by index, so
//! neighbors are plain `ElementId`s rather than owning pointers. Elements are
//! never removed, which keeps every issued `ElementId` valid for the lifetime
//! of the playlist.

use serde::Serialize;
use std::ops::{Index, IndexMut};

use super::element::{kinds, Element};
use crate::error::RangeError;
use crate::state::PlaylistTotals;

/// Handle to an element inside one [`Playlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    prev: Option<ElementId>,
    next: Option<ElementId>,
}

/// Parsed HLS playlist.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    nodes: Vec<Node>,
    head: Option<ElementId>,
    tail: Option<ElementId>,
    totals: PlaylistTotals,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<ElementId> {
        self.head
    }

    pub fn tail(&self) -> Option<ElementId> {
        self.tail
    }

    pub fn contains(&self, id: ElementId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).map(|n| &mut n.element)
    }

    pub fn prev(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id.0).and_then(|n| n.prev)
    }

    pub fn next(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id.0).and_then(|n| n.next)
    }

    /// Running totals left by the parse that produced this playlist.
    pub fn totals(&self) -> &PlaylistTotals {
        &self.totals
    }

    pub(crate) fn set_totals(&mut self, totals: PlaylistTotals) {
        self.totals = totals;
    }

    /// Element ids in document order, head to tail.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.head, move |id| self.nodes[id.0].next)
    }

    /// Elements in document order, head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.ids().map(move |id| &self.nodes[id.0].element)
    }

    fn push_node(&mut self, element: Element, prev: Option<ElementId>, next: Option<ElementId>) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            element,
            prev,
            next,
        });
        id
    }

    /// Add an element at the end of the playlist.
    pub fn append(&mut self, element: Element) -> ElementId {
        let id = self.push_node(element, self.tail, None);
        match self.tail {
            Some(tail) => self.nodes[tail.0].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Insert `element` right after `anchor`.
    ///
    /// `anchor ---> element ---> anchor.next`
    pub fn insert_after(&mut self, anchor: ElementId, element: Element) -> Option<ElementId> {
        if !self.contains(anchor) {
            return None;
        }
        let next = self.nodes[anchor.0].next;
        let id = self.push_node(element, Some(anchor), next);
        self.nodes[anchor.0].next = Some(id);
        match next {
            Some(next) => self.nodes[next.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        Some(id)
    }

    /// Insert `element` right before `anchor`.
    ///
    /// `anchor.prev ---> element ---> anchor`
    pub fn insert_before(&mut self, anchor: ElementId, element: Element) -> Option<ElementId> {
        if !self.contains(anchor) {
            return None;
        }
        let prev = self.nodes[anchor.0].prev;
        let id = self.push_node(element, prev, Some(anchor));
        self.nodes[anchor.0].prev = Some(id);
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(id),
            None => self.head = Some(id),
        }
        Some(id)
    }

    /// Insert `element` between two adjacent elements.
    ///
    /// Returns `None` without touching the playlist unless `second`
    /// immediately follows `first`.
    pub fn insert_between(
        &mut self,
        first: ElementId,
        second: ElementId,
        element: Element,
    ) -> Option<ElementId> {
        if !self.contains(first) || self.next(first) != Some(second) {
            return None;
        }
        self.insert_after(first, element)
    }

    /// First element of the given kind.
    pub fn find(&self, kind: &str) -> Option<ElementId> {
        self.ids().find(|id| self[*id].is(kind))
    }

    /// All elements of the given kind, in document order.
    pub fn find_all(&self, kind: &str) -> Vec<ElementId> {
        self.ids().filter(|id| self[*id].is(kind)).collect()
    }

    /// Apply `transform` to every element strictly between the first element
    /// matching `start` and the first element after it matching `end`.
    ///
    /// Both boundaries are located before anything is transformed, so on
    /// error the playlist is left untouched.
    pub fn modify_range<S, E, T>(&mut self, start: S, end: E, mut transform: T) -> Result<(), RangeError>
    where
        S: Fn(&Element) -> bool,
        E: Fn(&Element) -> bool,
        T: FnMut(&mut Element),
    {
        let start_id = self
            .ids()
            .find(|id| start(&self[*id]))
            .ok_or(RangeError::StartNotFound)?;

        let mut inside = Vec::new();
        let mut cursor = self.next(start_id);
        loop {
            let id = cursor.ok_or(RangeError::EndNotFound)?;
            if end(&self[id]) {
                break;
            }
            inside.push(id);
            cursor = self.next(id);
        }

        for id in inside {
            transform(&mut self.nodes[id.0].element);
        }
        Ok(())
    }
}

// Queries over well-known element kinds.
impl Playlist {
    /// Value of `#EXT-X-VERSION`, if present and numeric.
    pub fn version_value(&self) -> Option<u32> {
        self.find(kinds::VERSION)
            .and_then(|id| self[id].attr("#EXT-X-VERSION"))
            .and_then(|v| v.parse().ok())
    }

    /// Value of `#EXT-X-MEDIA-SEQUENCE`, if present and numeric.
    pub fn media_sequence_value(&self) -> Option<u64> {
        self.find(kinds::MEDIA_SEQUENCE)
            .and_then(|id| self[id].attr("#EXT-X-MEDIA-SEQUENCE"))
            .and_then(|v| v.parse().ok())
    }

    /// Segment (`ExtInf`) elements in order.
    pub fn segments(&self) -> Vec<ElementId> {
        self.find_all(kinds::EXT_INF)
    }

    /// Variant stream (`StreamInf`) elements in order.
    pub fn variants(&self) -> Vec<ElementId> {
        self.find_all(kinds::STREAM_INF)
    }

    /// First segment whose URI equals `uri`.
    pub fn find_segment(&self, uri: &str) -> Option<ElementId> {
        self.ids()
            .find(|id| self[*id].is(kinds::EXT_INF) && self[*id].uri() == Some(uri))
    }
}

impl Index<ElementId> for Playlist {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.nodes[id.0].element
    }
}

impl IndexMut<ElementId> for Playlist {
    fn index_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0].element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> Element {
        Element::with_value(kinds::COMMENT, "Comment", text)
    }

    fn texts(p: &Playlist) -> Vec<String> {
        p.iter()
            .map(|e| e.attr("Comment").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_append_links_neighbors() {
        let mut p = Playlist::new();
        let a = p.append(comment("a"));
        let b = p.append(comment("b"));
        let c = p.append(comment("c"));

        assert_eq!(p.head(), Some(a));
        assert_eq!(p.tail(), Some(c));
        assert_eq!(p.prev(a), None);
        assert_eq!(p.next(c), None);
        assert_eq!(p.next(a), Some(b));
        assert_eq!(p.prev(c), Some(b));
        assert_eq!(texts(&p), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_before_head_and_after_tail() {
        let mut p = Playlist::new();
        let a = p.append(comment("a"));

        let first = p.insert_before(a, comment("first")).unwrap();
        assert_eq!(p.head(), Some(first));
        assert_eq!(p.prev(first), None);

        let last = p.insert_after(a, comment("last")).unwrap();
        assert_eq!(p.tail(), Some(last));
        assert_eq!(p.next(last), None);

        assert_eq!(texts(&p), vec!["first", "a", "last"]);
    }

    #[test]
    fn test_insert_between_requires_adjacent() {
        let mut p = Playlist::new();
        let a = p.append(comment("a"));
        let b = p.append(comment("b"));
        let c = p.append(comment("c"));

        assert!(p.insert_between(a, c, comment("x")).is_none());
        assert_eq!(p.len(), 3);

        let x = p.insert_between(b, c, comment("x")).unwrap();
        assert_eq!(p.prev(x), Some(b));
        assert_eq!(p.next(x), Some(c));
        assert_eq!(texts(&p), vec!["a", "b", "x", "c"]);
    }

    #[test]
    fn test_insert_with_foreign_anchor() {
        let mut other = Playlist::new();
        other.append(comment("a"));
        let far = other.append(comment("b"));

        let mut p = Playlist::new();
        assert!(p.insert_after(far, comment("x")).is_none());
        assert!(p.insert_before(far, comment("x")).is_none());
        assert!(p.is_empty());
    }

    #[test]
    fn test_find_is_idempotent() {
        let mut p = Playlist::new();
        p.append(Element::new(kinds::M3U8_IDENTIFIER));
        p.append(comment("a"));
        p.append(comment("b"));

        assert_eq!(p.find(kinds::COMMENT), p.find(kinds::COMMENT));
        assert_eq!(p.find_all(kinds::COMMENT), p.find_all(kinds::COMMENT));
        assert_eq!(p.find_all(kinds::COMMENT).len(), 2);
        assert!(p.find(kinds::VERSION).is_none());
        assert!(p.find_all(kinds::VERSION).is_empty());
    }

    #[test]
    fn test_modify_range_open_interval() {
        let mut p = Playlist::new();
        for t in ["a", "start", "b", "c", "end", "d"] {
            p.append(comment(t));
        }

        p.modify_range(
            |e| e.attr("Comment") == Some("start"),
            |e| e.attr("Comment") == Some("end"),
            |e| {
                let upper = e.attrs["Comment"].to_uppercase();
                e.attrs.insert("Comment".to_string(), upper);
            },
        )
        .unwrap();

        assert_eq!(texts(&p), vec!["a", "start", "B", "C", "end", "d"]);
    }

    #[test]
    fn test_modify_range_start_not_found() {
        let mut p = Playlist::new();
        p.append(comment("a"));
        let before = texts(&p);

        let err = p
            .modify_range(|_| false, |_| true, |e| e.uri = Some("x".into()))
            .unwrap_err();
        assert_eq!(err, RangeError::StartNotFound);
        assert_eq!(texts(&p), before);
        assert!(p.iter().all(|e| e.uri.is_none()));
    }

    #[test]
    fn test_modify_range_end_not_found_leaves_playlist_unchanged() {
        let mut p = Playlist::new();
        for t in ["start", "a", "b"] {
            p.append(comment(t));
        }

        let err = p
            .modify_range(
                |e| e.attr("Comment") == Some("start"),
                |e| e.attr("Comment") == Some("end"),
                |e| e.uri = Some("touched".into()),
            )
            .unwrap_err();
        assert_eq!(err, RangeError::EndNotFound);
        assert!(p.iter().all(|e| e.uri.is_none()));
    }

    #[test]
    fn test_modify_range_end_search_starts_after_start() {
        let mut p = Playlist::new();
        for t in ["both", "a", "both"] {
            p.append(comment(t));
        }
        let mut touched = 0;
        p.modify_range(
            |e| e.attr("Comment") == Some("both"),
            |e| e.attr("Comment") == Some("both"),
            |_| touched += 1,
        )
        .unwrap();
        assert_eq!(touched, 1);
    }

    #[test]
    fn test_queries() {
        let mut p = Playlist::new();
        p.append(Element::with_value(kinds::VERSION, "#EXT-X-VERSION", "4"));
        p.append(Element::with_value(kinds::MEDIA_SEQUENCE, "#EXT-X-MEDIA-SEQUENCE", "100"));
        let mut seg = Element::with_value(kinds::EXT_INF, "Duration", "4");
        seg.uri = Some("a.ts".into());
        let a = p.append(seg.clone());
        seg.uri = Some("b.ts".into());
        let b = p.append(seg);

        assert_eq!(p.version_value(), Some(4));
        assert_eq!(p.media_sequence_value(), Some(100));
        assert_eq!(p.segments(), vec![a, b]);
        assert!(p.variants().is_empty());
        assert_eq!(p.find_segment("b.ts"), Some(b));
        assert_eq!(p.find_segment("c.ts"), None);
    }
}
