// WHY: single offset primitive shared by predictors, tokenizers and the reconciler
// All downstream invariants (ordering, non-overlap, tiling) are stated over Span

use serde::{Deserialize, Serialize};

/// Half-open byte interval `[start, end)` into an owning text.
///
/// Offsets are absolute positions in the owning text unless a function
/// explicitly documents them as local to a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span. Callers must uphold `end >= start`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span end {end} before start {start}");
        Self { start, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True for zero-length spans.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if `pos` falls inside the half-open interval.
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// True if `other` lies entirely within this span.
    pub fn contains_span(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// True if the two spans share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `other` starts exactly where this span ends.
    pub fn adjacent(&self, other: &Span) -> bool {
        self.end == other.start
    }

    /// Same-length span moved right by `offset` bytes.
    pub fn shifted(&self, offset: usize) -> Span {
        Span::new(self.start + offset, self.end + offset)
    }

    /// Well-formed with respect to a text of `text_len` bytes.
    pub fn in_bounds(&self, text_len: usize) -> bool {
        self.end >= self.start && self.end <= text_len
    }
}
