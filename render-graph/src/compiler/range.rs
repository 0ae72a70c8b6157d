//! Closed intervals over execution-order indices.

/// Closed interval `[start, end]` of execution-order indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: usize,
    end: usize,
}

impl Range {
    /// Creates a range, or `None` if `start > end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Range covering a single index.
    pub fn point(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Range covering both indices, in whichever order they are given.
    pub fn span(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Never true: a range covers at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Closed-interval overlap: `max(starts) <= min(ends)`.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &Range) -> Range {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Smallest range covering `self` and `index`.
    pub fn extended(&self, index: usize) -> Range {
        self.union(&Range::point(index))
    }

    /// Envelope of a set of indices, or `None` if it is empty.
    pub fn envelope(indices: impl IntoIterator<Item = usize>) -> Option<Range> {
        let mut indices = indices.into_iter();
        let first = Range::point(indices.next()?);
        Some(indices.fold(first, |range, index| range.extended(index)))
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
