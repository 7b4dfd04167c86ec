//! Match finder
//!
//! Streams every (query offset, reference offset, orientation) triple whose
//! windows are identical, or identical after reverse-complementing the query
//! window. The reverse complement is a transform applied at lookup time; the
//! single index over the reference serves both orientations.
//!
//! Matches are produced lazily so peak memory stays bounded by the index.
//! Note that the number of matches is inherently quadratic for highly
//! repetitive inputs (a run of n identical bases yields ~n² matches), so
//! callers should consume the stream rather than collect it.

use crate::index::WindowIndex;
use crate::nucleotide::{reverse_complement_into, CleanWindows, PackedWindows};
use crate::sequence::Sequence;
use crate::types::{Match, MatchSummary, Orientation};

const NO_OFFSETS: &[usize] = &[];

enum QueryWindows<'q> {
    Packed(PackedWindows<'q>),
    Raw(CleanWindows<'q>),
}

/// Lazy stream of matches between a query and an indexed reference
pub struct Matches<'i, 'q> {
    index: &'i WindowIndex<'i>,
    windows: QueryWindows<'q>,
    reverse_complement: bool,
    rc_buffer: Vec<u8>,
    query_offset: usize,
    forward: std::slice::Iter<'i, usize>,
    reverse: std::slice::Iter<'i, usize>,
    summary: MatchSummary,
}

/// Stream all matches of `query` windows against `index`.
///
/// A query shorter than the window yields an empty stream.
pub fn find_matches<'i, 'q>(
    query: &'q Sequence,
    index: &'i WindowIndex<'i>,
    reverse_complement: bool,
) -> Matches<'i, 'q> {
    let bytes = query.as_bytes();
    let windows = if index.is_packed() {
        QueryWindows::Packed(PackedWindows::new(bytes, index.window()))
    } else {
        QueryWindows::Raw(CleanWindows::new(bytes, index.window()))
    };

    Matches {
        index,
        windows,
        reverse_complement,
        rc_buffer: Vec::with_capacity(index.window()),
        query_offset: 0,
        forward: NO_OFFSETS.iter(),
        reverse: NO_OFFSETS.iter(),
        summary: MatchSummary::default(),
    }
}

/// Self-comparison: the indexed reference doubles as the query
pub fn find_self_matches<'i>(index: &'i WindowIndex<'i>, reverse_complement: bool) -> Matches<'i, 'i> {
    find_matches(index.reference(), index, reverse_complement)
}

impl<'i, 'q> Matches<'i, 'q> {
    /// Counts of matches yielded so far
    pub fn summary(&self) -> MatchSummary {
        self.summary
    }

    /// Move to the next N-free query window. Returns `None` once exhausted.
    fn advance(&mut self) -> Option<()> {
        let index = self.index;
        match &mut self.windows {
            QueryWindows::Packed(windows) => {
                let (offset, forward, reverse) = windows.next()?;
                self.query_offset = offset;
                self.forward = index.lookup_packed(forward).iter();
                self.reverse = if self.reverse_complement {
                    index.lookup_packed(reverse).iter()
                } else {
                    NO_OFFSETS.iter()
                };
            }
            QueryWindows::Raw(windows) => {
                let (offset, content) = windows.next()?;
                self.query_offset = offset;
                self.forward = index.lookup(content).iter();
                self.reverse = if self.reverse_complement {
                    reverse_complement_into(content, &mut self.rc_buffer);
                    index.lookup(&self.rc_buffer).iter()
                } else {
                    NO_OFFSETS.iter()
                };
            }
        }
        Some(())
    }

    fn emit(&mut self, reference: usize, orientation: Orientation) -> Match {
        let m = Match::new(self.query_offset, reference, orientation);
        self.summary.record(&m);
        m
    }
}

impl Iterator for Matches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(&reference) = self.forward.next() {
                return Some(self.emit(reference, Orientation::Forward));
            }
            if let Some(&reference) = self.reverse.next() {
                return Some(self.emit(reference, Orientation::ReverseComplement));
            }
            self.advance()?;
        }
    }
}
