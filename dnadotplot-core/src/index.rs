//! Window index over a reference sequence
//!
//! Maps the exact content of every length-W window to the ordered start
//! offsets producing it. Windows up to 32 bases are keyed by their 2-bit
//! packed content built with a rolling scan; longer windows are keyed by the
//! borrowed slice itself. Windows holding `N` are never indexed since they
//! cannot match.

use std::collections::HashMap;

use crate::error::{DotPlotError, Result};
use crate::nucleotide::{pack_window, CleanWindows, PackedWindows, MAX_PACKED_WINDOW};
use crate::sequence::Sequence;

enum Table<'a> {
    Packed(HashMap<u64, Vec<usize>>),
    Raw(HashMap<&'a [u8], Vec<usize>>),
}

/// Read-only lookup from window content to reference offsets
pub struct WindowIndex<'a> {
    reference: &'a Sequence,
    window: usize,
    table: Table<'a>,
    indexed: usize,
}

impl<'a> WindowIndex<'a> {
    /// Index every window of `reference`.
    ///
    /// Fails with `InvalidConfiguration` for a zero window and with
    /// `WindowTooLarge` when the window is longer than the reference.
    pub fn build(reference: &'a Sequence, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(DotPlotError::invalid_config("window length must be > 0"));
        }
        if window > reference.len() {
            return Err(DotPlotError::WindowTooLarge {
                window,
                length: reference.len(),
                sequence: reference.id.clone(),
            });
        }

        let seq = reference.as_bytes();
        let mut indexed = 0usize;
        let table = if window <= MAX_PACKED_WINDOW {
            let mut map: HashMap<u64, Vec<usize>> = HashMap::new();
            for (offset, forward, _) in PackedWindows::new(seq, window) {
                map.entry(forward).or_default().push(offset);
                indexed += 1;
            }
            Table::Packed(map)
        } else {
            let mut map: HashMap<&'a [u8], Vec<usize>> = HashMap::new();
            for (offset, content) in CleanWindows::new(seq, window) {
                map.entry(content).or_default().push(offset);
                indexed += 1;
            }
            Table::Raw(map)
        };

        let index = Self {
            reference,
            window,
            table,
            indexed,
        };
        log::debug!(
            "Indexed {} of {} windows of {} ({} distinct, W={})",
            index.indexed,
            reference.window_count(window),
            reference.id,
            index.distinct_windows(),
            window
        );
        Ok(index)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn reference(&self) -> &'a Sequence {
        self.reference
    }

    /// Whether lookups use packed keys
    pub fn is_packed(&self) -> bool {
        matches!(self.table, Table::Packed(_))
    }

    /// Number of windows inserted (N-free windows)
    pub fn indexed_windows(&self) -> usize {
        self.indexed
    }

    /// Number of distinct window contents
    pub fn distinct_windows(&self) -> usize {
        match &self.table {
            Table::Packed(map) => map.len(),
            Table::Raw(map) => map.len(),
        }
    }

    /// Offsets of windows with exactly this content, in increasing order.
    /// Contents of the wrong length or holding `N` have no offsets.
    pub fn lookup(&self, content: &[u8]) -> &[usize] {
        if content.len() != self.window {
            return &[];
        }
        match &self.table {
            Table::Packed(map) => match pack_window(content) {
                Some(key) => self.lookup_packed_in(map, key),
                None => &[],
            },
            Table::Raw(map) => map.get(content).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Lookup by packed content. Always empty for slice-keyed indexes.
    pub fn lookup_packed(&self, key: u64) -> &[usize] {
        match &self.table {
            Table::Packed(map) => self.lookup_packed_in(map, key),
            Table::Raw(_) => &[],
        }
    }

    fn lookup_packed_in<'m>(&self, map: &'m HashMap<u64, Vec<usize>>, key: u64) -> &'m [usize] {
        map.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest number of offsets sharing one window content
    pub fn max_multiplicity(&self) -> usize {
        match &self.table {
            Table::Packed(map) => map.values().map(Vec::len).max().unwrap_or(0),
            Table::Raw(map) => map.values().map(Vec::len).max().unwrap_or(0),
        }
    }
}
