//! Nucleotide encoding and window scanning shared by the index and the
//! match finder.

/// Longest window that still packs into a single `u64`
pub const MAX_PACKED_WINDOW: usize = 32;

/// Encode a nucleotide to 2-bit representation
pub fn encode_nucleotide(nucleotide: u8) -> Option<u64> {
    match nucleotide {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// Get complement of a single nucleotide (N stays N)
pub fn complement_nucleotide(nucleotide: u8) -> u8 {
    match nucleotide {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}

/// Generate reverse complement of a sequence
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(sequence.len());
    reverse_complement_into(sequence, &mut out);
    out
}

/// Reverse complement into a reusable buffer
pub fn reverse_complement_into(sequence: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend(sequence.iter().rev().map(|&b| complement_nucleotide(b)));
}

/// Pack a window 2 bits per base, first base in the most significant position.
/// Returns `None` when the window is too long or holds a non-ACGT symbol.
pub fn pack_window(window: &[u8]) -> Option<u64> {
    if window.len() > MAX_PACKED_WINDOW {
        return None;
    }
    window
        .iter()
        .try_fold(0u64, |acc, &b| encode_nucleotide(b).map(|code| (acc << 2) | code))
}

/// Reverse complement of a packed window of length `k`
pub fn reverse_complement_packed(packed: u64, k: usize) -> u64 {
    let mut result = 0u64;
    let mut rest = packed;
    for _ in 0..k {
        let code = rest & 3;
        result = (result << 2) | (3 - code);
        rest >>= 2;
    }
    result
}

fn packed_mask(k: usize) -> u64 {
    if k >= MAX_PACKED_WINDOW {
        u64::MAX
    } else {
        (1u64 << (2 * k)) - 1
    }
}

/// Rolling scan over every N-free window of length `k` (k ≤ 32), yielding
/// the start offset together with the packed forward and reverse-complement
/// contents.
pub struct PackedWindows<'a> {
    sequence: &'a [u8],
    k: usize,
    mask: u64,
    rc_shift: u32,
    next: usize,
    valid: usize,
    forward: u64,
    reverse: u64,
}

impl<'a> PackedWindows<'a> {
    pub fn new(sequence: &'a [u8], k: usize) -> Self {
        debug_assert!(k > 0 && k <= MAX_PACKED_WINDOW);
        Self {
            sequence,
            k,
            mask: packed_mask(k),
            rc_shift: 2 * (k as u32 - 1),
            next: 0,
            valid: 0,
            forward: 0,
            reverse: 0,
        }
    }
}

impl Iterator for PackedWindows<'_> {
    type Item = (usize, u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.sequence.len() {
            let base = self.sequence[self.next];
            self.next += 1;

            match encode_nucleotide(base) {
                Some(code) => {
                    self.forward = ((self.forward << 2) | code) & self.mask;
                    self.reverse = (self.reverse >> 2) | ((3 - code) << self.rc_shift);
                    self.valid += 1;
                }
                None => {
                    // Reset on ambiguous nucleotide
                    self.valid = 0;
                    self.forward = 0;
                    self.reverse = 0;
                    continue;
                }
            }

            if self.valid >= self.k {
                return Some((self.next - self.k, self.forward, self.reverse));
            }
        }
        None
    }
}

/// Scan over every N-free window of length `k`, yielding borrowed slices
pub struct CleanWindows<'a> {
    sequence: &'a [u8],
    k: usize,
    next: usize,
    valid: usize,
}

impl<'a> CleanWindows<'a> {
    pub fn new(sequence: &'a [u8], k: usize) -> Self {
        debug_assert!(k > 0);
        Self {
            sequence,
            k,
            next: 0,
            valid: 0,
        }
    }
}

impl<'a> Iterator for CleanWindows<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.sequence.len() {
            let base = self.sequence[self.next];
            self.next += 1;

            if encode_nucleotide(base).is_none() {
                self.valid = 0;
                continue;
            }
            self.valid += 1;

            if self.valid >= self.k {
                let start = self.next - self.k;
                return Some((start, &self.sequence[start..self.next]));
            }
        }
        None
    }
}
