use std::fmt;

/// Orientation of a window match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Forward,
    ReverseComplement,
}

impl From<Orientation> for char {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Forward => '+',
            Orientation::ReverseComplement => '-',
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Forward => write!(f, "forward"),
            Orientation::ReverseComplement => write!(f, "reverse-complement"),
        }
    }
}

/// A window of the query starting at `query` matches a window of the
/// reference starting at `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Match {
    pub query: usize,
    pub reference: usize,
    pub orientation: Orientation,
}

impl Match {
    pub fn new(query: usize, reference: usize, orientation: Orientation) -> Self {
        Self {
            query,
            reference,
            orientation,
        }
    }

    pub fn forward(query: usize, reference: usize) -> Self {
        Self::new(query, reference, Orientation::Forward)
    }

    pub fn reverse_complement(query: usize, reference: usize) -> Self {
        Self::new(query, reference, Orientation::ReverseComplement)
    }
}

/// Running totals over a match stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub forward: u64,
    pub reverse_complement: u64,
}

impl MatchSummary {
    pub fn record(&mut self, m: &Match) {
        match m.orientation {
            Orientation::Forward => self.forward += 1,
            Orientation::ReverseComplement => self.reverse_complement += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.forward + self.reverse_complement
    }
}
