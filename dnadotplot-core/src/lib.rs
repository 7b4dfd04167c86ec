//! dnadotplot Core Library
//!
//! Sequence loading, window indexing, exact match finding and coordinate
//! mapping for DNA dot plots.

pub mod coords;
pub mod error;
pub mod index;
pub mod matcher;
pub mod nucleotide;
pub mod params;
pub mod sequence;
pub mod types;

// Re-export commonly used types and functions
pub use coords::{
    canvas_extent, map_offset, AxisScale, CanvasGeometry, CanvasPoint, MAX_CANVAS_CELLS,
};
pub use error::{DotPlotError, Result};
pub use index::WindowIndex;
pub use matcher::{find_matches, find_self_matches, Matches};
pub use params::ComparisonParams;
pub use sequence::{load_sequence, read_sequence, AlphabetPolicy, Sequence};
pub use types::{Match, MatchSummary, Orientation};

/// Version information for the dnadotplot core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
