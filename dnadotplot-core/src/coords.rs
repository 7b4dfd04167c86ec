//! Coordinate mapping from sequence offsets to canvas cells
//!
//! An offset `pos` on an axis of sequence length `seq_len` and canvas extent
//! `canvas_size` lands on `floor(pos / seq_len * canvas_size + 0.5)`. The
//! half-cell bias keeps the mapping gap-free over the valid offset range and
//! must be kept for compatibility with earlier renderings.

use crate::error::{DotPlotError, Result};
use crate::types::{Match, Orientation};

/// Largest canvas, in cells, that a geometry may describe (16384 x 16384)
pub const MAX_CANVAS_CELLS: u64 = 1 << 28;

/// Map one offset to a canvas coordinate, clamped to the last cell
pub fn map_offset(pos: usize, seq_len: usize, canvas_size: u32) -> u32 {
    if seq_len == 0 || canvas_size == 0 {
        return 0;
    }
    let coord = (pos as f64 / seq_len as f64 * canvas_size as f64 + 0.5).floor();
    // Only the rounding bias on the final offsets can push past the edge
    (coord as u64).min(canvas_size as u64 - 1) as u32
}

/// Canvas extent for a sequence length and width ratio, at least one cell
pub fn canvas_extent(seq_len: usize, width_ratio: f64) -> u32 {
    let extent = (seq_len as f64 * width_ratio).round();
    extent.clamp(1.0, u32::MAX as f64) as u32
}

/// Scale of a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisScale {
    pub seq_len: usize,
    pub canvas_size: u32,
}

impl AxisScale {
    pub fn new(seq_len: usize, canvas_size: u32) -> Self {
        Self {
            seq_len,
            canvas_size,
        }
    }

    pub fn map(&self, pos: usize) -> u32 {
        map_offset(pos, self.seq_len, self.canvas_size)
    }
}

/// A match placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasPoint {
    pub x: u32,
    pub y: u32,
    pub orientation: Orientation,
}

/// Canvas extents and the sequence lengths mapped onto them.
///
/// The x axis carries the query (first sequence), the y axis the reference
/// (second sequence); y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl CanvasGeometry {
    /// Each axis sized from its own sequence length
    pub fn new(query_len: usize, reference_len: usize, width_ratio: f64) -> Result<Self> {
        validate_ratio(width_ratio)?;
        Self {
            x: AxisScale::new(query_len, canvas_extent(query_len, width_ratio)),
            y: AxisScale::new(reference_len, canvas_extent(reference_len, width_ratio)),
        }
        .within_budget()
    }

    /// Both axes sized from the longer sequence
    pub fn square(query_len: usize, reference_len: usize, width_ratio: f64) -> Result<Self> {
        validate_ratio(width_ratio)?;
        let side = canvas_extent(query_len.max(reference_len), width_ratio);
        Self {
            x: AxisScale::new(query_len, side),
            y: AxisScale::new(reference_len, side),
        }
        .within_budget()
    }

    pub fn width(&self) -> u32 {
        self.x.canvas_size
    }

    pub fn height(&self) -> u32 {
        self.y.canvas_size
    }

    pub fn map(&self, m: &Match) -> CanvasPoint {
        CanvasPoint {
            x: self.x.map(m.query),
            y: self.y.map(m.reference),
            orientation: m.orientation,
        }
    }

    /// Total number of cells on the canvas
    pub fn cells(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    // Rejected before any grid or image is allocated
    fn within_budget(self) -> Result<Self> {
        if self.cells() > MAX_CANVAS_CELLS {
            return Err(DotPlotError::invalid_config(format!(
                "canvas of {}x{} cells exceeds the limit of {} cells; lower the width ratio",
                self.width(),
                self.height(),
                MAX_CANVAS_CELLS
            )));
        }
        Ok(self)
    }
}

fn validate_ratio(width_ratio: f64) -> Result<()> {
    if !width_ratio.is_finite() || width_ratio <= 0.0 {
        return Err(DotPlotError::invalid_config(format!(
            "width ratio must be a positive number, got {}",
            width_ratio
        )));
    }
    Ok(())
}
