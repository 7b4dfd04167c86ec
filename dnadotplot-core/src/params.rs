use crate::coords::CanvasGeometry;
use crate::error::{DotPlotError, Result};
use crate::sequence::Sequence;

/// Parameters of one pairwise comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonParams {
    /// Window length W
    pub window: usize,
    /// Canvas cells per sequence position
    pub width_ratio: f64,
    /// Also report reverse-complement matches
    pub reverse_complement: bool,
    /// Size both axes from the longer sequence
    pub square: bool,
}

impl Default for ComparisonParams {
    fn default() -> Self {
        Self {
            window: 10,
            width_ratio: 1.0,
            reverse_complement: false,
            square: false,
        }
    }
}

impl ComparisonParams {
    /// Check values that do not depend on the sequences
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(DotPlotError::invalid_config("window length must be > 0"));
        }
        if !self.width_ratio.is_finite() || self.width_ratio <= 0.0 {
            return Err(DotPlotError::invalid_config(format!(
                "width ratio must be a positive number, got {}",
                self.width_ratio
            )));
        }
        Ok(())
    }

    /// Fail with `WindowTooLarge` when `sequence` has no window of length W
    pub fn check_window(&self, sequence: &Sequence, label: &str) -> Result<()> {
        if self.window > sequence.len() {
            return Err(DotPlotError::WindowTooLarge {
                window: self.window,
                length: sequence.len(),
                sequence: format!("{} ({})", label, sequence.id),
            });
        }
        Ok(())
    }

    /// Canvas geometry for a query of `query_len` against a reference of `reference_len`
    pub fn geometry(&self, query_len: usize, reference_len: usize) -> Result<CanvasGeometry> {
        if self.square {
            CanvasGeometry::square(query_len, reference_len, self.width_ratio)
        } else {
            CanvasGeometry::new(query_len, reference_len, self.width_ratio)
        }
    }
}
