/*!
# dnadotplot Rendering

Collects canvas points into per-orientation occupancy grids and encodes them
as a raster PNG or a vector SVG. Both encodings place a cell at identical
canvas coordinates; the output file is replaced atomically.
*/

use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use bitvec::vec::BitVec;
use dnadotplot_core::{CanvasGeometry, CanvasPoint, DotPlotError, Match, Orientation, Result};
use image::ImageError;
use tempfile::NamedTempFile;

pub mod raster;
pub mod vector;

/// An opaque sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const GREY: Color = Color::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DotPlotError::invalid_config(format!(
                "invalid colour {:?}, expected #rrggbb",
                s
            )));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        Ok(Self::new(channel(0), channel(2), channel(4)))
    }
}

impl FromStr for Color {
    type Err = DotPlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb([color.r, color.g, color.b])
    }
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Svg => write!(f, "SVG"),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub background: Color,
    pub forward_color: Color,
    pub reverse_color: Color,
    /// Raster dot half-width in pixels; 0 paints a single pixel
    pub dot_radius: u32,
    /// SVG circle radius in canvas units
    pub point_radius: f64,
    /// Draw axes, ticks and titles around the SVG plot
    pub axes: bool,
    pub x_title: String,
    pub y_title: String,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            forward_color: Color::BLACK,
            reverse_color: Color::GREY,
            dot_radius: 0,
            point_radius: 0.8,
            axes: false,
            x_title: "first sequence".to_string(),
            y_title: "second sequence".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12,
        }
    }
}

impl ExportConfig {
    pub fn color_for(&self, orientation: Orientation) -> Color {
        match orientation {
            Orientation::Forward => self.forward_color,
            Orientation::ReverseComplement => self.reverse_color,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.point_radius.is_finite() || self.point_radius <= 0.0 {
            return Err(DotPlotError::invalid_config(format!(
                "SVG point radius must be a positive number, got {}",
                self.point_radius
            )));
        }
        Ok(())
    }
}

/// Occupied canvas cells, one bitmap per orientation.
///
/// Memory is bounded by the canvas area; repeated points collapse.
#[derive(Debug, Clone)]
pub struct DotGrid {
    geometry: CanvasGeometry,
    forward: BitVec,
    reverse: BitVec,
}

impl DotGrid {
    pub fn new(geometry: CanvasGeometry) -> Self {
        let cells = geometry.width() as usize * geometry.height() as usize;
        Self {
            geometry,
            forward: BitVec::repeat(false, cells),
            reverse: BitVec::repeat(false, cells),
        }
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    pub fn width(&self) -> u32 {
        self.geometry.width()
    }

    pub fn height(&self) -> u32 {
        self.geometry.height()
    }

    /// Mark a cell. Points outside the canvas are ignored and reported as `false`.
    pub fn insert(&mut self, point: CanvasPoint) -> bool {
        if point.x >= self.width() || point.y >= self.height() {
            log::trace!("Dropping point outside canvas: {:?}", point);
            return false;
        }
        let cell = point.y as usize * self.width() as usize + point.x as usize;
        match point.orientation {
            Orientation::Forward => self.forward.set(cell, true),
            Orientation::ReverseComplement => self.reverse.set(cell, true),
        }
        true
    }

    pub fn insert_match(&mut self, m: &Match) -> bool {
        let point = self.geometry.map(m);
        self.insert(point)
    }

    pub fn contains(&self, x: u32, y: u32, orientation: Orientation) -> bool {
        if x >= self.width() || y >= self.height() {
            return false;
        }
        let cell = y as usize * self.width() as usize + x as usize;
        self.layer(orientation)[cell]
    }

    /// Number of occupied cells for one orientation
    pub fn count(&self, orientation: Orientation) -> usize {
        self.layer(orientation).count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.not_any() && self.reverse.not_any()
    }

    /// Occupied cells of one orientation in row-major order
    pub fn cells(&self, orientation: Orientation) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width() as usize;
        self.layer(orientation)
            .iter_ones()
            .map(move |cell| ((cell % width) as u32, (cell / width) as u32))
    }

    fn layer(&self, orientation: Orientation) -> &BitVec {
        match orientation {
            Orientation::Forward => &self.forward,
            Orientation::ReverseComplement => &self.reverse,
        }
    }
}

impl Extend<Match> for DotGrid {
    fn extend<I: IntoIterator<Item = Match>>(&mut self, iter: I) {
        for m in iter {
            self.insert_match(&m);
        }
    }
}

impl Extend<CanvasPoint> for DotGrid {
    fn extend<I: IntoIterator<Item = CanvasPoint>>(&mut self, iter: I) {
        for point in iter {
            self.insert(point);
        }
    }
}

/// Encode `grid` in memory. Encoder failures are reported against `-`.
pub fn encode(grid: &DotGrid, config: &ExportConfig, format: OutputFormat) -> Result<Vec<u8>> {
    encode_for(grid, config, format, Path::new("-"))
}

fn encode_for(
    grid: &DotGrid,
    config: &ExportConfig,
    format: OutputFormat,
    destination: &Path,
) -> Result<Vec<u8>> {
    config.validate()?;
    match format {
        OutputFormat::Png => {
            let image = raster::rasterize(grid, config);
            raster::encode_png(&image).map_err(|e| png_failure(destination, e))
        }
        OutputFormat::Svg => Ok(vector::render_svg(grid, config).into_bytes()),
    }
}

/// A PNG that cannot be produced is an output failure for `destination`
fn png_failure(destination: &Path, err: ImageError) -> DotPlotError {
    DotPlotError::output(destination, io::Error::new(io::ErrorKind::Other, err))
}

/// Render `grid` and atomically replace `path` with the result
pub fn render_to_file<P: AsRef<Path>>(
    grid: &DotGrid,
    config: &ExportConfig,
    format: OutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    log::debug!(
        "Rendering {}x{} {} ({} forward cells, {} reverse-complement cells)",
        grid.width(),
        grid.height(),
        format,
        grid.count(Orientation::Forward),
        grid.count(Orientation::ReverseComplement)
    );

    let bytes = encode_for(grid, config, format, path)?;
    write_atomic(path, &bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Write into a temporary file beside `path`, then rename it into place.
/// On failure the destination is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = temp_file_in(dir).map_err(|e| DotPlotError::output(path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| DotPlotError::output(path, e))?;
    tmp.persist(path)
        .map_err(|e| DotPlotError::output(path, e.error))?;
    Ok(())
}

// Same mode as `File::create` under the process umask, not tempfile's 0600
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .prefix(".dnadotplot")
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
