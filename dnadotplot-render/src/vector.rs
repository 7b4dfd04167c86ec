/*!
# SVG Export

One `<circle>` per occupied canvas cell, centred in the cell. The plot
viewport always has `viewBox="0 0 width height"` so circle coordinates match
raster pixel coordinates. With axes enabled the plot viewport is nested in a
larger document that carries the frame, ticks and titles.
*/

use dnadotplot_core::{AxisScale, Orientation};

use crate::{DotGrid, ExportConfig};

/// Space around the plot for ticks and titles
const AXIS_MARGIN: f64 = 80.0;
const DESIRED_TICKS: usize = 8;

/// Render the grid as a complete SVG document
pub fn render_svg(grid: &DotGrid, config: &ExportConfig) -> String {
    let mut svg = SvgBuilder::new(grid, config);
    svg.add_style();
    svg.add_background();
    if config.axes {
        svg.add_axes();
    }
    svg.render_points();
    svg.finish()
}

struct SvgBuilder<'a> {
    grid: &'a DotGrid,
    config: &'a ExportConfig,
    margin: f64,
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl<'a> SvgBuilder<'a> {
    fn new(grid: &'a DotGrid, config: &'a ExportConfig) -> Self {
        let margin = if config.axes { AXIS_MARGIN } else { 0.0 };
        Self {
            grid,
            config,
            margin,
            width: grid.width() as f64 + 2.0 * margin,
            height: grid.height() as f64 + 2.0 * margin,
            elements: Vec::new(),
        }
    }

    fn add_style(&mut self) {
        let mut css = vec![
            format!(".forward {{ fill: {}; }}", self.config.forward_color),
            format!(".reverse-complement {{ fill: {}; }}", self.config.reverse_color),
        ];
        if self.config.axes {
            css.push(format!(
                ".label {{ font-family: {}; font-size: {}px; fill: #000000; }}",
                self.config.font_family, self.config.font_size
            ));
            css.push(format!(
                ".title {{ font-family: {}; font-size: {}px; fill: #000000; text-anchor: middle; }}",
                self.config.font_family,
                self.config.font_size + 2
            ));
        }
        self.elements.push("<style>".to_string());
        for rule in css {
            self.elements.push(format!("  {}", rule));
        }
        self.elements.push("</style>".to_string());
    }

    fn add_background(&mut self) {
        self.elements.push(format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, self.config.background
        ));
    }

    fn add_axes(&mut self) {
        let left = self.margin;
        let top = self.margin;
        let plot_w = self.grid.width() as f64;
        let plot_h = self.grid.height() as f64;
        let right = left + plot_w;
        let bottom = top + plot_h;

        // Frame
        self.elements.push(format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#000000" stroke-width="1"/>"##,
            left, top, plot_w, plot_h
        ));

        // X axis (first sequence) along the bottom edge
        let x_axis = self.grid.geometry().x;
        for (pos, offset) in axis_ticks(&x_axis) {
            let x = left + offset;
            self.elements.push(format!(
                r##"<line x1="{:.1}" y1="{}" x2="{:.1}" y2="{}" stroke="#000000" stroke-width="1"/>"##,
                x, bottom, x, bottom + 5.0
            ));
            self.elements.push(format!(
                r#"<text x="{:.1}" y="{}" class="label" text-anchor="middle">{}</text>"#,
                x,
                bottom + 20.0,
                format_bp(pos)
            ));
        }

        // Y axis (second sequence) along the left edge, growing downward
        let y_axis = self.grid.geometry().y;
        for (pos, offset) in axis_ticks(&y_axis) {
            let y = top + offset;
            self.elements.push(format!(
                r##"<line x1="{}" y1="{:.1}" x2="{}" y2="{:.1}" stroke="#000000" stroke-width="1"/>"##,
                left - 5.0,
                y,
                left,
                y
            ));
            self.elements.push(format!(
                r#"<text x="{}" y="{:.1}" class="label" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                left - 10.0,
                y,
                format_bp(pos)
            ));
        }

        let x_title_y = bottom + self.margin / 2.0 + 10.0;
        self.elements.push(format!(
            r#"<text x="{}" y="{}" class="title">{}</text>"#,
            (left + right) / 2.0,
            x_title_y,
            escape_xml(&self.config.x_title)
        ));
        let y_title_x = self.margin / 4.0;
        let y_mid = (top + bottom) / 2.0;
        self.elements.push(format!(
            r#"<text x="{}" y="{}" class="title" transform="rotate(-90 {} {})">{}</text>"#,
            y_title_x,
            y_mid,
            y_title_x,
            y_mid,
            escape_xml(&self.config.y_title)
        ));
    }

    fn render_points(&mut self) {
        let (w, h) = (self.grid.width(), self.grid.height());
        let nested = self.config.axes;
        if nested {
            self.elements.push(format!(
                r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
                self.margin, self.margin, w, h, w, h
            ));
        }

        for orientation in [Orientation::Forward, Orientation::ReverseComplement] {
            self.elements.push(format!(r#"<g class="{}">"#, orientation));
            for (x, y) in self.grid.cells(orientation) {
                self.elements.push(format!(
                    r#"  <circle cx="{}" cy="{}" r="{}"/>"#,
                    x as f64 + 0.5,
                    y as f64 + 0.5,
                    self.config.point_radius
                ));
            }
            self.elements.push("</g>".to_string());
        }

        if nested {
            self.elements.push("</svg>".to_string());
        }
    }

    fn finish(self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<svg width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
            self.width, self.height, self.width, self.height
        ));
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Tick positions in sequence coordinates paired with their canvas offset
fn axis_ticks(axis: &AxisScale) -> Vec<(f64, f64)> {
    if axis.seq_len == 0 {
        return Vec::new();
    }
    let seq_len = axis.seq_len as f64;
    let scale = axis.canvas_size as f64 / seq_len;
    nice_ticks(0.0, seq_len, DESIRED_TICKS)
        .into_iter()
        .map(|pos| (pos, pos * scale))
        .collect()
}

// Format a basepair length in human-friendly units
fn format_bp(bp: f64) -> String {
    if bp >= 1e9 {
        format!("{:.2} Gb", bp / 1e9)
    } else if bp >= 1e6 {
        format!("{:.2} Mb", bp / 1e6)
    } else if bp >= 1e3 {
        format!("{:.2} kb", bp / 1e3)
    } else {
        format!("{:.0}", bp)
    }
}

// Round a length to a "nice" number: 1, 2, or 5 × 10^k
fn nice_round_length(x: f64) -> f64 {
    if x <= 1.0 {
        return 1.0;
    }
    let exp = x.log10().floor();
    let base = 10f64.powf(exp);
    let mant = x / base;
    let nice = if mant <= 1.0 {
        1.0
    } else if mant <= 2.0 {
        2.0
    } else if mant <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

fn nice_ticks(min: f64, max: f64, desired: usize) -> Vec<f64> {
    let span = (max - min).max(1.0);
    let step = nice_round_length(span / desired.max(1) as f64);
    let mut ticks = Vec::new();
    // Start at the first multiple of step >= min
    let mut i = (min / step).ceil() as i64;
    loop {
        let v = i as f64 * step;
        if v > max {
            break;
        }
        ticks.push(v);
        i += 1;
    }
    ticks
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
