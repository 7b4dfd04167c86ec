use std::collections::BTreeSet;

use dnadotplot_core::{
    find_self_matches, AlphabetPolicy, CanvasGeometry, DotPlotError, Orientation, Sequence,
    WindowIndex,
};
use dnadotplot_render::{encode, render_to_file, DotGrid, ExportConfig, OutputFormat};

fn demo_grid(reverse_complement: bool) -> DotGrid {
    let bytes = b"ATCGGCTAAGTCCGATTAGCCGATACGTTAGGCATCGGCTAAGTCAATTGGCCTAGGACTTAGCCGATGCATGCATCGAGCTAG";
    let sequence = Sequence::from_bytes("demo", bytes, AlphabetPolicy::Mask).unwrap();
    let index = WindowIndex::build(&sequence, 4).unwrap();
    let geometry = CanvasGeometry::new(sequence.len(), sequence.len(), 0.5).unwrap();

    let mut grid = DotGrid::new(geometry);
    grid.extend(find_self_matches(&index, reverse_complement));
    grid
}

fn svg_circles(svg: &str) -> (BTreeSet<(u32, u32)>, BTreeSet<(u32, u32)>) {
    let split = svg
        .find(r#"<g class="reverse-complement">"#)
        .expect("reverse-complement group");
    let parse = |part: &str| -> BTreeSet<(u32, u32)> {
        part.lines()
            .filter_map(|line| line.trim().strip_prefix("<circle cx=\""))
            .map(|rest| {
                let mut fields = rest.split('"');
                let cx: f64 = fields.next().unwrap().parse().unwrap();
                fields.next(); // ` cy=`
                let cy: f64 = fields.next().unwrap().parse().unwrap();
                ((cx - 0.5) as u32, (cy - 0.5) as u32)
            })
            .collect()
    };
    (parse(&svg[..split]), parse(&svg[split..]))
}

#[test]
fn png_and_svg_place_points_identically() {
    let grid = demo_grid(true);
    let config = ExportConfig::default();
    assert!(grid.count(Orientation::Forward) > 0);
    assert!(grid.count(Orientation::ReverseComplement) > 0);

    let png = encode(&grid, &config, OutputFormat::Png).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (grid.width(), grid.height()));

    let svg = String::from_utf8(encode(&grid, &config, OutputFormat::Svg).unwrap()).unwrap();
    let (forward, reverse) = svg_circles(&svg);

    let mut painted_forward = BTreeSet::new();
    let mut painted_reverse = BTreeSet::new();
    for (x, y, pixel) in img.enumerate_pixels() {
        match pixel.0 {
            [255, 255, 255] => {}
            [0, 0, 0] => {
                painted_forward.insert((x, y));
            }
            [128, 128, 128] => {
                painted_reverse.insert((x, y));
            }
            other => panic!("unexpected colour {:?} at ({}, {})", other, x, y),
        }
    }

    // Reverse-complement dots cover forward dots sharing a cell
    assert_eq!(painted_reverse, reverse);
    let visible_forward: BTreeSet<(u32, u32)> = forward.difference(&reverse).copied().collect();
    assert_eq!(painted_forward, visible_forward);
}

#[test]
fn identity_diagonal_is_drawn() {
    let grid = demo_grid(false);
    for x in 0..grid.width() {
        // The last few cells lie beyond the final window
        if x + 2 < grid.width() {
            assert!(grid.contains(x, x, Orientation::Forward), "cell {}", x);
        }
    }
}

#[test]
fn renders_are_deterministic() {
    let grid = demo_grid(true);
    let config = ExportConfig {
        axes: true,
        ..Default::default()
    };
    let dir = tempfile::tempdir().unwrap();

    for (format, ext) in [(OutputFormat::Png, "png"), (OutputFormat::Svg, "svg")] {
        let f1 = dir.path().join(format!("a.{}", ext));
        let f2 = dir.path().join(format!("b.{}", ext));
        render_to_file(&grid, &config, format, &f1).unwrap();
        render_to_file(&grid, &config, format, &f2).unwrap();
        assert_eq!(
            std::fs::read(&f1).unwrap(),
            std::fs::read(&f2).unwrap(),
            "{} bytes differ between identical renders",
            format
        );
    }
}

#[test]
fn empty_grid_renders_background_only() {
    let grid = DotGrid::new(CanvasGeometry::new(40, 30, 1.0).unwrap());
    let config = ExportConfig::default();
    let dir = tempfile::tempdir().unwrap();

    let png_path = dir.path().join("empty.png");
    render_to_file(&grid, &config, OutputFormat::Png, &png_path).unwrap();
    let img = image::open(&png_path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (40, 30));
    assert!(img.pixels().all(|p| p.0 == [255, 255, 255]));

    let svg_path = dir.path().join("empty.svg");
    render_to_file(&grid, &config, OutputFormat::Svg, &svg_path).unwrap();
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains(r#"viewBox="0 0 40 30""#));
    assert!(!svg.contains("<circle"));
}

#[test]
fn existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.svg");
    std::fs::write(&path, "stale").unwrap();

    render_to_file(&demo_grid(false), &ExportConfig::default(), OutputFormat::Svg, &path).unwrap();
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<?xml"));

    // No temporary files left behind
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn missing_directory_is_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("plot.png");

    let err = render_to_file(&demo_grid(false), &ExportConfig::default(), OutputFormat::Png, &path)
        .unwrap_err();
    assert!(matches!(err, DotPlotError::OutputWriteFailure { .. }));
    assert!(!path.exists());
}

#[test]
fn failed_rename_leaves_destination_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.png");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep.txt"), "keep").unwrap();

    let err = render_to_file(&demo_grid(false), &ExportConfig::default(), OutputFormat::Png, &path)
        .unwrap_err();
    assert!(matches!(err, DotPlotError::OutputWriteFailure { .. }));
    assert!(path.is_dir());
    assert_eq!(std::fs::read_to_string(path.join("keep.txt")).unwrap(), "keep");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn output_mode_matches_plain_file_creation() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    std::fs::write(&plain, "plain").unwrap();
    let expected = std::fs::metadata(&plain).unwrap().permissions().mode() & 0o777;

    for (format, name) in [(OutputFormat::Png, "plot.png"), (OutputFormat::Svg, "plot.svg")] {
        let path = dir.path().join(name);
        render_to_file(&demo_grid(false), &ExportConfig::default(), format, &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected, "{} mode {:o}, plain file mode {:o}", name, mode, expected);
    }
}
