use anyhow::Result;
use clap::{ArgAction, Parser};
use dnadotplot_core::*;
use dnadotplot_render::{render_to_file, DotGrid, OutputFormat};
use std::path::PathBuf;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "dnadotplot")]
#[command(about = "dnadotplot - exact-window DNA dot plots")]
#[command(version)]
struct Cli {
    /// First sequence (FASTA, optionally gzipped), plotted along the x axis
    #[arg(short = '1', long = "first-file")]
    first_file: PathBuf,

    /// Second sequence, plotted along the y axis; omit for self-comparison
    #[arg(short = '2', long = "second-file")]
    second_file: Option<PathBuf>,

    /// Record id to read from the first file (default: first record)
    #[arg(short = 'f', long)]
    first_name: Option<String>,

    /// Record id to read from the second file, or from the first file when
    /// no second file is given
    #[arg(short = 's', long)]
    second_name: Option<String>,

    /// Window length
    #[arg(long)]
    window: usize,

    /// Canvas cells per sequence position
    #[arg(short = 'w', long)]
    width: f64,

    /// Also plot reverse-complement matches
    #[arg(short = 'r', long)]
    revcompl: bool,

    /// Write SVG instead of PNG
    #[arg(long)]
    svg: bool,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Reject symbols outside ACGTN instead of masking them to N
    #[arg(long)]
    strict_alphabet: bool,

    /// Size both axes from the longer sequence
    #[arg(long)]
    square: bool,

    /// Draw axes, ticks and sequence names around SVG output
    #[arg(long)]
    axes: bool,

    /// Raster dot radius in pixels
    #[arg(long)]
    dot_radius: Option<u32>,

    /// Configuration file (default: ./dnadotplot.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn params(&self) -> ComparisonParams {
        ComparisonParams {
            window: self.window,
            width_ratio: self.width,
            reverse_complement: self.revcompl,
            square: self.square,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let output = run(&cli)?;
    println!("Dot plot saved to {}", output.display());
    Ok(())
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let config = Config::load(cli.config.as_deref())?;

    // Validate everything that does not need the sequences first
    let params = cli.params();
    params.validate()?;
    let mut export = config.export_config()?;
    if let Some(radius) = cli.dot_radius {
        export.dot_radius = radius;
    }
    export.axes |= cli.axes;

    let policy = if cli.strict_alphabet {
        AlphabetPolicy::Strict
    } else {
        config.alphabet_policy()
    };

    let first = load_sequence(&cli.first_file, cli.first_name.as_deref(), policy)?;
    log::info!("First sequence: {} ({} bp)", first.id, first.len());

    let second = match (&cli.second_file, &cli.second_name) {
        (Some(path), name) => Some(load_sequence(path, name.as_deref(), policy)?),
        (None, Some(name)) => Some(load_sequence(&cli.first_file, Some(name), policy)?),
        (None, None) => None,
    };
    match &second {
        Some(seq) => log::info!("Second sequence: {} ({} bp)", seq.id, seq.len()),
        None => log::info!("Self-comparison of {}", first.id),
    }

    params.check_window(&first, "first sequence")?;
    if let Some(seq) = &second {
        params.check_window(seq, "second sequence")?;
    }

    let reference = second.as_ref().unwrap_or(&first);
    let index = WindowIndex::build(reference, params.window)?;
    log::info!(
        "Indexed {} windows ({} distinct, max multiplicity {})",
        index.indexed_windows(),
        index.distinct_windows(),
        index.max_multiplicity()
    );

    let geometry = params.geometry(first.len(), reference.len())?;
    log::info!("Canvas: {}x{}", geometry.width(), geometry.height());

    let mut grid = DotGrid::new(geometry);
    let mut matches = if second.is_some() {
        find_matches(&first, &index, params.reverse_complement)
    } else {
        find_self_matches(&index, params.reverse_complement)
    };
    grid.extend(matches.by_ref());

    let summary = matches.summary();
    log::info!(
        "Matches: {} forward, {} reverse-complement",
        summary.forward,
        summary.reverse_complement
    );
    if summary.total() == 0 {
        log::warn!("No matching windows of length {}; writing an empty plot", params.window);
    }

    export.x_title = first.id.clone();
    export.y_title = reference.id.clone();
    let format = if cli.svg { OutputFormat::Svg } else { OutputFormat::Png };
    render_to_file(&grid, &export, format, &cli.output)?;

    Ok(cli.output.clone())
}
