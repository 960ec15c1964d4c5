//! printloop CLI - rewrite sliced 3MF files into repeated print sequences.
//!
//! One or more sliced files become a single unattended "farm mode" job:
//! the print body is looped with bed sweeps and timed pauses between
//! repetitions, and the result is spliced back into the first container.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use printloop_gcode::{
    assemble_looped, combine_sources, estimate_print_minutes, locate_sections, LoopSettings,
    PrintSource,
};
use printloop_threemf::{read_gcode, rewrite_gcode};

/// Characters of assembled G-code shown by `--preview`.
const PREVIEW_CHARS: usize = 2000;

#[derive(Parser)]
#[command(name = "printloop")]
#[command(about = "Loop sliced 3MF files for unattended repeat printing", long_about = None)]
struct Cli {
    /// Sliced .3mf files, in upload order
    files: Vec<PathBuf>,

    /// Number of repetitions of the print (or of the combined sequence)
    #[arg(short = 'n', long, default_value_t = 1)]
    loops: u32,

    /// Minutes to pause between repetitions
    #[arg(long, default_value_t = 60)]
    wait: u32,

    /// Minutes to pause between files within one sequence (multi-file only)
    #[arg(long, default_value_t = 0)]
    file_wait: u32,

    /// Skip the bed sweep between files (multi-file only)
    #[arg(long)]
    no_sweep_between_files: bool,

    /// Skip the final home-all-axes move
    #[arg(long)]
    no_final_home: bool,

    /// File containing a replacement sweep pattern
    #[arg(long)]
    sweep_pattern: Option<PathBuf>,

    /// Print order as 1-based positions, e.g. --order 2,1 (multi-file only)
    #[arg(long, value_delimiter = ',')]
    order: Option<Vec<usize>>,

    /// Output path (default: looped_<first input name> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show the first part of the assembled G-code
    #[arg(long)]
    preview: bool,

    /// Emit the schedule report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Per-file portion of the schedule report.
#[derive(Debug, Serialize)]
struct FileReport {
    name: String,
    /// Slicer's own estimate, when its comments carry one.
    estimated_print_minutes: Option<u64>,
}

/// What the run produced, printed human-readable or as JSON.
#[derive(Debug, Serialize)]
struct ScheduleReport {
    files: Vec<FileReport>,
    loops: u32,
    wait_minutes: u32,
    /// Total pause time between the first and last sequence.
    idle_minutes: u64,
    output_path: String,
    output_bytes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.files.is_empty() {
        bail!("no input files; pass one or more sliced .3mf files");
    }
    if cli.order.is_some() && cli.files.len() == 1 {
        bail!("--order requires more than one input file");
    }

    let sweep_override = match &cli.sweep_pattern {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading sweep pattern {}", path.display()))?,
        ),
        None => None,
    };

    let settings = LoopSettings {
        loop_count: cli.loops,
        wait_minutes: cli.wait,
        per_file_wait_minutes: cli.file_wait,
        sweep_between_files: !cli.no_sweep_between_files,
        final_home: !cli.no_final_home,
        sweep_override,
        ..Default::default()
    };
    let order = cli.order.as_deref().map(to_zero_based).transpose()?;

    let mut packages: Vec<Vec<u8>> = Vec::with_capacity(cli.files.len());
    let mut sources: Vec<PrintSource> = Vec::with_capacity(cli.files.len());
    let mut file_reports: Vec<FileReport> = Vec::with_capacity(cli.files.len());

    for path in &cli.files {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let entry = read_gcode(&bytes)
            .with_context(|| format!("no usable G-code in {}", path.display()))?;
        debug!(file = %path.display(), entry = %entry.name, "located G-code entry");

        let name = display_name(path);
        file_reports.push(FileReport {
            name: name.clone(),
            estimated_print_minutes: estimate_print_minutes(&entry.text),
        });
        let sections = locate_sections(&entry.text)
            .with_context(|| format!("could not split {}", path.display()))?;
        sources.push(PrintSource { name, sections });
        packages.push(bytes);
    }

    let gcode = if sources.len() == 1 {
        assemble_looped(&sources[0].sections, &settings)?
    } else {
        combine_sources(&sources, order.as_deref(), &settings)?
    };
    info!(loops = cli.loops, bytes = gcode.len(), "assembled looped G-code");

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.files[0]));
    let package = rewrite_gcode(&packages[0], &gcode)?;
    std::fs::write(&output_path, &package)
        .with_context(|| format!("writing {}", output_path.display()))?;
    info!(path = %output_path.display(), bytes = package.len(), "wrote looped package");

    if cli.preview {
        let preview: String = gcode.chars().take(PREVIEW_CHARS).collect();
        println!("{preview}");
        if gcode.len() > preview.len() {
            println!("... [truncated]");
        }
        println!();
    }

    let report = ScheduleReport {
        files: file_reports,
        loops: cli.loops,
        wait_minutes: cli.wait,
        idle_minutes: u64::from(cli.wait) * u64::from(cli.loops.saturating_sub(1)),
        output_path: output_path.display().to_string(),
        output_bytes: package.len(),
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("printloop_cli=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn print_report(report: &ScheduleReport) {
    println!(
        "Wrote {} ({} bytes)",
        report.output_path, report.output_bytes
    );
    println!(
        "Files: {}, loops: {}, wait between loops: {} min",
        report.files.len(),
        report.loops,
        report.wait_minutes
    );
    println!(
        "Total idle time between sequences: {}",
        format_idle_time(report.idle_minutes)
    );
    for file in &report.files {
        match file.estimated_print_minutes {
            Some(minutes) => println!("Slicer estimate for {}: {} min", file.name, minutes),
            None => println!("Slicer estimate for {}: none", file.name),
        }
    }
}

/// 1-based CLI positions to 0-based indices.
fn to_zero_based(order: &[usize]) -> Result<Vec<usize>> {
    order
        .iter()
        .map(|&position| {
            position
                .checked_sub(1)
                .ok_or_else(|| anyhow::anyhow!("--order positions are 1-based"))
        })
        .collect()
}

fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output.3mf");
    input.with_file_name(format!("looped_{name}"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

fn format_idle_time(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
