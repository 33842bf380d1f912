//! Marksync CLI Tool
//!
//! Command-line interface for round-tripping markers between clips and the
//! timeline of a project snapshot.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use marksync_core::propagate::timeline_frame_rate;
use marksync_core::{
    Clip, Host, MarkerColor, MarkerSync, MemoryHost, PhaseResult, Project, RunState, RunSummary,
    SyncConfig, Timeline, TrackType,
};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marksync")]
#[command(about = "Round-trip review markers between clips and the timeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Promote clip markers, purge the transient color, then demote timeline markers
    Run(PhaseArgs),

    /// Copy clip markers onto the timeline
    Promote(PhaseArgs),

    /// Delete every marker of the purge color
    Purge(PhaseArgs),

    /// Copy timeline markers onto the clips underneath them
    Demote(PhaseArgs),

    /// Show project information
    Inspect {
        /// Project snapshot (JSON)
        project: PathBuf,
    },
}

#[derive(Args)]
struct PhaseArgs {
    /// Project snapshot (JSON)
    project: PathBuf,

    /// Where to write the updated snapshot (defaults to the input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Color given to markers copied from clips to the timeline
    #[arg(long, default_value = "Red")]
    promote_color: MarkerColor,

    /// Color purged from the timeline and every clip
    #[arg(long, default_value = "Blue")]
    purge_color: MarkerColor,

    /// Color given to markers copied from the timeline to clips
    #[arg(long, default_value = "Green")]
    demote_color: MarkerColor,
}

impl PhaseArgs {
    fn config(&self) -> SyncConfig {
        SyncConfig {
            promote_color: self.promote_color,
            purge_color: self.purge_color,
            demote_color: self.demote_color,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let succeeded = match cli.command {
        Commands::Run(args) => run_phases(args, |sync| {
            let summary = sync.run();
            print_summary(&summary);
            summary.succeeded()
        })?,
        Commands::Promote(args) => run_phases(args, |sync| {
            report_phase("Promote", sync.promote(), |r| {
                format!("copied {} clip markers ({} refused)", r.copied, r.failed)
            })
        })?,
        Commands::Purge(args) => run_phases(args, |sync| {
            report_phase("Purge", sync.purge(), |r| {
                format!(
                    "deleted markers from {} clips (timeline cleared: {})",
                    r.clips_cleared, r.timeline_cleared
                )
            })
        })?,
        Commands::Demote(args) => run_phases(args, |sync| {
            report_phase("Demote", sync.demote(), |r| {
                format!(
                    "added {} clip markers ({} refused, {} without a clip)",
                    r.added, r.failed, r.missed
                )
            })
        })?,
        Commands::Inspect { project } => {
            let host = load_host(&project)?;
            print_info(&host);
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_host(path: &Path) -> Result<MemoryHost> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file {}", path.display()))?;
    MemoryHost::from_json(&json).context("Failed to parse project snapshot")
}

/// Loads the snapshot, runs `phases` on it and writes the result back
fn run_phases(
    args: PhaseArgs,
    phases: impl FnOnce(&MarkerSync<MemoryHost>) -> bool,
) -> Result<bool> {
    println!("Loading project: {}", args.project.display());
    let host = load_host(&args.project)?;
    let sync = MarkerSync::new(host, args.config());

    let succeeded = phases(&sync);

    if args.dry_run {
        println!("Dry run: no changes written");
        return Ok(succeeded);
    }

    let output = args.output.as_ref().unwrap_or(&args.project);
    let json = sync
        .host()
        .to_json()
        .context("Failed to serialize project snapshot")?;
    fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote project to {}", output.display());

    Ok(succeeded)
}

fn report_phase<T>(
    label: &str,
    result: marksync_core::Result<T>,
    describe: impl FnOnce(&T) -> String,
) -> bool {
    match result {
        Ok(report) => {
            println!("{label}: {}", describe(&report));
            true
        }
        Err(err) => {
            println!("{label} failed: {err}");
            false
        }
    }
}

fn print_phase<T>(label: &str, phase: &PhaseResult<T>, describe: impl FnOnce(&T) -> String) {
    match phase {
        PhaseResult::Skipped => println!("  {label}: skipped"),
        PhaseResult::Completed(report) => println!("  {label}: {}", describe(report)),
        PhaseResult::Failed(err) => println!("  {label}: failed ({err})"),
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== Marker Run Summary ===");
    print_phase("Promote", &summary.promote, |r| {
        format!("copied {}, refused {}", r.copied, r.failed)
    });
    print_phase("Purge", &summary.purge, |r| {
        format!(
            "cleared {} clips, timeline cleared: {}",
            r.clips_cleared, r.timeline_cleared
        )
    });
    print_phase("Demote", &summary.demote, |r| {
        format!(
            "added {}, refused {}, skipped {}",
            r.added, r.failed, r.missed
        )
    });

    match summary.state {
        RunState::Done => println!("Completed"),
        RunState::Aborted(phase) => println!("Aborted during {phase}"),
    }
}

fn print_info(host: &MemoryHost) {
    println!("\n=== Project Information ===");
    let Some(project) = host.current_project() else {
        println!("No project is open");
        return;
    };
    println!("Project: {}", project.name());
    let rate = or_unknown(timeline_frame_rate(&project));
    println!("Timeline frame rate: {rate}");

    let Some(timeline) = project.current_timeline() else {
        println!("No timeline is open");
        return;
    };
    println!("Timeline: {}", timeline.name());
    println!("Timeline markers: {}", timeline.markers().len());

    println!("\n=== Tracks ===");
    for kind in TrackType::ALL {
        for index in 1..=timeline.track_count(kind) {
            let clips = timeline.items_in_track(kind, index);
            let count = clips.len();
            let markers: usize = clips.iter().map(|c| c.markers().len()).sum();
            println!("  {kind} {index}: {count} clips, {markers} markers");
        }
    }
}

fn or_unknown<T: Display, E>(value: std::result::Result<T, E>) -> String {
    value.map_or_else(|_| "unknown".to_string(), |v| v.to_string())
}
