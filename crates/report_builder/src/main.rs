//! Report Builder CLI
//!
//! config.json + data directory → match report JSON
//! Dummy xT grid generator, event table inspection

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "report_builder")]
#[command(about = "Build tactical match reports from match-centre event data", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build the match report
    Report {
        /// Settings file path
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Output report path (defaults to DATA_DIR/OUTPUT_FILE_REPORT)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write a placeholder xT grid
    Grid {
        /// Output CSV file path
        #[arg(long, default_value = "data/xT_grid.csv")]
        out: PathBuf,

        /// Number of x-bins (columns)
        #[arg(long, default_value_t = report_builder::grid::DEFAULT_GRID_COLS)]
        cols: usize,

        /// Number of y-bins (rows)
        #[arg(long, default_value_t = report_builder::grid::DEFAULT_GRID_ROWS)]
        rows: usize,
    },

    /// Print per-type event counts of an event table
    Inspect {
        /// Event CSV file path
        #[arg(long)]
        events: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Report { config, out } => {
            println!("Building match report...");
            println!("   Config: {}", config.display());

            let settings = report_builder::ReportSettings::load(&config)?;
            let (report, meta) = report_builder::build_report(&settings)?;
            let out = out.unwrap_or_else(|| settings.report_path());
            let meta_path = report_builder::write_report(&out, &report, &meta)?;

            print_metadata(&meta);
            println!("   Report:          {}", out.display());
            println!("   Metadata:        {}", meta_path.display());
            if report.foreign_team_events > 0 {
                println!("   Other teams:     {} events ignored", report.foreign_team_events);
            }
            if !report.unresolved_players.is_empty() {
                println!("   Unresolved:      {:?}", report.unresolved_players);
            }
        }

        Commands::Grid { out, cols, rows } => {
            if cols == 0 || rows == 0 {
                anyhow::bail!("Grid dimensions must be positive (got {}x{})", cols, rows);
            }
            println!("Generating dummy xT grid ({} x {})...", rows, cols);
            let grid = report_builder::generate_dummy_grid(cols, rows)?;
            report_builder::write_xt_grid(&out, &grid)?;
            println!("   Output: {}", out.display());
        }

        Commands::Inspect { events } => {
            let (parsed, stats) = report_builder::read_events(std::fs::File::open(&events)?)?;
            println!("{}", events.display());
            println!(
                "   Rows: {} (parsed {}, failed {})",
                stats.total_rows, stats.parsed, stats.failed
            );
            for (name, count) in report_builder::event_type_counts(&parsed) {
                println!("   {:<20} {}", name, count);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &report_builder::ReportMetadata) {
    println!("\nReport built successfully!");
    println!("   Match:           {} vs {}", meta.home_team, meta.away_team);
    println!("   Events:          {} ({:?})", meta.event_count, meta.event_source);
    println!("   Skipped:         {}", meta.skipped_events);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("report_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
