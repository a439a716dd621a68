//! Boatrace Dataset CLI - build tabular datasets from kekkaf result files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use boatrace_dataset::data::ResultFileProcessor;
use boatrace_dataset::dataset::{self, LabelProfile};
use boatrace_dataset::RaceRecord;

/// Default output directory for generated artifacts
const DEFAULT_OUTPUT_DIR: &str = "boat_race_analysis";
/// Year of the month subdirectories under the input root
const DEFAULT_YEAR: u16 = 2024;

const MAIN_DATASET_FILE: &str = "kekkaf_main_dataset.csv";
const HUMAN_READABLE_FILE: &str = "boat_race_human_readable.csv";
const ML_READY_FILE: &str = "boat_race_ml_ready.csv";
const STATS_FILE: &str = "analysis_stats.json";

#[derive(Parser)]
#[command(name = "boatrace-dataset")]
#[command(author, version, about = "Boat race result dataset builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build datasets from a kekkaf directory tree
    Build {
        /// Input directory containing <year><month> subdirectories
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for CSV/JSON artifacts
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Year of the month subdirectories
        #[arg(long, default_value_t = DEFAULT_YEAR)]
        year: u16,

        /// Maximum number of files to process (one per month)
        #[arg(long)]
        max_files: Option<usize>,
    },

    /// Parse a single result file and print a summary
    Parse {
        /// Path to a result TXT file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let cli = Cli::parse();

    println!("{}", "Boatrace Dataset CLI v0.2.0".cyan().bold());
    println!();

    if cli.interactive {
        run_interactive()?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Build {
                input,
                output,
                year,
                max_files,
            } => {
                build_datasets(&input, &output, year, max_files)?;
            }
            Commands::Parse { file } => {
                parse_single(&file)?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn build_datasets(
    input: &Path,
    output: &Path,
    year: u16,
    max_files: Option<usize>,
) -> Result<()> {
    println!(
        "{}: {} ({})",
        "Building datasets from".green(),
        input.display(),
        year
    );
    println!();

    let processor = ResultFileProcessor::new();
    let mut records: Vec<RaceRecord> = Vec::new();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Processing result files...");

    let processed = processor
        .process_directory(input, year, max_files, &mut records)
        .with_context(|| format!("Failed to process {:?}", input))?;

    pb.finish_and_clear();

    if processed == 0 || records.is_empty() {
        anyhow::bail!("no result files processed under {:?}", input);
    }

    println!("Processed {} files, {} records", processed, records.len());
    println!();

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;

    let frame = dataset::records_to_frame(&records)?;

    let main_path = output.join(MAIN_DATASET_FILE);
    let main = dataset::main_dataset(&frame)?;
    dataset::write_csv(&main, &main_path, LabelProfile::English)?;
    println!("{}: {:?}", "Main dataset".green(), main_path);

    let human_path = output.join(HUMAN_READABLE_FILE);
    dataset::write_csv(&frame, &human_path, LabelProfile::Japanese)?;
    println!("{}: {:?}", "Human readable".green(), human_path);

    let ml_path = output.join(ML_READY_FILE);
    let ml = dataset::ml_ready_frame(&frame)?;
    dataset::write_csv(&ml, &ml_path, LabelProfile::English)?;
    println!("{}: {:?}", "ML ready".green(), ml_path);

    let stats_path = output.join(STATS_FILE);
    dataset::write_stats(&records, &stats_path)?;
    println!("{}: {:?}", "Statistics".green(), stats_path);

    print_overview(&records);

    Ok(())
}

fn parse_single(file: &Path) -> Result<()> {
    println!("{}: {}", "Parsing".green(), file.display());
    println!();

    let processor = ResultFileProcessor::new();
    let mut records = Vec::new();
    if !processor.process_file(file, &mut records) {
        anyhow::bail!("failed to parse {:?}", file);
    }

    println!("{}: {} records", "Parsed".green(), records.len());
    if let Some(first) = records.first() {
        println!(
            "  date: {}  venue: {} ({})",
            first.date,
            if first.venue_name.is_empty() {
                "?"
            } else {
                first.venue_name.as_str()
            },
            first.venue_code
        );
    }

    let races: std::collections::BTreeSet<u32> = records.iter().map(|r| r.race_number).collect();
    let with_result = records.iter().filter(|r| r.finish_position > 0).count();
    println!("  races: {}", races.len());
    println!("  entries with a known finish order: {}", with_result);

    Ok(())
}

fn print_overview(records: &[RaceRecord]) {
    let stats = dataset::dataset_stats(records);

    println!();
    println!("{}", "Overview:".yellow().bold());
    println!("  Records: {}", stats["total_records"]);
    println!("  Venues:  {}", stats["unique_venues"]);
    println!(
        "  Dates:   {} ({} - {})",
        stats["unique_dates"], stats["date_range"]["start"], stats["date_range"]["end"]
    );
    println!("  Racers:  {}", stats["unique_racers"]);
}

fn run_interactive() -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Type 'quit' to exit.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Build datasets", "Parse one file", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let input: String = Input::with_theme(&theme)
                    .with_prompt("Input directory")
                    .interact_text()?;

                let output: String = Input::with_theme(&theme)
                    .with_prompt("Output directory")
                    .default(DEFAULT_OUTPUT_DIR.to_string())
                    .interact_text()?;

                let year: u16 = Input::with_theme(&theme)
                    .with_prompt("Year")
                    .default(DEFAULT_YEAR)
                    .interact_text()?;

                println!();
                build_datasets(Path::new(&input), Path::new(&output), year, None)?;
                println!();
            }
            1 => {
                let file: String = Input::with_theme(&theme)
                    .with_prompt("Result file")
                    .interact_text()?;

                println!();
                parse_single(Path::new(&file))?;
                println!();
            }
            2 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
