use bmi_core::chart::max_start;
use bmi_core::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

const BAR_WIDTH: f64 = 30.0;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Daily weight and BMI journal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's weight and height
    Record {
        /// Weight in kg (comma or dot decimals)
        #[arg(long, short)]
        weight: String,

        /// Height in cm (comma or dot decimals)
        #[arg(long = "height", short = 'H')]
        height: String,
    },

    /// Compute and classify a BMI without saving it
    Calc {
        /// Weight in kg
        #[arg(long, short)]
        weight: String,

        /// Height in cm
        #[arg(long = "height", short = 'H')]
        height: String,
    },

    /// Show all recorded entries (default)
    History,

    /// Change the weight of a recorded entry
    Edit {
        /// Row number from `bmi history`
        index: usize,

        /// New weight in kg
        #[arg(long, short)]
        weight: String,
    },

    /// Delete a recorded entry
    Delete {
        /// Row number from `bmi history`
        index: usize,
    },

    /// Show the weight trend for a window of entries
    Chart {
        /// Number of entries per window
        #[arg(long)]
        window: Option<usize>,

        /// Scroll this many entries towards older data
        #[arg(long, default_value_t = 0)]
        back: usize,

        /// Scroll this many entries towards newer data
        #[arg(long, default_value_t = 0)]
        forward: usize,
    },
}

fn main() -> ExitCode {
    // Warnings and errors only; RUST_LOG overrides
    bmi_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_facing() => {
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
        Err(e) if e.is_persistence() => {
            tracing::error!("Storage failure: {}", e);
            eprintln!("Could not access your saved data. Nothing was changed.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Pure computation, needs neither config nor storage
    if let Some(Commands::Calc { weight, height }) = &cli.command {
        return cmd_calc(weight, height);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let store = EntryStore::open(FileStore::new(data_dir)).with_edit_height(config.edit.height);

    match cli.command {
        Some(Commands::Record { weight, height }) => cmd_record(store, &weight, &height),
        Some(Commands::Calc { weight, height }) => cmd_calc(&weight, &height),
        Some(Commands::History) | None => cmd_history(&store),
        Some(Commands::Edit { index, weight }) => cmd_edit(store, index, &weight),
        Some(Commands::Delete { index }) => cmd_delete(store, index),
        Some(Commands::Chart {
            window,
            back,
            forward,
        }) => cmd_chart(
            &store,
            window.unwrap_or(config.chart.window_size),
            back,
            forward,
        ),
    }
}

fn user_message(error: &Error) -> String {
    match error {
        Error::InvalidInput(_) => {
            "Enter valid positive numbers for weight and height.".to_string()
        }
        Error::IndexOutOfRange { index, len } => {
            format!("There is no entry #{} ({} entries recorded).", index, len)
        }
        other => other.to_string(),
    }
}

fn cmd_record(mut store: EntryStore<FileStore>, weight: &str, height: &str) -> Result<()> {
    match store.record_today(weight, height) {
        Ok(outcome) => {
            display_result(outcome.entry.bmi, outcome.category);
            println!("\n✓ Entry saved for today");
            Ok(())
        }
        Err(Error::AlreadyRecordedToday) => {
            println!("Already recorded today. Use `bmi edit` to change today's weight.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_calc(weight: &str, height: &str) -> Result<()> {
    let bmi = compute_bmi(weight, height)?;
    display_result(bmi, classify(bmi));
    Ok(())
}

fn display_result(bmi: f64, category: BmiCategory) {
    println!("Your BMI is: {:.1}", bmi);
    println!("You are: {}", category.label());
}

fn cmd_history(store: &EntryStore<FileStore>) -> Result<()> {
    let rows = history_rows(&store.list_entries());
    if rows.is_empty() {
        println!("No entries yet. Record one with `bmi record`.");
        return Ok(());
    }

    println!("{:>3}  {:<10}  {:>7}  {:>5}  {}", "#", "Date", "Weight", "BMI", "Category");
    for row in rows {
        println!(
            "{:>3}  {:<10}  {:>7}  {:>5}  {}",
            row.index, row.date, row.weight, row.bmi, row.category
        );
    }
    Ok(())
}

fn cmd_edit(mut store: EntryStore<FileStore>, index: usize, weight: &str) -> Result<()> {
    let entries = store.edit_entry(index, weight)?;
    let entry = &entries[index];
    println!(
        "✓ Entry #{} updated: {:.1} kg, BMI {:.1} ({})",
        index,
        entry.weight,
        entry.bmi,
        classify(entry.bmi).label()
    );
    Ok(())
}

fn cmd_delete(mut store: EntryStore<FileStore>, index: usize) -> Result<()> {
    let remaining = store.delete_entry(index)?;
    println!("✓ Entry #{} deleted ({} remaining)", index, remaining.len());
    Ok(())
}

fn cmd_chart(
    store: &EntryStore<FileStore>,
    window_size: usize,
    back: usize,
    forward: usize,
) -> Result<()> {
    let entries = store.list_entries();
    if entries.is_empty() {
        println!("No entries yet. Record one with `bmi record`.");
        return Ok(());
    }

    let mut window = ChartWindow::new(entries.len(), window_size);
    for _ in 0..back {
        window.shift_left();
    }
    for _ in 0..forward {
        window.shift_right();
    }

    let view = window.view(&entries);
    let start = window.start_index();
    println!(
        "Entries {}-{} of {}",
        start + 1,
        start + view.values.len(),
        entries.len()
    );

    let min = view.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = view.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    for (label, value) in view.labels.iter().zip(&view.values) {
        let width = if max > min {
            1 + ((value - min) / (max - min) * (BAR_WIDTH - 1.0)).round() as usize
        } else {
            (BAR_WIDTH / 2.0) as usize
        };
        println!("{} | {} {:.1} kg", label, "█".repeat(width), value);
    }

    if start > 0 {
        println!("◀ {} older", start);
    }
    let newer = max_start(entries.len(), window.window_size()) - start;
    if newer > 0 {
        println!("▶ {} newer", newer);
    }
    Ok(())
}
