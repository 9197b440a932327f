//! vehicle-store CLI
//!
//! Store commands and batch conversion for fixed-width vehicle records

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use vehicle_store::{ensure_dir, Config, Converter, Menu, Outcome, RecordStore, Vehicle};

#[derive(Parser, Debug)]
#[command(name = "vehicle-store")]
#[command(about = "Fixed-width binary vehicle record store and format converter")]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Record store file (overrides the configuration)
    #[arg(short = 's', long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every record in the store
    List,

    /// Append a record
    Append {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        model: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        fuel: f64,
        #[arg(long)]
        horsepower: i32,
    },

    /// Change the horsepower of the first record with an id
    Update {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        horsepower: i32,
    },

    /// Delete the first record with an id
    Delete {
        #[arg(long)]
        id: i32,
    },

    /// Convert every source format in the input directory to every format
    Convert {
        /// Input directory (overrides the configuration)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Output directory (overrides the configuration)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Interactive menu (default)
    Menu,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => Config::default(),
    };
    if let Some(store) = &args.store {
        config.store_path = store.clone();
    }
    if let Some(Command::Convert { input, output }) = &args.command {
        if let Some(input) = input {
            config.input_dir = input.clone();
        }
        if let Some(output) = output {
            config.output_dir = output.clone();
        }
    }
    config.validate()?;
    Ok(config)
}

/// Create the directory holding the store file if needed
fn bootstrap_store(store: &RecordStore) -> Result<()> {
    if let Some(parent) = store.path().parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}

fn print_outcome(outcome: Outcome, id: i32, done: &str) {
    match outcome {
        Outcome::Applied { index } => println!("Vehicle {} {} (block {})", id, done, index),
        Outcome::NotFound => println!("No vehicle found with ID {}", id),
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so listings on stdout stay clean
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let store = RecordStore::new(&config.store_path);

    info!("Record store: {:?}", store.path());

    match args.command.unwrap_or(Command::Menu) {
        Command::List => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let listed = store.list_to(&mut out)?;
            out.flush()?;
            info!("{} records", listed.len());
        }
        Command::Append {
            id,
            model,
            make,
            fuel,
            horsepower,
        } => {
            bootstrap_store(&store)?;
            let vehicle = Vehicle::new(id, model, make, fuel, horsepower);
            let appended = store.append(&vehicle)?;
            for field in &appended.truncated {
                println!("Warning: {} was truncated to fit", field);
            }
            println!(
                "Vehicle {} '{}' added at block {}",
                vehicle.make, vehicle.model, appended.index
            );
        }
        Command::Update { id, horsepower } => {
            let outcome = store.update_horsepower(id, horsepower)?;
            print_outcome(outcome, id, &format!("now has {} horsepower", horsepower));
        }
        Command::Delete { id } => {
            let outcome = store.delete(id)?;
            print_outcome(outcome, id, "deleted");
        }
        Command::Convert { .. } => {
            let report = Converter::new(&config)
                .run()
                .context("Conversion failed")?;
            for source in &report.sources {
                println!(
                    "{}: {} records read from {:?} ({} skipped)",
                    source.kind, source.records, source.path, source.skipped
                );
            }
            for failure in &report.failures {
                println!("Failed {:?}: {}", failure.path, failure.reason);
            }
            println!("{} files written to {:?}", report.written.len(), config.output_dir);
        }
        Command::Menu => {
            bootstrap_store(&store)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            Menu::new(&store, stdin.lock(), stdout.lock()).run()?;
        }
    }

    Ok(())
}
