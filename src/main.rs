//! Main binary entry point for car-dealer.

use car_dealer::errors::DealerError;
use car_dealer::export::{DEFAULT_MAKE, DEFAULT_MIN_DISTANCE, ExportOptions};
use car_dealer::{Config, Dataset, Report, Task};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(
        long,
        value_name = "FILE",
        env = "CAR_DEALER_DB",
        default_value = "car_dealer.db"
    )]
    database: PathBuf,

    #[arg(long, help = "Use a throwaway in-memory database, e.g. to check that a document imports")]
    in_memory: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import one XML dataset
    Import {
        #[arg(value_enum)]
        dataset: Dataset,

        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Import suppliers, parts, cars, customers and sales from a directory
    ImportAll {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// Export a report as XML
    Export {
        #[arg(value_enum)]
        report: Report,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_MIN_DISTANCE, help = "Exclusive lower bound (cars-with-distance)")]
        min_distance: i64,

        #[arg(long, help = "Maximum number of cars (cars-with-distance, capped at 10; cars-with-parts)")]
        limit: Option<usize>,

        #[arg(long, default_value = DEFAULT_MAKE, help = "Make to list (cars-from-make)")]
        make: String,
    },
}

fn setup_logging(verbose: bool) {
    let filter_level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter(None, filter_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_app() -> Result<String, DealerError> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let task = match cli.command {
        Command::Import { dataset, input } => Task::Import {
            dataset,
            input_file: input,
        },
        Command::ImportAll { dir } => Task::ImportAll { input_dir: dir },
        Command::Export {
            report,
            output,
            min_distance,
            limit,
            make,
        } => Task::Export {
            report,
            output_file: output,
            options: ExportOptions {
                min_distance,
                limit,
                make,
            },
        },
    };

    let config = Config {
        database: (!cli.in_memory).then_some(cli.database),
        task,
    };

    car_dealer::run(config)
}

fn main() -> ExitCode {
    match run_app() {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("A fatal error occurred:");
            log::error!("{}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(s) = source {
                log::error!("  Caused by: {}", s);
                source = std::error::Error::source(s);
            }
            ExitCode::FAILURE
        }
    }
}
