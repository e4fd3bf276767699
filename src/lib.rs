//! Main library for the car-dealer import/export tool.
//!
//! XML documents are parsed into transfer records, mapped to entities and
//! committed to a SQLite-backed [`store::Repository`]; reports query the
//! repository and serialize their projection back to XML.

pub mod dto;
pub mod errors;
pub mod export;
pub mod import;
pub mod mapper;
pub mod models;
pub mod store;
pub mod xml;

use clap::ValueEnum;
use errors::DealerError;
use export::ExportOptions;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use store::SqliteStore;

/// An importable dataset.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dataset {
    Suppliers,
    Parts,
    Cars,
    Customers,
    Sales,
}

impl Dataset {
    /// All datasets, in the order their foreign keys require.
    pub const IMPORT_ORDER: [Dataset; 5] = [
        Dataset::Suppliers,
        Dataset::Parts,
        Dataset::Cars,
        Dataset::Customers,
        Dataset::Sales,
    ];

    /// File name used by `import-all`.
    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Suppliers => "suppliers.xml",
            Dataset::Parts => "parts.xml",
            Dataset::Cars => "cars.xml",
            Dataset::Customers => "customers.xml",
            Dataset::Sales => "sales.xml",
        }
    }
}

/// An exportable report.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    /// Cars above a distance threshold, by make and model
    CarsWithDistance,
    /// Cars of a single make
    CarsFromMake,
    /// Suppliers that are not importers
    LocalSuppliers,
    /// Cars with the longest distance and their parts
    CarsWithParts,
    /// Money spent per customer
    TotalSalesByCustomer,
    /// Sales with the discount applied
    SalesWithDiscount,
}

/// What a single run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Import {
        dataset: Dataset,
        input_file: PathBuf,
    },
    ImportAll {
        input_dir: PathBuf,
    },
    Export {
        report: Report,
        output_file: Option<PathBuf>,
        options: ExportOptions,
    },
}

/// Top-level configuration for a run.
#[derive(Debug)]
pub struct Config {
    /// SQLite database file; `None` uses a throwaway in-memory database.
    pub database: Option<PathBuf>,
    pub task: Task,
}

/// The main entry point for the import/export logic.
///
/// Returns the text to show the user: the import message, or the exported
/// XML when no output file was given.
pub fn run(config: Config) -> Result<String, DealerError> {
    let start_time = Instant::now();

    let mut store = match &config.database {
        Some(path) => {
            info!("Database: {}", path.display());
            SqliteStore::open(path)?
        }
        None => {
            info!("Database: in-memory");
            SqliteStore::open_in_memory()?
        }
    };

    let message = match config.task {
        Task::Import {
            dataset,
            input_file,
        } => {
            let xml = read_input(&input_file)?;
            let count = import::import(&mut store, dataset, &xml)?;
            imported_message(count)
        }
        Task::ImportAll { input_dir } => {
            let mut lines = Vec::with_capacity(Dataset::IMPORT_ORDER.len());
            for dataset in Dataset::IMPORT_ORDER {
                let xml = read_input(&input_dir.join(dataset.file_name()))?;
                let count = import::import(&mut store, dataset, &xml)?;
                lines.push(imported_message(count));
            }
            lines.join("\n")
        }
        Task::Export {
            report,
            output_file,
            options,
        } => {
            let xml = export::export(&store, report, &options)?;
            match output_file {
                Some(path) => {
                    fs::write(&path, &xml).map_err(|e| {
                        DealerError::Io(e, format!("Failed to write {}", path.display()))
                    })?;
                    format!("Exported {:?} to {}", report, path.display())
                }
                None => xml,
            }
        }
    };

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(message)
}

fn imported_message(count: usize) -> String {
    format!("Successfully imported {}", count)
}

fn read_input(path: &Path) -> Result<String, DealerError> {
    info!("Reading {}", path.display());
    fs::read_to_string(path)
        .map_err(|e| DealerError::Io(e, format!("Failed to read {}", path.display())))
}
