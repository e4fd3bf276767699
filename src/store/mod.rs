//! Persistence layer.
//!
//! The pipelines talk to the database only through [`Repository`]: query
//! methods that return whole entity sets, and [`Repository::commit`], which
//! writes a [`ChangeSet`] as a single unit. Either every record in the change
//! set is stored or none is.

mod schema;
mod sqlite;

pub use schema::SCHEMA_VERSION;
pub use sqlite::SqliteStore;

use crate::models::{
    Car, Customer, NewCar, NewCustomer, NewPart, NewSale, NewSupplier, Part, PartCar, Sale,
    Supplier,
};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create parent directory {path:?}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to execute migration step '{step}'")]
    Migration {
        step: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("expected schema version {expected} but found {found}")]
    VersionMismatch { expected: i64, found: i64 },
    #[error("SQLite operation '{operation}' failed")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// Pending inserts, committed together by [`Repository::commit`].
///
/// Records are written in dependency order: suppliers, parts, cars (with
/// their join records), customers, sales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub suppliers: Vec<NewSupplier>,
    pub parts: Vec<NewPart>,
    pub cars: Vec<NewCar>,
    pub customers: Vec<NewCustomer>,
    pub sales: Vec<NewSale>,
}

impl ChangeSet {
    pub fn add_suppliers(&mut self, suppliers: impl IntoIterator<Item = NewSupplier>) {
        self.suppliers.extend(suppliers);
    }

    pub fn add_parts(&mut self, parts: impl IntoIterator<Item = NewPart>) {
        self.parts.extend(parts);
    }

    pub fn add_cars(&mut self, cars: impl IntoIterator<Item = NewCar>) {
        self.cars.extend(cars);
    }

    pub fn add_customers(&mut self, customers: impl IntoIterator<Item = NewCustomer>) {
        self.customers.extend(customers);
    }

    pub fn add_sales(&mut self, sales: impl IntoIterator<Item = NewSale>) {
        self.sales.extend(sales);
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
            && self.parts.is_empty()
            && self.cars.is_empty()
            && self.customers.is_empty()
            && self.sales.is_empty()
    }
}

/// Row counts written by one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub suppliers: usize,
    pub parts: usize,
    pub cars: usize,
    pub part_cars: usize,
    pub customers: usize,
    pub sales: usize,
}

/// Access to the dealership database.
pub trait Repository {
    fn suppliers(&self) -> Result<Vec<Supplier>, StoreError>;

    fn parts(&self) -> Result<Vec<Part>, StoreError>;

    fn cars(&self) -> Result<Vec<Car>, StoreError>;

    fn part_cars(&self) -> Result<Vec<PartCar>, StoreError>;

    fn customers(&self) -> Result<Vec<Customer>, StoreError>;

    fn sales(&self) -> Result<Vec<Sale>, StoreError>;

    fn supplier_ids(&self) -> Result<HashSet<i32>, StoreError> {
        Ok(self.suppliers()?.into_iter().map(|s| s.id).collect())
    }

    fn part_ids(&self) -> Result<HashSet<i32>, StoreError> {
        Ok(self.parts()?.into_iter().map(|p| p.id).collect())
    }

    fn car_ids(&self) -> Result<HashSet<i32>, StoreError> {
        Ok(self.cars()?.into_iter().map(|c| c.id).collect())
    }

    /// Write all pending records in one transaction.
    fn commit(&mut self, changes: ChangeSet) -> Result<CommitSummary, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_change_set_is_empty() {
        let changes = ChangeSet::default();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_change_set_accumulates() {
        let mut changes = ChangeSet::default();
        changes.add_suppliers(vec![NewSupplier {
            name: "3M Company".to_string(),
            is_importer: true,
        }]);
        changes.add_suppliers(vec![NewSupplier {
            name: "Agway Inc.".to_string(),
            is_importer: false,
        }]);
        assert!(!changes.is_empty());
        assert_eq!(changes.suppliers.len(), 2);
    }
}
