//! SQLite-backed [`Repository`].

use super::schema::initialise_schema;
use super::{ChangeSet, CommitSummary, Repository, StoreError};
use crate::models::{
    Car, Customer, NewCar, NewCustomer, NewPart, NewSale, NewSupplier, Part, PartCar, Sale,
    Supplier,
};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, Transaction, params};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// Dealership database stored in SQLite.
///
/// The schema is created on open. Decimals are kept as TEXT so that prices
/// and discounts read back exactly as they were imported.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened SQLite database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StoreError> {
        initialise_schema(&mut conn)?;
        Ok(Self { conn })
    }

    fn query_all<T, F>(&self, sql: &str, operation: &'static str, map: F) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql).map_err(sqlite(operation))?;
        let rows = stmt.query_map([], map).map_err(sqlite(operation))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(sqlite(operation))
    }

    fn query_ids(&self, sql: &str, operation: &'static str) -> Result<HashSet<i32>, StoreError> {
        Ok(self
            .query_all(sql, operation, |row| row.get::<_, i32>(0))?
            .into_iter()
            .collect())
    }
}

impl Repository for SqliteStore {
    fn suppliers(&self) -> Result<Vec<Supplier>, StoreError> {
        self.query_all(
            "SELECT id, name, is_importer FROM suppliers ORDER BY id",
            "select suppliers",
            |row| {
                Ok(Supplier {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    is_importer: row.get(2)?,
                })
            },
        )
    }

    fn parts(&self) -> Result<Vec<Part>, StoreError> {
        self.query_all(
            "SELECT id, name, price, quantity, supplier_id FROM parts ORDER BY id",
            "select parts",
            |row| {
                Ok(Part {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    price: decimal_column(row, 2)?,
                    quantity: row.get(3)?,
                    supplier_id: row.get(4)?,
                })
            },
        )
    }

    fn cars(&self) -> Result<Vec<Car>, StoreError> {
        self.query_all(
            "SELECT id, make, model, traveled_distance FROM cars ORDER BY id",
            "select cars",
            |row| {
                Ok(Car {
                    id: row.get(0)?,
                    make: row.get(1)?,
                    model: row.get(2)?,
                    traveled_distance: row.get(3)?,
                })
            },
        )
    }

    fn part_cars(&self) -> Result<Vec<PartCar>, StoreError> {
        self.query_all(
            "SELECT part_id, car_id FROM parts_cars ORDER BY car_id, part_id",
            "select parts_cars",
            |row| {
                Ok(PartCar {
                    part_id: row.get(0)?,
                    car_id: row.get(1)?,
                })
            },
        )
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        self.query_all(
            "SELECT id, name, birth_date, is_young_driver FROM customers ORDER BY id",
            "select customers",
            |row| {
                Ok(Customer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    birth_date: row.get(2)?,
                    is_young_driver: row.get(3)?,
                })
            },
        )
    }

    fn sales(&self) -> Result<Vec<Sale>, StoreError> {
        self.query_all(
            "SELECT id, car_id, customer_id, discount FROM sales ORDER BY id",
            "select sales",
            |row| {
                Ok(Sale {
                    id: row.get(0)?,
                    car_id: row.get(1)?,
                    customer_id: row.get(2)?,
                    discount: decimal_column(row, 3)?,
                })
            },
        )
    }

    fn supplier_ids(&self) -> Result<HashSet<i32>, StoreError> {
        self.query_ids("SELECT id FROM suppliers", "select supplier ids")
    }

    fn part_ids(&self) -> Result<HashSet<i32>, StoreError> {
        self.query_ids("SELECT id FROM parts", "select part ids")
    }

    fn car_ids(&self) -> Result<HashSet<i32>, StoreError> {
        self.query_ids("SELECT id FROM cars", "select car ids")
    }

    fn commit(&mut self, changes: ChangeSet) -> Result<CommitSummary, StoreError> {
        if changes.is_empty() {
            return Ok(CommitSummary::default());
        }

        let transaction = self
            .conn
            .transaction()
            .map_err(sqlite("begin commit transaction"))?;

        let mut summary = CommitSummary {
            suppliers: insert_suppliers(&transaction, &changes.suppliers)?,
            parts: insert_parts(&transaction, &changes.parts)?,
            ..CommitSummary::default()
        };
        let (cars, part_cars) = insert_cars(&transaction, &changes.cars)?;
        summary.cars = cars;
        summary.part_cars = part_cars;
        summary.customers = insert_customers(&transaction, &changes.customers)?;
        summary.sales = insert_sales(&transaction, &changes.sales)?;

        transaction
            .commit()
            .map_err(sqlite("commit transaction"))?;

        debug!("Committed {:?}", summary);
        Ok(summary)
    }
}

fn insert_suppliers(tx: &Transaction<'_>, suppliers: &[NewSupplier]) -> Result<usize, StoreError> {
    let mut stmt = tx
        .prepare_cached("INSERT INTO suppliers (name, is_importer) VALUES (?1, ?2)")
        .map_err(sqlite("prepare insert supplier"))?;
    for supplier in suppliers {
        stmt.execute(params![supplier.name, supplier.is_importer])
            .map_err(sqlite("insert supplier"))?;
    }
    Ok(suppliers.len())
}

fn insert_parts(tx: &Transaction<'_>, parts: &[NewPart]) -> Result<usize, StoreError> {
    let mut stmt = tx
        .prepare_cached(
            "INSERT INTO parts (name, price, quantity, supplier_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite("prepare insert part"))?;
    for part in parts {
        stmt.execute(params![
            part.name,
            part.price.to_string(),
            part.quantity,
            part.supplier_id
        ])
        .map_err(sqlite("insert part"))?;
    }
    Ok(parts.len())
}

/// Returns the number of cars and join records written.
fn insert_cars(tx: &Transaction<'_>, cars: &[NewCar]) -> Result<(usize, usize), StoreError> {
    let mut insert_car = tx
        .prepare_cached("INSERT INTO cars (make, model, traveled_distance) VALUES (?1, ?2, ?3)")
        .map_err(sqlite("prepare insert car"))?;
    let mut insert_link = tx
        .prepare_cached("INSERT INTO parts_cars (part_id, car_id) VALUES (?1, ?2)")
        .map_err(sqlite("prepare insert part car"))?;

    let mut links = 0;
    for car in cars {
        insert_car
            .execute(params![car.make, car.model, car.traveled_distance])
            .map_err(sqlite("insert car"))?;
        let car_id = tx.last_insert_rowid();
        for part_id in &car.part_ids {
            insert_link
                .execute(params![part_id, car_id])
                .map_err(sqlite("insert part car"))?;
            links += 1;
        }
    }
    Ok((cars.len(), links))
}

fn insert_customers(tx: &Transaction<'_>, customers: &[NewCustomer]) -> Result<usize, StoreError> {
    let mut stmt = tx
        .prepare_cached(
            "INSERT INTO customers (name, birth_date, is_young_driver) VALUES (?1, ?2, ?3)",
        )
        .map_err(sqlite("prepare insert customer"))?;
    for customer in customers {
        stmt.execute(params![
            customer.name,
            customer.birth_date,
            customer.is_young_driver
        ])
        .map_err(sqlite("insert customer"))?;
    }
    Ok(customers.len())
}

fn insert_sales(tx: &Transaction<'_>, sales: &[NewSale]) -> Result<usize, StoreError> {
    let mut stmt = tx
        .prepare_cached("INSERT INTO sales (car_id, customer_id, discount) VALUES (?1, ?2, ?3)")
        .map_err(sqlite("prepare insert sale"))?;
    for sale in sales {
        stmt.execute(params![
            sale.car_id,
            sale.customer_id,
            sale.discount.to_string()
        ])
        .map_err(sqlite("insert sale"))?;
    }
    Ok(sales.len())
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |source| StoreError::Sqlite { operation, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn supplier(name: &str, is_importer: bool) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            is_importer,
        }
    }

    fn part(name: &str, price: Decimal, supplier_id: i32) -> NewPart {
        NewPart {
            name: name.to_string(),
            price,
            quantity: 3,
            supplier_id,
        }
    }

    #[test]
    fn test_commit_assigns_ids_in_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut changes = ChangeSet::default();
        changes.add_suppliers(vec![supplier("3M Company", true), supplier("Agway Inc.", false)]);

        let summary = store.commit(changes).unwrap();
        assert_eq!(summary.suppliers, 2);

        let suppliers = store.suppliers().unwrap();
        assert_eq!(suppliers[0].id, 1);
        assert_eq!(suppliers[1].id, 2);
        assert_eq!(suppliers[1].name, "Agway Inc.");
        assert!(!suppliers[1].is_importer);
        assert_eq!(store.supplier_ids().unwrap(), HashSet::from([1, 2]));
    }

    #[test]
    fn test_decimals_round_trip_exactly() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut changes = ChangeSet::default();
        changes.add_suppliers(vec![supplier("3M Company", true)]);
        changes.add_parts(vec![part("Bonnet/hood", Decimal::new(100_00, 2), 1)]);
        store.commit(changes).unwrap();

        let parts = store.parts().unwrap();
        assert_eq!(parts[0].price, Decimal::new(100_00, 2));
        assert_eq!(parts[0].price.to_string(), "100.00");
    }

    #[test]
    fn test_commit_writes_join_records() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut changes = ChangeSet::default();
        changes.add_suppliers(vec![supplier("3M Company", true)]);
        changes.add_parts(vec![
            part("Bonnet/hood", Decimal::new(1000, 2), 1),
            part("Unexposed bumper", Decimal::new(2000, 2), 1),
        ]);
        changes.add_cars(vec![NewCar {
            make: "Opel".to_string(),
            model: "Astra".to_string(),
            traveled_distance: 516_628_215,
            part_ids: vec![2, 1],
        }]);

        let summary = store.commit(changes).unwrap();
        assert_eq!(summary.cars, 1);
        assert_eq!(summary.part_cars, 2);
        assert_eq!(
            store.part_cars().unwrap(),
            vec![
                PartCar {
                    part_id: 1,
                    car_id: 1
                },
                PartCar {
                    part_id: 2,
                    car_id: 1
                },
            ]
        );
    }

    #[test]
    fn test_failed_commit_stores_nothing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut changes = ChangeSet::default();
        changes.add_customers(vec![NewCustomer {
            name: "Emmitt Benally".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1993, 11, 20)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            is_young_driver: true,
        }]);
        // No car with id 42 exists.
        changes.add_sales(vec![NewSale {
            car_id: 42,
            customer_id: 1,
            discount: Decimal::new(30, 0),
        }]);

        let result = store.commit(changes);
        assert!(matches!(
            result,
            Err(StoreError::Sqlite {
                operation: "insert sale",
                ..
            })
        ));
        assert!(store.customers().unwrap().is_empty());
        assert!(store.sales().unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dealer.db");

        let store = SqliteStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.cars().unwrap().is_empty());
    }
}
