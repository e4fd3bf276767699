//! Entity model for the dealership database.
//!
//! Persisted entities carry the identity assigned by the store. The `New*`
//! shapes are what the import pipelines hand to [`crate::store::ChangeSet`];
//! they have no identity until committed.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub is_importer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub supplier_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub traveled_distance: i64,
}

/// Join record between a car and one of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartCar {
    pub part_id: i32,
    pub car_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub birth_date: NaiveDateTime,
    pub is_young_driver: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub id: i32,
    pub car_id: i32,
    pub customer_id: i32,
    /// Discount percentage, e.g. `30` for 30%.
    pub discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub is_importer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPart {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub supplier_id: i32,
}

/// A car to insert together with its join records.
///
/// `part_ids` holds distinct ids only; the join table keys on
/// `(part_id, car_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub traveled_distance: i64,
    pub part_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub birth_date: NaiveDateTime,
    pub is_young_driver: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub car_id: i32,
    pub customer_id: i32,
    pub discount: Decimal,
}
