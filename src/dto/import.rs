//! Import documents: one per dataset.

use super::XmlDocument;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `<Suppliers>` document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename = "Suppliers")]
pub struct SuppliersDocument {
    #[serde(rename = "Supplier", default)]
    pub suppliers: Vec<ImportSupplierDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSupplierDto {
    pub name: String,
    pub is_importer: bool,
}

/// `<Parts>` document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename = "Parts")]
pub struct PartsDocument {
    #[serde(rename = "Part", default)]
    pub parts: Vec<ImportPartDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPartDto {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity: i32,
    pub supplier_id: i32,
}

/// `<Cars>` document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename = "Cars")]
pub struct CarsDocument {
    #[serde(rename = "Car", default)]
    pub cars: Vec<ImportCarDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCarDto {
    pub make: String,
    pub model: String,
    pub traveled_distance: i64,
    #[serde(default)]
    pub parts: ImportCarParts,
}

/// The `<parts>` wrapper of a car; a car without it has no parts.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ImportCarParts {
    #[serde(rename = "partId", default)]
    pub part_ids: Vec<ImportPartIdDto>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImportPartIdDto {
    #[serde(rename = "@id")]
    pub id: i32,
}

/// `<Customers>` document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename = "Customers")]
pub struct CustomersDocument {
    #[serde(rename = "Customer", default)]
    pub customers: Vec<ImportCustomerDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCustomerDto {
    pub name: String,
    pub birth_date: NaiveDateTime,
    pub is_young_driver: bool,
}

/// `<Sales>` document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename = "Sales")]
pub struct SalesDocument {
    #[serde(rename = "Sale", default)]
    pub sales: Vec<ImportSaleDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSaleDto {
    pub car_id: i32,
    pub customer_id: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
}

impl XmlDocument for SuppliersDocument {
    const ROOT: &'static str = "Suppliers";
}

impl XmlDocument for PartsDocument {
    const ROOT: &'static str = "Parts";
}

impl XmlDocument for CarsDocument {
    const ROOT: &'static str = "Cars";
}

impl XmlDocument for CustomersDocument {
    const ROOT: &'static str = "Customers";
}

impl XmlDocument for SalesDocument {
    const ROOT: &'static str = "Sales";
}
