//! Export documents: the projected shapes written by the report queries.
//!
//! Field names follow the kebab-case element and attribute names of the
//! output documents. Attributes use the `@` prefix understood by `quick-xml`.

use super::XmlDocument;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `<cars>` document of cars above a distance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "cars")]
pub struct CarsWithDistanceDocument {
    #[serde(rename = "car", default)]
    pub cars: Vec<CarWithDistanceDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarWithDistanceDto {
    pub make: String,
    pub model: String,
    #[serde(rename = "traveled-distance")]
    pub traveled_distance: i64,
}

/// `<cars>` document of cars of a single make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "cars")]
pub struct CarsFromMakeDocument {
    #[serde(rename = "car", default)]
    pub cars: Vec<CarFromMakeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarFromMakeDto {
    #[serde(rename = "@id")]
    pub id: i32,
    #[serde(rename = "@model")]
    pub model: String,
    #[serde(rename = "@traveled-distance")]
    pub traveled_distance: i64,
}

/// `<suppliers>` document of suppliers that are not importers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "suppliers")]
pub struct LocalSuppliersDocument {
    #[serde(rename = "supplier", default)]
    pub suppliers: Vec<LocalSupplierDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSupplierDto {
    #[serde(rename = "@id")]
    pub id: i32,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@parts-count")]
    pub parts_count: usize,
}

/// `<cars>` document listing each car with its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "cars")]
pub struct CarsWithPartsDocument {
    #[serde(rename = "car", default)]
    pub cars: Vec<CarWithPartsDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarWithPartsDto {
    #[serde(rename = "@make")]
    pub make: String,
    #[serde(rename = "@model")]
    pub model: String,
    #[serde(rename = "@traveled-distance")]
    pub traveled_distance: i64,
    #[serde(default)]
    pub parts: CarPartsDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CarPartsDto {
    #[serde(rename = "part", default)]
    pub parts: Vec<CarPartDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarPartDto {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@price", with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// `<customers>` document with total spend per customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "customers")]
pub struct CustomerSalesDocument {
    #[serde(rename = "customer", default)]
    pub customers: Vec<CustomerSalesDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSalesDto {
    #[serde(rename = "@full-name")]
    pub full_name: String,
    #[serde(rename = "@bought-cars")]
    pub bought_cars: usize,
    #[serde(rename = "@spent-money", with = "rust_decimal::serde::str")]
    pub spent_money: Decimal,
}

/// `<sales>` document with the discounted price of every sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename = "sales")]
pub struct SalesWithDiscountDocument {
    #[serde(rename = "sale", default)]
    pub sales: Vec<SaleWithDiscountDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleWithDiscountDto {
    pub car: SaleCarDto,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(rename = "customer-name")]
    pub customer_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(rename = "price-with-discount", with = "rust_decimal::serde::str")]
    pub price_with_discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleCarDto {
    #[serde(rename = "@make")]
    pub make: String,
    #[serde(rename = "@model")]
    pub model: String,
    #[serde(rename = "@traveled-distance")]
    pub traveled_distance: i64,
}

impl XmlDocument for CarsWithDistanceDocument {
    const ROOT: &'static str = "cars";
}

impl XmlDocument for CarsFromMakeDocument {
    const ROOT: &'static str = "cars";
}

impl XmlDocument for LocalSuppliersDocument {
    const ROOT: &'static str = "suppliers";
}

impl XmlDocument for CarsWithPartsDocument {
    const ROOT: &'static str = "cars";
}

impl XmlDocument for CustomerSalesDocument {
    const ROOT: &'static str = "customers";
}

impl XmlDocument for SalesWithDiscountDocument {
    const ROOT: &'static str = "sales";
}
