//! Export pipelines: query → project → serialize.
//!
//! Every report has a query function returning its document, so the
//! projection can be inspected without going through XML, and [`export`]
//! which serializes the chosen report.

use crate::Report;
use crate::dto::export::{
    CarFromMakeDto, CarPartDto, CarPartsDto, CarWithDistanceDto, CarWithPartsDto,
    CarsFromMakeDocument, CarsWithDistanceDocument, CarsWithPartsDocument, CustomerSalesDocument,
    CustomerSalesDto, LocalSupplierDto, LocalSuppliersDocument, SaleCarDto, SaleWithDiscountDto,
    SalesWithDiscountDocument,
};
use crate::errors::DealerError;
use crate::models::{Car, Part};
use crate::store::Repository;
use crate::xml::write_document;
use log::info;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub const DEFAULT_MIN_DISTANCE: i64 = 2_000_000;
pub const DEFAULT_DISTANCE_LIMIT: usize = 10;
/// Hard cap on the `cars-with-distance` report, whatever limit is asked for.
pub const MAX_DISTANCE_LIMIT: usize = 10;
pub const DEFAULT_PARTS_LIMIT: usize = 5;
pub const DEFAULT_MAKE: &str = "BMW";

/// Multiplier applied to every part price for young drivers.
pub const YOUNG_DRIVER_RATE: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// Tunables for the reports that take them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Exclusive lower bound for `cars-with-distance`.
    pub min_distance: i64,
    /// Overrides the report's own row limit when set. `cars-with-distance`
    /// never goes above [`MAX_DISTANCE_LIMIT`].
    pub limit: Option<usize>,
    /// Make selected by `cars-from-make`.
    pub make: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_DISTANCE,
            limit: None,
            make: DEFAULT_MAKE.to_string(),
        }
    }
}

/// Run `report` and serialize its document.
pub fn export<R: Repository>(
    repo: &R,
    report: Report,
    options: &ExportOptions,
) -> Result<String, DealerError> {
    let xml = match report {
        Report::CarsWithDistance => write_document(&cars_with_distance(
            repo,
            options.min_distance,
            options
                .limit
                .map_or(DEFAULT_DISTANCE_LIMIT, |l| l.min(MAX_DISTANCE_LIMIT)),
        )?)?,
        Report::CarsFromMake => write_document(&cars_from_make(repo, &options.make)?)?,
        Report::LocalSuppliers => write_document(&local_suppliers(repo)?)?,
        Report::CarsWithParts => write_document(&cars_with_parts(
            repo,
            options.limit.unwrap_or(DEFAULT_PARTS_LIMIT),
        )?)?,
        Report::TotalSalesByCustomer => write_document(&total_sales_by_customer(repo)?)?,
        Report::SalesWithDiscount => write_document(&sales_with_applied_discount(repo)?)?,
    };
    info!("Exported {:?} ({} bytes)", report, xml.len());
    Ok(xml)
}

/// Cars that traveled more than `min_distance`, by make then model, at most
/// [`MAX_DISTANCE_LIMIT`] of them.
pub fn cars_with_distance<R: Repository>(
    repo: &R,
    min_distance: i64,
    limit: usize,
) -> Result<CarsWithDistanceDocument, DealerError> {
    let mut cars: Vec<Car> = repo
        .cars()?
        .into_iter()
        .filter(|c| c.traveled_distance > min_distance)
        .collect();
    cars.sort_by(|a, b| a.make.cmp(&b.make).then_with(|| a.model.cmp(&b.model)));

    Ok(CarsWithDistanceDocument {
        cars: cars
            .into_iter()
            .take(limit.min(MAX_DISTANCE_LIMIT))
            .map(|c| CarWithDistanceDto {
                make: c.make,
                model: c.model,
                traveled_distance: c.traveled_distance,
            })
            .collect(),
    })
}

/// Cars of one make, by model then longest distance first.
pub fn cars_from_make<R: Repository>(
    repo: &R,
    make: &str,
) -> Result<CarsFromMakeDocument, DealerError> {
    let mut cars: Vec<Car> = repo.cars()?.into_iter().filter(|c| c.make == make).collect();
    cars.sort_by(|a, b| {
        a.model
            .cmp(&b.model)
            .then_with(|| b.traveled_distance.cmp(&a.traveled_distance))
    });

    Ok(CarsFromMakeDocument {
        cars: cars
            .into_iter()
            .map(|c| CarFromMakeDto {
                id: c.id,
                model: c.model,
                traveled_distance: c.traveled_distance,
            })
            .collect(),
    })
}

/// Suppliers that are not importers, with the number of parts they supply.
pub fn local_suppliers<R: Repository>(repo: &R) -> Result<LocalSuppliersDocument, DealerError> {
    let mut parts_count: HashMap<i32, usize> = HashMap::new();
    for part in repo.parts()? {
        *parts_count.entry(part.supplier_id).or_default() += 1;
    }

    Ok(LocalSuppliersDocument {
        suppliers: repo
            .suppliers()?
            .into_iter()
            .filter(|s| !s.is_importer)
            .map(|s| LocalSupplierDto {
                parts_count: parts_count.get(&s.id).copied().unwrap_or(0),
                id: s.id,
                name: s.name,
            })
            .collect(),
    })
}

/// The `limit` cars with the longest distance, each with its parts by price.
pub fn cars_with_parts<R: Repository>(
    repo: &R,
    limit: usize,
) -> Result<CarsWithPartsDocument, DealerError> {
    let mut parts_by_car = parts_by_car(repo)?;
    let mut cars = repo.cars()?;
    cars.sort_by(|a, b| {
        b.traveled_distance
            .cmp(&a.traveled_distance)
            .then_with(|| a.model.cmp(&b.model))
    });

    Ok(CarsWithPartsDocument {
        cars: cars
            .into_iter()
            .take(limit)
            .map(|c| {
                let mut parts = parts_by_car.remove(&c.id).unwrap_or_default();
                parts.sort_by(|a, b| b.price.cmp(&a.price));
                CarWithPartsDto {
                    make: c.make,
                    model: c.model,
                    traveled_distance: c.traveled_distance,
                    parts: CarPartsDto {
                        parts: parts
                            .into_iter()
                            .map(|p| CarPartDto {
                                name: p.name,
                                price: p.price,
                            })
                            .collect(),
                    },
                }
            })
            .collect(),
    })
}

/// Customers with at least one sale, ordered by money spent, highest first.
///
/// A sale costs the sum of its car's part prices. For young drivers each part
/// price is discounted by 5% and rounded to cents before summing.
pub fn total_sales_by_customer<R: Repository>(
    repo: &R,
) -> Result<CustomerSalesDocument, DealerError> {
    let parts_by_car = parts_by_car(repo)?;

    let mut sales_by_customer: HashMap<i32, Vec<i32>> = HashMap::new();
    for sale in repo.sales()? {
        sales_by_customer
            .entry(sale.customer_id)
            .or_default()
            .push(sale.car_id);
    }

    let mut customers = Vec::new();
    for customer in repo.customers()? {
        let Some(car_ids) = sales_by_customer.get(&customer.id) else {
            continue;
        };
        let mut spent_money = Decimal::ZERO;
        for car_id in car_ids {
            let parts = parts_by_car.get(car_id).map(Vec::as_slice).unwrap_or(&[]);
            let price = car_price(parts, customer.is_young_driver)?;
            spent_money = spent_money.checked_add(price).ok_or_else(|| {
                DealerError::Arithmetic(format!("money spent by '{}' overflows", customer.name))
            })?;
        }
        customers.push(CustomerSalesDto {
            full_name: customer.name,
            bought_cars: car_ids.len(),
            spent_money,
        });
    }
    customers.sort_by(|a, b| b.spent_money.cmp(&a.spent_money));

    Ok(CustomerSalesDocument { customers })
}

/// Every sale with its car, customer, full price and discounted price.
///
/// The discount is reported in whole percent; the discounted price uses the
/// exact value.
pub fn sales_with_applied_discount<R: Repository>(
    repo: &R,
) -> Result<SalesWithDiscountDocument, DealerError> {
    let parts_by_car = parts_by_car(repo)?;
    let cars: HashMap<i32, Car> = repo.cars()?.into_iter().map(|c| (c.id, c)).collect();
    let customers: HashMap<i32, String> = repo
        .customers()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut sales = Vec::new();
    for sale in repo.sales()? {
        let (Some(car), Some(customer_name)) =
            (cars.get(&sale.car_id), customers.get(&sale.customer_id))
        else {
            continue;
        };
        let parts = parts_by_car.get(&car.id).map(Vec::as_slice).unwrap_or(&[]);
        let price = car_price(parts, false)?;
        let price_with_discount = discounted(price, sale.discount)?;
        sales.push(SaleWithDiscountDto {
            car: SaleCarDto {
                make: car.make.clone(),
                model: car.model.clone(),
                traveled_distance: car.traveled_distance,
            },
            discount: sale.discount.trunc(),
            customer_name: customer_name.clone(),
            price,
            price_with_discount,
        });
    }

    Ok(SalesWithDiscountDocument { sales })
}

/// Sum of part prices, with the young-driver rate applied per part.
pub fn car_price(parts: &[Part], young_driver: bool) -> Result<Decimal, DealerError> {
    parts.iter().try_fold(Decimal::ZERO, |total, p| {
        let price = if young_driver {
            p.price
                .checked_mul(YOUNG_DRIVER_RATE)
                .ok_or_else(|| overflow("young driver price", &p.name))?
                .round_dp(2)
        } else {
            p.price
        };
        total
            .checked_add(price)
            .ok_or_else(|| overflow("car price", &p.name))
    })
}

/// `price` reduced by `discount` percent, rounded to 4 decimal places.
pub fn discounted(price: Decimal, discount: Decimal) -> Result<Decimal, DealerError> {
    let rate = discount
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|d| Decimal::ONE.checked_sub(d))
        .ok_or_else(|| DealerError::Arithmetic(format!("discount {} overflows", discount)))?;
    let price_with_discount = price.checked_mul(rate).ok_or_else(|| {
        DealerError::Arithmetic(format!("{} with {}% discount overflows", price, discount))
    })?;
    Ok(price_with_discount.round_dp(4).normalize())
}

fn overflow(what: &str, part: &str) -> DealerError {
    DealerError::Arithmetic(format!("{} overflows at part '{}'", what, part))
}

fn parts_by_car<R: Repository>(repo: &R) -> Result<HashMap<i32, Vec<Part>>, DealerError> {
    let parts: HashMap<i32, Part> = repo.parts()?.into_iter().map(|p| (p.id, p)).collect();

    let mut by_car: HashMap<i32, Vec<Part>> = HashMap::new();
    for link in repo.part_cars()? {
        if let Some(part) = parts.get(&link.part_id) {
            by_car.entry(link.car_id).or_default().push(part.clone());
        }
    }
    Ok(by_car)
}
