//! Field mapping from import DTOs to insertable entities.

use crate::dto::import::{
    ImportCarDto, ImportCustomerDto, ImportPartDto, ImportSaleDto, ImportSupplierDto,
};
use crate::models::{NewCar, NewCustomer, NewPart, NewSale, NewSupplier};
use std::collections::HashSet;

pub fn supplier(dto: ImportSupplierDto) -> NewSupplier {
    NewSupplier {
        name: dto.name,
        is_importer: dto.is_importer,
    }
}

pub fn part(dto: ImportPartDto) -> NewPart {
    NewPart {
        name: dto.name,
        price: dto.price,
        quantity: dto.quantity,
        supplier_id: dto.supplier_id,
    }
}

/// Map a car, collapsing repeated `partId` references into one entry each.
///
/// First-occurrence order of the part ids is kept.
pub fn car(dto: ImportCarDto) -> NewCar {
    let mut seen = HashSet::new();
    let part_ids = dto
        .parts
        .part_ids
        .iter()
        .map(|p| p.id)
        .filter(|id| seen.insert(*id))
        .collect();

    NewCar {
        make: dto.make,
        model: dto.model,
        traveled_distance: dto.traveled_distance,
        part_ids,
    }
}

pub fn customer(dto: ImportCustomerDto) -> NewCustomer {
    NewCustomer {
        name: dto.name,
        birth_date: dto.birth_date,
        is_young_driver: dto.is_young_driver,
    }
}

pub fn sale(dto: ImportSaleDto) -> NewSale {
    NewSale {
        car_id: dto.car_id,
        customer_id: dto.customer_id,
        discount: dto.discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::import::{ImportCarParts, ImportPartIdDto};

    fn car_with_parts(ids: &[i32]) -> ImportCarDto {
        ImportCarDto {
            make: "Opel".to_string(),
            model: "Omega".to_string(),
            traveled_distance: 176_664_996,
            parts: ImportCarParts {
                part_ids: ids.iter().map(|&id| ImportPartIdDto { id }).collect(),
            },
        }
    }

    #[test]
    fn test_car_deduplicates_part_ids_in_order() {
        let car = car(car_with_parts(&[38, 102, 38, 23, 102]));
        assert_eq!(car.part_ids, vec![38, 102, 23]);
        assert_eq!(car.make, "Opel");
        assert_eq!(car.traveled_distance, 176_664_996);
    }

    #[test]
    fn test_car_without_parts() {
        let car = car(car_with_parts(&[]));
        assert!(car.part_ids.is_empty());
    }
}
