//! Import pipelines: parse → drop dangling references → map → commit.
//!
//! Each import commits one [`ChangeSet`] and returns how many root records
//! were stored. Records pointing at ids the store does not know are skipped
//! without error; a malformed document stores nothing.

use crate::Dataset;
use crate::dto::import::{
    CarsDocument, CustomersDocument, PartsDocument, SalesDocument, SuppliersDocument,
};
use crate::errors::DealerError;
use crate::mapper;
use crate::store::{ChangeSet, Repository};
use crate::xml::parse_document;
use log::{debug, info};

/// Run the import for `dataset`.
pub fn import<R: Repository>(
    repo: &mut R,
    dataset: Dataset,
    xml: &str,
) -> Result<usize, DealerError> {
    match dataset {
        Dataset::Suppliers => import_suppliers(repo, xml),
        Dataset::Parts => import_parts(repo, xml),
        Dataset::Cars => import_cars(repo, xml),
        Dataset::Customers => import_customers(repo, xml),
        Dataset::Sales => import_sales(repo, xml),
    }
}

pub fn import_suppliers<R: Repository>(repo: &mut R, xml: &str) -> Result<usize, DealerError> {
    let doc: SuppliersDocument = parse_document(xml)?;

    let mut changes = ChangeSet::default();
    changes.add_suppliers(doc.suppliers.into_iter().map(mapper::supplier));

    let summary = repo.commit(changes)?;
    info!("Imported {} suppliers", summary.suppliers);
    Ok(summary.suppliers)
}

/// Import parts, skipping any whose supplier is not stored.
pub fn import_parts<R: Repository>(repo: &mut R, xml: &str) -> Result<usize, DealerError> {
    let doc: PartsDocument = parse_document(xml)?;
    let supplier_ids = repo.supplier_ids()?;

    let total = doc.parts.len();
    let parts: Vec<_> = doc
        .parts
        .into_iter()
        .filter(|p| supplier_ids.contains(&p.supplier_id))
        .map(mapper::part)
        .collect();
    if parts.len() < total {
        debug!(
            "Skipped {} parts with unknown supplier ids",
            total - parts.len()
        );
    }

    let mut changes = ChangeSet::default();
    changes.add_parts(parts);

    let summary = repo.commit(changes)?;
    info!("Imported {} parts", summary.parts);
    Ok(summary.parts)
}

/// Import cars with one join record per distinct, known part id.
pub fn import_cars<R: Repository>(repo: &mut R, xml: &str) -> Result<usize, DealerError> {
    let doc: CarsDocument = parse_document(xml)?;
    let part_ids = repo.part_ids()?;

    let mut skipped = 0;
    let cars: Vec<_> = doc
        .cars
        .into_iter()
        .map(mapper::car)
        .map(|mut car| {
            let before = car.part_ids.len();
            car.part_ids.retain(|id| part_ids.contains(id));
            skipped += before - car.part_ids.len();
            car
        })
        .collect();
    if skipped > 0 {
        debug!("Skipped {} car part references to unknown parts", skipped);
    }

    let mut changes = ChangeSet::default();
    changes.add_cars(cars);

    let summary = repo.commit(changes)?;
    info!(
        "Imported {} cars with {} part links",
        summary.cars, summary.part_cars
    );
    Ok(summary.cars)
}

pub fn import_customers<R: Repository>(repo: &mut R, xml: &str) -> Result<usize, DealerError> {
    let doc: CustomersDocument = parse_document(xml)?;

    let mut changes = ChangeSet::default();
    changes.add_customers(doc.customers.into_iter().map(mapper::customer));

    let summary = repo.commit(changes)?;
    info!("Imported {} customers", summary.customers);
    Ok(summary.customers)
}

/// Import sales, skipping any whose car is not stored.
pub fn import_sales<R: Repository>(repo: &mut R, xml: &str) -> Result<usize, DealerError> {
    let doc: SalesDocument = parse_document(xml)?;
    let car_ids = repo.car_ids()?;

    let total = doc.sales.len();
    let sales: Vec<_> = doc
        .sales
        .into_iter()
        .map(mapper::sale)
        .filter(|s| car_ids.contains(&s.car_id))
        .collect();
    if sales.len() < total {
        debug!("Skipped {} sales with unknown car ids", total - sales.len());
    }

    let mut changes = ChangeSet::default();
    changes.add_sales(sales);

    let summary = repo.commit(changes)?;
    info!("Imported {} sales", summary.sales);
    Ok(summary.sales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    const SUPPLIERS: &str = r#"<Suppliers>
  <Supplier><name>3M Company</name><isImporter>true</isImporter></Supplier>
  <Supplier><name>Agway Inc.</name><isImporter>false</isImporter></Supplier>
</Suppliers>"#;

    #[test]
    fn test_import_suppliers_counts_all() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(import_suppliers(&mut store, SUPPLIERS).unwrap(), 2);
    }

    #[test]
    fn test_import_parts_skips_unknown_supplier() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        import_suppliers(&mut store, SUPPLIERS).unwrap();

        let parts = r#"<Parts>
  <Part><name>Bonnet/hood</name><price>1001.34</price><quantity>10</quantity><supplierId>1</supplierId></Part>
  <Part><name>Door shell</name><price>600.00</price><quantity>3</quantity><supplierId>31</supplierId></Part>
  <Part><name>Fender</name><price>3.10</price><quantity>1</quantity><supplierId>2</supplierId></Part>
</Parts>"#;

        assert_eq!(import_parts(&mut store, parts).unwrap(), 2);
        let names: Vec<_> = store.parts().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Bonnet/hood", "Fender"]);
    }

    #[test]
    fn test_import_dispatches_by_dataset() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(import(&mut store, Dataset::Suppliers, SUPPLIERS).unwrap(), 2);
    }

    #[test]
    fn test_malformed_document_stores_nothing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let broken = "<Suppliers><Supplier><name>3M Company</name></Suppliers>";

        assert!(import_suppliers(&mut store, broken).is_err());
        assert!(store.suppliers().unwrap().is_empty());
    }
}
