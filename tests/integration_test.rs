//! Integration tests for the car-dealer binary.
//!
//! These tests write XML datasets to a temporary directory and run the
//! binary against a temporary database file, checking the messages and the
//! exported documents.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

// --- Helper Functions ---

/// Helper to get the binary command for testing.
fn get_cmd(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("car-dealer").unwrap();
    cmd.env_remove("CAR_DEALER_DB").arg("--database").arg(db);
    cmd
}

fn write_datasets(dir: &Path) {
    fs::write(
        dir.join("suppliers.xml"),
        r#"<Suppliers>
  <Supplier><name>3M Company</name><isImporter>true</isImporter></Supplier>
  <Supplier><name>Agway Inc.</name><isImporter>false</isImporter></Supplier>
</Suppliers>"#,
    )
    .unwrap();
    fs::write(
        dir.join("parts.xml"),
        r#"<Parts>
  <Part><name>Bonnet/hood</name><price>60.00</price><quantity>10</quantity><supplierId>1</supplierId></Part>
  <Part><name>Door shell</name><price>40.00</price><quantity>3</quantity><supplierId>2</supplierId></Part>
  <Part><name>Ghost part</name><price>1.00</price><quantity>1</quantity><supplierId>42</supplierId></Part>
</Parts>"#,
    )
    .unwrap();
    fs::write(
        dir.join("cars.xml"),
        r#"<Cars>
  <Car>
    <make>BMW</make><model>1M Coupe</model><traveledDistance>39826890</traveledDistance>
    <parts><partId id="1"/><partId id="2"/><partId id="2"/></parts>
  </Car>
</Cars>"#,
    )
    .unwrap();
    fs::write(
        dir.join("customers.xml"),
        r#"<Customers>
  <Customer><name>Hai Everton</name><birthDate>1998-03-21T00:00:00</birthDate><isYoungDriver>true</isYoungDriver></Customer>
</Customers>"#,
    )
    .unwrap();
    fs::write(
        dir.join("sales.xml"),
        r#"<Sales>
  <Sale><carId>1</carId><customerId>1</customerId><discount>20</discount></Sale>
  <Sale><carId>8</carId><customerId>1</customerId><discount>20</discount></Sale>
</Sales>"#,
    )
    .unwrap();
}

// --- Test Cases ---

#[test]
fn test_import_single_dataset() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    write_datasets(dir.path());

    get_cmd(&db)
        .arg("import")
        .arg("suppliers")
        .arg(dir.path().join("suppliers.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported 2"));

    get_cmd(&db)
        .arg("import")
        .arg("parts")
        .arg(dir.path().join("parts.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported 2"));
}

#[test]
fn test_import_all_then_export_total_sales() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    write_datasets(dir.path());

    get_cmd(&db)
        .arg("import-all")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully imported 2\nSuccessfully imported 2\nSuccessfully imported 1\nSuccessfully imported 1\nSuccessfully imported 1",
        ));

    get_cmd(&db)
        .arg("export")
        .arg("total-sales-by-customer")
        .assert()
        .success()
        .stdout(predicate::str::contains("<customers>"))
        .stdout(predicate::str::contains("full-name=\"Hai Everton\""))
        .stdout(predicate::str::contains("bought-cars=\"1\""))
        .stdout(predicate::str::contains("spent-money=\"95.00\""))
        .stdout(predicate::str::contains("xmlns").not());
}

#[test]
fn test_in_memory_import_leaves_no_database_file() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    write_datasets(dir.path());

    get_cmd(&db)
        .arg("--in-memory")
        .arg("import-all")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported 2"));

    assert!(!db.exists());
}

#[test]
fn test_export_to_file() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    let output = dir.path().join("out").join("sales.xml");
    write_datasets(dir.path());
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    get_cmd(&db).arg("import-all").arg(dir.path()).assert().success();

    get_cmd(&db)
        .arg("export")
        .arg("sales-with-discount")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<sales>"));
    assert!(xml.contains("<customer-name>Hai Everton</customer-name>"));
    assert!(xml.contains("<price>100.00</price>"));
    assert!(xml.contains("<price-with-discount>80</price-with-discount>"));
}

#[test]
fn test_export_cars_with_distance_options() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    write_datasets(dir.path());

    get_cmd(&db).arg("import-all").arg(dir.path()).assert().success();

    get_cmd(&db)
        .arg("export")
        .arg("cars-with-distance")
        .assert()
        .success()
        .stdout(predicate::str::contains("<make>BMW</make>"))
        .stdout(predicate::str::contains(
            "<traveled-distance>39826890</traveled-distance>",
        ));

    get_cmd(&db)
        .arg("export")
        .arg("cars-with-distance")
        .arg("--min-distance")
        .arg("50000000")
        .assert()
        .success()
        .stdout(predicate::str::contains("<car>").not());
}

#[test]
fn test_malformed_input_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    let input = dir.path().join("broken.xml");
    fs::write(&input, "<Suppliers><Supplier><name>x</name>").unwrap();

    get_cmd(&db)
        .arg("import")
        .arg("suppliers")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fatal error"));
}

#[test]
fn test_wrong_root_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");
    write_datasets(dir.path());

    get_cmd(&db)
        .arg("import")
        .arg("parts")
        .arg(dir.path().join("suppliers.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unexpected root element"));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("dealer.db");

    get_cmd(&db)
        .arg("import")
        .arg("cars")
        .arg(dir.path().join("nope.xml"))
        .assert()
        .failure();
}
