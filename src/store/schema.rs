use super::StoreError;
use rusqlite::{Connection, OptionalExtension, Transaction};

pub const SCHEMA_VERSION: i64 = 1;

/// Create the dealership tables inside an open SQLite database.
///
/// Enables foreign keys, creates every table if missing and records the
/// schema version. A database stamped with another version is rejected.
pub(crate) fn initialise_schema(connection: &mut Connection) -> Result<(), StoreError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| StoreError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| StoreError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| StoreError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), StoreError> {
    run_migration_step(
        transaction,
        "create suppliers",
        "CREATE TABLE IF NOT EXISTS suppliers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_importer INTEGER NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create parts",
        "CREATE TABLE IF NOT EXISTS parts (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            price TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            supplier_id INTEGER NOT NULL,
            FOREIGN KEY (supplier_id) REFERENCES suppliers(id)
        )",
    )?;
    run_migration_step(
        transaction,
        "create cars",
        "CREATE TABLE IF NOT EXISTS cars (
            id INTEGER PRIMARY KEY,
            make TEXT NOT NULL,
            model TEXT NOT NULL,
            traveled_distance INTEGER NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create parts_cars",
        "CREATE TABLE IF NOT EXISTS parts_cars (
            part_id INTEGER NOT NULL,
            car_id INTEGER NOT NULL,
            PRIMARY KEY (part_id, car_id),
            FOREIGN KEY (part_id) REFERENCES parts(id) ON DELETE CASCADE,
            FOREIGN KEY (car_id) REFERENCES cars(id) ON DELETE CASCADE
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create customers",
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            is_young_driver INTEGER NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create sales",
        "CREATE TABLE IF NOT EXISTS sales (
            id INTEGER PRIMARY KEY,
            car_id INTEGER NOT NULL,
            customer_id INTEGER NOT NULL,
            discount TEXT NOT NULL,
            FOREIGN KEY (car_id) REFERENCES cars(id),
            FOREIGN KEY (customer_id) REFERENCES customers(id)
        )",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), StoreError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|source| StoreError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(StoreError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        None => {
            transaction
                .execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )
                .map_err(|source| StoreError::Migration {
                    step: "record schema version",
                    source,
                })?;
        }
    }

    Ok(())
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), StoreError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| StoreError::Migration { step, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialise_schema_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialise_schema(&mut conn).unwrap();
        initialise_schema(&mut conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_initialise_schema_rejects_other_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialise_schema(&mut conn).unwrap();
        conn.execute("UPDATE schema_version SET version = 7", [])
            .unwrap();

        let result = initialise_schema(&mut conn);
        assert!(matches!(
            result,
            Err(StoreError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found: 7
            })
        ));
    }
}
