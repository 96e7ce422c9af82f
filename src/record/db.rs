//! Database operations for records.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    record::{Amount, Category, NewRecord, Record, RecordId},
};

const RECORD_COLUMNS: &str = "id, date, category, details, in_amount, out_amount, memo";

/// Insert a record and return it with its generated ID.
pub fn create_record(record: NewRecord, connection: &Connection) -> Result<Record, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO record (date, category, details, in_amount, out_amount, memo)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {RECORD_COLUMNS};"
        ))?
        .query_row(
            (
                record.date,
                record.category.as_ref(),
                &record.details,
                record.in_amount.map(Amount::get),
                record.out_amount.map(Amount::get),
                &record.memo,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single record by ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no record with `record_id`.
pub fn get_record(record_id: RecordId, connection: &Connection) -> Result<Record, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM record WHERE id = :id;"
        ))?
        .query_row(&[(":id", &record_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all records, newest date first. Records on the same date are
/// ordered by ID, highest first.
///
/// Rows with a date that cannot be read are skipped and logged.
pub fn get_all_records(connection: &Connection) -> Result<Vec<Record>, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM record ORDER BY date DESC, id DESC;"
        ))?
        .query_map([], map_row)?
        .filter_map(|maybe_record| match maybe_record {
            Ok(record) => Some(Ok(record)),
            Err(rusqlite::Error::FromSqlConversionFailure(column, _, error)) => {
                tracing::warn!("Skipping record with unreadable column {column}: {error}");
                None
            }
            Err(error) => Some(Err(error.into())),
        })
        .collect()
}

/// Replace every field of the record with `record_id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingRecord] if there is no record with `record_id`.
pub fn update_record(
    record_id: RecordId,
    record: NewRecord,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE record
        SET date = ?1, category = ?2, details = ?3, in_amount = ?4, out_amount = ?5, memo = ?6
        WHERE id = ?7",
        (
            record.date,
            record.category.as_ref(),
            &record.details,
            record.in_amount.map(Amount::get),
            record.out_amount.map(Amount::get),
            &record.memo,
            record_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(())
}

/// Delete a record by ID.
///
/// # Errors
///
/// Returns [Error::DeleteMissingRecord] if there is no record with `record_id`.
pub fn delete_record(record_id: RecordId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM record WHERE id = ?1", [record_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Initialize the record table and indexes.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS record (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            details TEXT NOT NULL DEFAULT '',
            in_amount INTEGER CHECK (in_amount IS NULL OR in_amount BETWEEN 0 AND 1000000000000),
            out_amount INTEGER CHECK (out_amount IS NULL OR out_amount BETWEEN 0 AND 1000000000000),
            memo TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_record_date ON record(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Record, rusqlite::Error> {
    let raw_category: String = row.get(2)?;

    Ok(Record {
        id: row.get(0)?,
        date: row.get(1)?,
        category: Category::new_unchecked(&raw_category),
        details: row.get(3)?,
        in_amount: get_amount(row, 4)?,
        out_amount: get_amount(row, 5)?,
        memo: row.get(6)?,
    })
}

fn get_amount(row: &Row, index: usize) -> Result<Option<Amount>, rusqlite::Error> {
    let Some(value) = row.get::<_, Option<i64>>(index)? else {
        return Ok(None);
    };

    Amount::new(value).map(Some).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, error.into())
    })
}

#[cfg(test)]
mod record_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        record::{Amount, Category, NewRecord},
    };

    use super::{
        create_record, create_record_table, delete_record, get_all_records, get_record,
        update_record,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_record_table(&connection).expect("Could not create record table");
        connection
    }

    fn food(out_amount: i64) -> NewRecord {
        NewRecord::build(date!(2025 - 10 - 02), Category::new_unchecked("食費"))
            .details("Lunch")
            .out_amount(Some(Amount::new(out_amount).unwrap()))
    }

    #[test]
    fn create_record_succeeds() {
        let connection = get_test_db_connection();
        let new_record = food(1800).memo("with coworkers");

        let record =
            create_record(new_record.clone(), &connection).expect("Could not create record");

        assert!(record.id > 0);
        assert_eq!(record.date, new_record.date);
        assert_eq!(record.category, new_record.category);
        assert_eq!(record.details, "Lunch");
        assert_eq!(record.in_amount, None);
        assert_eq!(record.out_amount, Some(Amount::new(1800).unwrap()));
        assert_eq!(record.memo, "with coworkers");
    }

    #[test]
    fn table_rejects_amounts_above_max() {
        let connection = get_test_db_connection();

        let result = connection.execute(
            "INSERT INTO record (date, category, in_amount) VALUES ('2025-10-02', '給料', ?1)",
            (Amount::MAX + 1,),
        );

        assert!(result.is_err());
        create_record(food(Amount::MAX), &connection).expect("Could not create record at max");
    }

    #[test]
    fn create_record_is_not_idempotent() {
        let connection = get_test_db_connection();

        let first = create_record(food(1800), &connection).unwrap();
        let second = create_record(food(1800), &connection).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(get_all_records(&connection).unwrap().len(), 2);
    }

    #[test]
    fn zero_amount_is_stored_distinct_from_absent() {
        let connection = get_test_db_connection();
        let new_record = food(0);

        let record = create_record(new_record, &connection).unwrap();
        let got = get_record(record.id, &connection).unwrap();

        assert_eq!(got.out_amount, Some(Amount::new(0).unwrap()));
        assert_eq!(got.in_amount, None);
    }

    #[test]
    fn get_record_succeeds() {
        let connection = get_test_db_connection();
        let inserted = create_record(food(1800), &connection).unwrap();

        let selected = get_record(inserted.id, &connection);

        assert_eq!(selected, Ok(inserted));
    }

    #[test]
    fn get_record_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted = create_record(food(1800), &connection).unwrap();

        let selected = get_record(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_records_orders_newest_first() {
        let connection = get_test_db_connection();
        let september = create_record(
            NewRecord::build(date!(2025 - 09 - 30), Category::new_unchecked("給料"))
                .in_amount(Some(Amount::new(300_000).unwrap())),
            &connection,
        )
        .unwrap();
        let first_october = create_record(food(1800), &connection).unwrap();
        let second_october = create_record(food(900), &connection).unwrap();

        let records = get_all_records(&connection).unwrap();

        assert_eq!(records, vec![second_october, first_october, september]);
    }

    #[test]
    fn get_all_records_skips_unreadable_dates() {
        let connection = get_test_db_connection();
        let valid = create_record(food(1800), &connection).unwrap();
        connection
            .execute(
                "INSERT INTO record (date, category) VALUES ('not-a-date', '食費')",
                (),
            )
            .unwrap();

        let records = get_all_records(&connection).unwrap();

        assert_eq!(records, vec![valid]);
    }

    #[test]
    fn update_record_replaces_all_fields() {
        let connection = get_test_db_connection();
        let record = create_record(food(1800), &connection).unwrap();
        let replacement =
            NewRecord::build(date!(2025 - 09 - 15), Category::new_unchecked("交通費"))
                .details("Train")
                .in_amount(Some(Amount::new(50).unwrap()))
                .memo("refund");

        update_record(record.id, replacement.clone(), &connection).unwrap();

        let updated = get_record(record.id, &connection).unwrap();
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.date, replacement.date);
        assert_eq!(updated.category, replacement.category);
        assert_eq!(updated.details, "Train");
        assert_eq!(updated.in_amount, Some(Amount::new(50).unwrap()));
        assert_eq!(updated.out_amount, None);
        assert_eq!(updated.memo, "refund");
    }

    #[test]
    fn update_record_with_invalid_id_returns_not_found_and_leaves_store_unchanged() {
        let connection = get_test_db_connection();
        let record = create_record(food(1800), &connection).unwrap();

        let result = update_record(999, food(1), &connection);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
        assert_eq!(get_all_records(&connection).unwrap(), vec![record]);
    }

    #[test]
    fn delete_record_succeeds() {
        let connection = get_test_db_connection();
        let record = create_record(food(1800), &connection).unwrap();

        delete_record(record.id, &connection).unwrap();

        assert_eq!(get_record(record.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_record_twice_returns_not_found() {
        let connection = get_test_db_connection();
        let record = create_record(food(1800), &connection).unwrap();

        delete_record(record.id, &connection).unwrap();
        let result = delete_record(record.id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingRecord));
    }

    #[test]
    fn negative_amounts_are_rejected_by_the_table() {
        let connection = get_test_db_connection();

        let result = connection.execute(
            "INSERT INTO record (date, category, in_amount) VALUES ('2025-10-02', '食費', -1)",
            (),
        );

        assert!(result.is_err());
    }
}
