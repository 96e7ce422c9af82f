//! Database set up and sample data.

use rusqlite::{Connection, Transaction};
use time::macros::date;

use crate::{
    Error,
    record::{Amount, Category, NewRecord, create_record, create_record_table},
};

/// Create all the tables used by the app.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = connection.unchecked_transaction()?;
    create_tables(&transaction)?;
    transaction.commit()?;

    Ok(())
}

fn create_tables(transaction: &Transaction) -> Result<(), rusqlite::Error> {
    create_record_table(transaction)
}

/// Insert a small set of sample records spanning two months.
///
/// # Errors
/// Returns an error if any record cannot be inserted. No records are kept in that case.
pub fn seed_sample_records(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    for record in sample_records()? {
        create_record(record, &transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

fn sample_records() -> Result<Vec<NewRecord>, Error> {
    Ok(vec![
        NewRecord::build(date!(2025 - 09 - 25), Category::new("給料")?)
            .details("September salary")
            .in_amount(Some(Amount::new(300_000)?)),
        NewRecord::build(date!(2025 - 09 - 30), Category::new("住居費")?)
            .details("Rent")
            .out_amount(Some(Amount::new(85_000)?)),
        NewRecord::build(date!(2025 - 10 - 02), Category::new("食費")?)
            .details("Lunch")
            .out_amount(Some(Amount::new(1_800)?)),
        NewRecord::build(date!(2025 - 10 - 05), Category::new("日用品")?)
            .details("Detergent and tissues")
            .out_amount(Some(Amount::new(1_200)?))
            .memo("Drugstore near the station"),
        NewRecord::build(date!(2025 - 10 - 10), Category::new("交通費")?)
            .details("Train pass refund")
            .in_amount(Some(Amount::new(2_000)?))
            .out_amount(Some(Amount::new(500)?))
            .memo("Refund minus fee"),
    ])
}
