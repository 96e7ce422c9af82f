//! Record writes and the state of the record modal.
//!
//! Every write validates the draft before touching the database, so a
//! rejected draft leaves the store as it was. Views re-fetch the records
//! after each write instead of patching what they already hold.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    record::{
        Record, RecordDraft, RecordId,
        db::{create_record, delete_record, update_record},
    },
};

/// Validate `draft` and insert it as a new record.
///
/// Calling this twice with the same draft creates two records.
pub fn create(draft: RecordDraft, today: Date, connection: &Connection) -> Result<Record, Error> {
    let new_record = draft.validate(today)?;
    let record = create_record(new_record, connection)?;

    tracing::debug!("Created record {}", record.id);

    Ok(record)
}

/// Validate `draft` and replace the record with `record_id` with it.
///
/// # Errors
///
/// Returns a validation error if the draft is invalid, or
/// [Error::UpdateMissingRecord] if there is no record with `record_id`.
pub fn update(
    record_id: RecordId,
    draft: RecordDraft,
    today: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let new_record = draft.validate(today)?;
    update_record(record_id, new_record, connection)?;

    tracing::debug!("Updated record {record_id}");

    Ok(())
}

/// Delete the record with `record_id`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingRecord] if there is no record with `record_id`,
/// including when it has already been deleted.
pub fn delete(record_id: RecordId, connection: &Connection) -> Result<(), Error> {
    delete_record(record_id, connection)?;

    tracing::debug!("Deleted record {record_id}");

    Ok(())
}

/// What the record modal is showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    /// No modal.
    #[default]
    Closed,
    /// The details of a record, read only.
    Viewing(Record),
    /// The record form. `None` when adding a new record.
    Editing(Option<Record>),
}

/// Something the user did, or a write that finished, that may change the modal.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalEvent {
    /// A row of the ledger table was clicked.
    SelectRow(Record),
    /// The edit button of the details view was clicked.
    Edit,
    /// The add button was clicked.
    Add,
    /// An existing record was saved, holding the re-fetched record.
    Saved(Record),
    /// A new record was saved.
    SavedNew,
    /// The record with this ID was deleted.
    Deleted(RecordId),
    /// The modal was dismissed.
    Cancel,
}

impl ModalState {
    /// The state after `event`.
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: ModalEvent) -> ModalState {
        match (self, event) {
            (_, ModalEvent::Cancel) => ModalState::Closed,
            (ModalState::Closed, ModalEvent::SelectRow(record)) => ModalState::Viewing(record),
            (ModalState::Closed, ModalEvent::Add) => ModalState::Editing(None),
            (ModalState::Viewing(record), ModalEvent::Edit) => ModalState::Editing(Some(record)),
            (ModalState::Editing(Some(_)), ModalEvent::Saved(record)) => {
                ModalState::Viewing(record)
            }
            (ModalState::Editing(None), ModalEvent::SavedNew) => ModalState::Closed,
            (ModalState::Viewing(record), ModalEvent::Deleted(id))
            | (ModalState::Editing(Some(record)), ModalEvent::Deleted(id))
                if record.id == id =>
            {
                ModalState::Closed
            }
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod write_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        record::{
            Amount, AmountInput, RecordDraft,
            db::{get_all_records, get_record},
        },
    };

    use super::{create, delete, update};

    const TODAY: time::Date = date!(2025 - 10 - 16);

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn draft(category: &str) -> RecordDraft {
        RecordDraft {
            date: Some("2025-10-02".to_owned()),
            category: Some(category.to_owned()),
            out_amount: Some(AmountInput::Text("1800".to_owned())),
            ..Default::default()
        }
    }

    #[test]
    fn create_with_empty_income_and_text_expense() {
        let connection = get_test_connection();
        let draft = RecordDraft {
            in_amount: Some(AmountInput::Text(String::new())),
            out_amount: Some(AmountInput::Text("4500".to_owned())),
            ..draft("食費")
        };

        let record = create(draft, TODAY, &connection).unwrap();

        let stored = get_record(record.id, &connection).unwrap();
        assert_eq!(stored.in_amount, None);
        assert_eq!(stored.out_amount, Some(Amount::new(4500).unwrap()));
    }

    #[test]
    fn create_with_empty_date_uses_today() {
        let connection = get_test_connection();
        let draft = RecordDraft {
            date: Some(String::new()),
            ..draft("食費")
        };

        let record = create(draft, TODAY, &connection).unwrap();

        assert_eq!(record.date, TODAY);
    }

    #[test]
    fn invalid_create_leaves_store_unchanged() {
        let connection = get_test_connection();

        let result = create(draft(""), TODAY, &connection);

        assert_eq!(result, Err(Error::EmptyCategory));
        assert!(get_all_records(&connection).unwrap().is_empty());
    }

    #[test]
    fn update_missing_record_returns_not_found_and_leaves_store_unchanged() {
        let connection = get_test_connection();
        let record = create(draft("食費"), TODAY, &connection).unwrap();

        let result = update(999, draft("交通費"), TODAY, &connection);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
        assert_eq!(get_all_records(&connection).unwrap(), vec![record]);
    }

    #[test]
    fn invalid_update_leaves_record_unchanged() {
        let connection = get_test_connection();
        let record = create(draft("食費"), TODAY, &connection).unwrap();
        let invalid = RecordDraft {
            out_amount: Some(AmountInput::Integer(-5)),
            ..draft("交通費")
        };

        let result = update(record.id, invalid, TODAY, &connection);

        assert_eq!(result, Err(Error::NegativeAmount(-5)));
        assert_eq!(get_record(record.id, &connection), Ok(record));
    }

    #[test]
    fn update_replaces_record() {
        let connection = get_test_connection();
        let record = create(draft("食費"), TODAY, &connection).unwrap();

        update(record.id, draft("交通費"), TODAY, &connection).unwrap();

        let updated = get_record(record.id, &connection).unwrap();
        assert_eq!(updated.category.as_ref(), "交通費");
    }

    #[test]
    fn deleted_record_is_gone_from_list() {
        let connection = get_test_connection();
        let kept = create(draft("給料"), TODAY, &connection).unwrap();
        let deleted = create(draft("食費"), TODAY, &connection).unwrap();

        delete(deleted.id, &connection).unwrap();

        assert_eq!(get_all_records(&connection).unwrap(), vec![kept]);
    }

    #[test]
    fn delete_twice_returns_not_found() {
        let connection = get_test_connection();
        let record = create(draft("食費"), TODAY, &connection).unwrap();

        delete(record.id, &connection).unwrap();

        assert_eq!(
            delete(record.id, &connection),
            Err(Error::DeleteMissingRecord)
        );
    }
}
