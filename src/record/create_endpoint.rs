//! Adding a record from the ledger modal.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    record::{
        ModalEvent, ModalState, MonthKey, RecordDraft,
        db::get_all_records,
        ledger_page::ledger_content_view,
        lifecycle,
        modal::modal_oob_view,
    },
    timezone::today,
};

/// The state needed for creating a record.
#[derive(Debug, Clone)]
pub struct CreateRecordState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle the add record form.
///
/// On success, responds with the re-fetched ledger content for the new
/// record's month and closes the modal. On failure, responds with an alert
/// and leaves the form as it was.
pub async fn create_record_endpoint(
    State(state): State<CreateRecordState>,
    Form(draft): Form<RecordDraft>,
) -> Response {
    let today = match today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let record = match lifecycle::create(draft, today, &connection) {
        Ok(record) => record,
        Err(error) => return error.into_alert_response(),
    };

    let records = match get_all_records(&connection) {
        Ok(records) => records,
        Err(error) => return error.into_alert_response(),
    };

    let modal = ModalState::Editing(None).transition(ModalEvent::SavedNew);

    html! {
        (ledger_content_view(&records, Some(MonthKey::of(record.date))))
        (modal_oob_view(&modal))
    }
    .into_response()
}
