//! Saving changes to a record from the ledger modal.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    record::{
        ModalEvent, ModalState, MonthKey, RecordDraft, RecordId,
        db::{get_all_records, get_record},
        ledger_page::ledger_content_view,
        lifecycle,
        modal::{modal_oob_view, stale_record_response},
    },
    timezone::today,
};

/// The state needed for updating a record.
#[derive(Debug, Clone)]
pub struct UpdateRecordState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle the edit record form.
///
/// On success, responds with the re-fetched ledger content for the record's
/// month and shows the saved record in the modal.
pub async fn update_record_endpoint(
    Path(record_id): Path<RecordId>,
    State(state): State<UpdateRecordState>,
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

    if let Err(error) = lifecycle::update(record_id, draft, today, &connection) {
        return stale_record_response(error);
    }

    let (record, records) = match get_record(record_id, &connection)
        .and_then(|record| Ok((record, get_all_records(&connection)?)))
    {
        Ok(fetched) => fetched,
        Err(error) => return stale_record_response(error),
    };

    let month = MonthKey::of(record.date);
    let modal = ModalState::Editing(Some(record.clone())).transition(ModalEvent::Saved(record));

    html! {
        (ledger_content_view(&records, Some(month)))
        (modal_oob_view(&modal))
    }
    .into_response()
}
