//! The JSON API for records.
//!
//! Errors are returned as `{"error": "..."}` with a status code that follows
//! the [crate::ErrorKind] of the error.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    record::{
        RecordDraft, RecordId,
        db::{get_all_records, get_record},
        lifecycle,
    },
    timezone::today,
};

/// The state needed for the record API.
#[derive(Debug, Clone)]
pub struct RecordsApiState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordsApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl RecordsApiState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// `GET /records`: every record, newest first.
pub async fn list_records_json(State(state): State<RecordsApiState>) -> Response {
    state
        .connection()
        .and_then(|connection| get_all_records(&connection))
        .map(|records| Json(records).into_response())
        .unwrap_or_else(Error::into_json_response)
}

/// `GET /records/{record_id}`: a single record.
pub async fn get_record_json(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordsApiState>,
) -> Response {
    state
        .connection()
        .and_then(|connection| get_record(record_id, &connection))
        .map(|record| Json(record).into_response())
        .unwrap_or_else(Error::into_json_response)
}

/// `POST /records`: create a record and return it with status 201.
pub async fn create_record_json(
    State(state): State<RecordsApiState>,
    payload: Result<Json<RecordDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let result = today(&state.local_timezone).and_then(|today| {
        let connection = state.connection()?;
        lifecycle::create(draft, today, &connection)
    });

    match result {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// `PUT /records/{record_id}`: replace a record.
pub async fn update_record_json(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordsApiState>,
    payload: Result<Json<RecordDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let result = today(&state.local_timezone).and_then(|today| {
        let connection = state.connection()?;
        lifecycle::update(record_id, draft, today, &connection)
    });

    match result {
        Ok(()) => Json(json!({ "message": "Record updated" })).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// `DELETE /records/{record_id}`: delete a record.
pub async fn delete_record_json(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordsApiState>,
) -> Response {
    let result = state
        .connection()
        .and_then(|connection| lifecycle::delete(record_id, &connection));

    match result {
        Ok(()) => Json(json!({ "message": "Record deleted" })).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// Bodies that are not JSON, or do not have the shape of a record, are
/// rejected like any other invalid input.
fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!("Rejected record body: {rejection}");

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}
