//! The record modal: viewing, adding and editing a record on the ledger page.
//!
//! The modal is rendered into `#modal-container`. Each request that can
//! change the modal syncs on that container with the `replace` strategy, so
//! dismissing the modal aborts a save or delete that is still in flight and
//! only the latest response is applied.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxResponseTrigger;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, ErrorKind, endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_leg, loading_spinner,
    },
    record::{
        Amount, ModalEvent, ModalState, MonthKey, Record, RecordId, db::get_record,
        ledger_page::RECORDS_CHANGED_EVENT,
    },
};

/// Requests that load into the modal or save from it share this sync scope,
/// so a newer request aborts one still in flight and only its result is applied.
pub(super) const MODAL_SYNC: &str = "#modal-container:replace";

/// The state needed to show a record in the modal.
#[derive(Debug, Clone)]
pub struct RecordModalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordModalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Open the empty form for adding a record.
pub async fn get_new_record_modal() -> Response {
    let state = ModalState::Closed.transition(ModalEvent::Add);

    modal_view(&state).into_response()
}

/// Show the details of a record.
pub async fn get_record_modal(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordModalState>,
) -> Response {
    match load_record(record_id, &state) {
        Ok(record) => {
            let state = ModalState::Closed.transition(ModalEvent::SelectRow(record));
            modal_view(&state).into_response()
        }
        Err(error) => stale_record_response(error),
    }
}

/// Open the form for editing a record.
pub async fn get_edit_record_modal(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordModalState>,
) -> Response {
    match load_record(record_id, &state) {
        Ok(record) => {
            let state = ModalState::Viewing(record).transition(ModalEvent::Edit);
            modal_view(&state).into_response()
        }
        Err(error) => stale_record_response(error),
    }
}

/// Dismiss the modal.
pub async fn get_close_modal() -> Response {
    modal_view(&ModalState::Closed).into_response()
}

fn load_record(record_id: RecordId, state: &RecordModalState) -> Result<Record, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_record(record_id, &connection)
}

/// Turn an error from a record request into an alert.
///
/// If the record no longer exists the response also triggers
/// [RECORDS_CHANGED_EVENT], which re-fetches the ledger content and closes
/// the modal so the missing record disappears from view.
pub(super) fn stale_record_response(error: Error) -> Response {
    if error.kind() == ErrorKind::NotFound {
        tracing::debug!("Record went missing: {error}");
        (
            HxResponseTrigger::normal([RECORDS_CHANGED_EVENT]),
            error.into_alert_response(),
        )
            .into_response()
    } else {
        error.into_alert_response()
    }
}

/// The modal for `state`, swapped into `#modal-container`.
pub(super) fn modal_view(state: &ModalState) -> Markup {
    match state {
        ModalState::Closed => html! {},
        ModalState::Viewing(record) => {
            dialog_view("viewing", "Record", &record_details_view(record))
        }
        ModalState::Editing(None) => dialog_view("adding", "New Record", &record_form_view(None)),
        ModalState::Editing(Some(record)) => {
            dialog_view("editing", "Edit Record", &record_form_view(Some(record)))
        }
    }
}

/// The modal for `state` as an out-of-band swap, for responses that target
/// the ledger content.
pub(super) fn modal_oob_view(state: &ModalState) -> Markup {
    html! {
        div id="modal-container" hx-swap-oob="innerHTML"
        {
            (modal_view(state))
        }
    }
}

fn dialog_view(state_name: &str, title: &str, body: &Markup) -> Markup {
    html! {
        div class="fixed inset-0 z-50 flex items-center justify-center bg-gray-900/50 p-4"
        {
            div
                role="dialog"
                aria-modal="true"
                aria-labelledby="modal-title"
                data-modal-state=(state_name)
                class="w-full max-w-md p-6 space-y-4 rounded-lg shadow-lg bg-white
                    dark:bg-gray-800 text-gray-900 dark:text-white"
            {
                h2 id="modal-title" class="text-xl font-bold" { (title) }

                (body)
            }
        }
    }
}

fn cancel_button() -> Markup {
    html! {
        button
            type="button"
            hx-get=(endpoints::CLOSE_MODAL)
            hx-target="#modal-container"
            hx-sync=(MODAL_SYNC)
            class=(BUTTON_SECONDARY_STYLE)
        {
            "Cancel"
        }
    }
}

fn record_details_view(record: &Record) -> Markup {
    let record_url = endpoints::format_endpoint(endpoints::RECORD_MODAL, record.id);
    let delete_url = endpoints::with_month(&record_url, &MonthKey::of(record.date));
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_RECORD_MODAL, record.id);

    html! {
        dl class="grid grid-cols-3 gap-2 text-sm"
        {
            dt class="font-medium" { "Date" }
            dd class="col-span-2" { (record.date) }

            dt class="font-medium" { "Category" }
            dd class="col-span-2"
            {
                span class=(CATEGORY_BADGE_STYLE) { (record.category) }
            }

            dt class="font-medium" { "Details" }
            dd class="col-span-2" { (record.details) }

            dt class="font-medium" { "In" }
            dd class="col-span-2" data-leg="in" { (format_leg(record.in_amount)) }

            dt class="font-medium" { "Out" }
            dd class="col-span-2" data-leg="out" { (format_leg(record.out_amount)) }

            dt class="font-medium" { "Memo" }
            dd class="col-span-2 whitespace-pre-line" { (record.memo) }
        }

        div class="flex items-center justify-between gap-4"
        {
            button
                type="button"
                hx-delete=(delete_url)
                hx-confirm="Delete this record? This cannot be undone."
                hx-target="#ledger"
                hx-target-error="#alert-container"
                hx-sync=(MODAL_SYNC)
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }

            div class="flex gap-2"
            {
                button
                    type="button"
                    hx-get=(edit_url)
                    hx-target="#modal-container"
                    hx-sync=(MODAL_SYNC)
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    "Edit"
                }

                (cancel_button())
            }
        }
    }
}

fn record_form_view(record: Option<&Record>) -> Markup {
    let (hx_post, hx_put) = match record {
        Some(record) => (
            None,
            Some(endpoints::format_endpoint(endpoints::RECORD_MODAL, record.id)),
        ),
        None => (Some(endpoints::LEDGER_RECORDS.to_owned()), None),
    };
    let date = record.map(|record| record.date.to_string()).unwrap_or_default();
    let category = record.map(|record| record.category.as_ref()).unwrap_or_default();
    let details = record.map(|record| record.details.as_str()).unwrap_or_default();
    let in_amount = record.and_then(|record| record.in_amount).map(Amount::get);
    let out_amount = record.and_then(|record| record.out_amount).map(Amount::get);
    let memo = record.map(|record| record.memo.as_str()).unwrap_or_default();
    let spinner = loading_spinner();

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="#ledger"
            hx-target-error="#alert-container"
            hx-sync=(MODAL_SYNC)
            hx-disabled-elt="find button[type=submit]"
            hx-indicator="#indicator"
            class="space-y-4"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id="date"
                    type="date"
                    name="date"
                    value=(date)
                    class=(FORM_TEXT_INPUT_STYLE);
                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    "Leave empty for today."
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    id="category"
                    type="text"
                    name="category"
                    value=(category)
                    placeholder="食費"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="details" class=(FORM_LABEL_STYLE) { "Details" }
                input
                    id="details"
                    type="text"
                    name="details"
                    value=(details)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="inAmount" class=(FORM_LABEL_STYLE) { "In" }
                    input
                        id="inAmount"
                        type="number"
                        name="inAmount"
                        min="0"
                        step="1"
                        inputmode="numeric"
                        value=[in_amount]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="outAmount" class=(FORM_LABEL_STYLE) { "Out" }
                    input
                        id="outAmount"
                        type="number"
                        name="outAmount"
                        min="0"
                        step="1"
                        inputmode="numeric"
                        value=[out_amount]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="memo" class=(FORM_LABEL_STYLE) { "Memo" }
                textarea
                    id="memo"
                    name="memo"
                    rows="2"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (memo)
                }
            }

            div class="flex gap-2"
            {
                button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (spinner) }
                    "Save"
                }

                (cancel_button())
            }
        }
    }
}


#[cfg(test)]
mod modal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        db::initialize,
        record::{Category, NewRecord, create_record},
        test_utils::{get_header, parse_html_fragment},
    };

    use super::{
        RecordModalState, get_close_modal, get_edit_record_modal, get_new_record_modal,
        get_record_modal,
    };

    fn get_test_state() -> RecordModalState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        RecordModalState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[track_caller]
    fn dialog_state(html: &scraper::Html) -> Option<String> {
        html.select(&Selector::parse("[role=dialog]").unwrap())
            .next()
            .and_then(|dialog| dialog.value().attr("data-modal-state"))
            .map(ToOwned::to_owned)
    }

    #[tokio::test]
    async fn record_modal_views_record() {
        let state = get_test_state();
        let record = create_record(
            NewRecord::build(date!(2025 - 10 - 02), Category::new_unchecked("食費")),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_record_modal(Path(record.id), State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(dialog_state(&html).as_deref(), Some("viewing"));
    }

    #[tokio::test]
    async fn edit_modal_edits_record() {
        let state = get_test_state();
        let record = create_record(
            NewRecord::build(date!(2025 - 10 - 02), Category::new_unchecked("食費")),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_edit_record_modal(Path(record.id), State(state)).await;

        let html = parse_html_fragment(response).await;
        assert_eq!(dialog_state(&html).as_deref(), Some("editing"));
    }

    #[tokio::test]
    async fn missing_record_triggers_refresh() {
        let state = get_test_state();

        let response = get_record_modal(Path(999), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(get_header(&response, "hx-trigger"), "records-changed");
        let html = parse_html_fragment(response).await;
        assert!(dialog_state(&html).is_none());
    }

    #[tokio::test]
    async fn new_and_close_modals() {
        let html = parse_html_fragment(get_new_record_modal().await).await;
        assert_eq!(dialog_state(&html).as_deref(), Some("adding"));

        let html = parse_html_fragment(get_close_modal().await).await;
        assert_eq!(dialog_state(&html), None);
    }
}
