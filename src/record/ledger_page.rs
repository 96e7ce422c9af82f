//! The ledger page: the records of one month with the month's totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_leg, format_yen,
    },
    navigation::NavBar,
    record::{
        MonthKey, MonthNavigation, ModalState, Record, Totals,
        db::get_all_records,
        modal::{MODAL_SYNC, modal_view},
        months_present, select_month, totals,
    },
};

/// The htmx event that tells the ledger content and the modal that the
/// records they show may be out of date.
pub(super) const RECORDS_CHANGED_EVENT: &str = "records-changed";

/// The max number of graphemes to display in the details column before
/// truncating and displaying ellipses.
const MAX_DETAILS_GRAPHEMES: usize = 32;

/// Requests that replace the ledger content share this sync scope, so a slow
/// response for an earlier month never overwrites a later one.
const LEDGER_SYNC: &str = "#ledger:replace";

const INCOME_STYLE: &str = "text-green-700 dark:text-green-300";
const EXPENSE_STYLE: &str = "text-red-700 dark:text-red-300";

/// The state needed for the ledger page and its content.
#[derive(Debug, Clone)]
pub struct LedgerPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LedgerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The month to show, e.g. `?month=2025-10`.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    /// The requested month. Malformed months are ignored so the view falls
    /// back to the latest month.
    pub(super) fn month_key(&self) -> Option<MonthKey> {
        let month = self.month.as_deref()?;

        month
            .parse()
            .inspect_err(|error| tracing::debug!("Ignoring month query: {error}"))
            .ok()
    }
}

/// Render the full ledger page.
pub async fn get_ledger_page(
    State(state): State<LedgerPageState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_all_records(&connection)?;

    Ok(ledger_page_view(&records, query.month_key()).into_response())
}

/// Render the ledger content for htmx swaps, e.g. when changing month or
/// after the records have changed.
pub async fn get_ledger_content(
    State(state): State<LedgerPageState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match get_all_records(&connection) {
        Ok(records) => ledger_content_view(&records, query.month_key()).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn ledger_page_view(records: &[Record], month: Option<MonthKey>) -> Markup {
    let nav_bar = NavBar::new(endpoints::LEDGER_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE) hx-target-error="#alert-container"
        {
            div id="ledger" class="w-full lg:max-w-5xl"
            {
                (ledger_content_view(records, month))
            }

            div
                id="modal-container"
                hx-get=(endpoints::CLOSE_MODAL)
                hx-trigger={ "keyup[key=='Escape'] from:body, " (RECORDS_CHANGED_EVENT) " from:body" }
                hx-sync=(MODAL_SYNC)
            {
                (modal_view(&ModalState::Closed))
            }
        }
    };

    base("Ledger", &content)
}

/// The month navigation, totals and record table for `month`.
///
/// Falls back to the latest month with records if `month` is `None` or has
/// no records. Swapped into `#ledger`.
pub(super) fn ledger_content_view(records: &[Record], month: Option<MonthKey>) -> Markup {
    let navigation = MonthNavigation::new(months_present(records), month);
    let refresh_url = match &navigation {
        Some(navigation) => endpoints::with_month(endpoints::LEDGER_CONTENT, &navigation.current()),
        None => endpoints::LEDGER_CONTENT.to_owned(),
    };

    html! {
        section
            id="ledger-content"
            class="space-y-4"
            hx-get=(refresh_url)
            hx-trigger={ (RECORDS_CHANGED_EVENT) " from:body" }
            hx-target="#ledger"
            hx-sync=(LEDGER_SYNC)
        {
            header class="flex justify-between flex-wrap items-end gap-4"
            {
                h1 class="text-xl font-bold" { "Ledger" }

                button
                    type="button"
                    hx-get=(endpoints::NEW_RECORD_MODAL)
                    hx-target="#modal-container"
                    hx-sync=(MODAL_SYNC)
                    class={ "w-auto! " (BUTTON_PRIMARY_STYLE) }
                {
                    "Add Record"
                }
            }

            @match navigation {
                Some(navigation) => {
                    (month_navigation_view(&navigation))

                    @let month_records = select_month(records, navigation.current());

                    (totals_view(&totals(month_records.iter().copied())))
                    (records_table_view(&month_records))
                }
                None => {
                    p data-empty-state="true" class="px-6 py-4 text-center"
                    {
                        "No records yet. Add one to get started."
                    }
                }
            }
        }
    }
}

fn month_navigation_view(navigation: &MonthNavigation) -> Markup {
    let month_link = |month: MonthKey, label: &str, is_enabled: bool| {
        html! {
            @if is_enabled {
                a
                    href=(endpoints::with_month(endpoints::LEDGER_VIEW, &month))
                    hx-get=(endpoints::with_month(endpoints::LEDGER_CONTENT, &month))
                    hx-target="#ledger"
                    hx-sync=(LEDGER_SYNC)
                    hx-push-url=(endpoints::with_month(endpoints::LEDGER_VIEW, &month))
                    class="px-3 py-1 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
                {
                    (label)
                }
            } @else {
                span
                    aria-disabled="true"
                    class="px-3 py-1 text-gray-400 dark:text-gray-600"
                {
                    (label)
                }
            }
        }
    };

    html! {
        nav class="flex items-center justify-between" aria-label="Month"
        {
            (month_link(navigation.earlier(), "← Earlier", navigation.has_earlier()))

            h2 class="text-lg font-semibold" data-month=(navigation.current())
            {
                (navigation.current().label())
            }

            (month_link(navigation.later(), "Later →", navigation.has_later()))
        }
    }
}

fn totals_view(totals: &Totals) -> Markup {
    let net_style = if totals.net < 0 {
        EXPENSE_STYLE
    } else {
        INCOME_STYLE
    };

    let card = |label: &str, amount: i64, style: &str| {
        html! {
            div class="p-4 rounded bg-white dark:bg-gray-800 shadow-sm"
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
                p class={ "text-xl font-semibold " (style) } data-total=(label.to_lowercase())
                {
                    (format_yen(amount))
                }
            }
        }
    };

    html! {
        div class="grid grid-cols-3 gap-4"
        {
            (card("Income", totals.income, INCOME_STYLE))
            (card("Expense", totals.expense, EXPENSE_STYLE))
            (card("Net", totals.net, net_style))
        }
    }
}

fn records_table_view(records: &[&Record]) -> Markup {
    html! {
        table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Details" }
                    th scope="col" class="px-6 py-4 text-right" { "In" }
                    th scope="col" class="px-6 py-4 text-right" { "Out" }
                }
            }

            tbody
            {
                @for record in records {
                    (record_row_view(record))
                }
            }
        }
    }
}

fn record_row_view(record: &Record) -> Markup {
    let (details, full_details) = format_details(&record.details);

    html! {
        tr
            class={ (TABLE_ROW_STYLE) " cursor-pointer hover:bg-gray-50 dark:hover:bg-gray-600" }
            hx-get=(endpoints::format_endpoint(endpoints::RECORD_MODAL, record.id))
            hx-target="#modal-container"
            hx-sync=(MODAL_SYNC)
            data-record-id=(record.id)
        {
            td class=(TABLE_CELL_STYLE) { (record.date) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (record.category) }
            }
            td class=(TABLE_CELL_STYLE) title=[full_details] { (details) }
            td class={ "px-6 py-4 text-right " (INCOME_STYLE) } { (format_leg(record.in_amount)) }
            td class={ "px-6 py-4 text-right " (EXPENSE_STYLE) } { (format_leg(record.out_amount)) }
        }
    }
}

fn format_details(details: &str) -> (String, Option<&str>) {
    let details_length = details.graphemes(true).count();

    if details_length <= MAX_DETAILS_GRAPHEMES {
        (details.to_owned(), None)
    } else {
        let truncated: String = details
            .graphemes(true)
            .take(MAX_DETAILS_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(details))
    }
}
