//! An overview of every month with records.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_yen, link,
    },
    navigation::NavBar,
    record::{MonthSummary, db::get_all_records, monthly_summaries},
};

/// The state needed for the months page.
#[derive(Debug, Clone)]
pub struct MonthsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MonthsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the months overview, latest month first.
pub async fn get_months_page(State(state): State<MonthsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_all_records(&connection)?;
    let mut summaries = monthly_summaries(&records);
    summaries.reverse();

    Ok(months_view(&summaries).into_response())
}

fn months_view(summaries: &[MonthSummary]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MONTHS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-4"
            {
                h1 class="text-xl font-bold" { "Months" }

                table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class="px-6 py-4 text-right" { "Income" }
                            th scope="col" class="px-6 py-4 text-right" { "Expense" }
                            th scope="col" class="px-6 py-4 text-right" { "Net" }
                            th scope="col" class="px-6 py-4 text-right" { "Records" }
                        }
                    }

                    tbody
                    {
                        @for summary in summaries {
                            tr class=(TABLE_ROW_STYLE) data-month=(summary.month)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    a
                                        href=(endpoints::with_month(endpoints::LEDGER_VIEW, &summary.month))
                                        class=(LINK_STYLE)
                                    {
                                        (summary.month.label())
                                    }
                                }
                                td class="px-6 py-4 text-right" { (format_yen(summary.totals.income)) }
                                td class="px-6 py-4 text-right" { (format_yen(summary.totals.expense)) }
                                td class="px-6 py-4 text-right" { (format_yen(summary.totals.net)) }
                                td class="px-6 py-4 text-right" { (summary.record_count) }
                            }
                        }

                        @if summaries.is_empty() {
                            tr
                            {
                                td
                                    colspan="5"
                                    data-empty-state="true"
                                    class="px-6 py-4 text-center"
                                {
                                    "No records yet. "
                                    (link(endpoints::LEDGER_VIEW, "Add one in the ledger."))
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Months", &content)
}
