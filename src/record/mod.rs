//! Ledger records: storage, monthly aggregation, writes and the pages built on them.

mod aggregation;
mod api;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod draft;
mod edit_endpoint;
mod ledger_page;
mod lifecycle;
mod modal;
mod months_page;

pub use aggregation::{
    MonthKey, MonthNavigation, MonthSummary, Totals, monthly_summaries, months_present,
    select_month, totals,
};
pub use api::{
    create_record_json, delete_record_json, get_record_json, list_records_json,
    update_record_json,
};
pub use create_endpoint::create_record_endpoint;
pub use db::{
    create_record, create_record_table, delete_record, get_all_records, get_record,
    update_record,
};
pub use delete_endpoint::delete_record_endpoint;
pub use domain::{Amount, Category, NewRecord, Record, RecordId};
pub use draft::{AmountInput, RecordDraft};
pub use edit_endpoint::update_record_endpoint;
pub use ledger_page::{get_ledger_content, get_ledger_page};
pub use lifecycle::{ModalEvent, ModalState};
pub use modal::{get_close_modal, get_edit_record_modal, get_new_record_modal, get_record_modal};
pub use months_page::get_months_page;
