//! Bills, payments and the client for the remote bill service.

mod client;
mod report;
mod types;

pub use client::{BillClient, BillQuery};
pub use report::{
    PaymentReport, ReportRow, REPORT_COLUMNS, REPORT_FILE_NAME, REPORT_MIME, REPORT_TITLE,
    ROWS_PER_PAGE,
};
pub use types::{
    format_amount, is_payable, parse_date, plain_amount, Bill, BillDraft, Category, NewBill, Payment,
    PaymentDraft, PaymentRequest, PaymentSummary, PaymentUpdate, PaymentUpdateDraft, DATE_FORMAT,
    PLACEHOLDER_IMAGE,
};
