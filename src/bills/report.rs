//! Payment history report, downloaded from the my-bills view as a PDF table.

use super::types::{plain_amount, Payment};
use crate::errors::AppError;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

pub const REPORT_TITLE: &str = "My Bills Report";
pub const REPORT_FILE_NAME: &str = "my-bills-report.pdf";
pub const REPORT_MIME: &str = "application/pdf";
pub const REPORT_COLUMNS: [&str; 6] = ["Username", "Email", "Amount", "Address", "Phone", "Date"];

// A4 portrait, millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 14.0;
const TITLE_TOP: f32 = 20.0;
const TABLE_TOP: f32 = 30.0;
const ROW_HEIGHT: f32 = 7.0;
const COLUMN_WIDTHS: [f32; 6] = [28.0, 46.0, 20.0, 44.0, 24.0, 22.0];
const TITLE_SIZE: f32 = 16.0;
const CELL_SIZE: f32 = 9.0;
// Roughly what fits in a millimetre of Helvetica at `CELL_SIZE`.
const CHARS_PER_MM: f32 = 0.52;

/// Rows per page, header excluded.
pub const ROWS_PER_PAGE: usize = 34;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub cells: [String; 6],
}

impl ReportRow {
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            cells: [
                payment.username.clone(),
                payment.email.clone(),
                plain_amount(payment.amount),
                payment.address.clone(),
                payment.phone.clone(),
                payment.date.clone(),
            ],
        }
    }

    fn header() -> Self {
        Self {
            cells: REPORT_COLUMNS.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentReport {
    rows: Vec<ReportRow>,
}

impl PaymentReport {
    pub fn from_payments(payments: &[Payment]) -> Self {
        Self {
            rows: payments.iter().map(ReportRow::from_payment).collect(),
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows split into pages; an empty report still has one (header-only) page.
    pub fn pages(&self) -> Vec<&[ReportRow]> {
        if self.rows.is_empty() {
            return vec![self.rows.as_slice()];
        }
        self.rows.chunks(ROWS_PER_PAGE).collect()
    }

    /// # Errors
    ///
    /// Returns `AppError::Report` when the document cannot be written.
    pub fn to_pdf(&self) -> Result<Vec<u8>, AppError> {
        let (doc, page, layer) =
            PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;

        let mut layer = doc.get_page(page).get_layer(layer);
        layer.use_text(REPORT_TITLE, TITLE_SIZE, Mm(MARGIN_X), from_top(TITLE_TOP), &bold);

        for (index, rows) in self.pages().into_iter().enumerate() {
            if index > 0 {
                let (page, next) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page).get_layer(next);
            }
            write_row(&layer, &ReportRow::header(), TABLE_TOP, &bold);
            for (offset, row) in rows.iter().enumerate() {
                let top = TABLE_TOP + ROW_HEIGHT * (offset + 1) as f32;
                write_row(&layer, row, top, &regular);
            }
        }

        doc.save_to_bytes().map_err(render_error)
    }
}

fn write_row(layer: &PdfLayerReference, row: &ReportRow, top: f32, font: &IndirectFontRef) {
    let mut x = MARGIN_X;
    for (cell, width) in row.cells.iter().zip(COLUMN_WIDTHS) {
        layer.use_text(fit_cell(cell, width), CELL_SIZE, Mm(x), from_top(top), font);
        x += width;
    }
}

fn from_top(top: f32) -> Mm {
    Mm(PAGE_HEIGHT - top)
}

/// Truncates a cell to the characters its column can show.
fn fit_cell(value: &str, width: f32) -> String {
    let value = value.trim();
    let limit = (width * CHARS_PER_MM) as usize;
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let kept: String = value.chars().take(limit.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn render_error(err: printpdf::Error) -> AppError {
    AppError::Report(format!("Failed to render report: {err}"))
}
