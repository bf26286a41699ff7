//! Quote export to spreadsheet and PDF.
//!
//! Both formats render the same row list built from a session snapshot,
//! so they always agree on what the customer is charged.

pub mod document;
pub mod spreadsheet;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::BusinessDetails;
use crate::pricing::calculators::{format_quantity, TAX_RATE};
use crate::pricing::QuoteSnapshot;

pub use document::render_document;
pub use spreadsheet::render_spreadsheet;

/// Export error types
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Customer name is required before exporting a quote")]
    MissingCustomerName,

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Document error: {0}")]
    Document(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Visual role of a row in the exported table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    ServiceTitle,
    Line,
    ServiceTotal,
    Adjustment,
    Subtotal,
    Tax,
    Total,
}

/// One row of the two-column quote table
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub style: RowStyle,
    pub description: String,
    pub amount: Option<Decimal>,
}

impl QuoteRow {
    fn new(style: RowStyle, description: impl Into<String>, amount: Option<Decimal>) -> Self {
        Self {
            style,
            description: description.into(),
            amount,
        }
    }
}

/// A snapshot stamped with its quote number and date, ready to render
#[derive(Debug, Clone)]
pub struct QuoteDocument {
    pub quote_number: String,
    pub date: String,
    pub business: BusinessDetails,
    pub snapshot: QuoteSnapshot,
}

impl QuoteDocument {
    /// Stamp a snapshot for export.
    ///
    /// Fails when the customer has no name; nothing has been rendered at
    /// that point.
    pub fn prepare(
        snapshot: QuoteSnapshot,
        business: BusinessDetails,
        now: DateTime<Local>,
    ) -> Result<Self, ExportError> {
        if !snapshot.customer.has_name() {
            return Err(ExportError::MissingCustomerName);
        }

        Ok(Self {
            quote_number: quote_number(now),
            date: now.format("%d-%m-%Y").to_string(),
            business,
            snapshot,
        })
    }

    pub fn rows(&self) -> Vec<QuoteRow> {
        quote_rows(&self.snapshot)
    }
}

/// `PWC` followed by the timestamp to the minute
pub fn quote_number(now: DateTime<Local>) -> String {
    format!("PWC{}", now.format("%Y%m%d%H%M"))
}

/// Label for the tax row, e.g. `Tax 21%`
pub fn tax_label() -> String {
    format!("Tax {}%", (TAX_RATE * Decimal::ONE_HUNDRED).normalize())
}

/// Flatten a snapshot into table rows: per service its title, lines and
/// total, then adjustments and the quote totals.
pub fn quote_rows(snapshot: &QuoteSnapshot) -> Vec<QuoteRow> {
    let mut rows = Vec::new();

    for entry in &snapshot.cart.entries {
        rows.push(QuoteRow::new(RowStyle::ServiceTitle, entry.title.clone(), None));
        for line in &entry.lines {
            rows.push(QuoteRow::new(
                RowStyle::Line,
                format!("{} ({})", line.label, format_quantity(line.quantity)),
                Some(line.amount),
            ));
        }
        rows.push(QuoteRow::new(
            RowStyle::ServiceTotal,
            format!("Total {}", entry.title),
            Some(entry.total),
        ));
    }

    for adjustment in &snapshot.cart.adjustments {
        rows.push(QuoteRow::new(
            RowStyle::Adjustment,
            adjustment.label.clone(),
            Some(adjustment.amount),
        ));
    }

    let totals = snapshot.cart.totals;
    rows.push(QuoteRow::new(RowStyle::Subtotal, "Subtotal", Some(totals.subtotal)));
    rows.push(QuoteRow::new(RowStyle::Tax, tax_label(), Some(totals.tax)));
    rows.push(QuoteRow::new(RowStyle::Total, "Total", Some(totals.grand_total)));

    rows
}

/// Paths of a written export
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub spreadsheet: PathBuf,
    pub document: PathBuf,
}

/// Render both artifacts and write them into `dir` as `<quote number>.xlsx`
/// and `<quote number>.pdf`.
///
/// Both are rendered in memory first, so a rendering failure leaves no
/// file behind.
pub fn write_exports(
    quote: &QuoteDocument,
    dir: &Path,
    logo: Option<&Path>,
) -> Result<ExportPaths, ExportError> {
    let spreadsheet_bytes = render_spreadsheet(quote)?;
    let document_bytes = render_document(quote, logo)?;

    fs::create_dir_all(dir)?;
    let paths = ExportPaths {
        spreadsheet: dir.join(format!("{}.xlsx", quote.quote_number)),
        document: dir.join(format!("{}.pdf", quote.quote_number)),
    };
    fs::write(&paths.spreadsheet, spreadsheet_bytes)?;
    fs::write(&paths.document, document_bytes)?;

    info!(
        "Quote {} exported to {} and {}",
        quote.quote_number,
        paths.spreadsheet.display(),
        paths.document.display()
    );
    Ok(paths)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pricing::{
        Customer, QuoteCommand, QuoteSession, QuoteSettings, ServiceInput,
    };
    use crate::pricing::models::WindowCounts;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    pub(crate) fn sample_session(name: &str) -> QuoteSession {
        let mut session = QuoteSession::new(QuoteSettings::default());
        session.set_customer(Customer {
            name: name.to_string(),
            address: "Kerkstraat 1\n9000 Gent".to_string(),
            email: "klant@example.com".to_string(),
        });
        for input in [
            ServiceInput::Windows(WindowCounts {
                small_inside: 10,
                ..Default::default()
            }),
            ServiceInput::SolarPanels { panels: 20 },
        ] {
            session.apply(QuoteCommand::AddService(input)).unwrap();
        }
        session
    }

    pub(crate) fn sample_quote() -> QuoteDocument {
        QuoteDocument::prepare(
            sample_session("Jan Peeters").snapshot(),
            BusinessDetails::default(),
            Local.with_ymd_and_hms(2026, 3, 9, 14, 5, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_quote_number_format() {
        let now = Local.with_ymd_and_hms(2026, 3, 9, 14, 5, 59).unwrap();
        assert_eq!(quote_number(now), "PWC202603091405");
    }

    #[test]
    fn test_prepare_stamps_number_and_date() {
        let quote = sample_quote();
        assert_eq!(quote.quote_number, "PWC202603091405");
        assert_eq!(quote.date, "09-03-2026");
    }

    #[test]
    fn test_prepare_requires_customer_name() {
        let result = QuoteDocument::prepare(
            sample_session("  ").snapshot(),
            BusinessDetails::default(),
            Local::now(),
        );
        assert!(matches!(result, Err(ExportError::MissingCustomerName)));
    }

    #[test]
    fn test_tax_label() {
        assert_eq!(tax_label(), "Tax 21%");
    }

    #[test]
    fn test_quote_rows_layout() {
        let rows = sample_quote().rows();
        let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();

        assert_eq!(
            descriptions,
            vec![
                "Window cleaning",
                "Small windows inside (10)",
                "Total Window cleaning",
                "Solar panels",
                "Clean solar panels (20)",
                "Total Solar panels",
                "Subtotal",
                "Tax 21%",
                "Total",
            ]
        );
        assert_eq!(rows[1].amount, Some(dec!(20.00)));
        assert_eq!(rows[2].amount, Some(dec!(50.00)));
        assert_eq!(rows[6].amount, Some(dec!(150.00)));
        assert_eq!(rows[7].amount, Some(dec!(31.50)));
        assert_eq!(rows[8].amount, Some(dec!(181.50)));
        assert_eq!(rows[0].amount, None);
    }

    #[test]
    fn test_write_exports_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let quote = sample_quote();

        let paths = write_exports(&quote, dir.path(), None).unwrap();

        assert!(paths.spreadsheet.ends_with("PWC202603091405.xlsx"));
        assert!(paths.document.ends_with("PWC202603091405.pdf"));
        assert!(fs::metadata(&paths.spreadsheet).unwrap().len() > 0);
        let pdf = fs::read(&paths.document).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_exports_missing_logo_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let quote = sample_quote();
        let missing = dir.path().join("no-logo.png");

        let paths = write_exports(&quote, dir.path(), Some(&missing)).unwrap();
        assert!(paths.document.exists());
    }
}
