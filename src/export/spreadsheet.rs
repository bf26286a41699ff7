//! Spreadsheet export: a two-column "Description" / "Amount" sheet.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use super::{ExportError, QuoteDocument, RowStyle};
use crate::pricing::round_money;

const EURO_FORMAT: &str = "€ #,##0.00";

/// Render the quote as an `.xlsx` workbook
pub fn render_spreadsheet(quote: &QuoteDocument) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let header = Format::new().set_bold();
    let title = Format::new().set_bold();
    let money = Format::new().set_num_format(EURO_FORMAT);
    let money_bold = Format::new().set_num_format(EURO_FORMAT).set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&quote.quote_number)?;
    worksheet.set_column_width(0, 55)?;
    worksheet.set_column_width(1, 16)?;

    worksheet.write_string_with_format(0, 0, "Description", &header)?;
    worksheet.write_string_with_format(0, 1, "Amount", &header)?;

    let mut row: u32 = 1;
    for quote_row in quote.rows() {
        let emphasised = matches!(
            quote_row.style,
            RowStyle::ServiceTitle | RowStyle::ServiceTotal | RowStyle::Total
        );

        if emphasised {
            worksheet.write_string_with_format(row, 0, &quote_row.description, &title)?;
        } else {
            worksheet.write_string(row, 0, &quote_row.description)?;
        }

        if let Some(amount) = quote_row.amount {
            let value = round_money(amount, 2).to_f64().unwrap_or_default();
            let format = if emphasised { &money_bold } else { &money };
            worksheet.write_number_with_format(row, 1, value, format)?;
        }

        row += 1;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_quote;

    #[test]
    fn test_render_spreadsheet_produces_xlsx_archive() {
        let bytes = render_spreadsheet(&sample_quote()).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }
}
