//! PDF report generation - expense table plus summary totals.

use crate::model::ExpenseRecord;
use crate::store::CategoryTotals;
use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Fixed report file name, written to the working directory.
pub const REPORT_FILE: &str = "expense_report.pdf";

// A4 portrait
const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 8.0;

/// Vendor names longer than this are truncated in the table.
const VENDOR_DISPLAY_WIDTH: usize = 20;

// Table column positions
const COL_VENDOR: f32 = MARGIN;
const COL_DATE: f32 = 85.0;
const COL_TOTAL: f32 = 120.0;
const COL_CATEGORY: f32 = 150.0;

/// Write the expense report for the given records to `path`.
///
/// Layout follows the dashboard: a table row per accepted record (vendor,
/// date, total, category) followed by per-category sums in declared order
/// and the overall sum. Pages break automatically.
pub fn write_report(records: &[ExpenseRecord], path: &Path) -> Result<()> {
    let mut report = ReportWriter::new()?;

    report.row(&[(MARGIN, "Expense Report")], true, 16.0);
    let generated = format!("Generated {}", chrono::Local::now().format("%Y-%m-%d"));
    report.row(&[(MARGIN, generated.as_str())], false, 10.0);
    report.skip_row();

    report.row(
        &[
            (COL_VENDOR, "Vendor"),
            (COL_DATE, "Date"),
            (COL_TOTAL, "Total"),
            (COL_CATEGORY, "Category"),
        ],
        true,
        12.0,
    );

    for record in records {
        let vendor = truncate_vendor(&record.vendor);
        report.row(
            &[
                (COL_VENDOR, vendor.as_str()),
                (COL_DATE, record.date.as_str()),
                (COL_TOTAL, record.total.as_str()),
                (COL_CATEGORY, record.category.label()),
            ],
            false,
            11.0,
        );
    }

    let totals = CategoryTotals::compute(records);
    report.skip_row();
    report.row(&[(MARGIN, "Summary Totals:")], true, 14.0);
    for (category, sum) in totals.iter() {
        let line = format!("{}: ${:.2}", category.label(), sum);
        report.row(&[(MARGIN, line.as_str())], false, 11.0);
    }
    let overall = format!("Overall: ${:.2}", totals.overall);
    report.row(&[(MARGIN, overall.as_str())], true, 11.0);

    report.save(path)
}

fn truncate_vendor(vendor: &str) -> String {
    vendor.chars().take(VENDOR_DISPLAY_WIDTH).collect()
}

/// Cursor over a growing PDF document, top to bottom, breaking pages as
/// rows run out of space.
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl ReportWriter {
    fn new() -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new("Expense Report", PAGE_WIDTH, PAGE_HEIGHT, "report");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("failed to load report font")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("failed to load report font")?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT.0 - MARGIN,
        })
    }

    /// Write one row of text cells at the given x positions.
    fn row(&mut self, cells: &[(f32, &str)], bold: bool, size: f32) {
        self.break_page_if_needed();
        let font = if bold { self.bold.clone() } else { self.regular.clone() };
        for (x, cell) in cells {
            self.layer.use_text(*cell, size, Mm(*x), Mm(self.y), &font);
        }
        self.y -= ROW_HEIGHT;
    }

    fn skip_row(&mut self) {
        self.y -= ROW_HEIGHT / 2.0;
    }

    fn break_page_if_needed(&mut self) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "report");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT.0 - MARGIN;
        }
    }

    fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.doc
            .save(&mut BufWriter::new(file))
            .context("failed to write PDF report")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn record(vendor: &str, total: &str, category: Category) -> ExpenseRecord {
        ExpenseRecord {
            vendor: vendor.to_string(),
            date: "01/02/24".to_string(),
            total: total.to_string(),
            category,
        }
    }

    #[test]
    fn vendor_is_truncated_for_display() {
        assert_eq!(
            truncate_vendor("A Very Long Vendor Name Indeed"),
            "A Very Long Vendor N"
        );
        assert_eq!(truncate_vendor("Short"), "Short");
    }

    #[test]
    fn report_is_written_as_pdf() {
        let records = [
            record("Corner Cafe", "12.34", Category::FoodBeverage),
            record("Metro", "2.50", Category::Transport),
            record("Scribbles", "abc", Category::Other),
        ];
        let path = std::env::temp_dir().join("expense_tracker_report_test.pdf");
        write_report(&records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn report_and_totals_agree_on_mixed_records() {
        let records = [
            record("Corner Cafe", "10.00", Category::FoodBeverage),
            record("Metro", "abc", Category::Transport),
        ];
        let path = std::env::temp_dir().join("expense_tracker_totals_test.pdf");
        write_report(&records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let totals = CategoryTotals::compute(&records);
        assert_eq!(totals.for_category(Category::FoodBeverage), 10.00);
        assert_eq!(totals.for_category(Category::Transport), 0.00);
        assert_eq!(totals.overall, 10.00);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn long_ledgers_paginate_without_panicking() {
        let records: Vec<ExpenseRecord> = (0..200)
            .map(|i| record(&format!("Vendor {i}"), "1.00", Category::Groceries))
            .collect();
        let path = std::env::temp_dir().join("expense_tracker_pagination_test.pdf");
        write_report(&records, &path).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
