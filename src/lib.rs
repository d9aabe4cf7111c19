//! Receipt expense tracker - scan receipts, extract expense data, export a report.
//!
//! # Features
//! - Text recognition for receipt images and PDFs (Google Cloud Vision)
//! - Field extraction: vendor, date, total amount
//! - Expense categorization via the Together AI completions API
//! - Review-and-accept flow with an in-memory expense ledger
//! - PDF report export with per-category totals
//!
//! Only the first page of a PDF receipt is scanned; multi-page receipts are
//! a known limitation.

pub mod categorize;
pub mod gui;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod store;

pub use model::{Category, ExpenseRecord};
