//! Receipt processing pipeline: input file -> recognized text -> expense record.

use crate::categorize::Categorizer;
use crate::model::ExpenseRecord;
use crate::ocr::VisionClient;
use crate::parser::ReceiptFields;
use crate::pdf;
use std::path::Path;
use thiserror::Error;

/// Failure while turning an input file into recognized text. Fatal for the
/// receipt being processed; no partial record is produced.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("unsupported file type {extension:?}; expected pdf, png, jpg or jpeg")]
    UnsupportedFormat { extension: String },
    #[error("PDF rasterization failed: {0}")]
    Rasterize(anyhow::Error),
    #[error("text recognition failed: {0}")]
    Ocr(anyhow::Error),
}

/// Supported input kinds, decided by file extension.
#[derive(Debug, PartialEq, Eq)]
enum InputKind {
    Pdf,
    Image,
}

fn classify_input(path: &Path) -> Result<InputKind, AcquireError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => Ok(InputKind::Pdf),
        "png" | "jpg" | "jpeg" => Ok(InputKind::Image),
        _ => Err(AcquireError::UnsupportedFormat { extension }),
    }
}

/// Produce the recognized text of a receipt file. PDFs are rasterized
/// (first page only) before recognition; PNG/JPEG images go straight to the
/// OCR engine. Empty recognized text is a success, not an error.
pub async fn acquire_text(path: &Path, ocr: &VisionClient) -> Result<String, AcquireError> {
    let image_path = match classify_input(path)? {
        InputKind::Pdf => pdf::rasterize_first_page(path).map_err(AcquireError::Rasterize)?,
        InputKind::Image => path.to_path_buf(),
    };

    ocr.extract_text(&image_path).await.map_err(AcquireError::Ocr)
}

/// Assemble an expense record from recognized text. Field extraction is
/// pure; the category comes from the injected classifier and is always a
/// member of the closed set.
pub async fn build_record<C: Categorizer>(text: &str, categorizer: &C) -> ExpenseRecord {
    let fields = ReceiptFields::parse(text);
    let category = categorizer.classify(text).await;

    ExpenseRecord {
        vendor: fields.vendor,
        date: fields.date,
        total: fields.total,
        category,
    }
}

/// Full pipeline for one receipt file. The returned record still has to be
/// reviewed and accepted by the user before it enters the store.
pub async fn process_receipt<C: Categorizer>(
    path: &Path,
    ocr: &VisionClient,
    categorizer: &C,
) -> Result<ExpenseRecord, AcquireError> {
    let text = acquire_text(path, ocr).await?;
    Ok(build_record(&text, categorizer).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    /// Offline stand-in for the remote classifier.
    struct StubCategorizer(Category);

    impl Categorizer for StubCategorizer {
        async fn classify(&self, _text: &str) -> Category {
            self.0
        }
    }

    #[tokio::test]
    async fn record_combines_fields_and_category() {
        let text = "Corner Cafe\n12/31/24\nTotal: 12.34";
        let record = build_record(text, &StubCategorizer(Category::FoodBeverage)).await;
        assert_eq!(
            record,
            ExpenseRecord {
                vendor: "Corner Cafe".to_string(),
                date: "12/31/24".to_string(),
                total: "12.34".to_string(),
                category: Category::FoodBeverage,
            }
        );
    }

    #[tokio::test]
    async fn empty_text_yields_sentinel_record() {
        let record = build_record("", &StubCategorizer(Category::Other)).await;
        assert_eq!(record.vendor, "Unknown");
        assert_eq!(record.date, "");
        assert_eq!(record.total, "");
        assert_eq!(record.category, Category::Other);
    }

    #[tokio::test]
    async fn category_is_always_from_the_closed_set() {
        for category in Category::ALL {
            let record = build_record("Total 1.00", &StubCategorizer(category)).await;
            assert!(Category::ALL.contains(&record.category));
        }
    }

    #[test]
    fn extensions_decide_the_input_kind() {
        assert_eq!(classify_input(Path::new("a.pdf")).unwrap(), InputKind::Pdf);
        assert_eq!(classify_input(Path::new("a.PDF")).unwrap(), InputKind::Pdf);
        assert_eq!(classify_input(Path::new("a.png")).unwrap(), InputKind::Image);
        assert_eq!(classify_input(Path::new("a.JPEG")).unwrap(), InputKind::Image);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = classify_input(Path::new("receipt.txt")).unwrap_err();
        assert!(matches!(
            err,
            AcquireError::UnsupportedFormat { ref extension } if extension == "txt"
        ));
        assert!(classify_input(Path::new("receipt")).is_err());
    }
}
