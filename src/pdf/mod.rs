//! PDF handling - first-page rasterization via Poppler's pdftoppm.
//!
//! Only the first page is rasterized; multi-page receipts are not
//! supported. `pdftoppm` must be available on `PATH`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// File name of the intermediate raster image, placed in the system temp
/// directory. The artifact is overwritten on every conversion and is not
/// cleaned up, so the last rasterization can be inspected after a failure.
const SCAN_ARTIFACT: &str = "receipt_scan.png";

/// Well-known path of the intermediate raster image.
pub fn scan_artifact_path() -> PathBuf {
    std::env::temp_dir().join(SCAN_ARTIFACT)
}

/// Rasterize the first page of a PDF to a PNG at [`scan_artifact_path`].
pub fn rasterize_first_page(pdf_path: impl AsRef<Path>) -> Result<PathBuf> {
    let pdf_path = pdf_path.as_ref();
    let artifact = scan_artifact_path();
    // pdftoppm appends the .png extension itself
    let output_base = artifact.with_extension("");

    let output = Command::new("pdftoppm")
        .args(["-png", "-f", "1", "-l", "1", "-r", "300", "-singlefile"])
        .arg(pdf_path)
        .arg(&output_base)
        .output()
        .context("failed to run pdftoppm; is Poppler installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("PDF conversion failed: {}", stderr.trim());
    }

    if !artifact.exists() {
        anyhow::bail!("pdftoppm produced no output image");
    }

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_path_is_fixed_and_named() {
        let path = scan_artifact_path();
        assert_eq!(path, scan_artifact_path());
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("receipt_scan.png")
        );
    }

    #[test]
    fn corrupt_pdf_is_an_error() {
        let dir = std::env::temp_dir();
        let bogus = dir.join("expense_tracker_bogus_test.pdf");
        std::fs::write(&bogus, b"not a pdf").unwrap();
        // Either pdftoppm is missing or it rejects the file; both are errors.
        assert!(rasterize_first_page(&bogus).is_err());
        let _ = std::fs::remove_file(&bogus);
    }
}
