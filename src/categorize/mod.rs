//! Expense categorization via a remote text-generation service.

mod client;

pub use client::TogetherClient;

use crate::model::Category;
use std::future::Future;

/// Classification seam between the pipeline and the remote service.
///
/// Implementations must be infallible: a degraded outcome (network error,
/// timeout, malformed response, disallowed category name) maps to
/// [`Category::Other`] instead of propagating. Tests substitute a stub so
/// the pipeline stays deterministic and offline.
pub trait Categorizer {
    /// Classify receipt text into one of the fixed categories.
    fn classify(&self, text: &str) -> impl Future<Output = Category> + Send;
}

/// Stand-in classifier for when no API key is configured. Categorization is
/// advisory, so a missing client degrades the same way a failed request
/// does: everything becomes `Other` and the scan proceeds.
pub struct UnconfiguredCategorizer;

impl Categorizer for UnconfiguredCategorizer {
    async fn classify(&self, _text: &str) -> Category {
        tracing::warn!("no categorization client configured, using Other");
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_classifier_yields_other() {
        assert_eq!(
            UnconfiguredCategorizer.classify("Corner Cafe\nTotal 9.99").await,
            Category::Other
        );
    }
}
