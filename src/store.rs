//! In-memory expense store and category aggregation.
//!
//! The store is owned by the UI controller and lives only for the running
//! session. Records are append-only: accepted expenses are never updated or
//! deleted, and nothing is persisted across runs.

use crate::model::{Category, ExpenseRecord};
use thiserror::Error;

/// A record with an empty total cannot be accepted. The user fills the
/// field in during review and retries.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("total amount is empty")]
pub struct EmptyTotal;

/// Append-only collection of accepted expenses.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    records: Vec<ExpenseRecord>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a reviewed record. Rejects exactly when `total` is empty; any
    /// non-empty string is accepted, numeric or not.
    pub fn accept(&mut self, record: ExpenseRecord) -> Result<(), EmptyTotal> {
        if record.total.is_empty() {
            return Err(EmptyTotal);
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Current per-category and overall sums.
    pub fn totals(&self) -> CategoryTotals {
        CategoryTotals::compute(&self.records)
    }
}

/// Per-category sums in declared category order, plus the overall sum.
/// Totals that do not parse as numbers contribute zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    by_category: [f64; Category::ALL.len()],
    pub overall: f64,
}

impl CategoryTotals {
    pub fn compute(records: &[ExpenseRecord]) -> Self {
        let mut by_category = [0.0; Category::ALL.len()];
        let mut overall = 0.0;

        for record in records {
            let Ok(amount) = record.total.parse::<f64>() else {
                continue;
            };
            by_category[record.category as usize] += amount;
            overall += amount;
        }

        Self { by_category, overall }
    }

    pub fn for_category(&self, category: Category) -> f64 {
        self.by_category[category as usize]
    }

    /// Iterate `(category, sum)` pairs in declared category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.by_category[category as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total: &str, category: Category) -> ExpenseRecord {
        ExpenseRecord {
            vendor: "Vendor".to_string(),
            date: "01/02/24".to_string(),
            total: total.to_string(),
            category,
        }
    }

    #[test]
    fn accept_rejects_empty_total() {
        let mut store = ExpenseStore::new();
        assert_eq!(store.accept(record("", Category::Bills)), Err(EmptyTotal));
        assert!(store.is_empty());
    }

    #[test]
    fn accept_takes_any_non_empty_total() {
        let mut store = ExpenseStore::new();
        store.accept(record("12.34", Category::Bills)).unwrap();
        // Known looseness: non-numeric totals are accepted too.
        store.accept(record("abc", Category::Bills)).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn totals_sum_per_category_and_overall() {
        let records = [
            record("10.00", Category::FoodBeverage),
            record("5.00", Category::FoodBeverage),
            record("abc", Category::Transport),
        ];
        let totals = CategoryTotals::compute(&records);
        assert_eq!(totals.for_category(Category::FoodBeverage), 15.00);
        assert_eq!(totals.for_category(Category::Transport), 0.00);
        assert_eq!(totals.overall, 15.00);
    }

    #[test]
    fn totals_iterate_in_declared_order() {
        let totals = CategoryTotals::compute(&[]);
        let order: Vec<Category> = totals.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL);
    }

    #[test]
    fn empty_store_totals_are_zero() {
        let store = ExpenseStore::new();
        let totals = store.totals();
        assert_eq!(totals.overall, 0.0);
        for (_, sum) in totals.iter() {
            assert_eq!(sum, 0.0);
        }
    }
}
