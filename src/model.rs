//! Domain model - expense categories and the extracted expense record.

use std::fmt;

/// Expense category. A closed set: every categorization result, including
/// malformed or failed remote responses, reduces to one of these members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    FoodBeverage,
    Transport,
    Groceries,
    Bills,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// All categories in declared order. Drives the classification prompt,
    /// the dashboard totals line and the report summary.
    pub const ALL: [Category; 6] = [
        Category::FoodBeverage,
        Category::Transport,
        Category::Groceries,
        Category::Bills,
        Category::Entertainment,
        Category::Other,
    ];

    /// Display name, as shown in the UI and expected from the classifier.
    pub fn label(self) -> &'static str {
        match self {
            Category::FoodBeverage => "Food & Beverage",
            Category::Transport => "Transport",
            Category::Groceries => "Groceries",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Exact label match.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Map arbitrary classifier output into the closed set. Trims the input;
    /// anything that is not exactly one of the six labels becomes `Other`.
    pub fn coerce(raw: &str) -> Category {
        Category::from_label(raw.trim()).unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scanned receipt, as produced by the extraction pipeline and possibly
/// edited during review. `vendor`, `date` and `total` are unvalidated
/// strings; missing fields are empty rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub vendor: String,
    pub date: String,
    pub total: String,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn coerce_accepts_exact_labels() {
        assert_eq!(Category::coerce("Food & Beverage"), Category::FoodBeverage);
        assert_eq!(Category::coerce("  Transport \n"), Category::Transport);
    }

    #[test]
    fn coerce_maps_unknown_output_to_other() {
        assert_eq!(Category::coerce("food & beverage"), Category::Other);
        assert_eq!(Category::coerce("Dining"), Category::Other);
        assert_eq!(Category::coerce(""), Category::Other);
        assert_eq!(Category::coerce("I think this is Groceries"), Category::Other);
    }
}
