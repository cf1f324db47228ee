use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::api::Expense;
use crate::error::AppError;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortField {
    #[default]
    Title,
    Category,
    Amount,
    Date,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Title,
        SortField::Category,
        SortField::Amount,
        SortField::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Category => "Category",
            SortField::Amount => "Amount",
            SortField::Date => "Date",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn compare(self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Category => a.category_name().cmp(b.category_name()),
            SortField::Amount => cmp_f64(a.amount, b.amount),
            // Undated rows come before every dated one.
            SortField::Date => a.date.cmp(&b.date),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "category" | "category.name" => Ok(SortField::Category),
            "amount" => Ok(SortField::Amount),
            "date" => Ok(SortField::Date),
            other => Err(AppError::message(format!(
                "Unknown sort field `{other}` (expected title, category, amount or date)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }

    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(AppError::message(format!(
                "Unknown sort order `{other}` (expected asc or desc)"
            ))),
        }
    }
}

/// Inputs the displayed list is derived from, besides the full collection itself.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpenseQuery {
    pub search: String,
    pub field: SortField,
    pub order: SortOrder,
}

impl ExpenseQuery {
    pub fn new(search: impl Into<String>, field: SortField, order: SortOrder) -> Self {
        Self {
            search: search.into(),
            field,
            order,
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Case-insensitive substring match on title or category name.
pub fn matches(expense: &Expense, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    expense.title.to_lowercase().contains(&needle)
        || expense.category_name().to_lowercase().contains(&needle)
}

/// Recompute the visible rows from scratch. Ties keep their fetched order in either direction.
pub fn derive_view<'a>(expenses: &'a [Expense], query: &ExpenseQuery) -> Vec<&'a Expense> {
    let mut rows: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| matches(expense, &query.search))
        .collect();

    rows.sort_by(|a, b| query.order.apply(query.field.compare(a, b)));
    rows
}
