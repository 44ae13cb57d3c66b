//! Totals, per-category breakdown and monthly series over a set of movements.
//!
//! Movements without a category have no direction and are left out of every
//! total, so the per-category totals always add up to income plus expense.

use std::{collections::BTreeMap, fmt::Display};

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use time::Date;

use crate::{
    category::{CategoryId, CategoryType},
    movement::Amount,
};

/// The category details needed to aggregate a movement.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCategory {
    pub id: CategoryId,
    pub name: String,
    pub category_type: CategoryType,
}

/// A movement reduced to what the aggregations need.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub amount: Amount,
    pub date: Date,
    pub category: Option<EntryCategory>,
}

/// The total of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub total: Decimal,
}

/// Totals over a set of movements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// Largest total first, ties ordered by category ID.
    pub by_category: Vec<CategoryTotal>,
}

/// A calendar month, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u8,
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Income and expense in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Monthly totals in ascending month order, only for months with movements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub series: Vec<MonthlyTotals>,
}

fn zero() -> Decimal {
    Decimal::new(0, 2)
}

/// Sum the entries into income, expense, balance and per-category totals.
pub fn summarize(entries: &[LedgerEntry]) -> Summary {
    let mut total_income = zero();
    let mut total_expense = zero();
    let mut totals: BTreeMap<CategoryId, CategoryTotal> = BTreeMap::new();

    for entry in entries {
        let Some(category) = &entry.category else {
            continue;
        };
        let amount = entry.amount.as_decimal();

        match category.category_type {
            CategoryType::Income => total_income += amount,
            CategoryType::Expense => total_expense += amount,
        }

        totals
            .entry(category.id)
            .or_insert_with(|| CategoryTotal {
                id: category.id,
                name: category.name.clone(),
                category_type: category.category_type,
                total: zero(),
            })
            .total += amount;
    }

    let mut by_category: Vec<CategoryTotal> = totals.into_values().collect();
    by_category.sort_by(|a, b| b.total.cmp(&a.total).then(a.id.cmp(&b.id)));

    Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        by_category,
    }
}

/// Group the entries by calendar month.
pub fn monthly_series(entries: &[LedgerEntry]) -> MonthlySeries {
    let mut months: BTreeMap<YearMonth, (Decimal, Decimal)> = BTreeMap::new();

    for entry in entries {
        let Some(category) = &entry.category else {
            continue;
        };

        let (income, expense) = months
            .entry(YearMonth::from(entry.date))
            .or_insert_with(|| (zero(), zero()));

        match category.category_type {
            CategoryType::Income => *income += entry.amount.as_decimal(),
            CategoryType::Expense => *expense += entry.amount.as_decimal(),
        }
    }

    let series = months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotals {
            month,
            income,
            expense,
            balance: income - expense,
        })
        .collect();

    MonthlySeries { series }
}
