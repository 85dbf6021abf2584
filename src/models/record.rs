use rust_decimal::Decimal;

/// One validated budget row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRecord {
    pub year: i64,
    pub category: String,
    pub amount: Decimal,
}

impl BudgetRecord {
    pub fn new(year: i64, category: String, amount: Decimal) -> Self {
        Self {
            year,
            category,
            amount,
        }
    }
}

/// Aggregate totals over a whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: Decimal,
    pub year_count: usize,
    pub category_count: usize,
}
