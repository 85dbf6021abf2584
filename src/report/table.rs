use rust_decimal::Decimal;

use crate::models::record::BudgetRecord;
use crate::report::error::{ReportError, ReportResult};
use crate::report::parse::RawTable;

pub const REQUIRED_COLUMNS: [&str; 3] = ["Year", "Category", "Amount"];

/// A table whose column set has been checked. Raw rows are kept, extra
/// columns included, so the data-table view shows exactly what was loaded.
#[derive(Debug, Clone)]
pub struct BudgetTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    year_idx: usize,
    category_idx: usize,
    amount_idx: usize,
}

impl RawTable {
    /// Column-set check: must be a superset of {Year, Category, Amount},
    /// exact case. A failure names what is missing and what was found.
    pub fn validate(self) -> ReportResult<BudgetTable> {
        let find = |name: &str| self.columns.iter().position(|c| c == name);
        let year = find("Year");
        let category = find("Category");
        let amount = find("Amount");

        let (Some(year_idx), Some(category_idx), Some(amount_idx)) = (year, category, amount)
        else {
            let missing = REQUIRED_COLUMNS
                .iter()
                .zip([year, category, amount])
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| (*name).to_string())
                .collect();
            return Err(ReportError::Schema {
                missing,
                found: self.columns,
            });
        };

        Ok(BudgetTable {
            columns: self.columns,
            rows: self.rows,
            year_idx,
            category_idx,
            amount_idx,
        })
    }
}

impl BudgetTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Typed view of the three required columns. Runs on every aggregation
    /// call so nothing is cached between interactions; a bad cell names the
    /// row and the offending value.
    pub fn records(&self) -> ReportResult<Vec<BudgetRecord>> {
        let mut records = Vec::with_capacity(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate() {
            let year_raw = row.get(self.year_idx).map(String::as_str).unwrap_or("");
            let category = row.get(self.category_idx).cloned().unwrap_or_default();
            let amount_raw = row.get(self.amount_idx).map(String::as_str).unwrap_or("");

            let year = parse_year(year_raw).ok_or_else(|| {
                ReportError::Aggregation(format!("row {}: invalid Year '{}'", idx + 2, year_raw))
            })?;
            let amount = amount_raw.trim().parse::<Decimal>().map_err(|_| {
                ReportError::Aggregation(format!(
                    "row {}: non-numeric Amount '{}'",
                    idx + 2,
                    amount_raw
                ))
            })?;

            records.push(BudgetRecord::new(year, category, amount));
        }
        Ok(records)
    }
}

/// Year cells are integer-like; a float rendering such as "2020.0" (common
/// in spreadsheet exports) is accepted when the fractional part is zero.
fn parse_year(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i64>() {
        return Some(year);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn raw(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_validate_success_with_extra_columns() {
        let table = raw(
            &["Notes", "Year", "Category", "Amount"],
            &[&["x", "2020", "Rent", "1000"]],
        )
        .validate()
        .unwrap();

        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_validate_missing_columns_lists_found() {
        let err = raw(&["Date", "Type", "Cost"], &[]).validate().unwrap_err();
        match err {
            ReportError::Schema { missing, found } => {
                assert_eq!(missing, vec!["Year", "Category", "Amount"]);
                assert_eq!(found, vec!["Date", "Type", "Cost"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_is_case_sensitive() {
        let err = raw(&["year", "Category", "Amount"], &[])
            .validate()
            .unwrap_err();
        match err {
            ReportError::Schema { missing, .. } => assert_eq!(missing, vec!["Year"]),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_records_typed_conversion() {
        let table = raw(
            &["Year", "Category", "Amount"],
            &[&["2020", "Rent", "1000.50"], &["2021.0", "Food", "200"]],
        )
        .validate()
        .unwrap();

        let records = table.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2020);
        assert_eq!(records[0].amount, Decimal::from_str("1000.50").unwrap());
        assert_eq!(records[1].year, 2021);
    }

    #[test]
    fn test_records_non_numeric_amount() {
        let table = raw(&["Year", "Category", "Amount"], &[&["2020", "Rent", "lots"]])
            .validate()
            .unwrap();

        let err = table.records().unwrap_err();
        assert!(matches!(err, ReportError::Aggregation(_)));
        assert!(err.to_string().contains("non-numeric Amount 'lots'"));
    }

    #[test]
    fn test_records_fractional_year_rejected() {
        let table = raw(&["Year", "Category", "Amount"], &[&["2020.5", "Rent", "1"]])
            .validate()
            .unwrap();

        let err = table.records().unwrap_err();
        assert!(err.to_string().contains("invalid Year '2020.5'"));
    }
}
