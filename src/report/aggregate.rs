use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;

use crate::models::record::Summary;
use crate::report::error::ReportResult;
use crate::report::table::BudgetTable;

/// Total amount plus distinct year and category counts. An empty table
/// gives a zero total and zero counts.
pub fn summarize(table: &BudgetTable) -> ReportResult<Summary> {
    let records = table.records()?;

    let total = records.iter().fold(Decimal::ZERO, |acc, r| acc + r.amount);
    let years: HashSet<i64> = records.iter().map(|r| r.year).collect();
    let categories: HashSet<&str> = records.iter().map(|r| r.category.as_str()).collect();

    Ok(Summary {
        total,
        year_count: years.len(),
        category_count: categories.len(),
    })
}

/// Amount summed per year, one entry per distinct year, ascending.
pub fn yearly_trend(table: &BudgetTable) -> ReportResult<Vec<(i64, Decimal)>> {
    let records = table.records()?;

    let mut by_year: BTreeMap<i64, Decimal> = BTreeMap::new();
    for record in &records {
        *by_year.entry(record.year).or_insert(Decimal::ZERO) += record.amount;
    }

    Ok(by_year.into_iter().collect())
}

/// Amount summed per category, largest total first; ties fall back to the
/// category name so the order never shifts between renders.
pub fn category_breakdown(table: &BudgetTable) -> ReportResult<Vec<(String, Decimal)>> {
    let records = table.records()?;

    let mut by_category: HashMap<String, Decimal> = HashMap::new();
    for record in records {
        *by_category.entry(record.category).or_insert(Decimal::ZERO) += record.amount;
    }

    let mut totals: Vec<(String, Decimal)> = by_category.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse::RawTable;

    fn table(rows: &[(&str, &str, &str)]) -> BudgetTable {
        RawTable {
            columns: vec![
                "Year".to_string(),
                "Category".to_string(),
                "Amount".to_string(),
            ],
            rows: rows
                .iter()
                .map(|(y, c, a)| vec![y.to_string(), c.to_string(), a.to_string()])
                .collect(),
        }
        .validate()
        .unwrap()
    }

    fn sample() -> BudgetTable {
        table(&[
            ("2020", "Rent", "1000"),
            ("2020", "Food", "200"),
            ("2021", "Rent", "1100"),
        ])
    }

    #[test]
    fn test_summarize_sample() {
        let summary = summarize(&sample()).unwrap();
        assert_eq!(summary.total, Decimal::from(2300));
        assert_eq!(summary.year_count, 2);
        assert_eq!(summary.category_count, 2);
    }

    #[test]
    fn test_summarize_empty_table() {
        let summary = summarize(&table(&[])).unwrap();
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.year_count, 0);
        assert_eq!(summary.category_count, 0);
    }

    #[test]
    fn test_yearly_trend_sample() {
        let trend = yearly_trend(&sample()).unwrap();
        assert_eq!(
            trend,
            vec![(2020, Decimal::from(1200)), (2021, Decimal::from(1100))]
        );
    }

    #[test]
    fn test_yearly_trend_sorted_and_distinct() {
        let trend = yearly_trend(&table(&[
            ("2023", "A", "1"),
            ("2019", "A", "2"),
            ("2023", "B", "3"),
            ("2021", "A", "4"),
        ]))
        .unwrap();

        let years: Vec<i64> = trend.iter().map(|(y, _)| *y).collect();
        assert_eq!(years, vec![2019, 2021, 2023]);
    }

    #[test]
    fn test_category_breakdown_sample() {
        let breakdown = category_breakdown(&sample()).unwrap();
        assert_eq!(
            breakdown,
            vec![
                ("Rent".to_string(), Decimal::from(2100)),
                ("Food".to_string(), Decimal::from(200)),
            ]
        );
    }

    #[test]
    fn test_category_breakdown_tie_broken_by_name() {
        let breakdown = category_breakdown(&table(&[
            ("2020", "Zoo", "100"),
            ("2020", "Art", "100"),
        ]))
        .unwrap();

        let names: Vec<&str> = breakdown.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["Art", "Zoo"]);
    }

    #[test]
    fn test_groupings_preserve_totals() {
        let t = table(&[
            ("2020", "Rent", "999.99"),
            ("2021", "Rent", "0.01"),
            ("2021", "Food", "-50"),
        ]);
        let total = summarize(&t).unwrap().total;

        let trend_total = yearly_trend(&t)
            .unwrap()
            .iter()
            .fold(Decimal::ZERO, |acc, (_, a)| acc + *a);
        let breakdown_total = category_breakdown(&t)
            .unwrap()
            .iter()
            .fold(Decimal::ZERO, |acc, (_, a)| acc + *a);

        assert_eq!(trend_total, total);
        assert_eq!(breakdown_total, total);
    }

    #[test]
    fn test_empty_table_gives_empty_views() {
        let t = table(&[]);
        assert!(yearly_trend(&t).unwrap().is_empty());
        assert!(category_breakdown(&t).unwrap().is_empty());
    }

    #[test]
    fn test_bad_amount_is_aggregation_error() {
        let t = table(&[("2020", "Rent", "n/a")]);
        assert!(summarize(&t).is_err());
        assert!(yearly_trend(&t).is_err());
        assert!(category_breakdown(&t).is_err());
    }
}
