//! Chart-mode aggregation strategies.
//!
//! Maps the user's chart selection onto the data shape that chart needs.
//! This is pure data work; drawing happens in [`crate::plotting`].

use std::collections::HashMap;

use statrs::statistics::Statistics;

use crate::error::DashboardError;
use crate::types::{Category, ChartData, ChartKind, CorrelationMatrix, Record};

/// Numeric fields of the correlation matrix, in matrix order.
const NUMERIC_FIELDS: [&str; 3] = ["sales", "visitors", "conversion_rate"];

/// Aggregate a dataset into the shape required by `kind`.
///
/// Every chart kind rejects an empty dataset; the correlation matrix
/// additionally rejects zero-variance columns, where the coefficient is
/// undefined.
pub fn chart_data(kind: ChartKind, records: &[Record]) -> Result<ChartData, DashboardError> {
    if records.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }

    match kind {
        ChartKind::TimeSeries => Ok(ChartData::TimeSeries(
            records.iter().map(|r| (r.date, r.sales)).collect(),
        )),
        ChartKind::CategoryTotals => Ok(ChartData::CategoryTotals(category_totals(records))),
        ChartKind::ScatterByCategory => Ok(ChartData::ScatterByCategory(
            records
                .iter()
                .map(|r| (r.visitors, r.sales, r.category))
                .collect(),
        )),
        ChartKind::CorrelationMatrix => Ok(ChartData::CorrelationMatrix(correlation_matrix(
            records,
        )?)),
    }
}

/// Sum sales per category. Output rows follow the canonical category order
/// and omit categories with no records.
fn category_totals(records: &[Record]) -> Vec<(Category, f64)> {
    let mut totals: HashMap<Category, f64> = HashMap::new();
    for record in records {
        *totals.entry(record.category).or_insert(0.0) += record.sales;
    }

    Category::ALL
        .iter()
        .filter_map(|category| totals.get(category).map(|&total| (*category, total)))
        .collect()
}

/// Pairwise Pearson correlations across the numeric fields.
fn correlation_matrix(records: &[Record]) -> Result<CorrelationMatrix, DashboardError> {
    let columns: [Vec<f64>; 3] = [
        records.iter().map(|r| r.sales).collect(),
        records.iter().map(|r| r.visitors).collect(),
        records.iter().map(|r| r.conversion_rate).collect(),
    ];

    for (field, column) in NUMERIC_FIELDS.iter().zip(&columns) {
        let variance = column.iter().variance();
        if variance == 0.0 || !variance.is_finite() {
            return Err(DashboardError::DegenerateInput(format!(
                "field '{field}' has zero variance"
            )));
        }
    }

    let mut coefficients = [[0.0_f64; 3]; 3];
    for i in 0..3 {
        coefficients[i][i] = 1.0;
        for j in (i + 1)..3 {
            let r = pearson(&columns[i], &columns[j]);
            coefficients[i][j] = r;
            coefficients[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        fields: NUMERIC_FIELDS,
        coefficients,
    })
}

/// Pearson coefficient between two equal-length columns with non-zero
/// variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    x.iter().covariance(y.iter()) / (x.iter().std_dev() * y.iter().std_dev())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_dataset;
    use crate::types::GenParams;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(day: u32, sales: f64, visitors: f64, conversion_rate: f64, category: Category) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            sales,
            visitors,
            conversion_rate,
            category,
        }
    }

    fn sample_dataset() -> Vec<Record> {
        let params = GenParams {
            seed: Some(99),
            ..GenParams::default()
        };
        generate_dataset(&params).unwrap()
    }

    #[test]
    fn time_series_is_an_identity_projection() {
        let records = sample_dataset();
        let ChartData::TimeSeries(points) = chart_data(ChartKind::TimeSeries, &records).unwrap()
        else {
            panic!("wrong chart data variant");
        };

        assert_eq!(points.len(), records.len());
        for (point, record) in points.iter().zip(&records) {
            assert_eq!(*point, (record.date, record.sales));
        }
    }

    #[test]
    fn category_totals_sum_to_total_sales() {
        let records = sample_dataset();
        let total_sales: f64 = records.iter().map(|r| r.sales).sum();

        let ChartData::CategoryTotals(totals) =
            chart_data(ChartKind::CategoryTotals, &records).unwrap()
        else {
            panic!("wrong chart data variant");
        };

        let grouped: f64 = totals.iter().map(|(_, total)| total).sum();
        assert!((grouped - total_sales).abs() < 1e-6);
    }

    #[test]
    fn category_totals_follow_canonical_order() {
        let records = vec![
            record(1, 10.0, 1.0, 0.1, Category::C),
            record(2, 20.0, 2.0, 0.2, Category::A),
            record(3, 30.0, 3.0, 0.3, Category::C),
        ];

        let ChartData::CategoryTotals(totals) =
            chart_data(ChartKind::CategoryTotals, &records).unwrap()
        else {
            panic!("wrong chart data variant");
        };

        // B is absent; A precedes C regardless of first appearance.
        assert_eq!(totals, vec![(Category::A, 20.0), (Category::C, 40.0)]);
    }

    #[test]
    fn scatter_projects_every_record() {
        let records = sample_dataset();
        let ChartData::ScatterByCategory(points) =
            chart_data(ChartKind::ScatterByCategory, &records).unwrap()
        else {
            panic!("wrong chart data variant");
        };

        assert_eq!(points.len(), records.len());
        assert_eq!(
            points[0],
            (records[0].visitors, records[0].sales, records[0].category)
        );
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let records = sample_dataset();
        let ChartData::CorrelationMatrix(matrix) =
            chart_data(ChartKind::CorrelationMatrix, &records).unwrap()
        else {
            panic!("wrong chart data variant");
        };

        for i in 0..3 {
            assert!((matrix.coefficients[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                let forward = matrix.coefficients[i][j];
                let backward = matrix.coefficients[j][i];
                assert!((forward - backward).abs() < 1e-12);
                assert!((-1.0..=1.0).contains(&forward) || (forward - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn perfectly_linear_fields_correlate_to_one() {
        let records: Vec<Record> = (1..=10)
            .map(|i| {
                let sales = i as f64 * 100.0;
                // visitors is an exact linear function of sales
                record(i as u32, sales, sales * 2.0 + 5.0, 0.01 * i as f64, Category::B)
            })
            .collect();

        let ChartData::CorrelationMatrix(matrix) =
            chart_data(ChartKind::CorrelationMatrix, &records).unwrap()
        else {
            panic!("wrong chart data variant");
        };

        assert!((matrix.coefficients[0][1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_field_is_degenerate() {
        let records = vec![
            record(1, 10.0, 5.0, 0.05, Category::A),
            record(2, 20.0, 6.0, 0.05, Category::B),
            record(3, 30.0, 7.0, 0.05, Category::C),
        ];

        let err = chart_data(ChartKind::CorrelationMatrix, &records).unwrap_err();
        assert!(matches!(err, DashboardError::DegenerateInput(_)));
    }

    #[test]
    fn every_kind_rejects_an_empty_dataset() {
        for kind in ChartKind::ALL {
            let err = chart_data(kind, &[]).unwrap_err();
            assert!(matches!(err, DashboardError::EmptyDataset));
        }
    }
}
