//! Summary metrics backing the dashboard's stat tiles.

use statrs::statistics::Statistics;

use crate::error::DashboardError;
use crate::types::{DerivedMetrics, Record};

/// Compute display metrics from a dataset.
///
/// Pure and total over any non-empty input; an empty dataset fails with
/// [`DashboardError::EmptyDataset`] rather than producing NaN. Delta fields
/// are plain arithmetic differences; the conversion-rate delta stays a raw
/// difference of ratios and is formatted as a percentage only in the UI.
pub fn compute_metrics(records: &[Record]) -> Result<DerivedMetrics, DashboardError> {
    let last = records.last().ok_or(DashboardError::EmptyDataset)?;

    let total_sales: f64 = records.iter().map(|r| r.sales).sum();
    let mean_visitors = records.iter().map(|r| r.visitors).mean();
    let mean_conversion_rate = records.iter().map(|r| r.conversion_rate).mean();

    // A single-row dataset has no previous row; its delta is zero.
    let sales_delta = if records.len() > 1 {
        last.sales - records[records.len() - 2].sales
    } else {
        0.0
    };

    Ok(DerivedMetrics {
        total_sales,
        mean_visitors,
        mean_conversion_rate,
        sales_delta,
        visitors_delta: last.visitors - mean_visitors,
        conversion_delta: last.conversion_rate - mean_conversion_rate,
        record_count: records.len(),
    })
}
