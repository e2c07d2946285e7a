//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing the synthetic sales dataset, derived display metrics, and
//! chart selection.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Product category label attached to each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
}

impl Category {
    /// All categories in canonical order. Grouped chart output follows this
    /// ordering so rendered bars are stable across sessions.
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of simulated dashboard data.
///
/// Field order matters: CSV export writes columns in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Cumulative sales total up to and including this date
    pub sales: f64,
    /// Visitor count for this date (not cumulative)
    pub visitors: f64,
    /// Conversion rate for this date, as a ratio (0.05 = 5%)
    pub conversion_rate: f64,
    /// Category the day's traffic is attributed to
    pub category: Category,
}

/// Parameters that uniquely determine one generated dataset.
///
/// Used as the session-cache key: repeated requests with an equal parameter
/// set must be served the identical previously generated rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenParams {
    /// Number of daily rows to generate
    pub periods: usize,
    /// First date of the series; rows advance one day at a time
    pub start_date: NaiveDate,
    /// Fixed RNG seed for reproducible output; `None` samples fresh entropy
    pub seed: Option<u64>,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            periods: 100,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid epoch date"),
            seed: None,
        }
    }
}

/// Scalar summary statistics derived from a dataset for the metric tiles.
///
/// These are pure functions of the dataset and are recomputed whenever the
/// dataset is (re)read; they are never stored alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// Sum of `sales` over all records
    pub total_sales: f64,
    /// Mean of `visitors`
    pub mean_visitors: f64,
    /// Mean of `conversion_rate`
    pub mean_conversion_rate: f64,
    /// Last-row sales minus previous-row sales (0.0 for a single-row dataset)
    pub sales_delta: f64,
    /// Last-row visitors minus mean visitors
    pub visitors_delta: f64,
    /// Last-row conversion rate minus mean conversion rate, as a raw
    /// difference of ratios
    pub conversion_delta: f64,
    /// Number of records the metrics were computed from
    pub record_count: usize,
}

/// Chart modes the dashboard can render.
///
/// A closed enumeration so chart handling is exhaustive at compile time;
/// adding or removing a variant forces every match site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Daily sales over time
    TimeSeries,
    /// Total sales per category
    CategoryTotals,
    /// Per-record visitors vs. sales, colored by category
    ScatterByCategory,
    /// Pairwise correlations across the numeric fields
    CorrelationMatrix,
}

impl ChartKind {
    /// All chart kinds, in the order the selector lists them.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::TimeSeries,
        ChartKind::CategoryTotals,
        ChartKind::ScatterByCategory,
        ChartKind::CorrelationMatrix,
    ];

    /// UI-facing selector label.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::TimeSeries => "Line Chart",
            ChartKind::CategoryTotals => "Bar Chart",
            ChartKind::ScatterByCategory => "Scatter Plot",
            ChartKind::CorrelationMatrix => "Heatmap",
        }
    }

    /// Caption drawn above the plot area.
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::TimeSeries => "Daily Sales Trend",
            ChartKind::CategoryTotals => "Sales by Category",
            ChartKind::ScatterByCategory => "Visitors vs Sales",
            ChartKind::CorrelationMatrix => "Correlation Heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    /// Parse a selector label back into a chart kind. Unknown labels fail
    /// here, before any selection can reach the rendering layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| DashboardError::UnsupportedChartType(s.to_string()))
    }
}

/// Pairwise Pearson coefficients over the dataset's numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// Field names, in matrix order
    pub fields: [&'static str; 3],
    /// `coefficients[i][j]` is the correlation between `fields[i]` and
    /// `fields[j]`; symmetric with 1.0 on the diagonal
    pub coefficients: [[f64; 3]; 3],
}

/// The aggregated or projected data shape required by a specific chart mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// (date, cumulative sales) pairs in date order
    TimeSeries(Vec<(NaiveDate, f64)>),
    /// Per-category sales totals, in canonical category order
    CategoryTotals(Vec<(Category, f64)>),
    /// (visitors, sales, category) triple per record, no aggregation
    ScatterByCategory(Vec<(f64, f64, Category)>),
    /// Symmetric correlation matrix over the numeric fields
    CorrelationMatrix(CorrelationMatrix),
}

impl ChartData {
    /// The chart kind this data was aggregated for.
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::TimeSeries(_) => ChartKind::TimeSeries,
            ChartData::CategoryTotals(_) => ChartKind::CategoryTotals,
            ChartData::ScatterByCategory(_) => ChartKind::ScatterByCategory,
            ChartData::CorrelationMatrix(_) => ChartKind::CorrelationMatrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chart_kind_labels_round_trip() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.label().parse::<ChartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_chart_label_is_rejected() {
        let err = "Pie Chart".parse::<ChartKind>().unwrap_err();
        assert!(matches!(err, DashboardError::UnsupportedChartType(_)));
    }

    #[test]
    fn categories_are_canonically_ordered() {
        assert_eq!(Category::ALL.map(|c| c.as_str()), ["A", "B", "C"]);
    }
}
