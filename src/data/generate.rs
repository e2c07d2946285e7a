//! Synthetic dataset generation.
//!
//! Produces the daily sales table the rest of the dashboard is derived
//! from: a cumulative sales series built from noisy daily increments,
//! independent visitor and conversion-rate draws, and a uniformly chosen
//! category per row.

use chrono::Duration;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::error::DashboardError;
use crate::types::{Category, GenParams, Record};

/// Mean and standard deviation of the daily sales increment.
const SALES_INCREMENT: (f64, f64) = (1000.0, 200.0);
/// Mean and standard deviation of the daily visitor count.
const VISITORS: (f64, f64) = (500.0, 100.0);
/// Mean and standard deviation of the daily conversion rate.
const CONVERSION_RATE: (f64, f64) = (0.05, 0.01);

/// Generate a dataset for the given parameters.
///
/// The output shape is deterministic (`params.periods` rows, one day per
/// row starting at `params.start_date`); values are reproducible only when
/// `params.seed` is set. Columns are drawn independently of each other.
pub fn generate_dataset(params: &GenParams) -> Result<Vec<Record>, DashboardError> {
    if params.periods == 0 {
        return Err(DashboardError::InvalidParameter(
            "periods must be greater than zero".to_string(),
        ));
    }

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = params.periods;
    let sales = cumulative_sales(n, &mut rng)?;
    let visitors = normal_column(n, VISITORS, &mut rng)?;
    let conversion_rates = normal_column(n, CONVERSION_RATE, &mut rng)?;
    let categories: Vec<Category> = (0..n)
        .map(|_| Category::ALL[rng.gen_range(0..Category::ALL.len())])
        .collect();

    let mut records = Vec::with_capacity(n);
    for i in 0..n {
        let date = params
            .start_date
            .checked_add_signed(Duration::days(i as i64))
            .ok_or_else(|| {
                DashboardError::InvalidParameter(format!(
                    "date range overflows the calendar at row {i}"
                ))
            })?;

        records.push(Record {
            date,
            sales: sales[i],
            visitors: visitors[i],
            conversion_rate: conversion_rates[i],
            category: categories[i],
        });
    }

    Ok(records)
}

/// Running sum of daily increments drawn from the sales distribution.
fn cumulative_sales(n: usize, rng: &mut StdRng) -> Result<Vec<f64>, DashboardError> {
    let increments = normal_column(n, SALES_INCREMENT, rng)?;
    let mut total = 0.0;
    Ok(increments
        .into_iter()
        .map(|increment| {
            total += increment;
            total
        })
        .collect())
}

fn normal_column(
    n: usize,
    (mean, std_dev): (f64, f64),
    rng: &mut StdRng,
) -> Result<Vec<f64>, DashboardError> {
    let dist = Normal::new(mean, std_dev).map_err(|e| {
        DashboardError::InvalidParameter(format!("noise distribution error: {e}"))
    })?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}
