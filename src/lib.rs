//! # Sales Dashboard Library
//!
//! `salesdash` is a library for generating and visualizing a synthetic
//! sales dataset. It produces a daily time series of sales, visitor, and
//! conversion figures, derives summary metrics for display, and aggregates
//! the data into the shapes required by the dashboard's chart modes.
//!
//! ## Features
//!
//! - Reproducible synthetic dataset generation (optional fixed seed)
//! - Session-scoped memoization of generated datasets
//! - Summary metrics with last-vs-previous and last-vs-mean deltas
//! - Four chart modes: line, bar, scatter, and correlation heatmap
//! - Chart rendering to PNG with an LRU cache of rendered images
//! - CSV export of the raw dataset
//!
//! ## Example
//!
//! ```
//! use salesdash::data::{compute_metrics, SessionCache};
//! use salesdash::types::GenParams;
//!
//! let mut cache = SessionCache::new();
//! let params = GenParams {
//!     seed: Some(42),
//!     ..GenParams::default()
//! };
//!
//! let records = cache.dataset(&params).unwrap();
//! let metrics = compute_metrics(records).unwrap();
//! assert_eq!(metrics.record_count, 100);
//! ```

pub mod app;
pub mod charts;
pub mod data;
pub mod error;
pub mod export;
pub mod plotting;
pub mod types;

// Re-export main types for convenience
pub use app::App as SalesDashApp;
pub use error::DashboardError;
pub use types::{Category, ChartData, ChartKind, DerivedMetrics, GenParams, Record};
