//! Error taxonomy for the dashboard core.
//!
//! All failures are local and synchronous; there is no transient failure
//! mode to retry against. The library fails fast and the UI layer is
//! responsible for presenting the condition without crashing the session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// A generation request that cannot produce a valid dataset.
    #[error("invalid generation parameter: {0}")]
    InvalidParameter(String),

    /// Metrics or aggregation requested on a dataset with zero rows.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A chart selection label that does not name a known chart kind.
    #[error("unsupported chart type: {0:?}")]
    UnsupportedChartType(String),

    /// Input that is structurally valid but statistically unusable, such as
    /// a zero-variance column in a correlation request.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// CSV serialization or deserialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure while writing an export.
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),
}
