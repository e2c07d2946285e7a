mod cache;
pub mod generate;
pub mod metrics;

pub use cache::SessionCache;
pub use generate::generate_dataset;
pub use metrics::compute_metrics;
