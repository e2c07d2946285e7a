//! Chart rendering.
//!
//! Turns [`ChartData`](crate::types::ChartData) into PNG images with
//! `plotters`. The UI never draws chart geometry itself; it displays the
//! bytes produced here as a texture.

pub mod chart;
pub mod styles;


pub use chart::{render_chart, render_chart_cached};
pub use styles::{ChartStyle, ChartTheme};
