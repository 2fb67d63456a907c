pub mod cli;
pub mod config;
pub mod csv_plot;
pub mod data_loader;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod scale;
pub mod series;

pub use config::ChartConfig;
pub use error::{ChartError, Result};
pub use pipeline::{run_sweep, ChartOutput, SweepSpec};
