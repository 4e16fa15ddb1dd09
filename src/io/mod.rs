//! Run files, energy-curve output and run summaries.

mod config;
mod plot;
mod report;

pub use config::{parse_run_config, read_run_config, HamiltonianConfig, MinimizerConfig, RunConfig};
pub use plot::CsvPlotter;
pub use report::{run_variation, write_summary, RunSummary};
