//! Command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod aggregate;
pub mod generate;
pub mod models;
pub mod serve;
pub mod utils;

// Re-export main command functions
pub use aggregate::{aggregate_file, execute_aggregate};
pub use generate::{
    build_pipeline, execute_generate, yesterday, DefaultPipeline, ReportJob, ReportOutcome,
    ReportPipeline,
};
pub use models::{validate_settings, ReportSettings};
pub use serve::{build_router, serve};
pub use utils::display_version;
