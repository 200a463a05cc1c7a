// Ngezi Concentrator reporting core.
//
// Raw report extracts go in, star-schema fact tables and dashboard-ready
// summaries come out. The pipeline is pure and synchronous: loaders (or the
// simulator) produce raw records, `transforms` builds fact and dimension
// rows, `kpis` holds the variance/RAG/aggregation rules, and `dashboard`
// assembles the read-only projections a front end renders.

pub mod config;
pub mod dashboard;
pub mod kpis;
pub mod loader;
pub mod logging;
pub mod output;
pub mod simulator;
pub mod transforms;
pub mod types;
pub mod util;

pub use config::{ConfigError, KpiDefinition, KpiRegistry, RawKpiDefinition};
pub use types::{
    DailyPlantRow, Direction, KpiFactRow, MonthlyPlantRow, OverviewSummary, ProjectDim,
    ProjectStatus, ProjectStatusFact, RagStatus,
};
