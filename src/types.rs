use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

/// Evaluation direction for a KPI: whether a higher or lower actual is the
/// desirable outcome relative to budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::HigherIsBetter => "higher_is_better",
            Direction::LowerIsBetter => "lower_is_better",
        }
    }

    /// Parse the registry's string form. Returns `None` for anything that is
    /// not one of the two recognized directions; the registry loader turns
    /// that into a hard configuration error instead of silently defaulting.
    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "higher_is_better" => Some(Direction::HigherIsBetter),
            "lower_is_better" => Some(Direction::LowerIsBetter),
            _ => None,
        }
    }
}

/// Traffic-light classification of one (actual, budget) pair.
///
/// `Grey` means undecidable: one of the operands is missing or the budget is
/// zero. It is always derived on demand, never stored in a fact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RagStatus {
    Green,
    Amber,
    Red,
    Grey,
}

impl RagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RagStatus::Green => "green",
            RagStatus::Amber => "amber",
            RagStatus::Red => "red",
            RagStatus::Grey => "grey",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Pending,
    Delayed,
    Unknown,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Pending => "pending",
            ProjectStatus::Delayed => "delayed",
            ProjectStatus::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Raw records (upstream contract)
// ---------------------------------------------------------------------------

/// One (period, actual, budget, variance%) triple attached to a raw KPI
/// label. The source's own variance% is carried along but the fact builder
/// recomputes it from actual and budget for internal consistency.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSample {
    pub period: String,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
    pub var_pct: Option<f64>,
}

/// Raw scorecard record: one KPI label with its per-period samples, as
/// produced by a loader or the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKpiRecord {
    pub label: String,
    pub comments: Option<String>,
    pub samples: Vec<PeriodSample>,
}

/// One raw daily production record. The daily actual/target figures are
/// milled tonnage; the month-to-date columns are carried for display only.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDailyRecord {
    pub date: NaiveDate,
    pub daily_actual: Option<f64>,
    pub daily_target: Option<f64>,
    pub mtd_actual: Option<f64>,
    pub mtd_target: Option<f64>,
    pub mtd_var_pct: Option<f64>,
}

/// One row of the weekly project tracker table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProjectRecord {
    pub project_id: String,
    pub project_name: String,
    pub responsible: String,
    pub planned_completion: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub comments: Option<String>,
}

/// One month of the mill-ball trend extract.
#[derive(Debug, Clone, PartialEq)]
pub struct MillBallRow {
    pub month: NaiveDate,
    pub projected_milled_tonnage: Option<f64>,
    pub mill1_consumption_gt: Option<f64>,
    pub mill1_steel_t: Option<f64>,
    pub mill1_stock_remaining: Option<f64>,
}

/// One consumable line from the weekly report extract.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConsumableRecord {
    pub category: String,
    pub consumable: String,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
}

// ---------------------------------------------------------------------------
// Fact and dimension rows (star schema)
// ---------------------------------------------------------------------------

/// One measurement of one KPI in one period. Immutable once built; anything
/// downstream that needs extra fields (e.g. a RAG status) derives new rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiFactRow {
    pub period: String,
    pub plant: String,
    pub kpi_name: String,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
    pub variance: Option<f64>,
    pub variance_pct: Option<f64>,
    pub direction: Direction,
    pub comments: Option<String>,
}

/// One day of plant measurements. Every metric is optional; a missing value
/// means "not reported", never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPlantRow {
    pub date: NaiveDate,
    pub plant: String,
    pub crushed_tonnage_actual: Option<f64>,
    pub crushed_tonnage_target: Option<f64>,
    pub milled_tonnage_actual: Option<f64>,
    pub milled_tonnage_target: Option<f64>,
    pub milling_rate_tph_actual: Option<f64>,
    pub recovery_pct_actual: Option<f64>,
    pub recovery_pct_target: Option<f64>,
    pub oz_produced_actual: Option<f64>,
    pub oz_produced_target: Option<f64>,
    pub crusher_availability_pct: Option<f64>,
    pub mill_availability_pct: Option<f64>,
}

/// Monthly roll-up of `DailyPlantRow`. `month` is the first day of the
/// calendar month. Tonnages and ounces are summed; rates, recoveries and
/// availabilities are averaged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPlantRow {
    pub month: NaiveDate,
    pub plant: String,
    pub crushed_tonnage_actual: Option<f64>,
    pub crushed_tonnage_target: Option<f64>,
    pub milled_tonnage_actual: Option<f64>,
    pub milled_tonnage_target: Option<f64>,
    pub milling_rate_tph_actual: Option<f64>,
    pub recovery_pct_actual: Option<f64>,
    pub recovery_pct_target: Option<f64>,
    pub oz_produced_actual: Option<f64>,
    pub oz_produced_target: Option<f64>,
    pub crusher_availability_pct: Option<f64>,
    pub mill_availability_pct: Option<f64>,
}

/// Project dimension: the stable attributes of a tracked initiative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDim {
    pub project_id: String,
    pub project_name: String,
    pub responsible: String,
    pub planned_completion: Option<NaiveDate>,
}

/// Project status fact: one status snapshot per project per report. Each
/// weekly ingestion appends rows, so a project accumulates history; its
/// current status is the row with the latest snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStatusFact {
    pub snapshot_date: NaiveDate,
    pub project_id: String,
    pub status: ProjectStatus,
    pub comments: Option<String>,
}

/// Monthly consumables fact (steel balls, reagents, water).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableRow {
    pub month: NaiveDate,
    pub plant: String,
    pub consumable: String,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
    pub variance: Option<f64>,
    pub variance_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Dashboard projections
// ---------------------------------------------------------------------------

/// Numbers and RAG for one overview domain card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainCard {
    pub actual: Option<f64>,
    pub budget: Option<f64>,
    pub var_pct: Option<f64>,
    pub rag: RagStatus,
}

/// Top-level executive summary: one card per configured domain plus the
/// period echo. Always contains exactly the configured domains, so dashboard
/// code can index without existence checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSummary {
    pub period: String,
    #[serde(flatten)]
    pub domains: BTreeMap<String, DomainCard>,
}

/// One KPI row of the monthly management summary, with derived RAG.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagementSummaryRow {
    pub kpi_name: String,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
    pub variance: Option<f64>,
    pub variance_pct: Option<f64>,
    pub rag: RagStatus,
    pub comments: Option<String>,
}

/// Project dimension joined with its most recent status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStatusRow {
    pub project_id: String,
    pub project_name: String,
    pub responsible: String,
    pub planned_completion: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub comments: Option<String>,
    pub snapshot_date: Option<NaiveDate>,
}

/// Consumable fact with derived RAG (all consumables are lower-is-better).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableRagRow {
    pub month: NaiveDate,
    pub consumable: String,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
    pub variance: Option<f64>,
    pub variance_pct: Option<f64>,
    pub rag: RagStatus,
}

// ---------------------------------------------------------------------------
// Console display rows (pre-formatted strings for markdown tables)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct OverviewDisplayRow {
    #[serde(rename = "Domain")]
    #[tabled(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Var%")]
    #[tabled(rename = "Var%")]
    pub var_pct: String,
    #[serde(rename = "RAG")]
    #[tabled(rename = "RAG")]
    pub rag: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KpiSummaryDisplayRow {
    #[serde(rename = "KPI")]
    #[tabled(rename = "KPI")]
    pub kpi_name: String,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Variance")]
    #[tabled(rename = "Variance")]
    pub variance: String,
    #[serde(rename = "Var%")]
    #[tabled(rename = "Var%")]
    pub variance_pct: String,
    #[serde(rename = "RAG")]
    #[tabled(rename = "RAG")]
    pub rag: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ProjectDisplayRow {
    #[serde(rename = "Id")]
    #[tabled(rename = "Id")]
    pub project_id: String,
    #[serde(rename = "Project")]
    #[tabled(rename = "Project")]
    pub project_name: String,
    #[serde(rename = "Responsible")]
    #[tabled(rename = "Responsible")]
    pub responsible: String,
    #[serde(rename = "Completion")]
    #[tabled(rename = "Completion")]
    pub planned_completion: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct MonthlyDisplayRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "MilledActual")]
    #[tabled(rename = "MilledActual")]
    pub milled_tonnage_actual: String,
    #[serde(rename = "MilledTarget")]
    #[tabled(rename = "MilledTarget")]
    pub milled_tonnage_target: String,
    #[serde(rename = "RateTph")]
    #[tabled(rename = "RateTph")]
    pub milling_rate_tph_actual: String,
    #[serde(rename = "RecoveryPct")]
    #[tabled(rename = "RecoveryPct")]
    pub recovery_pct_actual: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ConsumableDisplayRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Consumable")]
    #[tabled(rename = "Consumable")]
    pub consumable: String,
    #[serde(rename = "Actual")]
    #[tabled(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Var%")]
    #[tabled(rename = "Var%")]
    pub var_pct: String,
    #[serde(rename = "RAG")]
    #[tabled(rename = "RAG")]
    pub rag: String,
}
