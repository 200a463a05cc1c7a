// CSV extract loaders.
//
// Each loader reads one extract under a fixed column contract and produces
// raw records for the fact builders. Scraping the original spreadsheet and
// word-processor reports is an upstream concern; by the time data reaches
// this module it is expected to be plain tabular CSV. Row-level problems
// are counted, logged, and skipped, never fatal.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::error::Error;
use tracing::{info, warn};

use crate::config::KPI_SKIP_LABELS;
use crate::types::{
    MillBallRow, PeriodSample, ProjectStatus, RawConsumableRecord, RawDailyRecord, RawKpiRecord,
    RawProjectRecord,
};
use crate::util::{parse_completion_date, parse_date_safe, parse_f64_safe};

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub skipped_labels: usize,
}

// Period groups of the scorecard extract, left to right, with the period
// label each group maps to. The quarter-to-date and fiscal-YTD groups are
// cumulative and keep their own labels rather than pretending to be months.
const SCORECARD_PERIODS: &[(&str, &str)] = &[
    ("q1", "2020-Q1"),
    ("q2_ytd", "2020-Q2-YTD"),
    ("aug", "2020-08"),
    ("q3", "2020-Q3"),
    ("fy20_ytd", "FY2020-YTD"),
];

#[derive(Debug, Deserialize)]
struct ScorecardCsvRow {
    kpi: Option<String>,
    q1_actual: Option<String>,
    q1_budget: Option<String>,
    q1_var_pct: Option<String>,
    q2_ytd_actual: Option<String>,
    q2_ytd_budget: Option<String>,
    q2_ytd_var_pct: Option<String>,
    aug_actual: Option<String>,
    aug_budget: Option<String>,
    aug_var_pct: Option<String>,
    q3_actual: Option<String>,
    q3_budget: Option<String>,
    q3_var_pct: Option<String>,
    fy20_ytd_actual: Option<String>,
    fy20_ytd_budget: Option<String>,
    fy20_ytd_var_pct: Option<String>,
    comments: Option<String>,
}

impl ScorecardCsvRow {
    fn triple(&self, prefix: &str) -> (Option<f64>, Option<f64>, Option<f64>) {
        let (a, b, v) = match prefix {
            "q1" => (&self.q1_actual, &self.q1_budget, &self.q1_var_pct),
            "q2_ytd" => (&self.q2_ytd_actual, &self.q2_ytd_budget, &self.q2_ytd_var_pct),
            "aug" => (&self.aug_actual, &self.aug_budget, &self.aug_var_pct),
            "q3" => (&self.q3_actual, &self.q3_budget, &self.q3_var_pct),
            _ => (
                &self.fy20_ytd_actual,
                &self.fy20_ytd_budget,
                &self.fy20_ytd_var_pct,
            ),
        };
        (
            parse_f64_safe(a.as_deref()),
            parse_f64_safe(b.as_deref()),
            parse_f64_safe(v.as_deref()),
        )
    }
}

/// Load the KPI scorecard extract: one row per KPI label, five period
/// groups of (actual, budget, var%) columns, plus a comments column.
/// Safety/audit labels are dropped; they are not plant analytics.
pub fn load_kpi_scorecard(path: &str) -> Result<(Vec<RawKpiRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<ScorecardCsvRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_errors += 1;
                continue;
            }
        };
        let label = match row.kpi.as_deref().map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => {
                report.parse_errors += 1;
                continue;
            }
        };
        if KPI_SKIP_LABELS.contains(label.as_str()) {
            report.skipped_labels += 1;
            continue;
        }

        let samples = SCORECARD_PERIODS
            .iter()
            .map(|(prefix, period)| {
                let (actual, budget, var_pct) = row.triple(prefix);
                PeriodSample {
                    period: period.to_string(),
                    actual,
                    budget,
                    var_pct,
                }
            })
            .collect();

        let comments = row
            .comments
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        records.push(RawKpiRecord {
            label,
            comments,
            samples,
        });
        report.loaded_rows += 1;
    }

    info!(path, rows = report.loaded_rows, "loaded KPI scorecard");
    Ok((records, report))
}

#[derive(Debug, Deserialize)]
struct DailyCsvRow {
    date: Option<String>,
    daily_actual: Option<String>,
    daily_target: Option<String>,
    mtd_actual: Option<String>,
    mtd_target: Option<String>,
    mtd_var_pct: Option<String>,
}

/// Load the daily production extract. Rows without a parseable date are
/// counted as errors and skipped; a date with no figures is kept, since
/// "no data for the day" is information too.
pub fn load_daily_production(
    path: &str,
) -> Result<(Vec<RawDailyRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<DailyCsvRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_errors += 1;
                continue;
            }
        };
        let date = match parse_date_safe(row.date.as_deref()) {
            Some(d) => d,
            None => {
                report.parse_errors += 1;
                continue;
            }
        };
        records.push(RawDailyRecord {
            date,
            daily_actual: parse_f64_safe(row.daily_actual.as_deref()),
            daily_target: parse_f64_safe(row.daily_target.as_deref()),
            mtd_actual: parse_f64_safe(row.mtd_actual.as_deref()),
            mtd_target: parse_f64_safe(row.mtd_target.as_deref()),
            mtd_var_pct: parse_f64_safe(row.mtd_var_pct.as_deref()),
        });
        report.loaded_rows += 1;
    }

    info!(path, rows = report.loaded_rows, "loaded daily production");
    Ok((records, report))
}

#[derive(Debug, Deserialize)]
struct ProjectCsvRow {
    project_id: Option<String>,
    project_name: Option<String>,
    responsible: Option<String>,
    planned_completion: Option<String>,
    comments: Option<String>,
}

/// Derive a project status from free-text comments, the way the weekly
/// report's tracker table implies it. Anything with substantive comments
/// but no recognizable keyword is treated as in progress.
pub fn derive_project_status(comments: &str) -> ProjectStatus {
    let lower = comments.to_lowercase();
    if lower.is_empty() {
        return ProjectStatus::Unknown;
    }
    if lower.contains("complete") || lower.contains("done") || lower.contains("closed") {
        return ProjectStatus::Completed;
    }
    if lower.contains("in progress") || lower.contains("ongoing") || lower.contains("underway") {
        return ProjectStatus::InProgress;
    }
    if lower.contains("pending") || lower.contains("awaiting") || lower.contains("not started") {
        return ProjectStatus::Pending;
    }
    if lower.contains("delayed") || lower.contains("overdue") {
        return ProjectStatus::Delayed;
    }
    if comments.len() > 5 {
        return ProjectStatus::InProgress;
    }
    ProjectStatus::Unknown
}

/// Load the project tracker extract. Completion dates arrive in several
/// human-entered formats; an unparseable one is logged and left absent
/// rather than dropping the project.
pub fn load_project_tracker(
    path: &str,
) -> Result<(Vec<RawProjectRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<ProjectCsvRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_errors += 1;
                continue;
            }
        };
        let project_id = match row.project_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_lowercase(),
            _ => {
                report.parse_errors += 1;
                continue;
            }
        };
        let comments = row
            .comments
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let completion_raw = row.planned_completion.as_deref().unwrap_or("").trim();
        let planned_completion = parse_completion_date(completion_raw);
        if planned_completion.is_none() && !completion_raw.is_empty() {
            warn!(project_id = %project_id, raw = completion_raw, "could not parse completion date");
        }

        records.push(RawProjectRecord {
            project_id,
            project_name: row.project_name.unwrap_or_default().trim().to_string(),
            responsible: row.responsible.unwrap_or_default().trim().to_string(),
            planned_completion,
            status: derive_project_status(comments.as_deref().unwrap_or("")),
            comments,
        });
        report.loaded_rows += 1;
    }

    info!(path, rows = report.loaded_rows, "loaded project tracker");
    Ok((records, report))
}

#[derive(Debug, Deserialize)]
struct MillBallCsvRow {
    month: Option<String>,
    projected_milled_tonnage: Option<String>,
    mill1_consumption_gt: Option<String>,
    mill1_steel_t: Option<String>,
    mill1_stock_remaining: Option<String>,
}

/// Load the mill-ball trend extract: one row per month of projected
/// tonnage, budget consumption rate, steel used, and remaining stock.
pub fn load_mill_ball_trends(path: &str) -> Result<(Vec<MillBallRow>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<MillBallCsvRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_errors += 1;
                continue;
            }
        };
        let month = match parse_date_safe(row.month.as_deref()) {
            Some(d) => d,
            None => {
                report.parse_errors += 1;
                continue;
            }
        };
        records.push(MillBallRow {
            month,
            projected_milled_tonnage: parse_f64_safe(row.projected_milled_tonnage.as_deref()),
            mill1_consumption_gt: parse_f64_safe(row.mill1_consumption_gt.as_deref()),
            mill1_steel_t: parse_f64_safe(row.mill1_steel_t.as_deref()),
            mill1_stock_remaining: parse_f64_safe(row.mill1_stock_remaining.as_deref()),
        });
        report.loaded_rows += 1;
    }

    info!(path, rows = report.loaded_rows, "loaded mill ball trends");
    Ok((records, report))
}

#[derive(Debug, Deserialize)]
struct ConsumableCsvRow {
    category: Option<String>,
    consumable: Option<String>,
    actual: Option<String>,
    budget: Option<String>,
}

/// Load the weekly consumables extract (reagents and water).
pub fn load_weekly_consumables(
    path: &str,
) -> Result<(Vec<RawConsumableRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<ConsumableCsvRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.parse_errors += 1;
                continue;
            }
        };
        let consumable = match row.consumable.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => {
                report.parse_errors += 1;
                continue;
            }
        };
        records.push(RawConsumableRecord {
            category: row
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("unknown")
                .to_string(),
            consumable,
            actual: parse_f64_safe(row.actual.as_deref()),
            budget: parse_f64_safe(row.budget.as_deref()),
        });
        report.loaded_rows += 1;
    }

    info!(path, rows = report.loaded_rows, "loaded weekly consumables");
    Ok((records, report))
}
