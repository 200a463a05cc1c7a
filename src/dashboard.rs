// Dashboard-ready projections.
//
// These are the entry points a front end calls to populate cards and
// tables. Each one returns plain rows or summary structs derived from the
// fact tables; fact rows themselves are never mutated.

use chrono::NaiveDate;
use tracing::warn;

use crate::config::{KpiRegistry, DEFAULT_AMBER_BAND_PCT, OVERVIEW_DOMAIN_MAP};
use crate::kpis::{classify_performance, executive_summary};
use crate::types::{
    ConsumableRagRow, ConsumableRow, Direction, KpiFactRow, ManagementSummaryRow, OverviewSummary,
    ProjectDim, ProjectStatus, ProjectStatusFact, ProjectStatusRow,
};

/// Executive summary over the standard six overview domains.
pub fn manager_overview(
    fact_kpi: &[KpiFactRow],
    period: &str,
    registry: &KpiRegistry,
) -> OverviewSummary {
    executive_summary(fact_kpi, period, OVERVIEW_DOMAIN_MAP, registry)
}

/// Monthly management summary: one row per KPI for the selected period,
/// each with a derived RAG status.
pub fn monthly_management_summary(
    fact_kpi: &[KpiFactRow],
    period: &str,
    registry: &KpiRegistry,
) -> Vec<ManagementSummaryRow> {
    let rows: Vec<ManagementSummaryRow> = fact_kpi
        .iter()
        .filter(|r| r.period == period)
        .map(|r| {
            let direction = registry
                .get(&r.kpi_name)
                .map(|d| d.direction)
                .unwrap_or(r.direction);
            let band = registry.amber_band(&r.kpi_name);
            ManagementSummaryRow {
                kpi_name: r.kpi_name.clone(),
                actual: r.actual,
                budget: r.budget,
                variance: r.variance,
                variance_pct: r.variance_pct,
                rag: classify_performance(r.actual, r.budget, direction, band),
                comments: r.comments.clone(),
            }
        })
        .collect();

    if rows.is_empty() {
        warn!(period, "no KPI data for selected period");
    }
    rows
}

/// Project dimension joined with the most recent status snapshot per
/// project. A project with no snapshot yet shows as unknown.
pub fn project_status_summary(
    dim_project: &[ProjectDim],
    fact_status: &[ProjectStatusFact],
) -> Vec<ProjectStatusRow> {
    dim_project
        .iter()
        .map(|dim| {
            let latest = fact_status
                .iter()
                .filter(|f| f.project_id == dim.project_id)
                .max_by_key(|f| f.snapshot_date);
            ProjectStatusRow {
                project_id: dim.project_id.clone(),
                project_name: dim.project_name.clone(),
                responsible: dim.responsible.clone(),
                planned_completion: dim.planned_completion,
                status: latest.map(|f| f.status).unwrap_or(ProjectStatus::Unknown),
                comments: latest.and_then(|f| f.comments.clone()),
                snapshot_date: latest.map(|f| f.snapshot_date),
            }
        })
        .collect()
}

/// Sorted, de-duplicated period labels for UI dropdowns.
pub fn available_periods(fact_kpi: &[KpiFactRow]) -> Vec<String> {
    let mut periods: Vec<String> = fact_kpi.iter().map(|r| r.period.clone()).collect();
    periods.sort();
    periods.dedup();
    periods
}

/// Consumables for a month (or all months), with derived RAG. Consuming
/// less than budget is always the good direction here.
pub fn consumables_summary(
    fact_consumables: &[ConsumableRow],
    month: Option<NaiveDate>,
) -> Vec<ConsumableRagRow> {
    fact_consumables
        .iter()
        .filter(|r| month.map(|m| r.month == m).unwrap_or(true))
        .map(|r| ConsumableRagRow {
            month: r.month,
            consumable: r.consumable.clone(),
            actual: r.actual,
            budget: r.budget,
            variance: r.variance,
            variance_pct: r.variance_pct,
            rag: classify_performance(
                r.actual,
                r.budget,
                Direction::LowerIsBetter,
                DEFAULT_AMBER_BAND_PCT,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RagStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dim(id: &str) -> ProjectDim {
        ProjectDim {
            project_id: id.to_string(),
            project_name: format!("Project {id}"),
            responsible: "AS".to_string(),
            planned_completion: Some(date(2026, 3, 31)),
        }
    }

    fn snapshot(id: &str, day: NaiveDate, status: ProjectStatus) -> ProjectStatusFact {
        ProjectStatusFact {
            snapshot_date: day,
            project_id: id.to_string(),
            status,
            comments: None,
        }
    }

    #[test]
    fn current_status_is_the_latest_snapshot() {
        let dims = vec![dim("c")];
        let facts = vec![
            snapshot("c", date(2026, 1, 9), ProjectStatus::Pending),
            snapshot("c", date(2026, 2, 14), ProjectStatus::InProgress),
            snapshot("c", date(2026, 1, 30), ProjectStatus::Pending),
        ];
        let rows = project_status_summary(&dims, &facts);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, ProjectStatus::InProgress);
        assert_eq!(rows[0].snapshot_date, Some(date(2026, 2, 14)));
    }

    #[test]
    fn project_without_snapshot_shows_unknown() {
        let rows = project_status_summary(&[dim("z")], &[]);
        assert_eq!(rows[0].status, ProjectStatus::Unknown);
        assert_eq!(rows[0].snapshot_date, None);
    }

    #[test]
    fn periods_are_sorted_and_unique() {
        let row = |period: &str| KpiFactRow {
            period: period.to_string(),
            plant: "Ngezi Concentrator".to_string(),
            kpi_name: "milled_tonnage".to_string(),
            actual: Some(1.0),
            budget: Some(1.0),
            variance: Some(0.0),
            variance_pct: Some(0.0),
            direction: Direction::HigherIsBetter,
            comments: None,
        };
        let rows = vec![row("2020-Q3"), row("2020-Q1"), row("2020-Q3")];
        assert_eq!(available_periods(&rows), vec!["2020-Q1", "2020-Q3"]);
    }

    #[test]
    fn consumables_classify_as_lower_is_better() {
        let m = date(2021, 10, 1);
        let facts = vec![
            ConsumableRow {
                month: m,
                plant: "Ngezi Concentrator".to_string(),
                consumable: "NaSH".to_string(),
                actual: Some(8.2),
                budget: Some(10.0),
                variance: Some(-1.8),
                variance_pct: Some(-18.0),
            },
            ConsumableRow {
                month: m,
                plant: "Ngezi Concentrator".to_string(),
                consumable: "Steel Balls".to_string(),
                actual: Some(620.0),
                budget: Some(540.0),
                variance: Some(80.0),
                variance_pct: Some(14.8),
            },
        ];
        let summary = consumables_summary(&facts, Some(m));
        assert_eq!(summary[0].rag, RagStatus::Green);
        assert_eq!(summary[1].rag, RagStatus::Red);
    }
}
