// Console rendering and file export.
//
// Typed rows come in, formatted display rows and files go out. Missing
// values render as `n/a`; they are "not yet available", never zero.

use serde::Serialize;
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OVERVIEW_DOMAIN_MAP;
use crate::types::{
    ConsumableDisplayRow, ConsumableRagRow, KpiSummaryDisplayRow, ManagementSummaryRow,
    MonthlyDisplayRow, MonthlyPlantRow, OverviewDisplayRow, OverviewSummary, ProjectDisplayRow,
    ProjectStatusRow,
};
use crate::util::format_number;

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format_number(v, decimals),
        None => "n/a".to_string(),
    }
}

fn fmt_opt_date(d: Option<chrono::NaiveDate>) -> String {
    match d {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "n/a".to_string(),
    }
}

/// Overview cards as display rows, in domain-map order rather than the
/// summary's alphabetical key order.
pub fn overview_rows(summary: &OverviewSummary) -> Vec<OverviewDisplayRow> {
    OVERVIEW_DOMAIN_MAP
        .iter()
        .filter_map(|(_, domain)| summary.domains.get(*domain).map(|card| (domain, card)))
        .map(|(domain, card)| OverviewDisplayRow {
            domain: domain.to_string(),
            actual: fmt_opt(card.actual, 2),
            budget: fmt_opt(card.budget, 2),
            var_pct: fmt_opt(card.var_pct, 2),
            rag: card.rag.as_str().to_string(),
        })
        .collect()
}

pub fn management_rows(rows: &[ManagementSummaryRow]) -> Vec<KpiSummaryDisplayRow> {
    rows.iter()
        .map(|r| KpiSummaryDisplayRow {
            kpi_name: r.kpi_name.clone(),
            actual: fmt_opt(r.actual, 2),
            budget: fmt_opt(r.budget, 2),
            variance: fmt_opt(r.variance, 2),
            variance_pct: fmt_opt(r.variance_pct, 2),
            rag: r.rag.as_str().to_string(),
        })
        .collect()
}

pub fn project_rows(rows: &[ProjectStatusRow]) -> Vec<ProjectDisplayRow> {
    rows.iter()
        .map(|r| ProjectDisplayRow {
            project_id: r.project_id.clone(),
            project_name: r.project_name.clone(),
            responsible: r.responsible.clone(),
            planned_completion: fmt_opt_date(r.planned_completion),
            status: r.status.as_str().to_string(),
        })
        .collect()
}

pub fn monthly_rows(rows: &[MonthlyPlantRow]) -> Vec<MonthlyDisplayRow> {
    rows.iter()
        .map(|r| MonthlyDisplayRow {
            month: r.month.format("%Y-%m").to_string(),
            milled_tonnage_actual: fmt_opt(r.milled_tonnage_actual, 1),
            milled_tonnage_target: fmt_opt(r.milled_tonnage_target, 1),
            milling_rate_tph_actual: fmt_opt(r.milling_rate_tph_actual, 1),
            recovery_pct_actual: fmt_opt(r.recovery_pct_actual, 2),
        })
        .collect()
}

pub fn consumable_rows(rows: &[ConsumableRagRow]) -> Vec<ConsumableDisplayRow> {
    rows.iter()
        .map(|r| ConsumableDisplayRow {
            month: r.month.format("%Y-%m").to_string(),
            consumable: r.consumable.clone(),
            actual: fmt_opt(r.actual, 2),
            budget: fmt_opt(r.budget, 2),
            var_pct: fmt_opt(r.variance_pct, 2),
            rag: r.rag.as_str().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DomainCard, RagStatus};
    use std::collections::BTreeMap;

    #[test]
    fn missing_values_render_as_na() {
        let mut domains = BTreeMap::new();
        domains.insert(
            "crushing".to_string(),
            DomainCard {
                actual: None,
                budget: Some(375_000.0),
                var_pct: None,
                rag: RagStatus::Grey,
            },
        );
        let summary = OverviewSummary {
            period: "2020-Q3".to_string(),
            domains,
        };
        let rows = overview_rows(&summary);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actual, "n/a");
        assert_eq!(rows[0].budget, "375,000.00");
        assert_eq!(rows[0].rag, "grey");
    }
}
