// KPI computation rules: variance arithmetic, RAG classification,
// daily-to-monthly aggregation, and the executive overview projection.
//
// Everything here is a pure function over in-memory rows. No I/O, no shared
// state; identical inputs produce identical outputs.

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::KpiRegistry;
use crate::types::{
    DailyPlantRow, Direction, DomainCard, KpiFactRow, MonthlyPlantRow, OverviewSummary, RagStatus,
};
use crate::util::month_floor;

/// Return `(absolute_variance, pct_variance)` for a pair of present values.
///
/// The percentage is `None` when the budget is zero; a degenerate budget is
/// not an error, it just makes the relative figure meaningless.
pub fn calc_variance(actual: f64, budget: f64) -> (f64, Option<f64>) {
    let absolute = actual - budget;
    if budget == 0.0 {
        return (absolute, None);
    }
    (absolute, Some(absolute / budget * 100.0))
}

/// Classify one (actual, budget) pair against its KPI's direction and
/// amber band.
///
/// Rules:
/// - missing operand or zero budget: `Grey`
/// - higher is better: green if `actual >= budget`, amber if
///   `actual >= budget * (1 - band/100)`, red otherwise
/// - lower is better: green if `actual <= budget`, amber if
///   `actual <= budget * (1 + band/100)`, red otherwise
///
/// The amber threshold is always computed from the budget, never from the
/// actual, so the boundary does not move with the size of the miss. A band
/// of zero degenerates to binary green/red.
pub fn classify_performance(
    actual: Option<f64>,
    budget: Option<f64>,
    direction: Direction,
    amber_band_pct: f64,
) -> RagStatus {
    let (actual, budget) = match (actual, budget) {
        (Some(a), Some(b)) => (a, b),
        _ => return RagStatus::Grey,
    };
    if !actual.is_finite() || !budget.is_finite() {
        return RagStatus::Grey;
    }
    if budget == 0.0 {
        return RagStatus::Grey;
    }

    match direction {
        Direction::HigherIsBetter => {
            if actual >= budget {
                return RagStatus::Green;
            }
            let threshold = budget * (1.0 - amber_band_pct / 100.0);
            if actual >= threshold {
                RagStatus::Amber
            } else {
                RagStatus::Red
            }
        }
        Direction::LowerIsBetter => {
            if actual <= budget {
                return RagStatus::Green;
            }
            let threshold = budget * (1.0 + amber_band_pct / 100.0);
            if actual <= threshold {
                RagStatus::Amber
            } else {
                RagStatus::Red
            }
        }
    }
}

/// Sum of the present values of one metric across a month's rows, or `None`
/// when the metric is absent from every row.
fn sum_present(rows: &[&DailyPlantRow], field: impl Fn(&DailyPlantRow) -> Option<f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut seen = false;
    for &row in rows {
        if let Some(v) = field(row) {
            sum += v;
            seen = true;
        }
    }
    seen.then_some(sum)
}

/// Arithmetic mean of the present values of one metric, or `None` when the
/// metric is absent from every row.
fn mean_present(
    rows: &[&DailyPlantRow],
    field: impl Fn(&DailyPlantRow) -> Option<f64>,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &row in rows {
        if let Some(v) = field(row) {
            sum += v;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Roll daily plant rows up to monthly grain.
///
/// Tonnages and ounces are summed; milling rate, recoveries and
/// availabilities are averaged. The plain mean for rates is a proxy for the
/// volume-weighted average, which would need per-day run hours that the
/// source does not reliably provide; a known accuracy limitation, not a bug.
///
/// Output months are exactly the distinct calendar months present in the
/// input. An empty input yields an empty output.
pub fn summarise_daily_to_monthly(daily_rows: &[DailyPlantRow]) -> Vec<MonthlyPlantRow> {
    if daily_rows.is_empty() {
        warn!("no daily rows to summarise, returning empty monthly summary");
        return Vec::new();
    }

    let mut by_month: BTreeMap<chrono::NaiveDate, Vec<&DailyPlantRow>> = BTreeMap::new();
    for row in daily_rows {
        by_month.entry(month_floor(row.date)).or_default().push(row);
    }

    let result: Vec<MonthlyPlantRow> = by_month
        .into_iter()
        .map(|(month, rows)| MonthlyPlantRow {
            month,
            plant: rows[0].plant.clone(),
            crushed_tonnage_actual: sum_present(&rows, |r| r.crushed_tonnage_actual),
            crushed_tonnage_target: sum_present(&rows, |r| r.crushed_tonnage_target),
            milled_tonnage_actual: sum_present(&rows, |r| r.milled_tonnage_actual),
            milled_tonnage_target: sum_present(&rows, |r| r.milled_tonnage_target),
            milling_rate_tph_actual: mean_present(&rows, |r| r.milling_rate_tph_actual),
            recovery_pct_actual: mean_present(&rows, |r| r.recovery_pct_actual),
            recovery_pct_target: mean_present(&rows, |r| r.recovery_pct_target),
            oz_produced_actual: sum_present(&rows, |r| r.oz_produced_actual),
            oz_produced_target: sum_present(&rows, |r| r.oz_produced_target),
            crusher_availability_pct: mean_present(&rows, |r| r.crusher_availability_pct),
            mill_availability_pct: mean_present(&rows, |r| r.mill_availability_pct),
        })
        .collect();

    info!("summarised {} daily rows to {} monthly rows", daily_rows.len(), result.len());
    result
}

/// Assemble the executive summary for one period.
///
/// For every `(kpi_name, domain)` entry in the map the output carries one
/// card. A domain with no matching fact row gets an all-missing grey card,
/// so the output shape is fixed regardless of the data. When more than one
/// row matches a (KPI, period) pair the first wins; duplicates indicate an
/// upstream defect, not something this projection repairs.
pub fn executive_summary(
    fact_rows: &[KpiFactRow],
    period: &str,
    domain_map: &[(&str, &str)],
    registry: &KpiRegistry,
) -> OverviewSummary {
    let mut domains = BTreeMap::new();

    for (kpi_name, domain) in domain_map {
        let row = fact_rows
            .iter()
            .find(|r| r.period == period && r.kpi_name == *kpi_name);

        let card = match row {
            None => DomainCard {
                actual: None,
                budget: None,
                var_pct: None,
                rag: RagStatus::Grey,
            },
            Some(r) => {
                // Registered direction wins; the row's own direction covers
                // KPIs that passed through the builder unregistered.
                let direction = registry
                    .get(&r.kpi_name)
                    .map(|d| d.direction)
                    .unwrap_or(r.direction);
                let band = registry.amber_band(&r.kpi_name);
                DomainCard {
                    actual: r.actual,
                    budget: r.budget,
                    var_pct: r.variance_pct,
                    rag: classify_performance(r.actual, r.budget, direction, band),
                }
            }
        };
        domains.insert(domain.to_string(), card);
    }

    OverviewSummary {
        period: period.to_string(),
        domains,
    }
}
