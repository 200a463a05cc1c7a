// Fact builders: raw loader/simulator records in, star-schema rows out.
//
// Every builder is a pure function over a slice of raw records. Rows with
// nothing to say (both actual and budget absent) are dropped rather than
// emitted empty, and variance figures are always recomputed locally so the
// fact table never disagrees with itself.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::{KpiRegistry, PLANT_NAME};
use crate::kpis::calc_variance;
use crate::types::{
    ConsumableRow, DailyPlantRow, KpiFactRow, MillBallRow, ProjectDim, ProjectStatusFact,
    RawConsumableRecord, RawDailyRecord, RawKpiRecord, RawProjectRecord,
};

/// Build the monthly KPI fact table from raw scorecard records.
///
/// - Raw labels are translated through `label_map`; an unmapped label passes
///   through as its own canonical name so new KPIs survive ingestion.
/// - Direction comes from the registry, defaulting to higher-is-better.
/// - One fact row per (KPI, period) pair that has at least one of
///   actual/budget; pairs with neither are simply absent.
/// - `variance` and `variance_pct` are recomputed from actual and budget,
///   ignoring any percentage the source supplied. No rounding here; that is
///   a display concern.
pub fn build_fact_monthly_kpi(
    records: &[RawKpiRecord],
    label_map: &HashMap<&str, &str>,
    registry: &KpiRegistry,
) -> Vec<KpiFactRow> {
    let mut rows = Vec::new();

    for record in records {
        let kpi_name = match label_map.get(record.label.as_str()) {
            Some(canonical) => canonical.to_string(),
            None => {
                warn!(label = %record.label, "unmapped KPI label, passing through unchanged");
                record.label.clone()
            }
        };
        let direction = registry.direction(&kpi_name);

        for sample in &record.samples {
            if sample.actual.is_none() && sample.budget.is_none() {
                continue;
            }
            let (variance, variance_pct) = match (sample.actual, sample.budget) {
                (Some(a), Some(b)) => {
                    let (abs, pct) = calc_variance(a, b);
                    (Some(abs), pct)
                }
                _ => (None, None),
            };
            rows.push(KpiFactRow {
                period: sample.period.clone(),
                plant: PLANT_NAME.to_string(),
                kpi_name: kpi_name.clone(),
                actual: sample.actual,
                budget: sample.budget,
                variance,
                variance_pct,
                direction,
                comments: record.comments.clone(),
            });
        }
    }

    info!("built fact_monthly_kpi with {} rows", rows.len());
    rows
}

/// Build the daily plant fact table. The daily extract only reports milled
/// tonnage; the remaining metrics stay absent until a richer source exists.
pub fn build_fact_daily_plant(records: &[RawDailyRecord]) -> Vec<DailyPlantRow> {
    let rows: Vec<DailyPlantRow> = records
        .iter()
        .map(|r| DailyPlantRow {
            date: r.date,
            plant: PLANT_NAME.to_string(),
            crushed_tonnage_actual: None,
            crushed_tonnage_target: None,
            milled_tonnage_actual: r.daily_actual,
            milled_tonnage_target: r.daily_target,
            milling_rate_tph_actual: None,
            recovery_pct_actual: None,
            recovery_pct_target: None,
            oz_produced_actual: None,
            oz_produced_target: None,
            crusher_availability_pct: None,
            mill_availability_pct: None,
        })
        .collect();

    info!("built fact_daily_plant with {} rows", rows.len());
    rows
}

/// Project dimension: the stable attributes only.
pub fn build_dim_project(records: &[RawProjectRecord]) -> Vec<ProjectDim> {
    let rows: Vec<ProjectDim> = records
        .iter()
        .map(|r| ProjectDim {
            project_id: r.project_id.clone(),
            project_name: r.project_name.clone(),
            responsible: r.responsible.clone(),
            planned_completion: r.planned_completion,
        })
        .collect();

    info!("built dim_project with {} rows", rows.len());
    rows
}

/// Project status fact: one snapshot row per project per ingested report.
/// Repeated ingestions with later snapshot dates accumulate history.
pub fn build_fact_project_status(
    records: &[RawProjectRecord],
    snapshot_date: NaiveDate,
) -> Vec<ProjectStatusFact> {
    let rows: Vec<ProjectStatusFact> = records
        .iter()
        .map(|r| ProjectStatusFact {
            snapshot_date,
            project_id: r.project_id.clone(),
            status: r.status,
            comments: r.comments.clone(),
        })
        .collect();

    info!("built fact_project_status with {} rows", rows.len());
    rows
}

/// Build the monthly consumables fact table.
///
/// Steel-ball rows come from the mill-ball trend: the actual is the steel
/// consumed, the budget is derived from the budget rate applied to the
/// projected tonnage (g/t * t / 1e6 = t). Weekly-report consumables carry
/// current-period figures and are tagged with the report month.
pub fn build_fact_monthly_consumables(
    mill_ball: &[MillBallRow],
    weekly: &[RawConsumableRecord],
    report_month: NaiveDate,
) -> Vec<ConsumableRow> {
    let mut rows = Vec::new();

    for r in mill_ball {
        let budget_steel_t = match (r.mill1_consumption_gt, r.projected_milled_tonnage) {
            (Some(rate), Some(tonnage)) if tonnage > 0.0 => Some(rate * tonnage / 1_000_000.0),
            _ => None,
        };
        let (variance, variance_pct) = match (r.mill1_steel_t, budget_steel_t) {
            (Some(a), Some(b)) => {
                let (abs, pct) = calc_variance(a, b);
                (Some(abs), pct)
            }
            _ => (None, None),
        };
        rows.push(ConsumableRow {
            month: r.month,
            plant: PLANT_NAME.to_string(),
            consumable: "steel_balls".to_string(),
            actual: r.mill1_steel_t,
            budget: budget_steel_t,
            variance,
            variance_pct,
        });
    }

    for r in weekly {
        let (variance, variance_pct) = match (r.actual, r.budget) {
            (Some(a), Some(b)) => {
                let (abs, pct) = calc_variance(a, b);
                (Some(abs), pct)
            }
            _ => (None, None),
        };
        rows.push(ConsumableRow {
            month: report_month,
            plant: PLANT_NAME.to_string(),
            consumable: r.consumable.clone(),
            actual: r.actual,
            budget: r.budget,
            variance,
            variance_pct,
        });
    }

    info!("built fact_monthly_consumables with {} rows", rows.len());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KPI_LABEL_MAP;
    use crate::types::PeriodSample;

    fn sample(period: &str, actual: Option<f64>, budget: Option<f64>) -> PeriodSample {
        PeriodSample {
            period: period.to_string(),
            actual,
            budget,
            var_pct: None,
        }
    }

    fn scorecard_record() -> RawKpiRecord {
        RawKpiRecord {
            label: "Crushed tonnage".to_string(),
            comments: Some("Crusher liner change in week 2".to_string()),
            samples: vec![
                sample("2020-Q1", Some(371_000.0), Some(375_000.0)),
                sample("2020-Q2-YTD", None, None),
                sample("2020-Q3", Some(380_000.0), Some(375_000.0)),
            ],
        }
    }

    #[test]
    fn builder_maps_labels_and_skips_empty_periods() {
        let registry = KpiRegistry::builtin();
        let rows = build_fact_monthly_kpi(&[scorecard_record()], &KPI_LABEL_MAP, &registry);

        // The all-missing Q2 sample does not become a row.
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kpi_name == "crushed_tonnage"));
        assert!(rows.iter().all(|r| r.plant == PLANT_NAME));
        assert_eq!(rows[0].period, "2020-Q1");
        assert_eq!(rows[1].period, "2020-Q3");
    }

    #[test]
    fn builder_recomputes_variance_and_ignores_supplied_pct() {
        let registry = KpiRegistry::builtin();
        let record = RawKpiRecord {
            label: "Crushed tonnage".to_string(),
            comments: None,
            samples: vec![PeriodSample {
                period: "2020-Q3".to_string(),
                actual: Some(110.0),
                budget: Some(100.0),
                // Source claims a different figure; the builder recomputes.
                var_pct: Some(99.9),
            }],
        };
        let rows = build_fact_monthly_kpi(&[record], &KPI_LABEL_MAP, &registry);
        assert_eq!(rows[0].variance, Some(10.0));
        assert_eq!(rows[0].variance_pct, Some(10.0));
    }

    #[test]
    fn builder_keeps_unmapped_labels() {
        let registry = KpiRegistry::builtin();
        let record = RawKpiRecord {
            label: "Tailings density (t/m3)".to_string(),
            comments: None,
            samples: vec![sample("2020-Q3", Some(1.4), Some(1.5))],
        };
        let rows = build_fact_monthly_kpi(&[record], &KPI_LABEL_MAP, &registry);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kpi_name, "Tailings density (t/m3)");
        // Unregistered KPIs default to higher-is-better.
        assert_eq!(rows[0].direction, crate::types::Direction::HigherIsBetter);
    }

    #[test]
    fn builder_handles_one_sided_samples() {
        let registry = KpiRegistry::builtin();
        let record = RawKpiRecord {
            label: "Milled tonnage".to_string(),
            comments: None,
            samples: vec![sample("2020-08", Some(123_500.0), None)],
        };
        let rows = build_fact_monthly_kpi(&[record], &KPI_LABEL_MAP, &registry);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actual, Some(123_500.0));
        assert_eq!(rows[0].budget, None);
        assert_eq!(rows[0].variance, None);
        assert_eq!(rows[0].variance_pct, None);
    }

    #[test]
    fn builder_is_idempotent() {
        let registry = KpiRegistry::builtin();
        let records = vec![scorecard_record()];
        let first = build_fact_monthly_kpi(&records, &KPI_LABEL_MAP, &registry);
        let second = build_fact_monthly_kpi(&records, &KPI_LABEL_MAP, &registry);
        assert_eq!(first, second);
    }

    #[test]
    fn steel_ball_budget_derives_from_rate_and_tonnage() {
        let d = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        let mill_ball = vec![MillBallRow {
            month: d,
            projected_milled_tonnage: Some(185_000.0),
            mill1_consumption_gt: Some(600.0),
            mill1_steel_t: Some(120.0),
            mill1_stock_remaining: Some(1_080.0),
        }];
        let rows = build_fact_monthly_consumables(&mill_ball, &[], d);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.consumable, "steel_balls");
        // 600 g/t * 185,000 t / 1e6 = 111 t budget.
        assert_eq!(row.budget, Some(111.0));
        assert_eq!(row.variance, Some(9.0));
        let pct = row.variance_pct.unwrap();
        assert!((pct - 8.108108).abs() < 1e-4);
    }

    #[test]
    fn weekly_consumables_are_tagged_with_report_month() {
        let report_month = NaiveDate::from_ymd_opt(2021, 10, 1).unwrap();
        let weekly = vec![RawConsumableRecord {
            category: "reagent".to_string(),
            consumable: "Collector (Chemcol 2015i)".to_string(),
            actual: Some(265.0),
            budget: Some(270.0),
        }];
        let rows = build_fact_monthly_consumables(&[], &weekly, report_month);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, report_month);
        assert_eq!(rows[0].variance, Some(-5.0));
    }
}
