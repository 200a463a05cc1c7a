// Simulated data generator.
//
// Produces realistic synthetic records shaped like the plant's extracts,
// for demo runs without source files and for integration tests. All values
// are synthetic. Generation is fully deterministic (a fixed pseudo-noise
// sequence instead of an RNG) so repeated runs are identical.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::types::{
    MillBallRow, PeriodSample, ProjectStatus, RawConsumableRecord, RawDailyRecord, RawKpiRecord,
    RawProjectRecord,
};

// Typical plant parameters per scorecard KPI: raw label (as it appears in
// the source documents, so label mapping is exercised), monthly budget,
// spread, and a bias factor for the simulated actual.
const MONTHLY_PARAMS: &[(&str, f64, f64, f64)] = &[
    ("Crushed tonnage", 125_000.0, 3_000.0, 1.02),
    ("Milling rate t/h", 520.0, 8.0, 1.01),
    ("Milled tonnage", 124_000.0, 3_500.0, 1.02),
    ("Grind (%-75 microns)", 78.0, 1.5, 0.98),
    ("Plant running time %", 97.0, 0.8, 1.01),
    ("Mass pull (%)", 2.1, 0.08, 0.99),
    ("6E Recovery (%)", 79.0, 0.6, 1.005),
    ("Mill Ball consumption g/t", 540.0, 25.0, 1.08),
    ("Filter cake moisture (%)", 13.5, 0.5, 0.95),
    ("Metal Unaccounted For (%)", 2.0, 0.4, 0.6),
    ("Raw water consumption (m3/t)", 1.0, 0.04, 0.95),
    ("Total Cost", 9.8, 0.3, 0.98),
];

const PROJECTS: &[(&str, &str, &str, (i32, u32, u32), ProjectStatus, &str)] = &[
    ("a", "Portal sealing - Phase 2", "AS", (2025, 12, 15), ProjectStatus::Completed,
     "Sealed and inspected successfully"),
    ("b", "TSF wall stability assessment", "AS", (2026, 1, 20), ProjectStatus::Completed,
     "Geotechnical report submitted"),
    ("c", "Seismic monitoring upgrade", "AS", (2026, 2, 28), ProjectStatus::InProgress,
     "Sensors 60% installed, calibration ongoing"),
    ("d", "Piezocone testing - annual review", "AS", (2026, 3, 15), ProjectStatus::InProgress,
     "Third-party audit scheduled for March"),
    ("e", "Drainage system expansion - MTSF", "AS", (2026, 4, 30), ProjectStatus::InProgress,
     "Trenching 40% complete, awaiting pipe delivery"),
    ("f", "Collector dosage optimisation trial", "TM", (2026, 1, 31), ProjectStatus::Completed,
     "Reduced collector by 8% with stable recovery"),
    ("g", "Reagent suite cost reduction", "TM", (2026, 3, 31), ProjectStatus::InProgress,
     "Alternative depressant trial in Week 3"),
    ("h", "Mill 2 mega liner installation", "AS", (2025, 11, 30), ProjectStatus::Completed,
     "All liners installed, mill restarted 28 Nov"),
    ("i", "Return water dam lining repair", "AS", (2026, 5, 30), ProjectStatus::Pending,
     "Awaiting contractor mobilisation"),
    ("j", "Curtain drain - Phase 3 extension", "AS", (2026, 2, 15), ProjectStatus::InProgress,
     "70% trenching complete"),
    ("k", "Jetrodding programme - Q1", "AS", (2026, 3, 30), ProjectStatus::Pending,
     "Scheduled for mid-March start"),
    ("l", "Bench drain design - south wall", "AS", (2026, 4, 15), ProjectStatus::InProgress,
     "Design review with SRK complete, construction pending"),
];

const CONSUMABLES: &[(&str, &str, f64, f64)] = &[
    ("Collector (Chemcol 2015i)", "reagent", 265.0, 270.0),
    ("Activator (CuSO4)", "reagent", 4.8, 5.0),
    ("Depressant (Finnfix)", "reagent", 39.0, 42.0),
    ("Depressant (Depramin 170)", "reagent", 12.5, 15.0),
    ("NaSH", "reagent", 8.2, 10.0),
    ("Frother (Sasfroth)", "reagent", 48.0, 50.0),
    ("Dowfroth", "reagent", 6.5, 8.0),
    ("Anionic Floc (3110)", "reagent", 3.2, 4.0),
    ("Coagulant (CQ50)", "reagent", 1.8, 2.5),
    ("Steel Balls", "reagent", 558.0, 540.0),
    ("Raw water", "water", 0.92, 1.0),
    ("Recycled water", "water", 0.45, 0.5),
    ("Total water", "water", 1.37, 1.5),
];

/// Deterministic pseudo-noise in [-1, 1]. A short cycling sequence is
/// enough to make the numbers look alive without an RNG dependency.
fn wobble(seq: usize) -> f64 {
    let step = (seq * 7 + 3) % 11;
    (step as f64 - 5.0) / 5.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Simulated scorecard records: one per KPI, with a monthly sample series
/// starting at `start_month`. Variance around budget follows each KPI's
/// bias and spread.
pub fn generate_monthly_kpis(start_month: NaiveDate, n_months: usize) -> Vec<RawKpiRecord> {
    MONTHLY_PARAMS
        .iter()
        .enumerate()
        .map(|(k, (label, budget, spread, bias))| {
            let samples = (0..n_months)
                .map(|i| {
                    let month = start_month + Months::new(i as u32);
                    let actual = budget * bias + wobble(k * 31 + i) * spread;
                    PeriodSample {
                        period: month.format("%Y-%m").to_string(),
                        actual: Some(round2(actual)),
                        budget: Some(*budget),
                        var_pct: None,
                    }
                })
                .collect();
            RawKpiRecord {
                label: label.to_string(),
                comments: None,
                samples,
            }
        })
        .collect()
}

/// Simulated daily milled tonnage for one month, with a weekend dip and a
/// floor that stands in for shutdown days.
pub fn generate_daily_production(year: i32, month: u32, days: u32) -> Vec<RawDailyRecord> {
    let daily_target = 11_650.0;
    let mut rows = Vec::new();
    let mut mtd_actual = 0.0;
    let mut mtd_target = 0.0;

    for day in 1..=days {
        let date = match NaiveDate::from_ymd_opt(year, month, day) {
            Some(d) => d,
            None => break,
        };
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let base = daily_target * if is_weekend { 0.85 } else { 1.02 };
        let actual = (base + wobble(day as usize) * 600.0).max(7_000.0);

        mtd_actual += actual;
        mtd_target += daily_target;

        rows.push(RawDailyRecord {
            date,
            daily_actual: Some(round1(actual)),
            daily_target: Some(daily_target),
            mtd_actual: Some(round1(mtd_actual)),
            mtd_target: Some(round1(mtd_target)),
            mtd_var_pct: Some(round2((mtd_actual - mtd_target) / mtd_target * 100.0)),
        });
    }
    rows
}

/// Simulated project tracker, mirroring a typical weekly report table.
pub fn generate_project_tracker() -> Vec<RawProjectRecord> {
    PROJECTS
        .iter()
        .map(|(id, name, responsible, (y, m, d), status, comments)| RawProjectRecord {
            project_id: id.to_string(),
            project_name: name.to_string(),
            responsible: responsible.to_string(),
            planned_completion: NaiveDate::from_ymd_opt(*y, *m, *d),
            status: *status,
            comments: Some(comments.to_string()),
        })
        .collect()
}

/// Simulated mill-ball stock depletion forecast.
pub fn generate_mill_ball_forecast(
    start_month: NaiveDate,
    n_months: usize,
    starting_stock: f64,
    consumption_gt: f64,
    projected_tonnage: f64,
    growth_rate: f64,
) -> Vec<MillBallRow> {
    let mut rows = Vec::new();
    let mut stock = starting_stock;

    for i in 0..n_months {
        let month = start_month + Months::new(i as u32);
        let tonnage = projected_tonnage * growth_rate.powi(i as i32);
        let steel_used = consumption_gt * tonnage / 1_000_000.0;
        stock -= steel_used;

        rows.push(MillBallRow {
            month,
            projected_milled_tonnage: Some(tonnage.round()),
            mill1_consumption_gt: Some(consumption_gt),
            mill1_steel_t: Some(round1(steel_used)),
            mill1_stock_remaining: Some(round1(stock.max(0.0))),
        });
    }
    rows
}

/// Simulated weekly consumables lines.
pub fn generate_weekly_consumables() -> Vec<RawConsumableRecord> {
    CONSUMABLES
        .iter()
        .enumerate()
        .map(|(i, (name, category, actual_base, budget))| RawConsumableRecord {
            category: category.to_string(),
            consumable: name.to_string(),
            actual: Some(round2(actual_base * (1.0 + wobble(i) * 0.03))),
            budget: Some(*budget),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(
            generate_monthly_kpis(start, 8),
            generate_monthly_kpis(start, 8)
        );
        assert_eq!(
            generate_daily_production(2026, 2, 14),
            generate_daily_production(2026, 2, 14)
        );
    }

    #[test]
    fn monthly_kpis_cover_every_registered_label() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let records = generate_monthly_kpis(start, 3);
        assert_eq!(records.len(), 12);
        assert!(records.iter().all(|r| r.samples.len() == 3));
        assert!(records
            .iter()
            .all(|r| r.samples.iter().all(|s| s.actual.is_some() && s.budget.is_some())));
    }

    #[test]
    fn daily_production_respects_the_floor() {
        let rows = generate_daily_production(2026, 2, 28);
        assert_eq!(rows.len(), 28);
        assert!(rows.iter().all(|r| r.daily_actual.unwrap() >= 7_000.0));
    }

    #[test]
    fn mill_ball_stock_never_goes_negative() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let rows = generate_mill_ball_forecast(start, 10, 1_200.0, 600.0, 185_000.0, 1.01);
        assert_eq!(rows.len(), 10);
        assert!(rows
            .iter()
            .all(|r| r.mill1_stock_remaining.unwrap() >= 0.0));
    }
}
