// Loader tests against real temp files: the fixed CSV column contracts,
// forgiving numeric parsing, and row-level error counting.

use std::io::Write;

use ngezi_report::loader;
use ngezi_report::types::ProjectStatus;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn scorecard_loader_honours_the_column_contract() {
    let csv = "\
kpi,q1_actual,q1_budget,q1_var_pct,q2_ytd_actual,q2_ytd_budget,q2_ytd_var_pct,aug_actual,aug_budget,aug_var_pct,q3_actual,q3_budget,q3_var_pct,fy20_ytd_actual,fy20_ytd_budget,fy20_ytd_var_pct,comments
Tis,1,1,0,,,,,,,,,,,,,
Crushed tonnage,\"371,000\",\"375,000\",-1.04,,,,123500,125000,-1.2,380000,375000,1.33,,,,Crusher liner change in week 2
6E Recovery (%),78.6,79,-0.5,,,,,,,79.4,79,0.51,,,,
";
    let file = write_temp(csv);
    let (records, report) = loader::load_kpi_scorecard(file.path().to_str().unwrap()).unwrap();

    // The audit row is skipped, two KPI rows survive.
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.skipped_labels, 1);
    assert_eq!(records.len(), 2);

    let crushed = &records[0];
    assert_eq!(crushed.label, "Crushed tonnage");
    assert_eq!(crushed.comments.as_deref(), Some("Crusher liner change in week 2"));
    assert_eq!(crushed.samples.len(), 5);

    // Thousands separators parse; blank cells stay absent.
    let q1 = &crushed.samples[0];
    assert_eq!(q1.period, "2020-Q1");
    assert_eq!(q1.actual, Some(371_000.0));
    assert_eq!(q1.budget, Some(375_000.0));
    let q2 = &crushed.samples[1];
    assert_eq!(q2.actual, None);
    assert_eq!(q2.budget, None);
}

#[test]
fn daily_loader_counts_bad_dates_without_failing() {
    let csv = "\
date,daily_actual,daily_target,mtd_actual,mtd_target,mtd_var_pct
2021-10-01,11900,11650,11900,11650,2.15
not-a-date,12000,11650,,,
2021-10-02,,11650,,,
";
    let file = write_temp(csv);
    let (records, report) = loader::load_daily_production(file.path().to_str().unwrap()).unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.parse_errors, 1);
    assert_eq!(records.len(), 2);
    // A day without figures is still a day.
    assert_eq!(records[1].daily_actual, None);
    assert_eq!(records[1].daily_target, Some(11_650.0));
}

#[test]
fn project_loader_derives_status_and_dates() {
    let csv = "\
project_id,project_name,responsible,planned_completion,comments
a,Portal sealing - Phase 2,AS,June 2021,Sealed and inspected successfully. Work complete.
b,Return water dam lining repair,AS,30 November 2021,Awaiting contractor mobilisation
c,Seismic monitoring upgrade,AS,TBC,Sensors 60% installed and calibration ongoing
";
    let file = write_temp(csv);
    let (records, report) = loader::load_project_tracker(file.path().to_str().unwrap()).unwrap();

    assert_eq!(report.loaded_rows, 3);
    assert_eq!(records[0].status, ProjectStatus::Completed);
    assert_eq!(records[1].status, ProjectStatus::Pending);
    assert_eq!(records[2].status, ProjectStatus::InProgress);

    assert_eq!(
        records[0].planned_completion,
        chrono::NaiveDate::from_ymd_opt(2021, 6, 1)
    );
    assert_eq!(
        records[1].planned_completion,
        chrono::NaiveDate::from_ymd_opt(2021, 11, 30)
    );
    // "TBC" has no date; the project is kept anyway.
    assert_eq!(records[2].planned_completion, None);
}

#[test]
fn missing_file_is_an_error_not_a_panic() {
    assert!(loader::load_kpi_scorecard("data/does_not_exist.csv").is_err());
}
