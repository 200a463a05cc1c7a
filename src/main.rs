// Entry point and high-level console flow.
//
// - Option [1] loads the CSV extracts, printing diagnostics. Any extract
//   whose file is missing or unreadable is replaced with simulated data so
//   the pipeline can always run end to end.
// - Option [2] builds the fact and dimension tables, prints dashboard
//   previews as markdown tables, runs the acceptance checks, and writes
//   CSV/JSON outputs.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;

use ngezi_report::config::{
    self, KpiRegistry, CONSUMABLES_FILE, DAILY_PLANT_FILE, KPI_LABEL_MAP, KPI_SCORECARD_FILE,
    MILL_BALL_FILE, PROJECTS_FILE,
};
use ngezi_report::types::{
    MillBallRow, RawConsumableRecord, RawDailyRecord, RawKpiRecord, RawProjectRecord,
};
use ngezi_report::util::format_int;
use ngezi_report::{dashboard, kpis, loader, logging, output, simulator, transforms};

// Simple in-memory app state so we only load the extracts once but can
// generate reports multiple times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<SourceData>,
}

#[derive(Clone)]
struct SourceData {
    kpi_records: Vec<RawKpiRecord>,
    daily_records: Vec<RawDailyRecord>,
    project_records: Vec<RawProjectRecord>,
    mill_ball: Vec<MillBallRow>,
    consumables: Vec<RawConsumableRecord>,
    /// As-of date for the project status snapshot.
    snapshot_date: NaiveDate,
    /// Month the weekly consumables figures belong to.
    report_month: NaiveDate,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Read a single line of input after printing the common prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after generating reports.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Use the loader result when the file was readable, otherwise fall back
/// to simulated records. Returns the records and whether they are real.
fn load_or_simulate<T>(
    name: &str,
    loaded: Result<(Vec<T>, loader::LoadReport), Box<dyn std::error::Error>>,
    simulate: impl FnOnce() -> Vec<T>,
) -> (Vec<T>, bool) {
    match loaded {
        Ok((records, report)) => {
            println!(
                "{}: {} rows loaded ({} parse errors)",
                name,
                format_int(report.loaded_rows as i64),
                format_int(report.parse_errors as i64)
            );
            (records, true)
        }
        Err(e) => {
            println!("{}: not available ({}), using simulated data", name, e);
            (simulate(), false)
        }
    }
}

/// Handle option [1]: load all extracts, simulating the missing ones.
fn handle_load() {
    println!();
    let (kpi_records, _) = load_or_simulate("KPI scorecard", loader::load_kpi_scorecard(KPI_SCORECARD_FILE), || {
        simulator::generate_monthly_kpis(date(2025, 7, 1), 8)
    });
    let (daily_records, _) = load_or_simulate(
        "Daily production",
        loader::load_daily_production(DAILY_PLANT_FILE),
        || simulator::generate_daily_production(2026, 2, 14),
    );
    let (project_records, projects_real) = load_or_simulate(
        "Project tracker",
        loader::load_project_tracker(PROJECTS_FILE),
        simulator::generate_project_tracker,
    );
    let (mill_ball, _) = load_or_simulate(
        "Mill ball trends",
        loader::load_mill_ball_trends(MILL_BALL_FILE),
        || simulator::generate_mill_ball_forecast(date(2025, 9, 1), 10, 1_200.0, 600.0, 185_000.0, 1.01),
    );
    let (consumables, consumables_real) = load_or_simulate(
        "Weekly consumables",
        loader::load_weekly_consumables(CONSUMABLES_FILE),
        simulator::generate_weekly_consumables,
    );

    // The October 2021 weekly report carries the real snapshot/report
    // dates; simulated sources use the simulator's reporting window.
    let snapshot_date = if projects_real { date(2021, 11, 5) } else { date(2026, 2, 14) };
    let report_month = if consumables_real { date(2021, 10, 1) } else { date(2026, 2, 1) };

    let mut state = APP_STATE.lock().unwrap();
    state.data = Some(SourceData {
        kpi_records,
        daily_records,
        project_records,
        mill_ball,
        consumables,
        snapshot_date,
        report_month,
    });
    println!();
}

/// Handle option [2]: build fact tables, print dashboard previews, run the
/// acceptance checks, and export outputs.
fn handle_generate(registry: &KpiRegistry) {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the extracts first (option 1).\n");
        return;
    };

    // Fact and dimension tables.
    let fact_kpi = transforms::build_fact_monthly_kpi(&data.kpi_records, &KPI_LABEL_MAP, registry);
    let fact_daily = transforms::build_fact_daily_plant(&data.daily_records);
    let monthly_plant = kpis::summarise_daily_to_monthly(&fact_daily);
    let dim_project = transforms::build_dim_project(&data.project_records);
    let fact_status = transforms::build_fact_project_status(&data.project_records, data.snapshot_date);
    let fact_consumables = transforms::build_fact_monthly_consumables(
        &data.mill_ball,
        &data.consumables,
        data.report_month,
    );

    println!(
        "Built {} KPI fact rows, {} daily rows, {} projects, {} consumable rows\n",
        format_int(fact_kpi.len() as i64),
        format_int(fact_daily.len() as i64),
        format_int(dim_project.len() as i64),
        format_int(fact_consumables.len() as i64),
    );

    let periods = dashboard::available_periods(&fact_kpi);
    println!("Available periods: {}\n", periods.join(", "));
    let Some(period) = periods.last() else {
        println!("Error: no periods in the KPI fact table.\n");
        return;
    };

    // Executive overview.
    let overview = dashboard::manager_overview(&fact_kpi, period, registry);
    println!("Executive Summary ({})\n", period);
    output::preview_table(&output::overview_rows(&overview), 6);

    // Monthly management summary.
    let mgmt = dashboard::monthly_management_summary(&fact_kpi, period, registry);
    println!("Monthly Management Summary ({})\n", period);
    output::preview_table(&output::management_rows(&mgmt), 15);

    // Monthly plant roll-up.
    println!("Monthly Plant Summary\n");
    output::preview_table(&output::monthly_rows(&monthly_plant), 12);

    // Project status.
    let projects = dashboard::project_status_summary(&dim_project, &fact_status);
    println!("Project Status\n");
    output::preview_table(&output::project_rows(&projects), 15);

    // Consumables.
    let consumables = dashboard::consumables_summary(&fact_consumables, None);
    println!("Consumables\n");
    output::preview_table(&output::consumable_rows(&consumables), 20);

    // Acceptance checks.
    println!("Acceptance checks:");
    let period_rows = fact_kpi.iter().filter(|r| &r.period == period).count();
    let check = |ok: bool, msg: String| println!("  [{}] {}", if ok { "PASS" } else { "FAIL" }, msg);
    check(
        period_rows >= 10,
        format!("{} has {} KPI rows (need >= 10)", period, period_rows),
    );
    check(
        overview.domains.len() == 6,
        format!("overview has {} of 6 domains", overview.domains.len()),
    );
    check(
        dim_project.len() >= 12,
        format!("project table has {} rows (need >= 12)", dim_project.len()),
    );
    let steel_rows = fact_consumables
        .iter()
        .filter(|r| r.consumable == "steel_balls")
        .count();
    check(steel_rows >= 4, format!("steel balls has {} monthly rows", steel_rows));
    println!();

    // Exports.
    for (file, result) in [
        ("fact_monthly_kpi.csv", output::write_csv("fact_monthly_kpi.csv", &fact_kpi)),
        ("monthly_plant_summary.csv", output::write_csv("monthly_plant_summary.csv", &monthly_plant)),
        ("management_summary.csv", output::write_csv("management_summary.csv", &mgmt)),
        ("overview.json", output::write_json("overview.json", &overview)),
    ] {
        match result {
            Ok(()) => println!("Wrote {}", file),
            Err(e) => eprintln!("Write error for {}: {}", file, e),
        }
    }
    println!();
}

fn main() {
    logging::init();
    let registry = KpiRegistry::builtin();

    println!("{} - Mine Manager Oversight Dashboard\n", config::PLANT_NAME);
    loop {
        println!("[1] Load source data");
        println!("[2] Generate dashboard reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_generate(&registry);
                if !prompt_back_to_menu() {
                    println!("Exiting.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
