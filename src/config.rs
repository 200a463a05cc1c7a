// Static configuration: KPI registry, label mapping, overview domain map,
// plant identity, and extract file locations.
//
// The registry is an explicit, validated, immutable object constructed once
// at startup and passed into whatever needs it. Adding a KPI means adding a
// registry entry and (usually) a label mapping; no code changes elsewhere.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::types::Direction;

pub const PLANT_NAME: &str = "Ngezi Concentrator";

/// Tolerance used when a KPI has no registry entry, in percentage points.
pub const DEFAULT_AMBER_BAND_PCT: f64 = 5.0;

// Extract file locations relative to the working directory.
pub const KPI_SCORECARD_FILE: &str = "data/kpi_scorecard.csv";
pub const DAILY_PLANT_FILE: &str = "data/daily_production.csv";
pub const PROJECTS_FILE: &str = "data/project_tracker.csv";
pub const MILL_BALL_FILE: &str = "data/mill_ball_trends.csv";
pub const CONSUMABLES_FILE: &str = "data/weekly_consumables.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KPI '{kpi}': unknown direction '{value}' (expected higher_is_better or lower_is_better)")]
    UnknownDirection { kpi: String, value: String },

    #[error("KPI '{kpi}': amber band must be finite and >= 0, got {value}")]
    InvalidAmberBand { kpi: String, value: f64 },

    #[error("duplicate KPI definition: {0}")]
    DuplicateKpi(String),

    #[error("KPI definition with an empty name")]
    EmptyKpiName,
}

/// Unvalidated registry entry, e.g. deserialized from a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawKpiDefinition {
    pub name: String,
    pub direction: String,
    pub unit: String,
    pub amber_band_pct: f64,
}

/// Validated registry entry for one KPI.
#[derive(Debug, Clone)]
pub struct KpiDefinition {
    pub direction: Direction,
    pub unit: String,
    pub amber_band_pct: f64,
}

/// Immutable KPI registry: canonical name to definition.
#[derive(Debug, Clone)]
pub struct KpiRegistry {
    entries: HashMap<String, KpiDefinition>,
}

impl KpiRegistry {
    /// Build a registry from raw entries, failing fast on the first
    /// malformed definition. A bad direction or amber band is a
    /// configuration defect and must not be silently defaulted away.
    pub fn from_raw(
        raw: impl IntoIterator<Item = RawKpiDefinition>,
    ) -> Result<KpiRegistry, ConfigError> {
        let mut entries = HashMap::new();
        for def in raw {
            if def.name.trim().is_empty() {
                return Err(ConfigError::EmptyKpiName);
            }
            let direction =
                Direction::parse(&def.direction).ok_or_else(|| ConfigError::UnknownDirection {
                    kpi: def.name.clone(),
                    value: def.direction.clone(),
                })?;
            if !def.amber_band_pct.is_finite() || def.amber_band_pct < 0.0 {
                return Err(ConfigError::InvalidAmberBand {
                    kpi: def.name.clone(),
                    value: def.amber_band_pct,
                });
            }
            if entries
                .insert(
                    def.name.clone(),
                    KpiDefinition {
                        direction,
                        unit: def.unit,
                        amber_band_pct: def.amber_band_pct,
                    },
                )
                .is_some()
            {
                return Err(ConfigError::DuplicateKpi(def.name));
            }
        }
        Ok(KpiRegistry { entries })
    }

    /// The plant's standard registry: the twelve scorecard KPIs with their
    /// evaluation direction, display unit, and amber-band tolerance.
    pub fn builtin() -> KpiRegistry {
        let table: &[(&str, Direction, &str, f64)] = &[
            ("crushed_tonnage", Direction::HigherIsBetter, "t", 5.0),
            ("milling_rate_tph", Direction::HigherIsBetter, "tph", 5.0),
            ("milled_tonnage", Direction::HigherIsBetter, "t", 5.0),
            ("grind_pct_minus75", Direction::HigherIsBetter, "%", 3.0),
            ("plant_running_time_pct", Direction::HigherIsBetter, "%", 3.0),
            ("mass_pull_pct", Direction::HigherIsBetter, "%", 3.0),
            ("recovery_6e_pct", Direction::HigherIsBetter, "%", 2.0),
            ("mill_ball_consumption_gt", Direction::LowerIsBetter, "g/t", 5.0),
            ("filter_cake_moisture_pct", Direction::LowerIsBetter, "%", 3.0),
            ("metal_unaccounted_for_pct", Direction::LowerIsBetter, "%", 3.0),
            ("raw_water_m3t", Direction::LowerIsBetter, "m3/t", 5.0),
            ("total_cost", Direction::LowerIsBetter, "USD", 5.0),
        ];

        let entries = table
            .iter()
            .map(|(name, direction, unit, band)| {
                (
                    name.to_string(),
                    KpiDefinition {
                        direction: *direction,
                        unit: unit.to_string(),
                        amber_band_pct: *band,
                    },
                )
            })
            .collect();
        KpiRegistry { entries }
    }

    pub fn get(&self, kpi_name: &str) -> Option<&KpiDefinition> {
        self.entries.get(kpi_name)
    }

    /// Direction for a KPI, defaulting to higher-is-better when the KPI is
    /// not registered.
    pub fn direction(&self, kpi_name: &str) -> Direction {
        self.entries
            .get(kpi_name)
            .map(|d| d.direction)
            .unwrap_or(Direction::HigherIsBetter)
    }

    /// Amber band for a KPI, defaulting to `DEFAULT_AMBER_BAND_PCT` when
    /// the KPI is not registered.
    pub fn amber_band(&self, kpi_name: &str) -> f64 {
        self.entries
            .get(kpi_name)
            .map(|d| d.amber_band_pct)
            .unwrap_or(DEFAULT_AMBER_BAND_PCT)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw scorecard labels (column B of the source) to canonical KPI names.
pub static KPI_LABEL_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Crushed tonnage", "crushed_tonnage"),
        ("Milling rate t/h", "milling_rate_tph"),
        ("Milled tonnage", "milled_tonnage"),
        ("Grind (%-75 microns)", "grind_pct_minus75"),
        ("Plant running time %", "plant_running_time_pct"),
        ("Mass pull (%)", "mass_pull_pct"),
        ("6E Recovery (%)", "recovery_6e_pct"),
        ("Mill Ball consumption g/t", "mill_ball_consumption_gt"),
        ("Filter cake moisture (%)", "filter_cake_moisture_pct"),
        ("Metal Unaccounted For (%)", "metal_unaccounted_for_pct"),
        ("Raw water consumption (m3/t)", "raw_water_m3t"),
        ("Total Cost", "total_cost"),
    ])
});

/// Scorecard labels that are safety/audit rows, not plant analytics.
pub static KPI_SKIP_LABELS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["Tis", "BMS external audits"]));

/// Canonical KPI name to overview domain, in display order.
pub const OVERVIEW_DOMAIN_MAP: &[(&str, &str)] = &[
    ("crushed_tonnage", "crushing"),
    ("milled_tonnage", "milling"),
    ("recovery_6e_pct", "recovery"),
    ("mill_ball_consumption_gt", "mill_balls"),
    ("raw_water_m3t", "water"),
    ("total_cost", "cost"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, direction: &str, band: f64) -> RawKpiDefinition {
        RawKpiDefinition {
            name: name.to_string(),
            direction: direction.to_string(),
            unit: "t".to_string(),
            amber_band_pct: band,
        }
    }

    #[test]
    fn builtin_registry_has_all_scorecard_kpis() {
        let registry = KpiRegistry::builtin();
        assert_eq!(registry.len(), 12);
        assert_eq!(
            registry.direction("mill_ball_consumption_gt"),
            Direction::LowerIsBetter
        );
        assert_eq!(registry.amber_band("recovery_6e_pct"), 2.0);
    }

    #[test]
    fn unregistered_kpi_falls_back_to_defaults() {
        let registry = KpiRegistry::builtin();
        assert_eq!(registry.direction("brand_new_kpi"), Direction::HigherIsBetter);
        assert_eq!(registry.amber_band("brand_new_kpi"), DEFAULT_AMBER_BAND_PCT);
    }

    #[test]
    fn unknown_direction_fails_registry_construction() {
        let err = KpiRegistry::from_raw([raw("throughput", "sideways_is_better", 5.0)])
            .expect_err("direction should be rejected");
        assert!(matches!(err, ConfigError::UnknownDirection { .. }));
    }

    #[test]
    fn negative_amber_band_is_rejected() {
        let err = KpiRegistry::from_raw([raw("throughput", "higher_is_better", -1.0)])
            .expect_err("band should be rejected");
        assert!(matches!(err, ConfigError::InvalidAmberBand { .. }));
    }

    #[test]
    fn nan_amber_band_is_rejected() {
        let err = KpiRegistry::from_raw([raw("throughput", "higher_is_better", f64::NAN)])
            .expect_err("band should be rejected");
        assert!(matches!(err, ConfigError::InvalidAmberBand { .. }));
    }

    #[test]
    fn duplicate_kpi_is_rejected() {
        let err = KpiRegistry::from_raw([
            raw("throughput", "higher_is_better", 5.0),
            raw("throughput", "lower_is_better", 3.0),
        ])
        .expect_err("duplicate should be rejected");
        assert!(matches!(err, ConfigError::DuplicateKpi(_)));
    }

    #[test]
    fn label_map_targets_are_all_registered() {
        let registry = KpiRegistry::builtin();
        for canonical in KPI_LABEL_MAP.values() {
            assert!(
                registry.get(canonical).is_some(),
                "label map points at unregistered KPI {canonical}"
            );
        }
    }
}
