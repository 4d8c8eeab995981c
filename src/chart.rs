use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::aggregate::{aggregate_all_sites, aggregate_single_site};
use crate::data::filter::{filter_by_site, filter_launches};
use crate::data::model::{FilterSelection, LaunchOutcome, LaunchTable, SiteSelector};

pub const PROPORTION_TITLE: &str = "Launch Success Pie Chart";
pub const PAYLOAD_AXIS_TITLE: &str = "Payload Mass (kg)";
pub const CLASS_AXIS_TITLE: &str = "Class (Success=1, Failure=0)";

// ---------------------------------------------------------------------------
// ChartSpec – renderer-agnostic chart description
// ---------------------------------------------------------------------------

/// One slice of a proportion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: usize,
    /// Set on the success / failure slices of a single-site chart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<LaunchOutcome>,
}

/// One scatter point: payload on x, outcome class on y.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: u8,
    /// Launch site, shown as hover text.
    pub label: String,
    /// Booster version category, used for colouring when known.
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartBody {
    Proportion {
        slices: Vec<Slice>,
    },
    Scatter {
        points: Vec<ScatterPoint>,
        x_axis_title: String,
        y_axis_title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub series_name: String,
    #[serde(flatten)]
    pub body: ChartBody,
}

impl ChartSpec {
    /// True when there is nothing to draw: no points, or slices summing to zero.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            ChartBody::Proportion { slices } => slices.iter().all(|s| s.value == 0),
            ChartBody::Scatter { points, .. } => points.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Proportion chart driven by the site selector only.
///
/// * `All`  → one slice per site holding its success count
/// * a site → `Success` / `Failure` slices for that site (both zero if it has no rows)
pub fn build_proportion_chart(site: &SiteSelector, table: &LaunchTable) -> ChartSpec {
    match site {
        SiteSelector::All => {
            let slices = aggregate_all_sites(table)
                .into_iter()
                .map(|s| Slice {
                    label: s.site,
                    value: s.successes,
                    outcome: None,
                })
                .collect();
            ChartSpec {
                title: PROPORTION_TITLE.to_string(),
                series_name: "Total Success vs Failure for All Sites".to_string(),
                body: ChartBody::Proportion { slices },
            }
        }
        SiteSelector::Site(name) => {
            let counts = aggregate_single_site(filter_by_site(table, site));
            ChartSpec {
                title: format!("{PROPORTION_TITLE} ({name})"),
                series_name: format!("Success vs Failure for {name}"),
                body: ChartBody::Proportion {
                    slices: vec![
                        Slice {
                            label: LaunchOutcome::Success.to_string(),
                            value: counts.successes,
                            outcome: Some(LaunchOutcome::Success),
                        },
                        Slice {
                            label: LaunchOutcome::Failure.to_string(),
                            value: counts.failures,
                            outcome: Some(LaunchOutcome::Failure),
                        },
                    ],
                },
            }
        }
    }
}

/// Payload vs outcome scatter over the site- and payload-filtered rows.
pub fn build_scatter_chart(selection: &FilterSelection, table: &LaunchTable) -> ChartSpec {
    let points = filter_launches(table, selection)
        .into_iter()
        .map(|rec| ScatterPoint {
            x: rec.payload_mass_kg,
            y: rec.outcome.class(),
            label: rec.launch_site.clone(),
            category: rec.booster_category.clone(),
        })
        .collect();

    ChartSpec {
        title: format!(
            "Payload Mass vs Success/Failure ({})",
            selection.site.label()
        ),
        series_name: selection.site.label().to_string(),
        body: ChartBody::Scatter {
            points,
            x_axis_title: PAYLOAD_AXIS_TITLE.to_string(),
            y_axis_title: CLASS_AXIS_TITLE.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write chart specs as pretty-printed JSON.
pub fn export_json(charts: &[&ChartSpec], path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(charts).context("serialising charts")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} charts to {}", charts.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchOutcome::{Failure, Success};
    use crate::data::model::{LaunchRecord, PayloadRange};

    fn scenario_table() -> LaunchTable {
        LaunchTable::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, Success),
            LaunchRecord::new("CCAFS LC-40", 2000.0, Failure),
            LaunchRecord::new("KSC LC-39A", 3000.0, Success),
        ])
        .unwrap()
    }

    fn slices(chart: &ChartSpec) -> Vec<(&str, usize)> {
        match &chart.body {
            ChartBody::Proportion { slices } => {
                slices.iter().map(|s| (s.label.as_str(), s.value)).collect()
            }
            other => panic!("expected proportion chart, got {other:?}"),
        }
    }

    fn points(chart: &ChartSpec) -> Vec<(f64, u8)> {
        match &chart.body {
            ChartBody::Scatter { points, .. } => points.iter().map(|p| (p.x, p.y)).collect(),
            other => panic!("expected scatter chart, got {other:?}"),
        }
    }

    #[test]
    fn proportion_all_sites_uses_site_success_counts() {
        let chart = build_proportion_chart(&SiteSelector::All, &scenario_table());
        assert_eq!(chart.title, PROPORTION_TITLE);
        assert_eq!(slices(&chart), vec![("CCAFS LC-40", 1), ("KSC LC-39A", 1)]);
    }

    #[test]
    fn proportion_single_site_splits_outcomes() {
        let site = SiteSelector::parse("CCAFS LC-40");
        let chart = build_proportion_chart(&site, &scenario_table());
        assert!(chart.title.contains("CCAFS LC-40"));
        assert_eq!(slices(&chart), vec![("Success", 1), ("Failure", 1)]);
        match &chart.body {
            ChartBody::Proportion { slices } => {
                assert_eq!(slices[0].outcome, Some(LaunchOutcome::Success));
                assert_eq!(slices[1].outcome, Some(LaunchOutcome::Failure));
            }
            other => panic!("expected proportion chart, got {other:?}"),
        }
    }

    #[test]
    fn all_sites_slices_carry_no_outcome() {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("Success", 500.0, Success),
            LaunchRecord::new("KSC LC-39A", 3000.0, Success),
        ])
        .unwrap();
        let chart = build_proportion_chart(&SiteSelector::All, &table);
        match &chart.body {
            ChartBody::Proportion { slices } => {
                assert_eq!(slices[0].label, "Success");
                assert!(slices.iter().all(|s| s.outcome.is_none()));
            }
            other => panic!("expected proportion chart, got {other:?}"),
        }
    }

    #[test]
    fn scatter_excludes_rows_outside_payload_range() {
        let selection = FilterSelection {
            site: SiteSelector::All,
            payload_range: PayloadRange::new(1000.0, 3000.0),
        };
        let chart = build_scatter_chart(&selection, &scenario_table());

        assert_eq!(points(&chart), vec![(2000.0, 0), (3000.0, 1)]);
        assert_eq!(chart.title, "Payload Mass vs Success/Failure (All Sites)");
        match &chart.body {
            ChartBody::Scatter { points, x_axis_title, y_axis_title } => {
                assert_eq!(x_axis_title, PAYLOAD_AXIS_TITLE);
                assert_eq!(y_axis_title, CLASS_AXIS_TITLE);
                assert_eq!(points[1].label, "KSC LC-39A");
            }
            other => panic!("expected scatter chart, got {other:?}"),
        }
    }

    #[test]
    fn site_without_rows_gives_empty_charts() {
        let table = scenario_table();
        let site = SiteSelector::parse("VAFB SLC-4E");

        let pie = build_proportion_chart(&site, &table);
        assert_eq!(slices(&pie), vec![("Success", 0), ("Failure", 0)]);
        assert!(pie.is_empty());

        let selection = FilterSelection {
            site,
            payload_range: table.payload_bounds(),
        };
        let scatter = build_scatter_chart(&selection, &table);
        assert!(points(&scatter).is_empty());
        assert!(scatter.is_empty());
        assert!(scatter.title.contains("VAFB SLC-4E"));
    }

    #[test]
    fn scatter_is_idempotent() {
        let table = scenario_table();
        let selection = FilterSelection::initial(&table);
        assert_eq!(
            build_scatter_chart(&selection, &table),
            build_scatter_chart(&selection, &table)
        );
    }

    #[test]
    fn chart_spec_serialises_with_kind_tag() {
        let chart = build_proportion_chart(&SiteSelector::All, &scenario_table());
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "proportion");
        assert_eq!(json["slices"][0]["label"], "CCAFS LC-40");
        assert_eq!(json["title"], PROPORTION_TITLE);
    }

    #[test]
    fn export_writes_both_charts() {
        let table = scenario_table();
        let pie = build_proportion_chart(&SiteSelector::All, &table);
        let scatter = build_scatter_chart(&FilterSelection::initial(&table), &table);
        let path = std::env::temp_dir().join(format!("launch-dash-{}-charts.json", std::process::id()));

        export_json(&[&pie, &scatter], &path).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(written.as_array().map(Vec::len), Some(2));
        assert_eq!(written[1]["kind"], "scatter");
        assert_eq!(written[1]["points"].as_array().map(Vec::len), Some(3));
    }
}
