use std::sync::Arc;

use crate::chart::ChartSpec;
use crate::color::ColorMap;
use crate::config::{DashboardConfig, KNOWN_SITES};
use crate::controller::{ControlEvent, ReactiveController};
use crate::data::filter::filter_launches;
use crate::data::model::{FilterSelection, LaunchRecord, LaunchTable, SiteSelector};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub controller: ReactiveController,

    /// Current control values.
    pub selection: FilterSelection,

    /// Chart 1: success proportions.
    pub proportion_chart: ChartSpec,

    /// Chart 2: payload vs outcome.
    pub scatter_chart: ChartSpec,

    /// Dropdown entries: `All`, the known sites, then any other site in the table.
    pub site_options: Vec<SiteSelector>,

    /// Slice colours for the all-sites proportion chart.
    pub site_colors: ColorMap,

    /// Scatter point colours by booster category.
    pub category_colors: ColorMap,

    pub payload_step_kg: f64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Arc<LaunchTable>, config: &DashboardConfig) -> Self {
        let controller = ReactiveController::new(table);
        let table = controller.table();
        let selection = FilterSelection::initial(table);

        let site_options = site_options(table);
        let site_colors = ColorMap::new(table.sites().iter().map(String::as_str));
        let category_colors = ColorMap::new(
            table
                .records()
                .iter()
                .filter_map(|rec| rec.booster_category.as_deref()),
        );

        let proportion_chart = controller.proportion_chart(&selection.site);
        let scatter_chart = controller.scatter_chart(&selection);

        let mut state = Self {
            controller,
            selection,
            proportion_chart,
            scatter_chart,
            site_options,
            site_colors,
            category_colors,
            payload_step_kg: config.payload_step_kg,
            status_message: None,
        };
        if config.initial_site != SiteSelector::All {
            state.apply(ControlEvent::SiteChanged(config.initial_site.clone()));
        }
        state
    }

    pub fn table(&self) -> &LaunchTable {
        self.controller.table()
    }

    /// Feed a control change through the controller and replace the charts it
    /// rebuilt.
    pub fn apply(&mut self, event: ControlEvent) {
        let (selection, update) = self.controller.handle(&self.selection, event);
        self.selection = selection;
        if let Some(chart) = update.proportion {
            self.proportion_chart = chart;
        }
        if let Some(chart) = update.scatter {
            self.scatter_chart = chart;
        }
    }

    /// Rows currently plotted on the scatter chart.
    pub fn visible_records(&self) -> Vec<&LaunchRecord> {
        filter_launches(self.table(), &self.selection)
    }
}

fn site_options(table: &LaunchTable) -> Vec<SiteSelector> {
    let mut options = vec![SiteSelector::All];
    let extra = table
        .sites()
        .iter()
        .map(String::as_str)
        .filter(|site| !KNOWN_SITES.contains(site));
    for site in KNOWN_SITES.into_iter().chain(extra) {
        options.push(SiteSelector::Site(site.to_string()));
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PAYLOAD_STEP_KG;
    use crate::data::model::LaunchOutcome::{Failure, Success};
    use crate::data::model::PayloadRange;
    use std::path::PathBuf;

    fn config(initial_site: SiteSelector) -> DashboardConfig {
        DashboardConfig {
            data_path: PathBuf::from("unused.csv"),
            payload_step_kg: DEFAULT_PAYLOAD_STEP_KG,
            initial_site,
            window_size: [800.0, 600.0],
        }
    }

    fn table() -> Arc<LaunchTable> {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, Success),
            LaunchRecord::new("CCAFS LC-40", 2000.0, Failure),
            LaunchRecord::new("KSC LC-39A", 3000.0, Success),
            LaunchRecord::new("Kwajalein", 180.0, Failure),
        ])
        .unwrap();
        Arc::new(table)
    }

    fn state() -> AppState {
        AppState::new(table(), &config(SiteSelector::All))
    }

    #[test]
    fn site_options_list_known_then_extra_sites() {
        let state = state();
        let values: Vec<&str> = state.site_options.iter().map(SiteSelector::label).collect();
        assert_eq!(
            values,
            vec!["All Sites", "CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40", "Kwajalein"]
        );
    }

    #[test]
    fn initial_site_is_applied_on_startup() {
        let state = AppState::new(table(), &config(SiteSelector::parse("CCAFS LC-40")));
        assert_eq!(state.selection.site, SiteSelector::parse("CCAFS LC-40"));
        assert!(state.proportion_chart.title.contains("CCAFS LC-40"));
        assert_eq!(state.visible_records().len(), 2);
    }

    #[test]
    fn payload_event_keeps_proportion_chart() {
        let mut state = state();
        let before = state.proportion_chart.clone();

        state.apply(ControlEvent::PayloadRangeChanged(PayloadRange::new(1000.0, 3000.0)));

        assert_eq!(state.proportion_chart, before);
        assert_eq!(state.visible_records().len(), 2);
    }

    #[test]
    fn site_event_replaces_both_charts() {
        let mut state = state();
        state.apply(ControlEvent::SiteChanged(SiteSelector::parse("KSC LC-39A")));

        assert!(state.proportion_chart.title.contains("KSC LC-39A"));
        assert!(state.scatter_chart.title.contains("KSC LC-39A"));
        assert_eq!(state.visible_records().len(), 1);
    }
}
