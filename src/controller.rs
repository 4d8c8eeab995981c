use std::sync::Arc;

use crate::chart::{build_proportion_chart, build_scatter_chart, ChartSpec};
use crate::data::model::{FilterSelection, LaunchTable, PayloadRange, SiteSelector};

// ---------------------------------------------------------------------------
// Control events
// ---------------------------------------------------------------------------

/// A change emitted by one of the two controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SiteChanged(SiteSelector),
    PayloadRangeChanged(PayloadRange),
}

/// Chart outputs to replace after an event. `None` leaves that output as is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartUpdate {
    pub proportion: Option<ChartSpec>,
    pub scatter: Option<ChartSpec>,
}

// ---------------------------------------------------------------------------
// ReactiveController
// ---------------------------------------------------------------------------

/// Maps control events to freshly derived charts.
///
/// Holds only the shared, immutable table; every call derives its output
/// from the selection passed in, so concurrent callers need no locking.
#[derive(Debug, Clone)]
pub struct ReactiveController {
    table: Arc<LaunchTable>,
}

impl ReactiveController {
    pub fn new(table: Arc<LaunchTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LaunchTable {
        &self.table
    }

    /// Apply `event` to `current` and return the new selection together with
    /// the outputs it invalidates.
    ///
    /// * site change    → proportion and scatter are rebuilt
    /// * payload change → scatter only; the range is clamped to the table bounds
    pub fn handle(
        &self,
        current: &FilterSelection,
        event: ControlEvent,
    ) -> (FilterSelection, ChartUpdate) {
        log::debug!("control event: {event:?}");
        match event {
            ControlEvent::SiteChanged(site) => {
                let selection = FilterSelection {
                    site,
                    payload_range: current.payload_range,
                };
                let update = ChartUpdate {
                    proportion: Some(self.proportion_chart(&selection.site)),
                    scatter: Some(self.scatter_chart(&selection)),
                };
                (selection, update)
            }
            ControlEvent::PayloadRangeChanged(range) => {
                let selection = FilterSelection {
                    site: current.site.clone(),
                    payload_range: range.clamp_to(&self.table.payload_bounds()),
                };
                let update = ChartUpdate {
                    proportion: None,
                    scatter: Some(self.scatter_chart(&selection)),
                };
                (selection, update)
            }
        }
    }

    /// Trigger A: proportion chart for the current site.
    pub fn proportion_chart(&self, site: &SiteSelector) -> ChartSpec {
        build_proportion_chart(site, &self.table)
    }

    /// Trigger B: scatter chart for the current site and payload range.
    pub fn scatter_chart(&self, selection: &FilterSelection) -> ChartSpec {
        build_scatter_chart(selection, &self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartBody;
    use crate::data::model::LaunchOutcome::{Failure, Success};
    use crate::data::model::LaunchRecord;

    fn controller() -> ReactiveController {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, Success),
            LaunchRecord::new("CCAFS LC-40", 2000.0, Failure),
            LaunchRecord::new("KSC LC-39A", 3000.0, Success),
        ])
        .unwrap();
        ReactiveController::new(Arc::new(table))
    }

    fn point_count(chart: &ChartSpec) -> usize {
        match &chart.body {
            ChartBody::Scatter { points, .. } => points.len(),
            ChartBody::Proportion { .. } => panic!("expected scatter chart"),
        }
    }

    #[test]
    fn site_change_rebuilds_both_charts() {
        let ctl = controller();
        let initial = FilterSelection::initial(ctl.table());

        let (selection, update) =
            ctl.handle(&initial, ControlEvent::SiteChanged(SiteSelector::parse("KSC LC-39A")));

        assert_eq!(selection.site, SiteSelector::parse("KSC LC-39A"));
        assert_eq!(selection.payload_range, initial.payload_range);
        assert!(update.proportion.is_some());
        assert_eq!(update.scatter.as_ref().map(point_count), Some(1));
    }

    #[test]
    fn payload_change_rebuilds_scatter_only() {
        let ctl = controller();
        let initial = FilterSelection::initial(ctl.table());

        let (selection, update) = ctl.handle(
            &initial,
            ControlEvent::PayloadRangeChanged(PayloadRange::new(1000.0, 3000.0)),
        );

        assert_eq!(selection.site, SiteSelector::All);
        assert!(update.proportion.is_none());
        assert_eq!(update.scatter.as_ref().map(point_count), Some(2));
    }

    #[test]
    fn payload_range_is_clamped_to_table_bounds() {
        let ctl = controller();
        let initial = FilterSelection::initial(ctl.table());

        let (selection, _) = ctl.handle(
            &initial,
            ControlEvent::PayloadRangeChanged(PayloadRange::new(-100.0, 50_000.0)),
        );

        assert_eq!(selection.payload_range, PayloadRange::new(500.0, 3000.0));
    }

    #[test]
    fn same_inputs_yield_same_outputs() {
        let ctl = controller();
        let initial = FilterSelection::initial(ctl.table());
        let event = ControlEvent::SiteChanged(SiteSelector::parse("CCAFS LC-40"));

        assert_eq!(ctl.handle(&initial, event.clone()), ctl.handle(&initial, event));
    }

    #[test]
    fn unknown_site_is_not_an_error() {
        let ctl = controller();
        let initial = FilterSelection::initial(ctl.table());

        let (_, update) =
            ctl.handle(&initial, ControlEvent::SiteChanged(SiteSelector::parse("VAFB SLC-4E")));

        assert!(update.proportion.as_ref().is_some_and(ChartSpec::is_empty));
        assert_eq!(update.scatter.as_ref().map(point_count), Some(0));
    }
}
