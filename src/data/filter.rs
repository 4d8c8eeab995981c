use super::model::{FilterSelection, LaunchRecord, LaunchTable, PayloadRange, SiteSelector};

// ---------------------------------------------------------------------------
// Row predicates: site equality and inclusive payload range
// ---------------------------------------------------------------------------

/// Rows launched from the selected site.
///
/// * `SiteSelector::All` → every row, in table order
/// * a site with no rows (including unknown ids) → empty subset, never an error
pub fn filter_by_site<'a>(table: &'a LaunchTable, site: &SiteSelector) -> Vec<&'a LaunchRecord> {
    match site {
        SiteSelector::All => table.records().iter().collect(),
        SiteSelector::Site(name) => table
            .records()
            .iter()
            .filter(|rec| rec.launch_site == *name)
            .collect(),
    }
}

/// Rows with `min <= payload_mass_kg <= max`.
pub fn filter_by_payload<'a, I>(rows: I, range: &PayloadRange) -> Vec<&'a LaunchRecord>
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    rows.into_iter()
        .filter(|rec| range.contains(rec.payload_mass_kg))
        .collect()
}

/// Site filter followed by payload filter; the row set behind the scatter chart.
pub fn filter_launches<'a>(
    table: &'a LaunchTable,
    selection: &FilterSelection,
) -> Vec<&'a LaunchRecord> {
    filter_by_payload(filter_by_site(table, &selection.site), &selection.payload_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchOutcome::{Failure, Success};

    fn scenario_table() -> LaunchTable {
        LaunchTable::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, Success),
            LaunchRecord::new("CCAFS LC-40", 2000.0, Failure),
            LaunchRecord::new("KSC LC-39A", 3000.0, Success),
        ])
        .unwrap()
    }

    #[test]
    fn all_sites_returns_table_unchanged() {
        let table = scenario_table();
        let rows = filter_by_site(&table, &SiteSelector::All);
        assert_eq!(rows.len(), table.len());
        assert!(rows.iter().zip(table.records()).all(|(a, b)| *a == b));
    }

    #[test]
    fn single_site_keeps_only_matching_rows() {
        let table = scenario_table();
        let rows = filter_by_site(&table, &SiteSelector::parse("CCAFS LC-40"));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.launch_site == "CCAFS LC-40"));
    }

    #[test]
    fn unknown_site_yields_empty_subset() {
        let table = scenario_table();
        assert!(filter_by_site(&table, &SiteSelector::parse("VAFB SLC-4E")).is_empty());
    }

    #[test]
    fn payload_filter_is_inclusive_and_exact() {
        let table = scenario_table();
        let range = PayloadRange::new(500.0, 2000.0);
        let kept = filter_by_payload(table.records(), &range);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| range.contains(r.payload_mass_kg)));
        let mut excluded = table
            .records()
            .iter()
            .filter(|r| !kept.iter().any(|k| std::ptr::eq(*k, *r)));
        assert!(excluded.all(|r| !range.contains(r.payload_mass_kg)));
    }

    #[test]
    fn range_excluding_everything_is_empty() {
        let table = scenario_table();
        let kept = filter_by_payload(table.records(), &PayloadRange::new(4000.0, 5000.0));
        assert!(kept.is_empty());
    }

    #[test]
    fn composed_filter_applies_both_predicates() {
        let table = scenario_table();
        let selection = FilterSelection {
            site: SiteSelector::parse("CCAFS LC-40"),
            payload_range: PayloadRange::new(1000.0, 3000.0),
        };
        let rows = filter_launches(&table, &selection);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payload_mass_kg, 2000.0);
    }
}
