use std::fmt;

use serde::Serialize;

/// Selector value meaning "no site filter".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// LaunchOutcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Mission outcome encoded as the dataset's `class` column (1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LaunchOutcome {
    Failure,
    Success,
}

impl LaunchOutcome {
    /// Parse the numeric class value. Only 0 and 1 are accepted.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(LaunchOutcome::Failure),
            1 => Some(LaunchOutcome::Success),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            LaunchOutcome::Failure => 0,
            LaunchOutcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == LaunchOutcome::Success
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchOutcome::Success => write!(f, "Success"),
            LaunchOutcome::Failure => write!(f, "Failure"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: LaunchOutcome,
    /// `Flight Number`, when the source carries it.
    pub flight_number: Option<i64>,
    pub booster_version: Option<String>,
    pub booster_category: Option<String>,
}

impl LaunchRecord {
    /// Row with only the required columns filled in.
    pub fn new(site: impl Into<String>, payload_mass_kg: f64, outcome: LaunchOutcome) -> Self {
        Self {
            launch_site: site.into(),
            payload_mass_kg,
            outcome,
            flight_number: None,
            booster_version: None,
            booster_category: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PayloadRange – inclusive [min, max] payload bounds
// ---------------------------------------------------------------------------

/// Inclusive payload interval in kilograms. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    min: f64,
    max: f64,
}

impl PayloadRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, payload_kg: f64) -> bool {
        self.min <= payload_kg && payload_kg <= self.max
    }

    /// Clamp both ends into `bounds`.
    pub fn clamp_to(&self, bounds: &PayloadRange) -> Self {
        Self::new(
            self.min.clamp(bounds.min, bounds.max),
            self.max.clamp(bounds.min, bounds.max),
        )
    }
}

// ---------------------------------------------------------------------------
// SiteSelector – "ALL" or a specific launch site
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SiteSelector {
    #[default]
    All,
    Site(String),
}

impl SiteSelector {
    /// Interpret a raw control value; `"ALL"` selects every site.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelector::All
        } else {
            SiteSelector::Site(value.to_string())
        }
    }

    /// Human-readable label used in chart titles and the dropdown.
    pub fn label(&self) -> &str {
        match self {
            SiteSelector::All => "All Sites",
            SiteSelector::Site(site) => site,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – current control values
// ---------------------------------------------------------------------------

/// Snapshot of both controls. Re-created on every interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub site: SiteSelector,
    pub payload_range: PayloadRange,
}

impl FilterSelection {
    /// Initial selection: every site, full payload range.
    pub fn initial(table: &LaunchTable) -> Self {
        Self {
            site: SiteSelector::All,
            payload_range: table.payload_bounds(),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in first-seen order.
    sites: Vec<String>,
    payload_bounds: PayloadRange,
}

impl LaunchTable {
    /// Build the table and its derived indices. Returns `None` for an empty
    /// record set, whose payload bounds would be undefined.
    pub fn from_records(records: Vec<LaunchRecord>) -> Option<Self> {
        let first = records.first()?;
        let mut lo = first.payload_mass_kg;
        let mut hi = first.payload_mass_kg;
        let mut sites: Vec<String> = Vec::new();

        for rec in &records {
            lo = lo.min(rec.payload_mass_kg);
            hi = hi.max(rec.payload_mass_kg);
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
        }

        Some(LaunchTable {
            records,
            sites,
            payload_bounds: PayloadRange::new(lo, hi),
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Global min/max of `payload_mass_kg`, used as the range control bounds.
    pub fn payload_bounds(&self) -> PayloadRange {
        self.payload_bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_range_orders_bounds() {
        let range = PayloadRange::new(3000.0, 1000.0);
        assert_eq!(range.min(), 1000.0);
        assert_eq!(range.max(), 3000.0);
        assert!(range.contains(1000.0));
        assert!(range.contains(3000.0));
        assert!(!range.contains(3000.5));
    }

    #[test]
    fn payload_range_clamps_into_bounds() {
        let bounds = PayloadRange::new(0.0, 9600.0);
        let clamped = PayloadRange::new(-500.0, 12_000.0).clamp_to(&bounds);
        assert_eq!(clamped, bounds);
    }

    #[test]
    fn table_derives_bounds_and_first_seen_sites() {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 3000.0, LaunchOutcome::Success),
            LaunchRecord::new("CCAFS LC-40", 500.0, LaunchOutcome::Success),
            LaunchRecord::new("KSC LC-39A", 5300.0, LaunchOutcome::Failure),
        ])
        .unwrap();

        assert_eq!(table.sites(), &["KSC LC-39A", "CCAFS LC-40"]);
        assert_eq!(table.payload_bounds(), PayloadRange::new(500.0, 5300.0));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(LaunchTable::from_records(Vec::new()).is_none());
    }

    #[test]
    fn site_selector_parses_control_value() {
        assert_eq!(SiteSelector::parse("ALL"), SiteSelector::All);
        let site = SiteSelector::parse("VAFB SLC-4E");
        assert_eq!(site, SiteSelector::Site("VAFB SLC-4E".to_string()));
        assert_eq!(site.label(), "VAFB SLC-4E");
        assert_eq!(SiteSelector::All.label(), "All Sites");
    }
}
