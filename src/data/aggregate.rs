use serde::Serialize;

use super::model::{LaunchRecord, LaunchTable};

/// Success count for one launch site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSuccess {
    pub site: String,
    pub successes: usize,
}

/// Success / failure tally over a row subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub successes: usize,
    pub failures: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.successes + self.failures
    }
}

/// Successful launches per site, grouped in first-seen site order.
pub fn aggregate_all_sites(table: &LaunchTable) -> Vec<SiteSuccess> {
    table
        .sites()
        .iter()
        .map(|site| SiteSuccess {
            site: site.clone(),
            successes: table
                .records()
                .iter()
                .filter(|rec| rec.launch_site == *site && rec.outcome.is_success())
                .count(),
        })
        .collect()
}

/// Tally outcomes over a site-filtered subset.
pub fn aggregate_single_site<'a, I>(rows: I) -> OutcomeCounts
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    rows.into_iter()
        .fold(OutcomeCounts::default(), |mut counts, rec| {
            if rec.outcome.is_success() {
                counts.successes += 1;
            } else {
                counts.failures += 1;
            }
            counts
        })
}
