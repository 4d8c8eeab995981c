use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::data::model::SiteSelector;

pub const DATA_ENV: &str = "LAUNCH_DASH_DATA";
pub const PAYLOAD_STEP_ENV: &str = "LAUNCH_DASH_PAYLOAD_STEP";
pub const SITE_ENV: &str = "LAUNCH_DASH_SITE";
pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";
pub const DEFAULT_PAYLOAD_STEP_KG: f64 = 1000.0;

/// Launch sites always offered by the site dropdown, even when the dataset
/// holds no rows for them.
pub const KNOWN_SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Launch table to load at startup.
    pub data_path: PathBuf,
    /// Slider step of the payload range control.
    pub payload_step_kg: f64,
    /// Site selected when the window opens.
    pub initial_site: SiteSelector,
    pub window_size: [f32; 2],
}

impl DashboardConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Resolution order for the data path: first positional argument,
    /// then `LAUNCH_DASH_DATA`, then `spacex_launch_dash.csv`.
    pub fn resolve<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let data_path = args
            .into_iter()
            .find(|arg| !arg.starts_with('-'))
            .or_else(|| env(DATA_ENV))
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

        let payload_step_kg = match env(PAYLOAD_STEP_ENV) {
            Some(raw) => {
                let step: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{PAYLOAD_STEP_ENV}='{raw}' is not a number"))?;
                if !(step.is_finite() && step > 0.0) {
                    bail!("{PAYLOAD_STEP_ENV} must be a positive number, got {step}");
                }
                step
            }
            None => DEFAULT_PAYLOAD_STEP_KG,
        };

        let initial_site = env(SITE_ENV)
            .map(|raw| SiteSelector::parse(raw.trim()))
            .unwrap_or_default();

        Ok(Self {
            data_path: PathBuf::from(data_path),
            payload_step_kg,
            initial_site,
            window_size: [1200.0, 900.0],
        })
    }
}
