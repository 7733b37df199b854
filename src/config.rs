//! Resource-level configuration.

use crate::calendar::{resolve_zone, WeekStart};
use crate::error::{HutbookError, HutbookResult};
use crate::slots;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How one resource's calendar is observed and gridded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// IANA zone the resource's days and months are interpreted in. All
    /// instants are still stored and compared in UTC.
    pub timezone: String,
    pub slot_interval_minutes: u32,
    pub week_start: WeekStart,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            timezone: "UTC".to_string(),
            slot_interval_minutes: 30,
            week_start: WeekStart::Sunday,
        }
    }
}

impl ResourceConfig {
    pub fn from_toml_str(content: &str) -> HutbookResult<Self> {
        let config: ResourceConfig =
            toml::from_str(content).map_err(|e| HutbookError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the zone and check the interval. Run at load time so a bad
    /// zone identifier or interval fails at startup, not per request.
    pub fn validate(&self) -> HutbookResult<Tz> {
        slots::check_interval(self.slot_interval_minutes)?;
        resolve_zone(&self.timezone)
    }
}
