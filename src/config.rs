use crate::models::DateFormat;
use std::env;
use tracing::warn;

pub const SEED_DEMO_VAR: &str = "CLINICDESK_SEED_DEMO";
pub const DATE_FORMAT_VAR: &str = "CLINICDESK_DATE_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub seed_demo_data: bool,
    pub date_format: DateFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            date_format: DateFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys use defaults; invalid
    /// values are reported and fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed_demo_data = match lookup(SEED_DEMO_VAR) {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warn!("{} has invalid value '{}', using default", SEED_DEMO_VAR, raw);
                defaults.seed_demo_data
            }),
            None => defaults.seed_demo_data,
        };

        let date_format = match lookup(DATE_FORMAT_VAR) {
            Some(raw) => raw.parse::<DateFormat>().unwrap_or_else(|e: String| {
                warn!("{}: {}, using default", DATE_FORMAT_VAR, e);
                defaults.date_format
            }),
            None => defaults.date_format,
        };

        Self {
            seed_demo_data,
            date_format,
        }
    }

    /// Let command-line flags take precedence over the environment.
    pub fn apply_overrides(mut self, no_seed: bool, date_format: Option<DateFormat>) -> Self {
        if no_seed {
            self.seed_demo_data = false;
        }
        if let Some(date_format) = date_format {
            self.date_format = date_format;
        }
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
