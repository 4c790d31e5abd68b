//! Runtime settings: endpoint URLs and logging.
//!
//! Values come from the environment (optionally via `.env`) and are then
//! overridden by command-line flags.

use std::path::PathBuf;

use crate::quote::http::DEFAULT_PRICING_URL;

pub const ENV_PRICING_URL: &str = "DIAMOND_PRICING_URL";
pub const ENV_FORM_URL: &str = "DIAMOND_FORM_URL";
pub const ENV_LOG_FILTER: &str = "DIAMOND_LOG";

pub const DEFAULT_FORM_URL: &str = "/custom-quote";
pub const DEFAULT_LOG_FILE: &str = "diamond.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pricing_url: String,
    pub form_url: String,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pricing_url: DEFAULT_PRICING_URL.to_string(),
            form_url: DEFAULT_FORM_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Defaults, then `.env` / process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(url) = lookup(ENV_PRICING_URL).filter(|v| !v.trim().is_empty()) {
            settings.pricing_url = url.trim().to_string();
        }
        if let Some(url) = lookup(ENV_FORM_URL).filter(|v| !v.trim().is_empty()) {
            settings.form_url = url.trim().to_string();
        }
        settings
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        pricing_url: Option<&str>,
        form_url: Option<&str>,
        log_file: Option<&PathBuf>,
    ) -> Self {
        if let Some(url) = pricing_url {
            self.pricing_url = url.to_string();
        }
        if let Some(url) = form_url {
            self.form_url = url.to_string();
        }
        if let Some(path) = log_file {
            self.log_file = path.clone();
        }
        self
    }
}
