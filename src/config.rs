use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::referral::poller::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_CONFIG_PATH: &str = "config/referral.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Site root; endpoint paths and the referral link are built on it.
    pub base_url: String,
    /// URL of the page this controller is bootstrapped for.
    pub page_url: String,
    pub report_path: String,
    pub stats_path: String,
    /// Query parameter carrying the referral code.
    pub referral_param: String,
    /// Regex matched against the page path; stats polling only runs on a match.
    pub referrals_page_pattern: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub csrf_cookie: String,
    pub csrf_header: String,
    /// `name=value` cookies seeded into the HTTP cookie jar (session, csrftoken).
    pub cookies: Vec<String>,
    /// The signed-in user's own code, used to build the share link.
    pub referral_code: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            page_url: "http://localhost:8000/accounts/referrals/".to_string(),
            report_path: "/api/track-referral/".to_string(),
            stats_path: "/accounts/api/referral-stats/".to_string(),
            referral_param: "ref".to_string(),
            referrals_page_pattern: "^/accounts/referrals".to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            request_timeout_secs: 10,
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            cookies: Vec::new(),
            referral_code: None,
        }
    }
}

impl AppConfig {
    /// Per-request timeout, never below 1s.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    let mut config = match fs::read_to_string(path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|err| {
            log::warn!("Failed to parse config file {}: {err}", path.display());
            AppConfig::default()
        }),
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    };

    apply_overrides(&mut config, |key| env::var(key).ok());
    config
}

pub fn parse_config(content: &str) -> serde_json::Result<AppConfig> {
    serde_json::from_str(content)
}

/// Environment overrides, read after `.env` has been loaded.
pub fn apply_overrides(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(base_url) = var("REFERRAL_BASE_URL") {
        log::info!("Using REFERRAL_BASE_URL={base_url}");
        config.base_url = base_url;
    }
    if let Some(cookies) = var("REFERRAL_COOKIES") {
        config.cookies = cookies
            .split(';')
            .map(str::trim)
            .filter(|cookie| !cookie.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(code) = var("REFERRAL_CODE") {
        config.referral_code = Some(code);
    }
}
