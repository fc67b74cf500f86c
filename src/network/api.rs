use std::sync::Arc;

use reqwest::cookie::Jar;
use serde::Deserialize;
use url::Url;

use crate::common::{ReferralCode, StatsSnapshot};
use crate::config::AppConfig;
use crate::error::ApiError;

use super::cookies::lookup_cookie;

/// Backend calls made by the controller.
pub trait ReferralApi: Send + Sync + 'static {
    /// Report a captured referral code.
    fn report_referral(
        &self,
        code: &ReferralCode,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn fetch_stats(&self) -> impl Future<Output = Result<StatsSnapshot, ApiError>> + Send;
}

/// `{"status": "success"}` / `{"status": "error", "message": "..."}`
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl StatusEnvelope {
    fn into_result(self) -> Result<(), ApiError> {
        match self.status.as_deref() {
            Some("error") => Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "unknown error".to_string()),
            )),
            _ => Ok(()),
        }
    }
}

/// Decode a stats body, treating `status: "error"` as a failure.
pub fn parse_stats_body(body: serde_json::Value) -> Result<StatsSnapshot, ApiError> {
    StatusEnvelope::deserialize(&body)?.into_result()?;
    Ok(serde_json::from_value(body)?)
}

pub struct HttpReferralApi {
    client: reqwest::Client,
    jar: Arc<Jar>,
    report_url: Url,
    stats_url: Url,
    csrf_cookie: String,
    csrf_header: String,
}

impl HttpReferralApi {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)?;
        let report_url = base.join(&config.report_path)?;
        let stats_url = base.join(&config.stats_path)?;

        let jar = Arc::new(Jar::default());
        for cookie in &config.cookies {
            jar.add_cookie_str(cookie, &base);
        }

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.request_timeout())
            .build()?;

        log::debug!("Referral API: report={report_url} stats={stats_url}");

        Ok(Self {
            client,
            jar,
            report_url,
            stats_url,
            csrf_cookie: config.csrf_cookie.clone(),
            csrf_header: config.csrf_header.clone(),
        })
    }
}

impl ReferralApi for HttpReferralApi {
    async fn report_referral(&self, code: &ReferralCode) -> Result<(), ApiError> {
        let mut request = self
            .client
            .post(self.report_url.clone())
            .form(&[("referral_code", code.as_str())]);

        match lookup_cookie(&self.jar, &self.report_url, &self.csrf_cookie) {
            Some(token) => request = request.header(self.csrf_header.as_str(), token),
            None => log::debug!("No {} cookie; reporting without token", self.csrf_cookie),
        }

        let response = request.send().await?.error_for_status()?;
        let envelope: StatusEnvelope = response.json().await?;
        envelope.into_result()
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, ApiError> {
        let body: serde_json::Value = self
            .client
            .get(self.stats_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_stats_body(body)
    }
}
