use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use crate::common::{PageView, ReferralCode};
use crate::network::ReferralApi;

/// Read the referral code from the page URL. A present but empty parameter
/// still counts as a code.
pub fn extract_referral_code(page_url: &Url, param: &str) -> Option<ReferralCode> {
    page_url
        .query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| ReferralCode::new(value.into_owned()))
}

/// Report the code in the background and render the banner.
///
/// The banner does not wait for the report: a failed report is only logged.
/// Returns the report task, or `None` when the URL carries no code.
pub fn capture_referral<A: ReferralApi>(
    page_url: &Url,
    param: &str,
    api: Arc<A>,
    page: &dyn PageView,
) -> Option<JoinHandle<()>> {
    let code = extract_referral_code(page_url, param)?;
    log::info!("Captured referral code {code:?}");

    let report_code = code.clone();
    let report = tokio::spawn(async move {
        match api.report_referral(&report_code).await {
            Ok(()) => log::debug!("Reported referral code {report_code}"),
            Err(err) => log::warn!("Failed to report referral code {report_code}: {err}"),
        }
    });

    page.show_banner(&code);
    Some(report)
}
