use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::common::{Navigator, PageView};

use super::notify::Severity;

/// Gap between consecutive direct messages in a bulk send.
pub const BULK_STAGGER: Duration = Duration::from_secs(1);

pub const DEFAULT_BULK_MESSAGE: &str =
    "Hey! Join SurveyEarn and earn money by completing simple surveys. Sign up with my link:";

const DIRECT_MESSAGE_TEMPLATE: &str = "https://wa.me/{phone}?text={text}";
const QR_CODE_TEMPLATE: &str = "https://api.qrserver.com/v1/create-qr-code/?size=250x250&data={url}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareTarget {
    WhatsApp,
    Twitter,
    Facebook,
    Sms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTarget(pub String);

impl fmt::Display for UnknownTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown share target: {}", self.0)
    }
}

impl std::error::Error for UnknownTarget {}

impl FromStr for ShareTarget {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(ShareTarget::WhatsApp),
            "twitter" => Ok(ShareTarget::Twitter),
            "facebook" => Ok(ShareTarget::Facebook),
            "sms" => Ok(ShareTarget::Sms),
            other => Err(UnknownTarget(other.to_string())),
        }
    }
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::WhatsApp,
        ShareTarget::Twitter,
        ShareTarget::Facebook,
        ShareTarget::Sms,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "whatsapp",
            ShareTarget::Twitter => "twitter",
            ShareTarget::Facebook => "facebook",
            ShareTarget::Sms => "sms",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::Twitter => "Twitter",
            ShareTarget::Facebook => "Facebook",
            ShareTarget::Sms => "SMS",
        }
    }

    /// `{text}` is the encoded message with link, `{url}` the encoded link alone.
    pub fn url_template(self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "https://wa.me/?text={text}",
            ShareTarget::Twitter => "https://twitter.com/intent/tweet?text={text}",
            ShareTarget::Facebook => "https://www.facebook.com/sharer/sharer.php?u={url}&quote={text}",
            ShareTarget::Sms => "sms:?body={text}",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => {
                "Join me on SurveyEarn and get paid for sharing your opinion! Sign up here:"
            }
            ShareTarget::Twitter => "I'm earning money with surveys on SurveyEarn. Join me:",
            ShareTarget::Facebook => "Earn money by completing surveys on SurveyEarn!",
            ShareTarget::Sms => "Join SurveyEarn and earn from surveys:",
        }
    }
}

pub fn compose_message(template: &str, link: &str) -> String {
    format!("{template} {link}")
}

/// Share intent URL for one platform. An empty template falls back to the
/// platform's default message.
pub fn share_url(target: ShareTarget, template: &str, link: &str) -> String {
    let template = if template.trim().is_empty() {
        target.default_message()
    } else {
        template
    };
    let text = urlencoding::encode(&compose_message(template, link)).into_owned();
    target
        .url_template()
        .replace("{url}", &urlencoding::encode(link))
        .replace("{text}", &text)
}

pub fn direct_message_url(phone: &str, text: &str) -> String {
    DIRECT_MESSAGE_TEMPLATE
        .replace("{phone}", &urlencoding::encode(phone))
        .replace("{text}", &urlencoding::encode(text))
}

pub fn qr_code_url(link: &str) -> String {
    QR_CODE_TEMPLATE.replace("{url}", &urlencoding::encode(link))
}

/// `<site>/?ref=<code>` with exactly one slash before the query.
pub fn referral_link(site_url: &str, code: &str) -> String {
    format!(
        "{}/?ref={}",
        site_url.trim_end_matches('/'),
        urlencoding::encode(code)
    )
}

/// Tracked invite links for one campaign, numbered by batch.
pub fn campaign_links(site_url: &str, code: &str, campaign: &str, count: usize) -> Vec<String> {
    let base = referral_link(site_url, code);
    let campaign = if campaign.trim().is_empty() {
        "general"
    } else {
        campaign.trim()
    };
    (0..count)
        .map(|batch| format!("{base}&campaign={}&batch={batch}", urlencoding::encode(campaign)))
        .collect()
}

/// Open a share intent. Unknown targets do nothing.
pub fn share_with_custom_message(
    navigator: &dyn Navigator,
    target: &str,
    template: &str,
    link: &str,
) {
    match target.parse::<ShareTarget>() {
        Ok(target) => navigator.open_new_context(&share_url(target, template, link)),
        Err(err) => log::debug!("Ignoring share request: {err}"),
    }
}

/// One line per recipient; blank lines dropped, order kept.
pub fn parse_recipients(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDispatch {
    pub delay: Duration,
    pub url: String,
}

/// Recipient `i` is sent at `i * BULK_STAGGER`.
pub fn plan_bulk_dispatch(recipients: &[String], message: &str, link: &str) -> Vec<ScheduledDispatch> {
    let message = if message.trim().is_empty() {
        DEFAULT_BULK_MESSAGE
    } else {
        message
    };
    let text = compose_message(message, link);

    recipients
        .iter()
        .enumerate()
        .map(|(index, phone)| ScheduledDispatch {
            delay: BULK_STAGGER * index as u32,
            url: direct_message_url(phone, &text),
        })
        .collect()
}

/// Schedule one direct message per recipient, then close the dialog and
/// report that the batch was queued. Delivery is not tracked.
pub fn send_bulk_messages(
    navigator: Arc<dyn Navigator>,
    page: &dyn PageView,
    recipients: &str,
    message: &str,
    link: &str,
) -> Vec<JoinHandle<()>> {
    let recipients = parse_recipients(recipients);
    if recipients.is_empty() {
        page.notify("Please enter at least one phone number", Severity::Error);
        return Vec::new();
    }

    let handles: Vec<_> = plan_bulk_dispatch(&recipients, message, link)
        .into_iter()
        .map(|dispatch| {
            let navigator = Arc::clone(&navigator);
            tokio::spawn(async move {
                tokio::time::sleep(dispatch.delay).await;
                navigator.open_new_context(&dispatch.url);
            })
        })
        .collect();

    log::info!("Queued {} direct message(s)", handles.len());
    page.close_bulk_dialog();
    page.notify(
        &format!("{} messages queued for sending", handles.len()),
        Severity::Success,
    );
    handles
}
