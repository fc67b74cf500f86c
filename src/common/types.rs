use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Mã giới thiệu lấy từ query string. Không kiểm tra định dạng: backend quyết định.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One fetch of the referral statistics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_referrals: u64,
    #[serde(deserialize_with = "amount_text")]
    pub total_earnings: String,
    #[serde(deserialize_with = "amount_text")]
    pub current_balance: String,
    pub pending_commissions: u64,
    #[serde(default)]
    pub recent_activity: RecentActivity,
}

/// Activity over the last 24 hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    #[serde(default)]
    pub new_referrals: u64,
    #[serde(default = "zero_amount", deserialize_with = "amount_text")]
    pub new_commissions: String,
}

impl Default for RecentActivity {
    fn default() -> Self {
        Self {
            new_referrals: 0,
            new_commissions: zero_amount(),
        }
    }
}

fn zero_amount() -> String {
    "0.00".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

/// Currency amounts are serialized as decimal strings by the backend, but
/// plain JSON numbers are accepted too.
fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(text) => text,
        RawAmount::Number(number) => number.to_string(),
    })
}
