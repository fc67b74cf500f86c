//! In-memory doubles for the backend and the browser.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::Instant;

use crate::common::types::RecentActivity;
use crate::common::{Navigator, ReferralCode, StatsSnapshot};
use crate::error::ApiError;
use crate::network::ReferralApi;

pub fn snapshot(total_referrals: u64, new_referrals: u64) -> StatsSnapshot {
    StatsSnapshot {
        total_referrals,
        total_earnings: "250.00".to_string(),
        current_balance: "80.00".to_string(),
        pending_commissions: 1,
        recent_activity: RecentActivity {
            new_referrals,
            new_commissions: "0.00".to_string(),
        },
    }
}

/// Serves queued stats responses in order; an empty queue is a failure.
#[derive(Default)]
pub struct FakeApi {
    fail_reports: bool,
    reports: Mutex<Vec<String>>,
    stats: Mutex<VecDeque<Result<StatsSnapshot, ApiError>>>,
    stats_calls: AtomicUsize,
}

impl FakeApi {
    pub fn failing_reports() -> Self {
        Self {
            fail_reports: true,
            ..Self::default()
        }
    }

    pub fn with_stats(responses: Vec<Result<StatsSnapshot, ApiError>>) -> Self {
        Self {
            stats: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn reported_codes(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }
}

impl ReferralApi for FakeApi {
    async fn report_referral(&self, code: &ReferralCode) -> Result<(), ApiError> {
        self.reports.lock().unwrap().push(code.to_string());
        if self.fail_reports {
            Err(ApiError::Rejected("report endpoint down".to_string()))
        } else {
            Ok(())
        }
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, ApiError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Rejected("no stats queued".to_string())))
    }
}

/// Records every URL opened, with the (tokio) time it was opened.
#[derive(Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<(String, Instant)>>,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn opened_at(&self) -> Vec<(String, Instant)> {
        self.opened.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open_new_context(&self, url: &str) {
        self.opened
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
    }
}
