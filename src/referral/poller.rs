use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::common::{PageView, StatsSnapshot};
use crate::network::ReferralApi;

use super::notify::Severity;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// How long an updated stat stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(1);
pub const CURRENCY_SYMBOL: &str = "KSh";

/// Snapshot fields that have a display element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    TotalReferrals,
    TotalEarnings,
    CurrentBalance,
    PendingCommissions,
}

impl StatField {
    pub const ALL: [StatField; 4] = [
        StatField::TotalReferrals,
        StatField::TotalEarnings,
        StatField::CurrentBalance,
        StatField::PendingCommissions,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            StatField::TotalReferrals => "total-referrals",
            StatField::TotalEarnings => "total-earnings",
            StatField::CurrentBalance => "current-balance",
            StatField::PendingCommissions => "pending-commissions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatField::TotalReferrals => "Total referrals",
            StatField::TotalEarnings => "Referral earnings",
            StatField::CurrentBalance => "Current balance",
            StatField::PendingCommissions => "Pending commissions",
        }
    }

    /// Text the element should show for this snapshot.
    pub fn render(self, snapshot: &StatsSnapshot) -> String {
        match self {
            StatField::TotalReferrals => snapshot.total_referrals.to_string(),
            StatField::TotalEarnings => format!("{CURRENCY_SYMBOL} {}", snapshot.total_earnings),
            StatField::CurrentBalance => format!("{CURRENCY_SYMBOL} {}", snapshot.current_balance),
            StatField::PendingCommissions => snapshot.pending_commissions.to_string(),
        }
    }
}

/// A write the poller wants applied to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatUpdate {
    pub element: &'static str,
    pub text: String,
}

pub fn is_referrals_page(path: &str, pattern: &Regex) -> bool {
    pattern.is_match(path)
}

/// Compare a snapshot against what is rendered. Only elements that exist and
/// whose text differs produce an update.
pub fn diff_snapshot(
    snapshot: &StatsSnapshot,
    rendered: impl Fn(&str) -> Option<String>,
) -> Vec<StatUpdate> {
    StatField::ALL
        .iter()
        .filter_map(|field| {
            let element = field.element_id();
            let current = rendered(element)?;
            let text = field.render(snapshot);
            (current != text).then_some(StatUpdate { element, text })
        })
        .collect()
}

/// Threshold check on this snapshot alone; earlier ticks are not consulted.
pub fn should_notify(snapshot: &StatsSnapshot) -> bool {
    snapshot.recent_activity.new_referrals > 0
}

pub fn new_referrals_message(count: u64) -> String {
    if count == 1 {
        "You have 1 new referral!".to_string()
    } else {
        format!("You have {count} new referrals!")
    }
}

/// Result of a single poll, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Applied { updated: usize, notified: bool },
    Failed,
}

/// Fetch one snapshot and apply it to the page.
pub async fn poll_once<A: ReferralApi>(api: &A, page: &dyn PageView) -> TickOutcome {
    let snapshot = match api.fetch_stats().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!("Failed to refresh referral stats: {err}");
            return TickOutcome::Failed;
        }
    };

    let updates = diff_snapshot(&snapshot, |element| page.element_text(element));
    for update in &updates {
        page.set_element_text(update.element, &update.text);
        page.highlight(update.element, HIGHLIGHT_DURATION);
    }

    let notified = should_notify(&snapshot);
    if notified {
        page.notify(
            &new_referrals_message(snapshot.recent_activity.new_referrals),
            Severity::Success,
        );
    }

    log::debug!("Stats tick: {} element(s) updated", updates.len());
    TickOutcome::Applied {
        updated: updates.len(),
        notified,
    }
}

/// Poll every `period`, first tick one full period from now.
///
/// Each fetch is awaited before the next tick, so fetches never overlap; a
/// slow fetch delays the following tick instead of bursting.
pub fn spawn<A: ReferralApi>(
    api: Arc<A>,
    page: Arc<dyn PageView>,
    period: Duration,
) -> JoinHandle<()> {
    log::info!("Starting referral stats poller every {}s", period.as_secs());
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            poll_once(api.as_ref(), page.as_ref()).await;
        }
    })
}
