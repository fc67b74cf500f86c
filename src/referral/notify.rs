use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// How long a toast stays fully visible.
pub const VISIBLE_FOR: Duration = Duration::from_secs(4);
/// Slide-in and slide-out animation length.
pub const SLIDE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

/// Where a toast is in its lifetime. Progress values run from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Entering(f32),
    Visible,
    Leaving(f32),
    Expired,
}

/// A self-dismissing toast. Toasts are independent of each other: no
/// coalescing, no queueing, they may overlap on screen.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self::at(message, severity, Utc::now())
    }

    pub fn at(message: impl Into<String>, severity: Severity, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            created_at,
        }
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> Phase {
        // Clock going backwards counts as "just created".
        let elapsed = now
            .signed_duration_since(self.created_at)
            .to_std()
            .unwrap_or_default();

        let leaving_at = SLIDE_DURATION + VISIBLE_FOR;
        if elapsed < SLIDE_DURATION {
            Phase::Entering(progress(elapsed, SLIDE_DURATION))
        } else if elapsed < leaving_at {
            Phase::Visible
        } else if elapsed < leaving_at + SLIDE_DURATION {
            Phase::Leaving(progress(elapsed - leaving_at, SLIDE_DURATION))
        } else {
            Phase::Expired
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == Phase::Expired
    }
}

fn progress(elapsed: Duration, total: Duration) -> f32 {
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn toast_goes_through_every_phase() {
        let start = Utc::now();
        let toast = Notification::at("hello", Severity::Info, start);

        assert_eq!(toast.phase_at(start), Phase::Entering(0.0));
        match toast.phase_at(start + TimeDelta::milliseconds(150)) {
            Phase::Entering(progress) => assert!((progress - 0.5).abs() < 1e-3),
            other => panic!("expected entering, got {other:?}"),
        }
        assert_eq!(toast.phase_at(start + TimeDelta::seconds(2)), Phase::Visible);
        assert_eq!(
            toast.phase_at(start + TimeDelta::milliseconds(4300)),
            Phase::Leaving(0.0)
        );
        assert!(toast.is_expired(start + TimeDelta::milliseconds(4600)));
    }

    #[test]
    fn default_severity_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn toasts_are_distinct_even_with_same_text() {
        let a = Notification::new("Messages queued", Severity::Success);
        let b = Notification::new("Messages queued", Severity::Success);
        assert_ne!(a.id, b.id);
    }
}
