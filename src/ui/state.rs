use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::common::{Navigator, PageView, ReferralCode};
use crate::referral::notify::{Notification, Severity};
use crate::referral::poller::StatField;

/// Text shown in a stat element before the first successful poll.
pub const PLACEHOLDER: &str = "—";

/// Một phần tử hiển thị số liệu trên trang.
#[derive(Debug, Clone)]
pub struct StatElement {
    pub text: String,
    pub highlighted_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct BulkDialog {
    pub open: bool,
    pub recipients: String,
    pub message: String,
}

/// Trạng thái cục bộ của trang (thay cho DOM).
#[derive(Debug, Default)]
pub struct PageState {
    pub banner: Option<ReferralCode>,
    banner_rendered: bool,
    pub elements: HashMap<String, StatElement>,
    pub notifications: Vec<Notification>,
    pub bulk_dialog: BulkDialog,
    pub share_message: String,
    pub campaign: String,
    pub campaign_links: Vec<String>,
    /// URLs the controller asked to open; drained by the UI each frame.
    pub pending_navigations: Vec<String>,
}

impl PageState {
    /// Register the stat elements a referrals page carries.
    pub fn add_stat_elements(&mut self) {
        for field in StatField::ALL {
            self.elements.insert(
                field.element_id().to_string(),
                StatElement {
                    text: PLACEHOLDER.to_string(),
                    highlighted_until: None,
                },
            );
        }
    }

    pub fn text_of(&self, element: &str) -> Option<String> {
        self.elements.get(element).map(|el| el.text.clone())
    }

    pub fn is_highlighted(&self, element: &str, now: DateTime<Utc>) -> bool {
        self.elements
            .get(element)
            .and_then(|el| el.highlighted_until)
            .is_some_and(|until| now < until)
    }

    pub fn show_banner(&mut self, code: &ReferralCode) {
        if self.banner_rendered {
            return;
        }
        self.banner_rendered = true;
        self.banner = Some(code.clone());
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn prune_notifications(&mut self, now: DateTime<Utc>) {
        self.notifications.retain(|toast| !toast.is_expired(now));
    }

    pub fn take_navigations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_navigations)
    }
}

/// Page state shared between the egui window and the controller tasks.
#[derive(Clone, Default)]
pub struct SharedPage(Arc<Mutex<PageState>>);

impl SharedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stat_elements() -> Self {
        let page = Self::new();
        page.lock().add_stat_elements();
        page
    }

    pub fn lock(&self) -> MutexGuard<'_, PageState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageView for SharedPage {
    fn element_text(&self, element: &str) -> Option<String> {
        self.lock().text_of(element)
    }

    fn set_element_text(&self, element: &str, text: &str) {
        if let Some(el) = self.lock().elements.get_mut(element) {
            el.text = text.to_string();
        }
    }

    fn highlight(&self, element: &str, duration: Duration) {
        let until = Utc::now() + TimeDelta::from_std(duration).unwrap_or(TimeDelta::zero());
        if let Some(el) = self.lock().elements.get_mut(element) {
            el.highlighted_until = Some(until);
        }
    }

    fn show_banner(&self, code: &ReferralCode) {
        self.lock().show_banner(code);
    }

    fn notify(&self, message: &str, severity: Severity) {
        log::debug!("Notification ({severity:?}): {message}");
        self.lock()
            .push_notification(Notification::new(message, severity));
    }

    fn close_bulk_dialog(&self) {
        let mut state = self.lock();
        state.bulk_dialog.open = false;
        state.bulk_dialog.recipients.clear();
    }
}

impl Navigator for SharedPage {
    fn open_new_context(&self, url: &str) {
        self.lock().pending_navigations.push(url.to_string());
    }
}
