use std::time::Duration;

use super::types::ReferralCode;
use crate::referral::notify::Severity;

/// The host page as seen by the controller.
///
/// Elements are looked up by id. Every method must tolerate a missing
/// element by doing nothing: a page without stat elements simply has no
/// stats feature.
pub trait PageView: Send + Sync {
    /// Currently rendered text of an element, `None` when the page has no such element.
    fn element_text(&self, element: &str) -> Option<String>;

    fn set_element_text(&self, element: &str, text: &str);

    /// Highlight an element; the highlight reverts on its own after `duration`.
    fn highlight(&self, element: &str, duration: Duration);

    /// Insert the referral banner at the top of the page. Only the first call renders.
    fn show_banner(&self, code: &ReferralCode);

    fn notify(&self, message: &str, severity: Severity);

    fn close_bulk_dialog(&self);
}

/// Opens URLs in a new browsing context. Popup blocking is not observable.
pub trait Navigator: Send + Sync {
    fn open_new_context(&self, url: &str);
}
