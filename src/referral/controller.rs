use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use crate::common::{Navigator, PageView, ShareCommand};
use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::network::ReferralApi;

use super::{capture, poller, share};

/// Settings the controller needs, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub referral_param: String,
    pub referrals_pattern: Regex,
    pub poll_interval: Duration,
    /// Link shared by the share buttons; `None` when no own code is configured.
    pub referral_link: Option<String>,
}

impl ControllerSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Url::parse(&config.base_url)?;
        Ok(Self {
            referral_param: config.referral_param.clone(),
            referrals_pattern: Regex::new(&config.referrals_page_pattern)?,
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            referral_link: config
                .referral_code
                .as_deref()
                .map(|code| share::referral_link(&config.base_url, code)),
        })
    }
}

/// Per-page controller. Owns every task it starts; [`teardown`](Self::teardown)
/// aborts them, and so does dropping the controller.
pub struct ReferralController<A: ReferralApi> {
    api: Arc<A>,
    page: Arc<dyn PageView>,
    navigator: Arc<dyn Navigator>,
    settings: ControllerSettings,
    command_receiver: mpsc::Receiver<ShareCommand>,
    tasks: Vec<JoinHandle<()>>,
}

impl<A: ReferralApi> ReferralController<A> {
    pub fn new(
        api: Arc<A>,
        page: Arc<dyn PageView>,
        navigator: Arc<dyn Navigator>,
        settings: ControllerSettings,
        command_receiver: mpsc::Receiver<ShareCommand>,
    ) -> Self {
        Self {
            api,
            page,
            navigator,
            settings,
            command_receiver,
            tasks: Vec::new(),
        }
    }

    /// Page-ready hook: capture the referral code, then start polling if this
    /// is a referrals page. Must run inside a tokio runtime.
    pub fn start(&mut self, page_url: &Url) {
        log::info!("Referral controller started for {}", page_url.path());

        if let Some(report) = capture::capture_referral(
            page_url,
            &self.settings.referral_param,
            Arc::clone(&self.api),
            self.page.as_ref(),
        ) {
            self.track(report);
        }

        if poller::is_referrals_page(page_url.path(), &self.settings.referrals_pattern) {
            let handle = poller::spawn(
                Arc::clone(&self.api),
                Arc::clone(&self.page),
                self.settings.poll_interval,
            );
            self.track(handle);
        }
    }

    /// Handle share commands until the UI hangs up, then tear down.
    pub async fn run(mut self) {
        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command);
        }
        log::info!("Command channel closed");
        self.teardown();
    }

    pub fn handle_command(&mut self, command: ShareCommand) {
        let Some(link) = self.settings.referral_link.clone() else {
            log::warn!("No referral code configured; ignoring {command:?}");
            return;
        };

        match command {
            ShareCommand::Share { target, message } => {
                share::share_with_custom_message(self.navigator.as_ref(), &target, &message, &link);
            }
            ShareCommand::SendBulk {
                recipients,
                message,
            } => {
                let handles = share::send_bulk_messages(
                    Arc::clone(&self.navigator),
                    self.page.as_ref(),
                    &recipients,
                    &message,
                    &link,
                );
                for handle in handles {
                    self.track(handle);
                }
            }
            ShareCommand::ShowQrCode => {
                self.navigator.open_new_context(&share::qr_code_url(&link));
            }
        }
    }

    /// Tasks still running (report, poller, pending bulk sends).
    pub fn active_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    pub fn teardown(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        log::info!("Tearing down {} referral task(s)", self.active_tasks());
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(handle);
    }
}

impl<A: ReferralApi> Drop for ReferralController<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, RecordingNavigator, snapshot};
    use crate::ui::SharedPage;

    struct Harness {
        controller: ReferralController<FakeApi>,
        api: Arc<FakeApi>,
        page: SharedPage,
        navigator: Arc<RecordingNavigator>,
        _commands: mpsc::Sender<ShareCommand>,
    }

    fn harness(api: FakeApi, page: SharedPage, referral_code: Option<&str>) -> Harness {
        let config = AppConfig {
            referral_code: referral_code.map(String::from),
            ..AppConfig::default()
        };
        let settings = ControllerSettings::from_config(&config).unwrap();
        let api = Arc::new(api);
        let navigator = Arc::new(RecordingNavigator::default());
        let (tx, rx) = mpsc::channel(8);
        let controller = ReferralController::new(
            Arc::clone(&api),
            Arc::new(page.clone()),
            navigator.clone(),
            settings,
            rx,
        );
        Harness {
            controller,
            api,
            page,
            navigator,
            _commands: tx,
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn settings_build_referral_link() {
        let config = AppConfig {
            referral_code: Some("ABC123".to_string()),
            ..AppConfig::default()
        };
        let settings = ControllerSettings::from_config(&config).unwrap();
        assert_eq!(
            settings.referral_link.as_deref(),
            Some("http://localhost:8000/?ref=ABC123")
        );
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let config = AppConfig {
            referrals_page_pattern: "(".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            ControllerSettings::from_config(&config),
            Err(ConfigError::Pattern(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn referrals_page_starts_poller_and_teardown_stops_it() {
        let mut h = harness(
            FakeApi::with_stats(vec![Ok(snapshot(3, 0)), Ok(snapshot(4, 0))]),
            SharedPage::with_stat_elements(),
            None,
        );

        h.controller.start(&url("http://localhost:8000/accounts/referrals/"));
        assert_eq!(h.controller.active_tasks(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(h.api.stats_calls(), 1);

        h.controller.teardown();
        assert_eq!(h.controller.active_tasks(), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(h.api.stats_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn other_pages_never_poll() {
        let mut h = harness(FakeApi::default(), SharedPage::new(), None);

        h.controller.start(&url("http://localhost:8000/surveys/"));
        assert_eq!(h.controller.active_tasks(), 0);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(h.api.stats_calls(), 0);
        assert!(h.api.reported_codes().is_empty());
    }

    #[tokio::test]
    async fn referral_url_reports_and_shows_banner() {
        let mut h = harness(FakeApi::default(), SharedPage::new(), None);

        h.controller.start(&url("http://localhost:8000/?ref=ABC123"));
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(h.api.reported_codes(), vec!["ABC123".to_string()]);
        assert!(h.page.lock().banner.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn bulk_command_schedules_staggered_sends() {
        let mut h = harness(FakeApi::default(), SharedPage::new(), Some("ABC123"));

        h.controller.handle_command(ShareCommand::SendBulk {
            recipients: "254700000001\n\n254700000002".to_string(),
            message: "Join me".to_string(),
        });
        assert_eq!(h.controller.active_tasks(), 2);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(h.navigator.opened().len(), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.navigator.opened().len(), 2);
        assert_eq!(h.controller.active_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_bulk_sends() {
        let mut h = harness(FakeApi::default(), SharedPage::new(), Some("ABC123"));

        h.controller.handle_command(ShareCommand::SendBulk {
            recipients: "1\n2\n3".to_string(),
            message: String::new(),
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.controller.teardown();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(h.navigator.opened().len(), 1);
    }

    #[tokio::test]
    async fn share_commands() {
        let mut h = harness(FakeApi::default(), SharedPage::new(), Some("ABC123"));

        h.controller.handle_command(ShareCommand::Share {
            target: "unknown".to_string(),
            message: "hi".to_string(),
        });
        assert!(h.navigator.opened().is_empty());

        h.controller.handle_command(ShareCommand::Share {
            target: "twitter".to_string(),
            message: "hi".to_string(),
        });
        h.controller.handle_command(ShareCommand::ShowQrCode);

        let opened = h.navigator.opened();
        assert_eq!(opened.len(), 2);
        assert!(opened[0].starts_with("https://twitter.com/intent/tweet?text=hi%20"));
        assert!(opened[1].starts_with("https://api.qrserver.com/"));
    }

    #[tokio::test]
    async fn share_without_own_code_is_ignored() {
        let mut h = harness(FakeApi::default(), SharedPage::new(), None);
        h.controller.handle_command(ShareCommand::ShowQrCode);
        assert!(h.navigator.opened().is_empty());
    }

    #[tokio::test]
    async fn run_tears_down_when_ui_hangs_up() {
        let h = harness(FakeApi::default(), SharedPage::new(), Some("ABC123"));
        let Harness {
            controller,
            _commands: commands,
            navigator,
            ..
        } = h;

        let running = tokio::spawn(controller.run());
        commands
            .send(ShareCommand::Share {
                target: "sms".to_string(),
                message: "hi".to_string(),
            })
            .await
            .unwrap();
        drop(commands);

        running.await.unwrap();
        assert_eq!(navigator.opened(), vec!["sms:?body=hi%20http%3A%2F%2Flocalhost%3A8000%2F%3Fref%3DABC123"]);
    }
}
