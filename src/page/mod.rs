//! Page Controller Module
//!
//! Everything on the landing page that is not audio playback itself, driven by one
//! deterministic clock:
//!
//! - [`countdown`]: the offer countdown and its display
//! - [`notifications`]: the "recent purchase" ticker
//! - [`sections`]: closest-section tracking for the section sound
//! - [`slider`]: the testimonial carousel
//! - [`throttle`]: leading + trailing throttle for scroll handlers
//! - [`timers`]: the timer queue every page timer lives in
//! - [`visibility`]: show/hide of the floating call-to-action
//!
//! [`PageController`] owns the [`AudioOrchestrator`] and all of the above. The host feeds it
//! [`PageEvent`]s and resource signals, calls [`PageController::advance`] as time passes and
//! reads the UI state back.

use std::time::Duration;

use crate::orchestrator::status::StatusUpdate;
use crate::orchestrator::{AudioOrchestrator, AudioResource, ChannelId, ResourceSignal};
use crate::page::countdown::{Countdown, CountdownStep};
use crate::page::notifications::NotificationTicker;
use crate::page::sections::{SectionRect, SectionTracker};
use crate::page::slider::{Screenshot, TestimonialSlider};
use crate::page::throttle::Throttle;
use crate::page::timers::{TimerId, TimerQueue};
use crate::page::visibility::CtaVisibility;

pub mod countdown;
pub mod notifications;
pub mod sections;
pub mod slider;
pub mod throttle;
pub mod timers;
pub mod visibility;

/// Notice shown when the call-to-action is clicked. There is no checkout behind it.
pub const CTA_NOTICE: &str = "Download will be available once the store backend is live!";

/// Timings and content of the page.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub countdown_start: Duration,
    pub first_notification: Duration,
    pub notification_visible: Duration,
    pub notification_interval_min: Duration,
    pub notification_interval_max: Duration,
    /// How long a status message stays on the readout.
    pub status_visible: Duration,
    pub ui_blur: Duration,
    pub cta_throttle: Duration,
    pub section_throttle: Duration,
    /// Quiet period after the last scroll before an open screenshot viewer closes.
    pub fullscreen_scroll_close: Duration,
    pub notification_messages: Vec<String>,
    /// Fixed seed for the notification shuffle and delays, for reproducible runs.
    pub notification_seed: Option<u64>,
    pub testimonials: usize,
    pub screenshots: Vec<Screenshot>,
}

impl Default for PageConfig {
    fn default() -> Self {
        let buyers = [
            ("João Silva", "São Paulo"),
            ("Maria Oliveira", "Belo Horizonte"),
            ("Pedro Souza", "Salvador"),
            ("Ana Costa", "Brasília"),
            ("Carlos Santos", "Fortaleza"),
            ("Juliana Lima", "Recife"),
            ("Roberto Silva", "Curitiba"),
            ("Fernanda Alves", "Porto Alegre"),
            ("Lucas Pereira", "Goiânia"),
            ("Camila Rodrigues", "Manaus"),
            ("Diego Ferreira", "Vitória"),
            ("Patrícia Santos", "Natal"),
        ];

        Self {
            countdown_start: Duration::from_secs(3 * 60 + 47),
            first_notification: Duration::from_secs(5),
            notification_visible: Duration::from_secs(3),
            notification_interval_min: Duration::from_secs(8),
            notification_interval_max: Duration::from_secs(20),
            status_visible: Duration::from_secs(3),
            ui_blur: Duration::from_secs(2),
            cta_throttle: Duration::from_millis(100),
            section_throttle: Duration::from_millis(150),
            fullscreen_scroll_close: Duration::from_millis(100),
            notification_messages: buyers
                .iter()
                .map(|(name, city)| format!("🔔 {name} from {city} just downloaded!"))
                .collect(),
            notification_seed: None,
            testimonials: 4,
            screenshots: vec![
                Screenshot::new(1, "imagens/print1.png", "WhatsApp testimonial screenshot 1"),
                Screenshot::new(1, "imagens/print1a.png", "WhatsApp testimonial screenshot 1A"),
                Screenshot::new(1, "imagens/print1b.png", "WhatsApp testimonial screenshot 1B"),
                Screenshot::new(2, "imagens/print2.png", "WhatsApp testimonial screenshot 2"),
                Screenshot::new(3, "imagens/print3.png", "WhatsApp testimonial screenshot 3"),
                Screenshot::new(4, "imagens/print4.png", "WhatsApp testimonial screenshot 4"),
            ],
        }
    }
}

/// Layout measurements taken on scroll and resize, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollGeometry {
    pub viewport_height: f32,
    pub sections: Vec<SectionRect>,
    /// `None` when the page has no footer; the CTA then stays as it is.
    pub footer_top: Option<f32>,
    pub button_height: f32,
}

/// Input from the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    AcceptConsent,
    MuteClick,
    /// Any other click on the page.
    Click,
    KeyPress(String),
    Scroll(ScrollGeometry),
    Resize(ScrollGeometry),
    NextSlide,
    PrevSlide,
    /// Click on the slide at this index.
    SlideClick(usize),
    /// Click on the open screenshot viewer.
    ViewerClick,
    CtaClick,
    Unload,
}

impl PageEvent {
    /// Whether the event counts as user activation for autoplay purposes.
    pub fn is_gesture(&self) -> bool {
        !matches!(
            self,
            PageEvent::Scroll(_) | PageEvent::Resize(_) | PageEvent::Unload
        )
    }
}

/// Label and pressed state of the mute button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteButton {
    pub label: &'static str,
    pub pressed: bool,
}

/// The transient audio status readout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReadout {
    pub current: Option<StatusUpdate>,
    pub shown: bool,
}

impl StatusReadout {
    pub fn class_list(&self) -> String {
        match (&self.current, self.shown) {
            (Some(update), true) => update.class_list(),
            (Some(update), false) => format!("audio-status {}", update.kind.css_class()),
            (None, _) => "audio-status".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    CountdownTick,
    ShowNotification,
    HideNotification,
    HideStatus,
    UiBlurEnd,
    SectionCheck,
    CtaCheck,
    CloseViewer,
    RetryBackground(u64),
}

/// Drives one landing page instance.
pub struct PageController<R: AudioResource> {
    orchestrator: AudioOrchestrator<R>,
    config: PageConfig,
    timers: TimerQueue<TimerEvent>,
    now: Duration,
    geometry: ScrollGeometry,
    countdown: Countdown,
    countdown_timer: Option<TimerId>,
    sections: SectionTracker,
    section_throttle: Throttle,
    cta: CtaVisibility,
    cta_throttle: Throttle,
    notifications: Option<NotificationTicker>,
    slider: Option<TestimonialSlider>,
    viewer: Option<Screenshot>,
    viewer_timer: Option<TimerId>,
    banner_visible: bool,
    ui_blurred: bool,
    blur_timer: Option<TimerId>,
    status: StatusReadout,
    status_timer: Option<TimerId>,
    notices: Vec<String>,
    gesture_hook: Option<Box<dyn FnMut()>>,
    unloaded: bool,
}

impl<R: AudioResource> PageController<R> {
    /// Sets up the page at time zero: starts the countdown, schedules the first
    /// notification and runs the initial CTA and section checks.
    pub fn new(
        orchestrator: AudioOrchestrator<R>,
        config: PageConfig,
        geometry: ScrollGeometry,
    ) -> Self {
        let now = Duration::ZERO;
        let mut timers = TimerQueue::new();

        let countdown = Countdown::new(config.countdown_start);
        let countdown_timer =
            Some(timers.schedule_every(now, Duration::from_secs(1), TimerEvent::CountdownTick));
        log::info!("Countdown started: {}", countdown.display());

        let notifications = NotificationTicker::new(
            config.notification_messages.clone(),
            config.notification_seed,
        );
        if notifications.is_some() {
            timers.schedule_once(now, config.first_notification, TimerEvent::ShowNotification);
        }

        let slider = TestimonialSlider::new(config.testimonials, &config.screenshots);
        let banner_visible = !orchestrator.consent_granted();

        let mut controller = Self {
            orchestrator,
            section_throttle: Throttle::new(config.section_throttle),
            cta_throttle: Throttle::new(config.cta_throttle),
            config,
            timers,
            now,
            geometry,
            countdown,
            countdown_timer,
            sections: SectionTracker::new(),
            cta: CtaVisibility::default(),
            notifications,
            slider,
            viewer: None,
            viewer_timer: None,
            banner_visible,
            ui_blurred: false,
            blur_timer: None,
            status: StatusReadout::default(),
            status_timer: None,
            notices: Vec::new(),
            gesture_hook: None,
            unloaded: false,
        };

        controller.check_cta();
        controller.check_sections();
        controller.sync_orchestrator();
        log::info!("Landing page initialized");
        controller
    }

    /// Registers a callback run on every user gesture, before the event is handled.
    pub fn with_gesture_hook(mut self, hook: impl FnMut() + 'static) -> Self {
        self.gesture_hook = Some(Box::new(hook));
        self
    }

    /// Fires every timer due at `now`, in due order.
    pub fn advance(&mut self, now: Duration) {
        if self.unloaded {
            return;
        }

        while let Some(fired) = self.timers.pop_due(now) {
            self.now = fired.due;
            self.on_timer(fired.event);
        }
        self.now = self.now.max(now);
    }

    /// Handles one page event at `now`. Timers due before `now` fire first.
    pub fn handle(&mut self, now: Duration, event: PageEvent) {
        self.advance(now);
        if self.unloaded {
            return;
        }

        if event.is_gesture() {
            if let Some(hook) = self.gesture_hook.as_mut() {
                hook();
            }
            // A retry armed by an earlier event fires here; one armed while handling this
            // event waits for the next interaction.
            self.orchestrator.on_user_interaction();
        }

        match event {
            PageEvent::AcceptConsent => self.accept_consent(),
            PageEvent::MuteClick => {
                self.orchestrator.toggle_mute();
            }
            PageEvent::Click => {}
            PageEvent::KeyPress(key) => {
                if key == "Escape" {
                    self.close_viewer();
                }
            }
            PageEvent::Scroll(geometry) => {
                self.geometry = geometry;
                self.throttled_checks();
                self.debounce_viewer_close();
            }
            PageEvent::Resize(geometry) => {
                self.geometry = geometry;
                self.throttled_checks();
            }
            PageEvent::NextSlide => {
                if let Some(slider) = self.slider.as_mut() {
                    slider.next();
                }
            }
            PageEvent::PrevSlide => {
                if let Some(slider) = self.slider.as_mut() {
                    slider.prev();
                }
            }
            PageEvent::SlideClick(index) => self.open_viewer(index),
            PageEvent::ViewerClick => self.close_viewer(),
            PageEvent::CtaClick => {
                log::info!("Download button clicked");
                self.notices.push(CTA_NOTICE.to_string());
            }
            PageEvent::Unload => self.unload(),
        }

        self.sync_orchestrator();
    }

    /// Dispatches a resource signal at `now`.
    pub fn handle_signal(&mut self, now: Duration, channel: ChannelId, signal: ResourceSignal) {
        self.advance(now);
        if self.unloaded {
            return;
        }
        self.orchestrator.handle_signal(channel, signal);
        self.sync_orchestrator();
    }

    /// Dispatches a batch of resource signals, e.g. from
    /// [`AudioEngine::poll_signals`](crate::audio_engine::AudioEngine::poll_signals).
    pub fn handle_signals(
        &mut self,
        now: Duration,
        signals: impl IntoIterator<Item = (ChannelId, ResourceSignal)>,
    ) {
        for (channel, signal) in signals {
            self.handle_signal(now, channel, signal);
        }
    }

    fn accept_consent(&mut self) {
        self.banner_visible = false;
        self.orchestrator.grant_consent();
    }

    fn unload(&mut self) {
        log::info!("Cleaning up page resources");
        self.orchestrator.stop_all();
        self.timers.cancel_all();
        self.countdown.stop();
        self.countdown_timer = None;
        self.blur_timer = None;
        self.status_timer = None;
        self.viewer_timer = None;
        self.unloaded = true;
    }

    fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::CountdownTick => self.countdown_tick(),
            TimerEvent::ShowNotification => self.show_notification(),
            TimerEvent::HideNotification => {
                if let Some(ticker) = self.notifications.as_mut() {
                    ticker.hide();
                }
            }
            TimerEvent::HideStatus => {
                self.status_timer = None;
                self.status.shown = false;
            }
            TimerEvent::UiBlurEnd => {
                self.blur_timer = None;
                self.ui_blurred = false;
            }
            TimerEvent::SectionCheck => {
                self.section_throttle.trailing_fired(self.now);
                self.check_sections();
            }
            TimerEvent::CtaCheck => {
                self.cta_throttle.trailing_fired(self.now);
                self.check_cta();
            }
            TimerEvent::CloseViewer => {
                self.viewer_timer = None;
                self.close_viewer();
            }
            TimerEvent::RetryBackground(id) => {
                self.orchestrator.fire_retry(id);
            }
        }
        self.sync_orchestrator();
    }

    fn countdown_tick(&mut self) {
        match self.countdown.step() {
            CountdownStep::Ticked => self.orchestrator.play_tick(),
            CountdownStep::Expired => {
                self.orchestrator.pause_background();
                if let Some(id) = self.countdown_timer.take() {
                    self.timers.cancel(id);
                }
            }
            CountdownStep::Idle => {}
        }
    }

    fn show_notification(&mut self) {
        let Some(ticker) = self.notifications.as_mut() else {
            return;
        };

        let message = ticker.show_next();
        log::debug!("Notification: {message}");
        let next = ticker.next_delay(
            self.config.notification_interval_min,
            self.config.notification_interval_max,
        );

        self.timers.schedule_once(
            self.now,
            self.config.notification_visible,
            TimerEvent::HideNotification,
        );
        self.timers
            .schedule_once(self.now, next, TimerEvent::ShowNotification);
    }

    fn throttled_checks(&mut self) {
        if self
            .cta_throttle
            .call(self.now, &mut self.timers, TimerEvent::CtaCheck)
        {
            self.check_cta();
        }
        if self
            .section_throttle
            .call(self.now, &mut self.timers, TimerEvent::SectionCheck)
        {
            self.check_sections();
        }
    }

    fn check_cta(&mut self) {
        let Some(footer_top) = self.geometry.footer_top else {
            return;
        };
        if self.cta.check(
            footer_top,
            self.geometry.viewport_height,
            self.geometry.button_height,
        ) {
            log::debug!("CTA visible: {}", self.cta.is_visible());
        }
    }

    fn check_sections(&mut self) {
        let Some(focus) = self
            .sections
            .update(self.geometry.viewport_height, &self.geometry.sections)
        else {
            return;
        };

        if focus.play_sound {
            self.orchestrator.play_section_transition();
        }

        self.ui_blurred = true;
        if let Some(id) = self.blur_timer.take() {
            self.timers.cancel(id);
        }
        self.blur_timer = Some(
            self.timers
                .schedule_once(self.now, self.config.ui_blur, TimerEvent::UiBlurEnd),
        );
    }

    fn open_viewer(&mut self, index: usize) {
        if let Some(shot) = self.slider.as_ref().and_then(|slider| slider.screenshot(index)) {
            log::debug!("Opening screenshot {}", shot.src);
            self.viewer = Some(shot.clone());
        }
    }

    fn close_viewer(&mut self) {
        self.viewer = None;
    }

    fn debounce_viewer_close(&mut self) {
        if let Some(id) = self.viewer_timer.take() {
            self.timers.cancel(id);
        }
        self.viewer_timer = Some(self.timers.schedule_once(
            self.now,
            self.config.fullscreen_scroll_close,
            TimerEvent::CloseViewer,
        ));
    }

    /// Shows pending status updates and arms the timer of a newly scheduled retry.
    fn sync_orchestrator(&mut self) {
        if self.unloaded {
            return;
        }

        if let Some(update) = self.orchestrator.take_status_updates().pop() {
            self.status = StatusReadout {
                current: Some(update),
                shown: true,
            };
            if let Some(id) = self.status_timer.take() {
                self.timers.cancel(id);
            }
            self.status_timer = Some(self.timers.schedule_once(
                self.now,
                self.config.status_visible,
                TimerEvent::HideStatus,
            ));
        }

        if let Some((id, delay)) = self.orchestrator.take_scheduled_retry() {
            self.timers
                .schedule_once(self.now, delay, TimerEvent::RetryBackground(id));
        }
    }

    pub fn orchestrator(&self) -> &AudioOrchestrator<R> {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut AudioOrchestrator<R> {
        &mut self.orchestrator
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// The page body stays blurred while the consent banner is up.
    pub fn body_blurred(&self) -> bool {
        self.banner_visible
    }

    /// CTA and badge carry the `ui--blur` class for a moment after each section check.
    pub fn ui_blurred(&self) -> bool {
        self.ui_blurred
    }

    pub fn mute_button(&self) -> MuteButton {
        let muted = self.orchestrator.is_muted();
        MuteButton {
            label: if muted { "🔇" } else { "🔊" },
            pressed: muted,
        }
    }

    pub fn status(&self) -> &StatusReadout {
        &self.status
    }

    pub fn countdown_display(&self) -> String {
        self.countdown.display()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notifications
            .as_ref()
            .and_then(|ticker| ticker.visible())
    }

    pub fn active_section(&self) -> Option<usize> {
        self.sections.active()
    }

    pub fn cta_visible(&self) -> bool {
        self.cta.is_visible()
    }

    pub fn slider(&self) -> Option<&TestimonialSlider> {
        self.slider.as_ref()
    }

    /// The screenshot open in the fullscreen viewer.
    pub fn viewer(&self) -> Option<&Screenshot> {
        self.viewer.as_ref()
    }

    /// Drains notices raised since the last call (the CTA placeholder).
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Number of live timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::orchestrator::resource::PlayError;
    use crate::orchestrator::testing::{FakeChannels, FakeResource};
    use crate::orchestrator::{BackgroundOutcome, OrchestratorConfig, StatusKind};

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn geometry(scroll: f32) -> ScrollGeometry {
        ScrollGeometry {
            viewport_height: 800.0,
            sections: (0..3)
                .map(|i| {
                    let top = i as f32 * 800.0 - scroll;
                    SectionRect::new(top, top + 800.0)
                })
                .collect(),
            footer_top: Some(2400.0 - scroll),
            button_height: 80.0,
        }
    }

    fn page_with(
        fakes: &FakeChannels,
        config: OrchestratorConfig,
    ) -> PageController<FakeResource> {
        let orchestrator = AudioOrchestrator::new(config, fakes.resources());
        let page_config = PageConfig {
            notification_seed: Some(11),
            ..PageConfig::default()
        };
        PageController::new(orchestrator, page_config, geometry(0.0))
    }

    fn ready_all(page: &mut PageController<FakeResource>, now: Duration) {
        for channel in ChannelId::ALL {
            page.handle_signal(now, channel, ResourceSignal::CanPlayThrough);
        }
    }

    #[test]
    fn test_initial_state() {
        let fakes = FakeChannels::new();
        let page = page_with(&fakes, OrchestratorConfig::classic());

        assert!(page.banner_visible());
        assert!(page.body_blurred());
        assert_eq!(page.countdown_display(), "03:47");
        assert_eq!(page.active_section(), Some(0));
        assert!(page.cta_visible());
        assert!(page.ui_blurred());
        assert_eq!(
            page.status().current.as_ref().map(|s| s.message.as_str()),
            Some("Waiting for cookie consent...")
        );
        assert_eq!(
            page.mute_button(),
            MuteButton {
                label: "🔊",
                pressed: false
            }
        );
    }

    #[test]
    fn test_consent_starts_music_and_hides_banner() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(100));

        page.handle(secs(1), PageEvent::AcceptConsent);

        assert!(!page.banner_visible());
        assert!(!page.body_blurred());
        assert_eq!(fakes.background.plays(), 1);
        assert!(page.orchestrator().background_playing());
    }

    #[test]
    fn test_ticks_are_silent_until_consent() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(100));

        page.advance(secs(3));
        assert_eq!(page.countdown_display(), "03:44");
        assert_eq!(fakes.tick.plays(), 0);

        page.handle(ms(3500), PageEvent::AcceptConsent);
        page.advance(secs(5));
        assert_eq!(fakes.tick.plays(), 2);
        assert_eq!(fakes.tick.rewinds(), 2);
    }

    #[test]
    fn test_countdown_expiry_pauses_music() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(100));
        page.handle(ms(200), PageEvent::AcceptConsent);

        page.advance(secs(227));
        assert_eq!(page.countdown_display(), "00:00");
        assert!(page.countdown_running());
        assert_eq!(fakes.background.pauses(), 0);

        page.advance(secs(228));
        assert!(!page.countdown_running());
        assert_eq!(fakes.background.pauses(), 1);
        assert!(!page.orchestrator().background_playing());

        page.advance(secs(300));
        assert_eq!(fakes.tick.plays(), 227);
    }

    #[test]
    fn test_rejected_autoplay_retries_on_next_click() {
        let fakes = FakeChannels::new();
        let config = OrchestratorConfig::classic()
            .with_retry_policy(crate::orchestrator::RetryPolicy::NextInteraction);
        let mut page = page_with(&fakes, config);
        ready_all(&mut page, ms(100));

        fakes.background.queue_play_result(Err(PlayError::NotAllowed));
        page.handle(secs(1), PageEvent::AcceptConsent);
        assert_eq!(fakes.background.plays(), 1);
        assert_eq!(
            page.orchestrator().background_outcome(),
            Some(BackgroundOutcome::Failed)
        );

        page.handle(secs(2), PageEvent::Click);
        assert_eq!(fakes.background.plays(), 2);
        assert!(page.orchestrator().background_playing());

        page.handle(secs(3), PageEvent::Click);
        assert_eq!(fakes.background.plays(), 2);
    }

    #[test]
    fn test_delayed_retry_fires_once() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(100));

        fakes.background.queue_play_result(Err(PlayError::NotAllowed));
        page.handle(secs(1), PageEvent::AcceptConsent);
        assert_eq!(fakes.background.plays(), 1);

        page.advance(ms(2999));
        assert_eq!(fakes.background.plays(), 1);

        page.advance(secs(3));
        assert_eq!(fakes.background.plays(), 2);
        assert!(page.orchestrator().background_playing());

        page.advance(secs(10));
        assert_eq!(fakes.background.plays(), 2);
    }

    #[test]
    fn test_rejected_delayed_retry_is_not_rearmed() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(100));

        fakes.background.queue_play_result(Err(PlayError::NotAllowed));
        fakes.background.queue_play_result(Err(PlayError::NotAllowed));
        page.handle(secs(1), PageEvent::AcceptConsent);

        page.advance(secs(60));
        assert_eq!(fakes.background.plays(), 2);
        assert!(!page.orchestrator().background_playing());
        assert_eq!(page.orchestrator().pending_retry(), None);
    }

    #[test]
    fn test_countdown_expiry_drops_pending_retry() {
        let fakes = FakeChannels::new();
        let config = OrchestratorConfig::classic()
            .with_retry_policy(crate::orchestrator::RetryPolicy::NextInteraction);
        let mut page = page_with(&fakes, config);
        ready_all(&mut page, ms(100));

        fakes.background.queue_play_result(Err(PlayError::NotAllowed));
        page.handle(secs(1), PageEvent::AcceptConsent);
        assert!(page.orchestrator().pending_retry().is_some());

        page.advance(secs(228));
        assert!(!page.countdown_running());
        assert_eq!(page.orchestrator().pending_retry(), None);

        page.handle(secs(229), PageEvent::Click);
        assert_eq!(fakes.background.plays(), 1);
    }

    #[test]
    fn test_gesture_hook_runs_before_retry() {
        let fakes = FakeChannels::new();
        let gestures = Rc::new(Cell::new(0));
        let seen = gestures.clone();
        let mut page = page_with(&fakes, OrchestratorConfig::classic())
            .with_gesture_hook(move || seen.set(seen.get() + 1));

        page.handle(secs(1), PageEvent::Click);
        page.handle(secs(1), PageEvent::Scroll(geometry(10.0)));
        page.handle(secs(2), PageEvent::KeyPress("a".to_string()));

        assert_eq!(gestures.get(), 2);
    }

    #[test]
    fn test_mute_button_reflects_state() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());

        page.handle(secs(1), PageEvent::MuteClick);
        assert_eq!(
            page.mute_button(),
            MuteButton {
                label: "🔇",
                pressed: true
            }
        );
        assert!(fakes.tick.is_muted());

        let status = page.status().current.clone().unwrap();
        assert_eq!(status.message, "Audio muted");
        assert_eq!(status.kind, StatusKind::Error);

        page.handle(secs(2), PageEvent::MuteClick);
        assert!(!page.mute_button().pressed);
    }

    #[test]
    fn test_status_hides_after_timeout() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());

        page.handle(secs(1), PageEvent::MuteClick);
        assert_eq!(page.status().class_list(), "audio-status show error");

        // A later message restarts the hide timer.
        page.handle(secs(3), PageEvent::MuteClick);
        page.advance(secs(5));
        assert!(page.status().shown);

        page.advance(secs(6));
        assert!(!page.status().shown);
        assert_eq!(page.status().class_list(), "audio-status playing");
    }

    #[test]
    fn test_section_change_plays_sound_once() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(10));
        page.handle(ms(20), PageEvent::AcceptConsent);

        page.handle(secs(1), PageEvent::Scroll(geometry(700.0)));
        assert_eq!(page.active_section(), Some(1));
        assert_eq!(fakes.section.plays(), 1);

        page.handle(secs(2), PageEvent::Scroll(geometry(760.0)));
        assert_eq!(fakes.section.plays(), 1);
    }

    #[test]
    fn test_section_scroll_is_throttled_with_trailing_check() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(10));
        page.handle(ms(20), PageEvent::AcceptConsent);

        page.handle(secs(1), PageEvent::Scroll(geometry(100.0)));
        page.handle(ms(1050), PageEvent::Scroll(geometry(700.0)));
        assert_eq!(page.active_section(), Some(0));

        page.advance(ms(1150));
        assert_eq!(page.active_section(), Some(1));
        assert_eq!(fakes.section.plays(), 1);
    }

    #[test]
    fn test_ui_blur_clears_after_quiet_period() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        assert!(page.ui_blurred());

        page.handle(secs(1), PageEvent::Scroll(geometry(50.0)));
        page.advance(ms(2999));
        assert!(page.ui_blurred());

        page.advance(secs(3));
        assert!(!page.ui_blurred());
    }

    #[test]
    fn test_cta_hides_near_footer() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());

        page.handle(secs(1), PageEvent::Scroll(geometry(1700.0)));
        assert!(!page.cta_visible());

        page.handle(secs(2), PageEvent::Scroll(geometry(0.0)));
        assert!(page.cta_visible());
    }

    #[test]
    fn test_notifications_cycle() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());

        // Same seed, same shuffle and delays as the page's ticker.
        let config = PageConfig::default();
        let mut expected =
            NotificationTicker::new(config.notification_messages, Some(11)).unwrap();
        let first = expected.show_next().to_string();
        let next = expected.next_delay(secs(8), secs(20));
        let second = expected.show_next().to_string();

        page.advance(ms(4999));
        assert_eq!(page.notification(), None);

        page.advance(secs(5));
        assert_eq!(page.notification(), Some(first.as_str()));

        page.advance(secs(8));
        assert_eq!(page.notification(), None);

        page.advance(secs(5) + next - ms(1));
        assert_eq!(page.notification(), None);
        page.advance(secs(5) + next);
        assert_eq!(page.notification(), Some(second.as_str()));
    }

    #[test]
    fn test_slider_and_viewer() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        assert_eq!(page.slider().map(|slider| slider.len()), Some(10));

        page.handle(secs(1), PageEvent::PrevSlide);
        assert_eq!(page.slider().map(|slider| slider.current()), Some(9));
        page.handle(secs(1), PageEvent::NextSlide);
        assert_eq!(page.slider().map(|slider| slider.current()), Some(0));

        page.handle(secs(2), PageEvent::SlideClick(0));
        assert_eq!(page.viewer(), None);

        page.handle(secs(2), PageEvent::SlideClick(1));
        assert_eq!(
            page.viewer().map(|shot| shot.src.as_str()),
            Some("imagens/print1.png")
        );

        page.handle(secs(3), PageEvent::KeyPress("Escape".to_string()));
        assert_eq!(page.viewer(), None);

        page.handle(secs(4), PageEvent::SlideClick(1));
        page.handle(secs(5), PageEvent::Scroll(geometry(5.0)));
        assert!(page.viewer().is_some());
        page.advance(ms(5100));
        assert_eq!(page.viewer(), None);
    }

    #[test]
    fn test_cta_click_raises_placeholder_notice() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());

        page.handle(secs(1), PageEvent::CtaClick);
        assert_eq!(page.take_notices(), vec![CTA_NOTICE.to_string()]);
        assert!(page.take_notices().is_empty());
    }

    #[test]
    fn test_unload_stops_audio_and_timers() {
        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::classic());
        ready_all(&mut page, ms(10));
        page.handle(ms(20), PageEvent::AcceptConsent);
        page.advance(secs(2));
        let ticks = fakes.tick.plays();

        page.handle(ms(2500), PageEvent::Unload);
        assert!(page.is_unloaded());
        assert_eq!(page.pending_timers(), 0);
        assert!(fakes.background.is_paused());
        assert!(!page.orchestrator().background_playing());

        page.advance(secs(60));
        page.handle(secs(61), PageEvent::Click);
        assert_eq!(fakes.tick.plays(), ticks);
        assert_eq!(page.countdown_display(), "03:45");
    }

    #[test]
    fn test_returning_visitor_skips_banner() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("consent");

        let fakes = FakeChannels::new();
        let mut first = page_with(&fakes, OrchestratorConfig::returning_visitor(&path));
        first.handle(secs(1), PageEvent::AcceptConsent);
        drop(first);

        let fakes = FakeChannels::new();
        let mut page = page_with(&fakes, OrchestratorConfig::returning_visitor(&path));
        assert!(!page.banner_visible());

        page.handle_signal(ms(500), ChannelId::Background, ResourceSignal::CanPlay);
        assert_eq!(fakes.background.plays(), 1);
        assert!(page.orchestrator().background_playing());
    }
}
