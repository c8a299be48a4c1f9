//! The work/break state machine.
//!
//! [`SessionController`] owns the session state and is the only writer of the
//! [`HomeView`]. Everything that can change it (user actions, engine events,
//! animation frames, timers) arrives as an [`Input`] on one queue and is
//! applied strictly in order by [`SessionController::run`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use super::animator::{Frame, MessageAnimator};
use super::durations::DurationResolver;
use super::state::SessionState;
use super::view::{HomeView, TITLE_START, TITLE_STOP};
use crate::config::SettingsHandle;
use crate::core::Generation;
use crate::engine::EngineHost;
use crate::error::EyesBreakError;
use crate::features::bridge::{BridgeError, Command, EngineEvent, EventBridge, EventKind};
use crate::features::effects::{
    tray_menu, AudioPlayer, MenuAction, Notifier, Shell, SideEffectCoordinator, Sound,
};
use crate::features::i18n::Translator;

/// How long the app stays visible after a work session starts.
pub const VISIBILITY_DELAY: Duration = Duration::from_millis(3000);

/// Something the controller has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Start a session, or cancel the running one.
    Toggle,
    ShowSettings,
    CloseSettings,
    /// A tray menu item was chosen.
    Menu(MenuAction),
    /// The engine reported something.
    Engine(EngineEvent),
    /// The next step of the status message reveal.
    Frame(Frame),
    /// The post-start visibility timer with this id ran out.
    VisibilityElapsed(u64),
    /// Stop the controller.
    Shutdown,
}

/// Collaborators of the controller, built once at startup.
pub struct AppContext {
    pub settings: SettingsHandle,
    pub engine: Arc<dyn EngineHost>,
    pub effects: SideEffectCoordinator,
    pub shell: Arc<dyn Shell>,
    pub translator: Translator,
}

impl AppContext {
    pub fn new(
        settings: SettingsHandle,
        engine: Arc<dyn EngineHost>,
        notifier: Arc<dyn Notifier>,
        audio: Arc<dyn AudioPlayer>,
        shell: Arc<dyn Shell>,
    ) -> Self {
        Self {
            effects: SideEffectCoordinator::new(settings.clone(), notifier, audio),
            translator: Translator::new(settings.clone()),
            settings,
            engine,
            shell,
        }
    }
}

/// Cloneable front end handed to user surfaces.
#[derive(Clone)]
pub struct ControllerHandle {
    inputs: mpsc::UnboundedSender<Input>,
    view: watch::Receiver<HomeView>,
}

impl ControllerHandle {
    /// Queue an input. Returns `false` once the controller is gone.
    pub fn send(&self, input: Input) -> bool {
        self.inputs.send(input).is_ok()
    }

    pub fn toggle(&self) -> bool {
        self.send(Input::Toggle)
    }

    pub fn show_settings(&self) -> bool {
        self.send(Input::ShowSettings)
    }

    pub fn close_settings(&self) -> bool {
        self.send(Input::CloseSettings)
    }

    pub fn menu(&self, action: MenuAction) -> bool {
        self.send(Input::Menu(action))
    }

    pub fn shutdown(&self) -> bool {
        self.send(Input::Shutdown)
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> HomeView {
        self.view.borrow().clone()
    }

    /// A receiver notified on every view change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HomeView> {
        self.view.clone()
    }

    /// Whether the controller has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inputs.is_closed()
    }
}

/// Drives the WAITING / WORK / BREAK cycle.
pub struct SessionController {
    settings: SettingsHandle,
    bridge: EventBridge,
    effects: SideEffectCoordinator,
    shell: Arc<dyn Shell>,
    translator: Translator,
    durations: DurationResolver,
    animator: MessageAnimator,
    visibility: Generation,
    /// A cancel was sent and not yet confirmed.
    cancel_pending: bool,
    view: watch::Sender<HomeView>,
    tx: mpsc::UnboundedSender<Input>,
    inputs: mpsc::UnboundedReceiver<Input>,
}

impl SessionController {
    pub fn new(ctx: AppContext) -> (Self, ControllerHandle) {
        let (tx, inputs) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(HomeView::default());
        let handle = ControllerHandle {
            inputs: tx.clone(),
            view: view_rx,
        };

        let controller = Self {
            durations: DurationResolver::new(ctx.settings.clone()),
            settings: ctx.settings,
            bridge: EventBridge::new(ctx.engine),
            effects: ctx.effects,
            shell: ctx.shell,
            translator: ctx.translator,
            animator: MessageAnimator::new(),
            visibility: Generation::new(),
            cancel_pending: false,
            view,
            tx,
            inputs,
        };
        (controller, handle)
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.view.borrow().state
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> HomeView {
        self.view.borrow().clone()
    }

    /// Initialize, then process inputs until [`Input::Shutdown`].
    pub async fn run(mut self) {
        self.initialize().await;

        let mut settings = self.settings.clone();
        let mut watch_settings = true;
        loop {
            tokio::select! {
                input = self.inputs.recv() => {
                    let Some(input) = input else { break };
                    if input == Input::Shutdown {
                        break;
                    }
                    if let Err(e) = self.handle_input(input).await {
                        tracing::error!(error = %e, "failed to handle input");
                    }
                }
                changed = settings.changed(), if watch_settings => {
                    if changed.is_ok() {
                        self.on_settings_changed();
                    } else {
                        watch_settings = false;
                    }
                }
            }
        }

        self.shutdown();
    }

    /// Subscribe to the engine and prepare side effects and the view.
    ///
    /// Each step fails on its own; failures are logged and the rest still
    /// runs.
    pub async fn initialize(&mut self) {
        if let Err(e) = self.subscribe() {
            tracing::error!(error = %e, "failed to register engine listeners");
        }
        if let Err(e) = self.effects.initialize().await {
            tracing::warn!(error = %e, "notifications unavailable");
        }
        if let Err(e) = self.shell.install_menu(&tray_menu()) {
            tracing::warn!(error = %e, "failed to install menu");
        }
        self.refresh_timers();
        self.rotate_message(SessionState::Waiting);
        self.effects.play(Sound::Welcome);
    }

    fn subscribe(&mut self) -> Result<(), BridgeError> {
        self.bridge.cleanup();
        for kind in EventKind::LIFECYCLE {
            let tx = self.tx.clone();
            self.bridge.listen(kind, move |event| {
                let _ = tx.send(Input::Engine(event));
            })?;
        }
        Ok(())
    }

    /// Apply one input.
    ///
    /// # Errors
    ///
    /// Returns dispatch failures of the engine commands the input caused.
    pub async fn handle_input(&mut self, input: Input) -> Result<(), EyesBreakError> {
        match input {
            Input::Toggle => self.toggle_session().await?,
            Input::ShowSettings => self.show_settings(),
            Input::CloseSettings => self.close_settings(),
            Input::Menu(action) => self.on_menu(action).await?,
            Input::Engine(event) => self.on_engine_event(event).await?,
            Input::Frame(frame) => self.on_frame(frame),
            Input::VisibilityElapsed(id) => self.on_visibility_elapsed(id),
            Input::Shutdown => self.shutdown(),
        }
        Ok(())
    }

    /// Start a work session when idle, otherwise ask the engine to cancel.
    ///
    /// Cancelling does not change the state; that happens once the engine
    /// confirms with `session-cancelled`, or when a completion that was
    /// already queued arrives first.
    ///
    /// # Errors
    ///
    /// Returns the dispatch failure, if any.
    pub async fn toggle_session(&mut self) -> Result<(), BridgeError> {
        if self.state() == SessionState::Waiting {
            self.start_session().await
        } else {
            self.bridge.dispatch(&Command::CancelSession).await?;
            self.cancel_pending = true;
            Ok(())
        }
    }

    pub fn show_settings(&mut self) {
        self.view.send_modify(|v| v.show_settings = true);
    }

    pub fn close_settings(&mut self) {
        self.view.send_modify(|v| v.show_settings = false);
    }

    async fn start_session(&mut self) -> Result<(), BridgeError> {
        self.launch(SessionState::Work).await?;
        self.set_state(SessionState::Work);
        self.view.send_modify(|v| v.title_key = TITLE_STOP);
        self.rotate_message(SessionState::Work);
        self.arm_visibility_timer();
        Ok(())
    }

    /// Ask the engine for a countdown of `state`'s configured length.
    async fn launch(&mut self, state: SessionState) -> Result<(), BridgeError> {
        let tx = self.tx.clone();
        self.bridge.listen_once(EventKind::Started, move |event| {
            let _ = tx.send(Input::Engine(event));
        });

        let duration = self.durations.duration_for(state);
        self.bridge.dispatch(&Command::StartSession(duration)).await
    }

    async fn on_engine_event(&mut self, event: EngineEvent) -> Result<(), BridgeError> {
        let state = self.state();
        match event {
            EngineEvent::Progress(percent) => {
                if state == SessionState::Waiting {
                    tracing::debug!(percent, "progress while idle dropped");
                } else {
                    self.view.send_modify(|v| v.progress = percent);
                }
            },
            EngineEvent::TimeProgress(remaining) => match state {
                SessionState::Waiting => tracing::debug!(%remaining, "time while idle dropped"),
                SessionState::Work => self.view.send_modify(|v| v.timer_work = remaining),
                SessionState::Break => self.view.send_modify(|v| v.timer_break = remaining),
            },
            EngineEvent::Completed => self.on_completed().await?,
            EngineEvent::Cancelled => self.reset_to_waiting(),
            EngineEvent::Started(true) => tracing::debug!(%state, "engine started countdown"),
            EngineEvent::Started(false) => {
                tracing::warn!(%state, "engine rejected the session duration");
                self.reset_to_waiting();
            },
        }
        Ok(())
    }

    async fn on_completed(&mut self) -> Result<(), BridgeError> {
        let Some(next) = self.state().next() else {
            tracing::debug!("completion while idle dropped");
            return Ok(());
        };
        if self.cancel_pending {
            tracing::debug!(%next, "completion after cancel, not launching");
            self.reset_to_waiting();
            return Ok(());
        }

        self.launch(next).await?;
        self.set_state(next);

        match next {
            SessionState::Break => {
                let work = self.durations.duration_for(SessionState::Work);
                self.view.send_modify(|v| v.timer_work = work);
                self.effects.play(Sound::Break);
                let title = self.translator.translate("notifications.break.title");
                let body = self.translator.translate("notifications.break.message");
                self.effects.notify(&title, &body).await;
                self.show_app();
            },
            SessionState::Work => {
                let rest = self.durations.duration_for(SessionState::Break);
                self.view.send_modify(|v| v.timer_break = rest);
                self.effects.play(Sound::Work);
                self.arm_visibility_timer();
            },
            SessionState::Waiting => {},
        }

        self.rotate_message(next);
        Ok(())
    }

    fn reset_to_waiting(&mut self) {
        self.cancel_pending = false;
        self.visibility.invalidate();
        self.set_state(SessionState::Waiting);
        self.view.send_modify(|v| {
            v.animated_after_started = false;
            v.progress = 0;
            v.title_key = TITLE_START;
        });
        self.refresh_timers();
        self.rotate_message(SessionState::Waiting);
    }

    async fn on_menu(&mut self, action: MenuAction) -> Result<(), BridgeError> {
        tracing::debug!(%action, "menu item chosen");
        match action {
            MenuAction::Quit => self.bridge.dispatch(&Command::ExitApp).await?,
            MenuAction::Hide => self.hide_app(),
            MenuAction::Show => self.show_app(),
        }
        Ok(())
    }

    fn on_frame(&mut self, frame: Frame) {
        if self.animator.is_current(frame.generation) {
            self.view.send_modify(|v| v.current_message = frame.text);
        }
    }

    /// Reflect saved settings. Only the idle timers follow live edits; a
    /// running countdown keeps the duration it was started with.
    pub fn on_settings_changed(&mut self) {
        if self.state() == SessionState::Waiting {
            self.refresh_timers();
        }
    }

    fn refresh_timers(&mut self) {
        let work = self.durations.duration_for(SessionState::Work);
        let rest = self.durations.duration_for(SessionState::Break);
        self.view.send_modify(|v| {
            v.timer_work = work;
            v.timer_break = rest;
        });
    }

    fn set_state(&mut self, next: SessionState) {
        let previous = self.view.borrow().state;
        if previous != next {
            tracing::info!(from = %previous, to = %next, "session state changed");
        }
        self.view.send_modify(|v| v.state = next);
    }

    /// Restart the status message reveal for `state`.
    ///
    /// The message is translated now, so a language change shows up on the
    /// next reveal.
    fn rotate_message(&mut self, state: SessionState) {
        let message = self.translator.translate(state.message_key());
        let delay = Duration::from_millis(self.settings.borrow().message_animation_delay);
        self.view.send_modify(|v| v.current_message.clear());

        let tx = self.tx.clone();
        self.animator.start(message, delay, move |frame| {
            let _ = tx.send(Input::Frame(frame));
        });
    }

    fn arm_visibility_timer(&mut self) {
        let ticket = self.visibility.advance();
        self.view.send_modify(|v| v.animated_after_started = true);

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(VISIBILITY_DELAY).await;
            if ticket.is_current() {
                let _ = tx.send(Input::VisibilityElapsed(ticket.id()));
            }
        });
    }

    fn on_visibility_elapsed(&mut self, id: u64) {
        if !self.visibility.is_current(id) {
            return;
        }
        self.visibility.invalidate();
        self.view.send_modify(|v| v.animated_after_started = false);
        self.hide_app();
    }

    fn show_app(&self) {
        if let Err(e) = self.shell.show() {
            tracing::warn!(error = %e, "failed to show app");
        }
    }

    fn hide_app(&self) {
        if let Err(e) = self.shell.hide() {
            tracing::warn!(error = %e, "failed to hide app");
        }
    }

    /// Stop animations and timers and drop every engine listener.
    pub fn shutdown(&mut self) {
        self.animator.cancel();
        self.visibility.invalidate();
        self.bridge.cleanup();
        tracing::info!("session controller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppSettings;
    use crate::engine::{EngineError, LocalEngine};
    use crate::features::bridge::testing::FakeHost;
    use crate::features::effects::{MockAudioPlayer, MockNotifier, MockShell};
    use mockall::predicate::eq;
    use serde_json::{json, Value};

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_permission_granted().returning(|| true);
        notifier.expect_request_permission().returning(|| Ok(true));
        notifier.expect_send().returning(|_, _| Ok(()));
        notifier
    }

    fn quiet_audio() -> MockAudioPlayer {
        let mut audio = MockAudioPlayer::new();
        audio.expect_rewind().return_const(());
        audio.expect_play().returning(|_| Ok(()));
        audio
    }

    fn quiet_shell() -> MockShell {
        let mut shell = MockShell::new();
        shell.expect_install_menu().returning(|_| Ok(()));
        shell.expect_show().returning(|| Ok(()));
        shell.expect_hide().returning(|| Ok(()));
        shell
    }

    struct Harness {
        controller: SessionController,
        handle: ControllerHandle,
        host: Arc<FakeHost>,
        settings: watch::Sender<AppSettings>,
    }

    fn harness_with(notifier: MockNotifier, audio: MockAudioPlayer, shell: MockShell) -> Harness {
        let (settings, rx) = watch::channel(AppSettings::default());
        let host = Arc::new(FakeHost::default());
        let engine: Arc<dyn EngineHost> = host.clone();
        let ctx = AppContext::new(rx, engine, Arc::new(notifier), Arc::new(audio), Arc::new(shell));
        let (controller, handle) = SessionController::new(ctx);
        Harness {
            controller,
            handle,
            host,
            settings,
        }
    }

    fn harness() -> Harness {
        harness_with(quiet_notifier(), quiet_audio(), quiet_shell())
    }

    impl Harness {
        async fn init(&mut self) {
            self.controller.initialize().await;
        }

        /// Apply every queued input.
        async fn settle(&mut self) {
            while let Ok(input) = self.controller.inputs.try_recv() {
                self.controller.handle_input(input).await.unwrap();
            }
        }

        async fn emit(&mut self, event: &str, payload: Value) {
            self.host.emit(event, payload);
            self.settle().await;
        }

        fn start_durations(&self) -> Vec<Value> {
            self.host
                .invoked
                .lock()
                .unwrap()
                .iter()
                .filter(|(name, _)| name == "start_session")
                .filter_map(|(_, args)| args.clone())
                .map(|args| args["durationStr"].clone())
                .collect()
        }
    }

    #[tokio::test]
    async fn test_toggle_from_waiting_starts_work() {
        let mut h = harness();
        h.init().await;

        h.controller.toggle_session().await.unwrap();

        assert_eq!(h.controller.state(), SessionState::Work);
        assert_eq!(h.host.commands(), vec!["start_session"]);
        assert_eq!(h.start_durations(), vec![json!("00:20:00")]);
        let view = h.controller.view();
        assert_eq!(view.title_key, TITLE_STOP);
        assert!(view.animated_after_started);
    }

    #[tokio::test]
    async fn test_toggle_while_running_waits_for_cancel_confirmation() {
        let mut h = harness();
        h.init().await;
        h.controller.toggle_session().await.unwrap();
        h.emit("session-progress", json!(30.0)).await;
        h.emit("session-time-progress", json!("00:14:00")).await;

        h.controller.toggle_session().await.unwrap();
        assert_eq!(h.host.commands(), vec!["start_session", "cancel_session"]);
        assert_eq!(h.controller.state(), SessionState::Work);

        h.emit("session-cancelled", Value::Null).await;
        let view = h.controller.view();
        assert_eq!(view.state, SessionState::Waiting);
        assert_eq!(view.progress, 0);
        assert_eq!(view.timer_work, "00:20:00");
        assert_eq!(view.timer_break, "00:00:20");
        assert_eq!(view.title_key, TITLE_START);
        assert!(!view.animated_after_started);
    }

    #[tokio::test]
    async fn test_toggle_during_break_waits_for_cancel_confirmation() {
        let mut h = harness();
        h.init().await;
        h.controller.toggle_session().await.unwrap();
        h.emit("session-completed", Value::Null).await;
        assert_eq!(h.controller.state(), SessionState::Break);
        h.emit("session-time-progress", json!("00:00:12")).await;

        h.controller.toggle_session().await.unwrap();
        let cancels = h.host.commands().iter().filter(|c| *c == "cancel_session").count();
        assert_eq!(cancels, 1);
        assert_eq!(h.controller.state(), SessionState::Break);
        assert_eq!(h.controller.view().timer_break, "00:00:12");

        h.emit("session-cancelled", Value::Null).await;
        let view = h.controller.view();
        assert_eq!(view.state, SessionState::Waiting);
        assert_eq!(view.timer_break, "00:00:20");
        assert_eq!(view.title_key, TITLE_START);
        assert_eq!(h.host.commands(), vec!["start_session", "start_session", "cancel_session"]);
    }

    #[tokio::test]
    async fn test_completion_queued_behind_cancel_does_not_launch() {
        let mut h = harness();
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        h.controller.toggle_session().await.unwrap();
        h.emit("session-completed", Value::Null).await;

        assert_eq!(h.controller.state(), SessionState::Waiting);
        assert_eq!(h.host.commands(), vec!["start_session", "cancel_session"]);

        h.emit("session-cancelled", Value::Null).await;
        assert_eq!(h.controller.state(), SessionState::Waiting);

        h.controller.toggle_session().await.unwrap();
        h.emit("session-completed", Value::Null).await;
        assert_eq!(h.controller.state(), SessionState::Break);
    }

    #[tokio::test]
    async fn test_completion_alternates_work_and_break() {
        let mut h = harness();
        h.settings.send_modify(|s| s.break_time = "00:05:00".to_string());
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        let mut visited = Vec::new();
        for _ in 0..4 {
            h.emit("session-completed", Value::Null).await;
            visited.push(h.controller.state());
        }

        assert_eq!(
            visited,
            vec![
                SessionState::Break,
                SessionState::Work,
                SessionState::Break,
                SessionState::Work
            ]
        );
        assert_eq!(
            h.start_durations(),
            vec![
                json!("00:20:00"),
                json!("00:05:00"),
                json!("00:20:00"),
                json!("00:05:00"),
                json!("00:20:00")
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_rounds_to_nearest() {
        let mut h = harness();
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        h.emit("session-progress", json!(42.6)).await;

        assert_eq!(h.controller.view().progress, 43);
    }

    #[tokio::test]
    async fn test_events_while_waiting_are_dropped() {
        let mut h = harness();
        h.init().await;

        h.emit("session-progress", json!(50)).await;
        h.emit("session-time-progress", json!("00:00:05")).await;
        h.emit("session-completed", Value::Null).await;

        let view = h.controller.view();
        assert_eq!(view.state, SessionState::Waiting);
        assert_eq!(view.progress, 0);
        assert_eq!(view.timer_work, "00:20:00");
        assert_eq!(view.timer_break, "00:00:20");
        assert!(h.host.commands().is_empty());
    }

    #[tokio::test]
    async fn test_time_progress_updates_active_display() {
        let mut h = harness();
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        h.emit("session-time-progress", json!("00:19:59")).await;
        assert_eq!(h.controller.view().timer_work, "00:19:59");

        h.emit("session-completed", Value::Null).await;
        h.emit("session-time-progress", json!("00:00:19")).await;
        let view = h.controller.view();
        assert_eq!(view.timer_break, "00:00:19");
        assert_eq!(view.timer_work, "00:20:00");
    }

    #[tokio::test]
    async fn test_rejected_start_returns_to_waiting() {
        let mut h = harness();
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        h.emit("session-started", json!(false)).await;

        assert_eq!(h.controller.state(), SessionState::Waiting);
        assert_eq!(h.host.listener_count("session-started"), 0);
    }

    #[tokio::test]
    async fn test_reinitialize_does_not_duplicate_listeners() {
        let mut h = harness();
        h.init().await;
        h.init().await;

        for kind in EventKind::LIFECYCLE {
            assert_eq!(h.host.listener_count(kind.as_str()), 1, "{kind}");
        }

        h.controller.toggle_session().await.unwrap();
        h.emit("session-completed", Value::Null).await;
        assert_eq!(h.controller.state(), SessionState::Break);
    }

    #[tokio::test]
    async fn test_initialize_survives_failures() {
        let mut notifier = MockNotifier::new();
        notifier.expect_permission_granted().returning(|| false);
        notifier.expect_request_permission().returning(|| Ok(false));
        let mut shell = MockShell::new();
        shell
            .expect_install_menu()
            .returning(|_| Err(crate::features::effects::EffectError::Window("no tray".into())));
        let mut h = harness_with(notifier, quiet_audio(), shell);

        h.init().await;

        let view = h.controller.view();
        assert_eq!(view.timer_work, "00:20:00");
        assert_eq!(view.timer_break, "00:00:20");
        assert_eq!(h.host.listener_count("session-completed"), 1);
    }

    #[tokio::test]
    async fn test_break_runs_side_effects() {
        let mut notifier = MockNotifier::new();
        notifier.expect_permission_granted().returning(|| true);
        notifier
            .expect_send()
            .withf(|title, body| title == "Break" && body == "It's time to rest your eyes")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut audio = MockAudioPlayer::new();
        audio.expect_rewind().return_const(());
        audio.expect_play().with(eq(Sound::Welcome)).times(1).returning(|_| Ok(()));
        audio.expect_play().with(eq(Sound::Break)).times(1).returning(|_| Ok(()));
        let mut shell = MockShell::new();
        shell.expect_install_menu().returning(|_| Ok(()));
        shell.expect_show().times(1).returning(|| Ok(()));
        let mut h = harness_with(notifier, audio, shell);
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        h.emit("session-completed", Value::Null).await;

        assert_eq!(h.controller.state(), SessionState::Break);
    }

    #[tokio::test]
    async fn test_dispatch_failure_propagates() {
        let mut h = harness();
        h.init().await;
        *h.host.fail_with.lock().unwrap() = Some(EngineError::Unavailable);

        let err = h.controller.toggle_session().await.unwrap_err();

        assert!(matches!(err, BridgeError::Dispatch { command: "start_session", .. }));
        assert_eq!(h.controller.state(), SessionState::Waiting);
    }

    #[tokio::test]
    async fn test_settings_change_refreshes_idle_timers_only() {
        let mut h = harness();
        h.init().await;

        h.settings.send_modify(|s| s.work_time = "00:30:00".to_string());
        h.controller.on_settings_changed();
        assert_eq!(h.controller.view().timer_work, "00:30:00");

        h.controller.toggle_session().await.unwrap();
        h.emit("session-time-progress", json!("00:29:59")).await;
        h.settings.send_modify(|s| s.work_time = "00:45:00".to_string());
        h.controller.on_settings_changed();
        assert_eq!(h.controller.view().timer_work, "00:29:59");
        assert_eq!(h.start_durations(), vec![json!("00:30:00")]);
    }

    #[tokio::test]
    async fn test_settings_panel_flags() {
        let mut h = harness();
        h.controller.show_settings();
        assert!(h.controller.view().show_settings);
        h.controller.close_settings();
        assert!(!h.controller.view().show_settings);
        assert_eq!(h.controller.state(), SessionState::Waiting);
    }

    #[tokio::test]
    async fn test_menu_quit_dispatches_exit() {
        let mut h = harness();
        h.init().await;

        h.controller.handle_input(Input::Menu(MenuAction::Quit)).await.unwrap();

        assert_eq!(h.host.commands(), vec!["exit_app"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_message_is_revealed() {
        let mut h = harness();
        h.init().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        h.settle().await;

        assert_eq!(h.controller.view().current_message, "Waiting to start");
    }

    #[tokio::test(start_paused = true)]
    async fn test_language_change_applies_to_next_reveal() {
        let mut h = harness();
        h.init().await;
        h.settings.send_modify(|s| s.language = crate::config::Language::Es);

        h.controller.toggle_session().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        h.settle().await;

        assert_eq!(h.controller.view().current_message, "Enfócate en tu trabajo...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_visibility_timer_hides_app() {
        let mut shell = MockShell::new();
        shell.expect_install_menu().returning(|_| Ok(()));
        shell.expect_hide().times(1).returning(|| Ok(()));
        let mut h = harness_with(quiet_notifier(), quiet_audio(), shell);
        h.init().await;
        h.controller.toggle_session().await.unwrap();

        tokio::time::sleep(VISIBILITY_DELAY + Duration::from_millis(10)).await;
        h.settle().await;

        assert!(!h.controller.view().animated_after_started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_disarms_visibility_timer() {
        let mut shell = MockShell::new();
        shell.expect_install_menu().returning(|_| Ok(()));
        shell.expect_hide().never();
        let mut h = harness_with(quiet_notifier(), quiet_audio(), shell);
        h.init().await;
        h.controller.toggle_session().await.unwrap();
        h.emit("session-cancelled", Value::Null).await;

        tokio::time::sleep(VISIBILITY_DELAY * 2).await;
        h.settle().await;

        assert!(!h.controller.view().animated_after_started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_as_countdown_ends_leaves_engine_idle() {
        let (_settings, rx) = watch::channel(AppSettings {
            work_time: "00:00:01".to_string(),
            break_time: "00:00:30".to_string(),
            message_animation_delay: 0,
            ..AppSettings::default()
        });
        let engine = LocalEngine::new();
        let ctx = AppContext::new(
            rx,
            Arc::new(engine.clone()),
            Arc::new(quiet_notifier()),
            Arc::new(quiet_audio()),
            Arc::new(quiet_shell()),
        );
        let (mut controller, _handle) = SessionController::new(ctx);
        controller.initialize().await;
        controller.toggle_session().await.unwrap();

        // the countdown finishes; its completion waits in the queue
        tokio::time::sleep(Duration::from_millis(1150)).await;
        assert!(!engine.is_running());
        controller.toggle_session().await.unwrap();

        while let Ok(input) = controller.inputs.try_recv() {
            controller.handle_input(input).await.unwrap();
        }
        assert_eq!(controller.state(), SessionState::Waiting);
        assert!(!engine.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        while let Ok(input) = controller.inputs.try_recv() {
            controller.handle_input(input).await.unwrap();
        }
        let view = controller.view();
        assert_eq!(view.state, SessionState::Waiting);
        assert_eq!(view.progress, 0);
        assert!(!engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_with_local_engine() {
        let (settings, rx) = watch::channel(AppSettings {
            work_time: "00:00:02".to_string(),
            break_time: "00:00:01".to_string(),
            message_animation_delay: 0,
            ..AppSettings::default()
        });
        let engine = LocalEngine::new();
        let ctx = AppContext::new(
            rx,
            Arc::new(engine.clone()),
            Arc::new(quiet_notifier()),
            Arc::new(quiet_audio()),
            Arc::new(quiet_shell()),
        );
        let (controller, handle) = SessionController::new(ctx);
        let task = tokio::spawn(controller.run());

        handle.toggle();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.view().state, SessionState::Work);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.view().state, SessionState::Break);

        handle.toggle();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let view = handle.view();
        assert_eq!(view.state, SessionState::Waiting);
        assert_eq!(view.timer_work, "00:00:02");
        assert_eq!(view.timer_break, "00:00:01");

        handle.shutdown();
        task.await.unwrap();
        assert!(handle.is_closed());
        drop(settings);
    }
}
