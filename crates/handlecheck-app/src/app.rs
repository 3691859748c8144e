// Application state and request orchestration.
//
// The event loop owns the page model and every timer. Backend calls run in
// spawned tasks that only do I/O and report back through the api channel, so
// state is mutated from one place. Timers are deadlines stored in state and
// evaluated on each frame tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use handlecheck_core::animate::Animator;
use handlecheck_core::config::{Config, Timings};
use handlecheck_core::cycles::{LoadingCycle, PlaceholderRotation};
use handlecheck_core::modal::{CloseReason, ModalId};
use handlecheck_core::notify::{NotificationCenter, NotificationKind};
use handlecheck_core::page::{Control, Page, SlotContent, SlotId, ViewState};
use handlecheck_core::protocol::{
    ActionRequest, ApiOutcome, ChannelCreated, CheckResult, UiUpdate, UserCommand,
    CHANNEL_FALLBACK_MESSAGE, CHECK_FALLBACK_MESSAGE, NETWORK_ERROR_MESSAGE,
    SET_USERNAME_FALLBACK_MESSAGE,
};
use handlecheck_core::render::{handle_label, render_evaluation};
use handlecheck_core::validate::{sanitize_live, validate, InputHint};

use crate::backend::{into_outcome, UsernameBackend};
use crate::navigator::Navigator;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Frame clock driving animations and timers (about 60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Marketplace page for a username; the username is appended.
pub const FRAGMENT_USERNAME_URL: &str = "https://fragment.com/username/";

pub const CHANNEL_CREATED_MESSAGE: &str = "Channel created successfully!";
pub const USERNAME_UPDATED_MESSAGE: &str = "Username updated successfully!";
pub const MAKE_OFFER_MESSAGE: &str = "Redirecting to Fragment marketplace...";
pub const VIEW_FRAGMENT_MESSAGE: &str = "Opening Fragment marketplace...";

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The username every secondary workflow acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Set by each successful check.
    pub username: String,
    /// Set when a Fragment result is rendered.
    pub fragment_url: String,
}

impl Selection {
    /// Link opened by "view on Fragment".
    pub fn marketplace_url(&self) -> String {
        if self.fragment_url.is_empty() {
            format!("{FRAGMENT_USERNAME_URL}{}", self.username)
        } else {
            self.fragment_url.clone()
        }
    }
}

/// Completion of a spawned backend call. Each carries the username that was
/// sent so the result is applied to what was actually asked.
#[derive(Debug)]
pub enum ApiEvent {
    Check {
        username: String,
        outcome: ApiOutcome<CheckResult>,
    },
    CreateChannel {
        username: String,
        outcome: ApiOutcome<ChannelCreated>,
    },
    SetUsername {
        username: String,
        outcome: ApiOutcome<()>,
    },
}

/// Whether the event loop keeps running after a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A successful check waiting out the reveal delay.
#[derive(Debug)]
struct PendingReveal {
    due: Instant,
    username: String,
    result: CheckResult,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub page: Page,
    pub selection: Selection,
    pub animator: Animator,
    /// Running loading-message cycle. `None` whenever the loading view is
    /// not showing.
    pub loading: Option<LoadingCycle>,
    pub placeholder: PlaceholderRotation,
    pending_reveals: Vec<PendingReveal>,
    backend: Arc<dyn UsernameBackend>,
    navigator: Arc<dyn Navigator>,
    /// Cloned into every spawned request task.
    api_tx: mpsc::Sender<ApiEvent>,
    /// Page changed since it was last published.
    dirty: bool,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn UsernameBackend>,
        navigator: Arc<dyn Navigator>,
        api_tx: mpsc::Sender<ApiEvent>,
        now: Instant,
    ) -> Self {
        let page = Page {
            notifications: NotificationCenter::new(&config.timing),
            ..Page::default()
        };
        let placeholder = PlaceholderRotation::new(now, config.timing.placeholder());

        AppState {
            config,
            page,
            selection: Selection::default(),
            animator: Animator::default(),
            loading: None,
            placeholder,
            pending_reveals: Vec::new(),
            backend,
            navigator,
            api_tx,
            dirty: true,
        }
    }

    fn timing(&self) -> Timings {
        self.config.timing
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    #[cfg(test)]
    fn has_pending_reveal(&self) -> bool {
        !self.pending_reveals.is_empty()
    }

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        self.page.notifications.notify(message, kind, now);
        self.dirty = true;
    }

    fn request_for(&self, username: &str) -> ActionRequest {
        ActionRequest {
            username: username.to_string(),
            user_id: self.config.user_id().to_string(),
        }
    }

    // --- loading view ---

    fn show_loading(&mut self, now: Instant) {
        let cycle = LoadingCycle::start(now, self.timing().loading_step());
        self.page
            .surface
            .set_text(SlotId::LoadingMessage, cycle.message_at(now));
        self.loading = Some(cycle);
        self.page.view = ViewState::Loading;
        self.dirty = true;
    }

    /// Stop the loading cycle. A result that is already showing stays.
    fn hide_loading(&mut self) {
        self.loading = None;
        if self.page.view == ViewState::Loading {
            self.page.view = ViewState::Idle;
        }
        self.dirty = true;
    }

    // --- check ---

    /// Validate the input and start a check.
    pub fn submit(&mut self, now: Instant) {
        if !self.page.controls.is_enabled(Control::Submit) {
            debug!("Submit ignored: a check is already in flight");
            return;
        }

        let username = match validate(&self.page.input.text) {
            Ok(username) => username,
            Err(e) => {
                debug!("Rejected input: {}", e);
                self.notify(e.to_string(), NotificationKind::Error, now);
                return;
            }
        };

        self.page.controls.set_enabled(Control::Submit, false);
        self.show_loading(now);

        let request = self.request_for(username.as_str());
        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        info!("Checking username {}", username);

        tokio::spawn(async move {
            let outcome = into_outcome(
                backend.check_username(&request).await,
                CHECK_FALLBACK_MESSAGE,
            );
            let event = ApiEvent::Check {
                username: request.username,
                outcome,
            };
            if tx.send(event).await.is_err() {
                debug!("Event loop gone, dropping check result");
            }
        });
    }

    /// Apply a due reveal: render the result and start its count-ups.
    fn reveal(&mut self, pending: PendingReveal, now: Instant) {
        self.hide_loading();

        let rendered = render_evaluation(
            &pending.result.evaluation,
            &pending.username,
            &mut self.page.surface,
        );
        // The selection follows the card on screen, not the latest response.
        self.selection.username = pending.username.clone();
        if let Some(url) = rendered.fragment_url {
            self.selection.fragment_url = url;
        }
        self.page.view = ViewState::Result(rendered.view);

        let duration = self.timing().animation();
        for request in rendered.animations {
            self.animator.start(request, now, duration);
        }

        if let Some(count) = pending.result.usage_count {
            self.page.surface.set_text(
                SlotId::UsageCount,
                format!("{}/{}", count, self.config.ui.usage_limit),
            );
        }
        self.page.checked_at = Some(Local::now());
        info!("Revealed {:?} for {}", rendered.view, pending.username);
    }

    // --- create channel ---

    pub fn create_channel(&mut self) {
        if !self.page.controls.is_enabled(Control::CreateChannel) {
            debug!("Create channel ignored: already in flight");
            return;
        }
        self.page.controls.set_enabled(Control::CreateChannel, false);
        self.dirty = true;

        let request = self.request_for(&self.selection.username);
        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        info!("Creating channel for {}", request.username);

        tokio::spawn(async move {
            let outcome = into_outcome(
                backend.create_channel(&request).await,
                CHANNEL_FALLBACK_MESSAGE,
            );
            let event = ApiEvent::CreateChannel {
                username: request.username,
                outcome,
            };
            if tx.send(event).await.is_err() {
                debug!("Event loop gone, dropping channel result");
            }
        });
    }

    // --- set username ---

    pub fn open_set_username(&mut self) {
        self.page.surface.set_text(
            SlotId::ConfirmUsername,
            handle_label(&self.selection.username),
        );
        self.page.modals.open(ModalId::UsernameConfirm);
        self.dirty = true;
    }

    pub fn confirm_set_username(&mut self) {
        if !self.page.controls.is_enabled(Control::ConfirmUsername) {
            debug!("Set username ignored: already in flight");
            return;
        }
        self.page.controls.set_enabled(Control::ConfirmUsername, false);
        self.dirty = true;

        let request = self.request_for(&self.selection.username);
        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        info!("Setting username to {}", request.username);

        tokio::spawn(async move {
            let outcome = into_outcome(
                backend.set_username(&request).await,
                SET_USERNAME_FALLBACK_MESSAGE,
            );
            let event = ApiEvent::SetUsername {
                username: request.username,
                outcome,
            };
            if tx.send(event).await.is_err() {
                debug!("Event loop gone, dropping set-username result");
            }
        });
    }

    // --- event handlers ---

    /// Handle one user command from the UI.
    pub async fn handle_command(&mut self, cmd: UserCommand, now: Instant) -> Flow {
        match cmd {
            UserCommand::InputChanged(raw) => {
                let text = sanitize_live(&raw);
                self.page.input.hint = InputHint::for_len(text.chars().count());
                self.page.input.text = text;
                self.dirty = true;
            }
            UserCommand::FocusInput(focused) => {
                self.page.input.focused = focused;
                self.dirty = true;
            }
            UserCommand::Submit => self.submit(now),
            UserCommand::CreateChannel => self.create_channel(),
            UserCommand::OpenSetUsername => self.open_set_username(),
            UserCommand::ConfirmSetUsername => self.confirm_set_username(),
            UserCommand::MakeOffer => {
                let url = format!("{FRAGMENT_USERNAME_URL}{}", self.selection.username);
                self.navigator.open_external(&url).await;
                self.notify(MAKE_OFFER_MESSAGE, NotificationKind::Info, now);
            }
            UserCommand::ViewFragment => {
                let url = self.selection.marketplace_url();
                self.navigator.open_external(&url).await;
                self.notify(VIEW_FRAGMENT_MESSAGE, NotificationKind::Info, now);
            }
            UserCommand::CloseModal(id, reason) => {
                self.dirty |= self.page.modals.close(id, reason);
            }
            UserCommand::ModalClick { modal, on_backdrop } => {
                self.dirty |= self.page.modals.click(modal, on_backdrop);
            }
            UserCommand::Escape => {
                let closed = self.page.modals.close_all_open();
                if !closed.is_empty() {
                    debug!("Escape closed {:?}", closed);
                    self.dirty = true;
                }
            }
            UserCommand::DismissNotification(id) => {
                self.dirty |= self.page.notifications.dismiss(id);
            }
            UserCommand::Quit => {
                info!("Quit command received, shutting down");
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Apply the terminal effects of a completed backend call.
    pub async fn handle_api_event(&mut self, event: ApiEvent, now: Instant) -> Flow {
        self.dirty = true;
        match event {
            ApiEvent::Check { username, outcome } => {
                self.page.controls.set_enabled(Control::Submit, true);
                match outcome {
                    ApiOutcome::Ok(result) => {
                        self.pending_reveals.push(PendingReveal {
                            due: now + self.timing().reveal_delay(),
                            username,
                            result,
                        });
                    }
                    ApiOutcome::Redirect(url) => {
                        self.hide_loading();
                        return self.redirect(&url).await;
                    }
                    ApiOutcome::BusinessError(message) => {
                        self.hide_loading();
                        info!("Check for {} refused: {}", username, message);
                        self.notify(message, NotificationKind::Error, now);
                    }
                    ApiOutcome::TransportError(_) => {
                        self.hide_loading();
                        self.notify(NETWORK_ERROR_MESSAGE, NotificationKind::Error, now);
                    }
                }
            }
            ApiEvent::CreateChannel { username, outcome } => {
                self.page.controls.set_enabled(Control::CreateChannel, true);
                match outcome {
                    ApiOutcome::Ok(created) => {
                        let surface = &mut self.page.surface;
                        surface.set_text(SlotId::CreatedChannelName, handle_label(&username));
                        surface.set(SlotId::ChannelLink, SlotContent::Link(created.channel_link));
                        self.page.modals.open(ModalId::ChannelCreated);
                        info!("Channel created for {}", username);
                        self.notify(CHANNEL_CREATED_MESSAGE, NotificationKind::Success, now);
                    }
                    ApiOutcome::Redirect(url) => return self.redirect(&url).await,
                    ApiOutcome::BusinessError(message) => {
                        self.notify(message, NotificationKind::Error, now);
                    }
                    ApiOutcome::TransportError(_) => {
                        self.notify(NETWORK_ERROR_MESSAGE, NotificationKind::Error, now);
                    }
                }
            }
            ApiEvent::SetUsername { username, outcome } => {
                self.page.controls.set_enabled(Control::ConfirmUsername, true);
                match outcome {
                    ApiOutcome::Ok(()) => {
                        self.page
                            .modals
                            .close(ModalId::UsernameConfirm, CloseReason::Completed);
                        self.page
                            .surface
                            .set_text(SlotId::NewUsername, handle_label(&username));
                        self.page.modals.open(ModalId::UsernameSuccess);
                        info!("Username set to {}", username);
                        self.notify(USERNAME_UPDATED_MESSAGE, NotificationKind::Success, now);
                    }
                    ApiOutcome::Redirect(url) => return self.redirect(&url).await,
                    ApiOutcome::BusinessError(message) => {
                        self.notify(message, NotificationKind::Error, now);
                    }
                    ApiOutcome::TransportError(_) => {
                        self.notify(NETWORK_ERROR_MESSAGE, NotificationKind::Error, now);
                    }
                }
            }
        }
        Flow::Continue
    }

    /// Leave the page. Nothing else happens after a redirect.
    async fn redirect(&mut self, url: &str) -> Flow {
        warn!("Backend requested redirect to {}", url);
        self.navigator.navigate(url).await;
        Flow::Exit
    }

    /// Advance every timer to `now`. Returns whether the page changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.pending_reveals.iter().any(|p| p.due <= now) {
            let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_reveals)
                .into_iter()
                .partition(|p| p.due <= now);
            self.pending_reveals = waiting;
            for pending in due {
                self.reveal(pending, now);
            }
            changed = true;
        }

        if let Some(cycle) = self.loading {
            let message = cycle.message_at(now);
            if self.page.surface.text(SlotId::LoadingMessage) != message {
                self.page.surface.set_text(SlotId::LoadingMessage, message);
                changed = true;
            }
        }

        changed |= self.animator.tick(now, &mut self.page.surface);
        changed |= self.page.notifications.tick(now);

        let input = &self.page.input;
        if let Some(text) = self
            .placeholder
            .tick(now, input.focused, input.text.is_empty())
        {
            self.page.input.placeholder = text.to_string();
            changed = true;
        }

        self.dirty |= changed;
        changed
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Multiplexes user commands, backend completions and the frame clock with
/// `tokio::select!`, and publishes the page to the UI whenever it changed.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<ApiEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // AppState holds a sender, so this only closes if it is dropped
    // elsewhere; stop polling it if that ever happens.
    let mut api_open = true;

    let mut frame = tokio::time::interval(FRAME_INTERVAL);
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let flow = tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => state.handle_command(cmd, Instant::now()).await,
                None => {
                    info!("Command channel closed, shutting down");
                    Flow::Exit
                }
            },

            event = api_rx.recv(), if api_open => match event {
                Some(event) => state.handle_api_event(event, Instant::now()).await,
                None => {
                    info!("Api channel closed");
                    api_open = false;
                    Flow::Continue
                }
            },

            _ = frame.tick() => {
                state.tick(Instant::now());
                Flow::Continue
            }
        };

        if flow == Flow::Exit {
            break;
        }

        if state.take_dirty() {
            let page = Box::new(state.page.clone());
            if ui_tx.send(UiUpdate::Page(page)).await.is_err() {
                info!("UI channel closed, shutting down");
                break;
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}
