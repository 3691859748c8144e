// Event loop integration tests.
//
// Drive `app::run` end to end through its channels with a scripted backend
// and the real UI navigator. Time is paused, so the frame clock, reveal
// delay and notification lifetime all run on the virtual clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use handlecheck_app::app::{self, AppState};
use handlecheck_app::backend::{parse_base_url, BackendError, UsernameBackend};
use handlecheck_app::navigator::UiNavigator;
use handlecheck_core::config::{Config, CredentialsConfig, ServerConfig, Timings, UiConfig};
use handlecheck_core::evaluation::FragmentView;
use handlecheck_core::modal::ModalId;
use handlecheck_core::page::{Page, ResultView, SlotId, ViewState};
use handlecheck_core::protocol::{
    ActionRequest, ChannelResponse, CheckResponse, NavigationTarget, SetUsernameResponse,
    UiUpdate, UserCommand,
};

// ===========================================================================
// Test helpers
// ===========================================================================

const BASE_URL: &str = "http://127.0.0.1:5000";

/// Backend that answers every check with the same JSON body.
struct ScriptedBackend {
    check_body: &'static str,
    channel_body: &'static str,
    checks: Mutex<Vec<ActionRequest>>,
}

impl ScriptedBackend {
    fn new(check_body: &'static str) -> Self {
        ScriptedBackend {
            check_body,
            channel_body: r#"{"success":true,"channel_link":"https://t.me/abcd"}"#,
            checks: Mutex::new(Vec::new()),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> T {
    serde_json::from_str(body).expect("scripted body must decode")
}

#[async_trait]
impl UsernameBackend for ScriptedBackend {
    async fn check_username(&self, request: &ActionRequest) -> Result<CheckResponse, BackendError> {
        self.checks.lock().unwrap().push(request.clone());
        Ok(decode(self.check_body))
    }

    async fn create_channel(
        &self,
        _request: &ActionRequest,
    ) -> Result<ChannelResponse, BackendError> {
        Ok(decode(self.channel_body))
    }

    async fn set_username(
        &self,
        _request: &ActionRequest,
    ) -> Result<SetUsernameResponse, BackendError> {
        Ok(decode(r#"{"success":true}"#))
    }
}

fn inline_config() -> Config {
    Config {
        server: ServerConfig {
            base_url: BASE_URL.into(),
            request_timeout_secs: 5,
        },
        timing: Timings::default(),
        ui: UiConfig::default(),
        credentials: CredentialsConfig {
            user_id: Some("123456789".into()),
        },
    }
}

struct Running {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    handle: JoinHandle<anyhow::Result<()>>,
    backend: Arc<ScriptedBackend>,
}

fn start(check_body: &'static str) -> Running {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (api_tx, api_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let backend = Arc::new(ScriptedBackend::new(check_body));
    let navigator = Arc::new(UiNavigator::new(
        ui_tx.clone(),
        Some(parse_base_url(BASE_URL).unwrap()),
    ));
    let state = AppState::new(
        inline_config(),
        backend.clone(),
        navigator,
        api_tx,
        Instant::now(),
    );
    let handle = tokio::spawn(app::run(cmd_rx, api_rx, ui_tx, state));

    Running {
        cmd_tx,
        ui_rx,
        handle,
        backend,
    }
}

/// Receive pages until one satisfies `pred`. Fails after 30 virtual seconds.
async fn wait_for_page(ui_rx: &mut mpsc::Receiver<UiUpdate>, pred: impl Fn(&Page) -> bool) -> Page {
    let wait = async {
        loop {
            match ui_rx.recv().await {
                Some(UiUpdate::Page(page)) if pred(&page) => return *page,
                Some(_) => continue,
                None => panic!("UI channel closed while waiting for page"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(30), wait)
        .await
        .expect("timed out waiting for page")
}

async fn submit(running: &Running, text: &str) {
    running
        .cmd_tx
        .send(UserCommand::InputChanged(text.into()))
        .await
        .unwrap();
    running.cmd_tx.send(UserCommand::Submit).await.unwrap();
}

async fn quit(running: Running) {
    running.cmd_tx.send(UserCommand::Quit).await.unwrap();
    let result = running.handle.await.unwrap();
    assert!(result.is_ok());
}

const AVAILABLE: &str = r#"{"success":true,"available":true,"fragment_auction":false,
    "fragment_details":{},"usage_count":1,
    "analysis":{"rarity":"Rare","value":120,"confidence":87}}"#;

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn check_reveals_available_result_after_delay() {
    let mut running = start(AVAILABLE);
    submit(&running, "@abcd").await;

    let submitted_at = Instant::now();
    let loading = wait_for_page(&mut running.ui_rx, |p| p.view == ViewState::Loading).await;
    assert_eq!(
        loading.surface.text(SlotId::LoadingMessage),
        "Analyzing username availability..."
    );

    // Submit comes back as soon as the response lands, before the reveal.
    let ready = wait_for_page(&mut running.ui_rx, |p| p.controls.submit).await;
    assert_eq!(ready.view, ViewState::Loading);

    let revealed = wait_for_page(&mut running.ui_rx, |p| {
        p.view == ViewState::Result(ResultView::Available)
    })
    .await;
    assert!(submitted_at.elapsed() >= Duration::from_millis(2000));
    assert_eq!(revealed.surface.text(SlotId::AvailableUsername), "@abcd");
    assert_eq!(revealed.surface.text(SlotId::UsageCount), "1/3");

    let settled = wait_for_page(&mut running.ui_rx, |p| {
        p.surface.text(SlotId::AvailableValue) == "120.0 TON"
    })
    .await;
    assert_eq!(settled.surface.text(SlotId::AvailableConfidence), "87%");

    let checks = running.backend.checks.lock().unwrap().clone();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].username, "abcd");
    assert_eq!(checks[0].user_id, "123456789");

    quit(running).await;
}

#[tokio::test(start_paused = true)]
async fn invalid_username_never_reaches_backend() {
    let mut running = start(AVAILABLE);
    submit(&running, "ab").await;

    let page = wait_for_page(&mut running.ui_rx, |p| p.notifications.current().is_some()).await;
    let toast = page.notifications.current().unwrap();
    assert_eq!(toast.message, "Username must be at least 4 characters long");
    assert_eq!(page.view, ViewState::Idle);

    // The toast slides out and disappears on its own.
    wait_for_page(&mut running.ui_rx, |p| p.notifications.current().is_none()).await;
    assert!(running.backend.checks.lock().unwrap().is_empty());

    quit(running).await;
}

#[tokio::test(start_paused = true)]
async fn redirect_navigates_and_stops_the_loop() {
    let mut running = start(
        r#"{"success":false,"redirect":true,"redirect_url":"/login","message":"Please login first"}"#,
    );
    submit(&running, "abcd").await;

    let navigation = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            match running.ui_rx.recv().await {
                Some(UiUpdate::Navigate { url, target }) => return (url, target),
                Some(UiUpdate::Page(page)) => {
                    assert!(page.notifications.current().is_none());
                }
                None => panic!("UI channel closed before navigation"),
            }
        }
    })
    .await
    .expect("timed out waiting for navigation");

    assert_eq!(navigation.0, "http://127.0.0.1:5000/login");
    assert_eq!(navigation.1, NavigationTarget::SameWindow);

    // The loop ends by itself; no quit needed.
    let result = running.handle.await.unwrap();
    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn fragment_result_then_view_on_marketplace() {
    let mut running = start(
        r#"{"success":true,"available":false,"fragment_auction":true,
            "fragment_details":{"status":"Sold","available":false,"sold_price":500,
                "sold_usd":"1200","fragment_url":"https://fragment.com/username/abcd"},
            "analysis":{"rarity":"Epic","value":90,"confidence":70}}"#,
    );
    submit(&running, "abcd").await;

    let page = wait_for_page(&mut running.ui_rx, |p| {
        p.view == ViewState::Result(ResultView::Fragment(FragmentView::Sold))
    })
    .await;
    assert_eq!(page.surface.text(SlotId::FragmentSoldUsd), "~ $1200");

    running.cmd_tx.send(UserCommand::ViewFragment).await.unwrap();
    let url = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            match running.ui_rx.recv().await {
                Some(UiUpdate::Navigate { url, target }) => {
                    assert_eq!(target, NavigationTarget::NewTab);
                    return url;
                }
                Some(UiUpdate::Page(_)) => continue,
                None => panic!("UI channel closed before navigation"),
            }
        }
    })
    .await
    .expect("timed out waiting for marketplace link");
    assert_eq!(url, "https://fragment.com/username/abcd");

    quit(running).await;
}

#[tokio::test(start_paused = true)]
async fn create_channel_opens_modal_and_escape_closes_it() {
    let mut running = start(AVAILABLE);
    submit(&running, "abcd").await;
    wait_for_page(&mut running.ui_rx, |p| {
        p.view == ViewState::Result(ResultView::Available)
    })
    .await;

    running.cmd_tx.send(UserCommand::CreateChannel).await.unwrap();
    let page = wait_for_page(&mut running.ui_rx, |p| {
        p.modals.is_open(ModalId::ChannelCreated)
    })
    .await;
    assert_eq!(page.surface.text(SlotId::CreatedChannelName), "@abcd");
    assert_eq!(page.surface.text(SlotId::ChannelLink), "https://t.me/abcd");

    running.cmd_tx.send(UserCommand::Escape).await.unwrap();
    wait_for_page(&mut running.ui_rx, |p| !p.modals.any_open()).await;

    quit(running).await;
}
