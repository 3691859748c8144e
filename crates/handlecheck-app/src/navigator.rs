// Navigation side effects: server redirects and marketplace links.

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::mpsc;
use tracing::{info, warn};

use handlecheck_core::protocol::{NavigationTarget, UiUpdate};

#[async_trait]
pub trait Navigator: Send + Sync {
    /// Leave the current page (server redirect).
    async fn navigate(&self, url: &str);

    /// Open a link alongside the current page.
    async fn open_external(&self, url: &str);
}

/// Forwards navigation to the UI task as `UiUpdate::Navigate`.
pub struct UiNavigator {
    ui_tx: mpsc::Sender<UiUpdate>,
    base: Option<Url>,
}

impl UiNavigator {
    /// `base` is used to resolve relative redirect targets such as `/login`.
    pub fn new(ui_tx: mpsc::Sender<UiUpdate>, base: Option<Url>) -> Self {
        UiNavigator { ui_tx, base }
    }

    async fn send(&self, url: &str, target: NavigationTarget) {
        let url = resolve_url(self.base.as_ref(), url);
        info!("Navigating ({:?}) to {}", target, url);
        if self.ui_tx.send(UiUpdate::Navigate { url, target }).await.is_err() {
            warn!("UI channel closed, navigation dropped");
        }
    }
}

#[async_trait]
impl Navigator for UiNavigator {
    async fn navigate(&self, url: &str) {
        self.send(url, NavigationTarget::SameWindow).await;
    }

    async fn open_external(&self, url: &str) {
        self.send(url, NavigationTarget::NewTab).await;
    }
}

/// Absolute URLs pass through; relative ones are joined onto `base`. Anything
/// that cannot be resolved is returned unchanged.
pub fn resolve_url(base: Option<&Url>, target: &str) -> String {
    if Url::parse(target).is_ok() {
        return target.to_string();
    }
    match base.map(|b| b.join(target)) {
        Some(Ok(url)) => url.to_string(),
        _ => target.to_string(),
    }
}
