// Message types: the JSON contract with the evaluation service, the
// classified outcome of each call, and the channel messages exchanged between
// the app orchestrator and the UI.

use serde::{Deserialize, Serialize};

use crate::evaluation::{Analysis, Evaluation, FragmentDetails};
use crate::modal::{CloseReason, ModalId};
use crate::page::Page;

/// Shown for transport and decode failures on every endpoint.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";
pub const CHECK_FALLBACK_MESSAGE: &str = "An error occurred";
pub const CHANNEL_FALLBACK_MESSAGE: &str = "Failed to create channel";
pub const SET_USERNAME_FALLBACK_MESSAGE: &str = "Failed to set username";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of all three POST endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    pub username: String,
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Fields every endpoint may return.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<bool>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// `/check-username` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CheckResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub usage_count: Option<u32>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub fragment_auction: Option<bool>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub fragment_details: Option<FragmentDetails>,
}

/// `/create-channel` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChannelResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub channel_link: Option<String>,
}

/// `/set-username` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetUsernameResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
}

/// Success payload of a check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub evaluation: Evaluation,
    pub usage_count: Option<u32>,
}

/// Success payload of a channel creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCreated {
    pub channel_link: String,
}

/// A decoded response that can be classified into an [`ApiOutcome`].
pub trait ApiResponse {
    type Payload;

    fn envelope(&self) -> &Envelope;

    /// Extract the success payload. `Err` means the server claimed success
    /// but the body is unusable.
    fn into_payload(self) -> Result<Self::Payload, String>;
}

impl ApiResponse for CheckResponse {
    type Payload = CheckResult;

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn into_payload(self) -> Result<CheckResult, String> {
        let analysis = self
            .analysis
            .ok_or_else(|| "check response is missing `analysis`".to_string())?;
        let evaluation = Evaluation::select(
            self.fragment_auction.unwrap_or(false),
            self.available.unwrap_or(false),
            self.fragment_details,
            analysis,
        );
        Ok(CheckResult {
            evaluation,
            usage_count: self.usage_count,
        })
    }
}

impl ApiResponse for ChannelResponse {
    type Payload = ChannelCreated;

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn into_payload(self) -> Result<ChannelCreated, String> {
        self.channel_link
            .filter(|l| !l.is_empty())
            .map(|channel_link| ChannelCreated { channel_link })
            .ok_or_else(|| "channel response is missing `channel_link`".to_string())
    }
}

impl ApiResponse for SetUsernameResponse {
    type Payload = ();

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn into_payload(self) -> Result<(), String> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one backend call after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Ok(T),
    /// `success: false` without a redirect. Carries the message to show.
    BusinessError(String),
    /// Navigate to this URL and do nothing else.
    Redirect(String),
    /// Network, HTTP or decode failure. Carries a diagnostic for the log;
    /// the user sees [`NETWORK_ERROR_MESSAGE`].
    TransportError(String),
}

/// Classify a decoded response.
///
/// A redirect instruction outranks everything, including `success: true`.
/// A redirect flag without a target URL is ignored.
pub fn classify<R: ApiResponse>(response: R, fallback: &str) -> ApiOutcome<R::Payload> {
    let envelope = response.envelope();
    if envelope.redirect == Some(true) {
        if let Some(url) = envelope.redirect_url.as_deref().filter(|u| !u.is_empty()) {
            return ApiOutcome::Redirect(url.to_string());
        }
    }

    if !envelope.success {
        let message = envelope
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string();
        return ApiOutcome::BusinessError(message);
    }

    match response.into_payload() {
        Ok(payload) => ApiOutcome::Ok(payload),
        Err(reason) => ApiOutcome::TransportError(reason),
    }
}

// ---------------------------------------------------------------------------
// App <-> UI channel messages
// ---------------------------------------------------------------------------

/// Where a navigation should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Replace the current page (server redirect).
    SameWindow,
    /// Open alongside the current page (marketplace links).
    NewTab,
}

/// Updates pushed from the app orchestrator to the UI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full page model after a change.
    Page(Box<Page>),
    Navigate {
        url: String,
        target: NavigationTarget,
    },
}

/// User actions sent from the UI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Raw input text after a keystroke.
    InputChanged(String),
    /// Input focus gained (`true`) or lost.
    FocusInput(bool),
    Submit,
    CreateChannel,
    OpenSetUsername,
    ConfirmSetUsername,
    MakeOffer,
    ViewFragment,
    CloseModal(ModalId, CloseReason),
    /// A click on a modal's overlay. `on_backdrop` is false when the click
    /// landed inside the dialog box.
    ModalClick {
        modal: ModalId,
        on_backdrop: bool,
    },
    Escape,
    DismissNotification(u64),
    Quit,
}
