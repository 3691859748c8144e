// HTTP client for the username evaluation service.
//
// All three endpoints take the same JSON body and answer with a JSON envelope.
// The service reports business failures with `success: false`, sometimes
// alongside a 4xx status, so the body is decoded before the status is judged.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use handlecheck_core::config::ServerConfig;
use handlecheck_core::protocol::{
    classify, ActionRequest, ApiOutcome, ApiResponse, ChannelResponse, CheckResponse,
    SetUsernameResponse,
};

pub const CHECK_ENDPOINT: &str = "check-username";
pub const CREATE_CHANNEL_ENDPOINT: &str = "create-channel";
pub const SET_USERNAME_ENDPOINT: &str = "set-username";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid base url `{url}`: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The evaluation service as seen by the orchestrator.
#[async_trait]
pub trait UsernameBackend: Send + Sync {
    async fn check_username(&self, request: &ActionRequest) -> Result<CheckResponse, BackendError>;

    async fn create_channel(&self, request: &ActionRequest)
        -> Result<ChannelResponse, BackendError>;

    async fn set_username(
        &self,
        request: &ActionRequest,
    ) -> Result<SetUsernameResponse, BackendError>;
}

/// Classify a backend result. Transport failures are logged here so every
/// workflow reports them the same way.
pub fn into_outcome<R: ApiResponse>(
    result: Result<R, BackendError>,
    fallback: &str,
) -> ApiOutcome<R::Payload> {
    match result {
        Ok(response) => match classify(response, fallback) {
            ApiOutcome::TransportError(reason) => {
                warn!("Unusable response from backend: {}", reason);
                ApiOutcome::TransportError(reason)
            }
            other => other,
        },
        Err(e) => {
            warn!("Backend call failed: {}", e);
            ApiOutcome::TransportError(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> Result<Self, BackendError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(HttpBackend { http, base_url })
    }

    #[cfg(test)]
    fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Result<Self, BackendError> {
        let base_url = parse_base_url(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpBackend { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &'static str) -> Result<Url, BackendError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| BackendError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                message: e.to_string(),
            })
    }

    async fn post<R: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: &ActionRequest,
    ) -> Result<R, BackendError> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, username = %request.username, "POST");

        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<R>(&body) {
            Ok(decoded) => Ok(decoded),
            Err(_) if !status.is_success() => Err(BackendError::Status { endpoint, status }),
            Err(source) => Err(BackendError::Decode { endpoint, source }),
        }
    }
}

/// Parse the configured origin. A trailing slash is added so endpoint names
/// are joined under any path prefix instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, BackendError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| BackendError::InvalidBaseUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(BackendError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "not a base url".to_string(),
        });
    }
    Ok(url)
}

#[async_trait]
impl UsernameBackend for HttpBackend {
    async fn check_username(&self, request: &ActionRequest) -> Result<CheckResponse, BackendError> {
        self.post(CHECK_ENDPOINT, request).await
    }

    async fn create_channel(
        &self,
        request: &ActionRequest,
    ) -> Result<ChannelResponse, BackendError> {
        self.post(CREATE_CHANNEL_ENDPOINT, request).await
    }

    async fn set_username(
        &self,
        request: &ActionRequest,
    ) -> Result<SetUsernameResponse, BackendError> {
        self.post(SET_USERNAME_ENDPOINT, request).await
    }
}
