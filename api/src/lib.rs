//! HTTP client for the remote thought board.
//!
//! One [`ApiClient`] per process is the expected shape: it owns a pooled
//! `reqwest::Client` with bounded connect and whole-request timeouts, so a
//! dead network fails fast instead of hanging callers.
//!
//! The verbs here are deliberately thin. Every endpoint sends, checks the
//! status, and decodes a small body shape from [`wire`]; interpretation
//! (optimistic counts, in-flight guards, list surgery) belongs to the
//! board layer upstream.

mod error;
mod wire;

pub use error::ApiError;
pub use wire::ThoughtUpdate;

use std::time::Duration;

use chirp_types::{Draft, Thought, ThoughtId};
use reqwest::Response;
use serde_json::json;
use url::Url;

/// Hosted API the client points at when not configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://happy-thoughts-api-5hw3.onrender.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Connection settings for [`ApiClient::new`].
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    /// Whole-request ceiling, connect through body.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Client for the thought-board REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
        })
    }

    /// GET /thoughts. The full list, newest first as the server orders it.
    pub async fn fetch_thoughts(&self) -> Result<Vec<Thought>, ApiError> {
        let response = self.http.get(self.endpoint(&["thoughts"])).send().await?;
        let body = read_success_body(response).await?;
        let envelope: wire::ThoughtsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.into_thoughts())
    }

    /// POST /thoughts. Creates a thought and answers with the stored
    /// entity, ids and timestamps assigned.
    pub async fn create_thought(&self, draft: &Draft, token: &str) -> Result<Thought, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&["thoughts"]))
            .bearer_auth(token)
            .json(&json!({ "message": draft.as_str() }))
            .send()
            .await?;
        let body = read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// PATCH /thoughts/:id/like. Registers one like. No auth: anyone may
    /// heart anything. Returns the echoed count when the body carries one.
    pub async fn like_thought(&self, id: &ThoughtId) -> Result<Option<u32>, ApiError> {
        let response = self
            .http
            .patch(self.endpoint(&["thoughts", id.as_str(), "like"]))
            .send()
            .await?;
        let body = read_success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<wire::LikeBody>(&body) {
            Ok(like) => Ok(like.hearts),
            Err(e) => {
                tracing::debug!("unrecognized like response shape, ignoring body: {e}");
                Ok(None)
            }
        }
    }

    /// PATCH /thoughts/:id. Rewrites a message. The echo may restate the
    /// stored message and the edit timestamp.
    pub async fn update_thought(
        &self,
        id: &ThoughtId,
        draft: &Draft,
        token: &str,
    ) -> Result<ThoughtUpdate, ApiError> {
        let response = self
            .http
            .patch(self.endpoint(&["thoughts", id.as_str()]))
            .bearer_auth(token)
            .json(&json!({ "message": draft.as_str() }))
            .send()
            .await?;
        let body = read_success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(ThoughtUpdate::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// DELETE /thoughts/:id. Status-only response.
    pub async fn delete_thought(&self, id: &ThoughtId, token: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&["thoughts", id.as_str()]))
            .bearer_auth(token)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// POST /users/login. Exchanges credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.authenticate("login", email, password).await
    }

    /// POST /users/register. Creates an account and answers with a token,
    /// so registering doubles as a first login.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.authenticate("register", email, password).await
    }

    async fn authenticate(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&["users", action]))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body = read_success_body(response).await?;
        let token: wire::TokenBody = serde_json::from_str(&body)?;
        Ok(token.token)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Only cannot-be-a-base URLs lack segments, and those never get
        // past Url::parse for an http(s) origin.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Resolve a response into its body text, mapping non-success statuses
/// to [`ApiError::Rejected`] with the reason pulled out of the body.
async fn read_success_body(response: Response) -> Result<String, ApiError> {
    let response = ensure_success(response).await?;
    Ok(response.text().await?)
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = read_capped_body(response).await;
    let message = wire::rejection_reason(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request rejected")
                .to_owned()
        } else {
            body
        }
    });
    Err(ApiError::Rejected { status, message })
}

/// Read a rejection body, capped so a misbehaving server cannot balloon
/// the error message the user eventually sees.
async fn read_capped_body(response: Response) -> String {
    match response.text().await {
        Ok(mut body) => {
            if body.len() > MAX_ERROR_BODY_BYTES {
                let mut end = MAX_ERROR_BODY_BYTES;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
                body.push_str("...(truncated)");
            }
            body
        }
        Err(e) => {
            tracing::debug!("could not read rejection body: {e}");
            String::new()
        }
    }
}
