use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::UserId;

/// Identity claims the client reads out of a bearer token.
///
/// Only the payload segment is decoded. The signature is never checked
/// client-side; the server re-verifies the token on every request, so a
/// forged payload buys nothing beyond a misrendered username.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// The account the token was signed for. API revisions have named
    /// this field `userId`, `sub`, `id`, and `_id`.
    #[serde(
        default,
        rename = "userId",
        alias = "sub",
        alias = "id",
        alias = "_id"
    )]
    pub user_id: Option<UserId>,
    /// Expiry as Unix seconds, when the token carries one.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// Decode the payload segment of `token`.
    ///
    /// Returns `None` when the token does not look like a JWT or the
    /// payload is not base64url-encoded JSON. Callers decide what a
    /// missing identity means; this function never errors loudly.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        // Tolerate encoders that keep the trailing padding.
        let raw = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&raw).ok()
    }

    /// True when an `exp` claim exists and `now` is at or past it.
    /// Tokens without `exp` never expire client-side.
    #[must_use]
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| now.timestamp() >= exp)
    }
}

/// Identity snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub logged_in: bool,
    /// Set when logged in and the token names an account.
    pub user_id: Option<UserId>,
}

impl CurrentUser {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            logged_in: false,
            user_id: None,
        }
    }
}
