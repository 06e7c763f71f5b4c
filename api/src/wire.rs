//! Response body shapes for the board API.
//!
//! The hosted API has been redeployed with small shape changes over time,
//! so everything here is lenient: unknown fields are ignored and optional
//! fields default to `None`.

use chirp_types::Thought;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GET /thoughts has shipped in two shapes: an object wrapping the list
/// and a bare array. Accept both so a redeploy does not brick the client.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ThoughtsEnvelope {
    Wrapped { thoughts: Vec<Thought> },
    Bare(Vec<Thought>),
}

impl ThoughtsEnvelope {
    pub(crate) fn into_thoughts(self) -> Vec<Thought> {
        match self {
            Self::Wrapped { thoughts } | Self::Bare(thoughts) => thoughts,
        }
    }
}

/// A like answer may echo the server's heart count. Older revisions
/// answer with an empty body or the whole thought; both parse here.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LikeBody {
    #[serde(default)]
    pub(crate) hearts: Option<u32>,
}

/// Server echo from an edit. Either field may be missing, in which case
/// the caller falls back to what it submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThoughtUpdate {
    /// The message as stored after the edit.
    #[serde(default)]
    pub message: Option<String>,
    /// When the server stamped the edit.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Login and register both answer with a signed bearer token.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenBody {
    pub(crate) token: String,
}

/// Rejection bodies carry their reason under `message` or `error`.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub(crate) fn rejection_reason(body: &str) -> Option<String> {
    let parsed: RejectionBody = serde_json::from_str(body).ok()?;
    parsed.message.or(parsed.error)
}
