use chirp_api::ApiError;
use chirp_store::StoreError;
use chirp_types::DraftError;
use thiserror::Error;

/// Failures surfaced to the presentation layer by board operations.
///
/// Every variant is safe to show to a person. Refusals (`NotLoggedIn`,
/// `InvalidDraft`, `MissingCredentials`, `AlreadyPending`) mean nothing
/// was sent; `Api` means the remote call itself failed and the list was
/// left as it was.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The operation needs an authenticated session.
    #[error("you need to be logged in to do that")]
    NotLoggedIn,

    /// The draft failed validation; nothing reached the network.
    #[error(transparent)]
    InvalidDraft(#[from] DraftError),

    /// Login or signup was called with a blank email or password.
    #[error("email and password are required")]
    MissingCredentials,

    /// The same operation is already in flight for this target.
    #[error("that request is already in progress")]
    AlreadyPending,

    /// The remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Durable local storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BoardError {
    /// True when retrying the exact same call might succeed, i.e. the
    /// failure was transport-level rather than a refusal or a server no.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api(api) if api.is_network())
    }
}
