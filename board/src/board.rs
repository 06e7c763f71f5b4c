use std::sync::{Mutex, MutexGuard, PoisonError};

use chirp_api::ApiClient;
use chirp_store::{FileStore, LikedStore, SessionStore};
use chirp_types::{CurrentUser, Draft, Thought, ThoughtId};

use crate::config::Config;
use crate::error::BoardError;
use crate::state::{BoardState, PendingOp};

/// What a like attempt did.
///
/// Likes never surface remote failures: the optimistic increment stands
/// either way, so the only refusal is a duplicate already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The increment was applied and the id recorded on this device.
    Recorded,
    /// A like for this id was already in flight; nothing changed.
    AlreadyInFlight,
}

/// The canonical client-side copy of the thought list, plus the session
/// and liked-set it leans on.
///
/// All methods take `&self`; state lives behind a mutex that is only held
/// for short synchronous sections, never across an await. That keeps the
/// board shareable (`Arc<ThoughtBoard>`) while calls overlap, which is
/// exactly the situation the per-id in-flight guards exist for.
///
/// Mutation protocol, in two flavors:
/// - post, edit, delete confirm first and apply after the server answers.
/// - like applies first and does not roll back on failure. One tap, one
///   heart, even when the write is lost.
#[derive(Debug)]
pub struct ThoughtBoard {
    api: ApiClient,
    state: Mutex<BoardState>,
}

impl ThoughtBoard {
    /// Wire a board from configuration: API client plus the two stores
    /// rooted in the config's data directory.
    pub fn open(config: &Config) -> Result<Self, BoardError> {
        let api = ApiClient::new(&config.api_settings())?;
        let session = SessionStore::open(FileStore::open(&config.data_dir)?);
        let liked = LikedStore::open(FileStore::open(&config.data_dir)?);
        Ok(Self::new(api, session, liked))
    }

    /// Assemble a board from already-built parts.
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore, liked: LikedStore) -> Self {
        Self {
            api,
            state: Mutex::new(BoardState::new(session, liked)),
        }
    }

    /// Replace the list wholesale from the remote store.
    ///
    /// On failure the list keeps its previous contents. Refreshes are not
    /// guarded against each other; the last response to land wins, and
    /// each response is internally consistent.
    pub async fn refresh(&self) -> Result<(), BoardError> {
        self.lock().refreshing = true;

        let result = self.api.fetch_thoughts().await;

        let mut state = self.lock();
        state.refreshing = false;
        match result {
            Ok(thoughts) => {
                state.thoughts = thoughts;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("refresh failed, keeping current list: {e}");
                Err(e.into())
            }
        }
    }

    /// Post a new thought. The list changes only once the server answers
    /// with the stored entity, which is prepended.
    ///
    /// Refused without sending when the draft is out of bounds, when no
    /// session is active, or while another post is in flight.
    pub async fn post(&self, message: &str) -> Result<Thought, BoardError> {
        let draft = Draft::new(message)?;
        let token = {
            let mut state = self.lock();
            let Some(token) = active_token(&state.session) else {
                return Err(BoardError::NotLoggedIn);
            };
            if state.posting {
                return Err(BoardError::AlreadyPending);
            }
            state.posting = true;
            token
        };

        let result = self.api.create_thought(&draft, &token).await;

        let mut state = self.lock();
        state.posting = false;
        let thought = result?;
        state.thoughts.insert(0, thought.clone());
        Ok(thought)
    }

    /// Like a thought: bump the heart count immediately, then tell the
    /// server. A failed call is logged and the increment stays; the
    /// count is allowed to run ahead of an unreachable server rather
    /// than taking a heart back. When the server echoes its own count,
    /// the echo wins.
    ///
    /// The id is recorded in the liked-set once the call settles,
    /// success or failure. Unknown ids still go to the server and are
    /// still recorded; there is just no local count to bump.
    pub async fn like(&self, id: &ThoughtId) -> LikeOutcome {
        {
            let mut state = self.lock();
            if !state.begin(PendingOp::Like, id) {
                return LikeOutcome::AlreadyInFlight;
            }
            if let Some(thought) = state.find_mut(id) {
                thought.hearts += 1;
            }
        }

        let result = self.api.like_thought(id).await;

        let mut state = self.lock();
        state.finish(PendingOp::Like, id);
        match result {
            Ok(Some(hearts)) => {
                if let Some(thought) = state.find_mut(id) {
                    thought.hearts = hearts;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(id = %id, "like did not reach the server, keeping local count: {e}");
            }
        }
        if let Err(e) = state.liked.mark_liked(id) {
            tracing::warn!(id = %id, "could not persist liked-thought record: {e}");
        }
        LikeOutcome::Recorded
    }

    /// Rewrite a thought's message. Not optimistic: the list is only
    /// touched after the server accepts, using the server's echoed text
    /// when present and the submitted text otherwise.
    ///
    /// If the entry is gone by the time the server confirms (a delete
    /// won the race), the edit resolves quietly with nothing to update.
    pub async fn edit(&self, id: &ThoughtId, new_message: &str) -> Result<(), BoardError> {
        let draft = Draft::new(new_message)?;
        let token = {
            let mut state = self.lock();
            let Some(token) = active_token(&state.session) else {
                return Err(BoardError::NotLoggedIn);
            };
            if !state.begin(PendingOp::Edit, id) {
                return Err(BoardError::AlreadyPending);
            }
            token
        };

        let result = self.api.update_thought(id, &draft, &token).await;

        let mut state = self.lock();
        state.finish(PendingOp::Edit, id);
        let update = result?;

        match state.find_mut(id) {
            Some(thought) => {
                thought.message = update.message.unwrap_or_else(|| draft.into_inner());
                if let Some(stamped) = update.updated_at {
                    thought.updated_at = Some(stamped);
                }
            }
            None => {
                tracing::debug!(id = %id, "edited thought is no longer listed, nothing to update");
            }
        }
        Ok(())
    }

    /// Remove a thought. Not optimistic: the entry leaves the list only
    /// after the server confirms, so a failed call leaves it in place.
    pub async fn delete(&self, id: &ThoughtId) -> Result<(), BoardError> {
        let token = {
            let mut state = self.lock();
            let Some(token) = active_token(&state.session) else {
                return Err(BoardError::NotLoggedIn);
            };
            if !state.begin(PendingOp::Delete, id) {
                return Err(BoardError::AlreadyPending);
            }
            token
        };

        let result = self.api.delete_thought(id, &token).await;

        let mut state = self.lock();
        state.finish(PendingOp::Delete, id);
        result?;
        state.thoughts.retain(|t| t.id != *id);
        Ok(())
    }

    /// Exchange credentials for a bearer token and store it durably.
    /// Blank credentials are refused before any network call.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, BoardError> {
        require_credentials(email, password)?;
        let token = self.api.login(email, password).await?;
        let mut state = self.lock();
        state.session.login(token)?;
        Ok(state.session.current_user())
    }

    /// Create an account. The returned token is stored immediately, so a
    /// successful signup is also a login.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<CurrentUser, BoardError> {
        require_credentials(email, password)?;
        let token = self.api.register(email, password).await?;
        let mut state = self.lock();
        state.session.login(token)?;
        Ok(state.session.current_user())
    }

    /// End the session. The token and this device's liked-set are cleared
    /// together, from memory and durable storage in the same step.
    pub fn logout(&self) -> Result<(), BoardError> {
        let mut state = self.lock();
        state.session.logout()?;
        state.liked.clear()?;
        Ok(())
    }

    /// Snapshot of the current list in display order.
    #[must_use]
    pub fn thoughts(&self) -> Vec<Thought> {
        self.lock().thoughts.clone()
    }

    /// Listed thoughts this device has liked.
    #[must_use]
    pub fn my_liked_thoughts(&self) -> Vec<Thought> {
        let state = self.lock();
        state
            .thoughts
            .iter()
            .filter(|t| state.liked.contains(&t.id))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    #[must_use]
    pub fn is_posting(&self) -> bool {
        self.lock().posting
    }

    /// True while a like call for `id` is in flight. Drives the disabled
    /// state of the heart button.
    #[must_use]
    pub fn is_liking(&self, id: &ThoughtId) -> bool {
        self.lock().is_pending(PendingOp::Like, id)
    }

    /// Whether this device has ever recorded a like for `id`.
    #[must_use]
    pub fn has_liked(&self, id: &ThoughtId) -> bool {
        self.lock().liked.contains(id)
    }

    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        self.lock().session.current_user()
    }

    /// Lock the state, recovering from poisoning. No invariant here can
    /// be broken by a panicking lock holder: sections are short and each
    /// leaves the state consistent at every statement.
    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The bearer string behind an active session, or None when the session
/// is anonymous for any reason (no token, undecodable claims, expired).
fn active_token(session: &SessionStore) -> Option<String> {
    if !session.current_user().logged_in {
        return None;
    }
    session.token().map(str::to_owned)
}

fn require_credentials(email: &str, password: &str) -> Result<(), BoardError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(BoardError::MissingCredentials);
    }
    Ok(())
}
