use chirp_types::{Claims, CurrentUser};
use chrono::Utc;

use crate::kv::{FileStore, StoreError};

/// Durable key the bearer token lives under.
const TOKEN_KEY: &str = "token";

/// Owns the bearer token and the identity derived from it.
///
/// Token acquisition happens elsewhere (the login and register
/// endpoints); this store only keeps, exposes, and clears what it is
/// handed. Identity is whatever the token's claims say. A token whose
/// claims will not decode is retained on disk but treated as absent,
/// so the session reads as anonymous without losing the credential.
#[derive(Debug)]
pub struct SessionStore {
    kv: FileStore,
    token: Option<String>,
    claims: Option<Claims>,
}

impl SessionStore {
    /// Load the persisted session. An unreadable token file degrades to
    /// anonymous rather than failing startup.
    #[must_use]
    pub fn open(kv: FileStore) -> Self {
        let token = match kv.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("stored token unreadable, starting anonymous: {e}");
                None
            }
        };
        let claims = derive_claims(token.as_deref());
        Self { kv, token, claims }
    }

    /// Store `token` durably and derive the current identity from it.
    pub fn login(&mut self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        self.kv.set_sensitive(TOKEN_KEY, &token)?;
        self.claims = derive_claims(Some(&token));
        self.token = Some(token);
        Ok(())
    }

    /// Drop the token and identity from memory and durable storage.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.kv.remove(TOKEN_KEY)?;
        self.token = None;
        self.claims = None;
        Ok(())
    }

    /// The raw bearer string, for request construction.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Identity snapshot. Anonymous without a token, when the claims did
    /// not decode, or once a decoded `exp` claim has passed.
    #[must_use]
    pub fn current_user(&self) -> CurrentUser {
        match (&self.token, &self.claims) {
            (Some(_), Some(claims)) if !claims.expired_at(Utc::now()) => CurrentUser {
                logged_in: true,
                user_id: claims.user_id.clone(),
            },
            _ => CurrentUser::anonymous(),
        }
    }
}

fn derive_claims(token: Option<&str>) -> Option<Claims> {
    let claims = Claims::decode(token?);
    if claims.is_none() {
        tracing::warn!("token claims did not decode; treating session as anonymous");
    }
    claims
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chirp_types::UserId;

    use super::*;

    fn token_for(user_id: &str, exp: Option<i64>) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = match exp {
            Some(exp) => format!(r#"{{"userId":"{user_id}","exp":{exp}}}"#),
            None => format!(r#"{{"userId":"{user_id}"}}"#),
        };
        format!("{header}.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    fn fresh(dir: &std::path::Path) -> SessionStore {
        SessionStore::open(FileStore::open(dir).expect("open store"))
    }

    #[test]
    fn starts_anonymous_with_no_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let session = fresh(dir.path());
        assert_eq!(session.current_user(), CurrentUser::anonymous());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn login_persists_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let token = token_for("user-1", None);

        let mut session = fresh(dir.path());
        session.login(token.clone()).unwrap();
        drop(session);

        let reopened = fresh(dir.path());
        assert_eq!(reopened.token(), Some(token.as_str()));
        let user = reopened.current_user();
        assert!(user.logged_in);
        assert_eq!(user.user_id, Some(UserId::from("user-1")));
    }

    #[test]
    fn undecodable_token_is_kept_but_reads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = fresh(dir.path());
        session.login("garbage-not-a-jwt").unwrap();

        assert_eq!(session.current_user(), CurrentUser::anonymous());
        // The credential itself is not thrown away.
        assert_eq!(session.token(), Some("garbage-not-a-jwt"));
        let reopened = fresh(dir.path());
        assert_eq!(reopened.token(), Some("garbage-not-a-jwt"));
    }

    #[test]
    fn expired_token_reads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let past = Utc::now().timestamp() - 60;

        let mut session = fresh(dir.path());
        session.login(token_for("user-1", Some(past))).unwrap();

        assert!(!session.current_user().logged_in);
        assert!(session.token().is_some());
    }

    #[test]
    fn future_expiry_still_counts_as_logged_in() {
        let dir = tempfile::tempdir().unwrap();
        let future = Utc::now().timestamp() + 3600;

        let mut session = fresh(dir.path());
        session.login(token_for("user-1", Some(future))).unwrap();

        assert!(session.current_user().logged_in);
    }

    #[test]
    fn logout_clears_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = fresh(dir.path());
        session.login(token_for("user-1", None)).unwrap();
        session.logout().unwrap();

        assert_eq!(session.token(), None);
        assert_eq!(session.current_user(), CurrentUser::anonymous());
        let reopened = fresh(dir.path());
        assert_eq!(reopened.token(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let mut session = fresh(dir.path());
        session.login(token_for("user-1", None)).unwrap();

        let mode = std::fs::metadata(dir.path().join("token"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600);
    }
}
