//! Session store: the signed-in identity derived from the credential token.
//!
//! # Design
//! The token is read as `username.role.signature` and the first two
//! segments are shown in the UI. Nothing here is verified; the derived
//! `User` only decides which affordances are rendered, and the API checks
//! the bearer token on every protected call.

use crate::error::TokenError;
use crate::storage::TokenStore;
use crate::types::{Role, User};

/// Derive the display identity from a credential token.
pub fn decode_token(token: &str) -> Result<User, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::SegmentCount(parts.len()));
    }
    Ok(User {
        username: parts[0].to_string(),
        role: Role::from_label(parts[1]),
    })
}

/// Owner of the token store and of the in-memory user.
pub struct SessionStore {
    store: Box<dyn TokenStore>,
    user: Option<User>,
}

impl SessionStore {
    /// Restore the session persisted in `store`.
    ///
    /// A token that cannot be read or decoded is discarded and the session
    /// starts unauthenticated.
    pub fn bootstrap(store: Box<dyn TokenStore>) -> Self {
        let mut session = Self { store, user: None };
        let token = match session.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "stored token unreadable, discarding");
                session.discard_token();
                return session;
            }
        };
        if let Some(token) = token {
            match decode_token(&token) {
                Ok(user) => {
                    tracing::debug!(username = %user.username, role = %user.role, "session restored");
                    session.user = Some(user);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored token malformed, discarding");
                    session.discard_token();
                }
            }
        }
        session
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Read-only view of the store for attaching the bearer header.
    pub fn token_store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Persist a freshly issued token and activate the session.
    ///
    /// `fallback` is used when the token does not decode, e.g. the identity
    /// echoed back in the auth response.
    pub fn sign_in(&mut self, token: &str, fallback: Option<User>) {
        if let Err(e) = self.store.save(token) {
            tracing::warn!(error = %e, "could not persist credential token");
        }
        self.user = match decode_token(token) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "issued token does not carry an identity");
                fallback
            }
        };
    }

    /// Drop the persisted token and the in-memory user.
    pub fn sign_out(&mut self) {
        self.discard_token();
        self.user = None;
    }

    fn discard_token(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not remove credential token");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("user", &self.user).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn stored(session: &SessionStore) -> Option<String> {
        session.token_store().load().unwrap()
    }

    #[test]
    fn three_segments_yield_user() {
        let session = SessionStore::bootstrap(Box::new(MemoryStore::with_token("alice.admin.sig")));
        let user = session.user().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Admin);
        assert!(session.is_admin());
        assert_eq!(stored(&session).as_deref(), Some("alice.admin.sig"));
    }

    #[test]
    fn wrong_segment_counts_discard_token() {
        for token in ["plain", "two.parts", "a.b.c.d", "eyJ.eyJ.sig.extra"] {
            let session = SessionStore::bootstrap(Box::new(MemoryStore::with_token(token)));
            assert!(!session.is_authenticated(), "{token}");
            assert_eq!(stored(&session), None, "{token}");
        }
    }

    #[test]
    fn empty_store_is_unauthenticated() {
        let session = SessionStore::bootstrap(Box::new(MemoryStore::new()));
        assert!(session.user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn decode_reports_segment_count() {
        assert_eq!(decode_token("a.b"), Err(TokenError::SegmentCount(2)));
        let user = decode_token("bob.user.xyz").unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn sign_in_persists_and_sign_out_clears() {
        let mut session = SessionStore::bootstrap(Box::new(MemoryStore::new()));
        session.sign_in("bob.user.xyz", None);
        assert_eq!(session.user().unwrap().username, "bob");
        assert_eq!(stored(&session).as_deref(), Some("bob.user.xyz"));

        session.sign_out();
        assert!(session.user().is_none());
        assert_eq!(stored(&session), None);
    }

    #[test]
    fn undecodable_issued_token_uses_fallback() {
        let mut session = SessionStore::bootstrap(Box::new(MemoryStore::new()));
        let fallback = User {
            username: "carol".to_string(),
            role: Role::User,
        };
        session.sign_in("opaque-token", Some(fallback.clone()));
        assert_eq!(session.user(), Some(&fallback));
        assert_eq!(stored(&session).as_deref(), Some("opaque-token"));
    }
}
