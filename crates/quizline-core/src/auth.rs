//! Signed-in user context.
//!
//! `AuthSession` is passed explicitly to whatever needs the current user.
//! It restores the user from a [`KeyValueStore`] once on creation, persists on
//! login/register, and removes the persisted copy on logout.

use std::sync::Arc;

use crate::error::QuizError;
use crate::model::UserRecord;
use crate::traits::{AuthBackend, KeyValueStore};

/// Storage key for the persisted user record.
pub const USER_KEY: &str = "user";

/// The signed-in user, if any, and the means to change it.
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
    backend: Arc<dyn AuthBackend>,
    user: Option<UserRecord>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user.as_ref().map(|u| &u.id))
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Build the context, restoring any previously persisted user.
    ///
    /// An unreadable record, or a store that cannot be read at all, is
    /// discarded and the session starts signed out. Only a failure to clear
    /// the bad record is returned.
    pub fn restore(
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn AuthBackend>,
    ) -> Result<Self, QuizError> {
        let parsed = match store.get(USER_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<UserRecord>(&raw)
                .map(Some)
                .map_err(anyhow::Error::from),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        let user = match parsed {
            Ok(Some(user)) => {
                tracing::debug!(user = %user.id, "restored signed-in user");
                Some(user)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "discarding unreadable stored user");
                store
                    .remove(USER_KEY)
                    .map_err(|e| QuizError::classify(e, QuizError::Storage))?;
                None
            }
        };

        Ok(Self {
            store,
            backend,
            user,
        })
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Check credentials and sign in.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserRecord, QuizError> {
        let user = self
            .backend
            .login(email, password)
            .await
            .map_err(|e| QuizError::classify(e, QuizError::AuthBackend))?;
        tracing::info!(user = %user.id, "signed in");
        self.persist(user)
    }

    /// Create an account and sign in as it.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<&UserRecord, QuizError> {
        let user = self
            .backend
            .register(name, email, password)
            .await
            .map_err(|e| QuizError::classify(e, QuizError::AuthBackend))?;
        tracing::info!(user = %user.id, "registered");
        self.persist(user)
    }

    /// Sign out and forget the persisted user.
    pub fn logout(&mut self) -> Result<(), QuizError> {
        if let Some(user) = self.user.take() {
            tracing::info!(user = %user.id, "signed out");
        }
        self.store
            .remove(USER_KEY)
            .map_err(|e| QuizError::classify(e, QuizError::Storage))
    }

    fn persist(&mut self, user: UserRecord) -> Result<&UserRecord, QuizError> {
        let raw = serde_json::to_string(&user).map_err(|e| QuizError::Storage(e.to_string()))?;
        self.store
            .set(USER_KEY, &raw)
            .map_err(|e| QuizError::classify(e, QuizError::Storage))?;
        Ok(&*self.user.insert(user))
    }
}
