use std::sync::{Arc, RwLock, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::token_store::TokenStore;
use crate::models::User;

/// Signed-in state shared by every screen. Set at login, cleared at logout.
#[derive(Clone)]
pub struct Session {
    tokens: Arc<dyn TokenStore>,
    user: Arc<RwLock<Option<User>>>,
}

impl Session {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            tokens,
            user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn tokens(&self) -> Arc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub async fn sign_in(&self, token: String, user: User) {
        debug!(user_id = %user.id, "session started");
        self.tokens.set(token).await;
        *self.user_mut() = Some(user);
    }

    fn user_mut(&self) -> RwLockWriteGuard<'_, Option<User>> {
        self.user.write().unwrap_or_else(|e| {
            warn!("session lock poisoned; recovering");
            e.into_inner()
        })
    }

    pub fn current_user(&self) -> Option<User> {
        match self.user.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                warn!("session lock poisoned; recovering");
                e.into_inner().clone()
            }
        }
    }

    pub fn set_user(&self, user: User) {
        *self.user_mut() = Some(user);
    }

    pub async fn logout(&self) {
        self.tokens.clear().await;
        *self.user_mut() = None;
        info!("session cleared");
    }
}

#[cfg(test)]
pub(crate) fn test_user(is_premium: bool) -> User {
    User {
        id: "u-1".into(),
        email: "sam@example.com".into(),
        name: "Sam".into(),
        avatar: None,
        is_premium,
        created_at: None,
    }
}
