use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Holds the backend bearer token between login and logout.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Option<String>;
    async fn set(&self, token: String);
    async fn clear(&self);
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    // A panic while holding the lock leaves the token itself intact.
    fn read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.token.read().unwrap_or_else(|e| {
            warn!("token store lock poisoned; recovering");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.token.write().unwrap_or_else(|e| {
            warn!("token store lock poisoned; recovering");
            e.into_inner()
        })
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<String> {
        self.read().clone().filter(|t| !t.is_empty())
    }

    async fn set(&self, token: String) {
        *self.write() = Some(token);
    }

    async fn clear(&self) {
        *self.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().await, None);
        store.set("abc".into()).await;
        assert_eq!(store.get().await.as_deref(), Some("abc"));
        store.clear().await;
        assert_eq!(store.get().await, None);
    }

    #[tokio::test]
    async fn poisoned_lock_still_clears() {
        let store = std::sync::Arc::new(MemoryTokenStore::with_token("abc"));
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.token.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(store.token.is_poisoned());

        assert_eq!(store.get().await.as_deref(), Some("abc"));
        store.clear().await;
        assert_eq!(store.get().await, None);
        store.set("def".into()).await;
        assert_eq!(store.get().await.as_deref(), Some("def"));
    }

    #[tokio::test]
    async fn empty_token_reads_as_absent() {
        let store = MemoryTokenStore::with_token("");
        assert_eq!(store.get().await, None);
    }
}
