use crate::auth::{MemoryTokenStore, Session, TokenStore};
use crate::config::AppConfig;
use crate::gateway::{FitnessApi, Gateway};
use std::sync::Arc;

/// Process-wide dependencies handed to every screen.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn FitnessApi>,
    pub session: Session,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::load()?);
        let tokens = Arc::new(MemoryTokenStore::new()) as Arc<dyn TokenStore>;
        let api = Arc::new(Gateway::new(config.clone(), tokens.clone())?) as Arc<dyn FitnessApi>;
        tracing::info!(backend = %config.api_base_url, "client state ready");
        Ok(Self {
            config,
            api,
            session: Session::new(tokens),
        })
    }

    pub fn from_parts(config: Arc<AppConfig>, api: Arc<dyn FitnessApi>, session: Session) -> Self {
        Self {
            config,
            api,
            session,
        }
    }

    #[cfg(test)]
    pub fn fake(api: Arc<dyn FitnessApi>) -> Self {
        let config = Arc::new(AppConfig::for_base_url("http://fake.local"));
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        Self::from_parts(config, api, session)
    }
}
