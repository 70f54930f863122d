//! Single point of outbound network access: the first-party backend, the
//! multimodal completion service, and the public barcode database.

mod backend;
mod barcode;
pub(crate) mod dto;
mod vision;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use time::Date;

use crate::auth::TokenStore;
use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::models::{
    BarcodeProduct, BodyAnalysis, BodyScan, ChatMessage, DailyLog, FitnessGoals, FoodAnalysis,
    FoodEntry, ProfileUpdate, User,
};

pub use vision::COACH_SYSTEM_PROMPT;

pub(crate) const BACKEND: &str = "backend";
pub(crate) const AI_SERVICE: &str = "ai";
pub(crate) const FOOD_DB: &str = "food database";

/// Operations screens depend on. `Gateway` is the network implementation.
#[async_trait]
pub trait FitnessApi: Send + Sync {
    async fn analyze_body_image(
        &self,
        image_uri: &str,
        goals: &FitnessGoals,
    ) -> ApiResult<BodyAnalysis>;
    /// `context` must be chronological; it is forwarded as-is.
    async fn get_chat_response(&self, message: &str, context: &[ChatMessage])
        -> ApiResult<String>;
    async fn analyze_food_image(&self, image_uri: &str) -> ApiResult<FoodAnalysis>;
    async fn lookup_barcode(&self, code: &str) -> ApiResult<BarcodeProduct>;

    async fn get_user_profile(&self) -> ApiResult<User>;
    async fn update_user_profile(&self, update: &ProfileUpdate) -> ApiResult<User>;
    async fn save_food_entry(&self, entry: &FoodEntry) -> ApiResult<FoodEntry>;
    async fn get_daily_log(&self, date: Date) -> ApiResult<DailyLog>;
    async fn save_body_scan(&self, scan: &BodyScan) -> ApiResult<BodyScan>;
    async fn get_body_scans(&self) -> ApiResult<Vec<BodyScan>>;
    async fn request_password_reset(&self, email: &str) -> ApiResult<()>;
}

#[derive(Clone)]
pub struct Gateway {
    http: Client,
    config: Arc<AppConfig>,
    tokens: Arc<dyn TokenStore>,
}

impl Gateway {
    pub fn new(config: Arc<AppConfig>, tokens: Arc<dyn TokenStore>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("mealmind-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
impl FitnessApi for Gateway {
    async fn analyze_body_image(
        &self,
        image_uri: &str,
        goals: &FitnessGoals,
    ) -> ApiResult<BodyAnalysis> {
        Gateway::analyze_body_image(self, image_uri, goals).await
    }

    async fn get_chat_response(
        &self,
        message: &str,
        context: &[ChatMessage],
    ) -> ApiResult<String> {
        Gateway::get_chat_response(self, message, context).await
    }

    async fn analyze_food_image(&self, image_uri: &str) -> ApiResult<FoodAnalysis> {
        Gateway::analyze_food_image(self, image_uri).await
    }

    async fn lookup_barcode(&self, code: &str) -> ApiResult<BarcodeProduct> {
        Gateway::lookup_barcode(self, code).await
    }

    async fn get_user_profile(&self) -> ApiResult<User> {
        Gateway::get_user_profile(self).await
    }

    async fn update_user_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        Gateway::update_user_profile(self, update).await
    }

    async fn save_food_entry(&self, entry: &FoodEntry) -> ApiResult<FoodEntry> {
        Gateway::save_food_entry(self, entry).await
    }

    async fn get_daily_log(&self, date: Date) -> ApiResult<DailyLog> {
        Gateway::get_daily_log(self, date).await
    }

    async fn save_body_scan(&self, scan: &BodyScan) -> ApiResult<BodyScan> {
        Gateway::save_body_scan(self, scan).await
    }

    async fn get_body_scans(&self) -> ApiResult<Vec<BodyScan>> {
        Gateway::get_body_scans(self).await
    }

    async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        Gateway::request_password_reset(self, email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("http://a/", "/user/profile"), "http://a/user/profile");
        assert_eq!(join_url("http://a/v1", "chat/completions"), "http://a/v1/chat/completions");
    }
}
