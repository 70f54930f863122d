use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_FOOD_DB_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4-vision-preview";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub vision_model: String,
    pub chat_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub ai: AiConfig,
    pub food_db_base_url: String,
    pub http_timeout_secs: u64,
    /// Confidence above which a photo-derived food entry counts as verified.
    pub food_verify_threshold: f64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = std::env::var("API_BASE_URL").context("API_BASE_URL is not set")?;
        let api_key = std::env::var("OPENAI_API_KEY")
            .or_else(|_| std::env::var("EXPO_PUBLIC_OPENAI_API_KEY"))
            .context("OPENAI_API_KEY is not set")?;
        let ai = AiConfig {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.into()),
            api_key,
            vision_model: std::env::var("VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.into()),
            chat_model: std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into()),
        };
        Ok(Self {
            api_base_url,
            ai,
            food_db_base_url: std::env::var("FOOD_DB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FOOD_DB_BASE_URL.into()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60),
            food_verify_threshold: std::env::var("FOOD_VERIFY_THRESHOLD")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| (0.0..=1.0).contains(v))
                .unwrap_or(0.8),
        })
    }

    /// Loads `.env` if present, then reads the environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Points every remote service at one base URL; used against mock servers.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.into(),
            ai: AiConfig {
                base_url: base_url.into(),
                api_key: "test-key".into(),
                vision_model: DEFAULT_VISION_MODEL.into(),
                chat_model: DEFAULT_CHAT_MODEL.into(),
            },
            food_db_base_url: base_url.into(),
            http_timeout_secs: 5,
            food_verify_threshold: 0.8,
        }
    }
}
