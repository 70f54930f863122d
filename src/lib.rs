//! Client core for a fitness and nutrition companion app: typed gateway to the
//! backend, the completion service and the barcode database, plus the screen
//! controllers that drive onboarding, food logging and the coach.

pub mod auth;
pub mod config;
pub mod device;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod screens;
pub mod state;
pub mod ui;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use gateway::{FitnessApi, Gateway};
pub use state::AppState;
