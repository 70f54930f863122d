use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use time::Date;
use tracing::{debug, instrument, warn};

use super::dto::PasswordResetRequest;
use super::{join_url, Gateway, BACKEND};
use crate::error::{ApiError, ApiResult};
use crate::models::{BodyScan, DailyLog, FoodEntry, ProfileUpdate, User};

impl Gateway {
    /// Attaches the stored bearer token when there is one; no refresh on 401.
    async fn authorized(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, join_url(&self.config.api_base_url, endpoint));
        match self.tokens.get().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn dispatch(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(BACKEND, e))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, url = %response.url(), "backend request rejected");
            return Err(ApiError::Network {
                service: BACKEND,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let request = self.authorized(Method::GET, endpoint).await;
        Self::read_json(self.dispatch(request).await?).await
    }

    async fn send_json<B, T>(&self, method: Method, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.authorized(method, endpoint).await.json(body);
        Self::read_json(self.dispatch(request).await?).await
    }

    #[instrument(skip(self))]
    pub async fn get_user_profile(&self) -> ApiResult<User> {
        self.get_json("/user/profile").await
    }

    #[instrument(skip(self, update))]
    pub async fn update_user_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.send_json(Method::PUT, "/user/profile", update).await
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id))]
    pub async fn save_food_entry(&self, entry: &FoodEntry) -> ApiResult<FoodEntry> {
        self.send_json(Method::POST, "/food/entries", entry).await
    }

    #[instrument(skip(self))]
    pub async fn get_daily_log(&self, date: Date) -> ApiResult<DailyLog> {
        let request = self
            .authorized(Method::GET, "/food/daily-log")
            .await
            .query(&[("date", date.to_string())]);
        debug!(%date, "daily log");
        Self::read_json(self.dispatch(request).await?).await
    }

    #[instrument(skip(self, scan), fields(scan_id = %scan.id))]
    pub async fn save_body_scan(&self, scan: &BodyScan) -> ApiResult<BodyScan> {
        self.send_json(Method::POST, "/body-scans", scan).await
    }

    #[instrument(skip(self))]
    pub async fn get_body_scans(&self) -> ApiResult<Vec<BodyScan>> {
        self.get_json("/body-scans").await
    }

    /// Response body is ignored; only the status matters.
    #[instrument(skip(self, email))]
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        let request = self
            .authorized(Method::POST, "/auth/password-reset")
            .await
            .json(&PasswordResetRequest { email });
        self.dispatch(request).await?;
        Ok(())
    }
}
