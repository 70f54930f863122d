use std::sync::Arc;

use tracing::warn;

use super::{AsyncOp, ScreenScope};
use crate::auth::services::{is_valid_email, normalize_email};
use crate::error::ApiError;
use crate::gateway::FitnessApi;
use crate::state::AppState;
use crate::ui::{Notice, Route};

pub struct ForgotPasswordScreen {
    api: Arc<dyn FitnessApi>,
    scope: ScreenScope,
    email: String,
    request: AsyncOp<()>,
    notice: Option<Notice>,
}

impl ForgotPasswordScreen {
    pub fn new(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            scope: ScreenScope::new(),
            email: String::new(),
            request: AsyncOp::Idle,
            notice: None,
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_pending()
    }

    pub fn is_sent(&self) -> bool {
        self.request.value().is_some()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn back_to_login(&self) -> Route {
        Route::Login
    }

    pub async fn submit(&mut self) {
        let email = normalize_email(&self.email);
        if email.is_empty() {
            self.notice = Some(Notice::error("Please enter your email address"));
            return;
        }
        if !is_valid_email(&email) {
            self.notice = Some(Notice::error("Please enter a valid email address"));
            return;
        }
        if !self.request.begin() {
            return;
        }
        let result = self
            .scope
            .run(self.api.request_password_reset(&email))
            .await;
        if let Err(e) = &result {
            if !matches!(e, ApiError::Cancelled) {
                warn!(error = %e, "password reset failed");
                self.notice = Some(Notice::error(
                    "Failed to send reset email. Please try again.",
                ));
            }
        }
        self.request.settle(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fake_api::FakeApi;

    fn screen(api: FakeApi) -> (ForgotPasswordScreen, Arc<FakeApi>) {
        let api = Arc::new(api);
        (ForgotPasswordScreen::new(&AppState::fake(api.clone())), api)
    }

    #[tokio::test]
    async fn empty_and_invalid_emails_never_reach_the_backend() {
        let (mut s, api) = screen(FakeApi::default());
        s.submit().await;
        assert_eq!(s.take_notice().unwrap().message, "Please enter your email address");
        s.set_email("not-an-email");
        s.submit().await;
        assert_eq!(s.take_notice().unwrap().message, "Please enter a valid email address");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn success_marks_sent() {
        let api = FakeApi::default();
        *api.reset.lock().unwrap() = Some(Ok(()));
        let (mut s, _) = screen(api);
        s.set_email(" Sam@Example.com ");
        s.submit().await;
        assert!(s.is_sent());
        assert!(s.take_notice().is_none());
        assert_eq!(s.back_to_login(), Route::Login);
    }

    #[tokio::test]
    async fn failure_shows_retry_notice() {
        let (mut s, _) = screen(FakeApi::default());
        s.set_email("sam@example.com");
        s.submit().await;
        assert!(!s.is_sent());
        assert!(s.take_notice().is_some());
    }
}
