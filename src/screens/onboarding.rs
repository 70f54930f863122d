use std::sync::Arc;

use tracing::{info, warn};

use super::{AsyncOp, ScreenScope};
use crate::auth::Session;
use crate::device::{acquire_photo, CaptureOptions, MediaPicker, PhotoSource};
use crate::error::ApiError;
use crate::gateway::FitnessApi;
use crate::models::{ActivityLevel, BodyMetrics, FitnessGoals, GoalType, ProfileUpdate, User};
use crate::state::AppState;
use crate::ui::{Notice, Route};

pub const TOTAL_STEPS: usize = 3;

const INCOMPLETE: &str = "Please complete all steps";
const ANALYSIS_FAILED: &str = "Failed to analyze your profile. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Photo = 1,
    Goal = 2,
    Activity = 3,
}

impl Step {
    pub fn number(self) -> usize {
        self as usize
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Photo => Some(Step::Goal),
            Step::Goal => Some(Step::Activity),
            Step::Activity => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::Photo => None,
            Step::Goal => Some(Step::Photo),
            Step::Activity => Some(Step::Goal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing(Step),
    Submitting,
    Done,
}

pub struct OnboardingScreen {
    api: Arc<dyn FitnessApi>,
    picker: Arc<dyn MediaPicker>,
    session: Session,
    scope: ScreenScope,
    step: Step,
    body_image: Option<String>,
    goal: Option<GoalType>,
    activity: Option<ActivityLevel>,
    metrics: BodyMetrics,
    submit: AsyncOp<User>,
    notice: Option<Notice>,
    redirect: Option<Route>,
}

impl OnboardingScreen {
    pub fn new(state: &AppState, picker: Arc<dyn MediaPicker>) -> Self {
        Self {
            api: state.api.clone(),
            picker,
            session: state.session.clone(),
            scope: ScreenScope::new(),
            step: Step::Photo,
            body_image: None,
            goal: None,
            activity: None,
            metrics: BodyMetrics::default(),
            submit: AsyncOp::Idle,
            notice: None,
            redirect: None,
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn phase(&self) -> Phase {
        match self.submit {
            AsyncOp::Pending => Phase::Submitting,
            AsyncOp::Succeeded(_) => Phase::Done,
            _ => Phase::Editing(self.step),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_loading(&self) -> bool {
        self.submit.is_pending()
    }

    pub fn body_image(&self) -> Option<&str> {
        self.body_image.as_deref()
    }

    pub fn goal(&self) -> Option<GoalType> {
        self.goal
    }

    pub fn activity(&self) -> Option<ActivityLevel> {
        self.activity
    }

    /// Segment `i` of the progress bar is lit when `i < step`.
    pub fn progress_segments(&self) -> [bool; TOTAL_STEPS] {
        let n = self.step.number();
        [0 < n, 1 < n, 2 < n]
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    fn editable(&self) -> bool {
        matches!(self.phase(), Phase::Editing(_))
    }

    /// Whether the current step's required field is filled.
    pub fn can_proceed(&self) -> bool {
        match self.step {
            Step::Photo => self.body_image.is_some(),
            Step::Goal => self.goal.is_some(),
            Step::Activity => self.activity.is_some(),
        }
    }

    pub fn next(&mut self) -> bool {
        if !self.editable() || !self.can_proceed() {
            return false;
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Goes back a step; entered data is kept.
    pub fn previous(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub async fn capture_photo(&mut self, source: PhotoSource) {
        if !self.editable() {
            return;
        }
        match acquire_photo(self.picker.as_ref(), source, CaptureOptions::PORTRAIT).await {
            Ok(Some(uri)) => self.body_image = Some(uri),
            Ok(None) => {}
            Err(_) => {
                let msg = match source {
                    PhotoSource::Camera => "Please grant camera permissions to continue",
                    PhotoSource::Library => "Please grant camera roll permissions to continue",
                };
                self.notice = Some(Notice::permission_required(msg));
            }
        }
    }

    pub fn retake_photo(&mut self) {
        if self.editable() {
            self.body_image = None;
        }
    }

    pub fn select_goal(&mut self, goal: GoalType) {
        if self.editable() {
            self.goal = Some(goal);
        }
    }

    pub fn select_activity(&mut self, level: ActivityLevel) {
        if self.editable() {
            self.activity = Some(level);
        }
    }

    pub fn set_body_metrics(&mut self, metrics: BodyMetrics) {
        if self.editable() {
            self.metrics = metrics;
        }
    }

    fn goals(&self) -> Option<(String, FitnessGoals)> {
        let (Some(image), Some(goal), Some(activity)) =
            (self.body_image.clone(), self.goal, self.activity)
        else {
            return None;
        };
        let mut goals = FitnessGoals::new(goal, activity);
        goals.current_weight = self.metrics.current_weight;
        goals.height = self.metrics.height;
        goals.age = self.metrics.age;
        goals.gender = self.metrics.gender;
        Some((image, goals))
    }

    /// Analyzes the photo, then stores goals and analysis on the profile.
    /// Navigates away only when both calls succeed.
    pub async fn complete(&mut self) {
        if self.step != Step::Activity || !self.editable() {
            return;
        }
        let Some((image, goals)) = self.goals() else {
            self.notice = Some(Notice::error(INCOMPLETE));
            return;
        };
        if !self.submit.begin() {
            return;
        }

        let api = self.api.clone();
        let result = self
            .scope
            .run(async move {
                let analysis = api.analyze_body_image(&image, &goals).await?;
                api.update_user_profile(&ProfileUpdate::onboarding(goals, analysis))
                    .await
            })
            .await;

        match &result {
            Ok(user) => {
                info!(user_id = %user.id, "onboarding completed");
                self.session.set_user(user.clone());
                self.redirect = Some(Route::Tabs);
            }
            Err(ApiError::Cancelled) => {}
            Err(e) => {
                warn!(error = %e, "onboarding analysis failed");
                self.notice = Some(Notice::error(ANALYSIS_FAILED));
            }
        }
        self.submit.settle(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_user;
    use crate::device::fakes::FakePicker;
    use crate::models::{Macros, WorkoutRecommendation};
    use crate::state::fake_api::FakeApi;
    use crate::ui::NoticeKind;

    fn analysis() -> crate::models::BodyAnalysis {
        crate::models::BodyAnalysis {
            body_fat_percentage: 18.0,
            daily_calories: 2200.0,
            macros: Macros {
                protein: 150.0,
                carbs: 220.0,
                fat: 70.0,
            },
            workout_plan: WorkoutRecommendation {
                kind: "strength".into(),
                frequency: 4.0,
                duration: 45.0,
            },
            focus_areas: vec!["core".into()],
            recommendations: vec![],
        }
    }

    fn screen(api: FakeApi, picker: FakePicker) -> (OnboardingScreen, Arc<FakeApi>) {
        let api = Arc::new(api);
        let state = AppState::fake(api.clone());
        (OnboardingScreen::new(&state, Arc::new(picker)), api)
    }

    async fn fill_all(s: &mut OnboardingScreen) {
        s.capture_photo(PhotoSource::Camera).await;
        assert!(s.next());
        s.select_goal(GoalType::GainMuscle);
        assert!(s.next());
        s.select_activity(ActivityLevel::VeryActive);
    }

    #[tokio::test]
    async fn can_proceed_tracks_the_current_step_only() {
        let (mut s, _) = screen(FakeApi::default(), FakePicker::returning("file:///me.jpg"));
        assert!(!s.can_proceed());
        assert!(!s.next());
        s.capture_photo(PhotoSource::Library).await;
        assert!(s.can_proceed());
        assert!(s.next());
        assert_eq!(s.step(), Step::Goal);
        assert!(!s.can_proceed());
        s.select_goal(GoalType::Maintain);
        assert!(s.next());
        assert!(!s.can_proceed());
        s.select_activity(ActivityLevel::Sedentary);
        assert!(s.can_proceed());
        assert!(!s.next(), "no step after the third");
        assert_eq!(s.progress_segments(), [true, true, true]);
    }

    #[tokio::test]
    async fn previous_keeps_entered_data() {
        let (mut s, _) = screen(FakeApi::default(), FakePicker::returning("file:///me.jpg"));
        fill_all(&mut s).await;
        assert!(s.previous());
        assert!(s.previous());
        assert!(!s.previous());
        assert_eq!(s.step(), Step::Photo);
        assert_eq!(s.body_image(), Some("file:///me.jpg"));
        assert_eq!(s.goal(), Some(GoalType::GainMuscle));
        assert_eq!(s.activity(), Some(ActivityLevel::VeryActive));
    }

    #[tokio::test]
    async fn denied_permission_raises_notice() {
        let (mut s, _) = screen(FakeApi::default(), FakePicker::denied());
        s.capture_photo(PhotoSource::Camera).await;
        assert!(s.body_image().is_none());
        let notice = s.take_notice().unwrap();
        assert_eq!(notice.title, "Permission Required");
    }

    #[tokio::test]
    async fn success_updates_profile_and_navigates() {
        let api = FakeApi::default();
        *api.body.lock().unwrap() = Some(Ok(analysis()));
        *api.profile.lock().unwrap() = Some(Ok(test_user(false)));
        let (mut s, api) = screen(api, FakePicker::returning("file:///me.jpg"));
        fill_all(&mut s).await;

        s.complete().await;
        assert_eq!(s.phase(), Phase::Done);
        assert_eq!(s.redirect(), Some(Route::Tabs));
        assert_eq!(api.calls(), vec!["analyze_body_image", "update_user_profile"]);
        assert!(s.session.current_user().is_some());
    }

    #[tokio::test]
    async fn malformed_analysis_stays_on_final_step_with_one_notice() {
        let api = FakeApi::default();
        *api.body.lock().unwrap() = Some(Err(ApiError::Parse("expected value".into())));
        let (mut s, api) = screen(api, FakePicker::returning("file:///me.jpg"));
        fill_all(&mut s).await;

        s.complete().await;
        assert_eq!(s.phase(), Phase::Editing(Step::Activity));
        assert_eq!(s.redirect(), None);
        let notice = s.take_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, ANALYSIS_FAILED);
        assert!(s.take_notice().is_none());
        assert_eq!(api.calls(), vec!["analyze_body_image"]);
        assert!(s.can_proceed(), "input survives the failure");
    }

    #[tokio::test]
    async fn profile_failure_also_blocks_navigation() {
        let api = FakeApi::default();
        *api.body.lock().unwrap() = Some(Ok(analysis()));
        let (mut s, _) = screen(api, FakePicker::returning("file:///me.jpg"));
        fill_all(&mut s).await;
        s.complete().await;
        assert_eq!(s.phase(), Phase::Editing(Step::Activity));
        assert!(s.redirect().is_none());
    }

    #[tokio::test]
    async fn incomplete_input_never_reaches_the_gateway() {
        let (mut s, api) = screen(FakeApi::default(), FakePicker::returning("file:///me.jpg"));
        fill_all(&mut s).await;
        s.retake_photo();
        s.complete().await;
        assert_eq!(s.take_notice().unwrap().message, INCOMPLETE);
        assert_eq!(s.phase(), Phase::Editing(Step::Activity));
        assert!(api.calls().is_empty());

        let (mut s, api) = screen(FakeApi::default(), FakePicker::returning("file:///me.jpg"));
        s.capture_photo(PhotoSource::Camera).await;
        assert!(s.next());
        s.select_goal(GoalType::LoseWeight);
        assert!(s.next());
        s.complete().await;
        assert_eq!(s.take_notice().unwrap().message, INCOMPLETE);
        assert_eq!(s.phase(), Phase::Editing(Step::Activity));
        assert!(s.redirect().is_none());

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn closed_screen_discards_result() {
        let api = FakeApi {
            hang: true,
            ..FakeApi::default()
        };
        let (mut s, _) = screen(api, FakePicker::returning("file:///me.jpg"));
        fill_all(&mut s).await;
        let handle = s.scope().handle();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            handle.cancel();
        });
        s.complete().await;
        assert_eq!(s.phase(), Phase::Editing(Step::Activity));
        assert!(s.take_notice().is_none());
    }
}
