use crate::auth::Session;
use crate::models::NutritionTotals;
use crate::state::AppState;
use crate::ui::{bar_fill, Route};

pub const TARGET_REACHED: &str = "Target reached!";

pub const INSIGHTS: [&str; 2] = [
    "You're doing great! Try adding more protein to reach your daily goal.",
    "Your most productive workout time is between 6-8 PM based on your logs.",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyStats {
    pub calories_consumed: f64,
    pub calories_target: f64,
    pub protein_consumed: f64,
    pub protein_target: f64,
    pub workouts_this_week: u32,
    pub workouts_target: u32,
}

impl Default for DailyStats {
    fn default() -> Self {
        Self {
            calories_consumed: 1420.0,
            calories_target: 2200.0,
            protein_consumed: 89.0,
            protein_target: 120.0,
            workouts_this_week: 3,
            workouts_target: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub calories_remaining: f64,
    pub protein_remaining: f64,
    pub calories_progress: f64,
    pub protein_progress: f64,
    pub calories_bar: f64,
    pub protein_bar: f64,
    pub calories_label: String,
    pub protein_label: String,
    pub workouts_label: String,
}

fn percent(consumed: f64, target: f64) -> f64 {
    if target > 0.0 {
        consumed / target * 100.0
    } else {
        0.0
    }
}

fn remaining_label(remaining: f64, unit: &str) -> String {
    if remaining > 0.0 {
        format!("{remaining}{unit} remaining")
    } else {
        TARGET_REACHED.to_string()
    }
}

/// Pure derivation of the dashboard numbers.
pub fn summarize(stats: &DailyStats) -> DashboardSummary {
    let calories_remaining = stats.calories_target - stats.calories_consumed;
    let protein_remaining = stats.protein_target - stats.protein_consumed;
    let calories_progress = percent(stats.calories_consumed, stats.calories_target);
    let protein_progress = percent(stats.protein_consumed, stats.protein_target);
    DashboardSummary {
        calories_remaining,
        protein_remaining,
        calories_progress,
        protein_progress,
        calories_bar: bar_fill(calories_progress),
        protein_bar: bar_fill(protein_progress),
        calories_label: remaining_label(calories_remaining, ""),
        protein_label: remaining_label(protein_remaining, "g"),
        workouts_label: format!(
            "{} / {} workouts",
            stats.workouts_this_week, stats.workouts_target
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    LogFood,
    ViewProgress,
    AskCoach,
}

impl QuickAction {
    pub fn route(self) -> Route {
        match self {
            QuickAction::LogFood => Route::Food,
            QuickAction::ViewProgress => Route::Progress,
            QuickAction::AskCoach => Route::Coach,
        }
    }
}

pub struct HomeScreen {
    session: Session,
    stats: DailyStats,
}

impl HomeScreen {
    pub fn new(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
            stats: DailyStats::default(),
        }
    }

    /// Sends signed-out users to login once auth has finished loading.
    pub fn auth_redirect(&self, auth_loading: bool) -> Option<Route> {
        if !auth_loading && self.session.current_user().is_none() {
            Some(Route::Login)
        } else {
            None
        }
    }

    pub fn greeting_name(&self) -> Option<String> {
        self.session.current_user().map(|u| u.name)
    }

    pub fn stats(&self) -> &DailyStats {
        &self.stats
    }

    pub fn set_stats(&mut self, stats: DailyStats) {
        self.stats = stats;
    }

    /// Takes consumed calories and protein from today's food log.
    pub fn apply_totals(&mut self, totals: NutritionTotals) {
        self.stats.calories_consumed = totals.calories;
        self.stats.protein_consumed = totals.protein;
    }

    pub fn summary(&self) -> DashboardSummary {
        summarize(&self.stats)
    }
}
