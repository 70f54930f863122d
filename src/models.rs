use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    LoseWeight,
    GainMuscle,
    Maintain,
    ImproveFitness,
}

impl GoalType {
    pub const ALL: [GoalType; 4] = [
        GoalType::LoseWeight,
        GoalType::GainMuscle,
        GoalType::Maintain,
        GoalType::ImproveFitness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalType::LoseWeight => "lose_weight",
            GoalType::GainMuscle => "gain_muscle",
            GoalType::Maintain => "maintain",
            GoalType::ImproveFitness => "improve_fitness",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalType::LoseWeight => "Lose Weight",
            GoalType::GainMuscle => "Gain Muscle",
            GoalType::Maintain => "Maintain",
            GoalType::ImproveFitness => "Improve Fitness",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GoalType::LoseWeight => "Burn fat and get leaner",
            GoalType::GainMuscle => "Build strength and mass",
            GoalType::Maintain => "Stay healthy and fit",
            GoalType::ImproveFitness => "Boost overall health",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtraActive => "Extra Active",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little to no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise, training 2x/day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Onboarding only collects goal and activity; body metrics are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessGoals {
    pub goal_type: GoalType,
    pub activity_level: ActivityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl FitnessGoals {
    pub fn new(goal_type: GoalType, activity_level: ActivityLevel) -> Self {
        Self {
            goal_type,
            activity_level,
            current_weight: None,
            target_weight: None,
            height: None,
            age: None,
            gender: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyMetrics {
    pub current_weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub frequency: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyAnalysis {
    pub body_fat_percentage: f64,
    pub daily_calories: f64,
    pub macros: Macros,
    pub workout_plan: WorkoutRecommendation,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub confidence: f64,
}

/// Normalized record from the barcode database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarcodeProduct {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

impl FoodEntry {
    pub fn from_analysis(
        analysis: &FoodAnalysis,
        image_url: &str,
        verify_threshold: f64,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: analysis.name.clone(),
            calories: non_negative(analysis.calories),
            protein: non_negative(analysis.protein),
            carbs: non_negative(analysis.carbs),
            fat: non_negative(analysis.fat),
            timestamp,
            verified: analysis.confidence > verify_threshold,
            image_url: Some(image_url.to_string()),
        }
    }

    pub fn from_barcode(product: &BarcodeProduct, timestamp: OffsetDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: product.name.clone(),
            calories: non_negative(product.calories),
            protein: non_negative(product.protein),
            carbs: non_negative(product.carbs),
            fat: non_negative(product.fat),
            timestamp,
            verified: product.verified,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a FoodEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |acc, e| NutritionTotals {
                calories: acc.calories + e.calories,
                protein: acc.protein + e.protein,
                carbs: acc.carbs + e.carbs,
                fat: acc.fat + e.fat,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub water_intake: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyScan {
    pub id: String,
    pub image_url: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub body_fat_percentage: f64,
    pub muscle_mass: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Free,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTier {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub interval: BillingInterval,
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

/// Body sent to `PUT /user/profile` when onboarding finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_goals: Option<FitnessGoals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<BodyAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
}

impl ProfileUpdate {
    pub fn onboarding(goals: FitnessGoals, analysis: BodyAnalysis) -> Self {
        Self {
            name: None,
            fitness_goals: Some(goals),
            ai_analysis: Some(analysis),
            onboarding_completed: Some(true),
        }
    }
}
