use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::dto::{CompletionRequest, CompletionResponse, WireMessage};
use super::{join_url, Gateway, AI_SERVICE};
use crate::error::{ApiError, ApiResult};
use crate::models::{BodyAnalysis, ChatMessage, FitnessGoals, FoodAnalysis, Sender};

pub const COACH_SYSTEM_PROMPT: &str = "You are a professional fitness and nutrition coach. \
Provide helpful, accurate, and motivating advice about fitness, nutrition, and healthy lifestyle \
habits. Be encouraging and supportive while giving practical, actionable advice.";

const BODY_MAX_TOKENS: u32 = 1000;
const CHAT_MAX_TOKENS: u32 = 500;
const FOOD_MAX_TOKENS: u32 = 300;

const FOOD_PROMPT: &str = "Analyze this food image and provide nutritional information. \
Please identify the food items and estimate the calories, protein, carbs, and fat content. \
Format the response as JSON with the following structure: \
{\"name\": string, \"calories\": number, \"protein\": number, \"carbs\": number, \"fat\": number, \"confidence\": number}";

fn or_unknown<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string())
        .unwrap_or_else(|| "not provided".to_string())
}

pub(crate) fn body_prompt(goals: &FitnessGoals) -> String {
    format!(
        "Analyze this body photo and provide a comprehensive fitness and nutrition plan. \
User info: Age {age}, Gender {gender}, Height {height}cm, Weight {weight}kg, Goal: {goal}, \
Activity Level: {activity}.\n\n\
Please provide:\n\
1. Estimated body fat percentage\n\
2. Daily calorie target\n\
3. Macro breakdown (protein, carbs, fat in grams)\n\
4. Workout plan recommendation\n\
5. Key areas to focus on\n\n\
Format the response as JSON with the following structure:\n\
{{\n\
  \"bodyFatPercentage\": number,\n\
  \"dailyCalories\": number,\n\
  \"macros\": {{\"protein\": number, \"carbs\": number, \"fat\": number}},\n\
  \"workoutPlan\": {{\"type\": string, \"frequency\": number, \"duration\": number}},\n\
  \"focusAreas\": [string],\n\
  \"recommendations\": [string]\n\
}}",
        age = or_unknown(goals.age),
        gender = or_unknown(goals.gender.map(|g| g.as_str())),
        height = or_unknown(goals.height),
        weight = or_unknown(goals.current_weight),
        goal = goals.goal_type.as_str(),
        activity = goals.activity_level.as_str(),
    )
}

/// Models sometimes wrap JSON in a markdown fence.
fn strip_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn parse_model_json<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    serde_json::from_str(strip_fence(text)).map_err(|e| ApiError::Parse(e.to_string()))
}

fn non_negative(field: &str, v: f64) -> ApiResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ApiError::InvalidResponse(format!("{field} must be >= 0, got {v}")))
    }
}

pub(crate) fn validate_body(a: &BodyAnalysis) -> ApiResult<()> {
    if !(0.0..=100.0).contains(&a.body_fat_percentage) {
        return Err(ApiError::InvalidResponse(format!(
            "bodyFatPercentage out of range: {}",
            a.body_fat_percentage
        )));
    }
    if !(a.daily_calories.is_finite() && a.daily_calories > 0.0) {
        return Err(ApiError::InvalidResponse(format!(
            "dailyCalories must be positive, got {}",
            a.daily_calories
        )));
    }
    non_negative("macros.protein", a.macros.protein)?;
    non_negative("macros.carbs", a.macros.carbs)?;
    non_negative("macros.fat", a.macros.fat)?;
    non_negative("workoutPlan.frequency", a.workout_plan.frequency)?;
    non_negative("workoutPlan.duration", a.workout_plan.duration)
}

pub(crate) fn validate_food(a: &FoodAnalysis) -> ApiResult<()> {
    non_negative("calories", a.calories)?;
    non_negative("protein", a.protein)?;
    non_negative("carbs", a.carbs)?;
    non_negative("fat", a.fat)?;
    if !(0.0..=1.0).contains(&a.confidence) {
        return Err(ApiError::InvalidResponse(format!(
            "confidence out of range: {}",
            a.confidence
        )));
    }
    Ok(())
}

fn to_wire(msg: &ChatMessage) -> WireMessage {
    match msg.sender {
        Sender::User => WireMessage::user(&msg.content),
        Sender::Ai => WireMessage::assistant(&msg.content),
    }
}

impl Gateway {
    async fn complete(&self, request: &CompletionRequest<'_>) -> ApiResult<String> {
        let url = join_url(&self.config.ai.base_url, "chat/completions");
        debug!(
            model = request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "completion request"
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.ai.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::transport(AI_SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "completion request rejected");
            return Err(ApiError::Network {
                service: AI_SERVICE,
                status: status.as_u16(),
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ApiError::Parse("completion has no message content".into()))
    }

    #[instrument(skip(self, goals), fields(goal = goals.goal_type.as_str()))]
    pub async fn analyze_body_image(
        &self,
        image_uri: &str,
        goals: &FitnessGoals,
    ) -> ApiResult<BodyAnalysis> {
        let request = CompletionRequest {
            model: &self.config.ai.vision_model,
            messages: vec![WireMessage::user_with_image(body_prompt(goals), image_uri)],
            max_tokens: BODY_MAX_TOKENS,
        };
        let text = self.complete(&request).await?;
        let analysis: BodyAnalysis = parse_model_json(&text).map_err(|e| {
            warn!(error = %e, "body analysis was not valid json");
            e
        })?;
        validate_body(&analysis)?;
        Ok(analysis)
    }

    #[instrument(skip(self, message, context), fields(context_len = context.len()))]
    pub async fn get_chat_response(
        &self,
        message: &str,
        context: &[ChatMessage],
    ) -> ApiResult<String> {
        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(WireMessage::system(COACH_SYSTEM_PROMPT));
        messages.extend(context.iter().map(to_wire));
        messages.push(WireMessage::user(message));

        let request = CompletionRequest {
            model: &self.config.ai.chat_model,
            messages,
            max_tokens: CHAT_MAX_TOKENS,
        };
        self.complete(&request).await
    }

    #[instrument(skip(self))]
    pub async fn analyze_food_image(&self, image_uri: &str) -> ApiResult<FoodAnalysis> {
        let request = CompletionRequest {
            model: &self.config.ai.vision_model,
            messages: vec![WireMessage::user_with_image(FOOD_PROMPT.to_string(), image_uri)],
            max_tokens: FOOD_MAX_TOKENS,
        };
        let text = self.complete(&request).await?;
        let analysis: FoodAnalysis = parse_model_json(&text)?;
        validate_food(&analysis)?;
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Gender, GoalType};

    #[test]
    fn prompt_embeds_goal_and_missing_metrics() {
        let mut goals = FitnessGoals::new(GoalType::LoseWeight, ActivityLevel::Sedentary);
        goals.age = Some(31);
        goals.gender = Some(Gender::Female);
        let p = body_prompt(&goals);
        assert!(p.contains("Age 31"));
        assert!(p.contains("Gender female"));
        assert!(p.contains("Weight not provided"));
        assert!(p.contains("Goal: lose_weight"));
        assert!(p.contains("Activity Level: sedentary"));
        assert!(p.contains("\"bodyFatPercentage\": number"));
    }

    #[test]
    fn fenced_json_parses() {
        let text = "```json\n{\"name\":\"Apple\",\"calories\":95,\"protein\":0.5,\"carbs\":25,\"fat\":0.3,\"confidence\":0.92}\n```";
        let food: FoodAnalysis = parse_model_json(text).unwrap();
        assert_eq!(food.name, "Apple");
    }

    #[test]
    fn prose_is_a_parse_error() {
        let err = parse_model_json::<FoodAnalysis>("I think this is an apple.").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn food_confidence_must_be_a_probability() {
        let food = FoodAnalysis {
            name: "Apple".into(),
            calories: 95.0,
            protein: 0.5,
            carbs: 25.0,
            fat: 0.3,
            confidence: 3.0,
        };
        assert!(matches!(validate_food(&food), Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn body_fat_over_100_is_rejected() {
        let text = r#"{"bodyFatPercentage":140,"dailyCalories":2000,
            "macros":{"protein":150,"carbs":200,"fat":60},
            "workoutPlan":{"type":"strength","frequency":4,"duration":45}}"#;
        let a: BodyAnalysis = parse_model_json(text).unwrap();
        assert!(validate_body(&a).is_err());
    }
}
