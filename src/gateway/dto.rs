use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- chat completions ---

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage {
    pub role: &'static str,
    pub content: WireContent,
}

impl WireMessage {
    pub fn system(text: &str) -> Self {
        Self {
            role: "system",
            content: WireContent::Text(text.to_string()),
        }
    }

    pub fn user(text: &str) -> Self {
        Self {
            role: "user",
            content: WireContent::Text(text.to_string()),
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            role: "assistant",
            content: WireContent::Text(text.to_string()),
        }
    }

    /// Instruction plus an image reference; the image is sent by URL, not uploaded.
    pub fn user_with_image(text: String, image_uri: &str) -> Self {
        Self {
            role: "user",
            content: WireContent::Parts(vec![
                ContentPart::Text { text },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_uri.to_string(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// --- barcode database ---

#[derive(Debug, Deserialize)]
pub(crate) struct ProductLookup {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Product {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub nutriments: Nutriments,
}

/// Values arrive as numbers or numeric strings depending on the product.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Nutriments {
    #[serde(default)]
    pub energy_kcal_100g: Option<Value>,
    #[serde(default, rename = "energy-kcal_100g")]
    pub energy_kcal_100g_hyphen: Option<Value>,
    #[serde(default)]
    pub proteins_100g: Option<Value>,
    #[serde(default)]
    pub carbohydrates_100g: Option<Value>,
    #[serde(default)]
    pub fat_100g: Option<Value>,
}

impl Nutriments {
    /// Products carry either spelling of the energy key, sometimes both.
    pub fn calories(&self) -> f64 {
        match nutrient(&self.energy_kcal_100g) {
            n if n > 0.0 => n,
            _ => nutrient(&self.energy_kcal_100g_hyphen),
        }
    }
}

pub(crate) fn nutrient(v: &Option<Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

// --- first-party backend ---

#[derive(Debug, Serialize)]
pub(crate) struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_message_has_text_then_image_part() {
        let msg = WireMessage::user_with_image("describe".into(), "https://img/x.jpg");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            v,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "describe"},
                    {"type": "image_url", "image_url": {"url": "https://img/x.jpg"}}
                ]
            })
        );
    }

    #[test]
    fn nutrient_accepts_strings_and_defaults_to_zero() {
        assert_eq!(nutrient(&Some(json!(12.5))), 12.5);
        assert_eq!(nutrient(&Some(json!("7"))), 7.0);
        assert_eq!(nutrient(&Some(json!(null))), 0.0);
        assert_eq!(nutrient(&Some(json!(-4))), 0.0);
        assert_eq!(nutrient(&None), 0.0);
    }

    #[test]
    fn hyphenated_energy_key_is_accepted() {
        let n: Nutriments = serde_json::from_value(json!({"energy-kcal_100g": 250})).unwrap();
        assert_eq!(n.calories(), 250.0);
    }

    #[test]
    fn both_energy_spellings_decode_together() {
        let n: Nutriments = serde_json::from_value(json!({
            "energy_kcal_100g": 200,
            "energy-kcal_100g": 210
        }))
        .unwrap();
        assert_eq!(n.calories(), 200.0);

        let n: Nutriments = serde_json::from_value(json!({
            "energy_kcal_100g": "",
            "energy-kcal_100g": "180"
        }))
        .unwrap();
        assert_eq!(n.calories(), 180.0);
    }
}
