use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_NEIGHBORHOOD: &str = "Avondale";
const DEFAULT_AQI: i64 = 120;
const DEFAULT_STORES: i64 = 1;
const DEFAULT_COVER: i64 = 23;

/// Neighborhood metrics submitted for a planning narrative.
///
/// Every field is optional and any JSON value is accepted; values are
/// interpolated into the prompt as written.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub neighborhood: Option<Value>,
    /// Historical AQI.
    pub aqi: Option<Value>,
    /// Grocery stores within 2 miles.
    pub stores: Option<Value>,
    /// Tree canopy cover, percent.
    pub cover: Option<Value>,
}

impl ChatRequest {
    /// Parses a request body, treating anything unparseable as an empty request.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn planning_prompt(&self) -> String {
        let neighborhood = render(&self.neighborhood, Value::from(DEFAULT_NEIGHBORHOOD));
        let aqi = render(&self.aqi, Value::from(DEFAULT_AQI));
        let stores = render(&self.stores, Value::from(DEFAULT_STORES));
        let cover = render(&self.cover, Value::from(DEFAULT_COVER));

        format!(
            "You are an advisor to a city planner. Using the metrics provided, decide whether
the neighborhood is suitable for new residential development, what to improve,
and why. Keep it under 200 words. Be specific and action-oriented.

Neighborhood: {neighborhood}
Historical AQI: {aqi}
Grocery stores within 2 miles: {stores}
Tree canopy cover (%): {cover}

Return 3 short sections:
- Suitability (Yes/No + one-sentence reason)
- Key issues
- Recommended actions (bulleted)
"
        )
    }
}

/// Strings render bare, other values as JSON; null counts as missing.
fn render(value: &Option<Value>, default: Value) -> String {
    match value.as_ref().filter(|v| !v.is_null()).unwrap_or(&default) {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: &'static str,
    pub response: String,
}

impl ChatReply {
    pub fn new(response: String) -> Self {
        Self {
            message: "ran chat",
            response,
        }
    }
}
