//! API request bodies
//!
//! Duration fields accept either JSON numbers or strings and are kept as
//! text, the same way a form input holds whatever was typed into it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{BreakConfig, FocusConfig};

/// Render a JSON field the way it would appear in a text input
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

/// Body of `PUT /settings/focus`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettingsRequest {
    pub hours: Value,
    pub minutes: Value,
    pub seconds: Value,
}

impl From<FocusSettingsRequest> for FocusConfig {
    fn from(request: FocusSettingsRequest) -> Self {
        FocusConfig {
            hours: field_text(&request.hours),
            minutes: field_text(&request.minutes),
            seconds: field_text(&request.seconds),
        }
    }
}

/// Body of `PUT /settings/break`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakSettingsRequest {
    pub enabled: bool,
    pub hours: Value,
    pub minutes: Value,
    pub seconds: Value,
}

impl From<BreakSettingsRequest> for BreakConfig {
    fn from(request: BreakSettingsRequest) -> Self {
        BreakConfig {
            enabled: request.enabled,
            hours: field_text(&request.hours),
            minutes: field_text(&request.minutes),
            seconds: field_text(&request.seconds),
        }
    }
}
