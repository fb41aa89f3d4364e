//! Loop and pump telemetry from the Nightscout `pebble` endpoint.
//!
//! The payload is loosely structured and varies between uploaders, so every
//! field is extracted independently. A missing or oddly typed field leaves
//! that field unknown and never affects the others.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::format::UNKNOWN_READING;

/// Latest telemetry snapshot. An empty string means the field is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OtherInfo {
    pub iob: String,
    pub cob: String,
    pub pump_clock: String,
    pub pump_battery: String,
    pub pump_reservoir: String,
}

impl OtherInfo {
    /// Extract telemetry from a properties payload. Never fails as a whole.
    pub fn from_properties(properties: &Value) -> Self {
        let pump_data = properties.get("pump").and_then(|p| p.get("data"));
        let pump_display = |key: &str| {
            pump_data
                .and_then(|d| d.get(key))
                .and_then(|v| v.get("display"))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let info = OtherInfo {
            iob: properties
                .get("bgs")
                .and_then(Value::as_array)
                .and_then(|bgs| bgs.first())
                .and_then(|bg| bg.get("iob"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default(),
            cob: properties
                .get("cob")
                .and_then(|c| c.get("display"))
                .and_then(display_text)
                .unwrap_or_default(),
            pump_clock: pump_display("clock").unwrap_or_default(),
            pump_battery: pump_display("battery").unwrap_or_default(),
            pump_reservoir: pump_display("reservoir").unwrap_or_default(),
        };

        let missing = info.missing_fields();
        if !missing.is_empty() {
            info!("unable to get all loop properties, missing: {}", missing.join(", "));
        }
        info
    }

    /// Names of the fields that are still unknown.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("iob", &self.iob),
            ("cob", &self.cob),
            ("pump_clock", &self.pump_clock),
            ("pump_battery", &self.pump_battery),
            ("pump_reservoir", &self.pump_reservoir),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn iob_or_unknown(&self) -> &str {
        or_unknown(&self.iob)
    }
}

/// Render a telemetry field, substituting the unknown marker when empty.
pub fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        UNKNOWN_READING
    } else {
        value
    }
}

/// `cob.display` may be an integer, a float or a string.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
