use serde_json::Value;
use std::fmt;

/// Status string the device reports while docked
const CHARGING: &str = "charging";

/// Status string the device reports while cleaning
const CLEANING: &str = "cleaning";

/// What the vacuum reported in the `charging` field of its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    Charging,
    Cleaning,
    /// Any other value, including a missing or non-string field
    Other(String),
}

impl DeviceStatus {
    /// Read the status from a parsed status body
    pub fn from_body(body: &Value) -> Self {
        match body.get("charging") {
            Some(Value::String(s)) if s == CHARGING => DeviceStatus::Charging,
            Some(Value::String(s)) if s == CLEANING => DeviceStatus::Cleaning,
            Some(Value::String(s)) => DeviceStatus::Other(s.clone()),
            Some(other) => DeviceStatus::Other(other.to_string()),
            None => DeviceStatus::Other(String::new()),
        }
    }

    /// HomeKit `On` value for this status
    ///
    /// Only an exact `"charging"` maps to off; everything else counts as
    /// cleaning.
    pub fn is_on(&self) -> bool {
        !matches!(self, DeviceStatus::Charging)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Charging => f.write_str(CHARGING),
            DeviceStatus::Cleaning => f.write_str(CLEANING),
            DeviceStatus::Other(s) => write!(f, "other({})", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_charging_is_off() {
        let status = DeviceStatus::from_body(&json!({"charging": "charging"}));
        assert_eq!(status, DeviceStatus::Charging);
        assert!(!status.is_on());
    }

    #[test]
    fn test_cleaning_is_on() {
        let status = DeviceStatus::from_body(&json!({"charging": "cleaning"}));
        assert_eq!(status, DeviceStatus::Cleaning);
        assert!(status.is_on());
    }

    #[test]
    fn test_anything_else_is_on() {
        for body in [
            json!({"charging": "returning"}),
            json!({"charging": "Charging"}),
            json!({"charging": null}),
            json!({"charging": false}),
            json!({"charging": 1}),
            json!({}),
            json!([]),
            json!("charging"),
        ] {
            assert!(DeviceStatus::from_body(&body).is_on(), "{} should be on", body);
        }
    }
}
