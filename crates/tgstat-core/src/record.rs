// ── Stat record ──
//
// One poll's worth of fields, in the stable order consumers rely on.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Every field a complete record carries, in output order.
pub const FIELD_ORDER: [&str; 29] = [
    "datetime",
    "up_rate",
    "down_rate",
    "up_maxrate",
    "down_maxrate",
    "up_power",
    "down_power",
    "up_noisemargin",
    "down_noisemargin",
    "up_transferred",
    "down_transferred",
    "up_attenuation1",
    "up_attenuation2",
    "up_attenuation3",
    "down_attenuation1",
    "down_attenuation2",
    "down_attenuation3",
    "dsl_uptime",
    "dsl_mode",
    "dsl_type",
    "dsl_status",
    "product_vendor",
    "product_name",
    "software_version",
    "firmware_version",
    "hardware_version",
    "serial_number",
    "mac_address",
    "uptime",
];

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(_) | Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            Self::Int(_) | Self::Float(_) => None,
        }
    }
}

impl fmt::Display for StatValue {
    #[allow(clippy::float_cmp)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // Whole floats keep a trailing `.0` so columns stay typed.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for StatValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Ordered field name to value map. Serializes as a JSON object with keys
/// in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatRecord {
    fields: IndexMap<String, StatValue>,
}

impl StatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<StatValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&StatValue> {
        self.fields.get(name)
    }

    /// Append every field of `other`, in its order.
    pub fn extend(&mut self, other: Self) {
        self.fields.extend(other.fields);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &StatValue> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn float_display_keeps_decimal() {
        assert_eq!(StatValue::Float(0.0).to_string(), "0.0");
        assert_eq!(StatValue::Float(4096.0).to_string(), "4096.0");
        assert_eq!(StatValue::Float(4.85).to_string(), "4.85");
        assert_eq!(StatValue::Int(4850).to_string(), "4850");
    }

    #[test]
    fn replace_keeps_position() {
        let mut rec = StatRecord::new();
        rec.insert("a", 1_i64);
        rec.insert("b", "x");
        rec.insert("a", 2.5);
        assert_eq!(rec.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rec.get("a"), Some(&StatValue::Float(2.5)));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut rec = StatRecord::new();
        rec.insert("up_rate", 4850_i64);
        rec.insert("dsl_status", "Up");
        rec.insert("up_power", 6.9);
        let json = serde_json::to_string(&rec).expect("serialize");
        assert_eq!(json, r#"{"up_rate":4850,"dsl_status":"Up","up_power":6.9}"#);
    }
}
