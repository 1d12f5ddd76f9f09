//! Data models for the configuration database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Storage type tag for a configuration entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Boolean,
    Json,
    Text,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Boolean => "boolean",
            DataType::Json => "json",
            DataType::Text => "text",
        }
    }

    /// Lenient parse for tags read back from the database. An unknown tag
    /// falls back to `String` so a bad row never poisons a read.
    pub fn from_tag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "integer" => DataType::Integer,
            "boolean" => DataType::Boolean,
            "json" => DataType::Json,
            "text" => DataType::Text,
            _ => DataType::String,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strict parse for user-supplied tags (CLI `--type` flag).
impl std::str::FromStr for DataType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "integer" => Ok(DataType::Integer),
            "boolean" => Ok(DataType::Boolean),
            "json" => Ok(DataType::Json),
            "text" => Ok(DataType::Text),
            other => anyhow::bail!(
                "Unknown data type '{}'. Expected one of: string, integer, boolean, json, text",
                other
            ),
        }
    }
}

/// A decoded configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Json(serde_json::Value),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ConfigValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Encode for storage under the given data type. Json values print as
    /// compact JSON, everything else as its display string.
    pub fn to_raw(&self, data_type: DataType) -> String {
        match (data_type, self) {
            (DataType::Json, ConfigValue::Json(v)) => v.to_string(),
            _ => self.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::String(v) => write!(f, "{}", v),
            ConfigValue::Integer(v) => write!(f, "{}", v),
            ConfigValue::Boolean(v) => write!(f, "{}", v),
            ConfigValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::String(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::String(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Integer(v)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Boolean(v)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(v: serde_json::Value) -> Self {
        ConfigValue::Json(v)
    }
}

/// Database row for a configuration entry
#[derive(Debug, Clone, FromRow)]
pub struct DbConfiguration {
    pub key: String,
    pub value: Option<String>,
    pub data_type: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_editable: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbConfiguration {
    /// Decode the stored text under this row's data type. Rows with a NULL
    /// value have no typed value and are skipped by cache loads.
    pub fn typed_value(&self) -> Option<ConfigValue> {
        let raw = self.value.as_deref()?;
        Some(decode_value(raw, DataType::from_tag(&self.data_type)))
    }
}

/// Decode a raw stored string under `data_type`. Total: a non-numeric
/// integer coerces to 0 and malformed JSON degrades to the raw string.
pub fn decode_value(raw: &str, data_type: DataType) -> ConfigValue {
    match data_type {
        DataType::Integer => ConfigValue::Integer(raw.trim().parse().unwrap_or(0)),
        DataType::Boolean => ConfigValue::Boolean(parse_bool(raw)),
        DataType::Json => match serde_json::from_str(raw) {
            Ok(v) => ConfigValue::Json(v),
            Err(_) => ConfigValue::String(raw.to_string()),
        },
        DataType::String | DataType::Text => ConfigValue::String(raw.to_string()),
    }
}

/// Truthy set matches common env-var conventions: true/1/yes/on,
/// case-insensitive. Everything else is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
