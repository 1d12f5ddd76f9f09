use anyhow::Result;
use log::info;

use crate::config::models::parse_bool;
use crate::config::{Config, ConfigValue, DataType};

/// Set a configuration value
///
/// The raw CLI string is validated against the requested data type before
/// anything is persisted; the store itself stays lenient about what it
/// reads back.
pub async fn set_command(
    key: String,
    value: String,
    data_type: String,
    description: Option<String>,
    category: Option<String>,
) -> Result<()> {
    info!("Setting {} to {}", key, value);

    let data_type: DataType = data_type.parse()?;
    let value = parse_cli_value(&value, data_type)?;

    let config = Config::load().await?;
    config
        .set(&key, &value, data_type, description.as_deref(), category.as_deref())
        .await?;

    println!("Set {} = {}", key, value);
    Ok(())
}

fn parse_cli_value(raw: &str, data_type: DataType) -> Result<ConfigValue> {
    match data_type {
        DataType::String | DataType::Text => Ok(ConfigValue::String(raw.to_string())),
        DataType::Integer => {
            let value: i64 = raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("Invalid integer value '{}' for key of type integer", raw)
            })?;
            Ok(ConfigValue::Integer(value))
        }
        DataType::Boolean => {
            let lowered = raw.trim().to_ascii_lowercase();
            if parse_bool(&lowered) {
                Ok(ConfigValue::Boolean(true))
            } else if matches!(lowered.as_str(), "false" | "0" | "no" | "off") {
                Ok(ConfigValue::Boolean(false))
            } else {
                anyhow::bail!("Invalid boolean value '{}'. Use true/false, 1/0, yes/no or on/off", raw)
            }
        }
        DataType::Json => {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|err| anyhow::anyhow!("Invalid JSON value: {}", err))?;
            Ok(ConfigValue::Json(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cli_value_rejects_bad_input() {
        assert!(parse_cli_value("abc", DataType::Integer).is_err());
        assert!(parse_cli_value("maybe", DataType::Boolean).is_err());
        assert!(parse_cli_value("{ not json", DataType::Json).is_err());
    }

    #[test]
    fn test_parse_cli_value_accepts_typed_input() {
        assert_eq!(
            parse_cli_value("42", DataType::Integer).unwrap(),
            ConfigValue::Integer(42)
        );
        assert_eq!(
            parse_cli_value("On", DataType::Boolean).unwrap(),
            ConfigValue::Boolean(true)
        );
        assert_eq!(
            parse_cli_value("off", DataType::Boolean).unwrap(),
            ConfigValue::Boolean(false)
        );
        assert_eq!(
            parse_cli_value(r#"{"a":1}"#, DataType::Json).unwrap(),
            ConfigValue::Json(json!({"a": 1}))
        );
        assert_eq!(
            parse_cli_value("plain", DataType::Text).unwrap(),
            ConfigValue::String("plain".to_string())
        );
    }
}
