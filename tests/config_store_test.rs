//! Integration tests for the configuration store over an in-memory database

use std::collections::HashMap;

use anyhow::Result;
use serde_json::json;

use shop_config::config::repository::configuration as repository;
use shop_config::config::{Config, ConfigStore, ConfigValue, DataType};

#[tokio::test]
async fn set_get_round_trip_per_data_type() -> Result<()> {
    let config = Config::new_test().await?;

    config
        .set("shop.name", &"Test Shop".into(), DataType::String, None, Some("shop"))
        .await?;
    config
        .set("products.per_page", &ConfigValue::Integer(24), DataType::Integer, None, None)
        .await?;
    config
        .set(
            "orders.allow_guest_checkout",
            &ConfigValue::Boolean(true),
            DataType::Boolean,
            None,
            None,
        )
        .await?;
    config
        .set(
            "theme.palette",
            &ConfigValue::Json(json!({"primary": "#007bff", "levels": [1, 2]})),
            DataType::Json,
            None,
            None,
        )
        .await?;
    config
        .set(
            "shop.description",
            &"A longer piece of text".into(),
            DataType::Text,
            None,
            None,
        )
        .await?;

    assert_eq!(
        config.get("shop.name").await?,
        Some(ConfigValue::String("Test Shop".to_string()))
    );
    assert_eq!(config.get("products.per_page").await?, Some(ConfigValue::Integer(24)));
    assert_eq!(
        config.get("orders.allow_guest_checkout").await?,
        Some(ConfigValue::Boolean(true))
    );
    assert_eq!(
        config.get("theme.palette").await?,
        Some(ConfigValue::Json(json!({"primary": "#007bff", "levels": [1, 2]})))
    );
    assert_eq!(
        config.get("shop.description").await?,
        Some(ConfigValue::String("A longer piece of text".to_string()))
    );

    Ok(())
}

#[tokio::test]
async fn unset_key_returns_default_not_error() -> Result<()> {
    let config = Config::new_test().await?;

    assert_eq!(config.get("never.set").await?, None);
    assert_eq!(
        config
            .store
            .get_or("never.set", ConfigValue::String("default".to_string()))
            .await?,
        ConfigValue::String("default".to_string())
    );
    assert!(!config.has("never.set").await?);

    Ok(())
}

#[tokio::test]
async fn malformed_json_degrades_to_raw_string() -> Result<()> {
    let config = Config::new_test().await?;

    // A json-typed row whose payload is not valid JSON
    repository::upsert(config.pool(), "bad.json", Some("not json"), "json", None, None).await?;

    assert_eq!(
        config.get("bad.json").await?,
        Some(ConfigValue::String("not json".to_string()))
    );

    Ok(())
}

#[tokio::test]
async fn boolean_decode_table() -> Result<()> {
    let config = Config::new_test().await?;

    for (raw, expected) in [
        ("true", true),
        ("1", true),
        ("yes", true),
        ("on", true),
        ("false", false),
        ("0", false),
        ("", false),
        ("garbage", false),
    ] {
        repository::upsert(config.pool(), "flag", Some(raw), "boolean", None, None).await?;
        config.clear_cache();
        assert_eq!(
            config.get("flag").await?,
            Some(ConfigValue::Boolean(expected)),
            "raw value {raw:?}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn non_numeric_integer_coerces_to_zero() -> Result<()> {
    let config = Config::new_test().await?;

    repository::upsert(config.pool(), "count", Some("not a number"), "integer", None, None)
        .await?;

    assert_eq!(config.get("count").await?, Some(ConfigValue::Integer(0)));

    Ok(())
}

#[tokio::test]
async fn initialize_defaults_is_idempotent() -> Result<()> {
    let config = Config::new_test().await?;

    let first = config.initialize_defaults().await?;
    assert!(first > 0);

    // Customize one key between runs
    config
        .set("shop.name", &"Customized".into(), DataType::String, None, None)
        .await?;

    let second = config.initialize_defaults().await?;
    assert_eq!(second, 0);

    let all = config.get_all().await?;
    assert_eq!(
        all.get("shop.name"),
        Some(&ConfigValue::String("Customized".to_string()))
    );
    assert_eq!(all.get("products.per_page"), Some(&ConfigValue::Integer(12)));
    assert_eq!(
        all.get("orders.allow_guest_checkout"),
        Some(&ConfigValue::Boolean(true))
    );

    Ok(())
}

#[tokio::test]
async fn env_fallback_auto_imports_value() -> Result<()> {
    let config = Config::new_test().await?;
    let store = ConfigStore::new(config.pool().clone())
        .with_env_lookup(|name| (name == "PAYMENT_API_KEY").then(|| "sk_test_123".to_string()));

    let value = store
        .get_with_env_fallback("payment.api_key", "PAYMENT_API_KEY", None)
        .await?;
    assert_eq!(value, Some(ConfigValue::String("sk_test_123".to_string())));

    // The value was persisted with a description recording the origin
    let row = repository::find_by_key(config.pool(), "payment.api_key")
        .await?
        .expect("auto-imported row");
    assert_eq!(row.value.as_deref(), Some("sk_test_123"));
    assert_eq!(
        row.description.as_deref(),
        Some("Auto-imported from environment variable: PAYMENT_API_KEY")
    );

    // A direct get after invalidation sees the imported value
    config.clear_cache();
    assert_eq!(
        config.get("payment.api_key").await?,
        Some(ConfigValue::String("sk_test_123".to_string()))
    );

    Ok(())
}

#[tokio::test]
async fn env_fallback_missing_var_returns_default() -> Result<()> {
    let config = Config::new_test().await?;
    let store = ConfigStore::new(config.pool().clone()).with_env_lookup(|_| None);

    let value = store
        .get_with_env_fallback(
            "payment.api_key",
            "PAYMENT_API_KEY",
            Some(ConfigValue::String("none".to_string())),
        )
        .await?;

    assert_eq!(value, Some(ConfigValue::String("none".to_string())));
    assert!(!config.has("payment.api_key").await?);

    Ok(())
}

#[tokio::test]
async fn category_and_public_filters_bypass_cache() -> Result<()> {
    let config = Config::new_test().await?;

    config
        .set("shop.name", &"Test Shop".into(), DataType::String, None, Some("shop"))
        .await?;
    config
        .set("shop.email", &"test@example.com".into(), DataType::String, None, Some("shop"))
        .await?;
    config
        .set("theme.primary_color", &"#112233".into(), DataType::String, None, Some("theme"))
        .await?;
    repository::set_public(config.pool(), "shop.email", false).await?;

    let shop: HashMap<String, ConfigValue> = config.store.get_by_category("shop").await?;
    assert_eq!(shop.len(), 2);
    assert!(shop.contains_key("shop.name"));
    assert!(shop.contains_key("shop.email"));

    let public = config.store.get_public().await?;
    assert!(public.contains_key("shop.name"));
    assert!(public.contains_key("theme.primary_color"));
    assert!(!public.contains_key("shop.email"));

    // Category queries hit the database even while the snapshot is warm
    repository::upsert(config.pool(), "shop.phone", Some("+1-555-9999"), "string", None, Some("shop"))
        .await?;
    let shop = config.store.get_by_category("shop").await?;
    assert!(shop.contains_key("shop.phone"));

    Ok(())
}

#[tokio::test]
async fn null_valued_rows_are_invisible_to_reads() -> Result<()> {
    let config = Config::new_test().await?;

    repository::upsert(config.pool(), "empty.key", None, "string", None, None).await?;

    assert_eq!(config.get("empty.key").await?, None);
    assert!(!config.has("empty.key").await?);
    assert!(!config.get_all().await?.contains_key("empty.key"));

    Ok(())
}

#[tokio::test]
async fn upsert_preserves_created_at_and_metadata() -> Result<()> {
    let config = Config::new_test().await?;

    config
        .set(
            "shop.name",
            &"First".into(),
            DataType::String,
            Some("Original description"),
            Some("shop"),
        )
        .await?;
    let before = repository::find_by_key(config.pool(), "shop.name").await?.unwrap();

    config
        .set(
            "shop.name",
            &"Second".into(),
            DataType::Text,
            Some("Replacement description"),
            Some("other"),
        )
        .await?;
    let after = repository::find_by_key(config.pool(), "shop.name").await?.unwrap();

    assert_eq!(after.value.as_deref(), Some("Second"));
    // Type, metadata and created_at belong to the original insert
    assert_eq!(after.data_type, "string");
    assert_eq!(after.description.as_deref(), Some("Original description"));
    assert_eq!(after.category.as_deref(), Some("shop"));
    assert_eq!(after.created_at, before.created_at);

    Ok(())
}

#[tokio::test]
async fn clear_cache_reflects_stale_changes() -> Result<()> {
    let config = Config::new_test().await?;

    config
        .set("shop.name", &"Cached".into(), DataType::String, None, None)
        .await?;
    assert_eq!(
        config.get("shop.name").await?,
        Some(ConfigValue::String("Cached".to_string()))
    );

    // Out-of-band write: the warm snapshot keeps serving the old value
    repository::upsert(config.pool(), "shop.name", Some("Fresh"), "string", None, None).await?;
    assert_eq!(
        config.get("shop.name").await?,
        Some(ConfigValue::String("Cached".to_string()))
    );

    config.clear_cache();
    let all = config.get_all().await?;
    assert_eq!(all.get("shop.name"), Some(&ConfigValue::String("Fresh".to_string())));

    Ok(())
}

#[tokio::test]
async fn shop_helpers_fall_back_when_unset() -> Result<()> {
    let config = Config::new_test().await?;

    assert_eq!(config.store.shop_name().await?, "My Shop");
    assert_eq!(config.store.currency().await?, "USD");
    assert_eq!(config.store.currency_symbol().await?, "$");

    config
        .set("shop.currency", &"EUR".into(), DataType::String, None, None)
        .await?;
    assert_eq!(config.store.currency().await?, "EUR");

    Ok(())
}
