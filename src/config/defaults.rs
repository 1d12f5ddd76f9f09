//! Seed values for a fresh shop installation

use once_cell::sync::Lazy;

use super::models::{ConfigValue, DataType};

/// A single seed entry applied by `ConfigStore::initialize_defaults`
pub struct DefaultEntry {
    pub key: &'static str,
    pub value: ConfigValue,
    pub data_type: DataType,
    pub description: &'static str,
    pub category: &'static str,
}

pub static DEFAULT_ENTRIES: Lazy<Vec<DefaultEntry>> = Lazy::new(|| {
    vec![
        DefaultEntry {
            key: "shop.name",
            value: ConfigValue::String("My Shop".to_string()),
            data_type: DataType::String,
            description: "The name of your shop",
            category: "shop",
        },
        DefaultEntry {
            key: "shop.description",
            value: ConfigValue::String(
                "Your one-stop shop for everything you need".to_string(),
            ),
            data_type: DataType::Text,
            description: "Shop description",
            category: "shop",
        },
        DefaultEntry {
            key: "shop.email",
            value: ConfigValue::String("info@example.com".to_string()),
            data_type: DataType::String,
            description: "Contact email address",
            category: "shop",
        },
        DefaultEntry {
            key: "shop.phone",
            value: ConfigValue::String("+1-555-0123".to_string()),
            data_type: DataType::String,
            description: "Contact phone number",
            category: "shop",
        },
        DefaultEntry {
            key: "shop.currency",
            value: ConfigValue::String("USD".to_string()),
            data_type: DataType::String,
            description: "Default currency",
            category: "shop",
        },
        DefaultEntry {
            key: "shop.currency_symbol",
            value: ConfigValue::String("$".to_string()),
            data_type: DataType::String,
            description: "Currency symbol",
            category: "shop",
        },
        DefaultEntry {
            key: "products.per_page",
            value: ConfigValue::Integer(12),
            data_type: DataType::Integer,
            description: "Number of products per page",
            category: "products",
        },
        DefaultEntry {
            key: "products.featured_count",
            value: ConfigValue::Integer(6),
            data_type: DataType::Integer,
            description: "Number of featured products to display",
            category: "products",
        },
        DefaultEntry {
            key: "orders.allow_guest_checkout",
            value: ConfigValue::Boolean(true),
            data_type: DataType::Boolean,
            description: "Allow customers to checkout without registration",
            category: "orders",
        },
        DefaultEntry {
            key: "orders.free_shipping_threshold",
            value: ConfigValue::String("50".to_string()),
            data_type: DataType::String,
            description: "Order amount for free shipping",
            category: "orders",
        },
        DefaultEntry {
            key: "theme.primary_color",
            value: ConfigValue::String("#007bff".to_string()),
            data_type: DataType::String,
            description: "Primary theme color",
            category: "theme",
        },
        DefaultEntry {
            key: "theme.sidebar_collapsed",
            value: ConfigValue::Boolean(false),
            data_type: DataType::Boolean,
            description: "Start with sidebar collapsed",
            category: "theme",
        },
    ]
});
