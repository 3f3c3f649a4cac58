//! Engine configuration: generation defaults and storefront thresholds.
//!
//! Values come from `Default`, from a deserialized settings document, or from
//! `STOREFRONT_VARIANTS_*` environment variables via [`VariantConfig::from_env`].

use serde::{Deserialize, Serialize};

use crate::variant::VariantStatus;

pub const MAX_COMBINATIONS_ENV: &str = "STOREFRONT_VARIANTS_MAX_COMBINATIONS";
pub const LOW_STOCK_ENV: &str = "STOREFRONT_VARIANTS_LOW_STOCK";
pub const DEFAULT_PRICE_ENV: &str = "STOREFRONT_VARIANTS_DEFAULT_PRICE";
pub const DEFAULT_STOCK_ENV: &str = "STOREFRONT_VARIANTS_DEFAULT_STOCK";
pub const SKU_PREFIX_ENV: &str = "STOREFRONT_VARIANTS_SKU_PREFIX";

/// Field values given to rows the generator creates from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantDefaults {
    /// Price in smallest currency unit.
    pub price: u64,
    pub discount: u8,
    pub stock: u32,
    pub status: VariantStatus,
    /// Prepended to derived SKUs (e.g. `TEE` gives `TEE-RED-M`).
    pub sku_prefix: Option<String>,
}

impl Default for VariantDefaults {
    fn default() -> Self {
        Self {
            price: 0,
            discount: 0,
            stock: 0,
            status: VariantStatus::Active,
            sku_prefix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    /// Upper bound on rows a single regeneration may produce.
    pub max_combinations: usize,
    /// Stock at or below this (and above zero) is reported as low.
    pub low_stock_threshold: u32,
    pub defaults: VariantDefaults,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            max_combinations: 500,
            low_stock_threshold: 5,
            defaults: VariantDefaults::default(),
        }
    }
}

impl VariantConfig {
    /// Defaults overridden by any `STOREFRONT_VARIANTS_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup (tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, MAX_COMBINATIONS_ENV) {
            config.max_combinations = v;
        }
        if let Some(v) = parse_var(&lookup, LOW_STOCK_ENV) {
            config.low_stock_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, DEFAULT_PRICE_ENV) {
            config.defaults.price = v;
        }
        if let Some(v) = parse_var(&lookup, DEFAULT_STOCK_ENV) {
            config.defaults.stock = v;
        }
        if let Some(prefix) = lookup(SKU_PREFIX_ENV) {
            let prefix = prefix.trim();
            if !prefix.is_empty() {
                config.defaults.sku_prefix = Some(prefix.to_string());
            }
        }

        config
    }
}

fn parse_var<T: core::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting; using default");
            None
        }
    }
}
