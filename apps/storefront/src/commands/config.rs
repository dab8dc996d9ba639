//! # Config Commands
//!
//! Store settings plus the pricing constants, so the frontend can show
//! "free shipping over $50.00" without hardcoding it.

use serde::Serialize;
use tracing::debug;

use crate::config::StorefrontConfig;
use folio_core::{Money, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, SALES_TAX_RATE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub store_name: String,
    pub currency_symbol: String,
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
    pub tax_rate_bps: u32,
}

/// Gets the current storefront configuration (read-only).
pub fn get_config(config: &StorefrontConfig) -> ConfigResponse {
    debug!("get_config command");
    ConfigResponse {
        store_name: config.store_name.clone(),
        currency_symbol: config.currency_symbol.clone(),
        free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
        flat_shipping_fee: FLAT_SHIPPING_FEE,
        tax_rate_bps: SALES_TAX_RATE.bps(),
    }
}
