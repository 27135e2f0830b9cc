//! Paper-trading configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{Quantity, NSE_SUFFIX};

/// Trade defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingConfig {
    /// Exchange suffix every ticker must carry.
    #[serde(default = "default_exchange_suffix")]
    pub exchange_suffix: String,

    /// Quantity used when an instruction names none.
    #[serde(default = "default_quantity")]
    pub default_quantity: Quantity,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            exchange_suffix: default_exchange_suffix(),
            default_quantity: default_quantity(),
        }
    }
}

fn default_exchange_suffix() -> String {
    NSE_SUFFIX.into()
}

const fn default_quantity() -> Quantity {
    1
}
