//! Browser wiring of the storefront: configuration baked in at build time
//! and a purchase controller over the injected wallets and bridge.

pub use skinstore_core::*;

use crate::bridge::{BrowserTimer, WormholeBridge};
use crate::wallet::{InjectedEthereumWallet, PhantomWallet};
use skinstore_core::config::{SETTLEMENT_TIMEOUT_KEY, TOKEN_ADDRESS_KEY};

pub type WebController = PurchaseController<PhantomWallet, InjectedEthereumWallet, WormholeBridge>;

fn build_env(key: &str) -> Option<String> {
    match key {
        TOKEN_ADDRESS_KEY => option_env!("SKINSTORE_USDC_TOKEN_ADDRESS"),
        SETTLEMENT_TIMEOUT_KEY => option_env!("SKINSTORE_SETTLEMENT_TIMEOUT_MS"),
        _ => None,
    }
    .map(str::to_string)
}

/// Storefront configuration from variables set when the bundle was built.
///
/// An unparsable timeout is logged and replaced by the default.
#[must_use]
pub fn load_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(build_env).unwrap_or_else(|err| {
        log::error!("{err}; falling back to default settlement timeout");
        StorefrontConfig::default()
            .with_token_address(build_env(TOKEN_ADDRESS_KEY).unwrap_or_default())
    })
}

/// Controller over Phantom, the injected Ethereum provider and the Wormhole bridge.
#[must_use]
pub fn create_web_controller(config: StorefrontConfig) -> WebController {
    if config.token_address.is_empty() {
        log::warn!("{TOKEN_ADDRESS_KEY} is not set; purchases will pass an empty token address");
    }
    let controller = PurchaseController::new(
        PhantomWallet,
        InjectedEthereumWallet::new(),
        WormholeBridge,
        config,
    );
    controller.set_timer(BrowserTimer);
    controller
}
