//! Skinstore Core
//!
//! Platform-agnostic storefront logic: the skin catalog, fixed-point payment
//! amounts, wallet bindings, the settlement contract and the purchase state
//! machine that ties them together, plus the carousel navigation adapter.
//! Nothing here depends on a browser or a rendering framework.

pub mod amount;
pub mod catalog;
pub mod config;
pub mod navigation;
pub mod purchase;
pub mod settlement;
pub mod simulated;
pub mod wallet;

pub use amount::{AmountError, FixedPointAmount, TOKEN_DECIMALS, TOKEN_SCALE};
pub use catalog::{Catalog, CatalogError, CatalogItem};
pub use config::{ConfigError, StorefrontConfig};
pub use navigation::{
    CarouselCursor, NavCommand, Navigator, WheelSignal, handle_wheel, key_to_command,
};
pub use purchase::{
    FailureKind, PendingPurchase, PurchaseController, PurchaseError, PurchaseEvent,
    PurchaseReceipt, PurchaseStatus, TransitionError,
};
pub use settlement::{
    NeverTimer, SettlementError, SettlementOutcome, SettlementRequest, SettlementService, Timer,
};
pub use wallet::{
    BoundWallets, Chain, ChainAddress, DestinationWallet, MissingBinding, SourceWallet,
    WalletBindings, WalletError,
};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Everything the storefront needs at startup.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub catalog: Catalog,
    pub config: StorefrontConfig,
}

impl Storefront {
    /// Load the built-in catalog and build the config from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is malformed or the config lookup
    /// yields an invalid value.
    pub fn load<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            catalog: Catalog::builtin()?,
            config: StorefrontConfig::from_lookup(lookup)?,
        })
    }

    /// Wire a purchase controller for this storefront's configuration.
    pub fn controller<S, D, T>(
        &self,
        source: S,
        destination: D,
        settlement: T,
    ) -> PurchaseController<S, D, T>
    where
        S: SourceWallet,
        D: DestinationWallet,
        T: SettlementService<Authorization = D::Authorization>,
    {
        PurchaseController::new(source, destination, settlement, self.config.clone())
    }
}
