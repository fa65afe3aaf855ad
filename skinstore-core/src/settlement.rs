//! Contract with the external cross-chain settlement service.
//!
//! The bridge that actually moves USDC and records the purchase lives
//! outside this crate. It is consumed through [`SettlementService`]; its
//! internal protocol is opaque here.

use crate::amount::FixedPointAmount;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Everything the bridge needs to settle one purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRequest<A> {
    pub amount: FixedPointAmount,
    /// Destination-chain (Ethereum) account paying for the skin
    pub buyer_address: String,
    /// Source-chain (Solana) account receiving the skin
    pub recipient_address: String,
    /// Capability obtained from the activated destination wallet
    pub authorization: A,
    /// Payment token contract; empty when unconfigured
    pub token_contract_address: String,
}

/// Result reported by the bridge when the call itself completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub success: bool,
}

impl SettlementOutcome {
    pub const SUCCESS: Self = Self { success: true };
    pub const DECLINED: Self = Self { success: false };
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("settlement service unavailable: {0}")]
    Unavailable(String),
    #[error("settlement call failed: {0}")]
    Failed(String),
}

#[async_trait(?Send)]
pub trait SettlementService {
    type Authorization: 'static;

    /// Submit a purchase to the bridge.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge cannot be reached or throws while settling.
    async fn purchase(
        &self,
        request: SettlementRequest<Self::Authorization>,
    ) -> Result<SettlementOutcome, SettlementError>;
}

/// Source of delays used to bound the settlement call.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Timer that never fires; settlement calls are left unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTimer;

impl Timer for NeverTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(futures::future::pending())
    }
}
