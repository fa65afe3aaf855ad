//! Wallet bindings for the two chains involved in a purchase.
//!
//! The source chain (Solana) receives the skin; the destination chain
//! (Ethereum) holds the USDC that pays for it and must be activated to
//! obtain a payment authorization. Both bindings are owned by external
//! wallet-connection providers; this crate only reads them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Chains the storefront bridges between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Solana,
    Ethereum,
}

impl Chain {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Solana => "Solana",
            Self::Ethereum => "Ethereum",
        }
    }
}

/// A connected account address on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainAddress {
    pub chain: Chain,
    pub address: String,
}

impl ChainAddress {
    #[must_use]
    pub fn solana(address: impl Into<String>) -> Self {
        Self {
            chain: Chain::Solana,
            address: address.into(),
        }
    }

    #[must_use]
    pub fn ethereum(address: impl Into<String>) -> Self {
        Self {
            chain: Chain::Ethereum,
            address: address.into(),
        }
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Which binding(s) were absent when a purchase was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingBinding {
    Source,
    Destination,
    Both,
}

impl fmt::Display for MissingBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Source => "Solana wallet not connected",
            Self::Destination => "Ethereum wallet not connected",
            Self::Both => "Solana and Ethereum wallets not connected",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("no {0} wallet provider is available")]
    Unavailable(&'static str),
    #[error("wallet request rejected: {0}")]
    Rejected(String),
    #[error("wallet returned no account")]
    NoAccount,
}

/// Read-only view of the source-chain (Solana) wallet.
pub trait SourceWallet {
    fn address(&self) -> Option<ChainAddress>;
}

/// Destination-chain (Ethereum) wallet. Activation must be awaited before a
/// settlement call and yields the capability that authorizes the payment.
#[async_trait(?Send)]
pub trait DestinationWallet {
    type Authorization;

    fn address(&self) -> Option<ChainAddress>;

    /// Activate the browser wallet and hand back a payment authorization.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet is unavailable or the user rejects the request.
    async fn activate(&self) -> Result<Self::Authorization, WalletError>;
}

/// Snapshot of both bindings at the moment of action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBindings {
    pub source: Option<ChainAddress>,
    pub destination: Option<ChainAddress>,
}

/// Both addresses, present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundWallets {
    pub source: ChainAddress,
    pub destination: ChainAddress,
}

impl WalletBindings {
    #[must_use]
    pub fn read<S, D>(source: &S, destination: &D) -> Self
    where
        S: SourceWallet + ?Sized,
        D: DestinationWallet + ?Sized,
    {
        Self {
            source: source.address(),
            destination: destination.address(),
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.source.is_some() && self.destination.is_some()
    }

    /// # Errors
    ///
    /// Returns which side is missing when either binding is absent.
    pub fn require(self) -> Result<BoundWallets, MissingBinding> {
        match (self.source, self.destination) {
            (Some(source), Some(destination)) => Ok(BoundWallets {
                source,
                destination,
            }),
            (None, Some(_)) => Err(MissingBinding::Source),
            (Some(_), None) => Err(MissingBinding::Destination),
            (None, None) => Err(MissingBinding::Both),
        }
    }
}
