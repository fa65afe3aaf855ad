//! In-memory wallets and a scripted bridge.
//!
//! Used by the QA tester and the test suites to drive the purchase
//! controller without a browser or a live bridge. Every type is a cheap
//! clonable handle so a caller can keep one copy while the controller owns
//! another.

use crate::amount::FixedPointAmount;
use crate::settlement::{
    SettlementError, SettlementOutcome, SettlementRequest, SettlementService, Timer,
};
use crate::wallet::{ChainAddress, DestinationWallet, SourceWallet, WalletError};
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct SimulatedSourceWallet {
    address: Rc<RefCell<Option<ChainAddress>>>,
}

impl SimulatedSourceWallet {
    #[must_use]
    pub fn connected(address: &str) -> Self {
        let wallet = Self::default();
        wallet.connect(address);
        wallet
    }

    pub fn connect(&self, address: &str) {
        self.address.replace(Some(ChainAddress::solana(address)));
    }

    pub fn disconnect(&self) {
        self.address.replace(None);
    }
}

impl SourceWallet for SimulatedSourceWallet {
    fn address(&self) -> Option<ChainAddress> {
        self.address.borrow().clone()
    }
}

/// Authorization handed out by [`SimulatedDestinationWallet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedAuthorization {
    pub account: String,
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedDestinationWallet {
    address: Rc<RefCell<Option<ChainAddress>>>,
    refuse_with: Rc<RefCell<Option<WalletError>>>,
    activations: Rc<Cell<usize>>,
}

impl SimulatedDestinationWallet {
    #[must_use]
    pub fn connected(address: &str) -> Self {
        let wallet = Self::default();
        wallet.connect(address);
        wallet
    }

    pub fn connect(&self, address: &str) {
        self.address.replace(Some(ChainAddress::ethereum(address)));
    }

    pub fn disconnect(&self) {
        self.address.replace(None);
    }

    /// Make the next activations fail with `error`.
    pub fn refuse_activation(&self, error: WalletError) {
        self.refuse_with.replace(Some(error));
    }

    #[must_use]
    pub fn activations(&self) -> usize {
        self.activations.get()
    }
}

#[async_trait(?Send)]
impl DestinationWallet for SimulatedDestinationWallet {
    type Authorization = SimulatedAuthorization;

    fn address(&self) -> Option<ChainAddress> {
        self.address.borrow().clone()
    }

    async fn activate(&self) -> Result<Self::Authorization, WalletError> {
        self.activations.set(self.activations.get() + 1);
        if let Some(err) = self.refuse_with.borrow().clone() {
            return Err(err);
        }
        self.address
            .borrow()
            .as_ref()
            .map(|addr| SimulatedAuthorization {
                account: addr.address.clone(),
            })
            .ok_or(WalletError::NoAccount)
    }
}

/// How the scripted bridge answers one call.
#[derive(Debug)]
pub enum ScriptedResponse {
    Succeed,
    Decline,
    Fail(String),
    /// Wait for the paired sender to deliver the result.
    Hold(oneshot::Receiver<Result<SettlementOutcome, SettlementError>>),
    /// Never resolve.
    Hang,
}

/// A settlement call as the bridge saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub amount: FixedPointAmount,
    pub buyer_address: String,
    pub recipient_address: String,
    pub authorized_account: String,
    pub token_contract_address: String,
}

/// Bridge answering from a queue of responses; succeeds once the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSettlement {
    script: Rc<RefCell<VecDeque<ScriptedResponse>>>,
    calls: Rc<RefCell<Vec<RecordedCall>>>,
}

impl ScriptedSettlement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ScriptedResponse) {
        self.script.borrow_mut().push_back(response);
    }

    /// Queue a held response and return the sender that resolves it.
    #[must_use]
    pub fn hold(&self) -> oneshot::Sender<Result<SettlementOutcome, SettlementError>> {
        let (tx, rx) = oneshot::channel();
        self.push(ScriptedResponse::Hold(rx));
        tx
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl SettlementService for ScriptedSettlement {
    type Authorization = SimulatedAuthorization;

    async fn purchase(
        &self,
        request: SettlementRequest<Self::Authorization>,
    ) -> Result<SettlementOutcome, SettlementError> {
        self.calls.borrow_mut().push(RecordedCall {
            amount: request.amount,
            buyer_address: request.buyer_address,
            recipient_address: request.recipient_address,
            authorized_account: request.authorization.account,
            token_contract_address: request.token_contract_address,
        });
        let next = self.script.borrow_mut().pop_front();
        match next.unwrap_or(ScriptedResponse::Succeed) {
            ScriptedResponse::Succeed => Ok(SettlementOutcome::SUCCESS),
            ScriptedResponse::Decline => Ok(SettlementOutcome::DECLINED),
            ScriptedResponse::Fail(reason) => Err(SettlementError::Failed(reason)),
            ScriptedResponse::Hold(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SettlementError::Failed("held call abandoned".into()))),
            ScriptedResponse::Hang => futures::future::pending().await,
        }
    }
}

/// Timer whose sleeps complete immediately, so any call that is not already
/// resolved on first poll times out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElapsedTimer;

impl Timer for ElapsedTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(futures::future::ready(()))
    }
}
