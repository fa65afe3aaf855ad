//! Cross-chain purchase controller.
//!
//! A purchase runs in two steps. [`PurchaseController::begin`] checks the
//! wallet bindings and the in-flight guard synchronously and moves the
//! status to `Processing`, so a UI can disable its purchase control before
//! anything is awaited. [`PendingPurchase::settle`] then activates the
//! destination wallet, calls the bridge exactly once and records the result.
//!
//! ```text
//! Idle ──Begin──▶ Processing ──Settled──▶ Success
//!   ▲                 │                      │
//!   │                 └──Failed──▶ Error     │
//!   └──Acknowledge── Success | Error ◀─Begin─┘ (re-enters Processing)
//! ```

use crate::amount::{AmountError, FixedPointAmount};
use crate::catalog::CatalogItem;
use crate::config::StorefrontConfig;
use crate::settlement::{
    NeverTimer, SettlementOutcome, SettlementRequest, SettlementService, Timer,
};
use crate::wallet::{BoundWallets, DestinationWallet, MissingBinding, SourceWallet, WalletBindings};
use futures::future::{Either, select};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PurchaseStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseEvent {
    /// A new attempt passed its preconditions
    Begin,
    /// The bridge reported success
    Settled,
    /// The bridge declined, errored, timed out or the attempt was dropped
    Failed,
    /// The UI dismissed the result
    Acknowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} while {from:?}")]
pub struct TransitionError {
    pub from: PurchaseStatus,
    pub event: PurchaseEvent,
}

impl PurchaseStatus {
    /// Pure transition function of the purchase state machine.
    ///
    /// # Errors
    ///
    /// Returns an error for transitions the machine does not allow, such as
    /// beginning a second attempt while one is processing.
    pub const fn apply(self, event: PurchaseEvent) -> Result<Self, TransitionError> {
        match (self, event) {
            (Self::Idle | Self::Success | Self::Error, PurchaseEvent::Begin) => Ok(Self::Processing),
            (Self::Processing, PurchaseEvent::Settled) => Ok(Self::Success),
            (Self::Processing, PurchaseEvent::Failed) => Ok(Self::Error),
            (Self::Idle | Self::Success | Self::Error, PurchaseEvent::Acknowledge) => Ok(Self::Idle),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    #[must_use]
    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Processing)
    }

    /// `Success` or `Error`: the last attempt has finished.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Why an attempt ended in `Error`. The user sees one generic message;
/// this is kept for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Bridge answered `{ success: false }`
    Declined,
    /// Bridge raised an error
    Rejected,
    /// Destination wallet could not be activated
    WalletActivation,
    /// Bridge did not answer within the configured timeout
    TimedOut,
    /// Attempt was dropped before it resolved
    Cancelled,
    /// Price could not be converted to a fixed-point amount
    InvalidAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("Please connect both Solana and Ethereum wallets ({0})")]
    MissingWalletBinding(MissingBinding),
    #[error("a purchase is already processing")]
    AttemptInFlight,
}

/// Record of the last successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub item_id: u32,
    pub item_name: String,
    pub amount: FixedPointAmount,
    pub buyer_address: String,
    pub recipient_address: String,
}

type StatusObserver = Rc<dyn Fn(PurchaseStatus)>;

struct Shared<S, D, T> {
    source: S,
    destination: D,
    settlement: T,
    config: StorefrontConfig,
    timer: RefCell<Rc<dyn Timer>>,
    status: Cell<PurchaseStatus>,
    last_failure: Cell<Option<FailureKind>>,
    last_receipt: RefCell<Option<PurchaseReceipt>>,
    observer: RefCell<Option<StatusObserver>>,
}

impl<S, D, T> Shared<S, D, T> {
    fn transition(&self, event: PurchaseEvent) -> Result<PurchaseStatus, TransitionError> {
        let next = self.status.get().apply(event)?;
        self.status.set(next);
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(next);
        }
        Ok(next)
    }

    fn finish(&self, result: Result<PurchaseReceipt, FailureKind>) -> PurchaseStatus {
        let event = match result {
            Ok(receipt) => {
                self.last_receipt.replace(Some(receipt));
                PurchaseEvent::Settled
            }
            Err(kind) => {
                self.last_failure.set(Some(kind));
                PurchaseEvent::Failed
            }
        };
        self.transition(event).unwrap_or_else(|err| {
            log::error!("purchase state out of sync: {err}");
            self.status.get()
        })
    }
}

/// Gates and tracks cross-chain purchases. At most one attempt is in
/// flight per controller; clones share the same state.
pub struct PurchaseController<S, D, T> {
    shared: Rc<Shared<S, D, T>>,
}

impl<S, D, T> Clone for PurchaseController<S, D, T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S, D, T> PartialEq for PurchaseController<S, D, T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<S, D, T> PurchaseController<S, D, T>
where
    S: SourceWallet,
    D: DestinationWallet,
    T: SettlementService<Authorization = D::Authorization>,
{
    pub fn new(source: S, destination: D, settlement: T, config: StorefrontConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                source,
                destination,
                settlement,
                config,
                timer: RefCell::new(Rc::new(NeverTimer)),
                status: Cell::new(PurchaseStatus::Idle),
                last_failure: Cell::new(None),
                last_receipt: RefCell::new(None),
                observer: RefCell::new(None),
            }),
        }
    }

    /// Timer used to bound the settlement call when a timeout is configured.
    pub fn set_timer(&self, timer: impl Timer + 'static) {
        self.shared.timer.replace(Rc::new(timer));
    }

    /// Register the callback invoked after every status change.
    pub fn set_observer(&self, observer: impl Fn(PurchaseStatus) + 'static) {
        self.shared.observer.replace(Some(Rc::new(observer)));
    }

    pub fn clear_observer(&self) {
        self.shared.observer.replace(None);
    }

    #[must_use]
    pub fn status(&self) -> PurchaseStatus {
        self.shared.status.get()
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.shared.last_failure.get()
    }

    #[must_use]
    pub fn last_receipt(&self) -> Option<PurchaseReceipt> {
        self.shared.last_receipt.borrow().clone()
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.shared.config
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.shared.source
    }

    #[must_use]
    pub fn destination(&self) -> &D {
        &self.shared.destination
    }

    /// Current wallet bindings, read from their providers.
    #[must_use]
    pub fn bindings(&self) -> WalletBindings {
        WalletBindings::read(&self.shared.source, &self.shared.destination)
    }

    /// Whether a purchase control should be enabled right now.
    #[must_use]
    pub fn can_purchase(&self) -> bool {
        !self.status().is_processing() && self.bindings().is_complete()
    }

    /// Validate preconditions and enter `Processing`.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseError::MissingWalletBinding`] when either wallet is
    /// unbound and [`PurchaseError::AttemptInFlight`] while another attempt
    /// is processing. Neither changes the status.
    pub fn begin(&self, item: &CatalogItem) -> Result<PendingPurchase<S, D, T>, PurchaseError> {
        let wallets = self.bindings().require().map_err(|missing| {
            log::warn!("purchase of {} blocked: {missing}", item.name);
            PurchaseError::MissingWalletBinding(missing)
        })?;
        self.shared
            .transition(PurchaseEvent::Begin)
            .map_err(|_| PurchaseError::AttemptInFlight)?;
        self.shared.last_failure.set(None);

        let amount = FixedPointAmount::from_decimal_truncating(item.unit_price);
        log::info!(
            "purchasing {} (#{}) for {} SOL from {}",
            item.name,
            item.id,
            item.unit_price,
            wallets.destination
        );
        Ok(PendingPurchase {
            shared: Rc::clone(&self.shared),
            item: item.clone(),
            wallets,
            amount,
            finished: false,
        })
    }

    /// `begin` followed by `settle`.
    ///
    /// # Errors
    ///
    /// Returns the precondition errors of [`Self::begin`]; settlement
    /// failures are reported through the returned status instead.
    pub async fn attempt_purchase(&self, item: &CatalogItem) -> Result<PurchaseStatus, PurchaseError> {
        let pending = self.begin(item)?;
        Ok(pending.settle().await)
    }

    /// Return a finished attempt to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns an error while an attempt is still processing.
    pub fn acknowledge(&self) -> Result<PurchaseStatus, TransitionError> {
        self.shared.transition(PurchaseEvent::Acknowledge)
    }
}

/// An attempt that has entered `Processing`. Dropping it before
/// [`settle`](Self::settle) completes records a cancelled failure.
pub struct PendingPurchase<S, D, T> {
    shared: Rc<Shared<S, D, T>>,
    item: CatalogItem,
    wallets: BoundWallets,
    amount: Result<FixedPointAmount, AmountError>,
    finished: bool,
}

impl<S, D, T> PendingPurchase<S, D, T>
where
    S: SourceWallet,
    D: DestinationWallet,
    T: SettlementService<Authorization = D::Authorization>,
{
    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Run the settlement and return the final status (`Success` or `Error`).
    pub async fn settle(mut self) -> PurchaseStatus {
        let result = self.execute().await;
        self.finished = true;
        self.shared.finish(result)
    }

    async fn execute(&self) -> Result<PurchaseReceipt, FailureKind> {
        let amount = self.amount.clone().map_err(|err| {
            log::error!("cannot price {}: {err}", self.item.name);
            FailureKind::InvalidAmount
        })?;

        let authorization = self.shared.destination.activate().await.map_err(|err| {
            log::error!("Error purchasing skin {}: {err}", self.item.name);
            FailureKind::WalletActivation
        })?;

        let request = SettlementRequest {
            amount,
            buyer_address: self.wallets.destination.address.clone(),
            recipient_address: self.wallets.source.address.clone(),
            authorization,
            token_contract_address: self.shared.config.token_address.clone(),
        };
        let call = self.shared.settlement.purchase(request);

        let outcome = match self.shared.config.settlement_timeout() {
            Some(limit) => {
                let timer = self.shared.timer.borrow().clone();
                match select(call, timer.sleep(limit)).await {
                    Either::Left((outcome, _)) => outcome,
                    Either::Right(((), _)) => {
                        log::error!(
                            "Error purchasing skin {}: no answer from bridge after {limit:?}",
                            self.item.name
                        );
                        return Err(FailureKind::TimedOut);
                    }
                }
            }
            None => call.await,
        };

        match outcome {
            Ok(SettlementOutcome { success: true }) => {
                log::info!("Skin {} purchased successfully!", self.item.name);
                Ok(PurchaseReceipt {
                    item_id: self.item.id,
                    item_name: self.item.name.clone(),
                    amount,
                    buyer_address: self.wallets.destination.address.clone(),
                    recipient_address: self.wallets.source.address.clone(),
                })
            }
            Ok(_) => {
                log::warn!("bridge declined purchase of {}", self.item.name);
                Err(FailureKind::Declined)
            }
            Err(err) => {
                log::error!("Error purchasing skin {}: {err}", self.item.name);
                Err(FailureKind::Rejected)
            }
        }
    }
}

impl<S, D, T> Drop for PendingPurchase<S, D, T> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("purchase of {} abandoned before settling", self.item.name);
            self.finished = true;
            self.shared.finish(Err(FailureKind::Cancelled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::simulated::{
        ElapsedTimer, ScriptedResponse, ScriptedSettlement, SimulatedDestinationWallet,
        SimulatedSourceWallet,
    };
    use crate::wallet::WalletError;
    use futures::executor::block_on;

    type Controller =
        PurchaseController<SimulatedSourceWallet, SimulatedDestinationWallet, ScriptedSettlement>;

    struct Fixture {
        source: SimulatedSourceWallet,
        destination: SimulatedDestinationWallet,
        bridge: ScriptedSettlement,
        controller: Controller,
    }

    fn fixture(config: StorefrontConfig) -> Fixture {
        let source = SimulatedSourceWallet::connected("SoLBuyer111");
        let destination = SimulatedDestinationWallet::connected("0xBuyer");
        let bridge = ScriptedSettlement::new();
        let controller =
            PurchaseController::new(source.clone(), destination.clone(), bridge.clone(), config);
        Fixture {
            source,
            destination,
            bridge,
            controller,
        }
    }

    fn dragons_breath() -> CatalogItem {
        Catalog::builtin().unwrap().find(1).unwrap().clone()
    }

    #[test]
    fn transition_table() {
        use PurchaseEvent::{Acknowledge, Begin, Failed, Settled};
        use PurchaseStatus::{Error, Idle, Processing, Success};

        assert_eq!(Idle.apply(Begin), Ok(Processing));
        assert_eq!(Success.apply(Begin), Ok(Processing));
        assert_eq!(Error.apply(Begin), Ok(Processing));
        assert_eq!(Processing.apply(Settled), Ok(Success));
        assert_eq!(Processing.apply(Failed), Ok(Error));
        assert_eq!(Success.apply(Acknowledge), Ok(Idle));
        assert!(Processing.apply(Begin).is_err());
        assert!(Processing.apply(Acknowledge).is_err());
        assert!(Idle.apply(Settled).is_err());
        assert!(Error.apply(Failed).is_err());
    }

    #[test]
    fn begin_is_visible_before_settling() {
        let fx = fixture(StorefrontConfig::default());
        let pending = fx.controller.begin(&dragons_breath()).unwrap();
        assert_eq!(fx.controller.status(), PurchaseStatus::Processing);
        assert!(!fx.controller.can_purchase());
        assert_eq!(fx.bridge.call_count(), 0);

        assert_eq!(block_on(pending.settle()), PurchaseStatus::Success);
        assert_eq!(fx.bridge.call_count(), 1);
    }

    #[test]
    fn missing_destination_wallet_blocks_purchase() {
        let fx = fixture(StorefrontConfig::default());
        fx.destination.disconnect();
        let err = fx.controller.begin(&dragons_breath()).err().unwrap();
        assert_eq!(
            err,
            PurchaseError::MissingWalletBinding(MissingBinding::Destination)
        );
        assert_eq!(fx.controller.status(), PurchaseStatus::Idle);
        assert_eq!(fx.destination.activations(), 0);
        assert_eq!(fx.bridge.call_count(), 0);
    }

    #[test]
    fn missing_binding_leaves_settled_status_alone() {
        let fx = fixture(StorefrontConfig::default());
        fx.bridge.push(ScriptedResponse::Decline);
        block_on(fx.controller.attempt_purchase(&dragons_breath())).unwrap();
        assert_eq!(fx.controller.status(), PurchaseStatus::Error);

        fx.source.disconnect();
        assert!(block_on(fx.controller.attempt_purchase(&dragons_breath())).is_err());
        assert_eq!(fx.controller.status(), PurchaseStatus::Error);
        assert_eq!(fx.bridge.call_count(), 1);
    }

    #[test]
    fn second_attempt_while_processing_is_rejected() {
        let fx = fixture(StorefrontConfig::default());
        let item = dragons_breath();
        let _first = fx.controller.begin(&item).unwrap();
        let err = fx.controller.begin(&item).err().unwrap();
        assert_eq!(err, PurchaseError::AttemptInFlight);
        assert_eq!(fx.controller.status(), PurchaseStatus::Processing);
        assert_eq!(fx.bridge.call_count(), 0);
    }

    #[test]
    fn decline_and_error_both_collapse_to_error_status() {
        let fx = fixture(StorefrontConfig::default());
        let item = dragons_breath();

        fx.bridge.push(ScriptedResponse::Decline);
        let status = block_on(fx.controller.attempt_purchase(&item)).unwrap();
        assert_eq!(status, PurchaseStatus::Error);
        assert_eq!(fx.controller.last_failure(), Some(FailureKind::Declined));

        fx.bridge.push(ScriptedResponse::Fail("rpc down".into()));
        let status = block_on(fx.controller.attempt_purchase(&item)).unwrap();
        assert_eq!(status, PurchaseStatus::Error);
        assert_eq!(fx.controller.last_failure(), Some(FailureKind::Rejected));
    }

    #[test]
    fn success_clears_previous_failure_and_records_receipt() {
        let fx = fixture(StorefrontConfig::default());
        let item = dragons_breath();
        fx.bridge.push(ScriptedResponse::Decline);
        block_on(fx.controller.attempt_purchase(&item)).unwrap();

        let status = block_on(fx.controller.attempt_purchase(&item)).unwrap();
        assert_eq!(status, PurchaseStatus::Success);
        assert_eq!(fx.controller.last_failure(), None);
        let receipt = fx.controller.last_receipt().unwrap();
        assert_eq!(receipt.amount.base_units(), 500_000);
        assert_eq!(receipt.recipient_address, "SoLBuyer111");
    }

    #[test]
    fn wallet_activation_failure_skips_the_bridge() {
        let fx = fixture(StorefrontConfig::default());
        fx.destination
            .refuse_activation(WalletError::Rejected("user closed popup".into()));
        let status = block_on(fx.controller.attempt_purchase(&dragons_breath())).unwrap();
        assert_eq!(status, PurchaseStatus::Error);
        assert_eq!(
            fx.controller.last_failure(),
            Some(FailureKind::WalletActivation)
        );
        assert_eq!(fx.bridge.call_count(), 0);
    }

    #[test]
    fn hung_bridge_times_out() {
        let fx = fixture(StorefrontConfig::default().with_settlement_timeout_ms(50));
        fx.controller.set_timer(ElapsedTimer);
        fx.bridge.push(ScriptedResponse::Hang);
        let status = block_on(fx.controller.attempt_purchase(&dragons_breath())).unwrap();
        assert_eq!(status, PurchaseStatus::Error);
        assert_eq!(fx.controller.last_failure(), Some(FailureKind::TimedOut));
        assert_eq!(fx.bridge.call_count(), 1);
    }

    #[test]
    fn dropping_pending_attempt_records_cancellation() {
        let fx = fixture(StorefrontConfig::default());
        let pending = fx.controller.begin(&dragons_breath()).unwrap();
        drop(pending);
        assert_eq!(fx.controller.status(), PurchaseStatus::Error);
        assert_eq!(fx.controller.last_failure(), Some(FailureKind::Cancelled));
    }

    #[test]
    fn acknowledge_returns_to_idle_only_when_settled() {
        let fx = fixture(StorefrontConfig::default());
        let pending = fx.controller.begin(&dragons_breath()).unwrap();
        assert!(fx.controller.acknowledge().is_err());
        block_on(pending.settle());
        assert_eq!(fx.controller.acknowledge(), Ok(PurchaseStatus::Idle));
    }

    #[test]
    fn observer_sees_every_transition() {
        let fx = fixture(StorefrontConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            fx.controller
                .set_observer(move |status| seen.borrow_mut().push(status));
        }
        block_on(fx.controller.attempt_purchase(&dragons_breath())).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![PurchaseStatus::Processing, PurchaseStatus::Success]
        );
    }

    #[test]
    fn request_carries_addresses_and_token() {
        let fx = fixture(StorefrontConfig::default().with_token_address("0xUSDC"));
        block_on(fx.controller.attempt_purchase(&dragons_breath())).unwrap();
        let call = &fx.bridge.calls()[0];
        assert_eq!(call.buyer_address, "0xBuyer");
        assert_eq!(call.recipient_address, "SoLBuyer111");
        assert_eq!(call.authorized_account, "0xBuyer");
        assert_eq!(call.token_contract_address, "0xUSDC");
    }
}
