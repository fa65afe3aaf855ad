//! Purchase-flow scenarios run against simulated wallets and a scripted bridge.

use anyhow::{Context, Result, anyhow, ensure};
use futures::future::LocalBoxFuture;
use rust_decimal::Decimal;
use skinstore_core::simulated::{
    ScriptedResponse, ScriptedSettlement, SimulatedDestinationWallet, SimulatedSourceWallet,
};
use skinstore_core::{
    CarouselCursor, CatalogItem, FailureKind, FixedPointAmount, MissingBinding, NavCommand,
    PurchaseController, PurchaseError, PurchaseStatus, SettlementOutcome, Storefront, Timer,
    WheelSignal, handle_wheel,
};
use std::rc::Rc;
use std::time::Duration;

pub const BUYER_ETH: &str = "0x9f2c1e1b7d3a4c5e6f708192a3b4c5d6e7f80912";
pub const RECIPIENT_SOL: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

/// Timeout used by the timeout scenario; short enough to keep runs fast.
const SCENARIO_TIMEOUT_MS: u64 = 25;

/// Shared inputs for every scenario iteration.
#[derive(Debug, Clone)]
pub struct ScenarioEnv {
    storefront: Rc<Storefront>,
}

impl ScenarioEnv {
    pub fn new(storefront: Storefront) -> Self {
        Self {
            storefront: Rc::new(storefront),
        }
    }

    fn item(&self, name: &str) -> Result<CatalogItem> {
        self.storefront
            .catalog
            .items()
            .iter()
            .find(|item| item.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("catalog has no item named {name}"))
    }
}

pub type ScenarioCheck = fn(ScenarioEnv) -> LocalBoxFuture<'static, Result<()>>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

type Controller =
    PurchaseController<SimulatedSourceWallet, SimulatedDestinationWallet, ScriptedSettlement>;

/// A controller plus the handles used to script and inspect it.
struct Harness {
    source: SimulatedSourceWallet,
    destination: SimulatedDestinationWallet,
    settlement: ScriptedSettlement,
    controller: Controller,
}

impl Harness {
    fn bound(env: &ScenarioEnv) -> Self {
        Self::with_storefront(&env.storefront, true)
    }

    fn unbound(env: &ScenarioEnv) -> Self {
        Self::with_storefront(&env.storefront, false)
    }

    fn with_storefront(storefront: &Storefront, bound: bool) -> Self {
        let source = SimulatedSourceWallet::default();
        let destination = SimulatedDestinationWallet::default();
        if bound {
            source.connect(RECIPIENT_SOL);
            destination.connect(BUYER_ETH);
        }
        let settlement = ScriptedSettlement::new();
        let controller =
            storefront.controller(source.clone(), destination.clone(), settlement.clone());
        Self {
            source,
            destination,
            settlement,
            controller,
        }
    }
}

/// Timer backed by the tokio clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            key: "smoke",
            name: "Dragon's Breath Purchase",
            description: "Bound wallets, bridge succeeds, one call for 500000 base units",
            check: |env| Box::pin(smoke(env)),
        },
        Scenario {
            key: "amount-truncation",
            name: "Fixed-Point Amount Truncation",
            description: "Prices scale by 10^6 and truncate toward zero",
            check: |env| Box::pin(amount_truncation(env)),
        },
        Scenario {
            key: "missing-binding",
            name: "Missing Wallet Binding",
            description: "Unbound wallets block the purchase without a bridge call",
            check: |env| Box::pin(missing_binding(env)),
        },
        Scenario {
            key: "in-flight-guard",
            name: "In-Flight Guard",
            description: "A second attempt while processing is rejected",
            check: |env| Box::pin(in_flight_guard(env)),
        },
        Scenario {
            key: "success-terminal",
            name: "Success Is Terminal",
            description: "Success stays until the next attempt or acknowledgement",
            check: |env| Box::pin(success_terminal(env)),
        },
        Scenario {
            key: "decline-and-error",
            name: "Declines and Bridge Errors",
            description: "Declined, failed and refused attempts all end in Error",
            check: |env| Box::pin(decline_and_error(env)),
        },
        Scenario {
            key: "timeout",
            name: "Settlement Timeout",
            description: "A bridge call that never resolves times out into Error",
            check: |env| Box::pin(settlement_timeout(env)),
        },
        Scenario {
            key: "cancelled-attempt",
            name: "Cancelled Attempt",
            description: "Dropping an attempt mid-flight records a cancellation",
            check: |env| Box::pin(cancelled_attempt(env)),
        },
        Scenario {
            key: "catalog-integrity",
            name: "Catalog Integrity",
            description: "Eight skins with unique ids in listing order",
            check: |env| Box::pin(catalog_integrity(env)),
        },
        Scenario {
            key: "wheel-navigation",
            name: "Wheel Navigation",
            description: "Wheel direction moves the carousel and wraps at both ends",
            check: |env| Box::pin(wheel_navigation(env)),
        },
    ]
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

#[must_use]
pub fn scenario_keys() -> Vec<&'static str> {
    all_scenarios().into_iter().map(|scenario| scenario.key).collect()
}

#[must_use]
pub fn find_scenario(key: &str) -> Option<Scenario> {
    all_scenarios().into_iter().find(|scenario| scenario.key == key)
}

async fn smoke(env: ScenarioEnv) -> Result<()> {
    let harness = Harness::bound(&env);
    let item = env.item("Dragon's Breath")?;
    let status = harness
        .controller
        .attempt_purchase(&item)
        .await
        .context("purchase should start with both wallets bound")?;
    ensure!(status == PurchaseStatus::Success, "expected Success, got {status:?}");

    let calls = harness.settlement.calls();
    ensure!(calls.len() == 1, "expected one bridge call, saw {}", calls.len());
    let call = &calls[0];
    ensure!(
        call.amount == FixedPointAmount::from_base_units(500_000),
        "wrong amount {}",
        call.amount
    );
    ensure!(call.buyer_address == BUYER_ETH, "buyer should be the Ethereum wallet");
    ensure!(call.recipient_address == RECIPIENT_SOL, "recipient should be the Solana wallet");
    ensure!(
        call.token_contract_address == env.storefront.config.token_address,
        "token address should come from configuration"
    );
    ensure!(harness.destination.activations() == 1, "wallet should activate once");
    Ok(())
}

async fn amount_truncation(env: ScenarioEnv) -> Result<()> {
    for (price, expected) in [("0.5", 500_000), ("0.45", 450_000), ("0.1234567", 123_456)] {
        let decimal: Decimal = price.parse()?;
        let amount = FixedPointAmount::from_decimal_truncating(decimal)?;
        ensure!(
            amount.base_units() == expected,
            "{price} should convert to {expected}, got {}",
            amount.base_units()
        );
    }
    for item in env.storefront.catalog.items() {
        FixedPointAmount::from_decimal_truncating(item.unit_price)
            .with_context(|| format!("{} has no fixed-point amount", item.name))?;
    }
    Ok(())
}

async fn missing_binding(env: ScenarioEnv) -> Result<()> {
    let item = env.item("Dragon's Breath")?;

    let harness = Harness::bound(&env);
    harness.source.disconnect();
    match harness.controller.attempt_purchase(&item).await {
        Err(PurchaseError::MissingWalletBinding(MissingBinding::Source)) => {}
        other => return Err(anyhow!("expected a missing source binding, got {other:?}")),
    }
    ensure!(harness.controller.status() == PurchaseStatus::Idle, "status must stay Idle");
    ensure!(harness.settlement.call_count() == 0, "bridge must not be called");

    let harness = Harness::unbound(&env);
    match harness.controller.begin(&item) {
        Err(PurchaseError::MissingWalletBinding(MissingBinding::Both)) => {}
        Err(other) => return Err(anyhow!("expected both bindings missing, got {other:?}")),
        Ok(_) => return Err(anyhow!("purchase started without wallets")),
    }
    ensure!(harness.destination.activations() == 0, "wallet must not activate");
    Ok(())
}

async fn in_flight_guard(env: ScenarioEnv) -> Result<()> {
    let harness = Harness::bound(&env);
    let item = env.item("Neon Fury")?;
    let release = harness.settlement.hold();

    let pending = harness.controller.begin(&item)?;
    let task = tokio::task::spawn_local(pending.settle());
    for _ in 0..16 {
        if harness.settlement.call_count() > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    ensure!(
        harness.controller.status() == PurchaseStatus::Processing,
        "first attempt should be processing"
    );
    match harness.controller.begin(&item) {
        Err(PurchaseError::AttemptInFlight) => {}
        Err(other) => return Err(anyhow!("expected AttemptInFlight, got {other:?}")),
        Ok(_) => return Err(anyhow!("second attempt started while processing")),
    }

    release
        .send(Ok(SettlementOutcome::SUCCESS))
        .map_err(|_| anyhow!("held call was dropped"))?;
    let status = task.await.context("settlement task panicked")?;
    ensure!(status == PurchaseStatus::Success, "expected Success, got {status:?}");
    ensure!(
        harness.settlement.call_count() == 1,
        "expected one bridge call, saw {}",
        harness.settlement.call_count()
    );
    Ok(())
}

async fn success_terminal(env: ScenarioEnv) -> Result<()> {
    let harness = Harness::bound(&env);
    let item = env.item("Arctic Frost")?;
    harness.controller.attempt_purchase(&item).await?;
    tokio::task::yield_now().await;
    ensure!(
        harness.controller.status() == PurchaseStatus::Success,
        "Success must not move on its own"
    );
    let receipt = harness
        .controller
        .last_receipt()
        .ok_or_else(|| anyhow!("successful purchase should leave a receipt"))?;
    ensure!(receipt.item_id == item.id, "receipt should name the purchased item");

    harness.settlement.push(ScriptedResponse::Decline);
    let status = harness.controller.attempt_purchase(&item).await?;
    ensure!(status == PurchaseStatus::Error, "a new attempt leaves Success");
    ensure!(
        harness.controller.acknowledge()? == PurchaseStatus::Idle,
        "acknowledging returns to Idle"
    );
    Ok(())
}

async fn decline_and_error(env: ScenarioEnv) -> Result<()> {
    let item = env.item("Crimson Elite")?;
    let cases = [
        (ScriptedResponse::Decline, FailureKind::Declined),
        (ScriptedResponse::Fail("bridge exploded".into()), FailureKind::Rejected),
    ];
    for (response, kind) in cases {
        let harness = Harness::bound(&env);
        harness.settlement.push(response);
        let status = harness.controller.attempt_purchase(&item).await?;
        ensure!(status == PurchaseStatus::Error, "expected Error, got {status:?}");
        ensure!(
            harness.controller.last_failure() == Some(kind),
            "expected {kind:?}, got {:?}",
            harness.controller.last_failure()
        );
    }

    let harness = Harness::bound(&env);
    harness
        .destination
        .refuse_activation(skinstore_core::WalletError::Rejected("user closed prompt".into()));
    let status = harness.controller.attempt_purchase(&item).await?;
    ensure!(status == PurchaseStatus::Error, "refused activation should fail");
    ensure!(
        harness.controller.last_failure() == Some(FailureKind::WalletActivation),
        "expected WalletActivation"
    );
    ensure!(harness.settlement.call_count() == 0, "bridge must not be called");
    Ok(())
}

async fn settlement_timeout(env: ScenarioEnv) -> Result<()> {
    let mut storefront = (*env.storefront).clone();
    storefront.config = storefront
        .config
        .with_settlement_timeout_ms(SCENARIO_TIMEOUT_MS);
    let harness = Harness::with_storefront(&storefront, true);
    harness.controller.set_timer(TokioTimer);
    harness.settlement.push(ScriptedResponse::Hang);

    let item = env.item("Shadow Ops")?;
    let status = harness.controller.attempt_purchase(&item).await?;
    ensure!(status == PurchaseStatus::Error, "expected Error, got {status:?}");
    ensure!(
        harness.controller.last_failure() == Some(FailureKind::TimedOut),
        "expected TimedOut, got {:?}",
        harness.controller.last_failure()
    );
    Ok(())
}

async fn cancelled_attempt(env: ScenarioEnv) -> Result<()> {
    let harness = Harness::bound(&env);
    harness.settlement.push(ScriptedResponse::Hang);
    let item = env.item("Golden Phoenix")?;

    let task = tokio::task::spawn_local(harness.controller.begin(&item)?.settle());
    tokio::task::yield_now().await;
    task.abort();
    let _ = task.await;

    ensure!(
        harness.controller.status() == PurchaseStatus::Error,
        "aborted attempt should end in Error"
    );
    ensure!(
        harness.controller.last_failure() == Some(FailureKind::Cancelled),
        "expected Cancelled, got {:?}",
        harness.controller.last_failure()
    );
    ensure!(harness.controller.can_purchase(), "controller stays usable");
    Ok(())
}

async fn catalog_integrity(env: ScenarioEnv) -> Result<()> {
    let ids: Vec<u32> = env.storefront.catalog.items().iter().map(|item| item.id).collect();
    ensure!(ids == (1..=8).collect::<Vec<_>>(), "unexpected ids {ids:?}");
    let first = env.storefront.catalog.get(0).map(|item| item.name.as_str());
    ensure!(first == Some("Dragon's Breath"), "first skin is {first:?}");
    Ok(())
}

async fn wheel_navigation(env: ScenarioEnv) -> Result<()> {
    let len = env.storefront.catalog.len();
    let mut cursor = CarouselCursor::new(len);

    ensure!(
        handle_wheel(&mut cursor, WheelSignal::new(0.0)).is_none(),
        "zero delta must not move"
    );
    ensure!(
        handle_wheel(&mut cursor, WheelSignal::new(-100.0)) == Some(NavCommand::Retreat),
        "negative delta retreats"
    );
    ensure!(cursor.index() == len - 1, "retreat from the first card wraps to the last");
    ensure!(
        handle_wheel(&mut cursor, WheelSignal::new(100.0)) == Some(NavCommand::Advance),
        "positive delta advances"
    );
    ensure!(cursor.index() == 0, "advance from the last card wraps to the first");
    ensure!(cursor.window(3) == vec![len - 1, 0, 1], "three cards centred on the cursor");
    Ok(())
}
