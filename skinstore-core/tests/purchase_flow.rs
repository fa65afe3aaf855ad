use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use skinstore_core::simulated::{
    ScriptedResponse, ScriptedSettlement, SimulatedDestinationWallet, SimulatedSourceWallet,
};
use skinstore_core::{
    Catalog, CatalogItem, FailureKind, MissingBinding, PurchaseController, PurchaseError,
    PurchaseStatus, SettlementError, SettlementOutcome, Storefront, StorefrontConfig,
};

type Controller =
    PurchaseController<SimulatedSourceWallet, SimulatedDestinationWallet, ScriptedSettlement>;

fn storefront() -> Storefront {
    Storefront::load(|key| match key {
        "SKINSTORE_USDC_TOKEN_ADDRESS" => Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into()),
        _ => None,
    })
    .expect("storefront loads")
}

fn item(catalog: &Catalog, id: u32) -> CatalogItem {
    catalog.find(id).cloned().expect("catalog item")
}

fn wired(
    source: &SimulatedSourceWallet,
    destination: &SimulatedDestinationWallet,
    bridge: &ScriptedSettlement,
) -> Controller {
    storefront().controller(source.clone(), destination.clone(), bridge.clone())
}

#[test]
fn dragons_breath_purchase_settles_once_at_half_a_unit() {
    let shop = storefront();
    let source = SimulatedSourceWallet::connected("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU");
    let destination = SimulatedDestinationWallet::connected("0x71C7656EC7ab88b098defB751B7401B5f6d8976F");
    let bridge = ScriptedSettlement::new();
    let controller = wired(&source, &destination, &bridge);

    let dragon = item(&shop.catalog, 1);
    assert_eq!(dragon.name, "Dragon's Breath");

    let status = block_on(controller.attempt_purchase(&dragon)).expect("preconditions hold");
    assert_eq!(status, PurchaseStatus::Success);
    assert_eq!(controller.status(), PurchaseStatus::Success);

    let calls = bridge.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].amount.base_units(), 500_000);
    assert_eq!(
        calls[0].token_contract_address,
        "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
    );
    assert_eq!(destination.activations(), 1);
}

#[test]
fn unbound_source_wallet_never_reaches_the_bridge() {
    let shop = storefront();
    let source = SimulatedSourceWallet::default();
    let destination = SimulatedDestinationWallet::connected("0xBuyer");
    let bridge = ScriptedSettlement::new();
    let controller = wired(&source, &destination, &bridge);

    let err = block_on(controller.attempt_purchase(&item(&shop.catalog, 1))).unwrap_err();
    assert_eq!(
        err,
        PurchaseError::MissingWalletBinding(MissingBinding::Source)
    );
    assert!(err.to_string().starts_with("Please connect both Solana and Ethereum wallets"));
    assert_eq!(controller.status(), PurchaseStatus::Idle);
    assert_eq!(bridge.call_count(), 0);
    assert_eq!(destination.activations(), 0);
}

#[test]
fn every_catalog_price_truncates_to_base_units() {
    let shop = storefront();
    let source = SimulatedSourceWallet::connected("So1");
    let destination = SimulatedDestinationWallet::connected("0x1");
    let bridge = ScriptedSettlement::new();
    let controller = wired(&source, &destination, &bridge);

    for skin in shop.catalog.items() {
        block_on(controller.attempt_purchase(skin)).unwrap();
    }
    let amounts: Vec<u64> = bridge.calls().iter().map(|c| c.amount.base_units()).collect();
    assert_eq!(
        amounts,
        vec![500_000, 400_000, 600_000, 550_000, 450_000, 700_000, 500_000, 650_000]
    );
}

#[test]
fn in_flight_attempt_blocks_rapid_double_activation() {
    let shop = storefront();
    let source = SimulatedSourceWallet::connected("So1");
    let destination = SimulatedDestinationWallet::connected("0x1");
    let bridge = ScriptedSettlement::new();
    let release = bridge.hold();
    let controller = wired(&source, &destination, &bridge);
    let dragon = item(&shop.catalog, 1);

    let finished = Rc::new(RefCell::new(None));
    let mut pool = LocalPool::new();
    {
        let pending = controller.begin(&dragon).expect("first attempt starts");
        let finished = Rc::clone(&finished);
        pool.spawner()
            .spawn_local(async move {
                let status = pending.settle().await;
                finished.replace(Some(status));
            })
            .expect("spawn settle");
    }
    pool.run_until_stalled();

    assert_eq!(controller.status(), PurchaseStatus::Processing);
    assert_eq!(bridge.call_count(), 1);
    assert_eq!(
        controller.begin(&dragon).err(),
        Some(PurchaseError::AttemptInFlight)
    );
    assert_eq!(bridge.call_count(), 1);

    release.send(Ok(SettlementOutcome::SUCCESS)).expect("settle held call");
    pool.run_until_stalled();
    assert_eq!(*finished.borrow(), Some(PurchaseStatus::Success));
    assert_eq!(bridge.call_count(), 1);
}

#[test]
fn held_call_that_errors_ends_in_error() {
    let shop = storefront();
    let source = SimulatedSourceWallet::connected("So1");
    let destination = SimulatedDestinationWallet::connected("0x1");
    let bridge = ScriptedSettlement::new();
    let release = bridge.hold();
    let controller = wired(&source, &destination, &bridge);

    let mut pool = LocalPool::new();
    let pending = controller.begin(&item(&shop.catalog, 5)).unwrap();
    pool.spawner()
        .spawn_local(async move {
            pending.settle().await;
        })
        .unwrap();
    pool.run_until_stalled();
    release
        .send(Err(SettlementError::Failed("insufficient USDC allowance".into())))
        .unwrap();
    pool.run_until_stalled();

    assert_eq!(controller.status(), PurchaseStatus::Error);
    assert_eq!(controller.last_failure(), Some(FailureKind::Rejected));
}

#[test]
fn success_is_terminal_until_a_new_attempt() {
    let shop = storefront();
    let source = SimulatedSourceWallet::connected("So1");
    let destination = SimulatedDestinationWallet::connected("0x1");
    let bridge = ScriptedSettlement::new();
    let controller = wired(&source, &destination, &bridge);

    block_on(controller.attempt_purchase(&item(&shop.catalog, 2))).unwrap();
    assert_eq!(controller.status(), PurchaseStatus::Success);
    assert_eq!(controller.status(), PurchaseStatus::Success);

    bridge.push(ScriptedResponse::Decline);
    let status = block_on(controller.attempt_purchase(&item(&shop.catalog, 3))).unwrap();
    assert_eq!(status, PurchaseStatus::Error);
}

#[test]
fn unconfigured_token_is_passed_through_empty() {
    let source = SimulatedSourceWallet::connected("So1");
    let destination = SimulatedDestinationWallet::connected("0x1");
    let bridge = ScriptedSettlement::new();
    let controller = PurchaseController::new(
        source,
        destination,
        bridge.clone(),
        StorefrontConfig::default(),
    );
    let catalog = Catalog::builtin().unwrap();
    block_on(controller.attempt_purchase(&item(&catalog, 8))).unwrap();
    assert_eq!(bridge.calls()[0].token_contract_address, "");
}
