use crate::a11y::visible_focus_css;
use crate::components::ui::skins_carousel::SkinsCarousel;
use crate::dom;
use crate::i18n;
use crate::sound::{self, Cue};
use crate::storefront::{
    Catalog, CatalogItem, DestinationWallet, PurchaseController, PurchaseError, PurchaseStatus,
    SettlementService, SourceWallet, create_web_controller, load_config,
};
use futures::future::LocalBoxFuture;
use std::collections::BTreeMap;
use std::rc::Rc;
use yew::prelude::*;

/// How often wallet bindings are re-read while the page is open.
pub const WALLET_POLL_MS: i32 = 1_000;

/// Begin a purchase and hand its settlement to `spawn`.
///
/// # Errors
///
/// Returns the controller's precondition error; nothing is spawned then.
pub fn start_purchase<S, D, T>(
    controller: &PurchaseController<S, D, T>,
    item: &CatalogItem,
    spawn: impl FnOnce(LocalBoxFuture<'static, ()>),
) -> Result<(), PurchaseError>
where
    S: SourceWallet + 'static,
    D: DestinationWallet + 'static,
    T: SettlementService<Authorization = D::Authorization> + 'static,
{
    let pending = controller.begin(item)?;
    sound::play(Cue::Click);
    spawn(Box::pin(async move {
        let name = pending.item().name.clone();
        let status = pending.settle().await;
        log::info!("purchase of {name} finished: {status:?}");
    }));
    Ok(())
}

/// User-facing message for a purchase that could not start.
#[must_use]
pub fn rejection_message(err: &PurchaseError) -> String {
    match err {
        PurchaseError::MissingWalletBinding(_) => i18n::t("skins.alerts.connect_wallets"),
        PurchaseError::AttemptInFlight => i18n::t("skins.alerts.in_flight"),
    }
}

/// Return a finished purchase to `Idle` once its result dialog closes.
///
/// Closing mid-purchase leaves the attempt running.
pub fn dismiss_result<S, D, T>(controller: &PurchaseController<S, D, T>) -> PurchaseStatus
where
    S: SourceWallet,
    D: DestinationWallet,
    T: SettlementService<Authorization = D::Authorization>,
{
    controller.acknowledge().unwrap_or_else(|err| {
        log::debug!("dialog closed mid-purchase: {err}");
        controller.status()
    })
}

#[function_component(App)]
pub fn app() -> Html {
    let catalog = use_memo((), |()| Catalog::builtin().map(Rc::new));
    let controller = use_memo((), |()| create_web_controller(load_config()));
    let status = use_state_eq(|| controller.status());
    let wallets_ready = use_state_eq(|| controller.can_purchase());

    {
        let controller = controller.clone();
        let setter = status.setter();
        use_effect_with((), move |()| {
            controller.set_observer(move |next| setter.set(next));
            move || controller.clear_observer()
        });
    }

    #[cfg(target_arch = "wasm32")]
    {
        let controller = controller.clone();
        let setter = wallets_ready.setter();
        use_effect_with((), move |()| {
            let active = Rc::new(std::cell::Cell::new(true));
            let running = active.clone();
            wasm_bindgen_futures::spawn_local(async move {
                while running.get() {
                    let _ = controller.destination().refresh().await;
                    setter.set(controller.can_purchase());
                    if dom::sleep_ms(WALLET_POLL_MS).await.is_err() {
                        break;
                    }
                }
            });
            move || active.set(false)
        });
    }

    let on_purchase = {
        let controller = controller.clone();
        Callback::from(move |item: CatalogItem| {
            match start_purchase(&controller, &item, wasm_bindgen_futures::spawn_local) {
                Ok(()) => {
                    let mut vars = BTreeMap::new();
                    vars.insert("name", item.name.as_str());
                    crate::a11y::set_status(&i18n::tr("skins.status.processing", Some(&vars)));
                }
                Err(err @ PurchaseError::MissingWalletBinding(_)) => {
                    dom::alert(&rejection_message(&err));
                }
                Err(err) => crate::a11y::set_status(&rejection_message(&err)),
            }
        })
    };

    let on_dismiss = {
        let controller = controller.clone();
        Callback::from(move |()| {
            dismiss_result(&controller);
        })
    };

    match &*catalog {
        Ok(catalog) => html! {
            <main class="skins-app">
                <style>{ visible_focus_css() }</style>
                <SkinsCarousel
                    catalog={catalog.clone()}
                    status={*status}
                    wallets_ready={*wallets_ready}
                    {on_purchase}
                    {on_dismiss}
                />
            </main>
        },
        Err(err) => {
            log::error!("Failed to load skins catalog: {err}");
            html! { <main class="skins-app"><p role="alert">{ err.to_string() }</p></main> }
        }
    }
}
