use crate::components::ui::skins_carousel::state::purchase_button_state;
use crate::i18n;
use skinstore_core::{CatalogItem, PurchaseStatus};
use std::collections::BTreeMap;
use yew::prelude::*;

#[must_use]
pub fn purchase_button_id(item_id: u32) -> String {
    format!("skin-purchase-{item_id}")
}

/// Price line, e.g. `0.5 SOL`.
#[must_use]
pub fn price_label(item: &CatalogItem) -> String {
    let price = i18n::fmt_price(item.unit_price);
    let mut vars = BTreeMap::new();
    vars.insert("price", price.as_str());
    i18n::tr("skins.price", Some(&vars))
}

pub struct CardView<'a> {
    pub item: &'a CatalogItem,
    pub position: usize,
    pub total: usize,
    pub centered: bool,
    pub status: PurchaseStatus,
    pub wallets_ready: bool,
}

pub fn render_skin_card(card: &CardView<'_>, on_open: Callback<MouseEvent>) -> Html {
    let item = card.item;
    let index = (card.position + 1).to_string();
    let total = card.total.to_string();
    let mut vars = BTreeMap::new();
    vars.insert("index", index.as_str());
    vars.insert("total", total.as_str());
    let slide_label = i18n::tr("skins.slide", Some(&vars));

    let (label_key, enabled) = purchase_button_state(card.status, card.wallets_ready);
    let class = classes!("skin-card", card.centered.then_some("skin-card--center"));

    html! {
        <li class={class} role="group" aria-roledescription="slide"
            aria-label={slide_label} data-id={item.id.to_string()}>
            <img class="skin-card__image" src={item.image_ref.clone()} alt={item.name.clone()} />
            <h3 class="skin-card__name">{ item.name.clone() }</h3>
            <p class="skin-card__price">{ price_label(item) }</p>
            <button
                type="button"
                id={purchase_button_id(item.id)}
                class="skin-card__purchase"
                disabled={!enabled}
                onclick={on_open}
            >
                { i18n::t(label_key) }
            </button>
        </li>
    }
}
