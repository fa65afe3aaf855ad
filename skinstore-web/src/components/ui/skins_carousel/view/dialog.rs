use super::card::{price_label, purchase_button_id};
use crate::components::modal::Modal;
use crate::i18n;
use skinstore_core::{CatalogItem, PurchaseStatus};
use std::collections::BTreeMap;
use yew::prelude::*;

/// Confirmation dialog for one item, showing the shared purchase outcome.
///
/// Stays mounted after closing so focus can return to the card's button.
pub fn render_purchase_dialog(
    item: &CatalogItem,
    open: bool,
    status: PurchaseStatus,
    on_confirm: Callback<MouseEvent>,
    on_close: Callback<()>,
) -> Html {
    let price = i18n::fmt_price(item.unit_price);
    let mut vars = BTreeMap::new();
    vars.insert("name", item.name.as_str());
    vars.insert("price", price.as_str());
    let title = i18n::tr("skins.dialog.title", Some(&vars));
    let description = i18n::tr("skins.dialog.description", Some(&vars));

    let outcome = match status {
        PurchaseStatus::Success => html! {
            <p class="skin-dialog__result skin-dialog__result--success" role="status">
                { i18n::t("skins.result.success") }
            </p>
        },
        PurchaseStatus::Error => html! {
            <p class="skin-dialog__result skin-dialog__result--error" role="alert">
                { i18n::t("skins.result.error") }
            </p>
        },
        PurchaseStatus::Idle | PurchaseStatus::Processing => Html::default(),
    };
    let confirm_label = if status.is_processing() {
        i18n::t("skins.processing")
    } else {
        i18n::t("skins.confirm")
    };

    html! {
        <Modal
            open={open}
            title={AttrValue::from(title)}
            description={Some(AttrValue::from(description))}
            close_label={Some(AttrValue::from(i18n::t("skins.dialog.close")))}
            return_focus_id={Some(AttrValue::from(purchase_button_id(item.id)))}
            on_close={on_close}
        >
            <p class="skin-dialog__price">{ price_label(item) }</p>
            <button
                type="button"
                class="skin-dialog__confirm"
                disabled={status.is_processing()}
                onclick={on_confirm}
            >
                { confirm_label }
            </button>
            { outcome }
        </Modal>
    }
}
