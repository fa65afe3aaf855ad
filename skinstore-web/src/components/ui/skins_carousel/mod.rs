//! Skins carousel: a wrapping three-card slider with a purchase dialog per card.
//!
//! The component is presentational. Purchase status and wallet readiness come
//! in as props and confirmations go out through `on_purchase`, so it renders
//! the same way under SSR as in the browser.

mod handlers;
mod state;
mod view;


pub use state::{CarouselState, DEFAULT_VISIBLE, SkinsCarouselProps, purchase_button_state};
pub use view::card::purchase_button_id;

use self::handlers::{button_callback, keydown_callback};
use self::view::card::{CardView, render_skin_card};
use self::view::dialog::render_purchase_dialog;
use crate::a11y::STATUS_REGION_ID;
use crate::i18n;
use crate::sound::{self, Cue};
use skinstore_core::NavCommand;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DialogState {
    item: Option<u32>,
    open: bool,
}

#[function_component(SkinsCarousel)]
pub fn skins_carousel(props: &SkinsCarouselProps) -> Html {
    let carousel = {
        let len = props.catalog.len();
        let index = props.initial_index;
        use_reducer_eq(move || CarouselState::new(len, index))
    };
    let dialog = {
        let item = props.initial_dialog;
        use_state_eq(move || DialogState {
            item,
            open: item.is_some(),
        })
    };

    #[cfg(target_arch = "wasm32")]
    {
        let dispatcher = carousel.dispatcher();
        use_effect_with((), move |()| {
            let listener = handlers::listen_document_wheel(move |signal| {
                if let Some(command) = signal.command() {
                    handlers::navigate(&dispatcher, command);
                }
            });
            move || drop(listener)
        });
    }

    #[cfg(target_arch = "wasm32")]
    {
        let catalog = props.catalog.clone();
        use_effect_with(carousel.cursor.index(), move |index| {
            if let Some(item) = catalog.get(*index) {
                let mut vars = std::collections::BTreeMap::new();
                vars.insert("name", item.name.as_str());
                crate::a11y::set_status(&i18n::tr("skins.status.showing", Some(&vars)));
            }
            || {}
        });
    }

    let on_keydown = keydown_callback(carousel.dispatcher());
    let on_prev = button_callback(carousel.dispatcher(), NavCommand::Retreat);
    let on_next = button_callback(carousel.dispatcher(), NavCommand::Advance);

    let center = carousel.cursor.index();
    let cards = carousel.cursor.window(props.visible).into_iter().filter_map(|index| {
        let item = props.catalog.get(index)?;
        let on_open = {
            let dialog = dialog.clone();
            let id = item.id;
            Callback::from(move |_: MouseEvent| {
                sound::play(Cue::Click);
                dialog.set(DialogState {
                    item: Some(id),
                    open: true,
                });
            })
        };
        let card = CardView {
            item,
            position: index,
            total: props.catalog.len(),
            centered: index == center,
            status: props.status,
            wallets_ready: props.wallets_ready,
        };
        Some(render_skin_card(&card, on_open))
    });

    let dialog_view = dialog
        .item
        .and_then(|id| props.catalog.find(id))
        .map(|item| {
            let on_confirm = {
                let on_purchase = props.on_purchase.clone();
                let item = item.clone();
                Callback::from(move |_: MouseEvent| on_purchase.emit(item.clone()))
            };
            let on_close = {
                let dialog = dialog.clone();
                let on_dismiss = props.on_dismiss.clone();
                Callback::from(move |()| {
                    dialog.set(DialogState {
                        item: dialog.item,
                        open: false,
                    });
                    on_dismiss.emit(());
                })
            };
            render_purchase_dialog(item, dialog.open, props.status, on_confirm, on_close)
        })
        .unwrap_or_default();

    html! {
        <>
        <section class="skins-carousel" aria-roledescription="carousel"
                 aria-label={i18n::t("skins.title")} onkeydown={on_keydown} tabindex="0">
            <h2 class="skins-carousel__title">{ i18n::t("skins.title") }</h2>
            <div class="skins-carousel__track">
                <button type="button" class="skins-carousel__prev"
                        aria-label={i18n::t("skins.prev")} onclick={on_prev}>{ "‹" }</button>
                <ul class="skins-carousel__cards">
                    { for cards }
                </ul>
                <button type="button" class="skins-carousel__next"
                        aria-label={i18n::t("skins.next")} onclick={on_next}>{ "›" }</button>
            </div>
            <div id={STATUS_REGION_ID} class="sr-only" aria-live="polite"></div>
        </section>
        { dialog_view }
        </>
    }
}
