#![cfg(target_arch = "wasm32")]

use skinstore_core::{Catalog, PurchaseStatus};
use skinstore_web::components::ui::skins_carousel::{SkinsCarousel, SkinsCarouselProps};
use skinstore_web::dom;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, KeyboardEvent, KeyboardEventInit, WheelEvent, WheelEventInit};
use yew::{Callback, Renderer};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn ensure_root() -> web_sys::Element {
    let doc = dom::document();
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append root");
    root
}

fn mount() {
    let props = SkinsCarouselProps {
        catalog: Rc::new(Catalog::builtin().expect("builtin catalog")),
        status: PurchaseStatus::Idle,
        wallets_ready: true,
        on_purchase: Callback::noop(),
        on_dismiss: Callback::noop(),
        visible: 3,
        initial_index: 0,
        initial_dialog: None,
    };
    Renderer::<SkinsCarousel>::with_root_and_props(ensure_root(), props).render();
}

fn center_name() -> String {
    dom::document()
        .query_selector(".skin-card--center .skin-card__name")
        .expect("query")
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}

async fn settle() {
    dom::sleep_ms(20).await.expect("sleep");
}

#[wasm_bindgen_test]
async fn wheel_down_advances_and_wheel_up_wraps_back() {
    mount();
    settle().await;
    assert_eq!(center_name(), "Dragon's Breath");

    let init = WheelEventInit::new();
    init.set_delta_y(120.0);
    init.set_cancelable(true);
    let down = WheelEvent::new_with_event_init_dict("wheel", &init).expect("wheel event");
    dom::document().dispatch_event(&down).expect("dispatch");
    settle().await;
    assert_eq!(center_name(), "Neon Fury");
    assert!(down.default_prevented());

    init.set_delta_y(-120.0);
    for _ in 0..2 {
        let up = WheelEvent::new_with_event_init_dict("wheel", &init).expect("wheel event");
        dom::document().dispatch_event(&up).expect("dispatch");
        settle().await;
    }
    assert_eq!(center_name(), "Spectrum");
}

#[wasm_bindgen_test]
async fn arrow_keys_move_the_carousel() {
    mount();
    settle().await;
    let region: HtmlElement = dom::document()
        .query_selector(".skins-carousel")
        .expect("query")
        .expect("carousel")
        .dyn_into()
        .expect("html element");

    let init = KeyboardEventInit::new();
    init.set_key("ArrowLeft");
    init.set_bubbles(true);
    let left = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("key event");
    region.dispatch_event(&left).expect("dispatch");
    settle().await;
    assert_eq!(center_name(), "Spectrum");
}

#[wasm_bindgen_test]
async fn purchase_button_opens_the_dialog() {
    mount();
    settle().await;
    let button: HtmlElement = dom::document()
        .get_element_by_id("skin-purchase-1")
        .expect("purchase button")
        .dyn_into()
        .expect("html element");
    button.click();
    settle().await;
    let dialog = dom::document()
        .query_selector("[role='dialog'] h2")
        .expect("query")
        .and_then(|el| el.text_content())
        .unwrap_or_default();
    assert_eq!(dialog, "Purchase Dragon's Breath");
}

#[wasm_bindgen_test]
async fn tab_on_last_dialog_control_wraps_to_the_first() {
    mount();
    settle().await;
    let button: HtmlElement = dom::document()
        .get_element_by_id("skin-purchase-1")
        .expect("purchase button")
        .dyn_into()
        .expect("html element");
    button.click();
    settle().await;

    let controls = dom::document()
        .query_selector_all("[role='dialog'] button:not([disabled])")
        .expect("query");
    assert!(controls.length() >= 2);
    let first = controls.item(0).expect("first control");
    let last: HtmlElement = controls
        .item(controls.length() - 1)
        .expect("last control")
        .dyn_into()
        .expect("html element");
    last.focus().expect("focus");

    let init = KeyboardEventInit::new();
    init.set_key("Tab");
    init.set_bubbles(true);
    init.set_cancelable(true);
    let tab = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("key event");
    last.dispatch_event(&tab).expect("dispatch");
    settle().await;

    assert!(tab.default_prevented());
    let active = dom::document().active_element().expect("active element");
    assert_eq!(active, first.dyn_into::<web_sys::Element>().expect("element"));
}
