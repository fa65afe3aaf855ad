use futures::executor::block_on;
use skinstore_core::{Catalog, PurchaseStatus};
use skinstore_web::app::App;
use skinstore_web::components::modal::{Modal, Props as ModalProps};
use skinstore_web::components::ui::skins_carousel::{
    DEFAULT_VISIBLE, SkinsCarousel, SkinsCarouselProps,
};
use std::rc::Rc;
use yew::html::ChildrenRenderer;
use yew::{AttrValue, Callback, LocalServerRenderer, html};

fn carousel_props(status: PurchaseStatus) -> SkinsCarouselProps {
    SkinsCarouselProps {
        catalog: Rc::new(Catalog::builtin().expect("builtin catalog")),
        status,
        wallets_ready: true,
        on_purchase: Callback::noop(),
        on_dismiss: Callback::noop(),
        visible: DEFAULT_VISIBLE,
        initial_index: 2,
        initial_dialog: None,
    }
}

#[test]
fn app_renders_carousel_with_wallets_unbound() {
    let html = block_on(LocalServerRenderer::<App>::new().render());
    assert!(html.contains("skins-carousel"), "{html}");
    assert!(html.contains("skins-status"), "live region should be mounted: {html}");
    assert_eq!(
        html.matches("skin-card__purchase").count(),
        3,
        "three cards should be visible: {html}"
    );
    assert!(
        html.contains("disabled"),
        "purchase is disabled until both wallets bind: {html}"
    );
}

#[test]
fn carousel_centers_initial_index() {
    let html = block_on(
        LocalServerRenderer::<SkinsCarousel>::with_props(carousel_props(PurchaseStatus::Idle))
            .render(),
    );
    assert!(html.contains("skin-card--center"), "{html}");
    assert!(html.contains("Neon Fury"), "{html}");
    assert!(html.contains("Arctic Frost"), "{html}");
    assert!(html.contains("Crimson Elite"), "{html}");
    assert!(html.contains("/rifle-skin-3.jpg"), "{html}");
    assert!(html.contains("3 of 8"), "{html}");
}

#[test]
fn carousel_props_compare_by_value() {
    let a = carousel_props(PurchaseStatus::Idle);
    let mut b = a.clone();
    assert!(a == b);
    b.status = PurchaseStatus::Processing;
    assert!(a != b);
}

#[test]
fn modal_renders_children_when_open() {
    let props = ModalProps {
        open: true,
        title: AttrValue::from("Title"),
        on_close: Callback::noop(),
        description: Some(AttrValue::from("Desc")),
        close_label: None,
        return_focus_id: None,
        children: ChildrenRenderer::new(vec![html! { <p class="modal-child">{"child"}</p> }]),
    };
    let html = block_on(LocalServerRenderer::<Modal>::with_props(props).render());
    assert!(html.contains("modal-child"), "{html}");
    assert!(html.contains("Close dialog"), "{html}");
}
