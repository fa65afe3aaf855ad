#![forbid(unsafe_code)]
//! Browser front end of the skins storefront.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod a11y;
pub mod app;
pub mod bridge;
pub mod components;
pub mod dom;
pub mod i18n;
pub mod sound;
pub mod storefront;
pub mod wallet;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    dom::init_console_logger(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    yew::Renderer::<app::App>::new().render();
}
