use super::state::{CarouselAction, CarouselState};
use crate::sound::{self, Cue};
use skinstore_core::{NavCommand, key_to_command};
use yew::prelude::*;

/// Move the carousel one slot and play the scroll cue.
pub fn navigate(dispatcher: &UseReducerDispatcher<CarouselState>, command: NavCommand) {
    dispatcher.dispatch(CarouselAction::Navigate(command));
    sound::play(Cue::Scroll);
}

/// Keyboard navigation for the carousel region.
pub fn keydown_callback(dispatcher: UseReducerDispatcher<CarouselState>) -> Callback<KeyboardEvent> {
    Callback::from(move |e: KeyboardEvent| {
        if let Some(command) = key_to_command(&e.key()) {
            e.prevent_default();
            navigate(&dispatcher, command);
        }
    })
}

pub fn button_callback(
    dispatcher: UseReducerDispatcher<CarouselState>,
    command: NavCommand,
) -> Callback<MouseEvent> {
    Callback::from(move |_| navigate(&dispatcher, command))
}

#[cfg(target_arch = "wasm32")]
pub use document_wheel::{WheelListener, listen_document_wheel};

#[cfg(target_arch = "wasm32")]
mod document_wheel {
    use skinstore_core::WheelSignal;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    /// Document-level wheel listener, removed on drop.
    pub struct WheelListener {
        closure: Closure<dyn FnMut(web_sys::WheelEvent)>,
    }

    impl Drop for WheelListener {
        fn drop(&mut self) {
            if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
                let _ = doc.remove_event_listener_with_callback(
                    "wheel",
                    self.closure.as_ref().unchecked_ref(),
                );
            }
        }
    }

    /// Capture wheel events anywhere on the page. The listener is not passive
    /// so page scrolling is suppressed while the carousel is mounted.
    pub fn listen_document_wheel(on_signal: impl Fn(WheelSignal) + 'static) -> Option<WheelListener> {
        let doc = web_sys::window()?.document()?;
        let closure = Closure::<dyn FnMut(web_sys::WheelEvent)>::new(move |e: web_sys::WheelEvent| {
            e.prevent_default();
            on_signal(WheelSignal::new(e.delta_y()));
        });
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        doc.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .ok()?;
        Some(WheelListener { closure })
    }
}
