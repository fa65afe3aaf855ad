// Accessibility helpers

/// Id of the polite live region rendered by the carousel.
pub const STATUS_REGION_ID: &str = "skins-status";

/// Get CSS for visible focus indicators and screen reader utilities
///
/// Returns critical accessibility CSS that should be injected early in the page load.
#[must_use]
pub const fn visible_focus_css() -> &'static str {
    ":focus{outline:3px solid #a78bfa;outline-offset:2px} .sr-only{position:absolute;width:1px;height:1px;margin:-1px;overflow:hidden;clip:rect(0 0 0 0);white-space:nowrap;}"
}

/// Update the live region status for screen readers
///
/// Writes into the carousel's live region if it is mounted.
pub fn set_status(msg: &str) {
    if let Some(node) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(STATUS_REGION_ID))
    {
        node.set_text_content(Some(msg));
    }
}

/// Move focus to the element with `id`, if it exists and is focusable.
pub fn focus_by_id(id: &str) {
    use wasm_bindgen::JsCast;

    if let Some(el) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        let _ = el.focus();
    }
}

/// Elements a Tab press can land on inside a dialog.
pub const FOCUSABLE_SELECTOR: &str = "button:not([disabled]), [href], input:not([disabled]), select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Index Tab must wrap to so focus stays among `count` focusable elements.
///
/// `active` is the position of the focused element, `None` when focus sits on
/// the container itself. Returns `None` when the browser's own move is fine.
#[must_use]
pub fn focus_wrap_target(count: usize, active: Option<usize>, backwards: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    match (active, backwards) {
        (None | Some(0), true) => Some(last),
        (None, false) => Some(0),
        (Some(idx), false) if idx >= last => Some(0),
        _ => None,
    }
}

/// Keep Tab and Shift+Tab cycling inside `container`.
pub fn trap_focus_in(container: &web_sys::Element, event: &web_sys::KeyboardEvent) {
    use wasm_bindgen::JsCast;

    if event.key() != "Tab" {
        return;
    }
    let Ok(nodes) = container.query_selector_all(FOCUSABLE_SELECTOR) else {
        return;
    };
    let focusable: Vec<web_sys::HtmlElement> = (0..nodes.length())
        .filter_map(|idx| nodes.item(idx))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .collect();
    let active = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.active_element());
    let position = active.and_then(|active| focusable.iter().position(|el| **el == active));
    if let Some(target) = focus_wrap_target(focusable.len(), position, event.shift_key())
        .and_then(|idx| focusable.get(idx))
    {
        event.prevent_default();
        let _ = target.focus();
    }
}
