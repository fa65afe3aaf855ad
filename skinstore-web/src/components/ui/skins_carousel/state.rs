use skinstore_core::{Catalog, CatalogItem, CarouselCursor, NavCommand, Navigator, PurchaseStatus};
use std::rc::Rc;
use yew::prelude::*;

/// Number of cards on screen at once.
pub const DEFAULT_VISIBLE: usize = 3;

#[derive(Properties, Clone, PartialEq)]
pub struct SkinsCarouselProps {
    pub catalog: Rc<Catalog>,
    /// Shared status of the purchase controller.
    pub status: PurchaseStatus,
    /// Both wallets are bound; purchase buttons stay disabled otherwise.
    pub wallets_ready: bool,
    /// Confirmation of a purchase from the dialog.
    pub on_purchase: Callback<CatalogItem>,
    /// Dialog dismissed.
    #[prop_or_default]
    pub on_dismiss: Callback<()>,
    #[prop_or(DEFAULT_VISIBLE)]
    pub visible: usize,
    #[prop_or_default]
    pub initial_index: usize,
    /// Item whose dialog is open on first render.
    #[prop_or_default]
    pub initial_dialog: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    pub cursor: CarouselCursor,
}

impl CarouselState {
    #[must_use]
    pub const fn new(len: usize, index: usize) -> Self {
        Self {
            cursor: CarouselCursor::at(len, index),
        }
    }
}

pub enum CarouselAction {
    Navigate(NavCommand),
}

impl Reducible for CarouselState {
    type Action = CarouselAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut cursor = self.cursor;
        match action {
            CarouselAction::Navigate(command) => cursor.apply(command),
        }
        Rc::new(Self { cursor })
    }
}

/// Label and enabled state of a card's purchase button.
#[must_use]
pub fn purchase_button_state(status: PurchaseStatus, wallets_ready: bool) -> (&'static str, bool) {
    if status.is_processing() {
        ("skins.processing", false)
    } else {
        ("skins.purchase", wallets_ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reducer_wraps_in_both_directions() {
        let state = Rc::new(CarouselState::new(8, 7));
        let next = state.reduce(CarouselAction::Navigate(NavCommand::Advance));
        assert_eq!(next.cursor.index(), 0);
        let back = next.reduce(CarouselAction::Navigate(NavCommand::Retreat));
        assert_eq!(back.cursor.index(), 7);
    }

    #[test]
    fn purchase_button_follows_status_and_wallets() {
        assert_eq!(purchase_button_state(PurchaseStatus::Idle, true), ("skins.purchase", true));
        assert_eq!(purchase_button_state(PurchaseStatus::Idle, false), ("skins.purchase", false));
        assert_eq!(purchase_button_state(PurchaseStatus::Processing, true), ("skins.processing", false));
        assert_eq!(purchase_button_state(PurchaseStatus::Error, true), ("skins.purchase", true));
    }
}
