pub mod card;
pub mod dialog;
