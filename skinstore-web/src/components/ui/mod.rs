pub mod skins_carousel;
