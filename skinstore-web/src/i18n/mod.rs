mod format;
mod render;

pub use format::fmt_price;
pub use render::{t, tr};

use serde_json::Value;

const EN: &str = include_str!("../../i18n/en.json");

thread_local! {
    static TRANSLATIONS: Value =
        serde_json::from_str(EN).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
}

fn with_translations<R>(f: impl FnOnce(&Value) -> R) -> R {
    TRANSLATIONS.with(f)
}
