use super::with_translations;
use serde_json::Value;
use std::collections::BTreeMap;

fn get_nested_value<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = obj;
    for k in key.split('.') {
        current = current.get(k)?;
    }
    Some(current)
}

fn render_value(value: &Value, args: Option<&BTreeMap<&str, &str>>) -> Option<String> {
    let mut text = value.as_str()?.to_string();
    if let Some(args_map) = args {
        for (k, v) in args_map {
            let ph1 = format!("{{{{{k}}}}}");
            let ph2 = format!("{{{k}}}");
            text = text.replace(&ph1, v);
            text = text.replace(&ph2, v);
        }
    }
    Some(text)
}

/// Translate a key without variable substitution.
#[must_use]
pub fn t(key: &str) -> String {
    tr(key, None)
}

/// Translate a key with variable substitution
///
/// Variables in the translated string use the format {key} or {{key}}.
/// Unknown keys come back unchanged.
#[must_use]
pub fn tr(key: &str, args: Option<&BTreeMap<&str, &str>>) -> String {
    with_translations(|bundle| get_nested_value(bundle, key).and_then(|v| render_value(v, args)))
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_keys() {
        assert_eq!(t("skins.purchase"), "Purchase");
        assert_eq!(t("skins.missing"), "skins.missing");
        assert_eq!(t("skins.dialog"), "skins.dialog");
    }

    #[test]
    fn substitutes_variables() {
        let mut vars = BTreeMap::new();
        vars.insert("name", "Neon Fury");
        vars.insert("price", "0.4");
        assert_eq!(
            tr("skins.dialog.description", Some(&vars)),
            "You are about to purchase Neon Fury for 0.4 SOL using USDC from Ethereum."
        );
    }
}
