use rust_decimal::Decimal;

/// Format a catalog price the way it is listed: no trailing zeros.
#[must_use]
pub fn fmt_price(price: Decimal) -> String {
    price.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_zeros() {
        assert_eq!(fmt_price("0.50".parse().unwrap()), "0.5");
        assert_eq!(fmt_price("0.65".parse().unwrap()), "0.65");
        assert_eq!(fmt_price("2.000".parse().unwrap()), "2");
    }
}
