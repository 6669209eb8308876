/// Shape a raw price target into a charm price: down to the nearest
/// thousand, plus 999.
///
/// The result always ends in 999, so applying the function to its own
/// output is a no-op. The output can land above the input (10500 becomes
/// 10999); the function shapes price tags, it is not a rounding-down
/// operation.
pub fn psychological_price(price: f64) -> f64 {
    (price / 1000.0).floor() * 1000.0 + 999.0
}

#[cfg(test)]
mod tests {
    use super::psychological_price;

    #[test]
    fn rounds_into_the_charm_band() {
        assert_eq!(psychological_price(11000.0), 11999.0);
        assert_eq!(psychological_price(10500.0), 10999.0);
        assert_eq!(psychological_price(10998.0), 10999.0);
        assert_eq!(psychological_price(999.0), 999.0);
        assert_eq!(psychological_price(1.0), 999.0);
    }

    #[test]
    fn is_idempotent_on_its_own_output() {
        for raw in [1.0, 999.0, 10500.0, 10999.0, 110000.0, 129900.0] {
            let once = psychological_price(raw);
            assert_eq!(psychological_price(once), once, "raw input {raw}");
        }
    }
}
