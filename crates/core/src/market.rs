//! Input contract for the price-discovery collaborator.
//!
//! Upstream web search returns listings with display-formatted price
//! strings ("₹10,999", "Rs. 1,29,900.00"). The engine works on plain
//! numbers, so the formatting is stripped here, before any metric is
//! computed.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One competitor listing as returned by the price-discovery collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorListing {
    pub website: String,
    /// Display-formatted price, currency symbol and separators included.
    pub price: String,
    pub description: String,
    pub url: String,
}

/// Extract the numeric value from a display-formatted price string.
///
/// Scans to the first digit, then consumes digits, thousands separators,
/// and a decimal point. Returns `None` when no positive number is found.
pub fn parse_price_string(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let numeric: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();

    let value: f64 = numeric.trim_end_matches('.').parse().ok()?;
    (value > 0.0).then_some(value)
}

/// Convert discovery listings into the competitor price list the metrics
/// calculator expects.
///
/// Listings with unparseable prices are skipped. An empty input, or an
/// input where nothing parses, is rejected: there is no market to analyze
/// and downstream math would degenerate into NaN.
pub fn parse_competitor_prices(
    listings: &[CompetitorListing],
) -> Result<Vec<f64>, DomainError> {
    if listings.is_empty() {
        return Err(DomainError::EmptyCompetitorList);
    }

    let prices: Vec<f64> =
        listings.iter().filter_map(|listing| parse_price_string(&listing.price)).collect();

    if prices.is_empty() {
        return Err(DomainError::UnparseableListings(listings.len()));
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: &str) -> CompetitorListing {
        CompetitorListing {
            website: "shopmart.example".to_owned(),
            price: price.to_owned(),
            description: "Wireless earbuds, black".to_owned(),
            url: "https://shopmart.example/p/123".to_owned(),
        }
    }

    #[test]
    fn strips_currency_symbol_and_thousands_separators() {
        assert_eq!(parse_price_string("₹10,999"), Some(10999.0));
        assert_eq!(parse_price_string("Rs. 1,29,900.00"), Some(129900.0));
        assert_eq!(parse_price_string("$1,299.50"), Some(1299.5));
    }

    #[test]
    fn ignores_trailing_annotations() {
        assert_eq!(parse_price_string("₹10,999 (incl. GST)"), Some(10999.0));
        assert_eq!(parse_price_string("10999."), Some(10999.0));
    }

    #[test]
    fn rejects_strings_without_a_positive_number() {
        assert_eq!(parse_price_string("price on request"), None);
        assert_eq!(parse_price_string("₹0"), None);
        assert_eq!(parse_price_string(""), None);
    }

    #[test]
    fn empty_listing_set_is_a_domain_error() {
        assert_eq!(parse_competitor_prices(&[]), Err(DomainError::EmptyCompetitorList));
    }

    #[test]
    fn fully_unparseable_listing_set_is_rejected() {
        let listings = vec![listing("out of stock"), listing("call for price")];
        assert_eq!(
            parse_competitor_prices(&listings),
            Err(DomainError::UnparseableListings(2))
        );
    }

    #[test]
    fn unparseable_entries_are_skipped_not_fatal() {
        let listings = vec![listing("₹10,999"), listing("out of stock"), listing("₹11,499")];
        assert_eq!(parse_competitor_prices(&listings), Ok(vec![10999.0, 11499.0]));
    }
}
