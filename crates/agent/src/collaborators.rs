//! Upstream collaborator traits and deterministic fixtures.
//!
//! Price discovery and feedback analysis are opaque providers from the
//! engine's point of view. The fixtures below back the offline/demo path
//! and the integration tests; production deployments plug real providers
//! in behind the same traits.

use anyhow::Result;
use async_trait::async_trait;

use pricelens_core::{CompetitorListing, CustomerFeedbackSummary};
use pricelens_core::feedback::{CustomerNeeds, Sentiment};

/// Web-search price discovery: product identity in, competitor listings out.
#[async_trait]
pub trait PriceDiscovery: Send + Sync {
    async fn discover(&self, product_name: &str) -> Result<Vec<CompetitorListing>>;
}

/// AI summarization of customer feedback for the product.
#[async_trait]
pub trait FeedbackAnalyst: Send + Sync {
    async fn analyze(&self, product_name: &str) -> Result<CustomerFeedbackSummary>;
}

/// Deterministic five-retailer market used offline. Median lands at
/// ₹10,999 so the demo scenarios line up with the engine tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePriceDiscovery;

#[async_trait]
impl PriceDiscovery for FixturePriceDiscovery {
    async fn discover(&self, product_name: &str) -> Result<Vec<CompetitorListing>> {
        let listing = |website: &str, price: &str| CompetitorListing {
            website: website.to_owned(),
            price: price.to_owned(),
            description: format!("{product_name} - standard retail listing"),
            url: format!("https://{website}/p/{}", product_name.replace(' ', "-")),
        };

        Ok(vec![
            listing("shopkart.example", "₹10,499"),
            listing("bazaarly.example", "₹10,999"),
            listing("megamart.example", "₹10,999"),
            listing("dealhub.example", "₹10,999 (incl. GST)"),
            listing("primestore.example", "₹11,999"),
        ])
    }
}

/// Deterministic feedback summary used offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureFeedbackAnalyst;

#[async_trait]
impl FeedbackAnalyst for FixtureFeedbackAnalyst {
    async fn analyze(&self, _product_name: &str) -> Result<CustomerFeedbackSummary> {
        Ok(CustomerFeedbackSummary {
            overall_sentiment: Sentiment::Mixed,
            rating: "3.9 out of 5".to_owned(),
            strengths: vec!["battery life".to_owned(), "build quality".to_owned()],
            weaknesses: vec!["average sound isolation".to_owned()],
            common_complaints: vec![
                "slow customer support".to_owned(),
                "flimsy packaging".to_owned(),
            ],
            target_audience: "commuters and budget-conscious students".to_owned(),
            customer_needs: CustomerNeeds {
                deal_breakers: vec!["no warranty card in the box".to_owned()],
                missing_features: vec!["fast charging".to_owned()],
                purchase_motivators: vec!["price".to_owned(), "brand trust".to_owned()],
                price_sensitivity: "high".to_owned(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricelens_core::parse_competitor_prices;

    #[tokio::test]
    async fn fixture_market_has_a_median_of_10999() {
        let listings = FixturePriceDiscovery.discover("wireless earbuds").await.unwrap();
        let prices = parse_competitor_prices(&listings).unwrap();

        assert_eq!(prices.len(), 5);
        let mut sorted = prices;
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted[2], 10_999.0);
    }

    #[tokio::test]
    async fn fixture_feedback_populates_every_rule_input() {
        let summary = FixtureFeedbackAnalyst.analyze("wireless earbuds").await.unwrap();

        assert!(!summary.strengths.is_empty());
        assert!(!summary.common_complaints.is_empty());
        assert!(!summary.customer_needs.deal_breakers.is_empty());
        assert!(!summary.customer_needs.missing_features.is_empty());
    }
}
