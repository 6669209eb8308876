//! Zone classification: where the merchant price sits relative to the
//! market, how far off it is, and how much the market read can be trusted.

use serde::{Deserialize, Serialize};

use super::metrics::PricingMetrics;
use super::thresholds::PricingThresholds;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceZone {
    Overpriced,
    MarketAligned,
    Underpriced,
}

impl PriceZone {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overpriced => "Overpriced",
            Self::MarketAligned => "Market-Aligned",
            Self::Underpriced => "Underpriced",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSeverity {
    Critical,
    Moderate,
    Optimal,
}

/// How trustworthy the market read is. Depends only on market shape
/// (retailer count and spread), never on the merchant price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingZone {
    pub zone: PriceZone,
    pub severity: PriceSeverity,
    pub confidence: ConfidenceLevel,
}

/// Classify metrics into a pricing zone. Pure and total: every finite
/// `price_index` lands in exactly one band.
pub fn classify_zone(metrics: &PricingMetrics, thresholds: &PricingThresholds) -> PricingZone {
    let confidence = market_confidence(metrics, thresholds);
    let index = metrics.price_index;

    let (zone, severity) = if index > thresholds.overpriced_index {
        let severity = if index > thresholds.severe_overpriced_index {
            PriceSeverity::Critical
        } else {
            PriceSeverity::Moderate
        };
        (PriceZone::Overpriced, severity)
    } else if index >= thresholds.aligned_floor_index {
        (PriceZone::MarketAligned, PriceSeverity::Optimal)
    } else {
        let severity = if index < thresholds.severe_underpriced_index {
            PriceSeverity::Critical
        } else {
            PriceSeverity::Moderate
        };
        (PriceZone::Underpriced, severity)
    };

    PricingZone { zone, severity, confidence }
}

fn market_confidence(metrics: &PricingMetrics, thresholds: &PricingThresholds) -> ConfidenceLevel {
    if metrics.total_retailers >= thresholds.high_confidence_min_retailers
        && metrics.price_spread_percent < thresholds.high_confidence_max_spread
    {
        ConfidenceLevel::High
    } else if metrics.total_retailers <= thresholds.low_confidence_max_retailers
        || metrics.price_spread_percent > thresholds.low_confidence_min_spread
    {
        ConfidenceLevel::Low
    } else {
        ConfidenceLevel::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with(index: f64, retailers: usize, spread: f64) -> PricingMetrics {
        PricingMetrics {
            min_market_price: 90.0,
            max_market_price: 110.0,
            median_market_price: 100.0,
            average_market_price: 100.0,
            merchant_price: index,
            price_spread_percent: spread,
            price_index: index,
            competitive_rank: 1,
            total_retailers: retailers,
            position_percentile: 100.0 / retailers as f64,
        }
    }

    fn classify(index: f64) -> PricingZone {
        classify_zone(&metrics_with(index, 5, 15.0), &PricingThresholds::default())
    }

    #[test]
    fn boundaries_fall_on_the_documented_side() {
        assert_eq!(classify(108.0).zone, PriceZone::MarketAligned);
        assert_eq!(classify(108.01).zone, PriceZone::Overpriced);

        assert_eq!(classify(130.0).severity, PriceSeverity::Moderate);
        assert_eq!(classify(130.01).severity, PriceSeverity::Critical);

        assert_eq!(classify(95.0).zone, PriceZone::MarketAligned);
        assert_eq!(classify(94.99).zone, PriceZone::Underpriced);

        assert_eq!(classify(50.0).severity, PriceSeverity::Moderate);
        assert_eq!(classify(49.99).severity, PriceSeverity::Critical);
    }

    #[test]
    fn aligned_zone_is_always_optimal() {
        for index in [95.0, 100.0, 104.5, 108.0] {
            let zone = classify(index);
            assert_eq!(zone.zone, PriceZone::MarketAligned);
            assert_eq!(zone.severity, PriceSeverity::Optimal);
        }
    }

    #[test]
    fn confidence_depends_only_on_market_shape() {
        let thresholds = PricingThresholds::default();

        let high = classify_zone(&metrics_with(100.0, 6, 9.9), &thresholds);
        assert_eq!(high.confidence, ConfidenceLevel::High);

        // Three retailers force Low even with a tight spread.
        let low = classify_zone(&metrics_with(100.0, 3, 2.0), &thresholds);
        assert_eq!(low.confidence, ConfidenceLevel::Low);

        let wide = classify_zone(&metrics_with(100.0, 8, 25.0), &thresholds);
        assert_eq!(wide.confidence, ConfidenceLevel::Low);

        let medium = classify_zone(&metrics_with(100.0, 5, 15.0), &thresholds);
        assert_eq!(medium.confidence, ConfidenceLevel::Medium);
    }
}
