//! The rule table behind the whole engine.
//!
//! All breakpoints and gap-closure factors live in one record so the
//! policy is auditable in one place and testable apart from the branch
//! logic that consumes it.

use serde::{Deserialize, Serialize};

/// Zone breakpoints, confidence gates, and recommendation tuning knobs.
///
/// Price-index values are percentages of the competitor median
/// (100 = exactly at median). `overpriced_tier_index` is a
/// recommendation-tier boundary only; it never affects zone
/// classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingThresholds {
    /// Above this index the merchant is overpriced.
    pub overpriced_index: f64,
    /// Above this index overpricing is critical.
    pub severe_overpriced_index: f64,
    /// Splits the moderate and minor overpriced recommendation tiers.
    pub overpriced_tier_index: f64,
    /// Below this index the merchant is underpriced.
    pub aligned_floor_index: f64,
    /// Splits the moderate and minor underpriced recommendation tiers.
    pub minor_underpriced_index: f64,
    /// Below this index underpricing is critical.
    pub severe_underpriced_index: f64,

    /// Market-read confidence: minimum retailer count for High.
    pub high_confidence_min_retailers: usize,
    /// Market-read confidence: maximum spread percent for High.
    pub high_confidence_max_spread: f64,
    /// Market-read confidence: at or below this retailer count, Low.
    pub low_confidence_max_retailers: usize,
    /// Market-read confidence: above this spread percent, Low.
    pub low_confidence_min_spread: f64,

    /// Fraction of the merchant-to-median gap closed in the moderate
    /// overpriced tier.
    pub overpriced_moderate_gap_close: f64,
    /// Fraction closed in the minor overpriced tier.
    pub overpriced_minor_gap_close: f64,
    /// Fraction of the median-to-merchant gap closed in the moderate
    /// underpriced tier.
    pub underpriced_moderate_gap_close: f64,
    /// Fractions of the full gap bounding the minor underpriced range.
    pub underpriced_minor_range: (f64, f64),
}

impl Default for PricingThresholds {
    fn default() -> Self {
        Self {
            overpriced_index: 108.0,
            severe_overpriced_index: 130.0,
            overpriced_tier_index: 115.0,
            aligned_floor_index: 95.0,
            minor_underpriced_index: 90.0,
            severe_underpriced_index: 50.0,
            high_confidence_min_retailers: 6,
            high_confidence_max_spread: 10.0,
            low_confidence_max_retailers: 3,
            low_confidence_min_spread: 20.0,
            overpriced_moderate_gap_close: 0.65,
            overpriced_minor_gap_close: 0.60,
            underpriced_moderate_gap_close: 0.60,
            underpriced_minor_range: (0.5, 0.65),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PricingThresholds;

    #[test]
    fn default_bands_partition_the_index_axis() {
        let thresholds = PricingThresholds::default();

        // Overpriced starts strictly above the aligned ceiling; underpriced
        // strictly below the aligned floor. No gap, no overlap.
        assert!(thresholds.aligned_floor_index < thresholds.overpriced_index);
        assert!(thresholds.severe_underpriced_index < thresholds.minor_underpriced_index);
        assert!(thresholds.minor_underpriced_index < thresholds.aligned_floor_index);
        assert!(thresholds.overpriced_index < thresholds.overpriced_tier_index);
        assert!(thresholds.overpriced_tier_index < thresholds.severe_overpriced_index);
    }

    #[test]
    fn default_confidence_gates_do_not_overlap() {
        let thresholds = PricingThresholds::default();
        assert!(
            thresholds.low_confidence_max_retailers < thresholds.high_confidence_min_retailers
        );
        assert!(thresholds.high_confidence_max_spread < thresholds.low_confidence_min_spread);
    }
}
