//! Final result assembly and presentation-only formatting.
//!
//! Everything here is derived display state: formatted currency strings,
//! the "rank of total" string, the signed distance from median. No new
//! metric is computed after this point.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::festival::FestivalContext;
use super::metrics::PricingMetrics;
use super::recommend::ActionableRecommendation;
use super::zone::{ConfidenceLevel, PriceSeverity, PriceZone, PricingZone};

/// Human-formatted market snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub lowest_price: String,
    pub highest_price: String,
    pub median_price: String,
    pub average_price: String,
    pub merchant_price: String,
    pub retailers_tracked: usize,
}

/// Numeric metric subset carried through to consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreMetrics {
    pub price_index: f64,
    pub price_spread_percent: f64,
    pub average_market_price: f64,
    pub position_percentile: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingStatus {
    pub status: String,
    pub price_index: f64,
    /// Formatted as "rank of total", e.g. "3 of 6".
    pub competitive_rank: String,
    /// Signed distance from the competitor median, e.g. "+12.3%".
    pub difference_from_median: String,
    pub zone: PricingZone,
}

/// The immutable aggregate handed to the presentation layer. Constructed
/// once per analysis, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisResult {
    pub analysis_id: Uuid,
    pub product_name: String,
    pub market_snapshot: MarketSnapshot,
    pub core_metrics: CoreMetrics,
    pub pricing_status: PricingStatus,
    pub recommendations: Vec<ActionableRecommendation>,
    /// False when the language-enhancement pass fell back to raw wording.
    pub enhancement_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub festival_context: Option<FestivalContext>,
}

/// Package metrics, zone, recommendations, and festival context into the
/// final result.
pub fn assemble_report(
    product_name: &str,
    metrics: &PricingMetrics,
    zone: PricingZone,
    recommendations: Vec<ActionableRecommendation>,
    enhancement_applied: bool,
    festival_context: Option<FestivalContext>,
) -> MarketAnalysisResult {
    MarketAnalysisResult {
        analysis_id: Uuid::new_v4(),
        product_name: product_name.to_owned(),
        market_snapshot: MarketSnapshot {
            lowest_price: format_inr(metrics.min_market_price),
            highest_price: format_inr(metrics.max_market_price),
            median_price: format_inr(metrics.median_market_price),
            average_price: format_inr(metrics.average_market_price),
            merchant_price: format_inr(metrics.merchant_price),
            retailers_tracked: metrics.total_retailers,
        },
        core_metrics: CoreMetrics {
            price_index: metrics.price_index,
            price_spread_percent: metrics.price_spread_percent,
            average_market_price: metrics.average_market_price,
            position_percentile: metrics.position_percentile,
        },
        pricing_status: PricingStatus {
            status: status_text(&zone).to_owned(),
            price_index: metrics.price_index,
            competitive_rank: format!(
                "{} of {}",
                metrics.competitive_rank, metrics.total_retailers
            ),
            difference_from_median: format_signed_percent(metrics.price_index - 100.0),
            zone,
        },
        recommendations,
        enhancement_applied,
        festival_context,
    }
}

fn status_text(zone: &PricingZone) -> &'static str {
    match (zone.zone, zone.severity) {
        (PriceZone::Overpriced, PriceSeverity::Critical) => "Critically above market",
        (PriceZone::Overpriced, _) => "Above market",
        (PriceZone::MarketAligned, _) => "At market",
        (PriceZone::Underpriced, PriceSeverity::Critical) => "Critically below market",
        (PriceZone::Underpriced, _) => "Below market",
    }
}

/// Display-selection policy: High/Medium confidence only, priority
/// ascending, between two and five entries. When the confidence filter
/// leaves fewer than two, Low-confidence entries backfill by priority.
pub fn select_for_display(
    recommendations: &[ActionableRecommendation],
) -> Vec<ActionableRecommendation> {
    let mut selected: Vec<ActionableRecommendation> = recommendations
        .iter()
        .filter(|r| r.confidence != ConfidenceLevel::Low)
        .cloned()
        .collect();
    selected.sort_by_key(|r| r.priority);

    if selected.len() < 2 {
        let mut backfill: Vec<ActionableRecommendation> = recommendations
            .iter()
            .filter(|r| r.confidence == ConfidenceLevel::Low)
            .cloned()
            .collect();
        backfill.sort_by_key(|r| r.priority);
        selected.extend(backfill.into_iter().take(2 - selected.len()));
        selected.sort_by_key(|r| r.priority);
    }

    selected.truncate(5);
    selected
}

/// One-line verdict derived from the zone and the top displayed action.
pub fn summary_line(zone: &PricingZone, top: Option<&ActionableRecommendation>) -> String {
    match top {
        Some(recommendation) => format!(
            "Your price is {}. Top move ({}): {}",
            zone.zone.label(),
            recommendation.category.label(),
            recommendation.action
        ),
        None => format!(
            "Your price is {}. No recommendation cleared the confidence bar.",
            zone.zone.label()
        ),
    }
}

/// Indian-market currency formatting: last three digits, then groups of
/// two (1,10,000 style). Values are shown as whole rupees.
pub fn format_inr(value: f64) -> String {
    let negative = value < 0.0;
    let digits = (value.abs().round() as u64).to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            parts.push(&head[end - 2..end]);
            end -= 2;
        }
        parts.push(&head[..end]);
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    format!("{}₹{}", if negative { "-" } else { "" }, grouped)
}

pub fn format_signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metrics::calculate_pricing_metrics;
    use crate::engine::recommend::RecommendationCategory;
    use crate::engine::thresholds::PricingThresholds;
    use crate::engine::zone::classify_zone;

    fn recommendation(priority: u8, confidence: ConfidenceLevel) -> ActionableRecommendation {
        ActionableRecommendation {
            priority,
            action: format!("action {priority}"),
            reasoning: vec!["reason".to_owned()],
            expected_impact: "impact".to_owned(),
            confidence,
            category: RecommendationCategory::Pricing,
            price_target: None,
            round_price: None,
        }
    }

    #[test]
    fn inr_formatting_uses_indian_grouping() {
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(10_999.0), "₹10,999");
        assert_eq!(format_inr(110_000.0), "₹1,10,000");
        assert_eq!(format_inr(12_34_56_789.0), "₹12,34,56,789");
        assert_eq!(format_inr(-4_500.0), "-₹4,500");
    }

    #[test]
    fn signed_percent_keeps_the_sign() {
        assert_eq!(format_signed_percent(12.34), "+12.3%");
        assert_eq!(format_signed_percent(-4.0), "-4.0%");
        assert_eq!(format_signed_percent(0.0), "+0.0%");
    }

    #[test]
    fn display_selection_filters_low_and_clamps_to_five() {
        let batch: Vec<_> = (1..=7)
            .map(|priority| {
                let confidence =
                    if priority == 3 { ConfidenceLevel::Low } else { ConfidenceLevel::High };
                recommendation(priority, confidence)
            })
            .collect();

        let selected = select_for_display(&batch);
        assert_eq!(selected.len(), 5);
        assert!(selected.iter().all(|r| r.confidence != ConfidenceLevel::Low));
        assert!(selected.windows(2).all(|pair| pair[0].priority <= pair[1].priority));
    }

    #[test]
    fn display_selection_backfills_to_a_minimum_of_two() {
        let batch = vec![
            recommendation(1, ConfidenceLevel::High),
            recommendation(2, ConfidenceLevel::Low),
            recommendation(3, ConfidenceLevel::Low),
        ];

        let selected = select_for_display(&batch);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].priority, 1);
        assert_eq!(selected[1].priority, 2);
    }

    #[test]
    fn summary_line_names_zone_and_top_action() {
        let metrics = calculate_pricing_metrics(&[100.0, 200.0, 300.0], 200.0).unwrap();
        let zone = classify_zone(&metrics, &PricingThresholds::default());
        let top = recommendation(1, ConfidenceLevel::High);

        let line = summary_line(&zone, Some(&top));
        assert!(line.contains("Market-Aligned"));
        assert!(line.contains("action 1"));

        let empty = summary_line(&zone, None);
        assert!(empty.contains("No recommendation"));
    }

    #[test]
    fn assembled_report_formats_presentation_fields() {
        let competitors = [10_499.0, 10_999.0, 10_999.0, 10_999.0, 11_999.0];
        let metrics = calculate_pricing_metrics(&competitors, 11_000.0).unwrap();
        let zone = classify_zone(&metrics, &PricingThresholds::default());

        let report = assemble_report(
            "wireless earbuds",
            &metrics,
            zone,
            vec![recommendation(1, ConfidenceLevel::High)],
            false,
            None,
        );

        assert_eq!(report.market_snapshot.median_price, "₹10,999");
        assert_eq!(report.market_snapshot.retailers_tracked, 6);
        assert_eq!(report.pricing_status.status, "At market");
        assert_eq!(report.pricing_status.competitive_rank, "5 of 6");
        assert!(report.pricing_status.difference_from_median.starts_with('+'));
        assert!(report.festival_context.is_none());
        assert!(!report.enhancement_applied);
    }
}
