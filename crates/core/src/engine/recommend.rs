//! Tiered recommendation rules.
//!
//! Zone dispatch first (three mutually exclusive branches, each with
//! severity tiers on the price index), then an optional festival rule,
//! then the universal rules that fire regardless of zone. Identical
//! inputs always produce the identical batch; wording may be reworked
//! later by the enhancement pass, but never the decisions.

use serde::{Deserialize, Serialize};

use super::festival::FestivalContext;
use super::metrics::PricingMetrics;
use super::report::format_inr;
use super::rounding::psychological_price;
use super::thresholds::PricingThresholds;
use super::zone::{ConfidenceLevel, PriceSeverity, PriceZone, PricingZone};
use crate::feedback::CustomerFeedbackSummary;

/// Named default used when a quality rule fires without a concrete
/// missing feature to cite.
const DEFAULT_MISSING_FEATURE: &str = "the most requested product improvements";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationCategory {
    Pricing,
    ValueAdd,
    Marketing,
    Urgency,
    Quality,
    Festival,
}

impl RecommendationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pricing => "Pricing",
            Self::ValueAdd => "Value-Add",
            Self::Marketing => "Marketing",
            Self::Urgency => "Urgency",
            Self::Quality => "Quality",
            Self::Festival => "Festival",
        }
    }
}

/// A charm-priced target band embedded in a pricing recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    fn charm(low: f64, high: f64) -> Self {
        let low = psychological_price(low);
        let high = psychological_price(high);
        // A narrow gap can collapse both ends into the same charm band.
        Self { low: low.min(high), high: high.max(low) }
    }

    pub fn display(&self) -> String {
        if self.low == self.high {
            format_inr(self.low)
        } else {
            format!("{}-{}", format_inr(self.low), format_inr(self.high))
        }
    }
}

/// Side payload for the round-price charm suggestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPriceSuggestion {
    pub current_price: f64,
    pub suggested_price: f64,
    pub savings_perception: String,
}

/// One ranked, deterministic action for the merchant. Lower priority
/// sorts first; the presentation layer filters and clamps the batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableRecommendation {
    pub priority: u8,
    pub action: String,
    pub reasoning: Vec<String>,
    pub expected_impact: String,
    pub confidence: ConfidenceLevel,
    pub category: RecommendationCategory,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_target: Option<PriceRange>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub round_price: Option<RoundPriceSuggestion>,
}

/// The rule engine. Holds the threshold table and nothing else; every
/// call to [`RecommendationGenerator::generate`] is independent.
#[derive(Debug, Clone, Default)]
pub struct RecommendationGenerator {
    thresholds: PricingThresholds,
}

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self { thresholds: PricingThresholds::default() }
    }

    pub fn with_thresholds(thresholds: PricingThresholds) -> Self {
        Self { thresholds }
    }

    /// Produce the raw recommendation batch, ordered by priority.
    ///
    /// Never fails for well-formed metrics and zone; missing feedback
    /// collections simply skip their rules.
    pub fn generate(
        &self,
        metrics: &PricingMetrics,
        zone: &PricingZone,
        feedback: &CustomerFeedbackSummary,
        festival: Option<&FestivalContext>,
    ) -> Vec<ActionableRecommendation> {
        let mut batch = Vec::new();

        match zone.zone {
            PriceZone::Overpriced => self.overpriced_branch(metrics, zone, &mut batch),
            PriceZone::MarketAligned => self.aligned_branch(metrics, zone, feedback, &mut batch),
            PriceZone::Underpriced => self.underpriced_branch(metrics, zone, &mut batch),
        }

        if let Some(context) = festival {
            batch.push(festival_rule(context));
        }

        self.universal_rules(metrics, feedback, &mut batch);

        batch.sort_by_key(|recommendation| recommendation.priority);
        batch
    }

    fn overpriced_branch(
        &self,
        metrics: &PricingMetrics,
        zone: &PricingZone,
        batch: &mut Vec<ActionableRecommendation>,
    ) {
        let t = &self.thresholds;
        let median = metrics.median_market_price;
        let merchant = metrics.merchant_price;
        let over_percent = metrics.price_index - 100.0;

        let (range, confidence, tier_reason) = if metrics.price_index > t.severe_overpriced_index {
            // Severe tier: pull the price back into a band bracketing the
            // market median.
            let range = PriceRange::charm(median - 1.0, median + 999.0);
            let reason = format!(
                "Severe overpricing: {}% above the market median of {}",
                over_percent.round(),
                format_inr(median)
            );
            (range, ConfidenceLevel::High, reason)
        } else if metrics.price_index > t.overpriced_tier_index {
            let reduction = (merchant - median) * t.overpriced_moderate_gap_close;
            let range = PriceRange::charm(merchant - reduction * 1.1, merchant - reduction * 0.9);
            let reason = format!(
                "Priced {}% above the market median of {}",
                over_percent.round(),
                format_inr(median)
            );
            (range, zone.confidence, reason)
        } else {
            let reduction = (merchant - median) * t.overpriced_minor_gap_close;
            let range = PriceRange::charm(merchant - reduction, merchant - 0.8 * reduction);
            let reason = format!(
                "Slightly above market: {}% over the median of {}",
                over_percent.round(),
                format_inr(median)
            );
            (range, zone.confidence, reason)
        };

        batch.push(ActionableRecommendation {
            priority: 1,
            action: format!("Reduce price to the {} range", range.display()),
            reasoning: vec![
                tier_reason,
                format!(
                    "Currently ranked {} of {} tracked retailers by price",
                    metrics.competitive_rank, metrics.total_retailers
                ),
            ],
            expected_impact: "Recovers price-comparison shoppers lost to cheaper listings"
                .to_owned(),
            confidence,
            category: RecommendationCategory::Pricing,
            price_target: Some(range),
            round_price: None,
        });

        batch.push(ActionableRecommendation {
            priority: 2,
            action: "Bundle accessories or extended warranty instead of a deeper price cut"
                .to_owned(),
            reasoning: vec![
                "A bundle preserves margin while improving perceived value".to_owned(),
                format!("Market median sits at {}", format_inr(median)),
            ],
            expected_impact: "Justifies the premium without racing to the bottom".to_owned(),
            confidence: ConfidenceLevel::Medium,
            category: RecommendationCategory::ValueAdd,
            price_target: None,
            round_price: None,
        });

        // Urgency plays poorly when the price is severely off; only the
        // moderate and minor tiers get it.
        if metrics.price_index <= t.severe_overpriced_index {
            batch.push(ActionableRecommendation {
                priority: 3,
                action: "Run a 48-hour flash sale with limited-stock messaging".to_owned(),
                reasoning: vec![
                    "Time pressure converts browsers who already compare prices".to_owned(),
                ],
                expected_impact: "Short-term conversion lift without a permanent reprice"
                    .to_owned(),
                confidence: ConfidenceLevel::High,
                category: RecommendationCategory::Urgency,
                price_target: None,
                round_price: None,
            });
        }
    }

    fn aligned_branch(
        &self,
        metrics: &PricingMetrics,
        zone: &PricingZone,
        feedback: &CustomerFeedbackSummary,
        batch: &mut Vec<ActionableRecommendation>,
    ) {
        batch.push(ActionableRecommendation {
            priority: 1,
            action: "Hold current price and focus spend on conversion".to_owned(),
            reasoning: vec![
                format!(
                    "Price index {:.1} sits inside the market-aligned band",
                    metrics.price_index
                ),
                format!(
                    "Market median is {}; no repricing pressure",
                    format_inr(metrics.median_market_price)
                ),
            ],
            expected_impact: "Stable margin while competitors fight on price".to_owned(),
            confidence: zone.confidence,
            category: RecommendationCategory::Pricing,
            price_target: None,
            round_price: None,
        });

        let complaints = feedback.top_complaints();
        let complaint_text = if complaints.is_empty() {
            "the most common buyer complaints".to_owned()
        } else {
            complaints.join(" and ")
        };

        batch.push(ActionableRecommendation {
            priority: 2,
            action: format!("Improve listing quality and address {complaint_text}"),
            reasoning: vec![
                "At market price, listing quality decides the sale".to_owned(),
                "Resolving visible complaints lifts rating velocity".to_owned(),
            ],
            expected_impact: "Higher conversion at an unchanged price point".to_owned(),
            confidence: ConfidenceLevel::High,
            category: RecommendationCategory::Quality,
            price_target: None,
            round_price: None,
        });
    }

    fn underpriced_branch(
        &self,
        metrics: &PricingMetrics,
        zone: &PricingZone,
        batch: &mut Vec<ActionableRecommendation>,
    ) {
        let t = &self.thresholds;
        let median = metrics.median_market_price;
        let merchant = metrics.merchant_price;
        let under_percent = 100.0 - metrics.price_index;

        let (range, confidence, tier_reason) = if metrics.price_index < t.severe_underpriced_index
        {
            let range = PriceRange::charm(median - 1.0, median + 999.0);
            let reason = format!(
                "Severe underpricing: {}% below the market median of {}",
                under_percent.round(),
                format_inr(median)
            );
            (range, ConfidenceLevel::High, reason)
        } else if metrics.price_index < t.minor_underpriced_index {
            let gap = (median - merchant) * t.underpriced_moderate_gap_close;
            let range = PriceRange::charm(merchant + gap * 0.8, merchant + gap * 1.2);
            let reason = format!(
                "Priced {}% below the market median of {}",
                under_percent.round(),
                format_inr(median)
            );
            (range, zone.confidence, reason)
        } else {
            let gap = median - merchant;
            let (low_factor, high_factor) = t.underpriced_minor_range;
            let range = PriceRange::charm(merchant + low_factor * gap, merchant + high_factor * gap);
            let reason = format!(
                "Slightly below market: {}% under the median of {}",
                under_percent.round(),
                format_inr(median)
            );
            (range, zone.confidence, reason)
        };

        batch.push(ActionableRecommendation {
            priority: 1,
            action: format!("Increase price to the {} range", range.display()),
            reasoning: vec![
                tier_reason,
                "Pricing far below market reads as a quality signal problem".to_owned(),
            ],
            expected_impact: "Captures margin left on the table without losing rank".to_owned(),
            confidence,
            category: RecommendationCategory::Pricing,
            price_target: Some(range),
            round_price: None,
        });

        // Staying cheap on purpose is only coherent when the gap is not
        // absurd; the severe tier gets a sanity check instead.
        if metrics.price_index < t.severe_underpriced_index {
            batch.push(ActionableRecommendation {
                priority: 2,
                action: "Verify the listed price is not a data-entry error before repricing"
                    .to_owned(),
                reasoning: vec![
                    format!(
                        "A price this far under the {} median usually means a typo or unit mix-up",
                        format_inr(median)
                    ),
                ],
                expected_impact: "Prevents selling out at an accidental price".to_owned(),
                confidence: ConfidenceLevel::High,
                category: RecommendationCategory::Quality,
                price_target: None,
                round_price: None,
            });
        } else {
            batch.push(ActionableRecommendation {
                priority: 2,
                action: "Keep the aggressive price and push volume through ads".to_owned(),
                reasoning: vec![
                    "A genuine price advantage is a marketing asset".to_owned(),
                    format!(
                        "Ranked {} of {} retailers on price",
                        metrics.competitive_rank, metrics.total_retailers
                    ),
                ],
                expected_impact: "Market-share growth funded by the price gap".to_owned(),
                confidence: ConfidenceLevel::Medium,
                category: RecommendationCategory::Marketing,
                price_target: None,
                round_price: None,
            });
        }
    }

    fn universal_rules(
        &self,
        metrics: &PricingMetrics,
        feedback: &CustomerFeedbackSummary,
        batch: &mut Vec<ActionableRecommendation>,
    ) {
        let needs = &feedback.customer_needs;

        if let Some(deal_breaker) = needs.deal_breakers.first() {
            let missing = needs
                .missing_features
                .first()
                .map(String::as_str)
                .unwrap_or(DEFAULT_MISSING_FEATURE);

            batch.push(ActionableRecommendation {
                priority: 5,
                action: format!("Fix the top purchase blocker: {deal_breaker}"),
                reasoning: vec![
                    format!("Buyers flag \"{deal_breaker}\" as a deal breaker"),
                    format!("Pair the fix with {missing}"),
                ],
                expected_impact: "Removes the objection that loses otherwise-ready buyers"
                    .to_owned(),
                confidence: ConfidenceLevel::High,
                category: RecommendationCategory::Quality,
                price_target: None,
                round_price: None,
            });
        }

        if !feedback.strengths.is_empty() {
            let strengths = feedback.top_strengths().join(" and ");
            batch.push(ActionableRecommendation {
                priority: 6,
                action: format!("Lead marketing with what buyers already praise: {strengths}"),
                reasoning: vec![
                    "Customer-validated strengths outperform invented claims".to_owned(),
                ],
                expected_impact: "Sharper messaging and better ad click-through".to_owned(),
                confidence: ConfidenceLevel::High,
                category: RecommendationCategory::Marketing,
                price_target: None,
                round_price: None,
            });
        }

        batch.push(ActionableRecommendation {
            priority: 7,
            action: "Differentiate on service: faster delivery and responsive support".to_owned(),
            reasoning: vec![
                "Service quality wins ties when prices are comparable".to_owned(),
            ],
            expected_impact: "Repeat purchases and review quality improve over time".to_owned(),
            confidence: ConfidenceLevel::Medium,
            category: RecommendationCategory::ValueAdd,
            price_target: None,
            round_price: None,
        });

        if is_round_price(metrics.merchant_price) {
            let suggested = psychological_price(metrics.merchant_price);
            batch.push(ActionableRecommendation {
                priority: 8,
                action: format!(
                    "Retag the round {} price as the charm price {}",
                    format_inr(metrics.merchant_price),
                    format_inr(suggested)
                ),
                reasoning: vec![
                    "Round price tags forgo the left-digit effect".to_owned(),
                ],
                expected_impact: "Perceived-price drop with no meaningful revenue change"
                    .to_owned(),
                confidence: ConfidenceLevel::High,
                category: RecommendationCategory::Pricing,
                price_target: None,
                round_price: Some(RoundPriceSuggestion {
                    current_price: metrics.merchant_price,
                    suggested_price: suggested,
                    savings_perception: format!(
                        "{} is read within the {} band rather than the next round number",
                        format_inr(suggested),
                        format_inr((suggested / 1000.0).floor() * 1000.0)
                    ),
                }),
            });
        }
    }
}

fn festival_rule(context: &FestivalContext) -> ActionableRecommendation {
    ActionableRecommendation {
        priority: 4,
        action: format!("Align the listing with the {}", context.festival_name),
        reasoning: vec![
            format!("{} is live in the promotional calendar", context.festival_name),
            context.festival_strategy.clone(),
        ],
        expected_impact: "Rides seasonal traffic the marketplace is already buying".to_owned(),
        confidence: ConfidenceLevel::High,
        category: RecommendationCategory::Festival,
        price_target: None,
        round_price: None,
    }
}

fn is_round_price(price: f64) -> bool {
    price > 0.0 && (price % 100.0 == 0.0)
}
