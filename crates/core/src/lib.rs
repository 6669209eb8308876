pub mod config;
pub mod engine;
pub mod errors;
pub mod feedback;
pub mod market;

pub use engine::festival::{active_festival, FestivalContext, FestivalWindow, FESTIVAL_CALENDAR};
pub use engine::metrics::{calculate_pricing_metrics, PricingMetrics};
pub use engine::recommend::{
    ActionableRecommendation, PriceRange, RecommendationCategory, RecommendationGenerator,
    RoundPriceSuggestion,
};
pub use engine::report::{
    assemble_report, format_inr, format_signed_percent, select_for_display, summary_line,
    CoreMetrics, MarketAnalysisResult, MarketSnapshot, PricingStatus,
};
pub use engine::rounding::psychological_price;
pub use engine::thresholds::PricingThresholds;
pub use engine::zone::{classify_zone, ConfidenceLevel, PriceSeverity, PriceZone, PricingZone};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use feedback::{CustomerFeedbackSummary, CustomerNeeds, Sentiment};
pub use market::{parse_competitor_prices, parse_price_string, CompetitorListing};
