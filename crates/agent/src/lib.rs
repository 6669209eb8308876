//! Collaborator seam between the deterministic engine and the outside
//! world: the web-search price-discovery provider, the customer-feedback
//! analyst, and the language model that rewords recommendations.
//!
//! # Safety Principle
//!
//! The LLM is strictly a copywriter. It NEVER decides prices, zones, or
//! priorities. Those are deterministic decisions made by the engine in
//! `pricelens-core`; a failed or nonsensical model reply degrades wording,
//! never decisions.

pub mod collaborators;
pub mod enhance;
pub mod llm;

pub use collaborators::{FeedbackAnalyst, FixtureFeedbackAnalyst, FixturePriceDiscovery, PriceDiscovery};
pub use enhance::{EnhancementOutcome, RecommendationEnhancer};
pub use llm::{HttpLlmClient, LlmClient};
