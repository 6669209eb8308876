//! Typed contract for the customer-feedback-analysis collaborator.
//!
//! The upstream analyst emits a loosely shaped JSON document. Every field
//! here is either required by construction or defaults to an explicit
//! empty value, so the recommendation rules can rely on the shape instead
//! of probing for missing keys.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    #[default]
    Mixed,
    Negative,
}

/// AI-summarized customer feedback for the product under analysis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerFeedbackSummary {
    pub overall_sentiment: Sentiment,
    pub rating: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub common_complaints: Vec<String>,
    pub target_audience: String,
    pub customer_needs: CustomerNeeds,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerNeeds {
    pub deal_breakers: Vec<String>,
    pub missing_features: Vec<String>,
    pub purchase_motivators: Vec<String>,
    pub price_sensitivity: String,
}

impl CustomerFeedbackSummary {
    /// Top two complaints, used by the listing-quality recommendation.
    pub fn top_complaints(&self) -> Vec<&str> {
        self.common_complaints.iter().take(2).map(String::as_str).collect()
    }

    /// Top two strengths, used by the marketing recommendation.
    pub fn top_strengths(&self) -> Vec<&str> {
        self.strengths.iter().take(2).map(String::as_str).collect()
    }
}
