//! Natural-language enhancement of the raw recommendation batch.
//!
//! The model receives the serialized batch and must return a same-length
//! JSON array of reworded `action`/`reasoning`/`expectedImpact` fields.
//! Priorities, categories, confidences, and price targets are copied from
//! the raw batch, never from the reply. Any transport or parse failure
//! falls back to the raw batch wholesale; there is no partial merge.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::warn;

use pricelens_core::ActionableRecommendation;

use crate::llm::LlmClient;

/// What the caller gets back: either reworded recommendations or the
/// untouched raw batch. The branch is explicit so callers log it rather
/// than discovering it through exception flow.
#[derive(Clone, Debug, PartialEq)]
pub enum EnhancementOutcome {
    Enhanced(Vec<ActionableRecommendation>),
    Fallback(Vec<ActionableRecommendation>),
}

impl EnhancementOutcome {
    pub fn is_enhanced(&self) -> bool {
        matches!(self, Self::Enhanced(_))
    }

    pub fn into_inner(self) -> Vec<ActionableRecommendation> {
        match self {
            Self::Enhanced(batch) | Self::Fallback(batch) => batch,
        }
    }
}

/// Wording fields the model is allowed to rewrite.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Rewording {
    action: String,
    reasoning: Vec<String>,
    expected_impact: String,
}

pub struct RecommendationEnhancer {
    client: Arc<dyn LlmClient>,
    max_retries: u32,
    retry_delay: Duration,
}

impl RecommendationEnhancer {
    pub fn new(client: Arc<dyn LlmClient>, max_retries: u32, retry_delay: Duration) -> Self {
        Self { client, max_retries, retry_delay }
    }

    /// Ask the model to polish the batch wording. Returns `Fallback` with
    /// the input untouched after the last retry fails.
    pub async fn enhance(&self, raw: Vec<ActionableRecommendation>) -> EnhancementOutcome {
        if raw.is_empty() {
            return EnhancementOutcome::Fallback(raw);
        }

        let prompt = match build_prompt(&raw) {
            Ok(prompt) => prompt,
            Err(error) => {
                warn!(error = %error, "could not serialize recommendation batch; using raw wording");
                return EnhancementOutcome::Fallback(raw);
            }
        };

        let attempts = self.max_retries + 1;
        for attempt in 1..=attempts {
            match self.client.complete(&prompt).await {
                Ok(reply) => match parse_rewordings(&reply, raw.len()) {
                    Ok(rewordings) => {
                        return EnhancementOutcome::Enhanced(merge(raw, rewordings));
                    }
                    Err(error) => {
                        warn!(attempt, error = %error, "enhancement reply failed validation");
                    }
                },
                Err(error) => {
                    warn!(attempt, error = %error, "enhancement call failed");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        warn!("enhancement exhausted retries; falling back to raw recommendations");
        EnhancementOutcome::Fallback(raw)
    }
}

fn build_prompt(raw: &[ActionableRecommendation]) -> Result<String> {
    let payload = serde_json::to_string_pretty(raw)?;
    Ok(format!(
        "Rewrite the wording of these pricing recommendations for a retail merchant. \
         Return ONLY a JSON array with one object per input item, in the same order, \
         each with keys \"action\", \"reasoning\" (array of strings), and \
         \"expectedImpact\". Keep every number and price range exactly as given. \
         Do not add, drop, or reorder items.\n\n{payload}"
    ))
}

/// Extract and validate the reworded array from a model reply. The reply
/// may wrap the JSON in code fences or prose; only the outermost array is
/// considered.
fn parse_rewordings(reply: &str, expected_len: usize) -> Result<Vec<Rewording>> {
    let start = reply.find('[').ok_or_else(|| anyhow!("reply contains no JSON array"))?;
    let end = reply.rfind(']').ok_or_else(|| anyhow!("reply contains no closing bracket"))?;
    if end <= start {
        return Err(anyhow!("reply brackets are out of order"));
    }

    let rewordings: Vec<Rewording> = serde_json::from_str(&reply[start..=end])?;

    if rewordings.len() != expected_len {
        return Err(anyhow!(
            "reply has {} items, expected {expected_len}",
            rewordings.len()
        ));
    }
    for (index, rewording) in rewordings.iter().enumerate() {
        if rewording.action.trim().is_empty()
            || rewording.expected_impact.trim().is_empty()
            || rewording.reasoning.iter().all(|reason| reason.trim().is_empty())
        {
            return Err(anyhow!("reply item {index} has empty wording fields"));
        }
    }

    Ok(rewordings)
}

fn merge(
    raw: Vec<ActionableRecommendation>,
    rewordings: Vec<Rewording>,
) -> Vec<ActionableRecommendation> {
    raw.into_iter()
        .zip(rewordings)
        .map(|(mut recommendation, rewording)| {
            recommendation.action = rewording.action;
            recommendation.reasoning = rewording.reasoning;
            recommendation.expected_impact = rewording.expected_impact;
            recommendation
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pricelens_core::{ConfidenceLevel, RecommendationCategory};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        replies: Vec<Result<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self { replies, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(call) {
                Some(Ok(reply)) => Ok(reply.clone()),
                Some(Err(error)) => Err(anyhow!(error.to_string())),
                None => Err(anyhow!("no scripted reply left")),
            }
        }
    }

    fn raw_batch() -> Vec<ActionableRecommendation> {
        vec![ActionableRecommendation {
            priority: 1,
            action: "Hold current price and focus spend on conversion".to_owned(),
            reasoning: vec!["price index inside the aligned band".to_owned()],
            expected_impact: "stable margin".to_owned(),
            confidence: ConfidenceLevel::Medium,
            category: RecommendationCategory::Pricing,
            price_target: None,
            round_price: None,
        }]
    }

    fn enhancer(client: Arc<dyn LlmClient>) -> RecommendationEnhancer {
        RecommendationEnhancer::new(client, 2, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn valid_reply_rewrites_wording_only() {
        let reply = r#"```json
[{"action":"Keep your price steady and invest in conversion",
  "reasoning":["You sit right at the market median"],
  "expectedImpact":"Margin stays protected"}]
```"#;
        let client = ScriptedClient::new(vec![Ok(reply.to_owned())]);

        let outcome = enhancer(client).enhance(raw_batch()).await;
        assert!(outcome.is_enhanced());

        let batch = outcome.into_inner();
        assert_eq!(batch[0].action, "Keep your price steady and invest in conversion");
        assert_eq!(batch[0].priority, 1);
        assert_eq!(batch[0].category, RecommendationCategory::Pricing);
        assert_eq!(batch[0].confidence, ConfidenceLevel::Medium);
    }

    #[tokio::test]
    async fn wrong_item_count_falls_back_without_partial_merge() {
        let reply = r#"[{"action":"a","reasoning":["r"],"expectedImpact":"i"},
                        {"action":"b","reasoning":["r"],"expectedImpact":"i"}]"#;
        let client =
            ScriptedClient::new(vec![Ok(reply.to_owned()), Ok(reply.to_owned()), Ok(reply.to_owned())]);

        let raw = raw_batch();
        let outcome = enhancer(client).enhance(raw.clone()).await;
        assert_eq!(outcome, EnhancementOutcome::Fallback(raw));
    }

    #[tokio::test]
    async fn transport_error_retries_then_falls_back() {
        let client = ScriptedClient::new(vec![
            Err(anyhow!("timeout")),
            Err(anyhow!("timeout")),
            Err(anyhow!("timeout")),
        ]);

        let raw = raw_batch();
        let outcome = enhancer(client.clone()).enhance(raw.clone()).await;
        assert_eq!(outcome, EnhancementOutcome::Fallback(raw));
        assert_eq!(client.calls.load(Ordering::SeqCst), 3, "initial call plus two retries");
    }

    #[tokio::test]
    async fn retry_succeeds_after_a_malformed_first_reply() {
        let good = r#"[{"action":"Better action","reasoning":["why"],"expectedImpact":"what"}]"#;
        let client =
            ScriptedClient::new(vec![Ok("not json at all".to_owned()), Ok(good.to_owned())]);

        let outcome = enhancer(client).enhance(raw_batch()).await;
        assert!(outcome.is_enhanced());
    }

    #[tokio::test]
    async fn empty_batch_short_circuits_to_fallback() {
        let client = ScriptedClient::new(vec![]);
        let outcome = enhancer(client.clone()).enhance(Vec::new()).await;
        assert_eq!(outcome, EnhancementOutcome::Fallback(Vec::new()));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn parser_rejects_empty_wording() {
        let reply = r#"[{"action":"  ","reasoning":["r"],"expectedImpact":"i"}]"#;
        assert!(parse_rewordings(reply, 1).is_err());
    }
}
