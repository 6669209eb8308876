use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use pricelens_agent::{
    FeedbackAnalyst, FixtureFeedbackAnalyst, FixturePriceDiscovery, HttpLlmClient, PriceDiscovery,
    RecommendationEnhancer,
};
use pricelens_core::config::{AppConfig, LoadOptions};
use pricelens_core::{
    active_festival, assemble_report, calculate_pricing_metrics, classify_zone,
    parse_competitor_prices, select_for_display, summary_line, DomainError, MarketAnalysisResult,
    PricingThresholds, RecommendationGenerator,
};

use crate::commands::CommandResult;

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub product: String,
    pub price: f64,
    pub offline: bool,
    pub json: bool,
}

pub fn run(args: &AnalyzeArgs) -> CommandResult {
    if !(args.price > 0.0) {
        return CommandResult::failure(
            "analyze",
            "invalid_input",
            format!("price must be positive, got {}", args.price),
            2,
        );
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("analyze", "config_validation", error.to_string(), 2)
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure("analyze", "runtime", error.to_string(), 3)
        }
    };

    match runtime.block_on(run_analysis(&config, args)) {
        Ok(result) => {
            let output = if args.json {
                serde_json::to_string_pretty(&result)
                    .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"))
            } else {
                render_human(&result)
            };
            CommandResult { exit_code: 0, output }
        }
        Err(error) => match error.downcast_ref::<DomainError>() {
            Some(domain) => {
                CommandResult::failure("analyze", "invalid_input", domain.to_string(), 2)
            }
            None => CommandResult::failure("analyze", "integration", error.to_string(), 3),
        },
    }
}

async fn run_analysis(config: &AppConfig, args: &AnalyzeArgs) -> Result<MarketAnalysisResult> {
    info!(product = %args.product, offline = args.offline, "starting market analysis");

    // Demo collaborators; real providers implement the same traits.
    let listings = FixturePriceDiscovery.discover(&args.product).await?;
    let feedback = FixtureFeedbackAnalyst.analyze(&args.product).await?;

    let prices = parse_competitor_prices(&listings)?;
    let metrics = calculate_pricing_metrics(&prices, args.price)?;
    let zone = classify_zone(&metrics, &PricingThresholds::default());
    let festival = active_festival(Utc::now().date_naive());

    let raw = RecommendationGenerator::new().generate(&metrics, &zone, &feedback, festival.as_ref());

    let (recommendations, enhancement_applied) = if args.offline {
        (raw, false)
    } else {
        match HttpLlmClient::from_config(&config.llm) {
            Ok(client) => {
                let enhancer = RecommendationEnhancer::new(
                    Arc::new(client),
                    config.llm.max_retries,
                    Duration::from_secs(config.llm.retry_delay_secs),
                );
                let outcome = enhancer.enhance(raw).await;
                let enhanced = outcome.is_enhanced();
                (outcome.into_inner(), enhanced)
            }
            Err(error) => {
                warn!(error = %error, "enhancement unavailable; using raw wording");
                (raw, false)
            }
        }
    };

    let result =
        assemble_report(&args.product, &metrics, zone, recommendations, enhancement_applied, festival);
    info!(
        analysis_id = %result.analysis_id,
        status = %result.pricing_status.status,
        "market analysis complete"
    );
    Ok(result)
}

fn render_human(result: &MarketAnalysisResult) -> String {
    let mut lines = Vec::new();
    let snapshot = &result.market_snapshot;
    let status = &result.pricing_status;

    lines.push(format!("Market analysis: {}", result.product_name));
    lines.push(format!(
        "Status: {} (price index {:.1}, {} vs median)",
        status.status, status.price_index, status.difference_from_median
    ));
    lines.push(format!(
        "Your price: {} | rank {} by price",
        snapshot.merchant_price, status.competitive_rank
    ));
    lines.push(format!(
        "Market: {} - {} across {} retailers (median {})",
        snapshot.lowest_price, snapshot.highest_price, snapshot.retailers_tracked,
        snapshot.median_price
    ));

    if let Some(festival) = &result.festival_context {
        lines.push(format!(
            "Festival window: {} - {}",
            festival.festival_name, festival.festival_strategy
        ));
    }

    let displayed = select_for_display(&result.recommendations);
    lines.push(String::new());
    lines.push(summary_line(&status.zone, displayed.first()));
    lines.push(String::new());
    lines.push("Recommendations:".to_owned());

    for (index, recommendation) in displayed.iter().enumerate() {
        lines.push(format!(
            "{}. [{} / {:?}] {}",
            index + 1,
            recommendation.category.label(),
            recommendation.confidence,
            recommendation.action
        ));
        for reason in &recommendation.reasoning {
            lines.push(format!("   - {reason}"));
        }
        lines.push(format!("   Expected impact: {}", recommendation.expected_impact));
    }

    if !result.enhancement_applied {
        lines.push(String::new());
        lines.push("(wording shown as generated by the rule engine)".to_owned());
    }

    lines.join("\n")
}
