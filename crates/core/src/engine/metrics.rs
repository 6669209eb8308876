//! Deterministic pricing metrics over the competitor price list.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Market position metrics for one merchant price against one competitor
/// price list. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingMetrics {
    pub min_market_price: f64,
    pub max_market_price: f64,
    /// Median of the competitor list only; the merchant is excluded.
    pub median_market_price: f64,
    pub average_market_price: f64,
    pub merchant_price: f64,
    /// `(max - min) / median * 100`, a market-volatility signal.
    pub price_spread_percent: f64,
    /// `merchant / median * 100`; 100 means exactly at median.
    pub price_index: f64,
    /// 1-based rank of the merchant among all prices sorted ascending.
    /// Ties resolve to the lowest index after a stable sort.
    pub competitive_rank: usize,
    /// Competitor count plus the merchant.
    pub total_retailers: usize,
    pub position_percentile: f64,
}

/// Compute `PricingMetrics` from competitor prices and the merchant price.
///
/// Median and average cover competitors only. Rank and percentile insert
/// the merchant into the pool first. Empty competitor lists and
/// non-positive merchant prices are rejected before any arithmetic runs,
/// so no NaN can escape.
pub fn calculate_pricing_metrics(
    competitor_prices: &[f64],
    merchant_price: f64,
) -> Result<PricingMetrics, DomainError> {
    if competitor_prices.is_empty() {
        return Err(DomainError::EmptyCompetitorList);
    }
    if !(merchant_price > 0.0) {
        return Err(DomainError::NonPositiveMerchantPrice(merchant_price));
    }

    let mut sorted = competitor_prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let median = median_of_sorted(&sorted);
    let average = sorted.iter().sum::<f64>() / sorted.len() as f64;

    if median <= 0.0 {
        return Err(DomainError::InvariantViolation(format!(
            "competitor median must be positive, got {median}"
        )));
    }

    let mut pool = competitor_prices.to_vec();
    pool.push(merchant_price);
    pool.sort_by(f64::total_cmp);

    // First position holding the merchant value; equal competitor prices
    // sitting earlier win the tie.
    let rank = pool
        .iter()
        .position(|price| *price == merchant_price)
        .map(|index| index + 1)
        .unwrap_or(pool.len());

    let total_retailers = pool.len();

    Ok(PricingMetrics {
        min_market_price: min,
        max_market_price: max,
        median_market_price: median,
        average_market_price: average,
        merchant_price,
        price_spread_percent: (max - min) / median * 100.0,
        price_index: merchant_price / median * 100.0,
        competitive_rank: rank,
        total_retailers,
        position_percentile: rank as f64 / total_retailers as f64 * 100.0,
    })
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
