//! Presentation-agnostic reporting over evaluated scenarios: vendor
//! recommendations, risk findings, savings, consolidation, and freshness.

mod risk;
pub mod views;

pub use risk::assess_risks;
pub use views::{
    ConsolidationReport, ProcurementComparison, ProjectSummaryView, QuoteFreshness, RiskFinding,
    RiskKind, SavingsLine, SavingsReport, Severity, StrategyView, VendorConsolidation,
    VendorRecommendation,
};

use std::collections::{BTreeMap, BTreeSet};

use super::domain::{BomItemId, QuoteId, StrategyKind, VendorId};
use super::evaluation::{ProjectContext, ScenarioResult};

/// Groups a scenario's assignment by vendor and emits one recommendation per
/// vendor, ordered by spend.
pub fn vendor_recommendations(
    context: &ProjectContext,
    scenario: &ScenarioResult,
) -> Vec<VendorRecommendation> {
    let mut by_vendor: BTreeMap<VendorId, (String, Vec<BomItemId>, f64)> = BTreeMap::new();
    for assignment in &scenario.assignments {
        let Some(assigned) = assignment.assigned() else {
            continue;
        };
        let entry = by_vendor
            .entry(assigned.vendor_id)
            .or_insert_with(|| (assigned.vendor_name.clone(), Vec::new(), 0.0));
        entry.1.push(assignment.item_id);
        entry.2 += assigned.extended_cost.unwrap_or(0.0);
    }

    let mut recommendations: Vec<VendorRecommendation> = by_vendor
        .into_iter()
        .map(|(vendor_id, (vendor_name, bom_items, total_cost))| {
            let item_count = bom_items.len();
            let rationale = match scenario.strategy {
                StrategyKind::LowestCost => {
                    format!("lowest total cost across {item_count} item(s)")
                }
                StrategyKind::FewestVendors => {
                    format!("consolidates {item_count} item(s) to reduce vendor count")
                }
                StrategyKind::Balanced => {
                    format!("balances cost and vendor count across {item_count} item(s)")
                }
                StrategyKind::QualityFocused => format!(
                    "highly rated vendor ({:.1}/5.0) across {item_count} item(s)",
                    context.vendor_rating(vendor_id)
                ),
            };
            VendorRecommendation {
                vendor_id,
                vendor_name,
                bom_items,
                total_cost,
                item_count,
                rationale,
                priority: 0,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.total_cost
            .total_cmp(&a.total_cost)
            .then_with(|| a.vendor_id.cmp(&b.vendor_id))
    });
    for (index, recommendation) in recommendations.iter_mut().enumerate() {
        recommendation.priority = index + 1;
    }

    recommendations
}

/// Optimized total versus the naive first-quote-per-item baseline. Items
/// with no priceable quote contribute to neither side.
pub fn project_savings(context: &ProjectContext, lowest: &ScenarioResult) -> SavingsReport {
    let mut baseline_total = 0.0;
    let mut lines = Vec::new();

    for entry in &context.items {
        if entry.matrix.quotes.is_empty() {
            continue;
        }

        let quantity = entry.item.quantity;
        let baseline_unit_price = entry.baseline_unit_price;
        let best_unit_price = lowest
            .assignments
            .iter()
            .find(|assignment| assignment.item_id == entry.item.id)
            .and_then(|assignment| assignment.assigned())
            .and_then(|assigned| assigned.unit_price);

        if let Some(baseline) = baseline_unit_price {
            baseline_total += baseline * f64::from(quantity);
        }

        let savings = match (baseline_unit_price, best_unit_price) {
            (Some(baseline), Some(best)) => (baseline - best) * f64::from(quantity),
            _ => 0.0,
        };

        lines.push(SavingsLine {
            item_id: entry.item.id,
            specification_name: entry.item.specification.name.clone(),
            quantity,
            baseline_unit_price,
            best_unit_price,
            savings,
        });
    }

    let best_total = lowest.total_cost;
    let savings = baseline_total - best_total;
    let savings_percent = if baseline_total > 0.0 {
        savings / baseline_total * 100.0
    } else {
        0.0
    };

    SavingsReport {
        best_total,
        baseline_total,
        savings,
        savings_percent,
        lines,
    }
}

/// For every vendor with at least one current, convertible quote, what
/// routing everything it can supply through it would cost.
pub fn vendor_consolidation(context: &ProjectContext) -> ConsolidationReport {
    struct Coverage {
        name: String,
        // item index to the vendor's best converted price there
        items: BTreeMap<usize, f64>,
    }

    let mut per_vendor: BTreeMap<VendorId, Coverage> = BTreeMap::new();
    for (index, entry) in context.items.iter().enumerate() {
        for comparison in &entry.matrix.quotes {
            if comparison.expired {
                continue;
            }
            let Some(price) = comparison.converted_price else {
                continue;
            };
            let coverage = per_vendor
                .entry(comparison.quote.vendor.id)
                .or_insert_with(|| Coverage {
                    name: comparison.quote.vendor.name.clone(),
                    items: BTreeMap::new(),
                });
            // Matrix order is ascending price, so the first hit is the best.
            coverage.items.entry(index).or_insert(price);
        }
    }

    let item_count = context.items.len();
    let mut vendors: Vec<VendorConsolidation> = per_vendor
        .iter()
        .map(|(vendor_id, coverage)| {
            let bom_items: Vec<BomItemId> = coverage
                .items
                .keys()
                .map(|index| context.items[*index].item.id)
                .collect();
            let total_quantity: u64 = coverage
                .items
                .keys()
                .map(|index| u64::from(context.items[*index].item.quantity))
                .sum();
            let total_cost_if_used: f64 = coverage
                .items
                .iter()
                .map(|(index, price)| price * f64::from(context.items[*index].item.quantity))
                .sum();

            let mut rank_sum = 0.0;
            for (index, price) in &coverage.items {
                let mut prices: Vec<f64> = per_vendor
                    .values()
                    .filter_map(|other| other.items.get(index).copied())
                    .collect();
                prices.sort_by(f64::total_cmp);
                let rank = prices
                    .iter()
                    .position(|candidate| candidate >= price)
                    .unwrap_or(0)
                    + 1;
                rank_sum += rank as f64;
            }
            let average_price_rank = if coverage.items.is_empty() {
                0.0
            } else {
                rank_sum / coverage.items.len() as f64
            };

            VendorConsolidation {
                vendor_id: *vendor_id,
                vendor_name: coverage.name.clone(),
                specification_count: bom_items.len(),
                bom_items,
                total_quantity,
                total_cost_if_used,
                average_price_rank,
                rating: context.ratings.get(vendor_id).copied(),
                broad_coverage: coverage.items.len() * 2 > item_count,
            }
        })
        .collect();

    vendors.sort_by(|a, b| {
        b.specification_count
            .cmp(&a.specification_count)
            .then_with(|| a.total_cost_if_used.total_cmp(&b.total_cost_if_used))
            .then_with(|| a.vendor_id.cmp(&b.vendor_id))
    });

    ConsolidationReport { vendors }
}

/// Age profile over the distinct quotes seen by the bill of materials.
pub fn quote_freshness(context: &ProjectContext) -> QuoteFreshness {
    let mut stats = QuoteFreshness::default();
    let mut seen: BTreeSet<QuoteId> = BTreeSet::new();
    let mut age_sum = 0i64;

    for entry in &context.items {
        for comparison in &entry.matrix.quotes {
            if !seen.insert(comparison.quote.id) {
                continue;
            }
            stats.total_quotes += 1;
            age_sum += comparison.quote.age_days(context.today);

            if comparison.expired {
                stats.expired_quotes += 1;
            } else if comparison.quote.is_stale(context.today) {
                stats.stale_quotes += 1;
            } else {
                stats.fresh_quotes += 1;
            }
        }
    }

    if stats.total_quotes > 0 {
        stats.average_age_days = age_sum / stats.total_quotes as i64;
    }

    stats
}
