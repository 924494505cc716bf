//! Per-strategy assignment routines. Every routine resolves each line of the
//! bill of materials to an outcome, leaving scoring to the caller.

use std::collections::{BTreeMap, BTreeSet};

use super::super::comparison::{DegradedReason, QuoteComparison, QuotePick};
use super::super::domain::{BomItem, StrategyKind, VendorId};
use super::{
    assignment_from_pick, score, ItemAssignment, ItemOutcome, ProjectContext, ScenarioResult,
};

/// A quote usable without relaxing any constraint.
fn fully_qualifying(entry: &QuoteComparison) -> bool {
    entry.is_convertible() && !entry.expired && entry.compliance.overall_compliant
}

fn no_quotes(item: &BomItem) -> ItemAssignment {
    ItemAssignment {
        item_id: item.id,
        specification_id: item.specification.id,
        specification_name: item.specification.name.clone(),
        quantity: item.quantity,
        outcome: ItemOutcome::NoQuotes,
    }
}

fn unfulfilled(item: &BomItem, reason: &str) -> ItemAssignment {
    ItemAssignment {
        item_id: item.id,
        specification_id: item.specification.id,
        specification_name: item.specification.name.clone(),
        quantity: item.quantity,
        outcome: ItemOutcome::Unfulfilled {
            reason: reason.to_string(),
        },
    }
}

/// Cheapest acceptable quote per item, independently; vendor count falls
/// where it may.
pub(crate) fn lowest_cost(context: &ProjectContext) -> Vec<ItemAssignment> {
    context
        .items
        .iter()
        .map(|entry| match entry.matrix.best_pick() {
            Some(pick) => assignment_from_pick(&entry.item, &pick),
            None => no_quotes(&entry.item),
        })
        .collect()
}

/// Per-item pick ordered by vendor quality first, price second. Vendors
/// below the configured rating floor are excluded up front; an item no
/// qualifying vendor can serve falls back to the unconstrained best pick,
/// flagged degraded.
pub(crate) fn quality_focused(context: &ProjectContext) -> Vec<ItemAssignment> {
    let threshold = context.strategy.min_vendor_rating;

    context
        .items
        .iter()
        .map(|entry| {
            if entry.matrix.quotes.is_empty() {
                return no_quotes(&entry.item);
            }

            let eligible: Vec<&QuoteComparison> = entry
                .matrix
                .quotes
                .iter()
                .filter(|comparison| fully_qualifying(comparison))
                .collect();

            let pool: Vec<&QuoteComparison> = match threshold {
                Some(min) => eligible
                    .iter()
                    .copied()
                    .filter(|comparison| {
                        context.vendor_rating(comparison.quote.vendor.id) >= min
                    })
                    .collect(),
                None => eligible.clone(),
            };

            let best = pool.into_iter().min_by(|a, b| {
                let rating_a = context.vendor_rating(a.quote.vendor.id);
                let rating_b = context.vendor_rating(b.quote.vendor.id);
                rating_b
                    .total_cmp(&rating_a)
                    .then_with(|| {
                        a.converted_price
                            .unwrap_or(f64::MAX)
                            .total_cmp(&b.converted_price.unwrap_or(f64::MAX))
                    })
                    .then_with(|| a.quote.quote_date.cmp(&b.quote.quote_date))
                    .then_with(|| a.quote.id.cmp(&b.quote.id))
            });

            if let Some(comparison) = best {
                let pick = QuotePick {
                    comparison,
                    degraded: false,
                    reasons: Vec::new(),
                };
                return assignment_from_pick(&entry.item, &pick);
            }

            match entry.matrix.best_pick() {
                Some(mut pick) => {
                    if threshold.is_some() && !eligible.is_empty() {
                        pick.degraded = true;
                        pick.reasons.push(DegradedReason::NoVendorMeetsRating);
                    }
                    assignment_from_pick(&entry.item, &pick)
                }
                None => no_quotes(&entry.item),
            }
        })
        .collect()
}

/// Greedy set cover over vendors holding at least one fully qualifying quote
/// for at least one item. Vendors are selected by (uncovered coverage
/// descending, coverage cost ascending, vendor id ascending) until every
/// coverable item is covered or no vendor adds coverage. A deterministic
/// approximation, not an optimal cover.
pub(crate) fn greedy_cover(
    context: &ProjectContext,
    max_vendors: Option<usize>,
    min_rating: Option<f64>,
) -> Vec<ItemAssignment> {
    // Per item, each vendor's cheapest qualifying quote (matrix order means
    // the first hit per vendor is its best).
    let mut per_item: Vec<BTreeMap<VendorId, &QuoteComparison>> =
        Vec::with_capacity(context.items.len());
    for entry in &context.items {
        let mut by_vendor: BTreeMap<VendorId, &QuoteComparison> = BTreeMap::new();
        for comparison in &entry.matrix.quotes {
            if !fully_qualifying(comparison) {
                continue;
            }
            if let Some(min) = min_rating {
                if context.vendor_rating(comparison.quote.vendor.id) < min {
                    continue;
                }
            }
            by_vendor.entry(comparison.quote.vendor.id).or_insert(comparison);
        }
        per_item.push(by_vendor);
    }

    let vendors: BTreeSet<VendorId> = per_item
        .iter()
        .flat_map(|by_vendor| by_vendor.keys().copied())
        .collect();
    let mut uncovered: BTreeSet<usize> = (0..per_item.len())
        .filter(|index| !per_item[*index].is_empty())
        .collect();
    let mut selected: BTreeMap<usize, &QuoteComparison> = BTreeMap::new();
    let mut vendors_used = 0usize;

    while !uncovered.is_empty() {
        if matches!(max_vendors, Some(limit) if vendors_used >= limit) {
            break;
        }

        let mut best: Option<(usize, f64, VendorId)> = None;
        for vendor in &vendors {
            let mut coverage = 0usize;
            let mut cost = 0.0;
            for index in &uncovered {
                if let Some(comparison) = per_item[*index].get(vendor) {
                    coverage += 1;
                    cost += comparison.converted_price.unwrap_or(0.0)
                        * f64::from(context.items[*index].item.quantity);
                }
            }
            if coverage == 0 {
                continue;
            }
            let better = match &best {
                None => true,
                Some((best_coverage, best_cost, _)) => {
                    coverage > *best_coverage
                        || (coverage == *best_coverage && cost < *best_cost)
                }
            };
            if better {
                best = Some((coverage, cost, *vendor));
            }
        }

        let Some((_, _, vendor)) = best else {
            break;
        };
        let newly_covered: Vec<usize> = uncovered
            .iter()
            .copied()
            .filter(|index| per_item[*index].contains_key(&vendor))
            .collect();
        for index in newly_covered {
            if let Some(comparison) = per_item[index].get(&vendor) {
                selected.insert(index, *comparison);
            }
            uncovered.remove(&index);
        }
        vendors_used += 1;
    }

    context
        .items
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if entry.matrix.quotes.is_empty() {
                return no_quotes(&entry.item);
            }
            if let Some(comparison) = selected.get(&index) {
                let pick = QuotePick {
                    comparison: *comparison,
                    degraded: false,
                    reasons: Vec::new(),
                };
                return assignment_from_pick(&entry.item, &pick);
            }
            if per_item[index].is_empty() {
                unfulfilled(
                    &entry.item,
                    "no vendor offers a compliant, current, convertible quote",
                )
            } else {
                unfulfilled(&entry.item, "left uncovered by the selected vendor set")
            }
        })
        .collect()
}

/// Scores the unconstrained candidates (plus a constrained cover when vendor
/// limits are configured) on a weighted cost/vendor-count objective
/// normalized against the lowest-cost scenario, and keeps the winner.
pub(crate) fn balanced(context: &ProjectContext) -> ScenarioResult {
    let lowest = score(context, StrategyKind::LowestCost, lowest_cost(context));
    let fewest = score(
        context,
        StrategyKind::FewestVendors,
        greedy_cover(context, None, None),
    );

    let cost_base = if lowest.total_cost > 0.0 {
        lowest.total_cost
    } else {
        1.0
    };
    let vendor_base = lowest.vendor_count.max(1) as f64;

    let mut candidates = vec![lowest, fewest];
    if context.strategy.max_vendors.is_some() || context.strategy.min_vendor_rating.is_some() {
        candidates.push(score(
            context,
            StrategyKind::FewestVendors,
            greedy_cover(
                context,
                context.strategy.max_vendors,
                context.strategy.min_vendor_rating,
            ),
        ));
    }

    // A candidate that leaves extra items unfulfilled has an artificially low
    // cost and is not comparable; only fullest coverage competes.
    let max_fulfilled = candidates
        .iter()
        .map(ScenarioResult::fulfilled_count)
        .max()
        .unwrap_or(0);
    candidates.retain(|candidate| candidate.fulfilled_count() == max_fulfilled);

    let mut best_index = 0;
    let mut best_score = f64::INFINITY;
    for (index, candidate) in candidates.iter().enumerate() {
        let combined = 0.6 * candidate.total_cost / cost_base
            + 0.4 * candidate.vendor_count as f64 / vendor_base;
        if combined < best_score {
            best_score = combined;
            best_index = index;
        }
    }

    let mut chosen = candidates.remove(best_index);
    chosen.strategy = StrategyKind::Balanced;
    chosen
}
