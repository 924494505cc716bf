mod strategies;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::comparison::{ComparisonMatrix, DegradedReason, QuotePick};
use super::domain::{
    BomItem, BomItemId, Project, ProcurementStrategy, ProductId, QuoteId, SpecificationId,
    StrategyKind, VendorId, NEUTRAL_VENDOR_RATING,
};

/// One bill-of-materials line together with its prepared comparison matrix.
#[derive(Debug, Clone)]
pub struct ItemQuotes {
    pub item: BomItem,
    pub matrix: ComparisonMatrix,
    /// Converted price of the first convertible quote in store order, the
    /// naive baseline savings are measured against.
    pub baseline_unit_price: Option<f64>,
}

/// Everything a scenario evaluation reads: the project, its strategy record,
/// per-item matrices, and vendor ratings, all loaded up front so evaluation
/// is a pure pass with no I/O.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project: Project,
    pub strategy: ProcurementStrategy,
    pub items: Vec<ItemQuotes>,
    pub ratings: BTreeMap<VendorId, f64>,
    pub today: NaiveDate,
}

impl ProjectContext {
    /// Overall vendor rating, neutral when the vendor has never been rated.
    pub fn vendor_rating(&self, vendor: VendorId) -> f64 {
        self.ratings
            .get(&vendor)
            .copied()
            .unwrap_or(NEUTRAL_VENDOR_RATING)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Scored,
    Infeasible,
}

impl ScenarioStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ScenarioStatus::Scored => "scored",
            ScenarioStatus::Infeasible => "infeasible",
        }
    }
}

/// The quote a scenario routed one item to. Prices are in the reference
/// currency and absent when the pick could not be normalized; unpriceable
/// picks never contribute to scenario totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedQuote {
    pub quote_id: QuoteId,
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_cost: Option<f64>,
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_reasons: Vec<DegradedReason>,
}

/// How a scenario resolved one bill-of-materials line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemOutcome {
    Assigned(AssignedQuote),
    Unfulfilled { reason: String },
    NoQuotes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAssignment {
    pub item_id: BomItemId,
    pub specification_id: SpecificationId,
    pub specification_name: String,
    pub quantity: u32,
    pub outcome: ItemOutcome,
}

impl ItemAssignment {
    pub fn assigned(&self) -> Option<&AssignedQuote> {
        match &self.outcome {
            ItemOutcome::Assigned(assigned) => Some(assigned),
            _ => None,
        }
    }
}

/// Complete vendor assignment for a bill of materials under one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub strategy: StrategyKind,
    pub status: ScenarioStatus,
    pub total_cost: f64,
    pub vendor_count: usize,
    /// Budget minus total cost; zero when the project budget is unset.
    pub savings_vs_budget: f64,
    pub assignments: Vec<ItemAssignment>,
}

impl ScenarioResult {
    pub fn fulfilled_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|assignment| assignment.assigned().is_some())
            .count()
    }
}

/// Evaluates the closed set of selection strategies over a prepared project
/// context. Stateless; every tie-break is fixed so repeated evaluation of
/// unchanged data yields identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioEvaluator;

impl ScenarioEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, context: &ProjectContext, kind: StrategyKind) -> ScenarioResult {
        match kind {
            StrategyKind::LowestCost => {
                score(context, kind, strategies::lowest_cost(context))
            }
            StrategyKind::FewestVendors => {
                score(context, kind, strategies::greedy_cover(context, None, None))
            }
            StrategyKind::Balanced => strategies::balanced(context),
            StrategyKind::QualityFocused => {
                score(context, kind, strategies::quality_focused(context))
            }
        }
    }

    /// All four scenarios in their fixed presentation order.
    pub fn evaluate_all(&self, context: &ProjectContext) -> Vec<ScenarioResult> {
        StrategyKind::ordered()
            .into_iter()
            .map(|kind| self.evaluate(context, kind))
            .collect()
    }
}

pub(crate) fn assignment_from_pick(item: &BomItem, pick: &QuotePick<'_>) -> ItemAssignment {
    let comparison = pick.comparison;
    let unit_price = comparison.converted_price;
    let extended_cost = unit_price.map(|price| price * f64::from(item.quantity));

    ItemAssignment {
        item_id: item.id,
        specification_id: item.specification.id,
        specification_name: item.specification.name.clone(),
        quantity: item.quantity,
        outcome: ItemOutcome::Assigned(AssignedQuote {
            quote_id: comparison.quote.id,
            vendor_id: comparison.quote.vendor.id,
            vendor_name: comparison.quote.vendor.name.clone(),
            product_id: comparison.quote.product.id,
            product_name: comparison.quote.product.name.clone(),
            unit_price,
            extended_cost,
            degraded: pick.degraded,
            degraded_reasons: pick.reasons.clone(),
        }),
    }
}

pub(crate) fn score(
    context: &ProjectContext,
    kind: StrategyKind,
    assignments: Vec<ItemAssignment>,
) -> ScenarioResult {
    let total_cost: f64 = assignments
        .iter()
        .filter_map(|assignment| assignment.assigned().and_then(|quote| quote.extended_cost))
        .sum();

    let vendors: BTreeSet<VendorId> = assignments
        .iter()
        .filter_map(|assignment| assignment.assigned().map(|quote| quote.vendor_id))
        .collect();

    let budget = context.project.budget;
    let savings_vs_budget = if budget > 0.0 { budget - total_cost } else { 0.0 };

    let has_quoteless_item = assignments
        .iter()
        .any(|assignment| matches!(assignment.outcome, ItemOutcome::NoQuotes));
    let status = if has_quoteless_item && !context.strategy.allow_partial_fulfill {
        ScenarioStatus::Infeasible
    } else {
        ScenarioStatus::Scored
    };

    ScenarioResult {
        strategy: kind,
        status,
        total_cost,
        vendor_count: vendors.len(),
        savings_vs_budget,
        assignments,
    }
}
