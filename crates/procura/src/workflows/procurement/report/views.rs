use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{BomItemId, ProjectId, ProjectStatus, StrategyKind, VendorId};
use super::super::evaluation::ScenarioResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Risk categories the assessment can raise; findings are additive, no kind
/// suppresses another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskKind {
    ExpiringQuotes,
    MissingQuotes,
    VendorConcentration,
    BudgetOverrun,
}

impl RiskKind {
    pub const fn label(self) -> &'static str {
        match self {
            RiskKind::ExpiringQuotes => "expiring-quotes",
            RiskKind::MissingQuotes => "missing-quotes",
            RiskKind::VendorConcentration => "vendor-concentration",
            RiskKind::BudgetOverrun => "budget-overrun",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskFinding {
    pub kind: RiskKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_items: Vec<BomItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<VendorId>,
}

/// One vendor's share of a scenario, with a short rationale for the grouping.
#[derive(Debug, Clone, Serialize)]
pub struct VendorRecommendation {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub bom_items: Vec<BomItemId>,
    pub total_cost: f64,
    pub item_count: usize,
    pub rationale: String,
    pub priority: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsLine {
    pub item_id: BomItemId,
    pub specification_name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_unit_price: Option<f64>,
    pub savings: f64,
}

/// Informational delta between the optimized total and a naive first-quote
/// baseline; never drives selection.
#[derive(Debug, Clone, Serialize)]
pub struct SavingsReport {
    pub best_total: f64,
    pub baseline_total: f64,
    pub savings: f64,
    pub savings_percent: f64,
    pub lines: Vec<SavingsLine>,
}

/// What routing the whole bill of materials through one vendor would look
/// like, for consolidation discussions.
#[derive(Debug, Clone, Serialize)]
pub struct VendorConsolidation {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub bom_items: Vec<BomItemId>,
    pub specification_count: usize,
    pub total_quantity: u64,
    pub total_cost_if_used: f64,
    pub average_price_rank: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub broad_coverage: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationReport {
    pub vendors: Vec<VendorConsolidation>,
}

/// Age profile of the distinct quotes competing for the bill of materials.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuoteFreshness {
    pub total_quotes: usize,
    pub fresh_quotes: usize,
    pub stale_quotes: usize,
    pub expired_quotes: usize,
    pub average_age_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummaryView {
    pub id: ProjectId,
    pub name: String,
    pub budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyView {
    pub strategy: StrategyKind,
    pub strategy_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_vendors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_vendor_rating: Option<f64>,
    pub allow_partial_fulfill: bool,
}

/// Superset payload backing the JSON comparison endpoint: every scenario in
/// fixed order plus the derived reports for the current strategy.
#[derive(Debug, Clone, Serialize)]
pub struct ProcurementComparison {
    pub project: ProjectSummaryView,
    pub strategy: StrategyView,
    pub scenarios: Vec<ScenarioResult>,
    pub recommendations: Vec<VendorRecommendation>,
    pub risks: Vec<RiskFinding>,
    pub savings: SavingsReport,
    pub consolidation: ConsolidationReport,
    pub quote_freshness: QuoteFreshness,
    pub analysis_date: NaiveDate,
}
