use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use super::super::domain::{BomItemId, QuoteId, VendorId};
use super::super::evaluation::{ProjectContext, ScenarioResult};
use super::views::{RiskFinding, RiskKind, Severity};

/// Selected quotes expiring within this many days of the reference date are
/// flagged.
const EXPIRY_WARNING_WINDOW_DAYS: i64 = 14;

/// Share of total cost above which a single vendor counts as a
/// concentration risk.
const CONCENTRATION_SHARE_LIMIT: f64 = 0.6;

/// Scans a scenario's assignment and the underlying quote universe for risk
/// conditions. Findings are additive; every triggered condition is reported.
pub fn assess_risks(context: &ProjectContext, scenario: &ScenarioResult) -> Vec<RiskFinding> {
    let mut findings = Vec::new();

    let reference = context.project.deadline.unwrap_or(context.today);
    let horizon = reference + Duration::days(EXPIRY_WARNING_WINDOW_DAYS);

    for assignment in &scenario.assignments {
        let Some(assigned) = assignment.assigned() else {
            continue;
        };
        let Some(valid_until) =
            selected_quote_expiry(context, assignment.item_id, assigned.quote_id)
        else {
            continue;
        };
        if valid_until <= horizon {
            let severity = if valid_until < context.today {
                Severity::High
            } else {
                Severity::Medium
            };
            findings.push(RiskFinding {
                kind: RiskKind::ExpiringQuotes,
                severity,
                message: format!(
                    "selected quote from {} for {} expires on {}",
                    assigned.vendor_name, assignment.specification_name, valid_until
                ),
                affected_items: vec![assignment.item_id],
                vendor_id: Some(assigned.vendor_id),
            });
        }
    }

    for entry in &context.items {
        if entry.matrix.quotes.is_empty() {
            findings.push(RiskFinding {
                kind: RiskKind::MissingQuotes,
                severity: Severity::High,
                message: format!(
                    "no quotes available for {}",
                    entry.item.specification.name
                ),
                affected_items: vec![entry.item.id],
                vendor_id: None,
            });
        } else if !entry
            .matrix
            .quotes
            .iter()
            .any(|comparison| comparison.compliance.overall_compliant)
        {
            findings.push(RiskFinding {
                kind: RiskKind::MissingQuotes,
                severity: Severity::Medium,
                message: format!(
                    "no compliant quotes for {}",
                    entry.item.specification.name
                ),
                affected_items: vec![entry.item.id],
                vendor_id: None,
            });
        }
    }

    if scenario.total_cost > 0.0 {
        let mut by_vendor: BTreeMap<VendorId, (String, f64, Vec<BomItemId>)> = BTreeMap::new();
        for assignment in &scenario.assignments {
            let Some(assigned) = assignment.assigned() else {
                continue;
            };
            let Some(cost) = assigned.extended_cost else {
                continue;
            };
            let entry = by_vendor
                .entry(assigned.vendor_id)
                .or_insert_with(|| (assigned.vendor_name.clone(), 0.0, Vec::new()));
            entry.1 += cost;
            entry.2.push(assignment.item_id);
        }

        for (vendor_id, (vendor_name, cost, items)) in by_vendor {
            let share = cost / scenario.total_cost;
            if share > CONCENTRATION_SHARE_LIMIT {
                findings.push(RiskFinding {
                    kind: RiskKind::VendorConcentration,
                    severity: Severity::Medium,
                    message: format!(
                        "{} carries {:.0}% of projected cost",
                        vendor_name,
                        share * 100.0
                    ),
                    affected_items: items,
                    vendor_id: Some(vendor_id),
                });
            }
        }
    }

    let budget = context.project.budget;
    if budget > 0.0 && scenario.total_cost > budget {
        findings.push(RiskFinding {
            kind: RiskKind::BudgetOverrun,
            severity: Severity::High,
            message: format!(
                "projected cost {:.2} exceeds budget {:.2} by {:.2}",
                scenario.total_cost,
                budget,
                scenario.total_cost - budget
            ),
            affected_items: Vec::new(),
            vendor_id: None,
        });
    }

    findings
}

fn selected_quote_expiry(
    context: &ProjectContext,
    item_id: BomItemId,
    quote_id: QuoteId,
) -> Option<NaiveDate> {
    context
        .items
        .iter()
        .find(|entry| entry.item.id == item_id)?
        .matrix
        .quotes
        .iter()
        .find(|comparison| comparison.quote.id == quote_id)?
        .quote
        .valid_until
}
