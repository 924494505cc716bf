use crate::infra::{parse_date, seed_demo_catalog, InMemoryProcurementStore, DEMO_PROJECT};
use chrono::{Local, NaiveDate};
use clap::Args;
use procura::error::AppError;
use procura::workflows::procurement::{ItemOutcome, ProcurementService, ScenarioResult};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CompareArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Also print vendor recommendations for this strategy
    #[arg(long)]
    pub(crate) strategy: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Include the per-item assignment for every scenario
    #[arg(long)]
    pub(crate) show_assignments: bool,
}

fn demo_service() -> ProcurementService<InMemoryProcurementStore> {
    let store = Arc::new(InMemoryProcurementStore::default());
    seed_demo_catalog(&store);
    ProcurementService::new(store)
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = demo_service();

    let scenarios = service.compare_scenarios(DEMO_PROJECT, today)?;
    println!("Scenario comparison (as of {today})");
    render_scenarios(&scenarios, false);

    if let Some(strategy) = args.strategy {
        let recommendations = service.vendor_recommendations(DEMO_PROJECT, &strategy, today)?;
        println!("\nVendor recommendations ({strategy})");
        for recommendation in &recommendations {
            println!(
                "  {}. {} | {} item(s) | {:.2} USD | {}",
                recommendation.priority,
                recommendation.vendor_name,
                recommendation.item_count,
                recommendation.total_cost,
                recommendation.rationale
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = demo_service();

    println!("Procurement recommendation demo");

    let comparison = service.procurement_comparison(DEMO_PROJECT, today)?;
    println!(
        "Project: {} | budget {:.2} USD | status {}",
        comparison.project.name, comparison.project.budget, comparison.project.status_label
    );
    if let Some(deadline) = comparison.project.deadline {
        println!("Deadline: {deadline}");
    }
    println!(
        "Current strategy: {} (partial fulfillment {})",
        comparison.strategy.strategy_label,
        if comparison.strategy.allow_partial_fulfill {
            "allowed"
        } else {
            "disallowed"
        }
    );

    println!("\nScenario comparison (as of {today})");
    render_scenarios(&comparison.scenarios, args.show_assignments);

    println!("\nVendor recommendations ({})", comparison.strategy.strategy_label);
    for recommendation in &comparison.recommendations {
        println!(
            "  {}. {} | {} item(s) | {:.2} USD | {}",
            recommendation.priority,
            recommendation.vendor_name,
            recommendation.item_count,
            recommendation.total_cost,
            recommendation.rationale
        );
    }

    println!("\nRisk findings");
    if comparison.risks.is_empty() {
        println!("  none");
    }
    for finding in &comparison.risks {
        println!(
            "  - [{}] {}: {}",
            finding.severity.label(),
            finding.kind.label(),
            finding.message
        );
    }

    println!("\nSavings vs first-quote baseline");
    println!(
        "  baseline {:.2} USD | optimized {:.2} USD | savings {:.2} USD ({:.1}%)",
        comparison.savings.baseline_total,
        comparison.savings.best_total,
        comparison.savings.savings,
        comparison.savings.savings_percent
    );

    let item_total = comparison
        .scenarios
        .first()
        .map(|scenario| scenario.assignments.len())
        .unwrap_or(0);
    println!("\nVendor consolidation options");
    for vendor in &comparison.consolidation.vendors {
        println!(
            "  {} | covers {}/{} item(s) | {:.2} USD if used alone | avg price rank {:.1}{}",
            vendor.vendor_name,
            vendor.specification_count,
            item_total,
            vendor.total_cost_if_used,
            vendor.average_price_rank,
            match vendor.rating {
                Some(rating) => format!(" | rated {rating:.1}/5.0"),
                None => " | unrated".to_string(),
            }
        );
    }

    let freshness = &comparison.quote_freshness;
    println!(
        "\nQuote freshness: {} total ({} fresh, {} stale, {} expired), average age {} day(s)",
        freshness.total_quotes,
        freshness.fresh_quotes,
        freshness.stale_quotes,
        freshness.expired_quotes,
        freshness.average_age_days
    );

    Ok(())
}

fn render_scenarios(scenarios: &[ScenarioResult], show_assignments: bool) {
    for scenario in scenarios {
        println!(
            "  {:<16} | total {:>10.2} USD | {} vendor(s) | savings vs budget {:>10.2} | {}",
            scenario.strategy.label(),
            scenario.total_cost,
            scenario.vendor_count,
            scenario.savings_vs_budget,
            scenario.status.label()
        );

        if !show_assignments {
            continue;
        }
        for assignment in &scenario.assignments {
            match &assignment.outcome {
                ItemOutcome::Assigned(assigned) => {
                    let price = assigned
                        .unit_price
                        .map(|price| format!("{price:.2} USD"))
                        .unwrap_or_else(|| "unpriceable".to_string());
                    let mut line = format!(
                        "      {} x{} -> {} ({}) at {}",
                        assignment.specification_name,
                        assignment.quantity,
                        assigned.vendor_name,
                        assigned.product_name,
                        price
                    );
                    if assigned.degraded {
                        let reasons: Vec<&str> = assigned
                            .degraded_reasons
                            .iter()
                            .map(|reason| reason.label())
                            .collect();
                        line.push_str(&format!(" [degraded: {}]", reasons.join(", ")));
                    }
                    println!("{line}");
                }
                ItemOutcome::Unfulfilled { reason } => {
                    println!(
                        "      {} x{} -> unfulfilled ({reason})",
                        assignment.specification_name, assignment.quantity
                    );
                }
                ItemOutcome::NoQuotes => {
                    println!(
                        "      {} x{} -> no quotes on file",
                        assignment.specification_name, assignment.quantity
                    );
                }
            }
        }
    }
}
