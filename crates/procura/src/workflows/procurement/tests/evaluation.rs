use std::collections::BTreeMap;

use super::common::{
    acme, date, dock_product, dock_spec, overseas, quote, standard_rates, standard_service,
    today, PROJECT,
};
use crate::workflows::procurement::comparison::{ComparisonBuilder, DegradedReason};
use crate::workflows::procurement::domain::{
    BomItem, BomItemId, ProcurementStrategy, Project, ProjectStatus, Quote, Specification,
    SpecificationId, StrategyKind, VendorId,
};
use crate::workflows::procurement::evaluation::{
    ItemOutcome, ItemQuotes, ProjectContext, ScenarioEvaluator, ScenarioStatus,
};
use crate::workflows::procurement::forex::{CurrencyNormalizer, RateTable};

fn build_context(
    lines: Vec<(BomItem, Vec<Quote>)>,
    strategy: ProcurementStrategy,
    budget: f64,
) -> ProjectContext {
    let builder = ComparisonBuilder::new();
    let rates = CurrencyNormalizer::new(RateTable::new(standard_rates()));

    let items = lines
        .into_iter()
        .map(|(item, quotes)| {
            let baseline_unit_price = quotes.iter().find_map(|quote| {
                rates
                    .convert(quote.price, &quote.currency, "USD", today())
                    .ok()
                    .map(|conversion| conversion.amount)
            });
            let matrix =
                builder.matrix(Some(&item.specification), quotes, &rates, today(), false);
            ItemQuotes {
                item,
                matrix,
                baseline_unit_price,
            }
        })
        .collect();

    ProjectContext {
        project: Project {
            id: PROJECT,
            name: "Lab Refresh".to_string(),
            budget,
            deadline: None,
            status: ProjectStatus::Active,
        },
        strategy,
        items,
        ratings: BTreeMap::new(),
        today: today(),
    }
}

fn bom_item(id: u64, specification: Specification, quantity: u32) -> BomItem {
    BomItem {
        id: BomItemId(id),
        specification,
        quantity,
        notes: String::new(),
    }
}

#[test]
fn lowest_cost_picks_cheapest_acceptable_quote_per_item() {
    let (service, _store) = standard_service();
    let scenarios = service
        .compare_scenarios(PROJECT, today())
        .expect("scenarios evaluate");

    let lowest = &scenarios[0];
    assert_eq!(lowest.strategy, StrategyKind::LowestCost);
    assert!((lowest.total_cost - 2248.0).abs() < 1e-9);
    assert_eq!(lowest.vendor_count, 2);

    // The cheap non-compliant laptop offer must not have been chosen.
    let laptop = lowest.assignments[0].assigned().expect("laptop assigned");
    assert_eq!(laptop.vendor_id, VendorId(1));
    assert!((laptop.unit_price.expect("priced") - 950.0).abs() < 1e-9);
    assert!(!laptop.degraded);
}

#[test]
fn lowest_cost_total_is_the_minimum_across_scenarios() {
    let (service, _store) = standard_service();
    let scenarios = service
        .compare_scenarios(PROJECT, today())
        .expect("scenarios evaluate");

    let lowest = scenarios[0].total_cost;
    for scenario in &scenarios {
        assert!(
            scenario.total_cost >= lowest - 1e-9,
            "{} undercuts lowest_cost",
            scenario.strategy.label()
        );
    }
}

#[test]
fn fewest_vendors_consolidates_to_a_single_vendor() {
    let (service, _store) = standard_service();
    let scenarios = service
        .compare_scenarios(PROJECT, today())
        .expect("scenarios evaluate");

    let lowest = &scenarios[0];
    let fewest = &scenarios[1];
    assert_eq!(fewest.strategy, StrategyKind::FewestVendors);
    assert_eq!(fewest.vendor_count, 1);
    assert!(fewest.vendor_count <= lowest.vendor_count);
    assert!((fewest.total_cost - 2260.0).abs() < 1e-9);

    for assignment in &fewest.assignments {
        let assigned = assignment.assigned().expect("covered");
        assert_eq!(assigned.vendor_id, VendorId(1));
    }
}

#[test]
fn balanced_trades_cost_for_fewer_vendors_when_cheap_enough() {
    let (service, _store) = standard_service();
    let scenarios = service
        .compare_scenarios(PROJECT, today())
        .expect("scenarios evaluate");

    let balanced = &scenarios[2];
    assert_eq!(balanced.strategy, StrategyKind::Balanced);
    // Consolidating to one vendor costs 0.5% more; the weighted objective
    // prefers it.
    assert_eq!(balanced.vendor_count, 1);
    assert!((balanced.total_cost - 2260.0).abs() < 1e-9);
}

#[test]
fn quality_focused_prefers_the_higher_rated_vendor() {
    let (service, _store) = standard_service();
    let scenarios = service
        .compare_scenarios(PROJECT, today())
        .expect("scenarios evaluate");

    let quality = &scenarios[3];
    assert_eq!(quality.strategy, StrategyKind::QualityFocused);

    // Acme (4.5) outranks Nordic (3.5) even where Nordic is cheaper.
    let monitor = quality.assignments[1].assigned().expect("monitor assigned");
    assert_eq!(monitor.vendor_id, VendorId(1));
    assert!((monitor.unit_price.expect("priced") - 210.0).abs() < 1e-9);
}

#[test]
fn rating_floor_without_qualifying_vendor_falls_back_degraded() {
    let (service, store) = standard_service();
    store
        .strategies
        .lock()
        .expect("store mutex poisoned")
        .insert(
            PROJECT,
            ProcurementStrategy {
                project_id: PROJECT,
                strategy: StrategyKind::QualityFocused,
                max_vendors: None,
                min_vendor_rating: Some(4.8),
                allow_partial_fulfill: true,
            },
        );

    let scenarios = service
        .compare_scenarios(PROJECT, today())
        .expect("scenarios evaluate");
    let quality = &scenarios[3];

    let laptop = quality.assignments[0].assigned().expect("laptop assigned");
    assert!(laptop.degraded);
    assert!(laptop
        .degraded_reasons
        .contains(&DegradedReason::NoVendorMeetsRating));
}

#[test]
fn item_without_quotes_is_surfaced_and_excluded_from_totals() {
    let empty_spec = Specification {
        id: SpecificationId(40),
        name: "Cable Kit".to_string(),
        description: String::new(),
        attributes: Vec::new(),
    };
    let context = build_context(
        vec![
            (
                bom_item(1, dock_spec(), 1),
                vec![quote(1, acme(), dock_product(), 150.0, "USD", date(2026, 5, 1), None)],
            ),
            (bom_item(2, empty_spec, 3), Vec::new()),
        ],
        ProcurementStrategy::default_for(PROJECT),
        0.0,
    );

    let scenario = ScenarioEvaluator::new().evaluate(&context, StrategyKind::LowestCost);

    assert_eq!(scenario.status, ScenarioStatus::Scored);
    assert!((scenario.total_cost - 150.0).abs() < 1e-9);
    assert!(matches!(
        scenario.assignments[1].outcome,
        ItemOutcome::NoQuotes
    ));
}

#[test]
fn disallowing_partial_fulfillment_marks_the_scenario_infeasible() {
    let empty_spec = Specification {
        id: SpecificationId(40),
        name: "Cable Kit".to_string(),
        description: String::new(),
        attributes: Vec::new(),
    };
    let mut strategy = ProcurementStrategy::default_for(PROJECT);
    strategy.allow_partial_fulfill = false;

    let context = build_context(vec![(bom_item(2, empty_spec, 3), Vec::new())], strategy, 0.0);

    let scenario = ScenarioEvaluator::new().evaluate(&context, StrategyKind::LowestCost);
    assert_eq!(scenario.status, ScenarioStatus::Infeasible);
}

#[test]
fn savings_vs_budget_is_zero_when_budget_unset() {
    let context = build_context(
        vec![(
            bom_item(1, dock_spec(), 1),
            vec![quote(1, acme(), dock_product(), 150.0, "USD", date(2026, 5, 1), None)],
        )],
        ProcurementStrategy::default_for(PROJECT),
        0.0,
    );

    let scenario = ScenarioEvaluator::new().evaluate(&context, StrategyKind::LowestCost);
    assert_eq!(scenario.savings_vs_budget, 0.0);
}

#[test]
fn unconvertible_pick_is_excluded_from_totals() {
    let overseas_quote = quote(
        1,
        overseas(),
        dock_product(),
        980.0,
        "CNY",
        date(2026, 5, 1),
        None,
    );
    let context = build_context(
        vec![(bom_item(1, dock_spec(), 2), vec![overseas_quote])],
        ProcurementStrategy::default_for(PROJECT),
        0.0,
    );

    let scenario = ScenarioEvaluator::new().evaluate(&context, StrategyKind::LowestCost);

    let assigned = scenario.assignments[0].assigned().expect("assigned");
    assert!(assigned.degraded);
    assert!(assigned.unit_price.is_none());
    assert_eq!(scenario.total_cost, 0.0);
}
