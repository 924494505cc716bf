use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use super::comparison::{ComparisonBuilder, ComparisonMatrix};
use super::domain::{
    ProcurementStrategy, ProductId, ProjectId, SpecificationId, StrategyKind, VendorId,
};
use super::evaluation::{ItemQuotes, ProjectContext, ScenarioEvaluator, ScenarioResult};
use super::forex::{CurrencyNormalizer, REFERENCE_CURRENCY};
use super::report::{
    self, ConsolidationReport, ProcurementComparison, ProjectSummaryView, RiskFinding,
    SavingsReport, StrategyView, VendorRecommendation,
};
use super::repository::{ProcurementStore, RepositoryError};

/// Facade composing the currency normalizer, compliance matcher, comparison
/// builder, scenario evaluator, and reporters over a store. Each call reads a
/// fresh snapshot; the only write path is `set_strategy`.
pub struct ProcurementService<S> {
    store: Arc<S>,
    builder: ComparisonBuilder,
    evaluator: ScenarioEvaluator,
}

impl<S> ProcurementService<S>
where
    S: ProcurementStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            builder: ComparisonBuilder::new(),
            evaluator: ScenarioEvaluator::new(),
        }
    }

    /// All four scenarios for a project, in fixed presentation order.
    pub fn compare_scenarios(
        &self,
        project: ProjectId,
        today: NaiveDate,
    ) -> Result<Vec<ScenarioResult>, ProcurementServiceError> {
        let context = self.context(project, today)?;
        Ok(self.evaluator.evaluate_all(&context))
    }

    /// Per-vendor recommendations for a named strategy. Unknown names are
    /// rejected before any computation.
    pub fn vendor_recommendations(
        &self,
        project: ProjectId,
        strategy_name: &str,
        today: NaiveDate,
    ) -> Result<Vec<VendorRecommendation>, ProcurementServiceError> {
        let kind = StrategyKind::parse(strategy_name)
            .ok_or_else(|| ProcurementServiceError::InvalidStrategy(strategy_name.to_string()))?;

        let context = self.context(project, today)?;
        let scenario = self.evaluator.evaluate(&context, kind);
        Ok(report::vendor_recommendations(&context, &scenario))
    }

    /// Risk findings over the project's current strategy assignment.
    pub fn assess_project_risks(
        &self,
        project: ProjectId,
        today: NaiveDate,
    ) -> Result<Vec<RiskFinding>, ProcurementServiceError> {
        let context = self.context(project, today)?;
        let scenario = self.evaluator.evaluate(&context, context.strategy.strategy);
        Ok(report::assess_risks(&context, &scenario))
    }

    pub fn project_savings(
        &self,
        project: ProjectId,
        today: NaiveDate,
    ) -> Result<SavingsReport, ProcurementServiceError> {
        let context = self.context(project, today)?;
        let lowest = self.evaluator.evaluate(&context, StrategyKind::LowestCost);
        Ok(report::project_savings(&context, &lowest))
    }

    pub fn vendor_consolidation(
        &self,
        project: ProjectId,
        today: NaiveDate,
    ) -> Result<ConsolidationReport, ProcurementServiceError> {
        let context = self.context(project, today)?;
        Ok(report::vendor_consolidation(&context))
    }

    /// The superset payload served to the JSON API.
    pub fn procurement_comparison(
        &self,
        project: ProjectId,
        today: NaiveDate,
    ) -> Result<ProcurementComparison, ProcurementServiceError> {
        let context = self.context(project, today)?;

        let scenarios = self.evaluator.evaluate_all(&context);
        let current = self.evaluator.evaluate(&context, context.strategy.strategy);
        let lowest = self.evaluator.evaluate(&context, StrategyKind::LowestCost);

        Ok(ProcurementComparison {
            project: ProjectSummaryView {
                id: context.project.id,
                name: context.project.name.clone(),
                budget: context.project.budget,
                deadline: context.project.deadline,
                status: context.project.status,
                status_label: context.project.status.label(),
            },
            strategy: StrategyView {
                strategy: context.strategy.strategy,
                strategy_label: context.strategy.strategy.label(),
                max_vendors: context.strategy.max_vendors,
                min_vendor_rating: context.strategy.min_vendor_rating,
                allow_partial_fulfill: context.strategy.allow_partial_fulfill,
            },
            recommendations: report::vendor_recommendations(&context, &current),
            risks: report::assess_risks(&context, &current),
            savings: report::project_savings(&context, &lowest),
            consolidation: report::vendor_consolidation(&context),
            quote_freshness: report::quote_freshness(&context),
            scenarios,
            analysis_date: today,
        })
    }

    /// Ordered comparison of every quote competing for a specification.
    pub fn comparison_for_specification(
        &self,
        specification: SpecificationId,
        include_extras: bool,
        today: NaiveDate,
    ) -> Result<ComparisonMatrix, ProcurementServiceError> {
        let spec = self
            .store
            .specification(specification)?
            .ok_or(ProcurementServiceError::SpecificationNotFound(specification))?;
        let quotes = self.store.quotes_for_specification(specification)?;
        let rates = CurrencyNormalizer::new(self.store.clone());
        Ok(self
            .builder
            .matrix(Some(&spec), quotes, &rates, today, include_extras))
    }

    /// Ordered comparison of a single product's quotes across vendors.
    pub fn comparison_for_product(
        &self,
        product: ProductId,
        include_extras: bool,
        today: NaiveDate,
    ) -> Result<ComparisonMatrix, ProcurementServiceError> {
        let product = self
            .store
            .product(product)?
            .ok_or(ProcurementServiceError::ProductNotFound(product))?;
        let specification = match product.specification_id {
            Some(id) => self.store.specification(id)?,
            None => None,
        };
        let quotes = self.store.quotes_for_product(product.id)?;
        let rates = CurrencyNormalizer::new(self.store.clone());
        Ok(self
            .builder
            .matrix(specification.as_ref(), quotes, &rates, today, include_extras))
    }

    /// The project's strategy record, created with defaults on first read.
    pub fn get_or_create_strategy(
        &self,
        project: ProjectId,
    ) -> Result<ProcurementStrategy, ProcurementServiceError> {
        self.store
            .project(project)?
            .ok_or(ProcurementServiceError::ProjectNotFound(project))?;

        if let Some(strategy) = self.store.strategy(project)? {
            return Ok(strategy);
        }

        let strategy = ProcurementStrategy::default_for(project);
        self.store.save_strategy(strategy.clone())?;
        Ok(strategy)
    }

    /// Overwrites the project's selected strategy, the engine's only
    /// persisted side effect.
    pub fn set_strategy(
        &self,
        project: ProjectId,
        strategy_name: &str,
    ) -> Result<ProcurementStrategy, ProcurementServiceError> {
        let kind = StrategyKind::parse(strategy_name)
            .ok_or_else(|| ProcurementServiceError::InvalidStrategy(strategy_name.to_string()))?;

        let mut strategy = self.get_or_create_strategy(project)?;
        strategy.strategy = kind;
        self.store.save_strategy(strategy.clone())?;
        Ok(strategy)
    }

    /// The Collecting phase: loads the project, its bill of materials, every
    /// competing quote, and vendor ratings into one immutable context the
    /// evaluator and reporters run over.
    fn context(
        &self,
        project: ProjectId,
        today: NaiveDate,
    ) -> Result<ProjectContext, ProcurementServiceError> {
        let project_record = self
            .store
            .project(project)?
            .ok_or(ProcurementServiceError::ProjectNotFound(project))?;
        let bom = self
            .store
            .bill_of_materials(project)?
            .ok_or(ProcurementServiceError::MissingBillOfMaterials(project))?;
        let strategy = self.get_or_create_strategy(project)?;

        let rates = CurrencyNormalizer::new(self.store.clone());
        let mut items = Vec::with_capacity(bom.items.len());
        let mut vendors: BTreeSet<VendorId> = BTreeSet::new();

        for item in bom.items {
            let quotes = self.store.quotes_for_specification(item.specification.id)?;
            for quote in &quotes {
                vendors.insert(quote.vendor.id);
            }

            let baseline_unit_price = quotes.iter().find_map(|quote| {
                rates
                    .convert(quote.price, &quote.currency, REFERENCE_CURRENCY, today)
                    .ok()
                    .map(|conversion| conversion.amount)
            });

            let matrix = self
                .builder
                .matrix(Some(&item.specification), quotes, &rates, today, false);
            items.push(ItemQuotes {
                item,
                matrix,
                baseline_unit_price,
            });
        }

        let mut ratings: BTreeMap<VendorId, f64> = BTreeMap::new();
        for vendor in vendors {
            if let Some(overall) = self
                .store
                .vendor_rating(vendor)?
                .and_then(|summary| summary.overall())
            {
                ratings.insert(vendor, overall);
            }
        }

        Ok(ProjectContext {
            project: project_record,
            strategy,
            items,
            ratings,
            today,
        })
    }
}

/// Error raised by the procurement service. Structural problems abort the
/// call; data-quality gaps are annotated on results instead.
#[derive(Debug, thiserror::Error)]
pub enum ProcurementServiceError {
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("project {0} has no bill of materials")]
    MissingBillOfMaterials(ProjectId),
    #[error("specification {0} not found")]
    SpecificationNotFound(SpecificationId),
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
    #[error("unknown strategy '{0}'")]
    InvalidStrategy(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ProcurementServiceError {
    /// HTTP status the error maps to at the API boundary.
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ProcurementServiceError::ProjectNotFound(_)
            | ProcurementServiceError::MissingBillOfMaterials(_)
            | ProcurementServiceError::SpecificationNotFound(_)
            | ProcurementServiceError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            ProcurementServiceError::InvalidStrategy(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProcurementServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
