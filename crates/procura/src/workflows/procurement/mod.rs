//! Procurement recommendation workflow: currency normalization, attribute
//! compliance matching, quote comparison, scenario evaluation, and
//! recommendation/risk reporting over a project's bill of materials.
//!
//! Data flows one direction: bill of materials, quotes, and forex records
//! feed the normalizer, which feeds the comparison builder, which feeds the
//! scenario evaluator, which feeds the reporters. The service facade is the
//! public gateway; everything underneath is a pure pass over the snapshot it
//! loads.

pub mod comparison;
pub mod compliance;
pub mod domain;
pub mod evaluation;
pub mod forex;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use comparison::{
    ComparisonBuilder, ComparisonMatrix, DegradedReason, QuoteComparison, QuotePick,
};
pub use compliance::{ComplianceMatcher, ComplianceReport};
pub use domain::{
    AttributeId, AttributeKind, AttributeValue, BillOfMaterials, BomItem, BomItemId,
    ProcurementStrategy, Product, ProductAttribute, ProductId, Project, ProjectId, ProjectStatus,
    Quote, QuoteId, RateRecord, Specification, SpecificationAttribute, SpecificationId,
    StrategyKind, Vendor, VendorId, VendorRatingSummary, NEUTRAL_VENDOR_RATING,
};
pub use evaluation::{
    AssignedQuote, ItemAssignment, ItemOutcome, ItemQuotes, ProjectContext, ScenarioEvaluator,
    ScenarioResult, ScenarioStatus,
};
pub use forex::{
    Conversion, ConversionError, CurrencyNormalizer, RateSource, RateTable, REFERENCE_CURRENCY,
};
pub use report::{
    ConsolidationReport, ProcurementComparison, QuoteFreshness, RiskFinding, RiskKind,
    SavingsReport, Severity, VendorConsolidation, VendorRecommendation,
};
pub use repository::{ProcurementStore, RepositoryError};
pub use router::procurement_router;
pub use service::{ProcurementService, ProcurementServiceError};
