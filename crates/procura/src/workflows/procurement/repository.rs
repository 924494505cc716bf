use super::domain::{
    BillOfMaterials, ProcurementStrategy, Product, ProductId, Project, ProjectId, Quote,
    Specification, SpecificationId, Vendor, VendorId, VendorRatingSummary,
};
use super::forex::RateSource;

/// Read-only boundary the engine consumes its inputs through, plus the single
/// write path for a project's strategy record. Implementations must be safe
/// to call concurrently and idempotent on reads; the engine re-reads fresh on
/// every invocation and never caches.
pub trait ProcurementStore: RateSource + Send + Sync {
    fn project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;

    fn bill_of_materials(
        &self,
        project: ProjectId,
    ) -> Result<Option<BillOfMaterials>, RepositoryError>;

    fn specification(
        &self,
        id: SpecificationId,
    ) -> Result<Option<Specification>, RepositoryError>;

    fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Quotes across all vendors and products linked to a specification, with
    /// vendor and product preloaded.
    fn quotes_for_specification(
        &self,
        specification: SpecificationId,
    ) -> Result<Vec<Quote>, RepositoryError>;

    fn quotes_for_product(&self, product: ProductId) -> Result<Vec<Quote>, RepositoryError>;

    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError>;

    fn vendor_rating(
        &self,
        vendor: VendorId,
    ) -> Result<Option<VendorRatingSummary>, RepositoryError>;

    fn strategy(
        &self,
        project: ProjectId,
    ) -> Result<Option<ProcurementStrategy>, RepositoryError>;

    fn save_strategy(&self, strategy: ProcurementStrategy) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
