use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier for a project.
    ProjectId
);
id_type!(
    /// Identifier for a requirement specification.
    SpecificationId
);
id_type!(
    /// Identifier for a concrete product offered against a specification.
    ProductId
);
id_type!(
    /// Identifier for a selling vendor.
    VendorId
);
id_type!(
    /// Identifier for a vendor price quote.
    QuoteId
);
id_type!(
    /// Identifier for a bill-of-materials line item.
    BomItemId
);
id_type!(
    /// Identifier for a specification attribute.
    AttributeId
);

/// Data types a specification attribute can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Number,
    Text,
    Boolean,
}

impl AttributeKind {
    pub const fn label(self) -> &'static str {
        match self {
            AttributeKind::Number => "number",
            AttributeKind::Text => "text",
            AttributeKind::Boolean => "boolean",
        }
    }
}

/// A single typed attribute a specification declares, optionally required and
/// optionally bounded (bounds are meaningful for numeric attributes only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationAttribute {
    pub id: AttributeId,
    pub name: String,
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl SpecificationAttribute {
    /// Bounds are well formed when min does not exceed max.
    pub fn bounds_valid(&self) -> bool {
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// Named requirement template products are offered against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub id: SpecificationId,
    pub name: String,
    pub description: String,
    pub attributes: Vec<SpecificationAttribute>,
}

impl Specification {
    pub fn attribute(&self, id: AttributeId) -> Option<&SpecificationAttribute> {
        self.attributes.iter().find(|attribute| attribute.id == id)
    }
}

/// Exactly one typed value, matching the declared attribute kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl AttributeValue {
    pub const fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Number(_) => AttributeKind::Number,
            AttributeValue::Text(_) => AttributeKind::Text,
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
        }
    }
}

/// Value a product declares for one specification attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub attribute_id: AttributeId,
    pub value: AttributeValue,
}

/// An item offered by a brand, optionally linked to a specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification_id: Option<SpecificationId>,
    pub attributes: Vec<ProductAttribute>,
}

impl Product {
    pub fn attribute(&self, id: AttributeId) -> Option<&ProductAttribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.attribute_id == id)
    }
}

/// A selling entity quoting in its own currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    /// 3-letter ISO 4217 currency code.
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

/// Quotes older than this many days with no expiry date are considered stale.
const STALE_QUOTE_AGE_DAYS: i64 = 90;

/// A vendor's dated price quote for a product, with vendor and product
/// preloaded by the data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub vendor: Vendor,
    pub product: Product,
    pub price: f64,
    pub currency: String,
    pub quote_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Quote {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.valid_until, Some(until) if until < today)
    }

    /// Expired quotes are stale; quotes carrying a still-valid expiry date are
    /// not; everything else ages out after ninety days.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        if self.is_expired(today) {
            return true;
        }
        if self.valid_until.is_some() {
            return false;
        }
        (today - self.quote_date).num_days() > STALE_QUOTE_AGE_DAYS
    }

    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.quote_date).num_days().max(0)
    }
}

/// Directed exchange-rate record; several may exist per pair at different
/// effective dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub effective: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

/// A project owning one bill of materials; a budget of zero means
/// unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub status: ProjectStatus,
}

/// One demand line: a specification and the quantity required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub id: BomItemId,
    pub specification: Specification,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// The demand side of the recommendation problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    pub project_id: ProjectId,
    pub items: Vec<BomItem>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Closed set of vendor-selection strategies. Each variant carries its own
/// per-item comparator; adding a strategy means adding a variant here and one
/// assignment routine, not a new hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    LowestCost,
    FewestVendors,
    Balanced,
    QualityFocused,
}

impl StrategyKind {
    pub const fn label(self) -> &'static str {
        match self {
            StrategyKind::LowestCost => "lowest_cost",
            StrategyKind::FewestVendors => "fewest_vendors",
            StrategyKind::Balanced => "balanced",
            StrategyKind::QualityFocused => "quality_focused",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "lowest_cost" => Some(StrategyKind::LowestCost),
            "fewest_vendors" => Some(StrategyKind::FewestVendors),
            "balanced" => Some(StrategyKind::Balanced),
            "quality_focused" => Some(StrategyKind::QualityFocused),
            _ => None,
        }
    }

    /// Fixed presentation order callers and tests depend on.
    pub const fn ordered() -> [StrategyKind; 4] {
        [
            StrategyKind::LowestCost,
            StrategyKind::FewestVendors,
            StrategyKind::Balanced,
            StrategyKind::QualityFocused,
        ]
    }
}

/// Per-project strategy selection, created lazily on first read and the only
/// record the engine ever writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementStrategy {
    pub project_id: ProjectId,
    pub strategy: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_vendors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_vendor_rating: Option<f64>,
    pub allow_partial_fulfill: bool,
}

impl ProcurementStrategy {
    pub fn default_for(project_id: ProjectId) -> Self {
        Self {
            project_id,
            strategy: StrategyKind::Balanced,
            max_vendors: None,
            min_vendor_rating: None,
            allow_partial_fulfill: true,
        }
    }
}

/// Neutral midpoint on the 1-5 rating scale, used when a vendor has no
/// recorded ratings.
pub const NEUTRAL_VENDOR_RATING: f64 = 3.0;

/// Aggregated vendor scores on a 1-5 scale, one average per rated dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VendorRatingSummary {
    pub total_ratings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<f64>,
}

impl VendorRatingSummary {
    /// Average across the dimensions that have been rated.
    pub fn overall(&self) -> Option<f64> {
        let scores: Vec<f64> = [self.price, self.quality, self.delivery, self.service]
            .into_iter()
            .flatten()
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
