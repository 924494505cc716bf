use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::procurement::domain::{
    AttributeId, AttributeKind, AttributeValue, BillOfMaterials, BomItem, BomItemId,
    ProcurementStrategy, Product, ProductAttribute, ProductId, Project, ProjectId, ProjectStatus,
    Quote, QuoteId, RateRecord, Specification, SpecificationAttribute, SpecificationId, Vendor,
    VendorId, VendorRatingSummary,
};
use crate::workflows::procurement::forex::{RateSource, RateTable};
use crate::workflows::procurement::repository::{ProcurementStore, RepositoryError};
use crate::workflows::procurement::service::ProcurementService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 6, 1)
}

pub(super) const PROJECT: ProjectId = ProjectId(100);

pub(super) fn laptop_spec() -> Specification {
    Specification {
        id: SpecificationId(1),
        name: "Laptop Workstation".to_string(),
        description: "Developer workstation".to_string(),
        attributes: vec![
            SpecificationAttribute {
                id: AttributeId(1),
                name: "ram_gb".to_string(),
                kind: AttributeKind::Number,
                unit: Some("GB".to_string()),
                required: true,
                min_value: Some(16.0),
                max_value: None,
            },
            SpecificationAttribute {
                id: AttributeId(2),
                name: "storage_gb".to_string(),
                kind: AttributeKind::Number,
                unit: Some("GB".to_string()),
                required: true,
                min_value: Some(512.0),
                max_value: None,
            },
            SpecificationAttribute {
                id: AttributeId(3),
                name: "fingerprint_reader".to_string(),
                kind: AttributeKind::Boolean,
                unit: None,
                required: false,
                min_value: None,
                max_value: None,
            },
        ],
    }
}

pub(super) fn monitor_spec() -> Specification {
    Specification {
        id: SpecificationId(2),
        name: "Monitor 27in".to_string(),
        description: "Desk monitor".to_string(),
        attributes: vec![SpecificationAttribute {
            id: AttributeId(4),
            name: "size_in".to_string(),
            kind: AttributeKind::Number,
            unit: Some("in".to_string()),
            required: true,
            min_value: Some(27.0),
            max_value: Some(32.0),
        }],
    }
}

pub(super) fn dock_spec() -> Specification {
    Specification {
        id: SpecificationId(3),
        name: "Docking Station".to_string(),
        description: String::new(),
        attributes: Vec::new(),
    }
}

pub(super) fn number_attribute(id: u64, value: f64) -> ProductAttribute {
    ProductAttribute {
        attribute_id: AttributeId(id),
        value: AttributeValue::Number(value),
    }
}

pub(super) fn compliant_laptop() -> Product {
    Product {
        id: ProductId(1),
        name: "ProBook 16".to_string(),
        brand: "Hexagon".to_string(),
        specification_id: Some(SpecificationId(1)),
        attributes: vec![
            number_attribute(1, 32.0),
            number_attribute(2, 1024.0),
            ProductAttribute {
                attribute_id: AttributeId(3),
                value: AttributeValue::Boolean(true),
            },
        ],
    }
}

pub(super) fn underspecced_laptop() -> Product {
    Product {
        id: ProductId(2),
        name: "EconoBook 14".to_string(),
        brand: "Hexagon".to_string(),
        specification_id: Some(SpecificationId(1)),
        attributes: vec![number_attribute(1, 8.0), number_attribute(2, 256.0)],
    }
}

pub(super) fn monitor_product() -> Product {
    Product {
        id: ProductId(3),
        name: "ViewLine 27".to_string(),
        brand: "Clarity".to_string(),
        specification_id: Some(SpecificationId(2)),
        attributes: vec![number_attribute(4, 27.0)],
    }
}

pub(super) fn dock_product() -> Product {
    Product {
        id: ProductId(4),
        name: "DockHub 9".to_string(),
        brand: "Clarity".to_string(),
        specification_id: Some(SpecificationId(3)),
        attributes: Vec::new(),
    }
}

pub(super) fn vendor(id: u64, name: &str, currency: &str) -> Vendor {
    Vendor {
        id: VendorId(id),
        name: name.to_string(),
        currency: currency.to_string(),
        discount_code: None,
    }
}

pub(super) fn acme() -> Vendor {
    vendor(1, "Acme Supply", "USD")
}

pub(super) fn nordic() -> Vendor {
    vendor(2, "Nordic Components", "EUR")
}

pub(super) fn overseas() -> Vendor {
    vendor(3, "Overseas Direct", "CNY")
}

pub(super) fn quote(
    id: u64,
    vendor: Vendor,
    product: Product,
    price: f64,
    currency: &str,
    quote_date: NaiveDate,
    valid_until: Option<NaiveDate>,
) -> Quote {
    Quote {
        id: QuoteId(id),
        vendor,
        product,
        price,
        currency: currency.to_string(),
        quote_date,
        valid_until,
        notes: String::new(),
    }
}

pub(super) fn standard_rates() -> Vec<RateRecord> {
    vec![
        RateRecord {
            from: "EUR".to_string(),
            to: "USD".to_string(),
            rate: 1.2,
            effective: date(2025, 1, 1),
        },
        RateRecord {
            from: "EUR".to_string(),
            to: "USD".to_string(),
            rate: 1.1,
            effective: date(2026, 1, 1),
        },
        RateRecord {
            from: "GBP".to_string(),
            to: "USD".to_string(),
            rate: 1.3,
            effective: date(2026, 1, 1),
        },
        RateRecord {
            from: "USD".to_string(),
            to: "CHF".to_string(),
            rate: 0.9,
            effective: date(2026, 1, 1),
        },
    ]
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) projects: Mutex<BTreeMap<ProjectId, Project>>,
    pub(super) boms: Mutex<BTreeMap<ProjectId, BillOfMaterials>>,
    pub(super) specifications: Mutex<BTreeMap<SpecificationId, Specification>>,
    pub(super) products: Mutex<BTreeMap<ProductId, Product>>,
    pub(super) vendors: Mutex<BTreeMap<VendorId, Vendor>>,
    pub(super) quotes: Mutex<Vec<Quote>>,
    pub(super) ratings: Mutex<BTreeMap<VendorId, VendorRatingSummary>>,
    pub(super) strategies: Mutex<BTreeMap<ProjectId, ProcurementStrategy>>,
    pub(super) rates: Mutex<RateTable>,
}

impl MemoryStore {
    pub(super) fn insert_quote(&self, quote: Quote) {
        let mut specifications = self.specifications.lock().expect("store mutex poisoned");
        if let Some(spec_id) = quote.product.specification_id {
            specifications
                .entry(spec_id)
                .or_insert_with(|| match spec_id {
                    SpecificationId(1) => laptop_spec(),
                    SpecificationId(2) => monitor_spec(),
                    _ => dock_spec(),
                });
        }
        drop(specifications);

        self.products
            .lock()
            .expect("store mutex poisoned")
            .insert(quote.product.id, quote.product.clone());
        self.vendors
            .lock()
            .expect("store mutex poisoned")
            .insert(quote.vendor.id, quote.vendor.clone());
        self.quotes.lock().expect("store mutex poisoned").push(quote);
    }
}

impl RateSource for MemoryStore {
    fn rate(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64> {
        self.rates
            .lock()
            .expect("store mutex poisoned")
            .rate(from, to, as_of)
    }
}

impl ProcurementStore for MemoryStore {
    fn project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(self
            .projects
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn bill_of_materials(
        &self,
        project: ProjectId,
    ) -> Result<Option<BillOfMaterials>, RepositoryError> {
        Ok(self
            .boms
            .lock()
            .expect("store mutex poisoned")
            .get(&project)
            .cloned())
    }

    fn specification(
        &self,
        id: SpecificationId,
    ) -> Result<Option<Specification>, RepositoryError> {
        Ok(self
            .specifications
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .products
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn quotes_for_specification(
        &self,
        specification: SpecificationId,
    ) -> Result<Vec<Quote>, RepositoryError> {
        Ok(self
            .quotes
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|quote| quote.product.specification_id == Some(specification))
            .cloned()
            .collect())
    }

    fn quotes_for_product(&self, product: ProductId) -> Result<Vec<Quote>, RepositoryError> {
        Ok(self
            .quotes
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|quote| quote.product.id == product)
            .cloned()
            .collect())
    }

    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self
            .vendors
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn vendor_rating(
        &self,
        vendor: VendorId,
    ) -> Result<Option<VendorRatingSummary>, RepositoryError> {
        Ok(self
            .ratings
            .lock()
            .expect("store mutex poisoned")
            .get(&vendor)
            .cloned())
    }

    fn strategy(
        &self,
        project: ProjectId,
    ) -> Result<Option<ProcurementStrategy>, RepositoryError> {
        Ok(self
            .strategies
            .lock()
            .expect("store mutex poisoned")
            .get(&project)
            .cloned())
    }

    fn save_strategy(&self, strategy: ProcurementStrategy) -> Result<(), RepositoryError> {
        self.strategies
            .lock()
            .expect("store mutex poisoned")
            .insert(strategy.project_id, strategy);
        Ok(())
    }
}

/// Three-item catalog exercised across the evaluation, risk, and service
/// tests: two laptop offers (one compliant, one not), two monitor offers,
/// and a dock quoted by Acme plus an unconvertible overseas quote.
pub(super) fn standard_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());

    store.projects.lock().expect("store mutex poisoned").insert(
        PROJECT,
        Project {
            id: PROJECT,
            name: "Lab Refresh".to_string(),
            budget: 5000.0,
            deadline: Some(date(2026, 7, 1)),
            status: ProjectStatus::Active,
        },
    );

    store.boms.lock().expect("store mutex poisoned").insert(
        PROJECT,
        BillOfMaterials {
            project_id: PROJECT,
            items: vec![
                BomItem {
                    id: BomItemId(10),
                    specification: laptop_spec(),
                    quantity: 2,
                    notes: String::new(),
                },
                BomItem {
                    id: BomItemId(11),
                    specification: monitor_spec(),
                    quantity: 1,
                    notes: String::new(),
                },
                BomItem {
                    id: BomItemId(12),
                    specification: dock_spec(),
                    quantity: 1,
                    notes: String::new(),
                },
            ],
            notes: String::new(),
        },
    );

    *store.rates.lock().expect("store mutex poisoned") = RateTable::new(standard_rates());

    // Laptop offers; the cheap one misses the RAM and storage floors.
    store.insert_quote(quote(
        1,
        acme(),
        compliant_laptop(),
        950.0,
        "USD",
        date(2026, 5, 1),
        None,
    ));
    store.insert_quote(quote(
        2,
        nordic(),
        compliant_laptop(),
        900.0,
        "EUR",
        date(2026, 5, 2),
        None,
    ));
    store.insert_quote(quote(
        3,
        acme(),
        underspecced_laptop(),
        700.0,
        "USD",
        date(2026, 5, 3),
        None,
    ));

    // Monitor offers.
    store.insert_quote(quote(
        4,
        nordic(),
        monitor_product(),
        180.0,
        "EUR",
        date(2026, 5, 4),
        None,
    ));
    store.insert_quote(quote(
        5,
        acme(),
        monitor_product(),
        210.0,
        "USD",
        date(2026, 5, 5),
        None,
    ));

    // Dock offers; the overseas quote has no rate path to USD.
    store.insert_quote(quote(
        6,
        acme(),
        dock_product(),
        150.0,
        "USD",
        date(2026, 5, 6),
        None,
    ));
    store.insert_quote(quote(
        7,
        overseas(),
        dock_product(),
        980.0,
        "CNY",
        date(2026, 5, 7),
        None,
    ));

    let mut ratings = store.ratings.lock().expect("store mutex poisoned");
    ratings.insert(
        VendorId(1),
        VendorRatingSummary {
            total_ratings: 4,
            price: Some(4.0),
            quality: Some(5.0),
            delivery: Some(4.5),
            service: Some(4.5),
        },
    );
    ratings.insert(
        VendorId(2),
        VendorRatingSummary {
            total_ratings: 2,
            price: Some(4.0),
            quality: Some(3.0),
            delivery: None,
            service: Some(3.5),
        },
    );
    drop(ratings);

    store
}

pub(super) fn standard_service() -> (ProcurementService<MemoryStore>, Arc<MemoryStore>) {
    let store = standard_store();
    (ProcurementService::new(store.clone()), store)
}

pub(super) fn standard_router() -> axum::Router {
    let (service, _store) = standard_service();
    crate::workflows::procurement::router::procurement_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
