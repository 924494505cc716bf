use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use procura::workflows::procurement::{
    AttributeId, AttributeKind, AttributeValue, BillOfMaterials, BomItem, BomItemId,
    ProcurementStore, ProcurementStrategy, Product, ProductAttribute, ProductId, Project,
    ProjectId, ProjectStatus, Quote, QuoteId, RateRecord, RateSource, RateTable,
    RepositoryError, Specification, SpecificationAttribute, SpecificationId, Vendor, VendorId,
    VendorRatingSummary,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded in-memory store backing the demo service; every fetch hands
/// out fresh clones so the engine sees an immutable snapshot.
#[derive(Default)]
pub(crate) struct InMemoryProcurementStore {
    projects: Mutex<BTreeMap<ProjectId, Project>>,
    boms: Mutex<BTreeMap<ProjectId, BillOfMaterials>>,
    specifications: Mutex<BTreeMap<SpecificationId, Specification>>,
    products: Mutex<BTreeMap<ProductId, Product>>,
    vendors: Mutex<BTreeMap<VendorId, Vendor>>,
    quotes: Mutex<Vec<Quote>>,
    ratings: Mutex<BTreeMap<VendorId, VendorRatingSummary>>,
    strategies: Mutex<BTreeMap<ProjectId, ProcurementStrategy>>,
    rates: Mutex<RateTable>,
}

impl RateSource for InMemoryProcurementStore {
    fn rate(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64> {
        self.rates
            .lock()
            .expect("store mutex poisoned")
            .rate(from, to, as_of)
    }
}

impl ProcurementStore for InMemoryProcurementStore {
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

/// Identifier of the project the seed catalog revolves around.
pub(crate) const DEMO_PROJECT: ProjectId = ProjectId(1);

/// Seeds a small but representative catalog: one project, three BOM lines,
/// three vendors quoting in three currencies, and one deliberately
/// non-compliant budget offer.
pub(crate) fn seed_demo_catalog(store: &InMemoryProcurementStore) {
    let date =
        |year, month, day| NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date");

    let workstation = Specification {
        id: SpecificationId(1),
        name: "Engineering Workstation".to_string(),
        description: "CAD-capable desktop workstation".to_string(),
        attributes: vec![
            SpecificationAttribute {
                id: AttributeId(1),
                name: "ram_gb".to_string(),
                kind: AttributeKind::Number,
                unit: Some("GB".to_string()),
                required: true,
                min_value: Some(32.0),
                max_value: None,
            },
            SpecificationAttribute {
                id: AttributeId(2),
                name: "ecc_memory".to_string(),
                kind: AttributeKind::Boolean,
                unit: None,
                required: false,
                min_value: None,
                max_value: None,
            },
        ],
    };
    let display = Specification {
        id: SpecificationId(2),
        name: "Color-Calibrated Display".to_string(),
        description: String::new(),
        attributes: vec![SpecificationAttribute {
            id: AttributeId(3),
            name: "size_in".to_string(),
            kind: AttributeKind::Number,
            unit: Some("in".to_string()),
            required: true,
            min_value: Some(27.0),
            max_value: Some(34.0),
        }],
    };
    let ups = Specification {
        id: SpecificationId(3),
        name: "Rack UPS".to_string(),
        description: String::new(),
        attributes: Vec::new(),
    };

    {
        let mut specifications = store.specifications.lock().expect("store mutex poisoned");
        specifications.insert(workstation.id, workstation.clone());
        specifications.insert(display.id, display.clone());
        specifications.insert(ups.id, ups.clone());
    }

    store.projects.lock().expect("store mutex poisoned").insert(
        DEMO_PROJECT,
        Project {
            id: DEMO_PROJECT,
            name: "Design Studio Refresh".to_string(),
            budget: 30000.0,
            deadline: Some(date(2026, 10, 1)),
            status: ProjectStatus::Active,
        },
    );
    store.boms.lock().expect("store mutex poisoned").insert(
        DEMO_PROJECT,
        BillOfMaterials {
            project_id: DEMO_PROJECT,
            items: vec![
                BomItem {
                    id: BomItemId(1),
                    specification: workstation.clone(),
                    quantity: 4,
                    notes: "CAD seats".to_string(),
                },
                BomItem {
                    id: BomItemId(2),
                    specification: display.clone(),
                    quantity: 8,
                    notes: String::new(),
                },
                BomItem {
                    id: BomItemId(3),
                    specification: ups.clone(),
                    quantity: 1,
                    notes: String::new(),
                },
            ],
            notes: String::new(),
        },
    );

    *store.rates.lock().expect("store mutex poisoned") = RateTable::new(vec![
        RateRecord {
            from: "EUR".to_string(),
            to: "USD".to_string(),
            rate: 1.09,
            effective: date(2026, 1, 2),
        },
        RateRecord {
            from: "GBP".to_string(),
            to: "USD".to_string(),
            rate: 1.27,
            effective: date(2026, 1, 2),
        },
    ]);

    let number = |id, value| ProductAttribute {
        attribute_id: AttributeId(id),
        value: AttributeValue::Number(value),
    };
    let cad_tower = Product {
        id: ProductId(1),
        name: "CadTower 7".to_string(),
        brand: "Vertex".to_string(),
        specification_id: Some(workstation.id),
        attributes: vec![
            number(1, 64.0),
            ProductAttribute {
                attribute_id: AttributeId(2),
                value: AttributeValue::Boolean(true),
            },
        ],
    };
    let office_tower = Product {
        id: ProductId(2),
        name: "OfficeBox 3".to_string(),
        brand: "Vertex".to_string(),
        specification_id: Some(workstation.id),
        attributes: vec![number(1, 16.0)],
    };
    let studio_display = Product {
        id: ProductId(3),
        name: "StudioView 32".to_string(),
        brand: "Chroma".to_string(),
        specification_id: Some(display.id),
        attributes: vec![number(3, 32.0)],
    };
    let rack_ups = Product {
        id: ProductId(4),
        name: "PowerWall 1500".to_string(),
        brand: "Ampere".to_string(),
        specification_id: Some(ups.id),
        attributes: Vec::new(),
    };

    let stateside = Vendor {
        id: VendorId(1),
        name: "Stateside Office Supply".to_string(),
        currency: "USD".to_string(),
        discount_code: Some("NET30-5".to_string()),
    };
    let rhine = Vendor {
        id: VendorId(2),
        name: "Rhine Technik".to_string(),
        currency: "EUR".to_string(),
        discount_code: None,
    };
    let albion = Vendor {
        id: VendorId(3),
        name: "Albion Components".to_string(),
        currency: "GBP".to_string(),
        discount_code: None,
    };

    {
        let mut products = store.products.lock().expect("store mutex poisoned");
        for product in [&cad_tower, &office_tower, &studio_display, &rack_ups] {
            products.insert(product.id, product.clone());
        }
        let mut vendors = store.vendors.lock().expect("store mutex poisoned");
        for vendor in [&stateside, &rhine, &albion] {
            vendors.insert(vendor.id, vendor.clone());
        }
    }

    let quote = |id, vendor: &Vendor, product: &Product, price, quote_date, valid_until| Quote {
        id: QuoteId(id),
        vendor: vendor.clone(),
        product: product.clone(),
        price,
        currency: vendor.currency.clone(),
        quote_date,
        valid_until,
        notes: String::new(),
    };

    *store.quotes.lock().expect("store mutex poisoned") = vec![
        quote(1, &stateside, &cad_tower, 3150.0, date(2026, 5, 12), None),
        quote(
            2,
            &rhine,
            &cad_tower,
            2840.0,
            date(2026, 5, 14),
            Some(date(2026, 9, 30)),
        ),
        // Cheap but misses the RAM floor.
        quote(3, &stateside, &office_tower, 1650.0, date(2026, 5, 12), None),
        quote(4, &rhine, &studio_display, 920.0, date(2026, 5, 14), None),
        quote(5, &albion, &studio_display, 840.0, date(2026, 5, 18), None),
        quote(6, &stateside, &rack_ups, 1390.0, date(2026, 5, 12), None),
        quote(
            7,
            &albion,
            &rack_ups,
            1120.0,
            date(2026, 5, 18),
            Some(date(2026, 6, 15)),
        ),
    ];

    let mut ratings = store.ratings.lock().expect("store mutex poisoned");
    ratings.insert(
        VendorId(1),
        VendorRatingSummary {
            total_ratings: 12,
            price: Some(3.6),
            quality: Some(4.4),
            delivery: Some(4.8),
            service: Some(4.4),
        },
    );
    ratings.insert(
        VendorId(2),
        VendorRatingSummary {
            total_ratings: 5,
            price: Some(4.2),
            quality: Some(4.6),
            delivery: Some(3.8),
            service: None,
        },
    );
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
