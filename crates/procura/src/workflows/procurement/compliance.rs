use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    AttributeId, AttributeKind, AttributeValue, Product, ProductAttribute, Specification,
    SpecificationAttribute,
};

/// Verdict for one product evaluated against one specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Per-attribute verdict covering every attribute the specification
    /// declares, required or not.
    pub per_attribute: BTreeMap<AttributeId, bool>,
    /// Logical AND across the required attributes only.
    pub overall_compliant: bool,
    /// Product attributes offered beyond what the specification requires,
    /// surfaced for informational display.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_attributes: Vec<ProductAttribute>,
}

impl ComplianceReport {
    /// Trivially compliant report for products with no specification to
    /// evaluate against; every declared attribute is surfaced as extra.
    pub fn unconstrained(product: &Product) -> Self {
        Self {
            per_attribute: BTreeMap::new(),
            overall_compliant: true,
            extra_attributes: product.attributes.clone(),
        }
    }
}

/// Stateless matcher deciding whether an offered product satisfies a
/// specification's declared attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceMatcher;

impl ComplianceMatcher {
    pub fn evaluate(&self, specification: &Specification, product: &Product) -> ComplianceReport {
        let mut per_attribute = BTreeMap::new();
        let mut overall_compliant = true;

        for attribute in &specification.attributes {
            let compliant = match product.attribute(attribute.id) {
                Some(declared) => value_satisfies(attribute.kind, attribute, &declared.value),
                None => false,
            };

            per_attribute.insert(attribute.id, compliant);
            if attribute.required && !compliant {
                overall_compliant = false;
            }
        }

        let extra_attributes = product
            .attributes
            .iter()
            .filter(|declared| {
                specification
                    .attribute(declared.attribute_id)
                    .map(|attribute| !attribute.required)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        ComplianceReport {
            per_attribute,
            overall_compliant,
            extra_attributes,
        }
    }
}

fn value_satisfies(
    kind: AttributeKind,
    attribute: &SpecificationAttribute,
    value: &AttributeValue,
) -> bool {
    if value.kind() != kind {
        return false;
    }

    match value {
        AttributeValue::Number(number) => {
            let above_min = attribute.min_value.map(|min| *number >= min).unwrap_or(true);
            let below_max = attribute.max_value.map(|max| *number <= max).unwrap_or(true);
            above_min && below_max
        }
        // Text and boolean attributes are satisfied by any type-matched value.
        AttributeValue::Text(_) | AttributeValue::Boolean(_) => true,
    }
}
