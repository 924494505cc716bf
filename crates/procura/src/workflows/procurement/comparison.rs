use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::compliance::{ComplianceMatcher, ComplianceReport};
use super::domain::{Quote, Specification};
use super::forex::{CurrencyNormalizer, RateSource, REFERENCE_CURRENCY};

/// One quote annotated with its normalized price, compliance verdict, and
/// expiry state as of the evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteComparison {
    pub quote: Quote,
    /// Price in the reference currency; absent when conversion failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    pub compliance: ComplianceReport,
    pub expired: bool,
}

impl QuoteComparison {
    pub fn is_convertible(&self) -> bool {
        self.converted_price.is_some()
    }

    fn sort_price(&self) -> f64 {
        self.converted_price.unwrap_or(self.quote.price)
    }
}

/// Constraint relaxed while picking a best quote because no quote satisfied
/// all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegradedReason {
    NoCompliantQuote,
    OnlyExpiredQuotes,
    NoConvertibleQuotes,
    NoVendorMeetsRating,
}

impl DegradedReason {
    pub const fn label(self) -> &'static str {
        match self {
            DegradedReason::NoCompliantQuote => "no-compliant-quote",
            DegradedReason::OnlyExpiredQuotes => "only-expired-quotes",
            DegradedReason::NoConvertibleQuotes => "no-convertible-quotes",
            DegradedReason::NoVendorMeetsRating => "no-vendor-meets-rating",
        }
    }
}

/// Best-quote selection result; `degraded` signals that one or more
/// constraints had to be relaxed.
#[derive(Debug, Clone)]
pub struct QuotePick<'a> {
    pub comparison: &'a QuoteComparison,
    pub degraded: bool,
    pub reasons: Vec<DegradedReason>,
}

/// Ordered comparison of every distinct vendor quote competing for a
/// specification (or a single product), best price first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<Specification>,
    pub quotes: Vec<QuoteComparison>,
}

impl ComparisonMatrix {
    /// The lowest-priced compliant, non-expired, convertible quote.
    ///
    /// When no quote satisfies everything, constraints relax one at a time
    /// (convertibility, then expiry, then compliance), each relaxation
    /// recorded as a reason on the degraded pick. Convertibility is never
    /// relaxed while a convertible quote remains, since prices in different
    /// currencies cannot be compared.
    pub fn best_pick(&self) -> Option<QuotePick<'_>> {
        if self.quotes.is_empty() {
            return None;
        }

        let mut reasons = Vec::new();
        let mut pool: Vec<&QuoteComparison> =
            self.quotes.iter().filter(|entry| entry.is_convertible()).collect();
        if pool.is_empty() {
            reasons.push(DegradedReason::NoConvertibleQuotes);
            pool = self.quotes.iter().collect();
        }

        let fresh: Vec<&QuoteComparison> =
            pool.iter().copied().filter(|entry| !entry.expired).collect();
        if fresh.is_empty() {
            reasons.push(DegradedReason::OnlyExpiredQuotes);
        } else {
            pool = fresh;
        }

        let compliant: Vec<&QuoteComparison> = pool
            .iter()
            .copied()
            .filter(|entry| entry.compliance.overall_compliant)
            .collect();
        if compliant.is_empty() {
            reasons.push(DegradedReason::NoCompliantQuote);
        } else {
            pool = compliant;
        }

        // The matrix is already in pick-preference order, so the first
        // surviving entry is the winner.
        pool.first().copied().map(|comparison| QuotePick {
            comparison,
            degraded: !reasons.is_empty(),
            reasons,
        })
    }
}

/// Builds comparison matrices by normalizing each quote's price and running
/// the compliance matcher against the quoted product.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonBuilder {
    matcher: ComplianceMatcher,
}

impl ComparisonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matrix<R: RateSource>(
        &self,
        specification: Option<&Specification>,
        quotes: Vec<Quote>,
        rates: &CurrencyNormalizer<R>,
        today: NaiveDate,
        include_extras: bool,
    ) -> ComparisonMatrix {
        let mut entries: Vec<QuoteComparison> = quotes
            .into_iter()
            .map(|quote| {
                let conversion = rates
                    .convert(quote.price, &quote.currency, REFERENCE_CURRENCY, today)
                    .ok();

                let mut compliance = match specification {
                    Some(specification) => self.matcher.evaluate(specification, &quote.product),
                    None => ComplianceReport::unconstrained(&quote.product),
                };
                if !include_extras {
                    compliance.extra_attributes.clear();
                }

                let expired = quote.is_expired(today);
                QuoteComparison {
                    converted_price: conversion.as_ref().map(|c| c.amount),
                    conversion_rate: conversion.as_ref().map(|c| c.rate),
                    compliance,
                    expired,
                    quote,
                }
            })
            .collect();

        // Ascending converted price, oldest quote winning ties; unconvertible
        // quotes sort after everything comparable.
        entries.sort_by(|a, b| {
            b.is_convertible()
                .cmp(&a.is_convertible())
                .then_with(|| a.sort_price().total_cmp(&b.sort_price()))
                .then_with(|| a.quote.quote_date.cmp(&b.quote.quote_date))
                .then_with(|| a.quote.id.cmp(&b.quote.id))
        });

        ComparisonMatrix {
            specification: specification.cloned(),
            quotes: entries,
        }
    }
}
