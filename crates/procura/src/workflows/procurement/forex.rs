use chrono::NaiveDate;

use super::domain::RateRecord;

/// Pivot currency used for cross-rate composition and all cost aggregation.
pub const REFERENCE_CURRENCY: &str = "USD";

pub(crate) fn canonical_currency(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Source of directed exchange rates. Implementations must return the most
/// recent rate whose effective date is on or before `as_of`, never a newer
/// one, and never interpolate between dated records.
pub trait RateSource {
    fn rate(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64>;
}

impl<R: RateSource + ?Sized> RateSource for &R {
    fn rate(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64> {
        (**self).rate(from, to, as_of)
    }
}

impl<R: RateSource + ?Sized> RateSource for std::sync::Arc<R> {
    fn rate(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64> {
        (**self).rate(from, to, as_of)
    }
}

/// In-memory rate source over a flat list of dated records.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    records: Vec<RateRecord>,
}

impl RateTable {
    pub fn new(records: Vec<RateRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: RateRecord) {
        self.records.push(RateRecord {
            from: canonical_currency(&record.from),
            to: canonical_currency(&record.to),
            ..record
        });
    }
}

impl RateSource for RateTable {
    fn rate(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                record.from == from && record.to == to && record.effective <= as_of
            })
            // Later insertions win among records sharing an effective date.
            .max_by_key(|(index, record)| (record.effective, *index))
            .map(|(_, record)| record.rate)
    }
}

/// Result of normalizing an amount into a target currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub rate: f64,
}

/// Raised when no applicable rate path exists; callers treat the affected
/// quote as unconvertible rather than failing the whole computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("no exchange rate published for {from}->{to} on or before {as_of}")]
    MissingRate {
        from: String,
        to: String,
        as_of: NaiveDate,
    },
}

/// Converts amounts between currencies using the latest applicable rate,
/// composing through the reference currency when no direct rate exists.
#[derive(Debug, Clone)]
pub struct CurrencyNormalizer<R> {
    source: R,
}

impl<R: RateSource> CurrencyNormalizer<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        as_of: NaiveDate,
    ) -> Result<Conversion, ConversionError> {
        let from = canonical_currency(from);
        let to = canonical_currency(to);

        if from == to {
            return Ok(Conversion { amount, rate: 1.0 });
        }

        if let Some(rate) = self.source.rate(&from, &to, as_of) {
            return Ok(Conversion {
                amount: amount * rate,
                rate,
            });
        }

        let inbound = self.hop(&from, REFERENCE_CURRENCY, as_of);
        let outbound = self.hop(REFERENCE_CURRENCY, &to, as_of);
        match (inbound, outbound) {
            (Some(first), Some(second)) => {
                let rate = first * second;
                Ok(Conversion {
                    amount: amount * rate,
                    rate,
                })
            }
            _ => Err(ConversionError::MissingRate { from, to, as_of }),
        }
    }

    fn hop(&self, from: &str, to: &str, as_of: NaiveDate) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }
        self.source.rate(from, to, as_of)
    }
}
