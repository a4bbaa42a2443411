//! Aggregate statistics over a finished batch.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use stationdb_core::{EnrichmentResult, MatchMethod};

/// How many matched records carry a given field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldCompleteness {
    pub present: usize,
    pub total: usize,
}

impl FieldCompleteness {
    fn tally<'a, I>(results: I, has_field: impl Fn(&EnrichmentResult) -> bool) -> Self
    where
        I: IntoIterator<Item = &'a EnrichmentResult>,
    {
        results
            .into_iter()
            .fold(Self::default(), |mut acc, result| {
                acc.total += 1;
                if has_field(result) {
                    acc.present += 1;
                }
                acc
            })
    }

    /// Share of records with the field present; `0.0` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 / self.total as f64
        }
    }
}

/// Completeness of the contact and quality fields over matched records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completeness {
    pub phone: FieldCompleteness,
    pub website: FieldCompleteness,
    pub opening_hours: FieldCompleteness,
    pub rating: FieldCompleteness,
}

/// Match rate, confidence, cost and completeness for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub match_rate: f64,
    /// Mean confidence over matched records.
    pub average_confidence: f64,
    /// Matched records per accepting tier.
    pub method_counts: BTreeMap<MatchMethod, usize>,
    pub total_api_calls: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_cost_per_record: Decimal,
    /// Record count the average cost is projected onto.
    pub projection_records: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub projected_cost: Decimal,
    pub completeness: Completeness,
}

impl BatchSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[EnrichmentResult], projection_records: usize) -> Self {
        let total_records = results.len();
        let matched: Vec<&EnrichmentResult> = results.iter().filter(|r| r.matched).collect();

        let mut method_counts: BTreeMap<MatchMethod, usize> = [
            MatchMethod::AddressExact,
            MatchMethod::AddressZip,
            MatchMethod::NameZip,
        ]
        .into_iter()
        .map(|method| (method, 0))
        .collect();
        for result in &matched {
            *method_counts.entry(result.match_method).or_insert(0) += 1;
        }

        let match_rate = if total_records == 0 {
            0.0
        } else {
            matched.len() as f64 / total_records as f64
        };
        let average_confidence = if matched.is_empty() {
            0.0
        } else {
            matched.iter().map(|r| r.confidence).sum::<f64>() / matched.len() as f64
        };

        let total_api_calls = results.iter().map(|r| u64::from(r.api_calls)).sum();
        let total_cost: Decimal = results.iter().map(|r| r.total_cost).sum();
        let average_cost_per_record = if total_records == 0 {
            Decimal::ZERO
        } else {
            total_cost / Decimal::from(total_records)
        };

        let completeness = Completeness {
            phone: FieldCompleteness::tally(matched.iter().copied(), |r| r.place_phone.is_some()),
            website: FieldCompleteness::tally(matched.iter().copied(), |r| r.website.is_some()),
            opening_hours: FieldCompleteness::tally(matched.iter().copied(), |r| {
                r.opening_hours.is_some()
            }),
            rating: FieldCompleteness::tally(matched.iter().copied(), |r| r.rating.is_some()),
        };

        Self {
            total_records,
            matched: matched.len(),
            unmatched: total_records - matched.len(),
            match_rate,
            average_confidence,
            method_counts,
            total_api_calls,
            total_cost,
            average_cost_per_record,
            projection_records,
            projected_cost: average_cost_per_record * Decimal::from(projection_records),
            completeness,
        }
    }
}
