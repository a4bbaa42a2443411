//! Per-record enrichment workflow and batch driver.
//!
//! For each record: one text search, a match decision against the top hit,
//! and (only on a positive match) one details call. Every HTTP attempt is
//! charged, retries included. Failures end up in the record's `error` field and never
//! abort the batch.

use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use stationdb_core::{AppConfig, EnrichmentResult, SourceRecord, UnitCosts};
use stationdb_places::PlacesError;

use crate::matcher::{AddressMatcher, DEFAULT_MATCH_THRESHOLD};
use crate::traits::{DetailsClient, SearchClient};

const PLACE_ID_PREFIX: &str = "places/";

/// Knobs for an [`Enricher`], usually taken from [`AppConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichSettings {
    /// Qualifier appended to every search query.
    pub region: String,
    pub match_threshold: f64,
    pub unit_costs: UnitCosts,
    /// Records in flight at once during [`Enricher::enrich_batch`]. 1 keeps
    /// processing strictly sequential.
    pub max_concurrency: usize,
}

impl EnrichSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            region: config.region.clone(),
            match_threshold: config.match_threshold,
            unit_costs: config.unit_costs,
            max_concurrency: config.max_concurrent_records,
        }
    }
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            region: "Pennsylvania".to_owned(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            unit_costs: UnitCosts::default(),
            max_concurrency: 1,
        }
    }
}

/// Running totals across every record an [`Enricher`] has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub api_calls: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    pub records_processed: u64,
}

/// Why a record's workflow stopped early. Rendered into
/// [`EnrichmentResult::error`].
#[derive(Debug, thiserror::Error)]
pub(crate) enum RecordError {
    #[error("No results found in text search")]
    NoResults,

    #[error("Text search failed: {0}")]
    SearchFailed(#[source] PlacesError),

    #[error("Address mismatch (similarity: {similarity:.2})")]
    Mismatch { similarity: f64 },

    #[error("Matched candidate has no place id")]
    MissingPlaceId,

    #[error("Place details failed: {0}")]
    DetailsFailed(#[source] PlacesError),
}

/// Drives the search → match → details workflow over source records.
///
/// Holds the only cross-record state: aggregate call and cost totals, kept
/// behind a mutex so concurrent records cannot lose updates.
pub struct Enricher {
    search: Arc<dyn SearchClient>,
    details: Arc<dyn DetailsClient>,
    matcher: AddressMatcher,
    settings: EnrichSettings,
    totals: Mutex<RunTotals>,
}

impl Enricher {
    #[must_use]
    pub fn new(
        search: Arc<dyn SearchClient>,
        details: Arc<dyn DetailsClient>,
        settings: EnrichSettings,
    ) -> Self {
        Self {
            search,
            details,
            matcher: AddressMatcher::new(settings.match_threshold),
            settings,
            totals: Mutex::new(RunTotals::default()),
        }
    }

    /// Snapshot of the totals accumulated so far.
    #[must_use]
    pub fn totals(&self) -> RunTotals {
        *self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enriches one record. Never fails: every error path is recorded on the
    /// returned result along with whatever fields were already filled in.
    pub async fn enrich_one(&self, record: &SourceRecord) -> EnrichmentResult {
        let mut result = EnrichmentResult::new(record);

        if let Err(err) = self.run_workflow(record, &mut result).await {
            match &err {
                RecordError::SearchFailed(_)
                | RecordError::DetailsFailed(_)
                | RecordError::MissingPlaceId => {
                    tracing::warn!(name = %record.name, error = %err, "record enrichment failed");
                }
                _ => {
                    tracing::debug!(name = %record.name, reason = %err, "record not enriched");
                }
            }
            result.error = Some(err.to_string());
        }

        self.add_to_totals(&result);
        result
    }

    /// Enriches `records` and returns one result per record in input order.
    ///
    /// Up to `max_concurrency` records run at once; each record's search and
    /// details calls stay inside that record's own future.
    pub async fn enrich_batch(&self, records: &[SourceRecord]) -> Vec<EnrichmentResult> {
        let total = records.len();
        let concurrency = self.settings.max_concurrency.max(1);

        tracing::info!(records = total, concurrency, "starting enrichment batch");

        let results: Vec<EnrichmentResult> = stream::iter(records.iter().enumerate())
            .map(|(index, record)| async move {
                let result = self.enrich_one(record).await;
                tracing::info!(
                    record = index + 1,
                    total,
                    name = %record.name,
                    matched = result.matched,
                    method = %result.match_method,
                    confidence = result.confidence,
                    cost = %result.total_cost,
                    "processed record"
                );
                result
            })
            .buffered(concurrency)
            .collect()
            .await;

        let totals = self.totals();
        tracing::info!(
            records = total,
            api_calls = totals.api_calls,
            total_cost = %totals.total_cost,
            "enrichment batch complete"
        );
        results
    }

    async fn run_workflow(
        &self,
        record: &SourceRecord,
        result: &mut EnrichmentResult,
    ) -> Result<(), RecordError> {
        let costs = &self.settings.unit_costs;

        let query = search_query(record, &self.settings.region);
        let searched = self.search.search_attempted(&query).await;
        charge_attempts(result, searched.attempts, costs.text_search);
        let candidate = searched
            .outcome
            .map_err(RecordError::SearchFailed)?
            .ok_or(RecordError::NoResults)?;

        let decision = self.matcher.decide(
            &record.address,
            candidate.formatted_address.as_deref().unwrap_or_default(),
            Some(record.name.as_str()),
            candidate.name.as_deref(),
        );
        result.record_decision(decision);
        if !decision.is_match {
            return Err(RecordError::Mismatch {
                similarity: decision.confidence,
            });
        }

        let place_id = strip_place_prefix(&candidate.id);
        if place_id.is_empty() {
            return Err(RecordError::MissingPlaceId);
        }

        let fetched = self.details.fetch_details_attempted(place_id).await;
        charge_attempts(result, fetched.attempts, costs.details());
        let details = fetched.outcome.map_err(RecordError::DetailsFailed)?;
        result.apply_details(place_id, details);
        Ok(())
    }

    fn add_to_totals(&self, result: &EnrichmentResult) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.api_calls += u64::from(result.api_calls);
        totals.total_cost += result.total_cost;
        totals.records_processed += 1;
    }
}

/// Charges `result` once per attempt, with a floor of one.
fn charge_attempts(result: &mut EnrichmentResult, attempts: u32, unit_cost: Decimal) {
    for _ in 0..attempts.max(1) {
        result.charge(unit_cost);
    }
}

/// Builds the text-search query for a record: name, address and region,
/// comma separated, skipping blank parts.
#[must_use]
pub fn search_query(record: &SourceRecord, region: &str) -> String {
    [record.name.as_str(), record.address.as_str(), region]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Removes the `places/` resource prefix some responses put on ids.
#[must_use]
pub fn strip_place_prefix(id: &str) -> &str {
    id.strip_prefix(PLACE_ID_PREFIX).unwrap_or(id)
}

#[cfg(test)]
#[path = "enricher_test.rs"]
mod tests;
