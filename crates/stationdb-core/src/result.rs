//! Per-record output of an enrichment run.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::matching::{MatchDecision, MatchMethod};
use crate::records::{CandidateDetails, OpeningHours, SourceRecord};

/// One output row per input record, in input order.
///
/// Built up through the workflow stages of a single record and not touched
/// again once that record finishes. Place fields stay `None` unless a
/// positive match was followed by a successful details call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentResult {
    pub source_name: String,
    pub source_address: String,
    pub source_phone: String,
    pub source_county: String,

    pub matched: bool,
    pub confidence: f64,
    pub match_method: MatchMethod,

    pub place_id: Option<String>,
    pub place_name: Option<String>,
    pub place_address: Option<String>,
    pub place_phone: Option<String>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub business_status: Option<String>,
    pub types: Option<Vec<String>>,
    pub opening_hours: Option<OpeningHours>,
    pub wheelchair_accessible: Option<bool>,

    /// External calls made for this record alone.
    pub api_calls: u32,
    /// Cost of this record's calls alone.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,

    pub error: Option<String>,
}

impl EnrichmentResult {
    /// A fresh, unmatched result carrying a copy of the source fields.
    #[must_use]
    pub fn new(record: &SourceRecord) -> Self {
        Self {
            source_name: record.name.clone(),
            source_address: record.address.clone(),
            source_phone: record.phone.clone(),
            source_county: record.county.clone(),
            matched: false,
            confidence: 0.0,
            match_method: MatchMethod::NotAttempted,
            place_id: None,
            place_name: None,
            place_address: None,
            place_phone: None,
            website: None,
            maps_url: None,
            rating: None,
            rating_count: None,
            business_status: None,
            types: None,
            opening_hours: None,
            wheelchair_accessible: None,
            api_calls: 0,
            total_cost: Decimal::ZERO,
            error: None,
        }
    }

    /// Count one external call and its cost against this record.
    pub fn charge(&mut self, cost: Decimal) {
        self.api_calls = self.api_calls.saturating_add(1);
        self.total_cost += cost;
    }

    pub fn record_decision(&mut self, decision: MatchDecision) {
        self.matched = decision.is_match;
        self.confidence = decision.confidence;
        self.match_method = decision.method;
    }

    /// Copy the fetched place fields onto the result. Fields missing from
    /// `details` stay `None`.
    pub fn apply_details(&mut self, place_id: &str, details: CandidateDetails) {
        self.place_id = Some(place_id.to_owned());
        self.place_phone = details.phone().map(str::to_owned);
        self.wheelchair_accessible = details.wheelchair_accessible();
        self.place_name = details.name;
        self.place_address = details.formatted_address;
        self.website = details.website;
        self.maps_url = details.maps_url;
        self.rating = details.rating;
        self.rating_count = details.rating_count;
        self.business_status = details.business_status;
        self.types = details.types;
        self.opening_hours = details.opening_hours;
    }
}
