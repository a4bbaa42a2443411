//! Collaborator seams for the enrichment workflow.
//!
//! The enricher only talks to the place-search API through these traits, so
//! tests can drive it with in-memory mocks that count calls.

use async_trait::async_trait;
use stationdb_core::{CandidateDetails, CandidateSummary};
use stationdb_places::{Attempted, PlacesClient, PlacesError};

/// Free-text search returning at most one best-guess candidate.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Returns the top candidate for `query`, or `None` when nothing matched.
    async fn search(&self, query: &str) -> Result<Option<CandidateSummary>, PlacesError>;

    /// Like [`SearchClient::search`], but also reports how many billable
    /// attempts the call took. Clients that never retry keep the default.
    async fn search_attempted(&self, query: &str) -> Attempted<Option<CandidateSummary>> {
        Attempted::once(self.search(query).await)
    }
}

/// Full field set lookup for a single candidate.
#[async_trait]
pub trait DetailsClient: Send + Sync {
    /// `place_id` is the bare identifier, without any `places/` prefix.
    async fn fetch_details(&self, place_id: &str) -> Result<CandidateDetails, PlacesError>;

    /// Like [`DetailsClient::fetch_details`], but also reports how many
    /// billable attempts the call took.
    async fn fetch_details_attempted(&self, place_id: &str) -> Attempted<CandidateDetails> {
        Attempted::once(self.fetch_details(place_id).await)
    }
}

#[async_trait]
impl SearchClient for PlacesClient {
    async fn search(&self, query: &str) -> Result<Option<CandidateSummary>, PlacesError> {
        self.search_text(query).await
    }

    async fn search_attempted(&self, query: &str) -> Attempted<Option<CandidateSummary>> {
        self.search_text_attempted(query).await
    }
}

#[async_trait]
impl DetailsClient for PlacesClient {
    async fn fetch_details(&self, place_id: &str) -> Result<CandidateDetails, PlacesError> {
        self.place_details(place_id).await
    }

    async fn fetch_details_attempted(&self, place_id: &str) -> Attempted<CandidateDetails> {
        self.place_details_attempted(place_id).await
    }
}
