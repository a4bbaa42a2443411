//! Station enrichment: address matching, the search → match → details
//! workflow, and batch statistics.
//!
//! The place-search API is reached only through the [`SearchClient`] and
//! [`DetailsClient`] traits, which `stationdb_places::PlacesClient`
//! implements.

pub mod enricher;
pub mod matcher;
pub mod normalizer;
pub mod summary;
pub mod traits;

pub use enricher::{search_query, strip_place_prefix, EnrichSettings, Enricher, RunTotals};
pub use matcher::{AddressMatcher, DEFAULT_MATCH_THRESHOLD};
pub use normalizer::{extract_zip, name_similarity, normalize_address, similarity, ABBREVIATIONS};
pub use summary::{BatchSummary, Completeness, FieldCompleteness};
pub use traits::{DetailsClient, SearchClient};
