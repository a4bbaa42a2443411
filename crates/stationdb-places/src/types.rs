//! Wire types for the Places API (New) `places:searchText` and
//! `places/{id}` endpoints.
//!
//! Every response field is optional: the API omits any field that is empty
//! for a place or was not requested in the field mask. Omitted fields stay
//! `None` and are never replaced with placeholder values.

use serde::{Deserialize, Serialize};
use stationdb_core::{AccessibilityOptions, OpeningHours};

/// Request body for `POST /places:searchText`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest<'a> {
    pub text_query: &'a str,
    pub language_code: &'a str,
}

/// Response from `POST /places:searchText`.
///
/// `places` is omitted entirely (not sent as `[]`) when nothing matched.
#[derive(Debug, Deserialize)]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<PlaceSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    #[serde(default)]
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
}

/// Response from `GET /places/{id}` with the details field mask.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsResponse {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website_uri: Option<String>,
    pub google_maps_uri: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    /// `OPERATIONAL`, `CLOSED_TEMPORARILY`, or `CLOSED_PERMANENTLY`.
    pub business_status: Option<String>,
    pub types: Option<Vec<String>>,
    pub current_opening_hours: Option<OpeningHours>,
    pub accessibility_options: Option<AccessibilityOptions>,
}

/// `{"text": "...", "languageCode": "en"}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}
