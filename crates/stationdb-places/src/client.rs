//! HTTP client for the Places API (New).
//!
//! Wraps `reqwest` with API key and field-mask headers, typed response
//! deserialization, and retry on transient failures. Non-2xx responses are
//! surfaced as [`PlacesError::Api`] carrying the message from the API's
//! error envelope.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use stationdb_core::{AppConfig, CandidateDetails, CandidateSummary};

use crate::error::PlacesError;
use crate::normalize::{normalize_details, normalize_summary};
use crate::retry::{retry_with_backoff, Attempted};
use crate::types::{
    ApiErrorEnvelope, PlaceDetailsResponse, SearchTextRequest, SearchTextResponse,
};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

pub(crate) const SEARCH_FIELD_MASK: &str =
    "places.id,places.displayName,places.formattedAddress";

pub(crate) const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,\
nationalPhoneNumber,internationalPhoneNumber,websiteUri,googleMapsUri,rating,\
userRatingCount,businessStatus,types,currentOpeningHours,accessibilityOptions";

/// Client for the Places API text-search and place-details endpoints.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    language_code: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        let client = Self::with_base_url(
            &config.places_api_key,
            config.request_timeout_secs,
            config.max_retries,
            config.retry_backoff_base_ms,
            &config.places_base_url,
        )?;
        Ok(client.with_language_code(&config.language_code))
    }

    /// Sets the language code sent with text searches (default `"en"`).
    #[must_use]
    pub fn with_language_code(mut self, language_code: &str) -> Self {
        language_code.clone_into(&mut self.language_code);
        self
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("stationdb/0.1 (station-enrichment)")
            .build()?;

        let invalid = |reason: String| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let parsed =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an absolute http(s) URL".to_owned()));
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            language_code: "en".to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Runs a text search and returns the first hit, if any.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::RateLimited`] on HTTP 429 after retries.
    /// - [`PlacesError::Api`] on any other non-2xx status.
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn search_text(&self, query: &str) -> Result<Option<CandidateSummary>, PlacesError> {
        self.search_text_attempted(query).await.outcome
    }

    /// [`PlacesClient::search_text`], also reporting how many HTTP attempts
    /// the call took.
    pub async fn search_text_attempted(
        &self,
        query: &str,
    ) -> Attempted<Option<CandidateSummary>> {
        let url = self.endpoint(&["places:searchText"]);
        let body = SearchTextRequest {
            text_query: query,
            language_code: &self.language_code,
        };

        let attempted: Attempted<SearchTextResponse> = self
            .send_json(
                || {
                    self.client
                        .post(url.clone())
                        .header(FIELD_MASK_HEADER, SEARCH_FIELD_MASK)
                        .json(&body)
                },
                "places:searchText",
            )
            .await;

        attempted.map(|response| {
            tracing::debug!(query, hits = response.places.len(), "text search complete");
            response.places.into_iter().next().map(normalize_summary)
        })
    }

    /// Fetches the full details field set for one place.
    ///
    /// `place_id` must be the bare identifier, without a `places/` prefix.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search_text`].
    pub async fn place_details(&self, place_id: &str) -> Result<CandidateDetails, PlacesError> {
        self.place_details_attempted(place_id).await.outcome
    }

    /// [`PlacesClient::place_details`], also reporting how many HTTP attempts
    /// the call took.
    pub async fn place_details_attempted(&self, place_id: &str) -> Attempted<CandidateDetails> {
        let url = self.endpoint(&["places", place_id]);

        let attempted: Attempted<PlaceDetailsResponse> = self
            .send_json(
                || {
                    self.client
                        .get(url.clone())
                        .header(FIELD_MASK_HEADER, DETAILS_FIELD_MASK)
                },
                &format!("places/{place_id}"),
            )
            .await;

        attempted.map(normalize_details)
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_base_url` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends the request built by `build`, retrying transient failures, and
    /// decodes a 2xx body as `T`.
    async fn send_json<T, B>(&self, build: B, context: &str) -> Attempted<T>
    where
        T: DeserializeOwned,
        B: Fn() -> RequestBuilder,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let request = build().header(API_KEY_HEADER, &self.api_key);
            async move {
                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(PlacesError::RateLimited { retry_after_secs });
                }

                let body = response.text().await?;
                if !status.is_success() {
                    return Err(PlacesError::Api {
                        status: status.as_u16(),
                        message: api_error_message(&body),
                    });
                }

                serde_json::from_str::<T>(&body).map_err(|e| PlacesError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

/// Extracts `error.message` from an error envelope, falling back to a
/// truncated copy of the raw body.
fn api_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if let Some(message) = envelope.error.message {
            return match envelope.error.status {
                Some(status) => format!("{status}: {message}"),
                None => message,
            };
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_owned();
    }
    trimmed.chars().take(200).collect()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
