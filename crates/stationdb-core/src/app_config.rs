use crate::costs::UnitCosts;

#[derive(Clone)]
pub struct AppConfig {
    pub places_api_key: String,
    pub places_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Qualifier appended to every text-search query (e.g. `"Pennsylvania"`).
    pub region: String,
    pub language_code: String,
    /// Minimum normalized-address similarity for an `address_exact` match.
    pub match_threshold: f64,
    pub max_concurrent_records: usize,
    /// Record count the per-record average cost is projected onto.
    pub projection_records: usize,
    pub unit_costs: UnitCosts,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("region", &self.region)
            .field("language_code", &self.language_code)
            .field("match_threshold", &self.match_threshold)
            .field("max_concurrent_records", &self.max_concurrent_records)
            .field("projection_records", &self.projection_records)
            .field("unit_costs", &self.unit_costs)
            .finish()
    }
}
