//! Tiered match decision between a source record and a search candidate.

use stationdb_core::{MatchDecision, MatchMethod};

use crate::normalizer::{extract_zip, name_similarity, similarity};

/// Address similarity at or above which a candidate is accepted outright.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;

/// Lowest address similarity that ZIP agreement can rescue.
pub const ZIP_RESCUE_FLOOR: f64 = 0.7;

/// Lowest name similarity that, with matching ZIPs, accepts a candidate.
pub const NAME_MATCH_FLOOR: f64 = 0.8;

/// Confidence discount applied to name-based matches.
pub const NAME_MATCH_DISCOUNT: f64 = 0.9;

/// Applies the match cascade: exact address, then address plus ZIP, then
/// name plus ZIP. The first tier that accepts wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddressMatcher {
    threshold: f64,
}

impl Default for AddressMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl AddressMatcher {
    /// Creates a matcher with a custom address-exact threshold, clamped to
    /// `[0, 1]`. A NaN threshold falls back to the default.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_MATCH_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decides whether `candidate_address` (and optionally name) refers to
    /// the same place as the source.
    ///
    /// Empty names count as not supplied. A rejected candidate carries the
    /// raw address similarity as its confidence.
    #[must_use]
    pub fn decide(
        &self,
        source_address: &str,
        candidate_address: &str,
        source_name: Option<&str>,
        candidate_name: Option<&str>,
    ) -> MatchDecision {
        let score = similarity(source_address, candidate_address);

        if score >= self.threshold {
            return MatchDecision {
                is_match: true,
                confidence: score,
                method: MatchMethod::AddressExact,
            };
        }

        let zips_agree = || match (extract_zip(source_address), extract_zip(candidate_address)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };

        if score >= ZIP_RESCUE_FLOOR && zips_agree() {
            return MatchDecision {
                is_match: true,
                confidence: (score + 1.0) / 2.0,
                method: MatchMethod::AddressZip,
            };
        }

        if let (Some(source_name), Some(candidate_name)) = (
            source_name.filter(|n| !n.is_empty()),
            candidate_name.filter(|n| !n.is_empty()),
        ) {
            let name_score = name_similarity(source_name, candidate_name);
            if name_score >= NAME_MATCH_FLOOR && zips_agree() {
                return MatchDecision {
                    is_match: true,
                    confidence: name_score * NAME_MATCH_DISCOUNT,
                    method: MatchMethod::NameZip,
                };
            }
        }

        MatchDecision {
            is_match: false,
            confidence: score,
            method: MatchMethod::NoMatch,
        }
    }
}
