use serde::{Deserialize, Serialize};

/// Which tier of the match cascade produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// No candidate was evaluated for this record.
    NotAttempted,
    AddressExact,
    AddressZip,
    NameZip,
    NoMatch,
}

impl MatchMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMethod::NotAttempted => "not_attempted",
            MatchMethod::AddressExact => "address_exact",
            MatchMethod::AddressZip => "address_zip",
            MatchMethod::NameZip => "name_zip",
            MatchMethod::NoMatch => "no_match",
        }
    }

    /// `true` for the three tiers that accept a candidate.
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            MatchMethod::AddressExact | MatchMethod::AddressZip | MatchMethod::NameZip
        )
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing a source record against a candidate.
///
/// `confidence` is a score in `[0, 1]`, not a probability; each tier computes
/// it differently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub is_match: bool,
    pub confidence: f64,
    pub method: MatchMethod,
}
