//! Address canonicalisation and string similarity.
//!
//! [`normalize_address`] reduces a free-text postal address to its uppercased
//! street portion with common suffixes and directions abbreviated, so that
//! "123 Main Street, Springfield PA" and "123 MAIN ST, Springfield, PA"
//! compare equal. [`similarity`] scores two addresses on that canonical form.

use std::sync::LazyLock;

use regex::Regex;

/// Ordered whole-word substitutions applied by [`normalize_address`].
///
/// Each entry only matches after a space, so a leading house number is never
/// rewritten and `NORTHEAST` is not clobbered by the `NORTH` rule.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("STREET", "ST"),
    ("AVENUE", "AVE"),
    ("ROAD", "RD"),
    ("DRIVE", "DR"),
    ("BOULEVARD", "BLVD"),
    ("LANE", "LN"),
    ("COURT", "CT"),
    ("CIRCLE", "CIR"),
    ("HIGHWAY", "HWY"),
    ("NORTH", "N"),
    ("SOUTH", "S"),
    ("EAST", "E"),
    ("WEST", "W"),
    ("NORTHEAST", "NE"),
    ("NORTHWEST", "NW"),
    ("SOUTHEAST", "SE"),
    ("SOUTHWEST", "SW"),
];

struct AbbreviationRule {
    pattern: Regex,
    replacement: String,
}

static RULES: LazyLock<Vec<AbbreviationRule>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(word, abbr)| AbbreviationRule {
            pattern: Regex::new(&format!(r" {word}\b")).expect("valid abbreviation regex"),
            replacement: format!(" {abbr}"),
        })
        .collect()
});

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{5})(?:-[0-9]{4})?\b").expect("valid zip regex"));

/// Canonicalises an address for comparison.
///
/// Keeps only the text before the first comma, drops every character that is
/// not alphanumeric, whitespace or `-`, collapses
/// whitespace runs, and applies [`ABBREVIATIONS`] in order. An address with
/// no comma is normalized in full.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    let upper = address.to_uppercase();
    let street = upper.split(',').next().unwrap_or_default();

    let cleaned: String = street
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let mut collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    for rule in RULES.iter() {
        if rule.pattern.is_match(&collapsed) {
            collapsed = rule
                .pattern
                .replace_all(&collapsed, rule.replacement.as_str())
                .into_owned();
        }
    }

    collapsed.trim().to_owned()
}

/// Returns the 5-digit ZIP code from the leftmost ZIP or ZIP+4 in `address`.
///
/// Run on the raw address; normalization discards everything after the
/// first comma, which is usually where the ZIP lives.
#[must_use]
pub fn extract_zip(address: &str) -> Option<String> {
    ZIP_RE
        .captures(address)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Similarity of two addresses after [`normalize_address`], in `[0, 1]`.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    ratio(&normalize_address(a), &normalize_address(b))
}

/// Similarity of two business names, compared uppercased but otherwise raw.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    ratio(&a.to_uppercase(), &b.to_uppercase())
}

/// `2 * LCS(a, b) / (len(a) + len(b))` over chars. Two empty strings are
/// identical.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
