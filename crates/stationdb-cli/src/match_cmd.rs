//! `match` command handler: score one address pair offline.

use std::fmt::Write as _;

use stationdb_enrich::{
    extract_zip, name_similarity, normalize_address, similarity, AddressMatcher,
};

pub(crate) struct MatchArgs<'a> {
    pub source_address: &'a str,
    pub candidate_address: &'a str,
    pub source_name: Option<&'a str>,
    pub candidate_name: Option<&'a str>,
    pub threshold: f64,
}

/// Parse a `--threshold` value, rejecting anything outside `[0, 1]`.
pub(crate) fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("expected a number between 0 and 1: {e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside 0..=1"))
    }
}

pub(crate) fn run_match(args: &MatchArgs<'_>) {
    print!("{}", render_match(args));
}

fn zip_or_none(address: &str) -> String {
    extract_zip(address).unwrap_or_else(|| "none".to_owned())
}

pub(crate) fn render_match(args: &MatchArgs<'_>) -> String {
    let decision = AddressMatcher::new(args.threshold).decide(
        args.source_address,
        args.candidate_address,
        args.source_name,
        args.candidate_name,
    );

    let mut out = String::new();
    let _ = writeln!(
        out,
        "source:     {:?} (zip {})",
        normalize_address(args.source_address),
        zip_or_none(args.source_address)
    );
    let _ = writeln!(
        out,
        "candidate:  {:?} (zip {})",
        normalize_address(args.candidate_address),
        zip_or_none(args.candidate_address)
    );
    let _ = writeln!(
        out,
        "address similarity: {:.4}",
        similarity(args.source_address, args.candidate_address)
    );
    if let (Some(a), Some(b)) = (args.source_name, args.candidate_name) {
        let _ = writeln!(out, "name similarity:    {:.4}", name_similarity(a, b));
    }
    let _ = writeln!(
        out,
        "decision: matched={} method={} confidence={:.4} (threshold {:.2})",
        decision.is_match, decision.method, decision.confidence, args.threshold
    );
    out
}
