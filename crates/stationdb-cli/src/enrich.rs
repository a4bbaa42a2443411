//! `enrich` command handler.
//!
//! Loads the station list, runs it through the enricher, and writes the
//! per-record results plus an optional summary document. Per-record
//! failures live in the results; only setup and output errors abort.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use stationdb_core::{AppConfig, SourceRecord};
use stationdb_enrich::{
    search_query, BatchSummary, DetailsClient, EnrichSettings, Enricher, FieldCompleteness,
    SearchClient,
};
use stationdb_places::PlacesClient;

use crate::files::{load_stations, write_json_atomic};

pub(crate) struct EnrichArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub limit: Option<usize>,
    pub summary: Option<&'a Path>,
    pub dry_run: bool,
}

/// Run an enrichment batch.
///
/// When `dry_run` is `true` the function prints the queries that would be
/// issued and the worst-case cost, and returns without calling the API.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the places client cannot be
/// built, or an output file cannot be written.
pub(crate) async fn run_enrich(config: &AppConfig, args: &EnrichArgs<'_>) -> anyhow::Result<()> {
    let mut records = load_stations(args.input)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }
    tracing::info!(
        input = %args.input.display(),
        records = records.len(),
        "loaded station list"
    );

    let settings = EnrichSettings::from_config(config);

    if args.dry_run {
        print!("{}", render_dry_run(&records, &settings));
        return Ok(());
    }

    let client = Arc::new(
        PlacesClient::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?,
    );
    let enricher = Enricher::new(
        Arc::clone(&client) as Arc<dyn SearchClient>,
        client as Arc<dyn DetailsClient>,
        settings,
    );

    let results = enricher.enrich_batch(&records).await;
    write_json_atomic(args.output, &results)?;
    tracing::info!(output = %args.output.display(), records = results.len(), "wrote results");

    let summary = BatchSummary::from_results(&results, config.projection_records);
    if let Some(path) = args.summary {
        write_json_atomic(path, &summary)?;
        tracing::info!(output = %path.display(), "wrote summary");
    }

    print!("{}", render_summary(&summary));
    Ok(())
}

pub(crate) fn render_dry_run(records: &[SourceRecord], settings: &EnrichSettings) -> String {
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{}/{}] {}",
            index + 1,
            records.len(),
            search_query(record, &settings.region)
        );
    }
    let max_cost = settings.unit_costs.max_per_record() * Decimal::from(records.len());
    let _ = writeln!(
        out,
        "dry-run: {} records, at most {} API calls, max cost ${}",
        records.len(),
        records.len() * 2,
        max_cost.round_dp(4)
    );
    out
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn completeness_line(out: &mut String, label: &str, field: FieldCompleteness) {
    let _ = writeln!(
        out,
        "    {label:<18}{}/{} ({})",
        field.present,
        field.total,
        percent(field.ratio())
    );
}

pub(crate) fn render_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Enrichment summary");
    let _ = writeln!(out, "  Records:            {}", summary.total_records);
    let _ = writeln!(
        out,
        "  Matched:            {} ({})",
        summary.matched,
        percent(summary.match_rate)
    );
    let _ = writeln!(out, "  Unmatched:          {}", summary.unmatched);
    let _ = writeln!(
        out,
        "  Average confidence: {:.3}",
        summary.average_confidence
    );
    let _ = writeln!(out, "  Match methods:");
    for (method, count) in &summary.method_counts {
        let _ = writeln!(out, "    {:<18}{count}", method.as_str());
    }
    let _ = writeln!(out, "  API calls:          {}", summary.total_api_calls);
    let _ = writeln!(out, "  Total cost:         ${}", summary.total_cost.round_dp(4));
    let _ = writeln!(
        out,
        "  Avg cost/record:    ${}",
        summary.average_cost_per_record.round_dp(4)
    );
    let _ = writeln!(
        out,
        "  Projected cost:     ${} for {} records",
        summary.projected_cost.round_dp(2),
        summary.projection_records
    );
    let _ = writeln!(out, "  Completeness (matched records):");
    completeness_line(&mut out, "phone", summary.completeness.phone);
    completeness_line(&mut out, "website", summary.completeness.website);
    completeness_line(&mut out, "opening_hours", summary.completeness.opening_hours);
    completeness_line(&mut out, "rating", summary.completeness.rating);
    out
}
