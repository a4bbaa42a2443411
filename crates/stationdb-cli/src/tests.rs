use super::*;

#[test]
fn parses_enrich_command() {
    let cli = Cli::try_parse_from([
        "stationdb-cli",
        "enrich",
        "--input",
        "stations.csv",
        "--output",
        "enriched.json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Enrich {
            input,
            output,
            limit,
            summary,
            dry_run,
        } => {
            assert_eq!(input, PathBuf::from("stations.csv"));
            assert_eq!(output, PathBuf::from("enriched.json"));
            assert!(limit.is_none());
            assert!(summary.is_none());
            assert!(!dry_run);
        }
        other => panic!("expected enrich, got {other:?}"),
    }
}

#[test]
fn parses_enrich_limit_summary_and_dry_run() {
    let cli = Cli::try_parse_from([
        "stationdb-cli",
        "enrich",
        "--input",
        "stations.csv",
        "--output",
        "enriched.json",
        "--limit",
        "10",
        "--summary",
        "summary.json",
        "--dry-run",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Enrich {
            limit: Some(10),
            summary: Some(ref s),
            dry_run: true,
            ..
        } if s == &PathBuf::from("summary.json")
    ));
}

#[test]
fn enrich_requires_input_and_output() {
    assert!(Cli::try_parse_from(["stationdb-cli", "enrich", "--input", "a.csv"]).is_err());
    assert!(Cli::try_parse_from(["stationdb-cli", "enrich", "--output", "a.json"]).is_err());
}

#[test]
fn parses_match_command_with_default_threshold() {
    let cli = Cli::try_parse_from([
        "stationdb-cli",
        "match",
        "--source-address",
        "123 Main Street, Springfield PA 19064",
        "--candidate-address",
        "123 Main St, Springfield, PA 19064",
    ])
    .unwrap();

    match cli.command {
        Commands::Match {
            source_name,
            threshold,
            ..
        } => {
            assert!(source_name.is_none());
            assert!((threshold - DEFAULT_MATCH_THRESHOLD).abs() < f64::EPSILON);
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn match_rejects_out_of_range_threshold() {
    let result = Cli::try_parse_from([
        "stationdb-cli",
        "match",
        "--source-address",
        "a",
        "--candidate-address",
        "b",
        "--threshold",
        "1.5",
    ]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["stationdb-cli"]).is_err());
}
