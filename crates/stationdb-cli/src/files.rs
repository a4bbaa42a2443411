//! Station CSV input and atomic JSON output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stationdb_core::SourceRecord;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column(s): {}", .path.display(), .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("invalid station row {row} in {}: {source}", .path.display())]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode JSON for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Header names every station list must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Station Name",
    "Station Address",
    "Phone Number",
    "County Name",
];

/// One row of the station list as exported by the state registry.
#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "Station Name")]
    name: String,
    #[serde(rename = "Station Address")]
    address: String,
    #[serde(rename = "Phone Number")]
    phone: String,
    #[serde(rename = "County Name")]
    county: String,
}

impl From<StationRow> for SourceRecord {
    fn from(row: StationRow) -> Self {
        Self {
            name: row.name,
            address: row.address,
            phone: row.phone,
            county: row.county,
        }
    }
}

/// Reads the whole station CSV into memory. Cells are trimmed; empty cells
/// become empty strings.
///
/// # Errors
///
/// Returns [`InputError::Open`] if the file cannot be opened,
/// [`InputError::MissingColumns`] if the header row lacks any of
/// [`REQUIRED_COLUMNS`], and [`InputError::Row`] for the first row that
/// fails to parse.
pub fn load_stations(path: &Path) -> Result<Vec<SourceRecord>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader.headers().map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| (*column).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    reader
        .deserialize::<StationRow>()
        .enumerate()
        .map(|(index, row)| {
            row.map(SourceRecord::from).map_err(|source| InputError::Row {
                path: path.to_path_buf(),
                row: index + 1,
                source,
            })
        })
        .collect()
}

/// Writes `value` as pretty JSON to `path` via a sibling temp file and a
/// rename, so readers never see a half-written file.
///
/// # Errors
///
/// Returns [`InputError::Encode`] if serialization fails or
/// [`InputError::Write`] if the temp file cannot be written or renamed.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), InputError>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec_pretty(value).map_err(|source| InputError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let temp_path = temp_path_for(path);
    let write_err = |source| InputError::Write {
        path: path.to_path_buf(),
        source,
    };

    std::fs::write(&temp_path, body).map_err(write_err)?;
    if let Err(source) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(write_err(source));
    }

    tracing::debug!(path = %path.display(), "wrote JSON output");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_else(|| "output".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_by_header_name() {
        let file = csv_file(
            "County Name,Station Name,Station Address,Phone Number\n\
             Delaware, Sunoco ,\"123 Main Street, Springfield PA 19064\",610-555-0100\n\
             Erie,Gulf,\"1 State St, Erie PA 16501\",\n",
        );

        let records = load_stations(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Sunoco");
        assert_eq!(records[0].address, "123 Main Street, Springfield PA 19064");
        assert_eq!(records[0].county, "Delaware");
        assert_eq!(records[1].phone, "");
    }

    #[test]
    fn unrecognised_headers_are_rejected_before_any_row() {
        let file = csv_file(
            "Name,Address,Phone,County\n\
             Sunoco,\"1 Main St, Erie PA 16501\",555,Erie\n\
             Gulf,\"1 State St, Erie PA 16501\",556,Erie\n",
        );
        let err = load_stations(file.path()).unwrap_err();
        match err {
            InputError::MissingColumns { columns, .. } => {
                assert_eq!(columns, REQUIRED_COLUMNS.map(str::to_owned));
            }
            other => panic!("expected missing columns, got: {other}"),
        }
    }

    #[test]
    fn partially_missing_headers_name_only_the_absent_ones() {
        let file = csv_file("Station Name,Station Address\nGulf,1 State St\n");
        let err = load_stations(file.path()).unwrap_err();
        assert!(
            matches!(
                &err,
                InputError::MissingColumns { columns, .. }
                    if columns == &["Phone Number", "County Name"]
            ),
            "got: {err}"
        );
        assert!(err.to_string().contains("Phone Number, County Name"));
    }

    #[test]
    fn ragged_row_reports_its_position() {
        let file = csv_file(
            "Station Name,Station Address,Phone Number,County Name\n\
             Gulf,1 State St,,Erie\n\
             Wawa\n",
        );
        let err = load_stations(file.path()).unwrap_err();
        assert!(matches!(err, InputError::Row { row: 2, .. }), "got: {err}");
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_stations(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, InputError::Open { .. }));
    }

    #[test]
    fn write_json_atomic_replaces_target_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "stale").unwrap();

        write_json_atomic(&path, &serde_json::json!([{ "matched": true }])).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["matched"], true);
        assert!(!dir.path().join("results.json.tmp").exists());
    }

    #[test]
    fn write_json_atomic_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("results.json");
        let err = write_json_atomic(&path, &Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, InputError::Write { .. }));
    }
}
