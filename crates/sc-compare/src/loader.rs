//! Recorded trajectories on disk.
//!
//! Files are comma-delimited with one header row. Column 0 is time; the
//! output column is selected by index or by header name.

use std::fmt;
use std::path::Path;

use sc_core::Trajectory;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CompareError, CompareResult};

/// Which column of a recorded file holds the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Index(1)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(i) => write!(f, "#{i}"),
            ColumnSelector::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl From<&str> for ColumnSelector {
    /// Numeric text selects by index, anything else by header name.
    fn from(s: &str) -> Self {
        match s.trim().parse::<usize>() {
            Ok(i) => ColumnSelector::Index(i),
            Err(_) => ColumnSelector::Name(s.trim().to_string()),
        }
    }
}

impl ColumnSelector {
    fn resolve(&self, headers: &csv::StringRecord) -> Option<usize> {
        match self {
            ColumnSelector::Index(i) => (*i < headers.len()).then_some(*i),
            ColumnSelector::Name(name) => headers.iter().position(|h| h == name),
        }
    }
}

/// Load `(time, output)` from a recorded CSV file.
pub fn load_trajectory(path: &Path, column: &ColumnSelector) -> CompareResult<Trajectory> {
    let display = path.display().to_string();
    let csv_err = |source| CompareError::Csv {
        path: display.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let index = column
        .resolve(&headers)
        .ok_or_else(|| CompareError::MissingColumn {
            path: display.clone(),
            column: column.to_string(),
        })?;

    let mut time = Vec::new();
    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        // Header is line 1.
        let line = row + 2;
        let field = |i: usize| -> CompareResult<f64> {
            let raw = record.get(i).ok_or_else(|| CompareError::MissingColumn {
                path: display.clone(),
                column: format!("{column} (row {line})"),
            })?;
            raw.parse::<f64>().map_err(|_| CompareError::Parse {
                path: display.clone(),
                row: line,
                value: raw.to_string(),
            })
        };
        time.push(field(0)?);
        values.push(field(index)?);
    }

    debug!(path = %path.display(), samples = time.len(), column = index, "loaded trajectory");
    Trajectory::new(time, values).map_err(|source| CompareError::Trajectory {
        path: display,
        source,
    })
}

/// Write `traj` as a two-column CSV file with the given headers.
pub fn write_trajectory(path: &Path, traj: &Trajectory, headers: [&str; 2]) -> CompareResult<()> {
    let display = path.display().to_string();
    let csv_err = |source| CompareError::Csv {
        path: display.clone(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(headers).map_err(csv_err)?;
    for (t, y) in traj.samples() {
        writer
            .write_record([t.to_string(), y.to_string()])
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("sc_compare_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_column_is_second() {
        let path = fixture("default.csv", "t,y\n0,0\n0.5,0.25\n1,1\n");
        let traj = load_trajectory(&path, &ColumnSelector::default()).unwrap();
        assert_eq!(traj.time(), &[0.0, 0.5, 1.0]);
        assert_eq!(traj.values(), &[0.0, 0.25, 1.0]);
    }

    #[test]
    fn select_by_name_and_index() {
        let path = fixture("named.csv", "t, input, output\n0, 1, 0\n1, 1, 0.5\n");
        let by_name = load_trajectory(&path, &ColumnSelector::from("output")).unwrap();
        assert_eq!(by_name.values(), &[0.0, 0.5]);
        let by_index = load_trajectory(&path, &ColumnSelector::from("1")).unwrap();
        assert_eq!(by_index.values(), &[1.0, 1.0]);
    }

    #[test]
    fn missing_column() {
        let path = fixture("narrow.csv", "t,y\n0,0\n1,1\n");
        let err = load_trajectory(&path, &ColumnSelector::Index(3)).unwrap_err();
        assert!(matches!(err, CompareError::MissingColumn { .. }));
        let err = load_trajectory(&path, &ColumnSelector::from("output")).unwrap_err();
        assert!(matches!(err, CompareError::MissingColumn { .. }));
    }

    #[test]
    fn unparsable_value() {
        let path = fixture("garbage.csv", "t,y\n0,0\n1,abc\n");
        match load_trajectory(&path, &ColumnSelector::default()).unwrap_err() {
            CompareError::Parse { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_increasing_time() {
        let path = fixture("backwards.csv", "t,y\n0,0\n1,1\n1,2\n");
        let err = load_trajectory(&path, &ColumnSelector::default()).unwrap_err();
        assert!(matches!(err, CompareError::Trajectory { .. }));
    }

    #[test]
    fn unreadable_file() {
        let path = std::env::temp_dir().join("sc_compare_loader_test_missing/none.csv");
        let err = load_trajectory(&path, &ColumnSelector::default()).unwrap_err();
        assert!(matches!(err, CompareError::Csv { .. }));
    }

    #[test]
    fn written_file_loads_back() {
        let dir = std::env::temp_dir().join("sc_compare_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("written.csv");
        let traj = Trajectory::new(vec![0.0, 0.1, 0.2], vec![0.0, 0.3, 0.45]).unwrap();
        write_trajectory(&path, &traj, ["t", "output"]).unwrap();
        let back = load_trajectory(&path, &ColumnSelector::from("output")).unwrap();
        assert_eq!(back, traj);
    }

    #[test]
    fn selector_deserializes_from_number_or_name() {
        let idx: ColumnSelector = serde_json::from_str("2").unwrap();
        assert_eq!(idx, ColumnSelector::Index(2));
        let name: ColumnSelector = serde_json::from_str("\"output\"").unwrap();
        assert_eq!(name, ColumnSelector::Name("output".into()));
    }
}
