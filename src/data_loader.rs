use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{ChartError, Result};

pub const GRADIENT_NORM_COLUMN: &str = "gradient_norm";
pub const STEP_INDEX_COLUMN: &str = "step_index";

/// One record of a sweep experiment: the swept parameter value of the run,
/// and the gradient norm reached after `step_index` steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRow {
    pub sweep_value: f64,
    pub gradient_norm: f64,
    pub step_index: i64,
}

/// Rows of one sweep CSV, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub param: String,
    pub rows: Vec<DataRow>,
}

impl Dataset {
    pub fn new(param: &str, rows: Vec<DataRow>) -> Self {
        Dataset { param: param.to_string(), rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// Column positions resolved from the header, so the file may order them freely.
struct ColumnIndices {
    sweep: usize,
    gradient_norm: usize,
    step_index: usize,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord, param: &str) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ChartError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndices {
            sweep: find(param)?,
            gradient_norm: find(GRADIENT_NORM_COLUMN)?,
            step_index: find(STEP_INDEX_COLUMN)?,
        })
    }
}

fn parse_field<T: FromStr>(record: &StringRecord, idx: usize, line: u64, column: &str) -> Result<T> {
    let text = record.get(idx).unwrap_or("");
    text.parse::<T>().map_err(|_| ChartError::Parse {
        line,
        column: column.to_string(),
        value: text.to_string(),
    })
}

// "nan" and "inf" parse as f64 but cannot be placed on an axis
fn parse_finite(record: &StringRecord, idx: usize, line: u64, column: &str) -> Result<f64> {
    let value: f64 = parse_field(record, idx, line, column)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ChartError::Parse {
            line,
            column: column.to_string(),
            value: record.get(idx).unwrap_or("").to_string(),
        })
    }
}

/// Read the sweep CSV at `path`. A missing or unreadable file is a
/// [`ChartError::Load`]; a file with only a header is an empty dataset.
pub async fn load_dataset<P: AsRef<Path>>(path: P, param: &str) -> Result<Dataset> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| ChartError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = parse_dataset(bytes.as_slice(), param)?;
    info!(path = %path.display(), param, rows = dataset.len(), "loaded sweep data");
    Ok(dataset)
}

/// Parse sweep CSV text. The first malformed cell aborts the whole load.
pub fn parse_dataset<R: Read>(reader: R, param: &str) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndices::from_headers(&headers, param)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        rows.push(DataRow {
            sweep_value: parse_finite(&record, columns.sweep, line, param)?,
            gradient_norm: parse_finite(&record, columns.gradient_norm, line, GRADIENT_NORM_COLUMN)?,
            step_index: parse_field(&record, columns.step_index, line, STEP_INDEX_COLUMN)?,
        });
    }

    debug!(param, rows = rows.len(), "parsed sweep csv");
    Ok(Dataset::new(param, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_row_exactly() {
        let csv = "c1,gradient_norm,step_index\n0.5,3.25,10\n";
        let dataset = parse_dataset(csv.as_bytes(), "c1").unwrap();
        assert_eq!(
            dataset.rows,
            vec![DataRow { sweep_value: 0.5, gradient_norm: 3.25, step_index: 10 }]
        );
        assert_eq!(dataset.param, "c1");
    }

    #[test]
    fn columns_are_found_by_name() {
        // the experiment writer emits step_index before gradient_norm
        let csv = "c2,step_index,gradient_norm\n0.9,0,12.5\n0.9,1,4.0\n";
        let dataset = parse_dataset(csv.as_bytes(), "c2").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[1].step_index, 1);
        assert_eq!(dataset.rows[1].gradient_norm, 4.0);
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "c1,step_index,gradient_norm\n";
        let dataset = parse_dataset(csv.as_bytes(), "c1").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "c1,step_index\n0.1,0\n";
        let err = parse_dataset(csv.as_bytes(), "c1").unwrap_err();
        assert!(matches!(err, ChartError::MissingColumn(ref c) if c == "gradient_norm"));

        let csv = "c2,step_index,gradient_norm\n";
        let err = parse_dataset(csv.as_bytes(), "c1").unwrap_err();
        assert!(matches!(err, ChartError::MissingColumn(ref c) if c == "c1"));
    }

    #[test]
    fn non_numeric_cell_aborts_with_line() {
        let csv = "c1,step_index,gradient_norm\n0.1,0,1.0\n0.1,1,oops\n";
        match parse_dataset(csv.as_bytes(), "c1").unwrap_err() {
            ChartError::Parse { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "gradient_norm");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let csv = "c1,step_index,gradient_norm\n0.1,0,NaN\n";
        let err = parse_dataset(csv.as_bytes(), "c1").unwrap_err();
        assert!(matches!(err, ChartError::Parse { ref value, .. } if value == "NaN"));

        let csv = "c1,step_index,gradient_norm\ninf,0,1.0\n";
        let err = parse_dataset(csv.as_bytes(), "c1").unwrap_err();
        assert!(matches!(err, ChartError::Parse { ref column, .. } if column == "c1"));
    }

    #[test]
    fn fractional_step_index_is_rejected() {
        let csv = "c1,step_index,gradient_norm\n0.1,1.5,1.0\n";
        let err = parse_dataset(csv.as_bytes(), "c1").unwrap_err();
        assert!(matches!(err, ChartError::Parse { ref column, .. } if column == "step_index"));
    }

    #[test]
    fn padded_cells_are_trimmed() {
        let csv = "c1, step_index, gradient_norm\n0.0006, 2, 0.125\n";
        let dataset = parse_dataset(csv.as_bytes(), "c1").unwrap();
        assert_eq!(dataset.rows[0].sweep_value, 0.0006);
        assert_eq!(dataset.rows[0].step_index, 2);
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path().join("c1_experiment_data.csv"), "c1")
            .await
            .unwrap_err();
        assert!(matches!(err, ChartError::Load { .. }));
    }
}
