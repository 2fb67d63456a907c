//! Error types for loading, laying out and rendering sweep charts.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("could not read {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv header has no `{0}` column")]
    MissingColumn(String),

    #[error("line {line}: column `{column}` is not a number: {value:?}")]
    Parse {
        line: u64,
        column: String,
        value: String,
    },

    #[error("host page has no element with id `{0}`")]
    MissingContainer(String),

    #[error("drawing failed: {0}")]
    Render(String),

    #[error("invalid chart config: {0}")]
    Config(String),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_error_display() {
        let err = ChartError::MissingColumn("c1".to_string());
        assert!(format!("{}", err).contains("`c1`"));

        let err = ChartError::Parse {
            line: 4,
            column: "gradient_norm".to_string(),
            value: "abc".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("line 4"));
        assert!(msg.contains("gradient_norm"));
        assert!(msg.contains("\"abc\""));

        let err = ChartError::MissingContainer("chart-container".to_string());
        assert!(format!("{}", err).contains("chart-container"));
    }
}
