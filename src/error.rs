//! Error handling

use thiserror::Error;

use crate::logic::features::layout::LayoutMismatchError;
use crate::logic::model::InferenceError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures that abort a whole batch.
///
/// Per-value anomalies (bad timestamps, out-of-range ports) never show up
/// here; they are recovered inside the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    // Structural errors
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("the model expects {expected} features, but got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    // Classifier errors
    #[error(transparent)]
    Inference(#[from] InferenceError),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_is_aggregated() {
        let err = PipelineError::MissingColumns(vec![
            "Timestamp".to_string(),
            "Source Port".to_string(),
        ]);
        assert_eq!(err.to_string(), "missing required columns: Timestamp, Source Port");
    }

    #[test]
    fn test_schema_mismatch_message() {
        let err = PipelineError::SchemaMismatch { expected: 33, actual: 31 };
        assert_eq!(err.to_string(), "the model expects 33 features, but got 31");
    }
}
