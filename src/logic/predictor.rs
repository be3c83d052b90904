//! Predictor - raw batch in, labeled rows out
//!
//! Runs the feature pipeline, checks the matrix against the schema before
//! the classifier ever sees it, and maps class indices to attack labels.
//! Any failure aborts the whole batch: no partial predictions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::PREDICTION_COLUMN;
use crate::error::{PipelineError, PipelineResult};
use crate::logic::features::{build_features, Cell, FeatureMatrix, FeatureSchema, Table};
use crate::logic::model::{AttackType, Classifier, InferenceError};

/// One raw row with its predicted label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub record: Vec<Cell>,
    pub attack_type: AttackType,
}

/// All predictions for one batch, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub columns: Vec<String>,
    pub results: Vec<PredictionResult>,
}

impl PredictionReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Raw columns plus the predicted label column
    pub fn to_table(&self) -> PipelineResult<Table> {
        let rows = self.results.iter().map(|r| r.record.clone()).collect();
        let mut table = Table::from_rows(self.columns.clone(), rows)?;

        let labels = self.results
            .iter()
            .map(|r| Some(r.attack_type.to_string()))
            .collect();
        table.set_column(PREDICTION_COLUMN, labels)?;

        Ok(table)
    }

    /// Number of rows per predicted label
    pub fn counts(&self) -> BTreeMap<AttackType, usize> {
        let mut counts = BTreeMap::new();
        for result in &self.results {
            *counts.entry(result.attack_type).or_insert(0) += 1;
        }
        counts
    }
}

/// Reject a matrix whose shape doesn't match what the classifier was trained on
pub fn check_schema(matrix: &FeatureMatrix, schema: &FeatureSchema) -> PipelineResult<()> {
    if matrix.n_cols() != schema.len() {
        return Err(PipelineError::SchemaMismatch {
            expected: schema.len(),
            actual: matrix.n_cols(),
        });
    }
    matrix.validate(schema)?;
    Ok(())
}

/// Classify every row of a raw batch
pub fn predict_batch(
    raw: &Table,
    schema: &FeatureSchema,
    classifier: &dyn Classifier,
) -> PipelineResult<PredictionReport> {
    let matrix = build_features(raw, schema)?;
    check_schema(&matrix, schema)?;

    let labels = if matrix.n_rows() == 0 {
        Vec::new()
    } else {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("First feature row: {}", matrix.to_log_entry(0));
        }
        classifier.predict(&matrix)?
    };

    if labels.len() != raw.len() {
        return Err(InferenceError(format!(
            "{} returned {} labels for {} rows",
            classifier.name(),
            labels.len(),
            raw.len()
        ))
        .into());
    }

    let results = raw
        .rows()
        .iter()
        .zip(labels)
        .map(|(record, index)| {
            let attack_type = AttackType::from_index(index)
                .ok_or_else(|| InferenceError(format!("Unknown class index {}", index)))?;
            Ok(PredictionResult { record: record.clone(), attack_type })
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    log::info!("Predicted {} rows with {}", results.len(), classifier.name());

    Ok(PredictionReport {
        columns: raw.columns().to_vec(),
        results,
    })
}
