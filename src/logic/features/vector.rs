//! Feature Matrix - Core data structure for classifier input
//!
//! **Schema-stamped feature rows**
//!
//! Every matrix remembers the version and hash of the schema that shaped
//! it, so a matrix built against one layout can't be fed to a model trained
//! on another without the mismatch being visible.

use ndarray::{Array2, ShapeError};
use serde::{Deserialize, Serialize};

use super::layout::{compute_hash, FeatureSchema, LayoutMismatchError};

// ============================================================================
// FEATURE MATRIX
// ============================================================================

/// Row-major N × len(schema) matrix of f32 features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Column names, in schema order
    pub columns: Vec<String>,
    /// One entry per input row
    pub rows: Vec<Vec<f32>>,
}

impl FeatureMatrix {
    /// Create an empty matrix shaped by `schema`
    pub fn empty(schema: &FeatureSchema) -> Self {
        Self {
            version: schema.version(),
            layout_hash: schema.hash(),
            columns: schema.names().to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get feature by row and name
    pub fn get_by_name(&self, row: usize, name: &str) -> Option<f32> {
        let col = self.columns.iter().position(|c| c == name)?;
        self.rows.get(row)?.get(col).copied()
    }

    /// Check that this matrix was built for `schema`
    pub fn validate(&self, schema: &FeatureSchema) -> Result<(), LayoutMismatchError> {
        let actual_hash = compute_hash(self.version, &self.columns);
        if self.version != schema.version() || actual_hash != schema.hash() {
            return Err(LayoutMismatchError {
                expected_version: schema.version(),
                expected_hash: schema.hash(),
                actual_version: self.version,
                actual_hash,
            });
        }
        Ok(())
    }

    /// Dense tensor input for the classifier
    pub fn to_array(&self) -> Result<Array2<f32>, ShapeError> {
        let (n, m) = self.shape();
        let mut flat = Vec::with_capacity(n * m);
        for row in &self.rows {
            flat.extend_from_slice(row);
        }
        Array2::from_shape_vec((n, m), flat)
    }

    /// Convert one row to JSON-serializable format for logging
    pub fn to_log_entry(&self, row: usize) -> serde_json::Value {
        let values = self.row(row).unwrap_or_default();
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "row": row,
            "named_values": self.columns.iter()
                .zip(values.iter())
                .filter(|(_, v)| **v != 0.0)
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_schema() -> FeatureSchema {
        FeatureSchema::new(1, vec!["a".into(), "b".into()])
    }

    #[test]
    fn test_empty_matrix_keeps_width() {
        let matrix = FeatureMatrix::empty(&tiny_schema());
        assert_eq!(matrix.shape(), (0, 2));
        assert_eq!(matrix.to_array().unwrap().shape(), &[0, 2]);
    }

    #[test]
    fn test_to_array_row_major() {
        let mut matrix = FeatureMatrix::empty(&tiny_schema());
        matrix.rows = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let array = matrix.to_array().unwrap();
        assert_eq!(array[[0, 0]], 1.0);
        assert_eq!(array[[1, 1]], 1.0);
        assert_eq!(array[[1, 0]], 0.0);
    }

    #[test]
    fn test_ragged_rows_fail_shape() {
        let mut matrix = FeatureMatrix::empty(&tiny_schema());
        matrix.rows = vec![vec![1.0]];
        assert!(matrix.to_array().is_err());
    }

    #[test]
    fn test_validate_against_other_schema() {
        let matrix = FeatureMatrix::empty(&tiny_schema());
        assert!(matrix.validate(&tiny_schema()).is_ok());
        assert!(matrix.validate(FeatureSchema::current()).is_err());
    }

    #[test]
    fn test_get_by_name_and_log_entry() {
        let mut matrix = FeatureMatrix::empty(&tiny_schema());
        matrix.rows = vec![vec![0.0, 1.0]];
        assert_eq!(matrix.get_by_name(0, "b"), Some(1.0));
        assert_eq!(matrix.get_by_name(0, "c"), None);

        let entry = matrix.to_log_entry(0);
        assert_eq!(entry["named_values"]["b"], 1.0);
        assert!(entry["named_values"].get("a").is_none());
    }
}
