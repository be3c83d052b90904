//! Features Module - Feature Pipeline
//!
//! Raw traffic table → derived attributes → schema-shaped feature matrix.
//! Pure functions over borrowed batches; the only shared state is the
//! immutable feature schema.

pub mod layout;
pub mod rules;
pub mod table;
pub mod normalize;
pub mod encode;
pub mod vector;


// Re-export common types
pub use layout::{FeatureSchema, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use table::{Cell, Table};
pub use normalize::{normalize, normalize_with_stats, DerivedBatch, NormalizeStats};
pub use encode::{encode, expand, project_to_schema, EncodedFrame};
pub use vector::FeatureMatrix;

use crate::error::PipelineResult;

/// Run normalize + encode on a raw batch
pub fn build_features(raw: &Table, schema: &FeatureSchema) -> PipelineResult<FeatureMatrix> {
    let derived = normalize(raw)?;
    Ok(encode(&derived, schema))
}
