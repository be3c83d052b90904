//! Encode - derived batch → schema-shaped feature matrix
//!
//! Two steps, kept separate so each can be checked on its own:
//! - [`expand`]: one-hot indicators for the categorical columns plus numeric
//!   passthrough for everything else that parses as a number
//! - [`project_to_schema`]: add absent schema columns as zeros, keep only
//!   schema columns, in schema order

use std::collections::{BTreeSet, HashMap};

use super::layout::FeatureSchema;
use super::normalize::{parse_number, DerivedBatch};
use super::rules::CATEGORICAL_COLUMNS;
use super::vector::FeatureMatrix;

/// Wide, unreconciled encoding of a derived batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f32>>,
}

impl EncodedFrame {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Name of the indicator column for `value` in `column`
pub fn indicator_name(column: &str, value: &str) -> String {
    format!("{}_{}", column, value)
}

/// Encode a derived batch into exactly the columns of `schema`.
///
/// Never fails: categories unknown to the schema are dropped and schema
/// columns nobody produced are zero.
pub fn encode(derived: &DerivedBatch, schema: &FeatureSchema) -> FeatureMatrix {
    let frame = expand(derived);
    log::debug!(
        "Expanded {} rows into {} columns before projection",
        frame.rows.len(),
        frame.columns.len()
    );
    project_to_schema(&frame, schema)
}

/// One-hot expansion with fixed reference levels.
///
/// Each categorical column gets one indicator per observed value other than
/// its reference level; missing cells set no indicator. Non-categorical
/// columns whose present values are all numeric are passed through, with
/// missing cells as NaN. Anything else is not representable and dropped.
pub fn expand(derived: &DerivedBatch) -> EncodedFrame {
    let table = derived.table();
    let n = table.len();
    let mut frame = EncodedFrame {
        columns: Vec::new(),
        rows: vec![Vec::new(); n],
    };

    let is_categorical = |name: &str| CATEGORICAL_COLUMNS.iter().any(|(c, _)| *c == name);

    // Numeric passthrough, in derived column order
    for name in table.columns() {
        if is_categorical(name.as_str()) {
            continue;
        }
        let Some(values) = table.column(name) else { continue };

        let parsed: Vec<Option<f64>> = values.iter().map(|v| parse_number(*v)).collect();
        let all_numeric = values.iter().zip(&parsed).all(|(raw, num)| raw.is_none() || num.is_some());
        if !all_numeric {
            continue;
        }

        frame.columns.push(name.clone());
        for (row, value) in frame.rows.iter_mut().zip(parsed) {
            row.push(value.map(|v| v as f32).unwrap_or(f32::NAN));
        }
    }

    // Indicators, per column in encoding order, levels sorted
    for (name, reference) in CATEGORICAL_COLUMNS {
        let Some(values) = table.column(name) else { continue };

        let levels: BTreeSet<&str> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v != reference)
            .collect();

        for level in levels {
            frame.columns.push(indicator_name(name, level));
            for (row, value) in frame.rows.iter_mut().zip(&values) {
                row.push(if *value == Some(level) { 1.0 } else { 0.0 });
            }
        }
    }

    frame
}

/// Reconcile a wide frame against the schema.
///
/// Output has exactly `schema.len()` columns in schema order. Schema
/// columns absent from the frame are zero; frame columns absent from the
/// schema are discarded.
pub fn project_to_schema(frame: &EncodedFrame, schema: &FeatureSchema) -> FeatureMatrix {
    let lookup: HashMap<&str, usize> = frame
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let sources: Vec<Option<usize>> = schema
        .names()
        .iter()
        .map(|name| lookup.get(name.as_str()).copied())
        .collect();

    let mut matrix = FeatureMatrix::empty(schema);
    matrix.rows = frame
        .rows
        .iter()
        .map(|row| {
            sources
                .iter()
                .map(|src| src.and_then(|i| row.get(i).copied()).unwrap_or(0.0))
                .collect()
        })
        .collect();

    matrix
}
