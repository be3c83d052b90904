use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::error::PipelineResult;
use crate::logic::features::{FeatureMatrix, Table};

/// Write a table as headed CSV; missing cells are empty
pub fn write_table<W: Write>(output: W, table: &Table) -> PipelineResult<()> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_table_to_path(path: &Path, table: &Table) -> PipelineResult<()> {
    let file = File::create(path)?;
    write_table(file, table)?;
    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write an encoded feature matrix as headed CSV, schema columns in order
pub fn write_features<W: Write>(output: W, matrix: &FeatureMatrix) -> PipelineResult<()> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(&matrix.columns)?;
    for row in &matrix.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_features_to_path(path: &Path, matrix: &FeatureMatrix) -> PipelineResult<()> {
    let file = File::create(path)?;
    write_features(file, matrix)?;
    log::info!("Wrote {}x{} feature matrix to {}", matrix.n_rows(), matrix.n_cols(), path.display());
    Ok(())
}
