use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::PipelineResult;
use crate::logic::features::{Cell, Table};

/// Cell contents treated as a missing value. Matched against the exact
/// cell text: " NaN " is a value, not a missing one.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Read a headed CSV table. Rows must match the header width.
pub fn read_table<R: Read>(input: R) -> PipelineResult<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(to_cell).collect())?;
    }

    log::debug!("Read {} rows x {} columns", table.len(), table.columns().len());
    Ok(table)
}

pub fn read_table_from_path(path: &Path) -> PipelineResult<Table> {
    let file = File::open(path)?;
    read_table(file)
}

fn to_cell(value: &str) -> Cell {
    if NA_TOKENS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_tokens_become_missing() {
        assert_eq!(to_cell(""), None);
        assert_eq!(to_cell("null"), None);
        assert_eq!(to_cell("#N/A"), None);
        assert_eq!(to_cell("-nan"), None);
        assert_eq!(to_cell(" NaN "), Some(" NaN ".to_string()));
        assert_eq!(to_cell(" "), Some(" ".to_string()));
        assert_eq!(to_cell("none"), Some("none".to_string()));
        assert_eq!(to_cell("Segment A"), Some("Segment A".to_string()));
    }

    #[test]
    fn test_read_table_from_memory() {
        let data = "\u{feff}Protocol, Packet Length\nTCP,200\nUDP,\n";
        let table = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["Protocol".to_string(), "Packet Length".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Packet Length"), Some("200"));
        assert_eq!(table.get(1, "Packet Length"), None);
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let data = "a,b\n1,2\n3\n";
        assert!(read_table(data.as_bytes()).is_err());
    }
}
