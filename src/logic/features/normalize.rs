//! Normalize - raw batch → derived batch
//!
//! Runs the column transformations that turn raw traffic attributes into
//! the derived attributes the encoder understands. Per-value problems
//! (unparseable timestamps, bad ports, lengths outside the bins) never fail
//! the batch: they become a missing value or the "Unknown" category.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::rules::*;
use super::table::{Cell, Table};
use crate::error::{PipelineError, PipelineResult};

/// Timestamp layouts accepted, tried in order.
///
/// Month-first layouts with a two-digit year come before any `%Y/...`
/// layout: chrono's `%Y` also accepts two digits, so "05/06/21" would
/// otherwise read as year 5, month 6.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d"];

// ============================================================================
// DERIVED BATCH
// ============================================================================

/// Output of [`normalize`]: same rows as the raw batch, derived columns added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedBatch(Table);

impl DerivedBatch {
    /// Wrap an already-derived table (used by callers that build one directly)
    pub fn from_table(table: Table) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &Table {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-batch counters of values recovered with a default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows: usize,
    pub bad_timestamps: usize,
    pub unknown_ports: usize,
    pub unbucketed_lengths: usize,
    pub unbucketed_scores: usize,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Derive the feature columns from a raw batch.
///
/// Fails only when required raw columns are absent; all of them are named
/// in a single error.
pub fn normalize(raw: &Table) -> PipelineResult<DerivedBatch> {
    normalize_with_stats(raw).map(|(batch, _)| batch)
}

/// Same as [`normalize`], also returning the recovery counters
pub fn normalize_with_stats(raw: &Table) -> PipelineResult<(DerivedBatch, NormalizeStats)> {
    check_required_columns(raw)?;

    let mut table = raw.clone();
    let mut stats = NormalizeStats { rows: table.len(), ..Default::default() };

    // 1. Firewall log harmonization
    table.map_column(COL_FIREWALL_LOGS, canonical_firewall_log);

    // 2. Attack month
    let months: Vec<Cell> = column_values(&table, COL_TIMESTAMP)
        .into_iter()
        .map(|v| {
            let month = attack_month(v);
            if month.is_none() {
                stats.bad_timestamps += 1;
            }
            month.map(|m| m.to_string())
        })
        .collect();
    table.set_column(COL_ATTACK_MONTH, months)?;

    // 3. Port categories
    for (source, target) in [
        (COL_SOURCE_PORT, COL_SOURCE_PORT_TYPE),
        // Destination category is dropped below; kept for parity with training
        (COL_DESTINATION_PORT, COL_DESTINATION_PORT_TYPE),
    ] {
        let categories: Vec<Cell> = column_values(&table, source)
            .into_iter()
            .map(|v| {
                let category = port_category(v);
                if category == PORT_UNKNOWN {
                    stats.unknown_ports += 1;
                }
                Some(category.to_string())
            })
            .collect();
        table.set_column(target, categories)?;
    }

    // 4-5. Buckets
    let weights = bucket_column(&table, COL_PACKET_LENGTH, PACKET_WEIGHT_EDGES, &mut stats.unbucketed_lengths);
    table.set_column(COL_PACKET_WEIGHT, weights)?;

    let ranks = bucket_column(&table, COL_ANOMALY_SCORES, ANOMALY_RANK_EDGES, &mut stats.unbucketed_scores);
    table.set_column(COL_ANOMALY_RANK, ranks)?;

    // 6. Sentinel fills
    for (column, label) in SENTINEL_FILLS {
        table.map_column(column, |v| v.or_else(|| Some(label.to_string())));
    }

    // 7-8. Browser and device
    let info = column_values(&table, COL_DEVICE_INFORMATION);
    let browsers: Vec<Cell> = info.iter().map(|v| Some(extract_browser(*v).to_string())).collect();
    let devices: Vec<Cell> = info.iter().map(|v| Some(extract_device(*v).to_string())).collect();
    table.set_column(COL_BROWSER, browsers)?;
    table.set_column(COL_DEVICE, devices)?;

    // 9. Drop superseded columns
    table.drop_columns(DROPPED_COLUMNS);

    if stats.bad_timestamps + stats.unknown_ports + stats.unbucketed_lengths + stats.unbucketed_scores > 0 {
        log::debug!(
            "Normalize recovered values: {} timestamps, {} ports, {} lengths, {} scores ({} rows)",
            stats.bad_timestamps,
            stats.unknown_ports,
            stats.unbucketed_lengths,
            stats.unbucketed_scores,
            stats.rows
        );
    }

    Ok((DerivedBatch(table), stats))
}

fn check_required_columns(raw: &Table) -> PipelineResult<()> {
    let missing: Vec<String> = REQUIRED_RAW_COLUMNS
        .iter()
        .filter(|c| !raw.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingColumns(missing))
    }
}

/// Column values, or all-missing when the column is absent
fn column_values<'a>(table: &'a Table, name: &str) -> Vec<Option<&'a str>> {
    table.column(name).unwrap_or_else(|| vec![None; table.len()])
}

fn bucket_column(table: &Table, name: &str, edges: &[f64], misses: &mut usize) -> Vec<Cell> {
    column_values(table, name)
        .into_iter()
        .map(|v| {
            let label = parse_number(v).and_then(|x| bucket(x, edges));
            if label.is_none() {
                *misses += 1;
            }
            label.map(|l| l.to_string())
        })
        .collect()
}

// ============================================================================
// VALUE RULES
// ============================================================================

/// Compact the known firewall log literal; other values pass through
pub fn canonical_firewall_log(value: Cell) -> Cell {
    let (literal, canonical) = FIREWALL_LOG_CANONICAL;
    match value {
        Some(s) if s == literal => Some(canonical.to_string()),
        other => other,
    }
}

/// Parse a numeric cell; blanks and garbage are `None`
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    value?.trim().parse::<f64>().ok()
}

/// Parse a timestamp cell, returning `None` on any failure
pub fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let s = value?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar month (1-12) of a timestamp cell
pub fn attack_month(value: Option<&str>) -> Option<u32> {
    parse_timestamp(value).map(|dt| dt.month())
}

/// Classify a port cell by IANA range
pub fn port_category(value: Option<&str>) -> &'static str {
    match parse_port(value) {
        Some(p) if p <= REGISTERED_PORT_MAX => PORT_REGISTERED,
        Some(p) if p <= DYNAMIC_PORT_MAX => PORT_DYNAMIC_PRIVATE,
        _ => PORT_UNKNOWN,
    }
}

fn parse_port(value: Option<&str>) -> Option<u32> {
    let v = parse_number(value)?;
    if !v.is_finite() || v.fract() != 0.0 || v < 0.0 || v > DYNAMIC_PORT_MAX as f64 {
        return None;
    }
    Some(v as u32)
}

/// 1-based bin of `value` over right-closed `edges`, lowest edge inclusive.
///
/// Values below the first edge, above the last edge, or NaN have no bin.
pub fn bucket(value: f64, edges: &[f64]) -> Option<usize> {
    if value.is_nan() || edges.len() < 2 || value < edges[0] {
        return None;
    }
    edges.windows(2).position(|w| value <= w[1]).map(|i| i + 1)
}

/// Browser label from the device string, or "" when none matches
pub fn extract_browser(info: Option<&str>) -> &'static str {
    let info = info.unwrap_or_default();
    BROWSER_KEYWORDS
        .iter()
        .find(|(keyword, _)| info.contains(keyword))
        .map(|(_, label)| *label)
        .unwrap_or("")
}

/// Device label from the device string, or "" when none matches
pub fn extract_device(info: Option<&str>) -> &'static str {
    let info = info.unwrap_or_default().to_lowercase();
    DEVICE_KEYWORDS
        .iter()
        .find(|(keyword, _)| info.contains(keyword))
        .map(|(_, label)| *label)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_firewall_log() {
        assert_eq!(canonical_firewall_log(Some("Log Data".into())), Some("LogData".to_string()));
        assert_eq!(canonical_firewall_log(Some("log data".into())), Some("log data".to_string()));
        assert_eq!(canonical_firewall_log(None), None);
    }

    #[test]
    fn test_port_ranges() {
        assert_eq!(port_category(Some("0")), PORT_REGISTERED);
        assert_eq!(port_category(Some("80")), PORT_REGISTERED);
        assert_eq!(port_category(Some("49151")), PORT_REGISTERED);
        assert_eq!(port_category(Some("49152")), PORT_DYNAMIC_PRIVATE);
        assert_eq!(port_category(Some("65535")), PORT_DYNAMIC_PRIVATE);
        assert_eq!(port_category(Some("31225.0")), PORT_REGISTERED);
    }

    #[test]
    fn test_port_out_of_domain_is_unknown() {
        assert_eq!(port_category(Some("65536")), PORT_UNKNOWN);
        assert_eq!(port_category(Some("-1")), PORT_UNKNOWN);
        assert_eq!(port_category(Some("80.5")), PORT_UNKNOWN);
        assert_eq!(port_category(Some("http")), PORT_UNKNOWN);
        assert_eq!(port_category(None), PORT_UNKNOWN);
    }

    #[test]
    fn test_packet_weight_edges() {
        assert_eq!(bucket(0.0, PACKET_WEIGHT_EDGES), Some(1));
        assert_eq!(bucket(200.0, PACKET_WEIGHT_EDGES), Some(1));
        assert_eq!(bucket(200.5, PACKET_WEIGHT_EDGES), Some(2));
        assert_eq!(bucket(400.0, PACKET_WEIGHT_EDGES), Some(2));
        assert_eq!(bucket(1400.0, PACKET_WEIGHT_EDGES), Some(7));
        assert_eq!(bucket(1500.0, PACKET_WEIGHT_EDGES), Some(8));
        assert_eq!(bucket(f64::INFINITY, PACKET_WEIGHT_EDGES), Some(8));
    }

    #[test]
    fn test_anomaly_rank_edges() {
        assert_eq!(bucket(0.0, ANOMALY_RANK_EDGES), Some(1));
        assert_eq!(bucket(10.0, ANOMALY_RANK_EDGES), Some(1));
        assert_eq!(bucket(85.0, ANOMALY_RANK_EDGES), Some(9));
        assert_eq!(bucket(100.0, ANOMALY_RANK_EDGES), Some(10));
        assert_eq!(bucket(100.01, ANOMALY_RANK_EDGES), Some(11));
    }

    #[test]
    fn test_bucket_rejects_out_of_range() {
        assert_eq!(bucket(-0.1, PACKET_WEIGHT_EDGES), None);
        assert_eq!(bucket(f64::NAN, ANOMALY_RANK_EDGES), None);
        assert_eq!(bucket(5.0, &[0.0, 1.0]), None);
    }

    #[test]
    fn test_timestamp_parsing() {
        assert_eq!(attack_month(Some("2023-05-30 06:33:58")), Some(5));
        assert_eq!(attack_month(Some("2020-08-26T07:08:30")), Some(8));
        assert_eq!(attack_month(Some("2022-11-13T10:00:00+02:00")), Some(11));
        assert_eq!(attack_month(Some("12/01/2021")), Some(12));
        assert_eq!(attack_month(Some("05/06/21")), Some(5));
        assert_eq!(attack_month(Some("05/06/21 10:00:00")), Some(5));
        assert_eq!(attack_month(Some("05/06/2021 10:00")), Some(5));
        assert_eq!(attack_month(Some("2021/05/06")), Some(5));
        assert_eq!(attack_month(Some("2021/05/06 10:00:00")), Some(5));
        assert_eq!(attack_month(Some("2021-02-30 00:00:00")), None);
        assert_eq!(attack_month(Some("not a date")), None);
        assert_eq!(attack_month(Some("  ")), None);
        assert_eq!(attack_month(None), None);
    }

    #[test]
    fn test_browser_is_case_sensitive() {
        assert_eq!(extract_browser(Some("Opera/9.63 (X11; Linux x86_64)")), "Opera");
        assert_eq!(extract_browser(Some("opera mini")), "");
        assert_eq!(extract_browser(Some("Mozilla/5.0")), "");
        assert_eq!(extract_browser(None), "");
    }

    #[test]
    fn test_device_priority() {
        assert_eq!(extract_device(Some("Mozilla iPad; CPU iPhone OS")), "iPad");
        assert_eq!(extract_device(Some("Mozilla (IPHONE; Windows)")), "iPhone");
        assert_eq!(extract_device(Some("Mozilla/5.0 (Windows NT 6.2)")), "Windows");
        assert_eq!(extract_device(Some("Mozilla/5.0 (X11; Linux)")), "");
        assert_eq!(extract_device(None), "");
    }
}
