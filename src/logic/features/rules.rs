//! Feature Rules
//!
//! Column names, bucket edges, sentinel labels and keyword tables used by
//! the pipeline. KHÔNG chứa logic - chỉ constants.

// ============================================================================
// RAW COLUMNS
// ============================================================================

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_SOURCE_PORT: &str = "Source Port";
pub const COL_DESTINATION_PORT: &str = "Destination Port";
pub const COL_PACKET_LENGTH: &str = "Packet Length";
pub const COL_ANOMALY_SCORES: &str = "Anomaly Scores";
pub const COL_FIREWALL_LOGS: &str = "Firewall Logs";
pub const COL_DEVICE_INFORMATION: &str = "Device Information";
pub const COL_ALERTS_WARNINGS: &str = "Alerts/Warnings";
pub const COL_MALWARE_INDICATORS: &str = "Malware Indicators";
pub const COL_IDS_IPS_ALERTS: &str = "IDS/IPS Alerts";
pub const COL_PROXY_INFORMATION: &str = "Proxy Information";
pub const COL_PROTOCOL: &str = "Protocol";
pub const COL_PACKET_TYPE: &str = "Packet Type";
pub const COL_TRAFFIC_TYPE: &str = "Traffic Type";
pub const COL_ATTACK_SIGNATURE: &str = "Attack Signature";
pub const COL_ACTION_TAKEN: &str = "Action Taken";
pub const COL_SEVERITY_LEVEL: &str = "Severity Level";
pub const COL_NETWORK_SEGMENT: &str = "Network Segment";

// ============================================================================
// DERIVED COLUMNS
// ============================================================================

pub const COL_ATTACK_MONTH: &str = "Attack Month";
pub const COL_SOURCE_PORT_TYPE: &str = "Source Port Type";
pub const COL_DESTINATION_PORT_TYPE: &str = "Destination Port Type";
pub const COL_PACKET_WEIGHT: &str = "Packet Weight";
pub const COL_ANOMALY_RANK: &str = "Anomaly Rank";
pub const COL_BROWSER: &str = "Browser";
pub const COL_DEVICE: &str = "Device";

/// Columns a raw batch must carry before normalization starts
pub const REQUIRED_RAW_COLUMNS: &[&str] = &[
    COL_TIMESTAMP,
    COL_SOURCE_PORT,
    COL_DESTINATION_PORT,
    COL_PACKET_LENGTH,
    COL_ANOMALY_SCORES,
    COL_FIREWALL_LOGS,
    COL_DEVICE_INFORMATION,
    COL_ALERTS_WARNINGS,
    COL_MALWARE_INDICATORS,
    COL_IDS_IPS_ALERTS,
    COL_PROXY_INFORMATION,
    COL_PROTOCOL,
    COL_PACKET_TYPE,
    COL_TRAFFIC_TYPE,
    COL_ATTACK_SIGNATURE,
    COL_ACTION_TAKEN,
    COL_SEVERITY_LEVEL,
    COL_NETWORK_SEGMENT,
];

/// Columns superseded by derived features, dropped at the end of normalize
pub const DROPPED_COLUMNS: &[&str] = &[
    COL_TIMESTAMP,
    COL_SOURCE_PORT,
    COL_DESTINATION_PORT,
    COL_PACKET_LENGTH,
    COL_ANOMALY_SCORES,
    COL_FIREWALL_LOGS,
    COL_DESTINATION_PORT_TYPE,
    COL_DEVICE_INFORMATION,
];

// ============================================================================
// HARMONIZATION
// ============================================================================

/// (raw literal, canonical token) for the firewall log column
pub const FIREWALL_LOG_CANONICAL: (&str, &str) = ("Log Data", "LogData");

// ============================================================================
// PORTS
// ============================================================================

pub const REGISTERED_PORT_MAX: u32 = 49151;
pub const DYNAMIC_PORT_MAX: u32 = 65535;

pub const PORT_REGISTERED: &str = "Registered";
pub const PORT_DYNAMIC_PRIVATE: &str = "Dynamic Private";
pub const PORT_UNKNOWN: &str = "Unknown";

// ============================================================================
// BUCKETS
// ============================================================================

/// Packet Weight edges; labels 1..=8
pub const PACKET_WEIGHT_EDGES: &[f64] = &[
    0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0, f64::INFINITY,
];

/// Anomaly Rank edges; labels 1..=11
pub const ANOMALY_RANK_EDGES: &[f64] = &[
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, f64::INFINITY,
];

// ============================================================================
// MISSING VALUE SENTINELS
// ============================================================================

/// (column, label used when the cell is missing)
pub const SENTINEL_FILLS: &[(&str, &str)] = &[
    (COL_ALERTS_WARNINGS, "Not Alerted"),
    (COL_MALWARE_INDICATORS, "Not Detected"),
    (COL_IDS_IPS_ALERTS, "No Alert Data"),
    (COL_PROXY_INFORMATION, "No Proxy"),
];

// ============================================================================
// KEYWORD TABLES (evaluated top to bottom, first match wins)
// ============================================================================

/// Browser keywords, matched case-sensitively
pub const BROWSER_KEYWORDS: &[(&str, &str)] = &[
    ("Opera", "Opera"),
];

/// Device keywords, matched against the lowercased device string
pub const DEVICE_KEYWORDS: &[(&str, &str)] = &[
    ("ipad", "iPad"),
    ("iphone", "iPhone"),
    ("windows", "Windows"),
];

// ============================================================================
// ONE-HOT ENCODING
// ============================================================================

/// (column, reference level) in encoding order.
///
/// The reference level is the first level of the training data for that
/// column and never gets an indicator column. Bucket and month columns use
/// their lowest label; string columns use their lexically first value.
pub const CATEGORICAL_COLUMNS: &[(&str, &str)] = &[
    (COL_PROTOCOL, "ICMP"),
    (COL_PACKET_TYPE, "Control"),
    (COL_TRAFFIC_TYPE, "DNS"),
    (COL_MALWARE_INDICATORS, "IoC Detected"),
    (COL_ALERTS_WARNINGS, "Alert Triggered"),
    (COL_ATTACK_SIGNATURE, "Known Pattern A"),
    (COL_ACTION_TAKEN, "Blocked"),
    (COL_SEVERITY_LEVEL, "High"),
    (COL_NETWORK_SEGMENT, "Segment A"),
    (COL_IDS_IPS_ALERTS, "Alert Data"),
    (COL_BROWSER, ""),
    (COL_PACKET_WEIGHT, "1"),
    (COL_ANOMALY_RANK, "1"),
    (COL_DEVICE, ""),
    (COL_ATTACK_MONTH, "1"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_edges_are_sorted() {
        for edges in [PACKET_WEIGHT_EDGES, ANOMALY_RANK_EDGES] {
            assert!(edges.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(PACKET_WEIGHT_EDGES.len() - 1, 8);
        assert_eq!(ANOMALY_RANK_EDGES.len() - 1, 11);
    }

    #[test]
    fn test_device_priority_order() {
        let order: Vec<&str> = DEVICE_KEYWORDS.iter().map(|(_, label)| *label).collect();
        assert_eq!(order, vec!["iPad", "iPhone", "Windows"]);
    }

    #[test]
    fn test_dropped_columns_are_required_or_derived() {
        for col in DROPPED_COLUMNS {
            assert!(REQUIRED_RAW_COLUMNS.contains(col) || *col == COL_DESTINATION_PORT_TYPE);
        }
    }
}
