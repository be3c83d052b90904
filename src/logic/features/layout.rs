//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema the classifier was trained on**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The order below is the column order of the training matrix, not an
//! alphabetical or grouped order. Reordering it silently corrupts predictions.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the classifier input
pub const FEATURE_LAYOUT: &[&str] = &[
    "Attack Month_5",                       // 0
    "Attack Month_7",                       // 1
    "Attack Month_6",                       // 2
    "Network Segment_Segment B",            // 3
    "Browser_Opera",                        // 4
    "Packet Type_Data",                     // 5
    "Packet Weight_5",                      // 6
    "Anomaly Rank_9",                       // 7
    "Anomaly Rank_4",                       // 8
    "Severity Level_Medium",                // 9
    "Traffic Type_HTTP",                    // 10
    "Device_iPad",                          // 11
    "Packet Weight_8",                      // 12
    "Protocol_TCP",                         // 13
    "Alerts/Warnings_Not Alerted",          // 14
    "Attack Month_10",                      // 15
    "Attack Signature_Known Pattern B",     // 16
    "Device_iPhone",                        // 17
    "Anomaly Rank_2",                       // 18
    "IDS/IPS Alerts_No Alert Data",         // 19
    "Action Taken_Ignored",                 // 20
    "Traffic Type_FTP",                     // 21
    "Anomaly Rank_7",                       // 22
    "Attack Month_9",                       // 23
    "Attack Month_11",                      // 24
    "Packet Weight_4",                      // 25
    "Packet Weight_6",                      // 26
    "Network Segment_Segment C",            // 27
    "Packet Weight_7",                      // 28
    "Attack Month_2",                       // 29
    "Attack Month_12",                      // 30
    "Device_Windows",                       // 31
    "Malware Indicators_Not Detected",      // 32
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 33;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an arbitrary layout
pub fn compute_hash<S: AsRef<str>>(version: u8, names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

/// Ordered list of feature names the classifier expects.
///
/// `FeatureSchema::current()` is the trained layout above. Other schemas
/// can be built for tests or for a retrained model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u8,
    names: Vec<String>,
}

static CURRENT_SCHEMA: Lazy<FeatureSchema> = Lazy::new(|| FeatureSchema {
    version: FEATURE_VERSION,
    names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
});

impl FeatureSchema {
    pub fn new(version: u8, names: Vec<String>) -> Self {
        Self { version, names }
    }

    /// The process-wide trained layout
    pub fn current() -> &'static FeatureSchema {
        &CURRENT_SCHEMA
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn hash(&self) -> u32 {
        compute_hash(self.version, &self.names)
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            version: self.version,
            hash: self.hash(),
            feature_count: self.len(),
            feature_names: self.names.clone(),
        }
    }

    /// Check that a model's advertised feature names match this schema exactly
    pub fn validate_names<S: AsRef<str>>(&self, names: &[S]) -> Result<(), LayoutMismatchError> {
        let incoming = compute_hash(self.version, names);
        let expected = self.hash();

        if incoming != expected {
            return Err(LayoutMismatchError {
                expected_version: self.version,
                expected_hash: expected,
                actual_version: self.version,
                actual_hash: incoming,
            });
        }

        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::current().clone()
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        FeatureSchema::current().info()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

// ============================================================================
// TESTS
// ============================================================================
