//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default model location, only edit this file.

/// Default ONNX model path
///
/// This is the fallback path when no environment variable is set.
pub const DEFAULT_MODEL_PATH: &str = "models/cyber_attack_predictor.onnx";

/// Default output file for labeled predictions
pub const DEFAULT_OUTPUT_PATH: &str = "predictions.csv";

/// Default output file for the encoded feature matrix
pub const DEFAULT_FEATURES_OUTPUT_PATH: &str = "features.csv";

/// Rows shown in the terminal preview after prediction
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Column appended to every raw row after classification
pub const PREDICTION_COLUMN: &str = "Predicted Attack Type";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Cyber Attack Predictor";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("ATTACK_MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get output path from environment or use default
pub fn get_output_path() -> String {
    std::env::var("ATTACK_OUTPUT_PATH")
        .unwrap_or_else(|_| DEFAULT_OUTPUT_PATH.to_string())
}

/// Get preview row count from environment or use default
pub fn get_preview_rows() -> usize {
    std::env::var("ATTACK_PREVIEW_ROWS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PREVIEW_ROWS)
}
