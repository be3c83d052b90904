//! Configuration module

use std::path::PathBuf;

use crate::constants;

/// Runtime configuration for the CLI caller
#[derive(Debug, Clone)]
pub struct Config {
    /// ONNX model location
    pub model_path: PathBuf,

    /// Where labeled predictions are written
    pub output_path: PathBuf,

    /// Rows printed in the terminal preview
    pub preview_rows: usize,
}

impl Config {
    /// Load configuration from `.env` and environment variables
    pub fn from_env() -> Self {
        // A missing .env file is the common case
        let _ = dotenvy::dotenv();

        Self {
            model_path: PathBuf::from(constants::get_model_path()),
            output_path: PathBuf::from(constants::get_output_path()),
            preview_rows: constants::get_preview_rows(),
        }
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, model: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(model) = model {
            self.model_path = model;
        }
        if let Some(output) = output {
            self.output_path = output;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            output_path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            preview_rows: constants::DEFAULT_PREVIEW_ROWS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_defaults() {
        let config = Config::default().with_overrides(
            Some(PathBuf::from("a.onnx")),
            None,
        );
        assert_eq!(config.model_path, PathBuf::from("a.onnx"));
        assert_eq!(config.output_path, PathBuf::from(constants::DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_default_preview_rows() {
        assert_eq!(Config::default().preview_rows, constants::DEFAULT_PREVIEW_ROWS);
    }
}
