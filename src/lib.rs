//! Cyber Attack Predictor
//!
//! Turns raw network-traffic tables into the fixed 33-feature matrix a
//! trained classifier expects, and labels each row as DDoS, Intrusion or
//! Malware.

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{PipelineError, PipelineResult};
pub use logic::features::{build_features, encode, normalize, FeatureMatrix, FeatureSchema, Table};
pub use logic::model::{AttackType, Classifier, OnnxClassifier};
pub use logic::predictor::{predict_batch, PredictionReport, PredictionResult};
