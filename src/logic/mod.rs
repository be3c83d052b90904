//! Logic Module - Feature Pipeline & Inference
//!
//! - `features/` - Raw batch → schema-shaped feature matrix
//! - `model/` - Classifier trait, ONNX inference, attack labels
//! - `predictor` - Pipeline + classifier for one batch
//! - `dataset/` - CSV input/output used by the CLI

pub mod features;
pub mod model;
pub mod predictor;
pub mod dataset;
