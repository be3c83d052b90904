//! Model Module - Classifier Inference
//!
//! Tách logic inference khỏi feature pipeline.
//! The pipeline only sees the `Classifier` trait, so the ONNX session can be
//! swapped for any other implementation (or a stub in tests).

pub mod inference;
pub mod labels;

// Re-export common types
pub use inference::{Classifier, EngineStatus, InferenceError, ModelMetadata, OnnxClassifier};
pub use labels::{AttackType, ATTACK_LABELS};
