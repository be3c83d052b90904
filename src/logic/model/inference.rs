//! Inference Engine - ONNX Runtime Integration
//!
//! Load và chạy ONNX model.
//! The trained classifier takes an (N, 33) f32 matrix in schema order and
//! yields one class index per row.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::labels::ATTACK_LABELS;
use crate::logic::features::layout::{FeatureSchema, LayoutMismatchError};
use crate::logic::features::FeatureMatrix;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Trait cho classifiers (ONNX, stubs, etc.)
pub trait Classifier {
    /// One class index per matrix row, in row order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, InferenceError>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    /// Feature names advertised by the sidecar `<model>.json`, if any
    pub feature_names: Option<Vec<String>>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Sidecar file written next to the exported model
#[derive(Debug, Default, Deserialize)]
struct SidecarMetadata {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    #[serde(default)]
    classes: Option<Vec<String>>,
}

/// Engine Status for logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    session: Mutex<Session>,
    metadata: ModelMetadata,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl OnnxClassifier {
    /// Load ONNX model từ file, plus `<model>.json` when present
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError(format!("Model not found: {}", model_path.display())));
        }

        let sidecar = load_sidecar(model_path)?;

        let environment = ort::init()
            .build()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?;

        let session = Session::builder(&environment)
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        log::info!("ONNX model loaded successfully");

        Ok(Self::from_session(
            session,
            model_path.display().to_string(),
            sidecar,
        ))
    }

    fn from_session(session: Session, model_path: String, sidecar: SidecarMetadata) -> Self {
        Self {
            session: Mutex::new(session),
            metadata: ModelMetadata {
                model_path,
                feature_names: sidecar.feature_names,
                loaded_at: chrono::Utc::now(),
            },
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Check the model's advertised feature names against `schema`.
    /// Models without a sidecar are trusted.
    pub fn validate_schema(&self, schema: &FeatureSchema) -> Result<(), LayoutMismatchError> {
        match &self.metadata.feature_names {
            Some(names) => schema.validate_names(names),
            None => Ok(()),
        }
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            model_name: self.metadata.model_path.clone(),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            avg_latency_ms: avg,
            inference_count: count,
            loaded_at: self.metadata.loaded_at,
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<usize>, InferenceError> {
        let rows = features.n_rows();
        if rows == 0 {
            return Ok(Vec::new());
        }

        let start_time = std::time::Instant::now();

        let input_array = features.to_array()
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();

        // skl2onnx puts the label tensor first, probabilities second
        let output_name = session.outputs().first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| InferenceError("No output defined".to_string()))?;

        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&output_name)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let labels = match output.try_extract_tensor::<i64>() {
            Ok((_, data)) => decode_labels(data, rows)?,
            Err(_) => {
                let (_, data) = output.try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;
                decode_scores(data, rows)?
            }
        };

        let elapsed = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
        log::debug!("ONNX inference on {} rows took {}us", rows, elapsed);

        Ok(labels)
    }

    fn name(&self) -> &str {
        &self.metadata.model_path
    }
}

/// Read `<model>.json` next to the model. A missing sidecar means "trust the
/// model"; an unreadable one, or one naming other classes, refuses the model.
fn load_sidecar(model_path: &Path) -> Result<SidecarMetadata, InferenceError> {
    let sidecar_path = format!("{}.json", model_path.display());
    let sidecar = match read_sidecar(Path::new(&sidecar_path))? {
        Some(sidecar) => sidecar,
        None => return Ok(SidecarMetadata::default()),
    };

    if let Some(classes) = &sidecar.classes {
        if classes.iter().map(String::as_str).ne(ATTACK_LABELS) {
            return Err(InferenceError(format!(
                "Model classes {:?} do not match {:?}",
                classes, ATTACK_LABELS
            )));
        }
    }

    log::info!("Model metadata loaded from: {}", sidecar_path);
    Ok(sidecar)
}

fn read_sidecar(path: &Path) -> Result<Option<SidecarMetadata>, InferenceError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| InferenceError(format!("Failed to read metadata: {}", e)))?;

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| InferenceError(format!("Failed to parse metadata: {}", e)))
}

// ============================================================================
// OUTPUT DECODING
// ============================================================================

/// Integer label tensor → class indices
pub fn decode_labels(data: &[i64], rows: usize) -> Result<Vec<usize>, InferenceError> {
    if data.len() != rows {
        return Err(InferenceError(format!(
            "Expected {} labels, model returned {}", rows, data.len()
        )));
    }

    data.iter()
        .map(|&v| usize::try_from(v)
            .map_err(|_| InferenceError(format!("Negative class index {}", v))))
        .collect()
}

/// Score tensor (rows × classes, row-major) → argmax per row.
/// A single column is read as a numeric label.
pub fn decode_scores(data: &[f32], rows: usize) -> Result<Vec<usize>, InferenceError> {
    if rows == 0 || data.is_empty() || data.len() % rows != 0 {
        return Err(InferenceError(format!(
            "Cannot split {} scores into {} rows", data.len(), rows
        )));
    }

    let classes = data.len() / rows;
    data.chunks(classes)
        .map(|chunk| {
            if classes == 1 {
                let v = chunk[0].round();
                return if v.is_finite() && v >= 0.0 {
                    Ok(v as usize)
                } else {
                    Err(InferenceError(format!("Invalid class value {}", chunk[0])))
                };
            }

            chunk.iter()
                .enumerate()
                .filter(|(_, v)| !v.is_nan())
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .ok_or_else(|| InferenceError("All class scores are NaN".to_string()))
        })
        .collect()
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_labels() {
        assert_eq!(decode_labels(&[0, 2, 1], 3).unwrap(), vec![0, 2, 1]);
        assert!(decode_labels(&[0, 1], 3).is_err());
        assert!(decode_labels(&[-1], 1).is_err());
    }

    #[test]
    fn test_decode_scores_argmax() {
        let scores = [0.1, 0.7, 0.2, 0.8, 0.1, 0.1];
        assert_eq!(decode_scores(&scores, 2).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_decode_scores_single_column() {
        assert_eq!(decode_scores(&[2.0, 0.0], 2).unwrap(), vec![2, 0]);
        assert!(decode_scores(&[-1.0], 1).is_err());
    }

    #[test]
    fn test_decode_scores_bad_shape() {
        assert!(decode_scores(&[0.1, 0.2, 0.3], 2).is_err());
        assert!(decode_scores(&[], 1).is_err());
    }

    #[test]
    fn test_load_missing_model() {
        let err = OnnxClassifier::load(Path::new("does/not/exist.onnx")).err().unwrap();
        assert!(err.to_string().contains("Model not found"));
    }

    #[test]
    fn test_read_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx.json");
        assert!(read_sidecar(&path).unwrap().is_none());

        std::fs::write(&path, r#"{"feature_names": ["a", "b"], "classes": ["DDoS"]}"#).unwrap();
        let sidecar = read_sidecar(&path).unwrap().unwrap();
        assert_eq!(sidecar.feature_names, Some(vec!["a".to_string(), "b".to_string()]));

        std::fs::write(&path, "not json").unwrap();
        assert!(read_sidecar(&path).is_err());
    }

    #[test]
    fn test_load_sidecar_class_order() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.onnx");
        let sidecar = dir.path().join("model.onnx.json");

        assert!(load_sidecar(&model).unwrap().feature_names.is_none());

        std::fs::write(&sidecar, r#"{"classes": ["DDoS", "Intrusion", "Malware"]}"#).unwrap();
        assert!(load_sidecar(&model).is_ok());

        std::fs::write(&sidecar, r#"{"classes": ["Malware", "Intrusion", "DDoS"]}"#).unwrap();
        let err = load_sidecar(&model).err().unwrap();
        assert!(err.to_string().contains("do not match"));

        std::fs::write(&sidecar, r#"{"classes": ["DDoS", "Intrusion"]}"#).unwrap();
        assert!(load_sidecar(&model).is_err());
    }

    #[test]
    fn test_corrupt_sidecar_refuses_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.onnx");
        std::fs::write(&model, b"not an onnx graph").unwrap();
        std::fs::write(dir.path().join("model.onnx.json"), "not json").unwrap();

        let err = OnnxClassifier::load(&model).err().unwrap();
        assert!(err.to_string().contains("Failed to parse metadata"));
    }
}
