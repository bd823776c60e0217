//! Inference engine: runs both pipelines on one derived record

use crate::config::AppConfig;
use crate::error::InferenceError;
use crate::feature_deriver::ModelInput;
use crate::models::loader::ModelLoader;
use crate::models::pipeline::{Pipeline, PipelineOutput};
use crate::types::prediction::PredictionResult;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Holds the two loaded pipelines and invokes them per render pass
pub struct InferenceEngine {
    yield_pipeline: Arc<dyn Pipeline>,
    resilience_pipeline: Arc<dyn Pipeline>,
}

impl InferenceEngine {
    /// Build an engine from already-loaded pipelines
    pub fn new(yield_pipeline: Arc<dyn Pipeline>, resilience_pipeline: Arc<dyn Pipeline>) -> Self {
        Self {
            yield_pipeline,
            resilience_pipeline,
        }
    }

    /// Load both ONNX pipelines named in the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.models.onnx_threads)?;
        let (yield_pipeline, resilience_pipeline) = loader.load_pipelines(&config.models)?;

        info!(
            models_dir = %config.models.models_dir,
            yield_model = %config.models.yield_model,
            resilience_model = %config.models.resilience_model,
            "Inference engine initialized"
        );

        Ok(Self::new(Arc::new(yield_pipeline), Arc::new(resilience_pipeline)))
    }

    /// Get loaded model names
    pub fn model_names(&self) -> Vec<String> {
        vec![
            self.yield_pipeline.name().to_string(),
            self.resilience_pipeline.name().to_string(),
        ]
    }

    /// Predict yield and resilience for a derived record.
    ///
    /// The record is passed to both pipelines unmodified. Any pipeline error
    /// fails the whole pass; nothing is retried.
    pub fn predict(&self, input: &ModelInput) -> Result<PredictionResult, InferenceError> {
        let yield_kg_per_ha = match self.yield_pipeline.predict(input)? {
            PipelineOutput::Scalar(value) => value,
            other => {
                return Err(InferenceError::unexpected_output(
                    self.yield_pipeline.name(),
                    format!("expected a scalar yield, got a {}", other.kind()),
                ))
            }
        };

        let resilience_label = match self.resilience_pipeline.predict(input)? {
            PipelineOutput::Label(label) => label,
            other => {
                return Err(InferenceError::unexpected_output(
                    self.resilience_pipeline.name(),
                    format!("expected a resilience label, got a {}", other.kind()),
                ))
            }
        };

        debug!(
            yield_kg_per_ha = yield_kg_per_ha,
            resilience = %resilience_label,
            climate_stress_index = input.climate_stress_index,
            "Inference complete"
        );

        Ok(PredictionResult::new(yield_kg_per_ha, resilience_label))
    }
}
