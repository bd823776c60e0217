//! ONNX pipeline loader

use crate::config::ModelsConfig;
use crate::models::onnx::{GraphInput, InputElement, OnnxPipeline};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use std::path::Path;
use tracing::info;

/// Name of the yield regressor
pub const YIELD_MODEL: &str = "yield";

/// Name of the resilience classifier
pub const RESILIENCE_MODEL: &str = "resilience";

/// Loader for ONNX pipelines
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a single pipeline from file.
    ///
    /// A missing or unreadable artifact is an error; callers treat it as fatal.
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<OnnxPipeline> {
        let path = path.as_ref();

        if !path.is_file() {
            anyhow::bail!("{} model artifact not found at {}", name, path.display());
        }

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load {} model from {}", name, path.display()))?;

        let inputs: Vec<GraphInput> = session
            .inputs
            .iter()
            .map(|input| GraphInput {
                name: input.name.clone(),
                element: input_element(&input.input_type),
            })
            .collect();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .with_context(|| format!("{} model at {} declares no outputs", name, path.display()))?;

        info!(
            model = %name,
            inputs = inputs.len(),
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(OnnxPipeline::new(name, session, inputs, output_name))
    }

    /// Load the yield regressor and the resilience classifier.
    pub fn load_pipelines(&self, models: &ModelsConfig) -> Result<(OnnxPipeline, OnnxPipeline)> {
        let models_dir = Path::new(&models.models_dir);

        let yield_pipeline = self.load_model(models_dir.join(&models.yield_model), YIELD_MODEL)?;
        let resilience_pipeline =
            self.load_model(models_dir.join(&models.resilience_model), RESILIENCE_MODEL)?;

        Ok((yield_pipeline, resilience_pipeline))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Map a declared graph input type to the element types the binder handles
fn input_element(value_type: &ValueType) -> InputElement {
    match value_type {
        ValueType::Tensor { ty, .. } => match ty {
            TensorElementType::Float32 => InputElement::Float32,
            TensorElementType::Float64 => InputElement::Float64,
            TensorElementType::Int64 => InputElement::Int64,
            TensorElementType::Int32 => InputElement::Int32,
            TensorElementType::String => InputElement::String,
            other => InputElement::Unsupported(format!("{:?}", other)),
        },
        other => InputElement::Unsupported(format!("{:?}", other)),
    }
}
