//! Opaque prediction pipeline interface

use crate::error::InferenceError;
use crate::feature_deriver::ModelInput;

/// First output of a pipeline's prediction
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// Regressor output
    Scalar(f64),
    /// Classifier output
    Label(String),
}

impl PipelineOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineOutput::Scalar(_) => "scalar",
            PipelineOutput::Label(_) => "label",
        }
    }
}

/// A trained pipeline (preprocessing + estimator) exposing one inference call.
///
/// Implementations receive the raw record and do their own encoding and
/// scaling. They are loaded once and shared read-only between render passes.
pub trait Pipeline: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Predict for a single record.
    fn predict(&self, input: &ModelInput) -> Result<PipelineOutput, InferenceError>;
}
