//! Error types for the form and the inference pass

use thiserror::Error;

/// Input rejected by a form control. The control keeps its previous value.
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("unknown input field '{0}'")]
    UnknownField(String),

    #[error("'{value}' is not a number (field {field})")]
    InvalidNumber { field: String, value: String },

    #[error("'{value}' is not an option for {field}; expected one of: {options}")]
    UnknownOption {
        field: String,
        value: String,
        options: String,
    },

    #[error("unsupported value {value} for field {field}")]
    InvalidValue { field: String, value: String },
}

/// Failure of a render pass while invoking a pipeline
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The record does not carry what the pipeline's input schema asks for
    #[error("schema mismatch in {model} pipeline: {detail}")]
    SchemaMismatch { model: String, detail: String },

    #[error("unexpected output from {model} pipeline: {detail}")]
    UnexpectedOutput { model: String, detail: String },

    #[error("onnx runtime error in {model} pipeline: {source}")]
    Runtime {
        model: String,
        #[source]
        source: ort::Error,
    },

    #[error("{model} pipeline session lock poisoned")]
    Poisoned { model: String },
}

impl InferenceError {
    pub fn schema_mismatch(model: &str, detail: impl Into<String>) -> Self {
        InferenceError::SchemaMismatch {
            model: model.to_string(),
            detail: detail.into(),
        }
    }

    pub fn unexpected_output(model: &str, detail: impl Into<String>) -> Self {
        InferenceError::UnexpectedOutput {
            model: model.to_string(),
            detail: detail.into(),
        }
    }
}
