//! ONNX-backed pipeline.
//!
//! Pipelines exported from a mixed-type training frame take one graph input
//! per column, each a `[1, 1]` tensor whose element type follows the column
//! (float, int64 or string). Inputs are bound to record columns by name.

use crate::error::InferenceError;
use crate::feature_deriver::ModelInput;
use crate::models::pipeline::{Pipeline, PipelineOutput};
use crate::types::record::ColumnValue;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Element type a graph input declares
#[derive(Debug, Clone, PartialEq)]
pub enum InputElement {
    Float32,
    Float64,
    Int64,
    Int32,
    String,
    Unsupported(String),
}

/// A declared graph input
#[derive(Debug, Clone, PartialEq)]
pub struct GraphInput {
    pub name: String,
    pub element: InputElement,
}

/// A column value converted to a graph input's element type
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    F32(f32),
    F64(f64),
    I64(i64),
    I32(i32),
    Str(String),
}

/// Convert a column value to what the graph input declares.
///
/// Integer columns widen to any numeric input; float columns only bind to
/// float inputs; categorical text only binds to string inputs.
pub fn bind_column(
    model: &str,
    input: &GraphInput,
    value: ColumnValue,
) -> Result<BoundValue, InferenceError> {
    let bound = match (&input.element, value) {
        (InputElement::Float32, ColumnValue::Int(v)) => BoundValue::F32(v as f32),
        (InputElement::Float32, ColumnValue::Float(v)) => BoundValue::F32(v as f32),
        (InputElement::Float64, ColumnValue::Int(v)) => BoundValue::F64(v as f64),
        (InputElement::Float64, ColumnValue::Float(v)) => BoundValue::F64(v),
        (InputElement::Int64, ColumnValue::Int(v)) => BoundValue::I64(v),
        (InputElement::Int32, ColumnValue::Int(v)) => {
            let narrowed = i32::try_from(v).map_err(|_| {
                InferenceError::schema_mismatch(
                    model,
                    format!("column {} value {} does not fit int32", input.name, v),
                )
            })?;
            BoundValue::I32(narrowed)
        }
        (InputElement::String, ColumnValue::Text(v)) => BoundValue::Str(v.to_string()),
        (element, value) => {
            return Err(InferenceError::schema_mismatch(
                model,
                format!(
                    "column {} has dtype {} but the pipeline expects {:?}",
                    input.name,
                    value.dtype(),
                    element
                ),
            ))
        }
    };
    Ok(bound)
}

/// Bind every declared graph input to the record column of the same name.
pub fn bind_inputs(
    model: &str,
    inputs: &[GraphInput],
    record: &ModelInput,
) -> Result<Vec<(String, BoundValue)>, InferenceError> {
    inputs
        .iter()
        .map(|input| {
            let value = record.column(&input.name).ok_or_else(|| {
                InferenceError::schema_mismatch(
                    model,
                    format!("missing column {}", input.name),
                )
            })?;
            Ok((input.name.clone(), bind_column(model, input, value)?))
        })
        .collect()
}

/// ONNX Runtime session wrapped as a [`Pipeline`]
pub struct OnnxPipeline {
    name: String,
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    inputs: Vec<GraphInput>,
    output_name: String,
}

impl OnnxPipeline {
    pub fn new(name: &str, session: Session, inputs: Vec<GraphInput>, output_name: String) -> Self {
        Self {
            name: name.to_string(),
            session: Mutex::new(session),
            inputs,
            output_name,
        }
    }

    fn runtime_error(&self, source: ort::Error) -> InferenceError {
        InferenceError::Runtime {
            model: self.name.clone(),
            source,
        }
    }

    fn to_tensor(&self, value: BoundValue) -> Result<DynValue, InferenceError> {
        let shape = vec![1_i64, 1];
        let tensor = match value {
            BoundValue::F32(v) => Tensor::from_array((shape, vec![v])).map(|t| t.into_dyn()),
            BoundValue::F64(v) => Tensor::from_array((shape, vec![v])).map(|t| t.into_dyn()),
            BoundValue::I64(v) => Tensor::from_array((shape, vec![v])).map(|t| t.into_dyn()),
            BoundValue::I32(v) => Tensor::from_array((shape, vec![v])).map(|t| t.into_dyn()),
            BoundValue::Str(v) => {
                Tensor::from_string_array((shape, &[v][..])).map(|t| t.into_dyn())
            }
        };
        tensor.map_err(|e| self.runtime_error(e))
    }
}

/// Read the first element of a pipeline output as a scalar or a label
fn extract_output(
    model: &str,
    output_name: &str,
    output: &DynValue,
) -> Result<PipelineOutput, InferenceError> {
    let empty = || {
        InferenceError::unexpected_output(model, format!("output {} is empty", output_name))
    };

    if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
        return data
            .first()
            .map(|v| PipelineOutput::Scalar(*v as f64))
            .ok_or_else(empty);
    }
    if let Ok((_, data)) = output.try_extract_tensor::<f64>() {
        return data.first().map(|v| PipelineOutput::Scalar(*v)).ok_or_else(empty);
    }
    // Classifiers trained on integer-coded classes emit int64 labels
    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return data
            .first()
            .map(|v| PipelineOutput::Label(v.to_string()))
            .ok_or_else(empty);
    }
    if let Ok((_, labels)) = output.try_extract_strings() {
        return labels
            .into_iter()
            .next()
            .map(PipelineOutput::Label)
            .ok_or_else(empty);
    }

    Err(InferenceError::unexpected_output(
        model,
        format!("output {} is not a numeric or string tensor", output_name),
    ))
}

impl Pipeline for OnnxPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &ModelInput) -> Result<PipelineOutput, InferenceError> {
        let bound = bind_inputs(&self.name, &self.inputs, input)?;

        let mut feeds: Vec<(String, DynValue)> = Vec::with_capacity(bound.len());
        for (name, value) in bound {
            feeds.push((name, self.to_tensor(value)?));
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Poisoned {
                model: self.name.clone(),
            })?;

        let outputs = session.run(feeds).map_err(|e| self.runtime_error(e))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            InferenceError::unexpected_output(
                &self.name,
                format!("output {} missing from results", self.output_name),
            )
        })?;

        let prediction = extract_output(&self.name, &self.output_name, output)?;
        debug!(model = %self.name, output = ?prediction, "Pipeline prediction");

        Ok(prediction)
    }
}
