//! ML pipeline components

pub mod inference;
pub mod loader;
pub mod onnx;
pub mod pipeline;

pub use inference::InferenceEngine;
pub use loader::ModelLoader;
pub use onnx::OnnxPipeline;
pub use pipeline::{Pipeline, PipelineOutput};
