//! Crop Resilience Advisor Library
//!
//! Decision support for climate resilient agriculture: collects climate, soil,
//! water and management inputs, derives a Climate Stress Index, and runs two
//! pre-trained pipelines to predict crop yield and climate resilience.

pub mod config;
pub mod error;
pub mod feature_deriver;
pub mod form;
pub mod host;
pub mod metrics;
pub mod models;
pub mod presenter;
pub mod render;
pub mod types;

pub use config::AppConfig;
pub use error::{FormError, InferenceError};
pub use feature_deriver::{FeatureDeriver, ModelInput};
pub use form::InputForm;
pub use models::inference::InferenceEngine;
pub use presenter::{DisplayFrame, Presenter};
pub use render::Renderer;
pub use types::{prediction::PredictionResult, record::InputRecord};
