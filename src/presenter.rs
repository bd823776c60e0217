//! Presentation of predictions: metrics plus a rule-based interpretation

use crate::config::{DisplayConfig, DisplayFormat};
use crate::error::InferenceError;
use crate::feature_deriver::ModelInput;
use crate::types::prediction::PredictionResult;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::warn;

pub const TITLE: &str = "Climate Resilient Agriculture – Decision Support System";
pub const YIELD_METRIC_LABEL: &str = "Predicted Yield (kg/ha)";
pub const RESILIENCE_METRIC_LABEL: &str = "Climate Resilience Level";

pub const HIGH_MESSAGE: &str = "High resilience: the system can maintain yield under climate stress.";
pub const MEDIUM_MESSAGE: &str = "Moderate resilience: adaptive measures are recommended.";
pub const LOW_MESSAGE: &str = "Low resilience: high vulnerability to climate extremes.";

/// Tone of the interpretation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Error => "error",
        }
    }
}

/// Canned message for a resilience label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub tone: Tone,
    pub message: &'static str,
}

/// Interpret a resilience label.
///
/// Only the exact labels "High" and "Medium" get their own message; every
/// other label, "Low" included, is read as high vulnerability.
pub fn interpret(resilience_label: &str) -> Interpretation {
    match resilience_label {
        "High" => Interpretation {
            tone: Tone::Success,
            message: HIGH_MESSAGE,
        },
        "Medium" => Interpretation {
            tone: Tone::Warning,
            message: MEDIUM_MESSAGE,
        },
        _ => Interpretation {
            tone: Tone::Error,
            message: LOW_MESSAGE,
        },
    }
}

/// Yield as shown on the metric: rounded to a whole number
pub fn format_yield(yield_kg_per_ha: f64) -> String {
    format!("{:.0}", yield_kg_per_ha)
}

/// Everything one render pass displays
#[derive(Debug, Clone, Serialize)]
pub struct DisplayFrame {
    pub generated_at: DateTime<Utc>,
    pub yield_kg_per_ha: f64,
    pub yield_text: String,
    pub resilience_level: String,
    pub interpretation: Interpretation,
    pub climate_stress_index: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ModelInput>,
}

/// Turns predictions into display frames and writes them out
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    format: DisplayFormat,
    show_inputs: bool,
}

impl Presenter {
    pub fn new(format: DisplayFormat, show_inputs: bool) -> Self {
        Self {
            format,
            show_inputs,
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.show_inputs)
    }

    /// Build the frame for one prediction.
    pub fn present(&self, prediction: &PredictionResult, input: &ModelInput) -> DisplayFrame {
        if prediction.resilience_level().is_none() {
            warn!(
                label = %prediction.resilience_label,
                "Resilience label outside Low/Medium/High, shown as low resilience"
            );
        }

        DisplayFrame {
            generated_at: Utc::now(),
            yield_kg_per_ha: prediction.yield_kg_per_ha,
            yield_text: format_yield(prediction.yield_kg_per_ha),
            resilience_level: prediction.resilience_label.clone(),
            interpretation: interpret(&prediction.resilience_label),
            climate_stress_index: input.climate_stress_index,
            inputs: self.show_inputs.then(|| input.clone()),
        }
    }

    /// Write a frame in the configured format.
    pub fn render(&self, frame: &DisplayFrame) -> Result<String> {
        match self.format {
            DisplayFormat::Json => Ok(serde_json::to_string(frame)?),
            DisplayFormat::Text => Ok(render_text(frame)),
        }
    }

    /// Write a failed render pass the way the host shows an uncaught error.
    pub fn render_failure(&self, error: &InferenceError) -> String {
        match self.format {
            DisplayFormat::Json => serde_json::json!({
                "generated_at": Utc::now(),
                "error": error.to_string(),
            })
            .to_string(),
            DisplayFormat::Text => format!("{}\n[error] {}\n", TITLE, error),
        }
    }
}

fn render_text(frame: &DisplayFrame) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", "=".repeat(TITLE.chars().count()));

    if let Some(inputs) = &frame.inputs {
        let _ = writeln!(out, "Inputs");
        for column in inputs.columns() {
            let _ = writeln!(out, "  {:<24} {}", column.name, column.value);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Predictions");
    let _ = writeln!(out, "  {:<26} {}", YIELD_METRIC_LABEL, frame.yield_text);
    let _ = writeln!(out, "  {:<26} {}", RESILIENCE_METRIC_LABEL, frame.resilience_level);
    let _ = writeln!(out);
    let _ = writeln!(out, "Interpretation");
    let _ = writeln!(
        out,
        "  [{}] {}",
        frame.interpretation.tone.as_str(),
        frame.interpretation.message
    );

    out
}
