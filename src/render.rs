//! One render pass: collect → derive → predict → present

use crate::error::InferenceError;
use crate::feature_deriver::FeatureDeriver;
use crate::models::inference::InferenceEngine;
use crate::presenter::{DisplayFrame, Presenter};
use crate::types::record::InputRecord;
use tracing::debug;

/// Runs the full pass for a record. Holds the process-wide pipelines.
pub struct Renderer {
    deriver: FeatureDeriver,
    engine: InferenceEngine,
    presenter: Presenter,
}

impl Renderer {
    pub fn new(engine: InferenceEngine, presenter: Presenter) -> Self {
        Self {
            deriver: FeatureDeriver::new(),
            engine,
            presenter,
        }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Render once for the given inputs.
    ///
    /// The stress index is derived before either pipeline runs. A pipeline
    /// failure aborts the pass and is returned as is.
    pub fn render_once(&self, record: &InputRecord) -> Result<DisplayFrame, InferenceError> {
        let input = self.deriver.derive(record);
        debug!(
            climate_stress_index = input.climate_stress_index,
            "Derived climate stress index"
        );

        let prediction = self.engine.predict(&input)?;

        Ok(self.presenter.present(&prediction, &input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_deriver::CLIMATE_STRESS_INDEX;
    use crate::models::inference::tests::StubPipeline;
    use crate::presenter::{Tone, LOW_MESSAGE};
    use std::sync::Arc;

    #[test]
    fn test_default_inputs_end_to_end() {
        let yield_stub = Arc::new(StubPipeline::scalar(2650.49));
        let resilience_stub =
            Arc::new(StubPipeline::label("High").requiring(&[CLIMATE_STRESS_INDEX]));
        let renderer = Renderer::new(
            InferenceEngine::new(yield_stub.clone(), resilience_stub.clone()),
            Presenter::default(),
        );

        let frame = renderer.render_once(&InputRecord::default()).unwrap();

        assert_eq!(frame.yield_text, "2650");
        assert_eq!(frame.resilience_level, "High");
        assert_eq!(frame.interpretation.tone, Tone::Success);
        assert!((frame.climate_stress_index - (-0.25 / 3.0)).abs() < 1e-12);

        let seen = resilience_stub.seen.lock().unwrap();
        assert_eq!(seen[0].record, InputRecord::default());
        assert_eq!(seen[0].columns().len(), 25);
        assert_eq!(yield_stub.seen.lock().unwrap()[0], seen[0]);
    }

    #[test]
    fn test_unexpected_label_falls_through_to_low() {
        let renderer = Renderer::new(
            InferenceEngine::new(
                Arc::new(StubPipeline::scalar(100.0)),
                Arc::new(StubPipeline::label("Unknown")),
            ),
            Presenter::default(),
        );

        let frame = renderer.render_once(&InputRecord::default()).unwrap();

        assert_eq!(frame.resilience_level, "Unknown");
        assert_eq!(frame.interpretation.tone, Tone::Error);
        assert_eq!(frame.interpretation.message, LOW_MESSAGE);
    }

    #[test]
    fn test_schema_mismatch_fails_render() {
        let renderer = Renderer::new(
            InferenceEngine::new(
                Arc::new(StubPipeline::scalar(100.0)),
                Arc::new(StubPipeline::label("High").requiring(&["Soil_Moisture"])),
            ),
            Presenter::default(),
        );

        let err = renderer.render_once(&InputRecord::default()).unwrap_err();

        assert!(matches!(err, InferenceError::SchemaMismatch { .. }));
    }
}
