//! Prediction outputs of the two pipelines

use serde::{Deserialize, Serialize};

/// Resilience classes the classifier was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResilienceLevel {
    Low,
    Medium,
    High,
}

impl ResilienceLevel {
    /// Parse a classifier label; only the exact class names are recognised
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(ResilienceLevel::Low),
            "Medium" => Some(ResilienceLevel::Medium),
            "High" => Some(ResilienceLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResilienceLevel::Low => "Low",
            ResilienceLevel::Medium => "Medium",
            ResilienceLevel::High => "High",
        }
    }
}

/// Result of one inference pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted crop yield (kg/ha)
    pub yield_kg_per_ha: f64,

    /// Raw label from the resilience classifier, passed through unchanged
    pub resilience_label: String,
}

impl PredictionResult {
    pub fn new(yield_kg_per_ha: f64, resilience_label: impl Into<String>) -> Self {
        Self {
            yield_kg_per_ha,
            resilience_label: resilience_label.into(),
        }
    }

    /// Recognised resilience class, `None` for labels outside the training classes
    pub fn resilience_level(&self) -> Option<ResilienceLevel> {
        ResilienceLevel::from_label(&self.resilience_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resilience_level_from_label() {
        assert_eq!(ResilienceLevel::from_label("High"), Some(ResilienceLevel::High));
        assert_eq!(ResilienceLevel::from_label("Low"), Some(ResilienceLevel::Low));
        assert_eq!(ResilienceLevel::from_label("high"), None);
        assert_eq!(ResilienceLevel::from_label("Very High"), None);
    }

    #[test]
    fn test_prediction_keeps_raw_label() {
        let prediction = PredictionResult::new(2450.7, "Unknown");

        assert_eq!(prediction.resilience_label, "Unknown");
        assert_eq!(prediction.resilience_level(), None);
        assert_eq!(
            PredictionResult::new(1.0, "Medium").resilience_level(),
            Some(ResilienceLevel::Medium)
        );
    }
}
