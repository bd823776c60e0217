//! Derived features computed from the collected record before inference.
//!
//! The resilience classifier was trained with a Climate Stress Index column:
//! the mean of three stress indicators, each standardised against fixed
//! training statistics. The constants here must match that training run.

use crate::types::record::{Column, ColumnValue, InputRecord};
use serde::Serialize;

/// Name of the derived column
pub const CLIMATE_STRESS_INDEX: &str = "Climate_Stress_Index";

/// Source columns of the stress index, in constant order
pub const STRESS_FEATURES: [&str; 3] = ["Heatwave_Days", "Dry_Spell_Count", "Temp_Anomaly"];

/// Training means of the stress features
pub const STRESS_MEAN: [f64; 3] = [2.5, 5.0, 0.0];

/// Training standard deviations of the stress features
pub const STRESS_STD: [f64; 3] = [2.0, 4.0, 2.0];

/// Mean of the standardised heatwave, dry-spell and temperature-anomaly values.
pub fn climate_stress_index(heatwave_days: f64, dry_spell_count: f64, temp_anomaly: f64) -> f64 {
    let values = [heatwave_days, dry_spell_count, temp_anomaly];

    let total: f64 = values
        .iter()
        .zip(STRESS_MEAN.iter().zip(STRESS_STD.iter()))
        .map(|(&x, (&mean, &std))| (x - mean) / std)
        .sum();

    total / values.len() as f64
}

/// The record as the pipelines see it: every collected field plus the
/// derived stress index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInput {
    #[serde(flatten)]
    pub record: InputRecord,

    #[serde(rename = "Climate_Stress_Index")]
    pub climate_stress_index: f64,
}

impl ModelInput {
    /// All 25 columns: the form fields in order, then the derived index.
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = self.record.columns();
        columns.push(Column {
            name: CLIMATE_STRESS_INDEX,
            value: ColumnValue::Float(self.climate_stress_index),
        });
        columns
    }

    /// Value of a single column by name
    pub fn column(&self, name: &str) -> Option<ColumnValue> {
        if name == CLIMATE_STRESS_INDEX {
            return Some(ColumnValue::Float(self.climate_stress_index));
        }
        self.record.column(name)
    }
}

/// Computes derived features from a collected record.
pub struct FeatureDeriver;

impl FeatureDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Append the Climate Stress Index to a record.
    ///
    /// Pure: the same record always yields the same input.
    pub fn derive(&self, record: &InputRecord) -> ModelInput {
        let climate_stress_index = climate_stress_index(
            record.heatwave_days as f64,
            record.dry_spell_count as f64,
            record.temp_anomaly,
        );

        ModelInput {
            record: record.clone(),
            climate_stress_index,
        }
    }

    /// Number of columns handed to the pipelines.
    pub fn feature_count(&self) -> usize {
        self.feature_names().len()
    }

    /// Column names handed to the pipelines, in order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.derive(&InputRecord::default())
            .columns()
            .into_iter()
            .map(|c| c.name)
            .collect()
    }
}

impl Default for FeatureDeriver {
    fn default() -> Self {
        Self::new()
    }
}
