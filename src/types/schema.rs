//! Declared schema of the input form: one entry per control

use crate::types::record::{
    ColumnValue, District, IrrigationSource, SeedVariety, Season, State,
};

/// Kind of control and its declared bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Integer slider
    Int { min: i64, max: i64, default: i64 },
    /// Float slider
    Float { min: f64, max: f64, default: f64 },
    /// Select box; the first option is the default selection
    Choice { options: &'static [&'static str] },
}

/// One form control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Column name the pipelines expect
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn int(name: &'static str, label: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Int { min, max, default },
        }
    }

    const fn float(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Float { min, max, default },
        }
    }

    const fn choice(name: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice { options },
        }
    }

    /// Default value of the control
    pub fn default_value(&self) -> ColumnValue {
        match self.kind {
            FieldKind::Int { default, .. } => ColumnValue::Int(default),
            FieldKind::Float { default, .. } => ColumnValue::Float(default),
            FieldKind::Choice { options } => ColumnValue::Text(options.first().copied().unwrap_or("")),
        }
    }

    /// Whether `name` refers to this control, by column name or label
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name) || self.label.eq_ignore_ascii_case(name)
    }

    /// Range or option list, for help output
    pub fn describe(&self) -> String {
        match self.kind {
            FieldKind::Int { min, max, default } => {
                format!("int {}..={} (default {})", min, max, default)
            }
            FieldKind::Float { min, max, default } => {
                format!("float {}..={} (default {})", min, max, default)
            }
            FieldKind::Choice { options } => {
                format!("one of [{}] (default {})", options.join(", "), self.default_value())
            }
        }
    }
}

/// Every control in form order
pub const INPUT_FIELDS: [FieldSpec; 24] = [
    FieldSpec::int("Year", "Year", 2000, 2030, 2020),
    FieldSpec::float("Avg_Temperature", "Avg Temperature (°C)", 15.0, 35.0, 25.0),
    FieldSpec::float("Temp_Anomaly", "Temperature Anomaly (°C)", -5.0, 5.0, 0.0),
    FieldSpec::int("Rainfall_mm", "Rainfall (mm)", 300, 1500, 800),
    FieldSpec::int("Relative_Humidity", "Relative Humidity (%)", 30, 100, 65),
    FieldSpec::int("Heatwave_Days", "Heatwave Days", 0, 10, 2),
    FieldSpec::int("Dry_Spell_Count", "Dry Spell Count", 0, 15, 5),
    FieldSpec::float("Soil_Organic_Carbon", "Soil Organic Carbon", 0.40, 0.80, 0.55),
    FieldSpec::float("Soil_pH", "Soil pH", 5.5, 8.5, 6.8),
    FieldSpec::int("Water_Holding_Capacity", "Water Holding Capacity (%)", 30, 60, 40),
    FieldSpec::float("Electrical_Conductivity", "Electrical Conductivity", 0.5, 2.0, 1.1),
    FieldSpec::int("Irrigation_Coverage", "Irrigation Coverage (%)", 0, 60, 30),
    FieldSpec::int("Groundwater_Depth", "Groundwater Depth (m)", 10, 50, 30),
    FieldSpec::float("Wind_Speed", "Wind Speed (m/s)", 0.5, 6.0, 2.5),
    FieldSpec::float("Solar_Radiation", "Solar Radiation", 10.0, 30.0, 20.0),
    FieldSpec::int("CO2_Concentration", "CO₂ Concentration (ppm)", 380, 480, 420),
    FieldSpec::int("PM2_5", "PM2.5", 5, 300, 80),
    FieldSpec::int("PM10", "PM10", 10, 500, 150),
    FieldSpec::float("Aerosol_Optical_Depth", "Aerosol Optical Depth", 0.05, 3.0, 1.2),
    FieldSpec::choice("Season", "Season", Season::OPTIONS),
    FieldSpec::choice("State", "State", State::OPTIONS),
    FieldSpec::choice("District", "District", District::OPTIONS),
    FieldSpec::choice("Seed_Variety", "Seed Variety", SeedVariety::OPTIONS),
    FieldSpec::choice("Irrigation_Source", "Irrigation Source", IrrigationSource::OPTIONS),
];

/// Find a control by column name or label (case-insensitive)
pub fn find_field(name: &str) -> Option<&'static FieldSpec> {
    INPUT_FIELDS.iter().find(|spec| spec.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::InputRecord;

    #[test]
    fn test_schema_matches_record_columns() {
        let columns = InputRecord::default().columns();

        assert_eq!(columns.len(), INPUT_FIELDS.len());
        for (spec, column) in INPUT_FIELDS.iter().zip(columns.iter()) {
            assert_eq!(spec.name, column.name);
        }
    }

    #[test]
    fn test_schema_defaults_match_default_record() {
        let record = InputRecord::default();

        for spec in INPUT_FIELDS.iter() {
            assert_eq!(
                record.column(spec.name),
                Some(spec.default_value()),
                "default mismatch for {}",
                spec.name
            );
        }
    }

    #[test]
    fn test_defaults_within_bounds() {
        for spec in INPUT_FIELDS.iter() {
            match spec.kind {
                FieldKind::Int { min, max, default } => assert!(min <= default && default <= max),
                FieldKind::Float { min, max, default } => {
                    assert!(min <= default && default <= max)
                }
                FieldKind::Choice { options } => assert!(!options.is_empty()),
            }
        }
    }

    #[test]
    fn test_find_field_by_name_or_label() {
        assert_eq!(find_field("Heatwave_Days").map(|s| s.name), Some("Heatwave_Days"));
        assert_eq!(find_field("heatwave days").map(|s| s.name), Some("Heatwave_Days"));
        assert_eq!(find_field("PM2.5").map(|s| s.name), Some("PM2_5"));
        assert!(find_field("Crop_Yield").is_none());
    }
}
