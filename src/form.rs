//! Input form: the controls a user adjusts and the record they collect into.
//!
//! Each control behaves like a bounded widget. Numbers are clamped to the
//! declared range (and rounded for integer controls), select boxes only accept
//! one of their options. Rejected input leaves the control unchanged, so the
//! collected record is always well-formed.

use crate::error::FormError;
use crate::types::record::{ColumnValue, InputRecord};
use crate::types::schema::{find_field, FieldKind, FieldSpec};
use serde_json::Value;
use tracing::debug;

/// Current state of every control
#[derive(Debug, Clone, Default)]
pub struct InputForm {
    current: InputRecord,
}

impl InputForm {
    /// Create a form with every control at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a control from raw text, as typed by the user.
    ///
    /// Returns the value the control settled on after clamping.
    pub fn set(&mut self, field: &str, raw: &str) -> Result<ColumnValue, FormError> {
        let spec = lookup(field)?;
        let value = parse_value(spec, raw)?;
        self.store(spec, value)
    }

    /// Set a control from a JSON value (number or string).
    pub fn set_json(&mut self, field: &str, value: &Value) -> Result<ColumnValue, FormError> {
        let spec = lookup(field)?;
        let value = match value {
            Value::String(s) => parse_value(spec, s)?,
            Value::Number(n) => parse_value(spec, &n.to_string())?,
            other => {
                return Err(FormError::InvalidValue {
                    field: spec.name.to_string(),
                    value: other.to_string(),
                })
            }
        };
        self.store(spec, value)
    }

    /// Return one control to its default.
    pub fn reset(&mut self, field: &str) -> Result<ColumnValue, FormError> {
        let spec = lookup(field)?;
        self.store(spec, spec.default_value())
    }

    /// Return every control to its default.
    pub fn reset_all(&mut self) {
        self.current = InputRecord::default();
    }

    /// Read the current value of every control into one record.
    pub fn collect(&self) -> InputRecord {
        self.current.clone()
    }

    /// Current value of one control
    pub fn value(&self, field: &str) -> Option<ColumnValue> {
        find_field(field).and_then(|spec| self.current.column(spec.name))
    }

    fn store(&mut self, spec: &FieldSpec, value: ColumnValue) -> Result<ColumnValue, FormError> {
        if !self.current.apply(spec.name, value) {
            return Err(FormError::InvalidValue {
                field: spec.name.to_string(),
                value: value.to_string(),
            });
        }
        debug!(field = spec.name, value = %value, "Input changed");
        Ok(value)
    }
}

fn lookup(field: &str) -> Result<&'static FieldSpec, FormError> {
    find_field(field).ok_or_else(|| FormError::UnknownField(field.trim().to_string()))
}

/// Parse raw text the way the control for `spec` would accept it.
pub fn parse_value(spec: &FieldSpec, raw: &str) -> Result<ColumnValue, FormError> {
    let raw = raw.trim();

    match spec.kind {
        FieldKind::Int { min, max, .. } => {
            let number = parse_number(spec, raw)?;
            let clamped = number.round().clamp(min as f64, max as f64);
            Ok(ColumnValue::Int(clamped as i64))
        }
        FieldKind::Float { min, max, .. } => {
            let number = parse_number(spec, raw)?;
            Ok(ColumnValue::Float(number.clamp(min, max)))
        }
        FieldKind::Choice { options } => {
            let raw = raw.trim_matches('"');
            options
                .iter()
                .find(|option| **option == raw)
                .or_else(|| options.iter().find(|option| option.eq_ignore_ascii_case(raw)))
                .map(|option| ColumnValue::Text(*option))
                .ok_or_else(|| FormError::UnknownOption {
                    field: spec.name.to_string(),
                    value: raw.to_string(),
                    options: options.join(", "),
                })
        }
    }
}

fn parse_number(spec: &FieldSpec, raw: &str) -> Result<f64, FormError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field: spec.name.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::{Season, State};
    use serde_json::json;

    #[test]
    fn test_new_form_collects_defaults() {
        let form = InputForm::new();

        assert_eq!(form.collect(), InputRecord::default());
        assert_eq!(form.value("Dry_Spell_Count"), Some(ColumnValue::Int(5)));
    }

    #[test]
    fn test_numeric_input_is_clamped() {
        let mut form = InputForm::new();

        assert_eq!(form.set("Heatwave_Days", "25").unwrap(), ColumnValue::Int(10));
        assert_eq!(form.set("Temp_Anomaly", "-9.5").unwrap(), ColumnValue::Float(-5.0));
        assert_eq!(form.set("Rainfall_mm", "100").unwrap(), ColumnValue::Int(300));

        let record = form.collect();
        assert_eq!(record.heatwave_days, 10);
        assert_eq!(record.temp_anomaly, -5.0);
        assert_eq!(record.rainfall_mm, 300);
    }

    #[test]
    fn test_integer_input_is_rounded() {
        let mut form = InputForm::new();

        assert_eq!(form.set("Dry Spell Count", "7.6").unwrap(), ColumnValue::Int(8));
        assert_eq!(form.collect().dry_spell_count, 8);
    }

    #[test]
    fn test_choice_accepts_only_options() {
        let mut form = InputForm::new();

        assert_eq!(form.set("Season", "whole year").unwrap(), ColumnValue::Text("Whole year"));
        assert_eq!(form.collect().season, Season::WholeYear);

        let err = form.set("State", "Kerala").unwrap_err();
        assert!(matches!(err, FormError::UnknownOption { .. }));
        assert_eq!(form.collect().state, State::Maharashtra);
    }

    #[test]
    fn test_rejected_input_keeps_previous_value() {
        let mut form = InputForm::new();
        form.set("Soil_pH", "7.2").unwrap();

        assert!(matches!(
            form.set("Soil_pH", "acidic"),
            Err(FormError::InvalidNumber { .. })
        ));
        assert!(form.set("Soil_pH", "NaN").is_err());
        assert!(matches!(
            form.set("Crop", "Rice"),
            Err(FormError::UnknownField(_))
        ));
        assert_eq!(form.collect().soil_ph, 7.2);
    }

    #[test]
    fn test_set_json_values() {
        let mut form = InputForm::new();

        form.set_json("Year", &json!(2025)).unwrap();
        form.set_json("Wind_Speed", &json!("4.25")).unwrap();
        form.set_json("District", &json!("Chennai")).unwrap();
        assert!(form.set_json("PM10", &json!(true)).is_err());

        let record = form.collect();
        assert_eq!(record.year, 2025);
        assert_eq!(record.wind_speed, 4.25);
        assert_eq!(record.district.as_str(), "Chennai");
        assert_eq!(record.pm10, 150);
    }

    #[test]
    fn test_reset() {
        let mut form = InputForm::new();
        form.set("PM2_5", "250").unwrap();
        form.set("Seed_Variety", "HYV").unwrap();

        form.reset("PM2.5").unwrap();
        assert_eq!(form.collect().pm2_5, 80);

        form.reset_all();
        assert_eq!(form.collect(), InputRecord::default());
    }
}
