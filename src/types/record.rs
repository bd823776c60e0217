//! Input record collected from the form on every render pass

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed value of one named column, as handed to the pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int(i64),
    Float(f64),
    Text(&'static str),
}

impl ColumnValue {
    /// Numeric view of the value; `None` for categorical text
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ColumnValue::Int(v) => Some(v as f64),
            ColumnValue::Float(v) => Some(v),
            ColumnValue::Text(_) => None,
        }
    }

    /// Short dtype name used in schema-mismatch messages
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnValue::Int(_) => "int",
            ColumnValue::Float(_) => "float",
            ColumnValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Int(v) => write!(f, "{}", v),
            ColumnValue::Float(v) => write!(f, "{:.2}", v),
            ColumnValue::Text(v) => f.write_str(v),
        }
    }
}

/// A named column of the record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub value: ColumnValue,
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident { $first:ident => $first_label:literal $(, $variant:ident => $label:literal)* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $first_label)]
            $first,
            $(
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl $name {
            /// Options in display order; the first one is the default selection
            pub const OPTIONS: &'static [&'static str] = &[$first_label $(, $label)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::$first => $first_label,
                    $($name::$variant => $label,)*
                }
            }

            /// Look up an option by its exact label
            pub fn from_option(option: &str) -> Option<Self> {
                match option {
                    $first_label => Some($name::$first),
                    $($label => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical! {
    /// Cropping season
    Season {
        Kharif => "Kharif",
        Rabi => "Rabi",
        Summer => "Summer",
        Autumn => "Autumn",
        Winter => "Winter",
        WholeYear => "Whole year",
    }
}

categorical! {
    State {
        Maharashtra => "Maharashtra",
        Punjab => "Punjab",
        TamilNadu => "Tamil Nadu",
        AndhraPradesh => "Andhra Pradesh",
        Karnataka => "Karnataka",
    }
}

categorical! {
    District {
        Pune => "Pune",
        Nagpur => "Nagpur",
        Chennai => "Chennai",
        Amritsar => "Amritsar",
        Bengaluru => "Bengaluru",
    }
}

categorical! {
    SeedVariety {
        Local => "Local",
        Hybrid => "Hybrid",
        Hyv => "HYV",
        Traditional => "Traditional",
    }
}

categorical! {
    IrrigationSource {
        Canal => "Canal",
        Rainfed => "Rainfed",
        Other => "Other",
    }
}

/// One filled-in form: climate, soil, water, air quality and management inputs.
///
/// Field names serialize to the column names the pipelines were trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(rename = "Year")]
    pub year: i64,

    /// Mean temperature over the season (°C)
    #[serde(rename = "Avg_Temperature")]
    pub avg_temperature: f64,

    /// Deviation from the long-term mean temperature (°C)
    #[serde(rename = "Temp_Anomaly")]
    pub temp_anomaly: f64,

    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: i64,

    /// Relative humidity (%)
    #[serde(rename = "Relative_Humidity")]
    pub relative_humidity: i64,

    #[serde(rename = "Heatwave_Days")]
    pub heatwave_days: i64,

    #[serde(rename = "Dry_Spell_Count")]
    pub dry_spell_count: i64,

    #[serde(rename = "Soil_Organic_Carbon")]
    pub soil_organic_carbon: f64,

    #[serde(rename = "Soil_pH")]
    pub soil_ph: f64,

    /// Water holding capacity (%)
    #[serde(rename = "Water_Holding_Capacity")]
    pub water_holding_capacity: i64,

    #[serde(rename = "Electrical_Conductivity")]
    pub electrical_conductivity: f64,

    /// Share of the cropped area under irrigation (%)
    #[serde(rename = "Irrigation_Coverage")]
    pub irrigation_coverage: i64,

    /// Depth to groundwater (m)
    #[serde(rename = "Groundwater_Depth")]
    pub groundwater_depth: i64,

    /// Wind speed (m/s)
    #[serde(rename = "Wind_Speed")]
    pub wind_speed: f64,

    #[serde(rename = "Solar_Radiation")]
    pub solar_radiation: f64,

    /// Atmospheric CO2 (ppm)
    #[serde(rename = "CO2_Concentration")]
    pub co2_concentration: i64,

    #[serde(rename = "PM2_5")]
    pub pm2_5: i64,

    #[serde(rename = "PM10")]
    pub pm10: i64,

    #[serde(rename = "Aerosol_Optical_Depth")]
    pub aerosol_optical_depth: f64,

    #[serde(rename = "Season")]
    pub season: Season,

    #[serde(rename = "State")]
    pub state: State,

    #[serde(rename = "District")]
    pub district: District,

    #[serde(rename = "Seed_Variety")]
    pub seed_variety: SeedVariety,

    #[serde(rename = "Irrigation_Source")]
    pub irrigation_source: IrrigationSource,
}

impl InputRecord {
    /// All 24 columns in form order.
    pub fn columns(&self) -> Vec<Column> {
        use ColumnValue::{Float, Int, Text};

        vec![
            Column { name: "Year", value: Int(self.year) },
            Column { name: "Avg_Temperature", value: Float(self.avg_temperature) },
            Column { name: "Temp_Anomaly", value: Float(self.temp_anomaly) },
            Column { name: "Rainfall_mm", value: Int(self.rainfall_mm) },
            Column { name: "Relative_Humidity", value: Int(self.relative_humidity) },
            Column { name: "Heatwave_Days", value: Int(self.heatwave_days) },
            Column { name: "Dry_Spell_Count", value: Int(self.dry_spell_count) },
            Column { name: "Soil_Organic_Carbon", value: Float(self.soil_organic_carbon) },
            Column { name: "Soil_pH", value: Float(self.soil_ph) },
            Column { name: "Water_Holding_Capacity", value: Int(self.water_holding_capacity) },
            Column { name: "Electrical_Conductivity", value: Float(self.electrical_conductivity) },
            Column { name: "Irrigation_Coverage", value: Int(self.irrigation_coverage) },
            Column { name: "Groundwater_Depth", value: Int(self.groundwater_depth) },
            Column { name: "Wind_Speed", value: Float(self.wind_speed) },
            Column { name: "Solar_Radiation", value: Float(self.solar_radiation) },
            Column { name: "CO2_Concentration", value: Int(self.co2_concentration) },
            Column { name: "PM2_5", value: Int(self.pm2_5) },
            Column { name: "PM10", value: Int(self.pm10) },
            Column { name: "Aerosol_Optical_Depth", value: Float(self.aerosol_optical_depth) },
            Column { name: "Season", value: Text(self.season.as_str()) },
            Column { name: "State", value: Text(self.state.as_str()) },
            Column { name: "District", value: Text(self.district.as_str()) },
            Column { name: "Seed_Variety", value: Text(self.seed_variety.as_str()) },
            Column { name: "Irrigation_Source", value: Text(self.irrigation_source.as_str()) },
        ]
    }

    /// Value of a single column by name
    pub fn column(&self, name: &str) -> Option<ColumnValue> {
        self.columns()
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }

    /// Write one control value into the record.
    ///
    /// Returns `false` when the column does not exist or the value has the
    /// wrong kind for it; the record is left untouched in that case.
    pub fn apply(&mut self, name: &str, value: ColumnValue) -> bool {
        use ColumnValue::{Float, Int, Text};

        match (name, value) {
            ("Year", Int(v)) => self.year = v,
            ("Avg_Temperature", Float(v)) => self.avg_temperature = v,
            ("Temp_Anomaly", Float(v)) => self.temp_anomaly = v,
            ("Rainfall_mm", Int(v)) => self.rainfall_mm = v,
            ("Relative_Humidity", Int(v)) => self.relative_humidity = v,
            ("Heatwave_Days", Int(v)) => self.heatwave_days = v,
            ("Dry_Spell_Count", Int(v)) => self.dry_spell_count = v,
            ("Soil_Organic_Carbon", Float(v)) => self.soil_organic_carbon = v,
            ("Soil_pH", Float(v)) => self.soil_ph = v,
            ("Water_Holding_Capacity", Int(v)) => self.water_holding_capacity = v,
            ("Electrical_Conductivity", Float(v)) => self.electrical_conductivity = v,
            ("Irrigation_Coverage", Int(v)) => self.irrigation_coverage = v,
            ("Groundwater_Depth", Int(v)) => self.groundwater_depth = v,
            ("Wind_Speed", Float(v)) => self.wind_speed = v,
            ("Solar_Radiation", Float(v)) => self.solar_radiation = v,
            ("CO2_Concentration", Int(v)) => self.co2_concentration = v,
            ("PM2_5", Int(v)) => self.pm2_5 = v,
            ("PM10", Int(v)) => self.pm10 = v,
            ("Aerosol_Optical_Depth", Float(v)) => self.aerosol_optical_depth = v,
            ("Season", Text(v)) => match Season::from_option(v) {
                Some(season) => self.season = season,
                None => return false,
            },
            ("State", Text(v)) => match State::from_option(v) {
                Some(state) => self.state = state,
                None => return false,
            },
            ("District", Text(v)) => match District::from_option(v) {
                Some(district) => self.district = district,
                None => return false,
            },
            ("Seed_Variety", Text(v)) => match SeedVariety::from_option(v) {
                Some(variety) => self.seed_variety = variety,
                None => return false,
            },
            ("Irrigation_Source", Text(v)) => match IrrigationSource::from_option(v) {
                Some(source) => self.irrigation_source = source,
                None => return false,
            },
            _ => return false,
        }
        true
    }
}

impl Default for InputRecord {
    /// Every control at its declared default
    fn default() -> Self {
        Self {
            year: 2020,
            avg_temperature: 25.0,
            temp_anomaly: 0.0,
            rainfall_mm: 800,
            relative_humidity: 65,
            heatwave_days: 2,
            dry_spell_count: 5,
            soil_organic_carbon: 0.55,
            soil_ph: 6.8,
            water_holding_capacity: 40,
            electrical_conductivity: 1.1,
            irrigation_coverage: 30,
            groundwater_depth: 30,
            wind_speed: 2.5,
            solar_radiation: 20.0,
            co2_concentration: 420,
            pm2_5: 80,
            pm10: 150,
            aerosol_optical_depth: 1.2,
            season: Season::Kharif,
            state: State::Maharashtra,
            district: District::Pune,
            seed_variety: SeedVariety::Local,
            irrigation_source: IrrigationSource::Canal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_column_names() {
        let record = InputRecord::default();

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["Heatwave_Days"], 2);
        assert_eq!(json["Season"], "Kharif");
        assert_eq!(json["Seed_Variety"], "Local");
        assert_eq!(json.as_object().unwrap().len(), 24);
    }

    #[test]
    fn test_columns_follow_form_order() {
        let columns = InputRecord::default().columns();

        assert_eq!(columns.len(), 24);
        assert_eq!(columns[0].name, "Year");
        assert_eq!(columns[18].name, "Aerosol_Optical_Depth");
        assert_eq!(columns[23].name, "Irrigation_Source");
    }

    #[test]
    fn test_apply_rejects_wrong_kind() {
        let mut record = InputRecord::default();

        assert!(!record.apply("Year", ColumnValue::Float(2021.0)));
        assert!(!record.apply("Season", ColumnValue::Text("Monsoon")));
        assert!(!record.apply("Yield", ColumnValue::Int(1)));
        assert_eq!(record, InputRecord::default());

        assert!(record.apply("State", ColumnValue::Text("Tamil Nadu")));
        assert_eq!(record.state, State::TamilNadu);
    }

    #[test]
    fn test_categorical_options() {
        assert_eq!(Season::OPTIONS.len(), 6);
        assert_eq!(Season::from_option("Whole year"), Some(Season::WholeYear));
        assert_eq!(SeedVariety::Hyv.to_string(), "HYV");
        assert_eq!(IrrigationSource::default(), IrrigationSource::Canal);
        assert_eq!(District::from_option("pune"), None);
    }
}
