//! Sample Input Generator
//!
//! Writes random, in-range input changes as JSON lines, one render per line.
//! Pipe into the advisor to exercise it without typing:
//!
//! ```text
//! sample_inputs 20 0.3 42 | crop-resilience-advisor
//! ```
//!
//! Arguments: count (default 10), share of fields changed per line
//! (default 1.0 = every field), optional RNG seed.

use crop_resilience_advisor::types::schema::{FieldKind, FieldSpec, INPUT_FIELDS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use std::io::{self, Write};
use tracing::info;

/// Random input generator over the form schema
struct InputGenerator {
    rng: StdRng,
    change_rate: f64,
}

impl InputGenerator {
    fn new(seed: Option<u64>, change_rate: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            change_rate: if change_rate.is_finite() {
                change_rate.clamp(0.0, 1.0)
            } else {
                1.0
            },
        }
    }

    /// Random value within a control's declared bounds
    fn value_for(&mut self, spec: &FieldSpec) -> Value {
        match spec.kind {
            FieldKind::Int { min, max, .. } => Value::from(self.rng.gen_range(min..=max)),
            FieldKind::Float { min, max, .. } => {
                let value: f64 = self.rng.gen_range(min..=max);
                Value::from((value * 100.0).round() / 100.0)
            }
            FieldKind::Choice { options } => {
                Value::from(options[self.rng.gen_range(0..options.len())])
            }
        }
    }

    /// One batch of changes; never empty
    fn generate(&mut self) -> Map<String, Value> {
        let mut changes = Map::new();
        for spec in INPUT_FIELDS.iter() {
            if self.rng.gen_bool(self.change_rate) {
                changes.insert(spec.name.to_string(), self.value_for(spec));
            }
        }
        if changes.is_empty() {
            let spec = &INPUT_FIELDS[self.rng.gen_range(0..INPUT_FIELDS.len())];
            changes.insert(spec.name.to_string(), self.value_for(spec));
        }
        changes
    }
}

/// Share of fields changed per line; anything unparsable or non-finite means every field
fn parse_change_rate(arg: Option<&String>) -> f64 {
    arg.and_then(|s| s.parse().ok())
        .filter(|rate: &f64| rate.is_finite())
        .unwrap_or(1.0)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_inputs=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let change_rate = parse_change_rate(args.get(2));
    let seed: Option<u64> = args.get(3).and_then(|s| s.parse().ok());

    info!(count = count, change_rate = change_rate, seed = ?seed, "Generating sample inputs");

    let mut generator = InputGenerator::new(seed, change_rate);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for _ in 0..count {
        let changes = generator.generate();
        writeln!(out, "{}", serde_json::to_string(&changes)?)?;
    }

    info!("Wrote {} input changes", count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_rate_argument() {
        assert_eq!(parse_change_rate(Some(&"0.3".to_string())), 0.3);
        assert_eq!(parse_change_rate(Some(&"NaN".to_string())), 1.0);
        assert_eq!(parse_change_rate(Some(&"inf".to_string())), 1.0);
        assert_eq!(parse_change_rate(Some(&"many".to_string())), 1.0);
        assert_eq!(parse_change_rate(None), 1.0);
    }

    #[test]
    fn test_nan_change_rate_still_generates() {
        let mut generator = InputGenerator::new(Some(7), f64::NAN);

        let changes = generator.generate();

        assert_eq!(changes.len(), INPUT_FIELDS.len());
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        let mut generator = InputGenerator::new(Some(42), 0.0);

        for _ in 0..20 {
            let changes = generator.generate();
            assert_eq!(changes.len(), 1);
            for (name, value) in &changes {
                let spec = INPUT_FIELDS.iter().find(|spec| spec.name == name).unwrap();
                match spec.kind {
                    FieldKind::Int { min, max, .. } => {
                        let v = value.as_i64().unwrap();
                        assert!((min..=max).contains(&v));
                    }
                    FieldKind::Float { min, max, .. } => {
                        let v = value.as_f64().unwrap();
                        assert!(v >= min - 0.005 && v <= max + 0.005);
                    }
                    FieldKind::Choice { options } => {
                        assert!(options.contains(&value.as_str().unwrap()));
                    }
                }
            }
        }
    }
}
