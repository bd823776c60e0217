//! Line-oriented terminal host.
//!
//! Holds the form state and re-renders after every input change, the way a
//! UI framework re-runs the page. Each line on stdin is one command:
//!
//! ```text
//! Heatwave_Days=6              set a control and re-render
//! {"Season": "Rabi", "PM10": 300}
//!                              apply several changes, render once
//! reset [field]                restore one or all defaults
//! show | fields | render | help | quit
//! ```

use crate::form::InputForm;
use crate::metrics::RenderMetrics;
use crate::render::Renderer;
use crate::types::schema::INPUT_FIELDS;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::{debug, error, info};

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { field: String, value: String },
    Batch(Map<String, Value>),
    Reset(Option<String>),
    Show,
    Fields,
    Render,
    Help,
    Quit,
    Empty,
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return Ok(Command::Empty);
    }

    if line.starts_with('{') {
        return serde_json::from_str::<Map<String, Value>>(line)
            .map(Command::Batch)
            .map_err(|e| format!("invalid JSON input: {}", e));
    }

    if let Some((field, value)) = line.split_once('=') {
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in '{}'", line));
        }
        return Ok(Command::Set {
            field: field.to_string(),
            value: value.trim().to_string(),
        });
    }

    let mut words = line.splitn(2, char::is_whitespace);
    let keyword = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest = words.next().map(str::trim).filter(|s| !s.is_empty());

    match (keyword.as_str(), rest) {
        ("reset", field) => Ok(Command::Reset(field.map(str::to_string))),
        ("show", None) => Ok(Command::Show),
        ("fields", None) => Ok(Command::Fields),
        ("render", None) => Ok(Command::Render),
        ("help", None) | ("?", None) => Ok(Command::Help),
        ("quit", None) | ("exit", None) => Ok(Command::Quit),
        _ => Err(format!("unrecognised input '{}' (type 'help')", line)),
    }
}

const HELP: &str = "\
Commands:
  <field>=<value>       set an input and re-render (field name or label)
  {\"field\": value, ...} set several inputs, render once
  reset [field]         restore defaults
  show                  print current inputs
  fields                list inputs with ranges and options
  render                render again without changes
  quit                  leave
";

/// Interactive session over a reader and a writer
pub struct Session<'a> {
    form: InputForm,
    renderer: &'a Renderer,
    metrics: &'a RenderMetrics,
    prompt: bool,
}

impl<'a> Session<'a> {
    pub fn new(renderer: &'a Renderer, metrics: &'a RenderMetrics) -> Self {
        Self {
            form: InputForm::new(),
            renderer,
            metrics,
            prompt: false,
        }
    }

    /// Print a prompt before each line (for terminals)
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    /// Render once with defaults, then once per input change until EOF or quit.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        self.render(&mut out)?;

        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }

            let line = match lines.next() {
                Some(Ok(line)) => line,
                // A line that is not UTF-8 is bad input, not a broken stream
                Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    error!(error = %e, "Unreadable input line");
                    writeln!(out, "unreadable input line: {}", e)?;
                    continue;
                }
                Some(Err(e)) => return Err(e).context("Failed to read input"),
                None => break,
            };

            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.handle(command, &mut out)?,
                Err(message) => writeln!(out, "{}", message)?,
            }
        }

        info!("Session ended");
        Ok(())
    }

    fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Set { field, value } => match self.form.set(&field, &value) {
                Ok(_) => self.render(out)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Batch(changes) => {
                let mut changed = false;
                for (field, value) in &changes {
                    match self.form.set_json(field, value) {
                        Ok(_) => changed = true,
                        Err(e) => writeln!(out, "{}", e)?,
                    }
                }
                if changed {
                    self.render(out)?;
                }
            }
            Command::Reset(Some(field)) => match self.form.reset(&field) {
                Ok(_) => self.render(out)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Reset(None) => {
                self.form.reset_all();
                self.render(out)?;
            }
            Command::Show => {
                for column in self.form.collect().columns() {
                    writeln!(out, "  {:<24} {}", column.name, column.value)?;
                }
            }
            Command::Fields => {
                for spec in INPUT_FIELDS.iter() {
                    writeln!(out, "  {:<24} {:<28} {}", spec.name, spec.label, spec.describe())?;
                }
            }
            Command::Render => self.render(out)?,
            Command::Help => write!(out, "{}", HELP)?,
            Command::Quit | Command::Empty => {}
        }
        Ok(())
    }

    /// One render pass for the current inputs
    fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let record = self.form.collect();
        let started = Instant::now();

        match self.renderer.render_once(&record) {
            Ok(frame) => {
                self.metrics.record_render(
                    started.elapsed(),
                    frame.yield_kg_per_ha,
                    &frame.resilience_level,
                );
                debug!(
                    yield_kg_per_ha = frame.yield_kg_per_ha,
                    resilience = %frame.resilience_level,
                    render_time_us = started.elapsed().as_micros() as u64,
                    "Rendered"
                );
                writeln!(out, "{}", self.renderer.presenter().render(&frame)?)?;
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(error = %e, "Render pass failed");
                writeln!(out, "{}", self.renderer.presenter().render_failure(&e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inference::tests::StubPipeline;
    use crate::models::inference::InferenceEngine;
    use crate::presenter::Presenter;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn renderer_with(
        yield_stub: Arc<StubPipeline>,
        resilience_stub: Arc<StubPipeline>,
    ) -> Renderer {
        Renderer::new(
            InferenceEngine::new(yield_stub, resilience_stub),
            Presenter::default(),
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("Heatwave_Days = 6").unwrap(),
            Command::Set {
                field: "Heatwave_Days".to_string(),
                value: "6".to_string()
            }
        );
        assert_eq!(parse_command("  ").unwrap(), Command::Empty);
        assert_eq!(parse_command("# comment").unwrap(), Command::Empty);
        assert_eq!(parse_command("reset").unwrap(), Command::Reset(None));
        assert_eq!(
            parse_command("reset Soil pH").unwrap(),
            Command::Reset(Some("Soil pH".to_string()))
        );
        assert_eq!(parse_command("QUIT").unwrap(), Command::Quit);
        assert!(matches!(
            parse_command(r#"{"Season": "Rabi"}"#).unwrap(),
            Command::Batch(_)
        ));
        assert!(parse_command("{not json").is_err());
        assert!(parse_command("=5").is_err());
        assert!(parse_command("plant rice").is_err());
    }

    #[test]
    fn test_renders_on_start_and_each_change() {
        let yield_stub = Arc::new(StubPipeline::scalar(2200.0));
        let resilience_stub = Arc::new(StubPipeline::label("Medium"));
        let renderer = renderer_with(yield_stub.clone(), resilience_stub.clone());
        let metrics = RenderMetrics::new();
        let mut session = Session::new(&renderer, &metrics);

        let input = "Heatwave_Days=6\nDry_Spell_Count=abc\nshow\n{\"Temp_Anomaly\": 2, \"Season\": \"Rabi\"}\n";
        let mut out = Vec::new();
        session.run(input.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(metrics.renders.load(Ordering::Relaxed), 3);
        assert!(text.contains("Moderate resilience: adaptive measures are recommended."));
        assert!(text.contains("'abc' is not a number"));

        let seen = yield_stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].record.heatwave_days, 6);
        // ((6 - 2.5) / 2 + 0 + (2 - 0) / 2) / 3
        assert!((seen[2].climate_stress_index - 2.75 / 3.0).abs() < 1e-12);
        assert_eq!(session.form().collect().season.as_str(), "Rabi");
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let yield_stub = Arc::new(StubPipeline::scalar(1800.0));
        let renderer = renderer_with(yield_stub.clone(), Arc::new(StubPipeline::label("Low")));
        let metrics = RenderMetrics::new();
        let mut session = Session::new(&renderer, &metrics);

        let input: &[u8] = b"PM10=200\nSeason=\xff\xfe\nHeatwave_Days=9\n";
        let mut out = Vec::new();
        session.run(input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unreadable input line"));
        assert_eq!(metrics.renders.load(Ordering::Relaxed), 3);
        let record = session.form().collect();
        assert_eq!(record.pm10, 200);
        assert_eq!(record.heatwave_days, 9);
        assert_eq!(record.season.as_str(), "Kharif");
        assert_eq!(yield_stub.seen.lock().unwrap()[2].record.heatwave_days, 9);
    }

    #[test]
    fn test_quit_stops_reading() {
        let renderer = renderer_with(
            Arc::new(StubPipeline::scalar(1.0)),
            Arc::new(StubPipeline::label("High")),
        );
        let metrics = RenderMetrics::new();
        let mut session = Session::new(&renderer, &metrics);

        let mut out = Vec::new();
        session
            .run("quit\nHeatwave_Days=9\n".as_bytes(), &mut out)
            .unwrap();

        assert_eq!(metrics.renders.load(Ordering::Relaxed), 1);
        assert_eq!(session.form().collect().heatwave_days, 2);
    }

    #[test]
    fn test_failed_render_keeps_session_alive() {
        let renderer = renderer_with(
            Arc::new(StubPipeline::scalar(1.0).requiring(&["Crop_Type"])),
            Arc::new(StubPipeline::label("High")),
        );
        let metrics = RenderMetrics::new();
        let mut session = Session::new(&renderer, &metrics);

        let mut out = Vec::new();
        session.run("PM10=200\n".as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.renders.load(Ordering::Relaxed), 0);
        assert!(text.contains("[error] schema mismatch in yield pipeline: missing column Crop_Type"));
    }
}
