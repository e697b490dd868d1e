use crate::measure::{InMemoryMeasureRepository, Measure, MeasureValue};
use crate::period::Period;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// One measure produced by the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMeasure {
    pub component: String,
    pub metric: String,
    #[serde(flatten)]
    pub measure: Measure,
}

/// What an analysis produced: the baseline used and the computed measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub period: Option<Period>,
    pub measures: Vec<ComputedMeasure>,
}

impl AnalysisReport {
    pub fn new(period: Option<Period>, measures: &InMemoryMeasureRepository) -> Self {
        let measures = measures
            .computed()
            .map(|(component, metric, measure)| ComputedMeasure {
                component: component.to_string(),
                metric: metric.to_string(),
                measure: measure.clone(),
            })
            .collect();
        Self { period, measures }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Plain table, one measure per line, grouped by component.
pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_period(&mut self, period: Option<&Period>) -> anyhow::Result<()> {
        let Some(period) = period else {
            writeln!(self.writer, "New code period: none")?;
            return Ok(());
        };
        write!(self.writer, "New code period: {}", period.mode())?;
        if let Some(parameter) = period.mode_parameter() {
            write!(self.writer, " ({parameter})")?;
        }
        if let Some(date) = period.date().and_then(DateTime::from_timestamp_millis) {
            write!(self.writer, " since {}", date.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_period(report.period.as_ref())?;
        let mut current_component: Option<&str> = None;
        for computed in &report.measures {
            if current_component != Some(computed.component.as_str()) {
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", computed.component)?;
                current_component = Some(computed.component.as_str());
            }
            writeln!(
                self.writer,
                "  {:<40} {}",
                computed.metric,
                format_measure(&computed.measure)
            )?;
        }
        Ok(())
    }
}

fn format_measure(measure: &Measure) -> String {
    let value = match measure.value() {
        MeasureValue::Int(v) => v.to_string(),
        MeasureValue::Long(v) => v.to_string(),
        MeasureValue::Double(v) => v.to_string(),
        MeasureValue::String(v) => v.clone(),
        MeasureValue::NoValue => "-".to_string(),
    };
    match measure.variation() {
        Some(variation) => format!("{value} (new: {variation})"),
        None => value,
    }
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Text => Box::new(TextWriter::new(writer)),
    }
}
