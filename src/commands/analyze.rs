use crate::config::{self, FormularyConfig};
use crate::errors::Result;
use crate::io::{self, AnalysisInput, AnalysisReport, OutputFormat};
use crate::metric::InMemoryMetricRepository;
use crate::pipeline::{analysis_steps, AnalysisContext};
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

pub struct AnalyzeConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Run the enabled steps over `input` and collect what they computed.
pub fn run_analysis(input: &AnalysisInput, config: &FormularyConfig) -> Result<AnalysisReport> {
    let metrics = InMemoryMetricRepository::with_core_metrics();
    let mut measures = input.measure_repository();

    let mut context = AnalysisContext::new(
        &input.metadata,
        &input.tree,
        &metrics,
        &mut measures,
        &input.history,
        &config.new_code_period,
    );
    if let Some(scm) = &input.scm {
        context = context.with_scm(scm);
    }
    if let Some(store) = &input.reference_branches {
        context = context.with_reference_branches(store);
    }

    let timings = analysis_steps(&config.steps).execute(&mut context)?;
    let period = context.period_holder.get()?.cloned();
    info!(
        project = input.tree.key(),
        steps = timings.len(),
        total_ms = timings.iter().map(|t| t.duration.as_millis()).sum::<u128>(),
        "Analysis complete"
    );

    Ok(AnalysisReport::new(period, &measures))
}

pub fn handle_analyze(config: AnalyzeConfig) -> anyhow::Result<()> {
    let settings = config::load_config(config.config.as_deref())?;
    let input = AnalysisInput::load(&config.input)?;
    let report = run_analysis(&input, &settings)?;

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            io::create_writer(config.format, BufWriter::new(file)).write_report(&report)?;
        }
        None => {
            let stdout = std::io::stdout();
            io::create_writer(config.format, stdout.lock()).write_report(&report)?;
        }
    }
    Ok(())
}
