use std::fs::File;
use std::io::BufWriter;

use crate::api::experiment_dto::ExperimentDto;
use crate::domain::experiment::Experiment;
use crate::domain::experiment::outcome::CombinationSummary;
use crate::error::Result;
use crate::loader::parser::parse_json_file;
use crate::report::log_writer::ReportWriter;
use crate::report::statistics::StatisticsWriter;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod report;

/// Loads the experiment configuration at `file_path`, runs every combination and writes the
/// text report (and the statistics CSV, if configured).
///
/// `seed_override` replaces the configured seed.
pub fn run_experiment_from_file(file_path: &str, seed_override: Option<u64>) -> Result<Vec<CombinationSummary>> {
    let dto: ExperimentDto = parse_json_file::<ExperimentDto>(file_path)?;
    log::info!("Experiment configuration '{}' parsed successfully.", file_path);

    let mut experiment = Experiment::from_dto(&dto)?;
    if seed_override.is_some() {
        experiment.seed = seed_override;
    }

    let mut rng = experiment.rng();
    let summaries = experiment.run(&mut rng)?;

    let mut report = ReportWriter::new(BufWriter::new(File::create(&dto.report_file)?));
    report.write_all(&summaries)?;
    report.flush()?;
    log::info!("Report written to '{}'.", dto.report_file);

    if let Some(statistics_file) = &dto.statistics_file {
        let mut statistics = StatisticsWriter::from_path(statistics_file)?;
        statistics.write_all(&summaries)?;
        statistics.flush()?;
        log::info!("Statistics written to '{}'.", statistics_file);
    }

    Ok(summaries)
}
