use serde::Serialize;
use std::fs::File;
use std::io::Write;

use crate::domain::experiment::outcome::CombinationSummary;
use crate::error::Result;

/// One CSV row: the metrics of one policy in one round.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoundStatistic {
    pub system_size: usize,
    pub requests_number: usize,
    pub round: usize,
    pub policy: &'static str,
    pub delay: u64,
    pub makespan: u32,
    pub failed: usize,
    pub decohered: usize,
    pub total_timeslots: u64,
    pub undeliverable: usize,
}

impl RoundStatistic {
    pub fn from_summary(summary: &CombinationSummary) -> Vec<RoundStatistic> {
        summary
            .rounds
            .iter()
            .flat_map(|round| {
                round.policies.values().map(move |outcome| RoundStatistic {
                    system_size: summary.system_size,
                    requests_number: summary.requests_number,
                    round: round.round,
                    policy: outcome.policy.label(),
                    delay: outcome.delay,
                    makespan: outcome.makespan,
                    failed: outcome.failed,
                    decohered: outcome.decohered,
                    total_timeslots: outcome.total_timeslots(),
                    undeliverable: round.undeliverable,
                })
            })
            .collect()
    }
}

/// `;` separated per-round statistics with a header row.
pub struct StatisticsWriter<W: Write> {
    csv_wtr: csv::Writer<W>,
}

impl StatisticsWriter<File> {
    pub fn from_path(path: &str) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> StatisticsWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { csv_wtr: csv::WriterBuilder::new().delimiter(b';').from_writer(writer) }
    }

    pub fn write_all(&mut self, summaries: &[CombinationSummary]) -> Result<()> {
        for summary in summaries {
            for row in RoundStatistic::from_summary(summary) {
                self.csv_wtr.serialize(row)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.csv_wtr.flush()?;
        Ok(())
    }
}
