use std::io::Write;

use crate::domain::experiment::outcome::{CombinationSummary, RoundOutcome};
use crate::domain::schedule::scheduler_type::SchedulerType;
use crate::error::Result;

/// Order of the four lines following the timeslot header. Consumers match the labels by
/// substring, so the order itself carries no meaning.
const TIMESLOT_BLOCK_ORDER: [SchedulerType; 4] = [SchedulerType::Fifo, SchedulerType::Rrrn, SchedulerType::FifoMerge, SchedulerType::RrrnMerge];

/// Writes the plain text experiment log read by the aggregation and plotting tools.
///
/// Per combination:
/// ```text
/// System size: 16
/// requests number: 30
/// Round 1 delay - FIFO: 435, RRRN: 435, FIFO Merge: 97, RRRN Merge: 81 | undeliverable: 0
/// Total FIFO delay: 435
/// Total FIFO Merge delay: 97
/// Total RRRN delay: 435
/// Total RRRN after merge delay: 81
/// Total timeslots including failed requests (30rs):
/// FIFO: 33
/// RRRN: 33
/// FIFO Merge: 9
/// RRRN Merge: 8
/// Total failed requests - FIFO: 1, RRRN: 1, FIFO Merge: 2, RRRN Merge: 2
/// Total decohered requests - FIFO: 3, RRRN: 2, FIFO Merge: 4, RRRN Merge: 3
/// Total undeliverable requests: 0
/// ```
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_all(&mut self, summaries: &[CombinationSummary]) -> Result<()> {
        for summary in summaries {
            self.write_summary(summary)?;
        }
        Ok(())
    }

    pub fn write_summary(&mut self, summary: &CombinationSummary) -> Result<()> {
        writeln!(self.out, "System size: {}", summary.system_size)?;
        writeln!(self.out, "requests number: {}", summary.requests_number)?;

        for round in &summary.rounds {
            self.write_round(round)?;
        }

        writeln!(self.out, "Total FIFO delay: {}", summary.total_delay(SchedulerType::Fifo))?;
        writeln!(self.out, "Total FIFO Merge delay: {}", summary.total_delay(SchedulerType::FifoMerge))?;
        writeln!(self.out, "Total RRRN delay: {}", summary.total_delay(SchedulerType::Rrrn))?;
        writeln!(self.out, "Total RRRN after merge delay: {}", summary.total_delay(SchedulerType::RrrnMerge))?;

        writeln!(self.out, "Total timeslots including failed requests ({}rs):", summary.requests_number)?;
        for policy in TIMESLOT_BLOCK_ORDER {
            writeln!(self.out, "{}: {}", policy.label(), summary.total_timeslots(policy))?;
        }

        writeln!(self.out, "Total failed requests - {}", per_policy(|policy| summary.total_failed(policy)))?;
        writeln!(self.out, "Total decohered requests - {}", per_policy(|policy| summary.total_decohered(policy)))?;
        writeln!(self.out, "Total undeliverable requests: {}", summary.total_undeliverable())?;
        writeln!(self.out)?;

        Ok(())
    }

    fn write_round(&mut self, round: &RoundOutcome) -> Result<()> {
        let delays = per_policy(|policy| round.policy(policy).map_or(0, |outcome| outcome.delay));
        writeln!(self.out, "Round {} delay - {} | undeliverable: {}", round.round, delays, round.undeliverable)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn per_policy(metric: impl Fn(SchedulerType) -> u64) -> String {
    SchedulerType::ALL.iter().map(|policy| format!("{}: {}", policy.label(), metric(*policy))).collect::<Vec<_>>().join(", ")
}
