use std::fmt;

/// The scheduling policies compared by an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchedulerType {
    /// Arrival order, one request per timeslot.
    Fifo,

    /// Priority order by waiting time and distance, one request per timeslot.
    Rrrn,

    /// Arrival order grouped into conflict-free timeslots.
    FifoMerge,

    /// RRRN followed by merge compaction.
    RrrnMerge,
}

impl SchedulerType {
    pub const ALL: [SchedulerType; 4] = [SchedulerType::Fifo, SchedulerType::Rrrn, SchedulerType::FifoMerge, SchedulerType::RrrnMerge];

    /// Label used in the text report.
    pub fn label(&self) -> &'static str {
        match self {
            SchedulerType::Fifo => "FIFO",
            SchedulerType::Rrrn => "RRRN",
            SchedulerType::FifoMerge => "FIFO Merge",
            SchedulerType::RrrnMerge => "RRRN Merge",
        }
    }
}

impl fmt::Display for SchedulerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
