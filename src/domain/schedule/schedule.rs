use std::collections::{BTreeMap, BTreeSet};

use crate::domain::utils::id::RequestId;

/// Index of a discrete timeslot. The first timeslot is `1`.
pub type Timeslot = u32;

/// Life cycle of a scheduled request. Requests without an entry are unscheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentState {
    /// Placed by a base policy (FIFO, RRRN or FIFO merge).
    Assigned,

    /// Placed by the merge compaction pass.
    Compacted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub request_id: RequestId,
    pub timeslot: Timeslot,
    pub state: AssignmentState,
}

impl ScheduleEntry {
    pub fn assigned(request_id: RequestId, timeslot: Timeslot) -> Self {
        Self { request_id, timeslot, state: AssignmentState::Assigned }
    }
}

/// The timeslot assignment of one round. Every contained request appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, request_id: RequestId, timeslot: Timeslot) {
        debug_assert!(timeslot >= 1, "timeslots start at 1");
        debug_assert!(self.timeslot_of(&request_id).is_none(), "{} scheduled twice", request_id);
        self.entries.push(ScheduleEntry::assigned(request_id, timeslot));
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn request_ids(&self) -> impl Iterator<Item = &RequestId> {
        self.entries.iter().map(|entry| &entry.request_id)
    }

    pub fn timeslot_of(&self, request_id: &RequestId) -> Option<Timeslot> {
        self.entries.iter().find(|entry| &entry.request_id == request_id).map(|entry| entry.timeslot)
    }

    /// The latest used timeslot, `0` for an empty schedule.
    pub fn makespan(&self) -> Timeslot {
        self.entries.iter().map(|entry| entry.timeslot).max().unwrap_or(0)
    }

    /// Sum of the waiting timeslots of all requests: `Σ (timeslot - 1)`.
    pub fn total_delay(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.timeslot.saturating_sub(1))).sum()
    }

    pub fn used_timeslots(&self) -> BTreeSet<Timeslot> {
        self.entries.iter().map(|entry| entry.timeslot).collect()
    }

    /// `true` if the used timeslots are exactly `1..=makespan`.
    pub fn is_gap_free(&self) -> bool {
        let used = self.used_timeslots();
        used.len() == self.makespan() as usize
    }

    /// Groups the requests by timeslot, in schedule order inside each timeslot.
    pub fn by_timeslot(&self) -> BTreeMap<Timeslot, Vec<&RequestId>> {
        let mut slots: BTreeMap<Timeslot, Vec<&RequestId>> = BTreeMap::new();
        for entry in &self.entries {
            slots.entry(entry.timeslot).or_default().push(&entry.request_id);
        }
        slots
    }

    pub fn requests_in(&self, timeslot: Timeslot) -> impl Iterator<Item = &RequestId> {
        self.entries.iter().filter(move |entry| entry.timeslot == timeslot).map(|entry| &entry.request_id)
    }
}
