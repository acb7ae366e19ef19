use std::collections::BTreeMap;

use crate::domain::schedule::schedule::{AssignmentState, Schedule, ScheduleEntry, Timeslot};
use crate::domain::schedule::scheduler::Scheduler;
use crate::domain::utils::id::RequestId;

impl<'a> Scheduler<'a> {
    /// Merge compaction of a finished schedule.
    ///
    /// Requests are visited from the latest timeslot to the earliest. Each one moves to the
    /// first earlier, occupied timeslot in which none of the placed requests has a path sharing
    /// a node with one of its own paths; otherwise it keeps its timeslot. The used timeslots are
    /// renumbered to `1..=M` afterwards, so the result never has gaps and never ends later than
    /// the input.
    pub fn merge(&self, schedule: &Schedule) -> Schedule {
        let mut placed: Vec<(RequestId, Timeslot)> = schedule.entries().iter().map(|entry| (entry.request_id.clone(), entry.timeslot)).collect();

        let mut order: Vec<usize> = (0..placed.len()).collect();
        order.sort_by_key(|index| (placed[*index].1, *index));

        for &index in order.iter().rev() {
            let (request_id, current) = placed[index].clone();
            let routes = self.routes.routes(&request_id);

            for target in 1..current {
                let mut occupants = placed.iter().enumerate().filter(|(other, (_, timeslot))| *other != index && *timeslot == target).peekable();

                if occupants.peek().is_none() {
                    continue;
                }

                let conflict_free = occupants.all(|(_, (other_id, _))| !routes.conflicts_with(self.routes.routes(other_id)));

                if conflict_free {
                    log::trace!("Merge: {} moves from timeslot {} to {}", request_id, current, target);
                    placed[index].1 = target;
                    break;
                }
            }
        }

        let merged = renumber(placed);
        log::debug!("Merge compaction: {} -> {} timeslot(s)", schedule.makespan(), merged.makespan());

        merged
    }
}

/// Maps the distinct timeslots in ascending order onto `1..=M` and orders the entries by their
/// new timeslot (stable within a timeslot).
fn renumber(placed: Vec<(RequestId, Timeslot)>) -> Schedule {
    let mapping: BTreeMap<Timeslot, Timeslot> = placed
        .iter()
        .map(|(_, timeslot)| *timeslot)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .zip(1..)
        .collect();

    let mut entries: Vec<ScheduleEntry> = placed
        .into_iter()
        .map(|(request_id, timeslot)| ScheduleEntry { request_id, timeslot: mapping[&timeslot], state: AssignmentState::Compacted })
        .collect();
    entries.sort_by_key(|entry| entry.timeslot);

    Schedule::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renumber_closes_gaps_in_order() {
        let placed = vec![(RequestId::new("a"), 4), (RequestId::new("b"), 2), (RequestId::new("c"), 7), (RequestId::new("d"), 2)];

        let schedule = renumber(placed);
        let slots: Vec<(&str, Timeslot)> = schedule.entries().iter().map(|entry| (entry.request_id.as_str(), entry.timeslot)).collect();

        assert_eq!(slots, vec![("b", 1), ("d", 1), ("a", 2), ("c", 3)]);
        assert!(schedule.is_gap_free());
        assert!(schedule.entries().iter().all(|entry| entry.state == AssignmentState::Compacted));
    }
}
