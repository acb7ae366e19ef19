use crate::domain::request::Request;
use crate::domain::schedule::schedule::{Schedule, Timeslot};
use crate::domain::schedule::scheduler::Scheduler;
use crate::error::Result;

impl<'a> Scheduler<'a> {
    /// Priority scheduling by waiting time normalised with the transmission distance.
    ///
    /// Every step computes `waiting_time / (b * manhattan_distance)` for each remaining request
    /// and picks the strictly greatest priority; the first request in arrival order wins ties.
    /// Afterwards all remaining requests (the selected one included) wait one timeslot longer,
    /// and the selected request takes the next timeslot. The result holds one request per
    /// timeslot.
    pub fn rrrn(&self, requests: &[Request]) -> Result<Schedule> {
        let b = self.weights.b();

        // (request, distance, waiting time) in arrival order
        let mut remaining: Vec<(&Request, u32, u64)> = Vec::with_capacity(requests.len());
        for request in requests {
            let distance = self.topology.manhattan_distance(request.source, request.destination)?;
            remaining.push((request, distance, 0));
        }

        let mut schedule = Schedule::new();
        let mut timeslot: Timeslot = 1;

        while !remaining.is_empty() {
            let mut max_priority = -1.0;
            let mut selected = 0;

            for (index, (_, distance, waiting_time)) in remaining.iter().enumerate() {
                let priority = *waiting_time as f64 / (b * f64::from(*distance));
                if priority > max_priority {
                    max_priority = priority;
                    selected = index;
                }
            }

            for (_, _, waiting_time) in remaining.iter_mut() {
                *waiting_time += 1;
            }

            let (request, _, _) = remaining.remove(selected);
            log::trace!("RRRN: {} -> timeslot {} (priority {:.4})", request.id, timeslot, max_priority);
            schedule.push(request.id.clone(), timeslot);
            timeslot += 1;
        }

        Ok(schedule)
    }
}
