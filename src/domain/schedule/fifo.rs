use crate::domain::request::Request;
use crate::domain::schedule::schedule::Schedule;
use crate::domain::schedule::scheduler::Scheduler;

impl<'a> Scheduler<'a> {
    /// First in, first out: request `i` (arrival order, 0-based) gets timeslot `i + 1`.
    pub fn fifo(&self, requests: &[Request]) -> Schedule {
        let mut schedule = Schedule::new();

        for (timeslot, request) in (1..).zip(requests) {
            schedule.push(request.id.clone(), timeslot);
        }

        schedule
    }
}
