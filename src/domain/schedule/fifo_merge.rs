use crate::domain::request::Request;
use crate::domain::schedule::schedule::{Schedule, Timeslot};
use crate::domain::schedule::scheduler::Scheduler;

/// A request only joins a timeslot group if its primary path is at most this many times as
/// long (in nodes) as the primary path of the group's first member.
pub const PRIORITY_MISMATCH_RATIO: f64 = 1.2;

impl<'a> Scheduler<'a> {
    /// Single forward sweep over the arrival order that fills one timeslot at a time.
    ///
    /// A request joins the current group if it conflicts with no member and passes the
    /// priority-mismatch guard; every rejected request rolls over to the next timeslot in its
    /// original relative order.
    pub fn fifo_merge(&self, requests: &[Request]) -> Schedule {
        let mut schedule = Schedule::new();
        let mut pool: Vec<&Request> = requests.iter().collect();
        let mut timeslot: Timeslot = 1;

        while !pool.is_empty() {
            let mut group: Vec<&Request> = Vec::new();
            let mut rolled_over: Vec<&Request> = Vec::new();

            for request in pool {
                let routes = self.routes.routes(&request.id);

                let accepted = match group.first() {
                    None => true,
                    Some(first) => {
                        let limit = self.routes.routes(&first.id).primary_len() as f64 * PRIORITY_MISMATCH_RATIO;
                        let within_limit = routes.primary_len() as f64 <= limit;

                        within_limit && group.iter().all(|member| !routes.conflicts_with(self.routes.routes(&member.id)))
                    }
                };

                if accepted {
                    group.push(request);
                } else {
                    rolled_over.push(request);
                }
            }

            log::trace!("FIFO merge: timeslot {} holds {} request(s), {} rolled over", timeslot, group.len(), rolled_over.len());

            for request in &group {
                schedule.push(request.id.clone(), timeslot);
            }

            timeslot += 1;
            pool = rolled_over;
        }

        schedule
    }
}
