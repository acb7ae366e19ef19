use serde::Deserialize;

use crate::domain::request::Request;
use crate::domain::routing::path_selection::PathAssignment;
use crate::domain::schedule::schedule::Schedule;
use crate::domain::schedule::scheduler_type::SchedulerType;
use crate::domain::topology::Topology;
use crate::error::{Error, Result};

/// Coefficients of the RRRN priority. The priority of a request is divided by
/// `b = k + c * a` times its Manhattan distance.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SchedulingWeights {
    pub k: f64,
    pub c: f64,
    pub a: f64,
}

impl SchedulingWeights {
    pub fn new(k: f64, c: f64, a: f64) -> Result<Self> {
        let weights = Self { k, c, a };
        let b = weights.b();

        if !b.is_finite() || b <= 0.0 {
            return Err(Error::InvalidConfiguration(format!("scheduling coefficient b = k + c*a must be positive, got {}", b)));
        }

        Ok(weights)
    }

    /// The comprehensive coefficient `b = k + c * a`.
    pub fn b(&self) -> f64 {
        self.k + self.c * self.a
    }
}

impl Default for SchedulingWeights {
    fn default() -> Self {
        Self { k: 1.0, c: 1.0, a: 1.0 }
    }
}

/// Assigns timeslots to the requests of one round.
///
/// The scheduler only reads the topology and the path assignment of the round; every policy
/// returns a fresh `Schedule`.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler<'a> {
    pub(super) topology: &'a Topology,
    pub(super) routes: &'a PathAssignment,
    pub(super) weights: SchedulingWeights,
}

impl<'a> Scheduler<'a> {
    pub fn new(topology: &'a Topology, routes: &'a PathAssignment, weights: SchedulingWeights) -> Self {
        Self { topology, routes, weights }
    }

    /// Schedules `requests` (in arrival order) with the given policy.
    pub fn schedule(&self, policy: SchedulerType, requests: &[Request]) -> Result<Schedule> {
        let schedule = match policy {
            SchedulerType::Fifo => self.fifo(requests),
            SchedulerType::Rrrn => self.rrrn(requests)?,
            SchedulerType::FifoMerge => self.fifo_merge(requests),
            SchedulerType::RrrnMerge => self.merge(&self.rrrn(requests)?),
        };

        log::debug!("{} scheduled {} request(s) in {} timeslot(s)", policy, schedule.len(), schedule.makespan());

        Ok(schedule)
    }
}
