use std::collections::BTreeMap;

use crate::domain::schedule::schedule::Timeslot;
use crate::domain::schedule::scheduler_type::SchedulerType;

/// Metrics of one scheduling policy in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub policy: SchedulerType,
    pub delay: u64,
    pub makespan: Timeslot,
    pub failed: usize,
    pub decohered: usize,

    /// Makespan of the single retry pass over the failed and decohered requests.
    pub retry_makespan: Timeslot,
}

impl PolicyOutcome {
    /// Timeslots consumed including the retry of failed and decohered requests.
    pub fn total_timeslots(&self) -> u64 {
        u64::from(self.makespan) + u64::from(self.retry_makespan)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: usize,
    pub requests: usize,

    /// Requests whose endpoints are disconnected; they are never scheduled.
    pub undeliverable: usize,
    pub policies: BTreeMap<SchedulerType, PolicyOutcome>,
}

impl RoundOutcome {
    pub fn policy(&self, policy: SchedulerType) -> Option<&PolicyOutcome> {
        self.policies.get(&policy)
    }
}

/// All rounds of one (system size, requests number) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationSummary {
    /// Total number of nodes of the grid.
    pub system_size: usize,
    pub requests_number: usize,
    pub rounds: Vec<RoundOutcome>,
}

impl CombinationSummary {
    fn sum_over_rounds(&self, policy: SchedulerType, metric: impl Fn(&PolicyOutcome) -> u64) -> u64 {
        self.rounds.iter().filter_map(|round| round.policy(policy)).map(metric).sum()
    }

    pub fn total_delay(&self, policy: SchedulerType) -> u64 {
        self.sum_over_rounds(policy, |outcome| outcome.delay)
    }

    pub fn total_timeslots(&self, policy: SchedulerType) -> u64 {
        self.sum_over_rounds(policy, PolicyOutcome::total_timeslots)
    }

    pub fn total_failed(&self, policy: SchedulerType) -> u64 {
        self.sum_over_rounds(policy, |outcome| outcome.failed as u64)
    }

    pub fn total_decohered(&self, policy: SchedulerType) -> u64 {
        self.sum_over_rounds(policy, |outcome| outcome.decohered as u64)
    }

    pub fn total_undeliverable(&self) -> u64 {
        self.rounds.iter().map(|round| round.undeliverable as u64).sum()
    }
}
