pub mod outcome;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};

use crate::api::experiment_dto::ExperimentDto;
use crate::domain::evaluation::decoherence::DecoherenceEvaluator;
use crate::domain::evaluation::failure::FailureMap;
use crate::domain::experiment::outcome::{CombinationSummary, PolicyOutcome, RoundOutcome};
use crate::domain::request::request_generator::RequestGenerator;
use crate::domain::request::{Request, Round};
use crate::domain::routing::graph::Graph;
use crate::domain::routing::path_selection::{BackupStrategy, PathAssignment};
use crate::domain::schedule::schedule::Timeslot;
use crate::domain::schedule::scheduler::{Scheduler, SchedulingWeights};
use crate::domain::schedule::scheduler_type::SchedulerType;
use crate::domain::topology::Topology;
use crate::domain::utils::id::RequestId;
use crate::error::{Error, Result};

/// A validated experiment: every combination of system size and requests number is simulated
/// for `rounds` independent rounds.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub system_sizes: Vec<usize>,
    pub request_numbers: Vec<usize>,
    pub rounds: usize,
    pub k_paths: usize,
    pub weights: SchedulingWeights,
    pub failure_fraction: f64,
    pub decoherence: DecoherenceEvaluator,
    pub backup_strategy: BackupStrategy,
    pub seed: Option<u64>,
}

impl Experiment {
    pub fn from_dto(dto: &ExperimentDto) -> Result<Self> {
        if dto.system_sizes.is_empty() || dto.request_numbers.is_empty() {
            return Err(Error::InvalidConfiguration("at least one system size and one requests number are required".to_string()));
        }

        for &system_size in &dto.system_sizes {
            Topology::grid(system_size)?;
            if system_size < 2 {
                return Err(Error::InsufficientNodes(system_size));
            }
        }

        if dto.rounds == 0 {
            return Err(Error::InvalidConfiguration("rounds must be at least 1".to_string()));
        }

        if dto.k_paths == 0 {
            return Err(Error::InvalidConfiguration("kPaths must be at least 1".to_string()));
        }

        if !(0.0..=1.0).contains(&dto.failure_probability) {
            log::warn!("Failure probability {} lies outside [0, 1] and will be clamped.", dto.failure_probability);
        }

        Ok(Experiment {
            system_sizes: dto.system_sizes.clone(),
            request_numbers: dto.request_numbers.clone(),
            rounds: dto.rounds,
            k_paths: dto.k_paths,
            weights: SchedulingWeights::new(dto.weights.k, dto.weights.c, dto.weights.a)?,
            failure_fraction: dto.failure_probability,
            decoherence: DecoherenceEvaluator::new(dto.decoherence.rate, dto.decoherence.model)?,
            backup_strategy: dto.backup_strategy,
            seed: dto.seed,
        })
    }

    /// The random source of the whole experiment; unseeded experiments are not reproducible.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                log::warn!("No seed configured. Results will not be reproducible.");
                StdRng::from_os_rng()
            }
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<CombinationSummary>> {
        let mut summaries = Vec::with_capacity(self.system_sizes.len() * self.request_numbers.len());

        for &system_size in &self.system_sizes {
            let topology = Topology::grid(system_size)?;
            let graph = Graph::from_topology(&topology);
            let generator = RequestGenerator::new(&topology);

            log::info!(
                "System size {}: {}x{} grid, {} links, total capacity {}",
                system_size,
                topology.size(),
                topology.size(),
                topology.links().len(),
                topology.total_capacity()
            );

            for &requests_number in &self.request_numbers {
                let mut rounds = Vec::with_capacity(self.rounds);

                for round_number in 1..=self.rounds {
                    let round = generator.generate_round(round_number, requests_number, &mut *rng)?;
                    rounds.push(self.run_round(&topology, &graph, &round, &mut *rng)?);
                }

                let summary = CombinationSummary { system_size, requests_number, rounds };

                log::info!(
                    "System size {} / {} requests over {} round(s): FIFO delay {}, FIFO Merge delay {}, RRRN Merge delay {}",
                    system_size,
                    requests_number,
                    self.rounds,
                    summary.total_delay(SchedulerType::Fifo),
                    summary.total_delay(SchedulerType::FifoMerge),
                    summary.total_delay(SchedulerType::RrrnMerge)
                );

                summaries.push(summary);
            }
        }

        Ok(summaries)
    }

    /// Routes, schedules and evaluates a single round under every policy.
    ///
    /// One failure map over `T` = number of routable requests is shared by all policies.
    /// Failed and decohered requests are retried once with the same policy after the schedule.
    pub fn run_round<R: Rng + ?Sized>(&self, topology: &Topology, graph: &Graph, round: &Round, rng: &mut R) -> Result<RoundOutcome> {
        let routes = PathAssignment::compute(graph, &round.requests, self.k_paths, &self.backup_strategy);

        let (routable, unroutable): (Vec<Request>, Vec<Request>) = round.requests.iter().cloned().partition(|request| routes.is_routable(&request.id));

        if !unroutable.is_empty() {
            log::warn!("Round {}: {} request(s) are undeliverable and excluded from scheduling", round.number, unroutable.len());
        }

        let scheduler = Scheduler::new(topology, &routes, self.weights);
        let failures = FailureMap::generate(routable.len() as Timeslot, topology.node_count(), self.failure_fraction, &mut *rng);

        let mut policies = BTreeMap::new();

        for policy in SchedulerType::ALL {
            let schedule = scheduler.schedule(policy, &routable)?;

            let failed = failures.failed_requests(&schedule, &routes);
            let decohered = self.decoherence.decohered_requests(&schedule, round, topology, &mut *rng)?;

            let lost: HashSet<&RequestId> = failed.iter().chain(decohered.iter()).collect();
            let retries: Vec<Request> = routable.iter().filter(|request| lost.contains(&request.id)).cloned().collect();
            let retry_schedule = scheduler.schedule(policy, &retries)?;

            log::debug!(
                "Round {} {}: delay {}, makespan {}, failed {}, decohered {}, retry makespan {}",
                round.number,
                policy,
                schedule.total_delay(),
                schedule.makespan(),
                failed.len(),
                decohered.len(),
                retry_schedule.makespan()
            );

            policies.insert(
                policy,
                PolicyOutcome {
                    policy,
                    delay: schedule.total_delay(),
                    makespan: schedule.makespan(),
                    failed: failed.len(),
                    decohered: decohered.len(),
                    retry_makespan: retry_schedule.makespan(),
                },
            );
        }

        Ok(RoundOutcome { round: round.number, requests: round.len(), undeliverable: unroutable.len(), policies })
    }
}
