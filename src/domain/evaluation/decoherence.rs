use rand::Rng;
use rand::distr::{Bernoulli, Distribution};
use serde::Deserialize;

use crate::domain::request::Round;
use crate::domain::schedule::schedule::Schedule;
use crate::domain::topology::Topology;
use crate::domain::utils::id::RequestId;
use crate::error::{Error, Result};

/// How the decoherence probability of a request is derived from the configured rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DecoherenceModel {
    /// `1 - exp(-rate)`, independent of the request.
    #[default]
    RateOnly,

    /// `1 - exp(-rate * d / d_max)` with the Manhattan distance `d` of the request and the
    /// corner-to-corner distance `d_max` of the grid.
    // TODO: confirm with the experiment owners whether distance scaling should become the default.
    DistanceScaled,
}

/// Independent Bernoulli decoherence trials over the requests of a finished schedule.
#[derive(Debug, Clone, Copy)]
pub struct DecoherenceEvaluator {
    rate: f64,
    model: DecoherenceModel,
}

impl DecoherenceEvaluator {
    pub fn new(rate: f64, model: DecoherenceModel) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::InvalidConfiguration(format!("decoherence rate must be a finite, non-negative number, got {}", rate)));
        }

        Ok(Self { rate, model })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn model(&self) -> DecoherenceModel {
        self.model
    }

    /// Probability that a request with the given Manhattan distance decoheres.
    pub fn probability(&self, manhattan_distance: u32, longest_shortest_path: u32) -> f64 {
        match self.model {
            DecoherenceModel::RateOnly => 1.0 - (-self.rate).exp(),
            DecoherenceModel::DistanceScaled => {
                let length_ratio = if longest_shortest_path == 0 { 0.0 } else { f64::from(manhattan_distance) / f64::from(longest_shortest_path) };
                1.0 - (-self.rate * length_ratio).exp()
            }
        }
    }

    /// Runs one trial per scheduled request and returns the decohered ones in schedule order.
    ///
    /// Requests of the schedule that are not part of `round` are skipped.
    pub fn decohered_requests<R: Rng + ?Sized>(&self, schedule: &Schedule, round: &Round, topology: &Topology, rng: &mut R) -> Result<Vec<RequestId>> {
        let longest_shortest_path = topology.longest_shortest_path();
        let mut decohered = Vec::new();

        for entry in schedule.entries() {
            let Some(request) = round.request(&entry.request_id) else {
                log::warn!("{} is scheduled but not part of round {}", entry.request_id, round.number);
                continue;
            };

            let distance = match self.model {
                DecoherenceModel::RateOnly => 0,
                DecoherenceModel::DistanceScaled => topology.manhattan_distance(request.source, request.destination)?,
            };

            let probability = self.probability(distance, longest_shortest_path);
            if self.trial(probability, rng)? {
                log::debug!("{} in timeslot {} decohered with probability {:.4}", entry.request_id, entry.timeslot, probability);
                decohered.push(entry.request_id.clone());
            }
        }

        Ok(decohered)
    }

    /// A single Bernoulli trial, `true` meaning the request decohered.
    pub fn trial<R: Rng + ?Sized>(&self, probability: f64, rng: &mut R) -> Result<bool> {
        let bernoulli = Bernoulli::new(probability).map_err(|e| Error::InvalidConfiguration(format!("decoherence probability {}: {}", probability, e)))?;

        Ok(bernoulli.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_only_ignores_distance() {
        let evaluator = DecoherenceEvaluator::new(0.1, DecoherenceModel::RateOnly).unwrap();
        let expected = 1.0 - (-0.1f64).exp();

        assert!((evaluator.probability(1, 6) - expected).abs() < 1e-12);
        assert!((evaluator.probability(6, 6) - expected).abs() < 1e-12);
    }

    #[test]
    fn distance_scaled_grows_with_distance() {
        let evaluator = DecoherenceEvaluator::new(0.5, DecoherenceModel::DistanceScaled).unwrap();

        assert_eq!(evaluator.probability(0, 6), 0.0);
        assert!(evaluator.probability(2, 6) < evaluator.probability(6, 6));
        assert!((evaluator.probability(6, 6) - (1.0 - (-0.5f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn negative_rate_is_rejected() {
        assert!(matches!(DecoherenceEvaluator::new(-0.1, DecoherenceModel::RateOnly), Err(Error::InvalidConfiguration(_))));
        assert!(DecoherenceEvaluator::new(f64::NAN, DecoherenceModel::RateOnly).is_err());
    }
}
