use serde::Deserialize;

use crate::domain::evaluation::decoherence::DecoherenceModel;
use crate::domain::routing::path_selection::BackupStrategy;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentDto {
    /// Total node counts of the grids to simulate, each a perfect square.
    pub system_sizes: Vec<usize>,
    pub request_numbers: Vec<usize>,
    pub rounds: usize,

    #[serde(default = "default_k_paths")]
    pub k_paths: usize,

    #[serde(default)]
    pub weights: SchedulingWeightsDto,

    pub failure_probability: f64,

    #[serde(default)]
    pub decoherence: DecoherenceDto,

    #[serde(default)]
    pub backup_strategy: BackupStrategy,

    #[serde(default)]
    pub seed: Option<u64>,

    pub report_file: String,

    #[serde(default)]
    pub statistics_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingWeightsDto {
    pub k: f64,
    pub c: f64,
    pub a: f64,
}

impl Default for SchedulingWeightsDto {
    fn default() -> Self {
        Self { k: 1.0, c: 1.0, a: 1.0 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoherenceDto {
    pub rate: f64,

    #[serde(default)]
    pub model: DecoherenceModel,
}

fn default_k_paths() -> usize {
    crate::domain::routing::yen::K_NUMBER_OF_PATHS
}
