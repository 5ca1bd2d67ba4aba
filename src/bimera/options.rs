// Detector configuration

use crate::params::{ConsensusMethod, Parameters};

/// Explicit detector settings; nothing here is read from global state.
#[derive(Debug, Clone, PartialEq)]
pub struct BimeraOptions {
    /// Each parent needs abundance >= this multiple of the child's (default 2.0)
    pub min_fold_parent_over_abundance: f64,
    /// Absolute abundance floor for parents; 0 disables it (default 0)
    pub min_parent_abundance: u64,
    /// Children below this abundance are not tested (default 1)
    pub min_abundance_to_test: u64,
    /// Breakpoints are scanned over `[m, len - m]` (default 1)
    pub min_overlap_bases: usize,
    /// Pooled, consensus or per-sample verdicts (default consensus)
    pub method: ConsensusMethod,
    /// Vote fraction for the consensus method (default 0.9)
    pub min_sample_fraction: f64,
    /// Non-flagging samples tolerated by the consensus vote (default 1)
    pub ignore_n_negatives: u32,
    /// Worker threads (default 1)
    pub threads: usize,
}

impl Default for BimeraOptions {
    fn default() -> Self {
        Self {
            min_fold_parent_over_abundance: 2.0,
            min_parent_abundance: 0,
            min_abundance_to_test: 1,
            min_overlap_bases: 1,
            method: ConsensusMethod::default(),
            min_sample_fraction: 0.9,
            ignore_n_negatives: 1,
            threads: 1,
        }
    }
}

impl BimeraOptions {
    pub fn from_params(params: &Parameters) -> Self {
        Self {
            min_fold_parent_over_abundance: params.min_fold_parent_over_abundance,
            min_parent_abundance: params.min_parent_abundance,
            min_abundance_to_test: params.min_abundance_to_test,
            min_overlap_bases: params.min_overlap_bases,
            method: params.consensus_method,
            min_sample_fraction: params.min_sample_fraction,
            ignore_n_negatives: params.ignore_n_negatives,
            threads: params.run_thread_n,
        }
    }
}
