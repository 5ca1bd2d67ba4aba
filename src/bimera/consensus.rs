// Cross-sample aggregation of per-sample bimera calls

use std::collections::BTreeMap;

use dashmap::DashMap;

use crate::bimera::options::BimeraOptions;
use crate::bimera::search::Reconstruction;
use crate::bimera::verdict::SampleTally;
use crate::params::ConsensusMethod;

/// Votes collected for one variant.
#[derive(Debug, Clone, Default)]
pub(crate) struct TallyEntry {
    pub tally: SampleTally,
    /// Reconstruction from the lowest-indexed flagging sample
    pub first_call: Option<(usize, Reconstruction)>,
}

impl TallyEntry {
    fn record(&mut self, sample: usize, call: Option<Reconstruction>) {
        self.tally.present += 1;
        if let Some(rec) = call {
            self.tally.flagged += 1;
            match self.first_call {
                Some((s, _)) if s <= sample => {}
                _ => self.first_call = Some((sample, rec)),
            }
        }
    }
}

/// Thread-safe vote accumulator keyed by variant column.
pub(crate) struct TallyBoard {
    entries: DashMap<usize, TallyEntry>,
}

impl TallyBoard {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record that `variant` is present in `sample` (thread-safe)
    ///
    /// `call` is the sample-local reconstruction, or `None` when the sample
    /// did not flag it.
    pub fn record(&self, variant: usize, sample: usize, call: Option<Reconstruction>) {
        self.entries
            .entry(variant)
            .or_default()
            .record(sample, call);
    }

    /// Drain into a column-ordered map.
    pub fn into_entries(self) -> BTreeMap<usize, TallyEntry> {
        self.entries.into_iter().collect()
    }
}

/// Decide whether sample votes make a variant bimeric overall.
///
/// - `per-sample`: flagged in every sample where present.
/// - `consensus`: flagged in all samples, or in at least
///   `min_sample_fraction` of the samples left after discounting
///   `ignore_n_negatives` non-flagging ones.
///
/// A variant never flagged anywhere is always genuine.
pub fn vote(tally: SampleTally, options: &BimeraOptions) -> bool {
    if tally.flagged == 0 {
        return false;
    }
    match options.method {
        ConsensusMethod::PerSample => tally.flagged >= tally.present,
        ConsensusMethod::Consensus | ConsensusMethod::Pooled => {
            let counted = tally.present.saturating_sub(options.ignore_n_negatives);
            tally.flagged >= tally.present
                || tally.flagged as f64 >= counted as f64 * options.min_sample_fraction
        }
    }
}
