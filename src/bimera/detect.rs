// Bimera detection over a sequence table

use log::{debug, info};
use rayon::prelude::*;

use crate::bimera::consensus::{TallyBoard, vote};
use crate::bimera::options::BimeraOptions;
use crate::bimera::search::{Reconstruction, SearchSpace};
use crate::bimera::verdict::{Verdict, VerdictMap};
use crate::error::Error;
use crate::params::ConsensusMethod;
use crate::table::SequenceTable;

/// De-novo bimera detector
pub struct BimeraDetector<'a> {
    options: &'a BimeraOptions,
}

impl<'a> BimeraDetector<'a> {
    /// Create a new bimera detector
    pub fn new(options: &'a BimeraOptions) -> Self {
        Self { options }
    }

    /// Produce a verdict for every variant in `table`.
    ///
    /// The table is only read. Work is spread over a dedicated pool of
    /// `options.threads` workers; the result does not depend on the
    /// thread count.
    pub fn detect(&self, table: &SequenceTable) -> Result<VerdictMap, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        info!(
            "Testing {} variants across {} samples (method: {}, threads: {})",
            table.n_variants(),
            table.n_samples(),
            self.options.method,
            self.options.threads
        );

        let verdicts = pool.install(|| match self.options.method {
            ConsensusMethod::Pooled => self.detect_pooled(table),
            ConsensusMethod::Consensus | ConsensusMethod::PerSample => {
                self.detect_by_sample(table)
            }
        });

        info!(
            "Identified {} bimeras out of {} input sequences",
            verdicts.n_bimeras(),
            verdicts.len()
        );
        Ok(verdicts)
    }

    /// One search over the column totals.
    fn detect_pooled(&self, table: &SequenceTable) -> VerdictMap {
        let abundances = table.abundances();
        let space = SearchSpace::new(table.sequences(), &abundances);

        let calls: Vec<(usize, Option<Reconstruction>)> = space
            .order()
            .par_iter()
            .map(|&child| (child, space.find(child, self.options)))
            .collect();

        let mut verdicts = VerdictMap::new();
        for (child, call) in calls {
            let verdict = match call {
                Some(rec) => Verdict::from_reconstruction(&rec, table.sequences()),
                None => Verdict::Genuine,
            };
            verdicts.insert(table.sequence(child).to_string(), verdict, None);
        }
        verdicts
    }

    /// Independent search in every sample, then a cross-sample vote.
    fn detect_by_sample(&self, table: &SequenceTable) -> VerdictMap {
        let board = TallyBoard::new();

        (0..table.n_samples()).into_par_iter().for_each(|sample| {
            let counts = table.sample_counts(sample);
            let space = SearchSpace::new(table.sequences(), counts);
            let n_present = counts.iter().filter(|&&c| c > 0).count();
            debug!(
                "Sample {}: {} variants present",
                table.samples()[sample],
                n_present
            );

            space.order()[..n_present].par_iter().for_each(|&child| {
                board.record(child, sample, space.find(child, self.options));
            });
        });

        let entries = board.into_entries();
        let mut verdicts = VerdictMap::new();
        for (child, seq) in table.sequences().iter().enumerate() {
            let Some(entry) = entries.get(&child) else {
                // absent from every sample
                verdicts.insert(seq.clone(), Verdict::Genuine, Some(Default::default()));
                continue;
            };

            let verdict = match entry.first_call {
                Some((_, rec)) if vote(entry.tally, self.options) => {
                    Verdict::from_reconstruction(&rec, table.sequences())
                }
                _ => Verdict::Genuine,
            };
            verdicts.insert(seq.clone(), verdict, Some(entry.tally));
        }
        verdicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    const LEFT: &str = "AAAAAAAAAA";
    const RIGHT: &str = "CCCCCCCCCC";
    const CHILD: &str = "AAAAACCCCC";

    fn single_sample(counts: Vec<i64>) -> SequenceTable {
        SequenceTable::new(names(&["S1"]), names(&[LEFT, RIGHT, CHILD]), vec![counts]).unwrap()
    }

    fn with_method(method: ConsensusMethod) -> BimeraOptions {
        BimeraOptions {
            method,
            ..BimeraOptions::default()
        }
    }

    #[test]
    fn test_exact_reconstruction_reported() {
        let table = single_sample(vec![40, 40, 10]);
        for method in [
            ConsensusMethod::Pooled,
            ConsensusMethod::Consensus,
            ConsensusMethod::PerSample,
        ] {
            let opts = with_method(method);
            let verdicts = BimeraDetector::new(&opts).detect(&table).unwrap();
            assert_eq!(
                verdicts.get(CHILD),
                Some(&Verdict::Bimera {
                    left: LEFT.to_string(),
                    right: RIGHT.to_string(),
                    breakpoint: 5,
                }),
                "method {method}"
            );
            assert_eq!(verdicts.get(LEFT), Some(&Verdict::Genuine));
            assert_eq!(verdicts.get(RIGHT), Some(&Verdict::Genuine));
            assert_eq!(verdicts.len(), 3);
        }
    }

    #[test]
    fn test_single_variant_table() {
        let table =
            SequenceTable::new(names(&["S1"]), names(&[CHILD]), vec![vec![5]]).unwrap();
        let opts = BimeraOptions::default();
        let verdicts = BimeraDetector::new(&opts).detect(&table).unwrap();
        assert_eq!(verdicts.get(CHILD), Some(&Verdict::Genuine));
    }

    #[test]
    fn test_per_sample_vs_consensus() {
        // Child is reconstructable in S1 and S2 but not in S3, where the
        // right parent is absent.
        let table = SequenceTable::new(
            names(&["S1", "S2", "S3"]),
            names(&[LEFT, RIGHT, CHILD]),
            vec![vec![40, 40, 10], vec![30, 30, 5], vec![50, 0, 5]],
        )
        .unwrap();

        let per_sample = with_method(ConsensusMethod::PerSample);
        let v = BimeraDetector::new(&per_sample).detect(&table).unwrap();
        assert!(!v.is_bimera(CHILD));
        let t = v.tally(CHILD).unwrap();
        assert_eq!((t.present, t.flagged), (3, 2));

        // 2 >= (3 - 1) * 0.9
        let consensus = with_method(ConsensusMethod::Consensus);
        let v = BimeraDetector::new(&consensus).detect(&table).unwrap();
        assert!(v.is_bimera(CHILD));

        let strict = BimeraOptions {
            ignore_n_negatives: 0,
            ..consensus
        };
        let v = BimeraDetector::new(&strict).detect(&table).unwrap();
        assert!(!v.is_bimera(CHILD));
    }

    #[test]
    fn test_sample_fold_ratio_is_local() {
        // Pooled totals satisfy the fold ratio, but within S2 the child
        // outnumbers its parents.
        let table = SequenceTable::new(
            names(&["S1", "S2"]),
            names(&[LEFT, RIGHT, CHILD]),
            vec![vec![100, 100, 1], vec![3, 3, 20]],
        )
        .unwrap();

        let pooled = with_method(ConsensusMethod::Pooled);
        assert!(
            BimeraDetector::new(&pooled)
                .detect(&table)
                .unwrap()
                .is_bimera(CHILD)
        );

        let per_sample = with_method(ConsensusMethod::PerSample);
        let v = BimeraDetector::new(&per_sample).detect(&table).unwrap();
        assert!(!v.is_bimera(CHILD));
        assert_eq!(v.tally(CHILD).map(|t| t.flagged), Some(1));
    }

    #[test]
    fn test_absent_variant_is_genuine() {
        let table = SequenceTable::new(
            names(&["S1"]),
            names(&[LEFT, RIGHT, CHILD]),
            vec![vec![40, 40, 0]],
        )
        .unwrap();
        let opts = BimeraOptions::default();
        let v = BimeraDetector::new(&opts).detect(&table).unwrap();
        assert_eq!(v.get(CHILD), Some(&Verdict::Genuine));
        assert_eq!(v.tally(CHILD).map(|t| t.present), Some(0));
    }

    #[test]
    fn test_min_abundance_to_test_skips_child() {
        let table = single_sample(vec![40, 40, 3]);
        let opts = BimeraOptions {
            min_abundance_to_test: 4,
            ..BimeraOptions::default()
        };
        let v = BimeraDetector::new(&opts).detect(&table).unwrap();
        assert!(!v.is_bimera(CHILD));
    }

    #[test]
    fn test_zero_threads_uses_default_pool() {
        let table = single_sample(vec![40, 40, 10]);
        let opts = BimeraOptions {
            threads: 0,
            ..BimeraOptions::default()
        };
        // rayon treats 0 as "pick automatically"
        assert!(BimeraDetector::new(&opts).detect(&table).is_ok());
    }
}
