// Verdict types and the per-variant verdict mapping

use std::collections::BTreeMap;

use crate::bimera::search::Reconstruction;

/// Outcome of testing one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Genuine,
    /// `child == left[..breakpoint] + right[breakpoint..]`
    Bimera {
        left: String,
        right: String,
        breakpoint: usize,
    },
}

impl Verdict {
    pub fn is_bimera(&self) -> bool {
        matches!(self, Self::Bimera { .. })
    }

    pub(crate) fn from_reconstruction(rec: &Reconstruction, sequences: &[String]) -> Self {
        Self::Bimera {
            left: sequences[rec.left].clone(),
            right: sequences[rec.right].clone(),
            breakpoint: rec.breakpoint,
        }
    }
}

/// Per-sample vote counts for one variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleTally {
    /// Samples where the variant has a non-zero count
    pub present: u32,
    /// Of those, samples where it was reconstructed from two parents
    pub flagged: u32,
}

/// Verdicts keyed by variant sequence.
///
/// Keyed storage keeps iteration order independent of the order in which
/// worker threads finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerdictMap {
    verdicts: BTreeMap<String, Verdict>,
    tallies: BTreeMap<String, SampleTally>,
}

impl VerdictMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, sequence: String, verdict: Verdict, tally: Option<SampleTally>) {
        if let Some(t) = tally {
            self.tallies.insert(sequence.clone(), t);
        }
        self.verdicts.insert(sequence, verdict);
    }

    pub fn get(&self, sequence: &str) -> Option<&Verdict> {
        self.verdicts.get(sequence)
    }

    /// Sample vote counts; `None` under the pooled method.
    pub fn tally(&self, sequence: &str) -> Option<SampleTally> {
        self.tallies.get(sequence).copied()
    }

    pub fn is_bimera(&self, sequence: &str) -> bool {
        self.get(sequence).is_some_and(Verdict::is_bimera)
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn n_bimeras(&self) -> usize {
        self.verdicts.values().filter(|v| v.is_bimera()).count()
    }

    /// Iterate in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Verdict)> {
        self.verdicts.iter().map(|(s, v)| (s.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_map_queries() {
        let mut map = VerdictMap::new();
        map.insert("AAAA".into(), Verdict::Genuine, None);
        map.insert(
            "ACCC".into(),
            Verdict::Bimera {
                left: "AAAA".into(),
                right: "CCCC".into(),
                breakpoint: 1,
            },
            Some(SampleTally {
                present: 2,
                flagged: 2,
            }),
        );

        assert_eq!(map.len(), 2);
        assert_eq!(map.n_bimeras(), 1);
        assert!(map.is_bimera("ACCC"));
        assert!(!map.is_bimera("AAAA"));
        assert!(!map.is_bimera("GGGG"));
        assert_eq!(map.tally("ACCC").map(|t| t.flagged), Some(2));
        assert_eq!(map.tally("AAAA"), None);

        let keys: Vec<&str> = map.iter().map(|(s, _)| s).collect();
        assert_eq!(keys, vec!["AAAA", "ACCC"]);
    }

    #[test]
    fn test_from_reconstruction() {
        let seqs = vec!["AAAA".to_string(), "CCCC".to_string()];
        let rec = Reconstruction {
            left: 1,
            right: 0,
            breakpoint: 3,
        };
        assert_eq!(
            Verdict::from_reconstruction(&rec, &seqs),
            Verdict::Bimera {
                left: "CCCC".into(),
                right: "AAAA".into(),
                breakpoint: 3,
            }
        );
    }
}
