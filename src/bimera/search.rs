// Two-parent reconstruction search

use std::cmp::Ordering;

use crate::bimera::options::BimeraOptions;

/// A successful exact reconstruction of a child from two parent columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstruction {
    pub left: usize,
    pub right: usize,
    /// First child position taken from `right`
    pub breakpoint: usize,
}

/// Column indices by descending abundance, ties broken by sequence.
pub fn abundance_order(sequences: &[String], abundances: &[u64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sequences.len()).collect();
    order.sort_by(|&a, &b| match abundances[b].cmp(&abundances[a]) {
        Ordering::Equal => sequences[a].cmp(&sequences[b]),
        other => other,
    });
    order
}

/// Candidate parents and breakpoint scan over one abundance vector.
///
/// The vector is either the table's column totals (pooled) or a single
/// sample's counts. All data is borrowed read-only, so one space can be
/// shared across worker threads.
pub struct SearchSpace<'a> {
    sequences: &'a [String],
    abundances: &'a [u64],
    order: Vec<usize>,
}

impl<'a> SearchSpace<'a> {
    pub fn new(sequences: &'a [String], abundances: &'a [u64]) -> Self {
        Self {
            sequences,
            abundances,
            order: abundance_order(sequences, abundances),
        }
    }

    /// Test order for children: most abundant first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Candidate parents of `child`, in abundance order.
    pub fn parents(&self, child: usize, options: &BimeraOptions) -> Vec<usize> {
        let child_ab = self.abundances[child];
        self.order
            .iter()
            .copied()
            .take_while(|&p| self.abundances[p] > child_ab)
            .filter(|&p| self.is_parent(p, child, options))
            .collect()
    }

    fn is_parent(&self, parent: usize, child: usize, options: &BimeraOptions) -> bool {
        if parent == child {
            return false;
        }
        let parent_ab = self.abundances[parent];
        let child_ab = self.abundances[child];
        let parent_seq = &self.sequences[parent];
        let child_seq = &self.sequences[child];

        parent_ab > 0
            && parent_ab > child_ab
            && parent_ab as f64 >= options.min_fold_parent_over_abundance * child_ab as f64
            && parent_ab >= options.min_parent_abundance
            && parent_seq.len() == child_seq.len()
            && parent_seq != child_seq
    }

    /// First exact two-parent reconstruction of `child`, if any.
    ///
    /// Pairs are tried with `left` in parent order, then `right` in parent
    /// order; within a pair the smallest valid breakpoint is reported.
    /// Children with zero abundance or below `min_abundance_to_test` are
    /// not tested.
    pub fn find(&self, child: usize, options: &BimeraOptions) -> Option<Reconstruction> {
        let child_ab = self.abundances[child];
        if child_ab == 0 || child_ab < options.min_abundance_to_test {
            return None;
        }

        let child_seq = self.sequences[child].as_bytes();
        let len = child_seq.len();
        let min_overlap = options.min_overlap_bases.max(1);
        if min_overlap > len / 2 {
            return None;
        }
        let max_break = len - min_overlap;

        // child[..b] == left[..b]  <=>  b <= prefix match
        // child[b..] == right[b..] <=>  b >= len - suffix match
        let mut lefts = Vec::new();
        let mut rights = Vec::new();
        for p in self.parents(child, options) {
            let parent_seq = self.sequences[p].as_bytes();
            let prefix = common_prefix(child_seq, parent_seq);
            let suffix = common_suffix(child_seq, parent_seq);
            if prefix >= min_overlap {
                lefts.push((p, prefix.min(max_break)));
            }
            if suffix >= min_overlap {
                rights.push((p, (len - suffix).max(min_overlap)));
            }
        }

        for &(left, hi) in &lefts {
            for &(right, lo) in &rights {
                if left != right && lo <= hi {
                    return Some(Reconstruction {
                        left,
                        right,
                        breakpoint: lo,
                    });
                }
            }
        }
        None
    }
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}
