// Sequence table: sample × variant read counts
//
// Rows are samples in input order, columns are amplicon sequence variants
// identified by their exact nucleotide string. A table is validated once on
// construction and never mutated afterwards; filtering produces a new table.

pub mod io;

use std::collections::{HashMap, HashSet};

use crate::error::Error;

/// A validated abundance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceTable {
    samples: Vec<String>,
    sequences: Vec<String>,
    /// counts[sample][variant]
    counts: Vec<Vec<u64>>,
    column_of: HashMap<String, usize>,
}

/// One column of the table, annotated with its counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant<'a> {
    pub sequence: &'a str,
    pub counts: Vec<u64>,
    pub abundance: u64,
}

impl SequenceTable {
    /// Build a table from raw signed counts, rejecting anything malformed.
    ///
    /// Counts are accepted as `i64` so that negative values coming from a
    /// parser are reported rather than wrapped.
    pub fn new(
        samples: Vec<String>,
        sequences: Vec<String>,
        counts: Vec<Vec<i64>>,
    ) -> Result<Self, Error> {
        if samples.is_empty() {
            return Err(Error::validation(
                "table",
                "at least one sample is required",
            ));
        }
        if counts.len() != samples.len() {
            return Err(Error::validation(
                "table",
                format!(
                    "{} samples but {} count rows",
                    samples.len(),
                    counts.len()
                ),
            ));
        }

        let mut seen_samples = HashSet::with_capacity(samples.len());
        for name in &samples {
            if name.is_empty() {
                return Err(Error::validation("sample ''", "empty sample name"));
            }
            if !seen_samples.insert(name.as_str()) {
                return Err(Error::validation(
                    format!("sample '{name}'"),
                    "duplicate sample name",
                ));
            }
        }

        let mut column_of = HashMap::with_capacity(sequences.len());
        for (j, seq) in sequences.iter().enumerate() {
            validate_sequence(j, seq)?;
            if column_of.insert(seq.clone(), j).is_some() {
                return Err(Error::validation(
                    format!("variant '{seq}'"),
                    "duplicate variant sequence",
                ));
            }
        }

        let mut rows = Vec::with_capacity(counts.len());
        for (sample, row) in samples.iter().zip(counts) {
            if row.len() != sequences.len() {
                return Err(Error::validation(
                    format!("sample '{sample}'"),
                    format!(
                        "{} counts for {} variants",
                        row.len(),
                        sequences.len()
                    ),
                ));
            }
            let mut converted = Vec::with_capacity(row.len());
            for (j, &c) in row.iter().enumerate() {
                if c < 0 {
                    return Err(Error::validation(
                        format!("sample '{sample}', variant '{}'", sequences[j]),
                        format!("negative count {c}"),
                    ));
                }
                converted.push(c as u64);
            }
            rows.push(converted);
        }

        Ok(Self {
            samples,
            sequences,
            counts: rows,
            column_of,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_variants(&self) -> usize {
        self.sequences.len()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn sequence(&self, variant: usize) -> &str {
        &self.sequences[variant]
    }

    /// Column index of a variant, by exact sequence.
    pub fn column_index(&self, sequence: &str) -> Option<usize> {
        self.column_of.get(sequence).copied()
    }

    /// All counts of one sample, in column order.
    pub fn sample_counts(&self, sample: usize) -> &[u64] {
        &self.counts[sample]
    }

    pub fn sample_total(&self, sample: usize) -> u64 {
        self.counts[sample].iter().sum()
    }

    /// Total abundance of one variant (column sum).
    pub fn abundance(&self, variant: usize) -> u64 {
        self.counts.iter().map(|row| row[variant]).sum()
    }

    /// Column sums for every variant.
    pub fn abundances(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.n_variants()];
        for row in &self.counts {
            for (t, &c) in totals.iter_mut().zip(row) {
                *t += c;
            }
        }
        totals
    }

    pub fn total_reads(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn variant(&self, variant: usize) -> Variant<'_> {
        let counts: Vec<u64> = self.counts.iter().map(|row| row[variant]).collect();
        let abundance = counts.iter().sum();
        Variant {
            sequence: &self.sequences[variant],
            counts,
            abundance,
        }
    }

    pub fn variants(&self) -> impl Iterator<Item = Variant<'_>> {
        (0..self.n_variants()).map(move |j| self.variant(j))
    }

    /// New table keeping only the columns for which `keep` returns true.
    ///
    /// Sample rows are kept even if they end up empty.
    pub fn select_columns<F>(&self, keep: F) -> SequenceTable
    where
        F: Fn(usize) -> bool,
    {
        let kept: Vec<usize> = (0..self.n_variants()).filter(|&j| keep(j)).collect();

        let sequences: Vec<String> = kept.iter().map(|&j| self.sequences[j].clone()).collect();
        let counts = self
            .counts
            .iter()
            .map(|row| kept.iter().map(|&j| row[j]).collect())
            .collect();
        let column_of = sequences
            .iter()
            .enumerate()
            .map(|(j, s)| (s.clone(), j))
            .collect();

        SequenceTable {
            samples: self.samples.clone(),
            sequences,
            counts,
            column_of,
        }
    }
}

fn validate_sequence(column: usize, seq: &str) -> Result<(), Error> {
    if seq.is_empty() {
        return Err(Error::validation(
            format!("variant column {}", column + 1),
            "empty variant sequence",
        ));
    }
    if let Some(bad) = seq.chars().find(|c| !matches!(c, 'A' | 'C' | 'G' | 'T')) {
        return Err(Error::validation(
            format!("variant '{seq}'"),
            format!("non-ACGT character '{bad}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn small_table() -> SequenceTable {
        SequenceTable::new(
            names(&["S1", "S2"]),
            names(&["AAAA", "CCCC", "GGGG"]),
            vec![vec![10, 0, 3], vec![5, 7, 0]],
        )
        .unwrap()
    }

    #[test]
    fn test_totals() {
        let t = small_table();
        assert_eq!(t.n_samples(), 2);
        assert_eq!(t.n_variants(), 3);
        assert_eq!(t.abundances(), vec![15, 7, 3]);
        assert_eq!(t.abundance(1), 7);
        assert_eq!(t.total_reads(), 25);
        assert_eq!(t.sample_total(0), 13);
        assert_eq!(t.sample_total(1), 12);
    }

    #[test]
    fn test_variant_view() {
        let t = small_table();
        let v = t.variant(0);
        assert_eq!(v.sequence, "AAAA");
        assert_eq!(v.counts, vec![10, 5]);
        assert_eq!(v.abundance, 15);
        assert_eq!(t.variants().count(), 3);
    }

    #[test]
    fn test_column_index() {
        let t = small_table();
        assert_eq!(t.column_index("CCCC"), Some(1));
        assert_eq!(t.column_index("TTTT"), None);
    }

    #[test]
    fn test_select_columns() {
        let t = small_table();
        let f = t.select_columns(|j| j != 1);
        assert_eq!(f.sequences(), &names(&["AAAA", "GGGG"])[..]);
        assert_eq!(f.sample_counts(0), &[10, 3]);
        assert_eq!(f.sample_counts(1), &[5, 0]);
        assert_eq!(f.column_index("GGGG"), Some(1));
        assert_eq!(f.samples(), t.samples());
        // input untouched
        assert_eq!(t.n_variants(), 3);
    }

    #[test]
    fn test_reject_negative_count() {
        let err = SequenceTable::new(
            names(&["S1"]),
            names(&["ACGT"]),
            vec![vec![-2]],
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("S1"));
        assert!(msg.contains("ACGT"));
        assert!(msg.contains("negative"));
    }

    #[test]
    fn test_reject_duplicate_sequence() {
        let err = SequenceTable::new(
            names(&["S1"]),
            names(&["ACGT", "ACGT"]),
            vec![vec![1, 2]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("duplicate variant"));
    }

    #[test]
    fn test_reject_empty_sequence() {
        let err = SequenceTable::new(names(&["S1"]), names(&[""]), vec![vec![1]]).unwrap_err();
        assert!(err.to_string().contains("empty variant"));
    }

    #[test]
    fn test_reject_non_acgt() {
        let err =
            SequenceTable::new(names(&["S1"]), names(&["ACNT"]), vec![vec![1]]).unwrap_err();
        assert!(err.to_string().contains("'N'"));
    }

    #[test]
    fn test_reject_no_samples() {
        let err = SequenceTable::new(vec![], names(&["ACGT"]), vec![]).unwrap_err();
        assert!(err.to_string().contains("at least one sample"));
    }

    #[test]
    fn test_reject_duplicate_sample() {
        let err = SequenceTable::new(
            names(&["S1", "S1"]),
            names(&["ACGT"]),
            vec![vec![1], vec![2]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate sample"));
    }

    #[test]
    fn test_reject_ragged_row() {
        let err = SequenceTable::new(
            names(&["S1", "S2"]),
            names(&["ACGT", "TTTT"]),
            vec![vec![1, 2], vec![3]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("S2"));
    }

    #[test]
    fn test_zero_variants_allowed() {
        let t = SequenceTable::new(names(&["S1"]), vec![], vec![vec![]]).unwrap();
        assert_eq!(t.n_variants(), 0);
        assert_eq!(t.total_reads(), 0);
    }
}
