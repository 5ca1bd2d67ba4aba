use std::path::PathBuf;

use clap::Parser;

// ---------------------------------------------------------------------------
// Run mode enum
// ---------------------------------------------------------------------------

/// `--runMode` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Detect, filter and write the chimera-free table.
    RemoveBimeraDenovo,
    /// Detect only; write per-variant verdicts.
    IsBimeraDenovo,
}

impl std::str::FromStr for RunMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "removeBimeraDenovo" => Ok(Self::RemoveBimeraDenovo),
            "isBimeraDenovo" => Ok(Self::IsBimeraDenovo),
            _ => Err(format!(
                "unknown runMode '{s}'; expected 'removeBimeraDenovo' or 'isBimeraDenovo'"
            )),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoveBimeraDenovo => write!(f, "removeBimeraDenovo"),
            Self::IsBimeraDenovo => write!(f, "isBimeraDenovo"),
        }
    }
}

// ---------------------------------------------------------------------------
// Consensus method
// ---------------------------------------------------------------------------

/// How verdicts are reached across samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsensusMethod {
    /// One search over column totals.
    Pooled,
    /// Search every sample independently, then vote.
    #[default]
    Consensus,
    /// Search every sample independently; bimeric only if flagged everywhere present.
    PerSample,
}

impl std::str::FromStr for ConsensusMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pooled" => Ok(Self::Pooled),
            "consensus" => Ok(Self::Consensus),
            "per-sample" => Ok(Self::PerSample),
            _ => Err(format!(
                "unknown consensusMethod '{s}'; expected 'pooled', 'consensus' or 'per-sample'"
            )),
        }
    }
}

impl std::fmt::Display for ConsensusMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pooled => write!(f, "pooled"),
            Self::Consensus => write!(f, "consensus"),
            Self::PerSample => write!(f, "per-sample"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// ruBimera command-line parameters, using STAR-style `--camelCase` names.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ruBimera",
    about = "De-novo bimera removal for amplicon sequence variant tables",
    version
)]
pub struct Parameters {
    // ── Run ─────────────────────────────────────────────────────────────
    /// Run mode: removeBimeraDenovo or isBimeraDenovo
    #[arg(long = "runMode", default_value = "removeBimeraDenovo")]
    pub run_mode: RunMode,

    /// Number of threads
    #[arg(long = "runThreadN", default_value_t = 1)]
    pub run_thread_n: usize,

    // ── Input / output ──────────────────────────────────────────────────
    /// Sequence table (TSV, samples as rows, variants as columns; .gz accepted)
    #[arg(long = "seqTableIn")]
    pub seq_table_in: Option<PathBuf>,

    /// Output file name prefix (including path)
    #[arg(long = "outFileNamePrefix", default_value = "./")]
    pub out_file_name_prefix: PathBuf,

    // ── Bimera detection ────────────────────────────────────────────────
    /// Verdict method: pooled, consensus or per-sample
    #[arg(long = "consensusMethod", default_value = "consensus")]
    pub consensus_method: ConsensusMethod,

    /// Parents must be at least this many times more abundant than the child
    #[arg(long = "minFoldParentOverAbundance", default_value_t = 2.0, allow_hyphen_values = true)]
    pub min_fold_parent_over_abundance: f64,

    /// Parents must have at least this absolute abundance; 0 = no limit
    #[arg(long = "minParentAbundance", default_value_t = 0)]
    pub min_parent_abundance: u64,

    /// Children below this abundance are not tested
    #[arg(long = "minAbundanceToTest", default_value_t = 1)]
    pub min_abundance_to_test: u64,

    /// Each parent must contribute at least this many bases
    #[arg(long = "minOverlapBases", default_value_t = 1)]
    pub min_overlap_bases: usize,

    /// Fraction of samples that must flag a variant (consensus method)
    #[arg(long = "minSampleFraction", default_value_t = 0.9)]
    pub min_sample_fraction: f64,

    /// Non-flagging samples tolerated by the consensus vote
    #[arg(long = "ignoreNNegatives", default_value_t = 1)]
    pub ignore_n_negatives: u32,
}

impl Parameters {
    /// Output file path: `--outFileNamePrefix` followed directly by `name`.
    pub fn output_path(&self, name: &str) -> PathBuf {
        let mut path = self.out_file_name_prefix.clone().into_os_string();
        path.push(name);
        PathBuf::from(path)
    }

    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.seq_table_in.is_none() {
            return Err(crate::error::Error::Parameter(
                "--seqTableIn is required".into(),
            ));
        }

        // Thread count must be at least 1
        if self.run_thread_n == 0 {
            return Err(crate::error::Error::Parameter(
                "--runThreadN must be >= 1".into(),
            ));
        }

        if self.min_overlap_bases == 0 {
            return Err(crate::error::Error::Parameter(
                "--minOverlapBases must be >= 1".into(),
            ));
        }

        if !self.min_fold_parent_over_abundance.is_finite()
            || self.min_fold_parent_over_abundance < 0.0
        {
            return Err(crate::error::Error::Parameter(format!(
                "--minFoldParentOverAbundance must be a finite non-negative number, got {}",
                self.min_fold_parent_over_abundance
            )));
        }

        if !(0.0..=1.0).contains(&self.min_sample_fraction) {
            return Err(crate::error::Error::Parameter(format!(
                "--minSampleFraction must be within [0, 1], got {}",
                self.min_sample_fraction
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
