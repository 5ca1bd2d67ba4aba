/// Bimera removal statistics tracking and reporting
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Error;

/// Fraction of input reads removed as chimeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemovalFraction {
    /// The input table held no reads
    Undefined,
    Defined(f64),
}

impl std::fmt::Display for RemovalFraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "NA"),
            Self::Defined(x) => write!(f, "{:.2}%", 100.0 * x),
        }
    }
}

/// Reads entering and surviving bimera removal in one sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTrack {
    pub sample: String,
    pub input: u64,
    pub nonchim: u64,
}

/// Aggregate outcome of removing bimeric columns from a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalStats {
    /// Variants in the input table
    pub input_variants: usize,
    /// Variants flagged and removed
    pub removed_variants: usize,
    /// Reads in the input table
    pub input_reads: u64,
    /// Reads belonging to removed variants
    pub removed_reads: u64,
    /// Per-sample read tracking
    pub samples: Vec<SampleTrack>,
}

impl RemovalStats {
    pub fn retained_reads(&self) -> u64 {
        self.input_reads - self.removed_reads
    }

    pub fn retained_variants(&self) -> usize {
        self.input_variants - self.removed_variants
    }

    /// `removed_reads / input_reads`, or `Undefined` for an empty table.
    pub fn fraction_removed(&self) -> RemovalFraction {
        if self.input_reads == 0 {
            RemovalFraction::Undefined
        } else {
            RemovalFraction::Defined(self.removed_reads as f64 / self.input_reads as f64)
        }
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        info!("=== Bimera Removal Summary ===");
        info!("Number of input variants: {}", self.input_variants);
        info!(
            "Bimeric variants removed: {} ({} retained)",
            self.removed_variants,
            self.retained_variants()
        );
        info!("Number of input reads: {}", self.input_reads);
        info!(
            "Reads removed as bimeric: {} ({})",
            self.removed_reads,
            self.fraction_removed()
        );
        info!("Reads retained: {}", self.retained_reads());
    }

    /// Write the per-sample track table (sample, input, nonchim)
    pub fn write_track(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(|e| Error::io(e, path))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "sample\tinput\tnonchim").map_err(|e| Error::io(e, path))?;
        for track in &self.samples {
            writeln!(
                writer,
                "{}\t{}\t{}",
                track.sample, track.input, track.nonchim
            )
            .map_err(|e| Error::io(e, path))?;
        }
        writer.flush().map_err(|e| Error::io(e, path))
    }
}
