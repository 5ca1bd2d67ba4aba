/// Apply bimera verdicts to a sequence table
use log::debug;

use crate::bimera::VerdictMap;
use crate::stats::{RemovalStats, SampleTrack};
use crate::table::SequenceTable;

/// Drop every column flagged as bimeric.
///
/// Pure: the input table is untouched and the result depends only on the
/// table and the verdicts. Variants missing from `verdicts` are kept.
pub fn remove_bimeras(
    table: &SequenceTable,
    verdicts: &VerdictMap,
) -> (SequenceTable, RemovalStats) {
    let flagged: Vec<bool> = table
        .sequences()
        .iter()
        .map(|seq| verdicts.is_bimera(seq))
        .collect();

    let filtered = table.select_columns(|j| !flagged[j]);

    let abundances = table.abundances();
    let removed_reads = flagged
        .iter()
        .zip(&abundances)
        .filter(|&(&f, _)| f)
        .map(|(_, &a)| a)
        .sum::<u64>();

    let samples = table
        .samples()
        .iter()
        .enumerate()
        .map(|(i, name)| SampleTrack {
            sample: name.clone(),
            input: table.sample_total(i),
            nonchim: filtered.sample_total(i),
        })
        .collect();

    let stats = RemovalStats {
        input_variants: table.n_variants(),
        removed_variants: flagged.iter().filter(|&&f| f).count(),
        input_reads: table.total_reads(),
        removed_reads,
        samples,
    };
    debug!(
        "Removed {} of {} variant columns",
        stats.removed_variants, stats.input_variants
    );

    (filtered, stats)
}
