#![allow(non_snake_case)]

pub mod error;
pub mod params;

pub mod bimera;
pub mod filter;
pub mod stats;
pub mod table;

use std::path::Path;

use log::info;

use crate::bimera::{BimeraDetector, BimeraOptions, VerdictMap, VerdictWriter};
use crate::error::Error;
use crate::params::{Parameters, RunMode};
use crate::table::SequenceTable;

pub const NOCHIM_TABLE_FILE: &str = "seqtab.nochim.tsv";
pub const VERDICTS_FILE: &str = "bimera.verdicts.tsv";
pub const TRACK_FILE: &str = "track.tsv";

/// Top-level dispatcher. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("ruBimera v{}", env!("CARGO_PKG_VERSION"));
    info!("runMode: {}", params.run_mode);
    info!("runThreadN: {}", params.run_thread_n);

    let table_path = params
        .seq_table_in
        .as_deref()
        .ok_or_else(|| Error::Parameter("--seqTableIn is required".into()))?;
    info!("seqTableIn: {}", table_path.display());

    let table = table::io::read_table(table_path)?;
    info!(
        "Loaded {} samples x {} variants ({} reads)",
        table.n_samples(),
        table.n_variants(),
        table.total_reads()
    );

    prepare_output_dir(&params.output_path(VERDICTS_FILE))?;

    let options = BimeraOptions::from_params(params);
    let verdicts = BimeraDetector::new(&options).detect(&table)?;
    write_verdicts(params, &table, &verdicts)?;

    match params.run_mode {
        RunMode::RemoveBimeraDenovo => remove_bimera_denovo(params, &table, &verdicts),
        RunMode::IsBimeraDenovo => {
            info!("Bimera detection complete!");
            Ok(())
        }
    }
}

fn remove_bimera_denovo(
    params: &Parameters,
    table: &SequenceTable,
    verdicts: &VerdictMap,
) -> anyhow::Result<()> {
    let (filtered, stats) = filter::remove_bimeras(table, verdicts);

    let table_out = params.output_path(NOCHIM_TABLE_FILE);
    info!("Writing chimera-free table to {}", table_out.display());
    table::io::write_table(&table_out, &filtered)?;

    let track_out = params.output_path(TRACK_FILE);
    stats.write_track(&track_out)?;

    stats.print_summary();
    info!("Bimera removal complete!");
    Ok(())
}

fn write_verdicts(
    params: &Parameters,
    table: &SequenceTable,
    verdicts: &VerdictMap,
) -> Result<(), Error> {
    let path = params.output_path(VERDICTS_FILE);
    info!("Writing verdicts to {}", path.display());
    let mut writer = VerdictWriter::create(&path)?;
    writer.write_verdicts(table, verdicts)?;
    writer.flush()
}

/// Create the directory part of an output prefix if it does not exist yet.
fn prepare_output_dir(sample_output: &Path) -> Result<(), Error> {
    if let Some(dir) = sample_output.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(e, dir))?;
        }
    }
    Ok(())
}
