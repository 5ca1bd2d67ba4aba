/// Tab-separated sequence table reader and writer
///
/// Layout:
/// ```text
/// sample  ACGT...  ACGA...
/// S1      120      4
/// S2      88       0
/// ```
/// The first header field is a free label; the remaining header fields are
/// the variant sequences. Files ending in `.gz`/`.gzip` are decompressed.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;
use crate::table::SequenceTable;

/// Read and validate a sequence table from disk.
pub fn read_table(path: &Path) -> Result<SequenceTable, Error> {
    let path_str = path.to_string_lossy();
    let is_gzipped = path_str.ends_with(".gz") || path_str.ends_with(".gzip");

    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let reader: Box<dyn BufRead> = if is_gzipped {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    parse_table(reader, &path.display().to_string())
}

/// Parse a table from any buffered reader. `source` is only used in messages.
pub fn parse_table<R: BufRead>(reader: R, source: &str) -> Result<SequenceTable, Error> {
    let mut sequences: Option<Vec<String>> = None;
    let mut samples = Vec::new();
    let mut counts = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result
            .map_err(|e| Error::TableFormat(format!("{source}:{}: {e}", line_num + 1)))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        // split always yields at least one field
        let first = fields.next().unwrap_or_default();

        match sequences {
            None => {
                sequences = Some(fields.map(str::to_string).collect());
            }
            Some(ref seqs) => {
                let mut row = Vec::with_capacity(seqs.len());
                for (j, field) in fields.enumerate() {
                    let value = field.trim().parse::<i64>().map_err(|_| {
                        Error::TableFormat(format!(
                            "{source}:{}: count '{field}' in column {} is not an integer",
                            line_num + 1,
                            j + 2
                        ))
                    })?;
                    row.push(value);
                }
                if row.len() != seqs.len() {
                    return Err(Error::TableFormat(format!(
                        "{source}:{}: sample '{first}' has {} counts, header has {} variants",
                        line_num + 1,
                        row.len(),
                        seqs.len()
                    )));
                }
                samples.push(first.to_string());
                counts.push(row);
            }
        }
    }

    let sequences =
        sequences.ok_or_else(|| Error::TableFormat(format!("{source}: missing header line")))?;

    SequenceTable::new(samples, sequences, counts)
}

/// Write a table in the same layout `read_table` accepts.
pub fn write_table(path: &Path, table: &SequenceTable) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut writer = BufWriter::new(file);
    write_table_to(&mut writer, table).map_err(|e| Error::io(e, path))?;
    writer.flush().map_err(|e| Error::io(e, path))
}

fn write_table_to<W: Write>(writer: &mut W, table: &SequenceTable) -> std::io::Result<()> {
    write!(writer, "sample")?;
    for seq in table.sequences() {
        write!(writer, "\t{seq}")?;
    }
    writeln!(writer)?;

    for (i, sample) in table.samples().iter().enumerate() {
        write!(writer, "{sample}")?;
        for c in table.sample_counts(i) {
            write!(writer, "\t{c}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
