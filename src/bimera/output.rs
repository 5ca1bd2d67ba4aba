// bimera.verdicts.tsv writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bimera::verdict::{Verdict, VerdictMap};
use crate::error::Error;
use crate::table::SequenceTable;

/// Writer for the per-variant verdict file
pub struct VerdictWriter<W: Write> {
    writer: W,
}

impl VerdictWriter<BufWriter<File>> {
    /// Create the verdict file at `path`
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path).map_err(|e| Error::io(e, path))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> VerdictWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one row per table column, in column order
    ///
    /// Format: header line plus 8 tab-separated columns
    /// 1. Variant sequence
    /// 2. Total abundance
    /// 3. Verdict (genuine/bimera)
    /// 4. Left parent sequence (- if genuine)
    /// 5. Right parent sequence (- if genuine)
    /// 6. Breakpoint, 0-based start of the right parent's part (- if genuine)
    /// 7. Samples that flagged the variant (- for pooled)
    /// 8. Samples where the variant is present (- for pooled)
    pub fn write_verdicts(
        &mut self,
        table: &SequenceTable,
        verdicts: &VerdictMap,
    ) -> Result<(), Error> {
        self.write_rows(table, verdicts)
            .map_err(|e| Error::io(e, "bimera.verdicts.tsv"))
    }

    fn write_rows(&mut self, table: &SequenceTable, verdicts: &VerdictMap) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "sequence\tabundance\tverdict\tleft\tright\tbreakpoint\tflagged\tpresent"
        )?;

        for variant in table.variants() {
            let seq = variant.sequence;
            let (label, left, right, breakpoint) = match verdicts.get(seq) {
                Some(Verdict::Bimera {
                    left,
                    right,
                    breakpoint,
                }) => ("bimera", left.as_str(), right.as_str(), breakpoint.to_string()),
                _ => ("genuine", "-", "-", "-".to_string()),
            };
            let (flagged, present) = match verdicts.tally(seq) {
                Some(t) => (t.flagged.to_string(), t.present.to_string()),
                None => ("-".to_string(), "-".to_string()),
            };

            writeln!(
                self.writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                seq, variant.abundance, label, left, right, breakpoint, flagged, present
            )?;
        }
        Ok(())
    }

    /// Flush buffered data
    pub fn flush(&mut self) -> Result<(), Error> {
        self.writer
            .flush()
            .map_err(|e| Error::io(e, "bimera.verdicts.tsv"))
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
