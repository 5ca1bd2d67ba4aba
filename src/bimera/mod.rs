// De-novo bimera detection module
//
// A bimera is an amplification artifact that is exactly the prefix of one
// more-abundant variant joined to the suffix of another. Detection:
// - Candidate parents: more abundant by a fold ratio, same length
// - Breakpoint scan: exact left-prefix / right-suffix reconstruction
// - Verdicts: pooled over column totals, or per sample followed by a vote

mod consensus;
mod detect;
mod options;
mod output;
mod search;
mod verdict;

pub use consensus::vote;
pub use detect::BimeraDetector;
pub use options::BimeraOptions;
pub use output::VerdictWriter;
pub use search::{Reconstruction, SearchSpace, abundance_order};
pub use verdict::{SampleTally, Verdict, VerdictMap};
