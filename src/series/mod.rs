//! Series Assembler
//!
//! Builds one summed Flux query per populated group combination, runs
//! them as a single multi-yield script and folds the returned records
//! back into series by yield name, labelled with their combination.
//! Series come back in the order their groups first appear in the
//! response.

mod accumulator;
mod assembler;

pub use accumulator::SeriesAccumulator;
pub use assembler::{assemble, group_pipeline, group_script, yield_name, GROUP_COLUMN, UNIT_TAG};

pub(crate) use assembler::{collect_series, decode_point};
