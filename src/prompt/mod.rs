mod analysis;
mod clustering;
mod common;
mod report;

pub use analysis::analysis_prompt;
pub use clustering::clustering_prompt;
pub use common::*;
pub use report::report_prompt;
