//! Hype Cycle phase determination.
//!
//! Given a collection of evidence records about one technology (papers,
//! patents, news, social posts), [`analyze`] derives quantitative metrics,
//! scores each of the five Hype Cycle phases against a weighted rule table,
//! selects the most likely phase and explains the choice.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod extract;
pub mod input;
pub mod rationale;
pub mod scoring;

pub use analysis::analyze;
pub use batch::{analyze_batch, AnalysisJob, BatchOutcome};
