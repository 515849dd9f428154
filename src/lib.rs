// AdMatch - Matching and Selection Engine Library Entry Point

pub mod constants;
pub mod error;
pub mod submission;
pub mod pools;
pub mod dedup;
pub mod scoring;
pub mod selector;
pub mod matcher;
pub mod pipeline;

pub use error::{AdMatchError, Result};
pub use pipeline::{run, PipelineConfig};
pub use pools::MatchPools;
pub use submission::{MatchResolution, SubmissionRow};
