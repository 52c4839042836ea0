//! Batch-level computational passes.
//!
//! Each task is a single sweep over the batch that the workflows compose. Tasks that map
//! independently over hypotheses run on the rayon pool when the `parallel` feature is enabled.

pub mod raw_scores;
