//! # Engine Module
//!
//! This module implements the batch scoring engine: it turns per-hypothesis wrench metrics into
//! a population-normalized, weighted ranking and estimates robustness by resampling.
//!
//! ## Overview
//!
//! Ranking a batch is a two-pass computation. The first pass evaluates every hypothesis through
//! the contact simulator and the quality metrics. Once the whole batch is known, the per-metric
//! ranges are fixed, each metric is normalized against them, and the weighted sum becomes the
//! candidate's performance. The robust path reuses the same scoring on randomly perturbed
//! copies of each hypothesis.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Metric weights, degenerate-range policy and perturbation settings
//! - **Evaluation** ([`evaluation`]) - Single-hypothesis simulation and metric computation
//! - **Normalization** ([`normalization`]) - Population ranges and linear normalization
//! - **Scoring** ([`scoring`]) - Weighted combination of normalized metrics
//! - **Ranking** ([`ranking`]) - Stable ordering of scored candidates
//! - **Perturbation** ([`perturbation`]) - Gaussian neighbours and averaged robustness scores
//! - **Progress Monitoring** ([`progress`]) - Progress events for user interfaces
//! - **Error Handling** ([`error`]) - Batch-level errors
//!
//! ## Key Capabilities
//!
//! - **Failure isolation**: a hypothesis the simulator rejects scores zero without aborting the batch
//! - **Parallel evaluation** of the first pass behind the `parallel` feature
//! - **Deterministic output**: stable ordering and explicitly seeded randomness

pub mod config;
pub mod error;
pub mod evaluation;
pub mod normalization;
pub mod perturbation;
pub mod progress;
pub mod ranking;
pub mod scoring;
pub(crate) mod tasks;
