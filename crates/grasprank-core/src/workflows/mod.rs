//! # Workflows Module
//!
//! This module provides the top-level entry points that take a batch of grasp hypotheses from
//! validation to a ranked result.
//!
//! ## Overview
//!
//! Each workflow validates the batch against its layout, drives the engine passes, reports
//! progress, and returns a [`RankingResult`](crate::engine::ranking::RankingResult) that covers
//! every input hypothesis.
//!
//! ## Architecture
//!
//! - **Ranking Workflow** ([`rank`]) - Nominal scoring normalized across the batch
//! - **Robust Workflow** ([`robust`]) - Scoring averaged over perturbed neighbours of each hypothesis

pub mod rank;
pub mod robust;
