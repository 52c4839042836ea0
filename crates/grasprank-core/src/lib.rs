//! # GraspRank Core Library
//!
//! Scores candidate robotic grasps of a rigid object by the quality of the wrench space their
//! contacts span, and ranks a batch of candidates so that a planner can pick the best one.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`GraspHypothesis`, `HypothesisLayout`,
//!   `Contact`), the wrench builder and SVD-based quality metrics, the `ContactSimulator`
//!   boundary, and batch file I/O.
//!
//! - **[`engine`]: The Logic Core.** Per-hypothesis evaluation with failure isolation,
//!   population normalization, weighted scoring, stable ranking and perturbation sampling.
//!
//! - **[`workflows`]: The Public API.** Complete ranking procedures (`rank`, `robust`) that tie
//!   the `engine` and `core` together behind a single call.

pub mod core;
pub mod engine;
pub mod workflows;
