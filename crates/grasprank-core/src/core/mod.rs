//! # Core Module
//!
//! This module provides the stateless building blocks of grasp-quality evaluation.
//!
//! ## Overview
//!
//! The core module describes grasp candidates and their contact geometry, converts contacts
//! into wrench-space quality metrics, and defines the boundary to the contact simulator that
//! produces those contacts. Nothing here depends on a batch: every function is a pure
//! computation on a single hypothesis or contact list.
//!
//! ## Architecture
//!
//! - **Grasp Representation** ([`models`]) - Hypotheses, their field layout, contacts and poses
//! - **Quality Metrics** ([`quality`]) - Wrench matrix construction and SVD-based metrics
//! - **Simulator Boundary** ([`simulator`]) - The `ContactSimulator` capability and its failures
//! - **File I/O** ([`io`]) - Batch files with recorded contacts for offline scoring

pub mod io;
pub mod models;
pub mod quality;
pub mod simulator;
