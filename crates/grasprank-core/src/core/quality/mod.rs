//! # Grasp Quality Module
//!
//! This module turns the contact geometry of a grasp into scalar quality values.
//!
//! ## Overview
//!
//! Each contact contributes one unit wrench (force and torque about the object's reference
//! point). The wrench matrix collects these as columns, and its singular values describe how
//! well the grasp resists disturbances in each direction of the six-dimensional wrench space.
//!
//! ## Key Components
//!
//! - [`wrench`] - Construction of the 6×N wrench matrix from a contact list
//! - [`metrics`] - Minimum singular value, wrench-ellipsoid volume and isotropy
//! - [`score`] - The raw (unnormalized) score tuple consumed by the ranking engine
//!
//! ## Usage
//!
//! ```ignore
//! use grasprank::core::quality::{metrics::evaluate_wrench, wrench::build_wrench_matrix};
//!
//! let w = build_wrench_matrix(&object_pose.translation.vector.into(), &contacts);
//! let raw = evaluate_wrench(&w)?.raw_score();
//! ```

pub mod metrics;
pub mod score;
pub mod wrench;
