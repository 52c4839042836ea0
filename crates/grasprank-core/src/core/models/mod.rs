//! # Core Models Module
//!
//! This module contains the data structures used to describe grasp candidates and the contact
//! geometry a grasp produces on the target object.
//!
//! ## Key Components
//!
//! - [`hypothesis`] - Grasp hypotheses as opaque, fixed-width configuration vectors
//! - [`layout`] - The field map that gives names to index ranges of a hypothesis vector
//! - [`contact`] - Contact points and directions reported by a contact simulator
//!
//! ## Usage
//!
//! ```ignore
//! use grasprank::core::models::{hypothesis::*, layout::HypothesisLayout};
//!
//! let layout = HypothesisLayout::standard(0);
//! let grasp = GraspHypothesis::new(HypothesisId(0), vec![0.0; layout.width()]);
//! let approach = grasp.direction(&layout);
//! ```

pub mod contact;
pub mod hypothesis;
pub mod layout;
