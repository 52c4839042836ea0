//! File input for offline grasp scoring.
//!
//! A batch file bundles the object pose, the hypothesis field layout, the hypotheses themselves
//! and, optionally, contact sets recorded by an external simulator (inline or in a CSV file),
//! so that a batch can be scored without a live simulator.

pub mod batch;
