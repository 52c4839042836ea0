//! # Contact Simulator Interface
//!
//! The engine never simulates a grasp itself. It asks a [`ContactSimulator`] for the contacts a
//! hypothesis produces on the object and scores whatever comes back. A simulator may fail to
//! find a feasible contact configuration; such failures are typed so they can be logged, and the
//! engine scores the affected hypothesis as the worst possible grasp.
//!
//! Two implementations ship with the library:
//!
//! - [`replay::ReplaySimulator`] - returns contacts recorded by an external simulator
//! - [`cuboid::CuboidSimulator`] - an analytic multi-finger hand closing on a box

pub mod cuboid;
pub mod replay;

use crate::core::models::contact::{Contact, ObjectPose};
use crate::core::models::hypothesis::{GraspHypothesis, HypothesisId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationFailure {
    #[error("Initial configuration interpenetrates the object: {0}")]
    Interpenetration(String),
    #[error("Grasp configuration is unreachable: {0}")]
    Unreachable(String),
    #[error("Simulator reported a failure: {0}")]
    Reported(String),
    #[error("No recorded contacts for hypothesis {0}")]
    MissingRecord(HypothesisId),
}

/// Produces the contact set of a grasp hypothesis applied to an object at a given pose.
///
/// Implementations must be usable from several threads at once so that evaluation of a batch
/// can be spread over a worker pool.
pub trait ContactSimulator: Send + Sync {
    fn evaluate_contact(
        &self,
        hypothesis: &GraspHypothesis,
        object_pose: &ObjectPose,
    ) -> Result<Vec<Contact>, SimulationFailure>;
}

impl<S: ContactSimulator + ?Sized> ContactSimulator for &S {
    fn evaluate_contact(
        &self,
        hypothesis: &GraspHypothesis,
        object_pose: &ObjectPose,
    ) -> Result<Vec<Contact>, SimulationFailure> {
        (**self).evaluate_contact(hypothesis, object_pose)
    }
}

impl<S: ContactSimulator + ?Sized> ContactSimulator for Box<S> {
    fn evaluate_contact(
        &self,
        hypothesis: &GraspHypothesis,
        object_pose: &ObjectPose,
    ) -> Result<Vec<Contact>, SimulationFailure> {
        (**self).evaluate_contact(hypothesis, object_pose)
    }
}
