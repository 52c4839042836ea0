use super::{ContactSimulator, SimulationFailure};
use crate::core::models::contact::{Contact, ObjectPose};
use crate::core::models::hypothesis::GraspHypothesis;
use crate::core::models::layout::HypothesisLayout;
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;

const MIN_DIRECTION_NORM: f64 = 1e-9;
const PARALLEL_EPSILON: f64 = 1e-10;

/// Geometry of an idealized multi-finger hand.
///
/// Fingers are spaced evenly around the approach axis, starting at the hypothesis roll angle.
/// Each finger carries `phalanges` contact pads stacked along the approach axis and closes
/// radially from `reach` toward the axis until a pad touches the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuboidHand {
    pub fingers: usize,
    pub phalanges: usize,
    pub reach: f64,
    pub phalanx_spacing: f64,
}

impl Default for CuboidHand {
    fn default() -> Self {
        Self {
            fingers: 3,
            phalanges: 2,
            reach: 0.15,
            phalanx_spacing: 0.02,
        }
    }
}

/// Analytic contact simulator for a box-shaped object.
///
/// The box is centred on the object pose with the given half extents in the object frame.
/// Contacts are reported in the world frame with outward face normals.
#[derive(Debug, Clone)]
pub struct CuboidSimulator {
    layout: HypothesisLayout,
    half_extents: Vector3<f64>,
    hand: CuboidHand,
}

impl CuboidSimulator {
    pub fn new(layout: HypothesisLayout, half_extents: Vector3<f64>, hand: CuboidHand) -> Self {
        Self {
            layout,
            half_extents,
            hand,
        }
    }

    fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|axis| point[axis].abs() < self.half_extents[axis])
    }

    /// Slab test returning the entry distance and the axis of the entered face.
    fn ray_entry(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<(f64, usize)> {
        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = max_distance;
        let mut enter_axis = None;

        for axis in 0..3 {
            let origin_i = origin[axis];
            let dir_i = direction[axis];
            let extent = self.half_extents[axis];

            if dir_i.abs() < PARALLEL_EPSILON {
                // Ray parallel to the slab: it either stays within it or never enters.
                if origin_i < -extent || origin_i > extent {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / dir_i;
            let t1 = (-extent - origin_i) * inv_dir;
            let t2 = (extent - origin_i) * inv_dir;
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            if near > t_enter {
                t_enter = near;
                enter_axis = Some(axis);
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }

        let axis = enter_axis?;
        (t_enter >= 0.0).then_some((t_enter, axis))
    }
}

fn perpendicular_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let e1 = axis.cross(&helper).normalize();
    let e2 = axis.cross(&e1);
    (e1, e2)
}

impl ContactSimulator for CuboidSimulator {
    fn evaluate_contact(
        &self,
        hypothesis: &GraspHypothesis,
        object_pose: &ObjectPose,
    ) -> Result<Vec<Contact>, SimulationFailure> {
        let approach = hypothesis.direction(&self.layout);
        let norm = approach.norm();
        if !norm.is_finite() || norm < MIN_DIRECTION_NORM {
            return Err(SimulationFailure::Unreachable(format!(
                "approach direction {:?} of hypothesis {} cannot be normalized",
                approach.as_slice(),
                hypothesis.id
            )));
        }

        let to_object = object_pose.inverse();
        let palm = to_object * hypothesis.position(&self.layout);
        if self.contains(&palm) {
            return Err(SimulationFailure::Interpenetration(format!(
                "palm of hypothesis {} starts inside the object",
                hypothesis.id
            )));
        }

        let axis = to_object * (approach / norm);
        let (e1, e2) = perpendicular_basis(&axis);
        let closing_center = palm + axis * hypothesis.standoff(&self.layout);
        let roll = hypothesis.roll(&self.layout);

        let mut contacts = Vec::with_capacity(self.hand.fingers * self.hand.phalanges);
        for finger in 0..self.hand.fingers {
            let angle = roll + TAU * finger as f64 / self.hand.fingers as f64;
            let outward = e1 * angle.cos() + e2 * angle.sin();
            let closing = -outward;

            for phalanx in 0..self.hand.phalanges {
                let pad_center = closing_center + axis * (phalanx as f64 * self.hand.phalanx_spacing);
                let origin = pad_center + outward * self.hand.reach;
                if self.contains(&origin) {
                    return Err(SimulationFailure::Interpenetration(format!(
                        "finger {} of hypothesis {} starts inside the object",
                        finger, hypothesis.id
                    )));
                }

                if let Some((t, face_axis)) = self.ray_entry(&origin, &closing, self.hand.reach) {
                    let point = origin + closing * t;
                    let mut normal = Vector3::zeros();
                    normal[face_axis] = -closing[face_axis].signum();
                    contacts.push(Contact::new(object_pose * point, object_pose * normal));
                }
            }
        }

        Ok(contacts)
    }
}
