use nalgebra::{Isometry3, Point3, Vector3};

/// Pose of the grasped object; its translation is the reference point for contact torques.
pub type ObjectPose = Isometry3<f64>;

/// A single point contact reported by a contact simulator.
///
/// `direction` follows the simulator convention of pointing out of the object surface.
/// The wrench builder flips it to obtain the force a finger applies into the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub position: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Contact {
    pub fn new(position: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Builds a contact from a `[px, py, pz, dx, dy, dz]` row.
    pub fn from_row(row: [f64; 6]) -> Self {
        Self {
            position: Point3::new(row[0], row[1], row[2]),
            direction: Vector3::new(row[3], row[4], row[5]),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite()) && self.direction.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_row_splits_position_and_direction() {
        let contact = Contact::from_row([1.0, 2.0, 3.0, 0.0, 0.0, -1.0]);
        assert_eq!(contact.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(contact.direction, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn is_finite_detects_nan_components() {
        let good = Contact::from_row([0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let bad = Contact::from_row([0.0, f64::NAN, 0.0, 1.0, 0.0, 0.0]);
        assert!(good.is_finite());
        assert!(!bad.is_finite());
    }
}
