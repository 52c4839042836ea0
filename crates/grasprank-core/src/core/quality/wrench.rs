use crate::core::models::contact::Contact;
use nalgebra::{Matrix6xX, Point3, Vector6};

/// A 6×N matrix with one unit wrench `[force; torque]` per contact.
pub type WrenchMatrix = Matrix6xX<f64>;

/// Unit wrench applied by a single contact about `reference`.
///
/// The force is the inward contact direction; the torque is `r × f` with `r` measured from the
/// reference point.
pub fn contact_wrench(reference: &Point3<f64>, contact: &Contact) -> Vector6<f64> {
    let force = -contact.direction;
    let lever = contact.position - reference;
    let torque = lever.cross(&force);
    Vector6::new(force.x, force.y, force.z, torque.x, torque.y, torque.z)
}

/// Builds the grasp wrench matrix for `contacts` about `reference`.
///
/// An empty contact list yields a 6×0 matrix.
pub fn build_wrench_matrix(reference: &Point3<f64>, contacts: &[Contact]) -> WrenchMatrix {
    let mut wrenches = WrenchMatrix::zeros(contacts.len());
    for (i, contact) in contacts.iter().enumerate() {
        wrenches.set_column(i, &contact_wrench(reference, contact));
    }
    wrenches
}
