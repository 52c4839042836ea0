use super::{ContactSimulator, SimulationFailure};
use crate::core::models::contact::{Contact, ObjectPose};
use crate::core::models::hypothesis::{GraspHypothesis, HypothesisId};
use std::collections::HashMap;

/// The outcome an external simulator produced for one hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub enum Recording {
    Contacts(Vec<Contact>),
    Failure(String),
}

/// Replays contact sets recorded by an external simulator, keyed by hypothesis id.
///
/// The object pose and the hypothesis values are ignored; perturbed copies of a hypothesis keep
/// its id and therefore replay the nominal contacts.
#[derive(Debug, Clone, Default)]
pub struct ReplaySimulator {
    recordings: HashMap<HypothesisId, Recording>,
}

impl ReplaySimulator {
    pub fn new(recordings: HashMap<HypothesisId, Recording>) -> Self {
        Self { recordings }
    }

    pub fn record(&mut self, id: HypothesisId, recording: Recording) {
        self.recordings.insert(id, recording);
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }
}

impl ContactSimulator for ReplaySimulator {
    fn evaluate_contact(
        &self,
        hypothesis: &GraspHypothesis,
        _object_pose: &ObjectPose,
    ) -> Result<Vec<Contact>, SimulationFailure> {
        match self.recordings.get(&hypothesis.id) {
            Some(Recording::Contacts(contacts)) => Ok(contacts.clone()),
            Some(Recording::Failure(message)) => Err(SimulationFailure::Reported(message.clone())),
            None => Err(SimulationFailure::MissingRecord(hypothesis.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hypothesis(id: usize) -> GraspHypothesis {
        GraspHypothesis::new(HypothesisId(id), vec![0.0; 9])
    }

    #[test]
    fn replays_recorded_contacts_and_failures() {
        let contact = Contact::from_row([0.0, 0.1, 0.0, 0.0, 1.0, 0.0]);
        let mut simulator = ReplaySimulator::default();
        simulator.record(HypothesisId(0), Recording::Contacts(vec![contact]));
        simulator.record(
            HypothesisId(1),
            Recording::Failure("hand collides at start".to_string()),
        );
        let pose = ObjectPose::identity();

        assert_eq!(
            simulator.evaluate_contact(&hypothesis(0), &pose),
            Ok(vec![contact])
        );
        assert_eq!(
            simulator.evaluate_contact(&hypothesis(1), &pose),
            Err(SimulationFailure::Reported(
                "hand collides at start".to_string()
            ))
        );
        assert_eq!(simulator.len(), 2);
    }

    #[test]
    fn unknown_hypothesis_is_a_missing_record() {
        let simulator = ReplaySimulator::default();
        let result = simulator.evaluate_contact(&hypothesis(9), &ObjectPose::identity());
        assert_eq!(result, Err(SimulationFailure::MissingRecord(HypothesisId(9))));
    }
}
