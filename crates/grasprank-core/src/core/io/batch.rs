use crate::core::models::contact::{Contact, ObjectPose};
use crate::core::models::hypothesis::{GraspHypothesis, HypothesisId};
use crate::core::models::layout::{Field, FieldRange, HypothesisLayout, LayoutError};
use crate::core::simulator::replay::{Recording, ReplaySimulator};
use nalgebra::{Isometry3, Vector3};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BatchLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid hypothesis layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("Hypothesis id {0} appears more than once in the batch")]
    DuplicateId(HypothesisId),
    #[error("Hypothesis {0} has more than one recorded simulator outcome")]
    ConflictingRecording(HypothesisId),
    #[error("Contact file '{path}' references unknown hypothesis {id}")]
    UnknownHypothesis { path: String, id: HypothesisId },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct BatchFile {
    contacts_csv: Option<PathBuf>,
    object: ObjectSection,
    layout: LayoutSection,
    #[serde(rename = "hypothesis", default)]
    hypotheses: Vec<HypothesisEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ObjectSection {
    position: [f64; 3],
    /// Scaled rotation axis in radians.
    #[serde(default)]
    rotation: Option<[f64; 3]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct LayoutSection {
    standard_preshape_dofs: Option<usize>,
    width: Option<usize>,
    position: Option<[usize; 2]>,
    direction: Option<[usize; 2]>,
    roll: Option<[usize; 2]>,
    standoff: Option<[usize; 2]>,
    preshape: Option<[usize; 2]>,
    performance: Option<[usize; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct HypothesisEntry {
    id: Option<usize>,
    values: Vec<f64>,
    contacts: Option<Vec<[f64; 6]>>,
    failure: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    hypothesis: usize,
    px: f64,
    py: f64,
    pz: f64,
    dx: f64,
    dy: f64,
    dz: f64,
}

impl ContactRecord {
    fn into_contact(self) -> Contact {
        Contact::from_row([self.px, self.py, self.pz, self.dx, self.dy, self.dz])
    }
}

/// A batch of grasp hypotheses together with everything needed to score it offline.
#[derive(Debug, Clone)]
pub struct GraspBatch {
    pub object_pose: ObjectPose,
    pub layout: HypothesisLayout,
    pub hypotheses: Vec<GraspHypothesis>,
    pub recordings: HashMap<HypothesisId, Recording>,
}

impl GraspBatch {
    /// Loads a batch file. A `contacts-csv` entry is resolved relative to the batch file.
    pub fn load(path: &Path) -> Result<Self, BatchLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| BatchLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy(), path.parent())
    }

    pub fn from_toml_str(content: &str, base_dir: Option<&Path>) -> Result<Self, BatchLoadError> {
        Self::parse(content, "<string>", base_dir)
    }

    pub fn replay_simulator(&self) -> ReplaySimulator {
        ReplaySimulator::new(self.recordings.clone())
    }

    fn parse(content: &str, origin: &str, base_dir: Option<&Path>) -> Result<Self, BatchLoadError> {
        let file: BatchFile = toml::from_str(content).map_err(|e| BatchLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let layout = file.layout.into_layout()?;
        let object_pose = file.object.into_pose();

        let mut hypotheses = Vec::with_capacity(file.hypotheses.len());
        let mut recordings = HashMap::new();
        let mut seen = HashSet::new();

        for (index, entry) in file.hypotheses.into_iter().enumerate() {
            let id = HypothesisId(entry.id.unwrap_or(index));
            if !seen.insert(id) {
                return Err(BatchLoadError::DuplicateId(id));
            }
            layout.check_width(id, &entry.values)?;

            match (entry.contacts, entry.failure) {
                (Some(_), Some(_)) => return Err(BatchLoadError::ConflictingRecording(id)),
                (Some(rows), None) => {
                    let contacts = rows.into_iter().map(Contact::from_row).collect();
                    recordings.insert(id, Recording::Contacts(contacts));
                }
                (None, Some(message)) => {
                    recordings.insert(id, Recording::Failure(message));
                }
                (None, None) => {}
            }
            hypotheses.push(GraspHypothesis::new(id, entry.values));
        }

        if let Some(csv_path) = file.contacts_csv {
            let csv_path = match base_dir {
                Some(dir) if csv_path.is_relative() => dir.join(csv_path),
                _ => csv_path,
            };
            let from_csv = load_contacts_csv(&csv_path)?;
            for (id, contacts) in from_csv {
                if !seen.contains(&id) {
                    return Err(BatchLoadError::UnknownHypothesis {
                        path: csv_path.to_string_lossy().to_string(),
                        id,
                    });
                }
                if recordings.contains_key(&id) {
                    return Err(BatchLoadError::ConflictingRecording(id));
                }
                recordings.insert(id, Recording::Contacts(contacts));
            }
        }

        debug!(
            hypotheses = hypotheses.len(),
            recordings = recordings.len(),
            "Loaded grasp batch from {}",
            origin
        );

        Ok(Self {
            object_pose,
            layout,
            hypotheses,
            recordings,
        })
    }
}

impl ObjectSection {
    fn into_pose(self) -> ObjectPose {
        let translation = Vector3::from(self.position);
        let rotation = Vector3::from(self.rotation.unwrap_or([0.0; 3]));
        Isometry3::new(translation, rotation)
    }
}

impl LayoutSection {
    fn into_layout(self) -> Result<HypothesisLayout, LayoutError> {
        if let Some(dofs) = self.standard_preshape_dofs {
            return Ok(HypothesisLayout::standard(dofs));
        }

        let width = self.width.ok_or(LayoutError::MissingWidth)?;
        let mut builder = HypothesisLayout::builder(width);
        let fields = [
            (Field::Position, self.position),
            (Field::Direction, self.direction),
            (Field::Roll, self.roll),
            (Field::Standoff, self.standoff),
            (Field::Preshape, self.preshape),
            (Field::Performance, self.performance),
        ];
        for (field, range) in fields {
            if let Some([start, end]) = range {
                builder = builder.field(field, FieldRange::new(start, end));
            }
        }
        builder.build()
    }
}

fn load_contacts_csv(path: &Path) -> Result<HashMap<HypothesisId, Vec<Contact>>, BatchLoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| BatchLoadError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let mut contacts: HashMap<HypothesisId, Vec<Contact>> = HashMap::new();
    for result in reader.deserialize::<ContactRecord>() {
        let record = result.map_err(|e| BatchLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        contacts
            .entry(HypothesisId(record.hypothesis))
            .or_default()
            .push(record.into_contact());
    }
    Ok(contacts)
}
