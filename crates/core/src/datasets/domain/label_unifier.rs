use std::collections::HashMap;

use crate::shared::sample::Sample;

/// Handle for an interned source identity within one unification pass.
///
/// Obtained from [`LabelUnifier::source`]; only meaningful for the unifier
/// that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

/// Maps `(source, raw id)` unification keys to dense labels.
///
/// Labels are assigned on first encounter, so the output range is exactly
/// `[0, len)` in insertion order. Insertion order is the contract: callers
/// feed samples in dataset order and the first occurrence of a key fixes
/// its label.
#[derive(Default)]
struct LabelAssigner {
    labels: HashMap<(usize, u32), u32>,
}

impl LabelAssigner {
    fn assign(&mut self, source: SourceId, raw_id: u32) -> u32 {
        let next = self.labels.len() as u32;
        *self.labels.entry((source.0, raw_id)).or_insert(next)
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Rewrites dataset-local person/camera ids into one dense, collision-free
/// label space.
///
/// One unifier represents one label space: the composite build uses one
/// instance for the pooled train lists and a second, independent instance
/// for the pooled query+gallery lists, so the two partitions never share
/// labels. Person and camera ids are unified independently of each other.
#[derive(Default)]
pub struct LabelUnifier {
    sources: Vec<String>,
    persons: LabelAssigner,
    cameras: LabelAssigner,
}

impl LabelUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a source identity, returning the same handle for repeated
    /// identities.
    pub fn source(&mut self, identity: &str) -> SourceId {
        if let Some(index) = self.sources.iter().position(|s| s == identity) {
            return SourceId(index);
        }
        self.sources.push(identity.to_string());
        SourceId(self.sources.len() - 1)
    }

    /// Replace a sample's raw ids with their dense labels, assigning fresh
    /// labels on first encounter. The image path passes through untouched.
    pub fn relabel(&mut self, source: SourceId, sample: &Sample) -> Sample {
        Sample {
            image_path: sample.image_path.clone(),
            person_id: self.persons.assign(source, sample.person_id),
            camera_id: self.cameras.assign(source, sample.camera_id),
        }
    }

    pub fn num_person_labels(&self) -> usize {
        self.persons.len()
    }

    pub fn num_camera_labels(&self) -> usize {
        self.cameras.len()
    }
}
