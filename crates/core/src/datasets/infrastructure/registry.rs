use std::path::Path;

use crate::datasets::domain::composite_dataset::CompositeDataset;
use crate::datasets::domain::image_dataset::ImageDataset;

use super::dukemtmc::DukeMtmc;
use super::lpw::Lpw;
use super::market1501::Market1501;
use super::veri::Veri;
use super::DatasetError;

/// Closed enumeration of the supported datasets.
///
/// Resolution fails fast on unknown names, before any loader touches the
/// filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetKind {
    Market1501,
    DukeMtmc,
    Veri,
    Lpw,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Market1501,
        DatasetKind::DukeMtmc,
        DatasetKind::Veri,
        DatasetKind::Lpw,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Market1501 => "market1501",
            DatasetKind::DukeMtmc => "dukemtmc",
            DatasetKind::Veri => "veri",
            DatasetKind::Lpw => "lpw",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }

    pub fn resolve(name: &str) -> Result<Self, DatasetError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DatasetError::UnknownName {
                name: name.to_string(),
                known: Self::names().join(", "),
            })
    }

    pub fn load(&self, root: &Path) -> Result<Box<dyn ImageDataset>, DatasetError> {
        Ok(match self {
            DatasetKind::Market1501 => Box::new(Market1501::new(root)?),
            DatasetKind::DukeMtmc => Box::new(DukeMtmc::new(root)?),
            DatasetKind::Veri => Box::new(Veri::new(root)?),
            DatasetKind::Lpw => Box::new(Lpw::new(root)?),
        })
    }
}

/// Resolve every name, load every dataset, and merge them.
///
/// All names are resolved before any dataset is constructed, so a typo at
/// the end of the list cannot leave a half-loaded composite behind.
pub fn load_composite<S: AsRef<str>>(
    names: &[S],
    root: &Path,
) -> Result<CompositeDataset, DatasetError> {
    let kinds = names
        .iter()
        .map(|name| DatasetKind::resolve(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut datasets = Vec::with_capacity(kinds.len());
    for kind in kinds {
        datasets.push(kind.load(root)?);
    }
    Ok(CompositeDataset::build(&datasets))
}
