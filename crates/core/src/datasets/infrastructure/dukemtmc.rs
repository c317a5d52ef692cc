use std::path::Path;

use regex::Regex;

use crate::datasets::domain::image_dataset::ImageDataset;
use crate::shared::sample::{format_statistics, Sample};

use super::scan::{into_samples, relabel_train, scan_flat_dir};
use super::DatasetError;

/// DukeMTMC-reID dataset.
///
/// Same flat layout family as Market-1501 (`bounding_box_train/`,
/// `query/`, `bounding_box_test/`) but without distractor files, so no
/// junk-pid filtering is applied.
#[derive(Debug)]
pub struct DukeMtmc {
    dataset_dir: String,
    train: Vec<Sample>,
    query: Vec<Sample>,
    gallery: Vec<Sample>,
}

impl DukeMtmc {
    pub const DIR_NAME: &'static str = "dukemtmc-reid";

    pub fn new(root: &Path) -> Result<Self, DatasetError> {
        let dataset_dir = root.join(Self::DIR_NAME);
        let train_dir = dataset_dir.join("bounding_box_train");
        let query_dir = dataset_dir.join("query");
        let gallery_dir = dataset_dir.join("bounding_box_test");
        for dir in [&dataset_dir, &train_dir, &query_dir, &gallery_dir] {
            if !dir.is_dir() {
                return Err(DatasetError::MissingDirectory(dir.clone()));
            }
        }

        let pattern = Regex::new(r"^([-\d]+)_c(\d)").expect("literal pattern compiles");
        let train = relabel_train(scan_flat_dir(&train_dir, &pattern, false)?);
        let query = into_samples(scan_flat_dir(&query_dir, &pattern, false)?);
        let gallery = into_samples(scan_flat_dir(&gallery_dir, &pattern, false)?);

        log::info!(
            "=> DukeMTMC-reID loaded\n{}",
            format_statistics(&train, &query, &gallery)
        );
        Ok(Self {
            dataset_dir: dataset_dir.to_string_lossy().into_owned(),
            train,
            query,
            gallery,
        })
    }
}

impl ImageDataset for DukeMtmc {
    fn source_identity(&self) -> &str {
        &self.dataset_dir
    }

    fn train(&self) -> &[Sample] {
        &self.train
    }

    fn query(&self) -> &[Sample] {
        &self.query
    }

    fn gallery(&self) -> &[Sample] {
        &self.gallery
    }
}
