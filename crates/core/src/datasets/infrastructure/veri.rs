use std::path::Path;

use regex::Regex;

use crate::datasets::domain::image_dataset::ImageDataset;
use crate::shared::sample::{format_statistics, Sample};

use super::scan::{into_samples, relabel_train, scan_flat_dir};
use super::DatasetError;

/// VeRi-776 vehicle re-identification dataset.
///
/// Layout under `<root>/veri/`: `image_train/`, `image_query/`,
/// `image_test/`. Camera ids go up to 20, so the capture group takes
/// multiple digits.
#[derive(Debug)]
pub struct Veri {
    dataset_dir: String,
    train: Vec<Sample>,
    query: Vec<Sample>,
    gallery: Vec<Sample>,
}

impl Veri {
    pub const DIR_NAME: &'static str = "veri";

    pub fn new(root: &Path) -> Result<Self, DatasetError> {
        let dataset_dir = root.join(Self::DIR_NAME);
        let train_dir = dataset_dir.join("image_train");
        let query_dir = dataset_dir.join("image_query");
        let gallery_dir = dataset_dir.join("image_test");
        for dir in [&dataset_dir, &train_dir, &query_dir, &gallery_dir] {
            if !dir.is_dir() {
                return Err(DatasetError::MissingDirectory(dir.clone()));
            }
        }

        let pattern = Regex::new(r"^([-\d]+)_c(\d+)").expect("literal pattern compiles");
        let train = relabel_train(scan_flat_dir(&train_dir, &pattern, true)?);
        let query = into_samples(scan_flat_dir(&query_dir, &pattern, true)?);
        let gallery = into_samples(scan_flat_dir(&gallery_dir, &pattern, true)?);

        log::info!(
            "=> VeRi loaded\n{}",
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

impl ImageDataset for Veri {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn make_layout(root: &Path) {
        let dataset = root.join(Veri::DIR_NAME);
        for sub in ["image_train", "image_query", "image_test"] {
            fs::create_dir_all(dataset.join(sub)).unwrap();
        }
    }

    fn touch(root: &Path, sub: &str, name: &str) {
        File::create(root.join(Veri::DIR_NAME).join(sub).join(name)).unwrap();
    }

    #[test]
    fn test_missing_root_fails_fast() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            Veri::new(root.path()).unwrap_err(),
            DatasetError::MissingDirectory(_)
        ));
    }

    #[test]
    fn test_two_digit_camera_ids_parse() {
        let root = tempfile::tempdir().unwrap();
        make_layout(root.path());
        touch(root.path(), "image_query", "0776_c014_00075990_0.jpg");

        let ds = Veri::new(root.path()).unwrap();
        assert_eq!(ds.query()[0].person_id, 776);
        assert_eq!(ds.query()[0].camera_id, 13);
    }

    #[test]
    fn test_train_relabeled_densely() {
        let root = tempfile::tempdir().unwrap();
        make_layout(root.path());
        touch(root.path(), "image_train", "0100_c001_00016450_0.jpg");
        touch(root.path(), "image_train", "0500_c002_00016460_0.jpg");
        touch(root.path(), "image_train", "0100_c003_00016470_0.jpg");

        let ds = Veri::new(root.path()).unwrap();
        let pids: Vec<u32> = ds.train().iter().map(|s| s.person_id).collect();
        assert_eq!(pids, vec![0, 0, 1]);
    }
}
