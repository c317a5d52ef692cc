use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::datasets::domain::image_dataset::ImageDataset;
use crate::shared::sample::{format_statistics, Sample};

use super::scan::sorted_image_files;
use super::DatasetError;

/// One entry in the scene/view directory grid: `(scene, view, camera id)`.
type ViewDir = (u32, u32, u32);

/// Labeled Pedestrian in the Wild.
///
/// Layout under `<root>/lpw/`: `scen<scene>/view<view>/<pid>/<frame>.jpg`.
/// Camera ids come from the grid below rather than filenames. Train pids
/// are relabeled densely over `(scene, pid)` keys in sorted order, since
/// identity numbering restarts per scene.
#[derive(Debug)]
pub struct Lpw {
    dataset_dir: String,
    train: Vec<Sample>,
    query: Vec<Sample>,
    gallery: Vec<Sample>,
}

const TRAIN_DIRS: &[ViewDir] = &[
    (1, 1, 0),
    (1, 2, 1),
    (1, 3, 2),
    (2, 1, 3),
    (2, 2, 4),
    (2, 3, 5),
    (2, 4, 6),
    (3, 1, 7),
    (3, 2, 8),
    (3, 3, 9),
    (3, 4, 10),
];
const QUERY_DIRS: &[ViewDir] = &[];
const GALLERY_DIRS: &[ViewDir] = &[];

struct ViewEntry {
    path: PathBuf,
    scene: u32,
    pid: u32,
    camid: u32,
}

impl Lpw {
    pub const DIR_NAME: &'static str = "lpw";

    pub fn new(root: &Path) -> Result<Self, DatasetError> {
        let dataset_dir = root.join(Self::DIR_NAME);
        if !dataset_dir.is_dir() {
            return Err(DatasetError::MissingDirectory(dataset_dir));
        }

        let frame_pattern = Regex::new(r"^\d+\.jpg$").expect("literal pattern compiles");
        let train = relabel_by_scene(scan_view_dirs(&dataset_dir, TRAIN_DIRS, &frame_pattern)?);
        let query = into_samples(scan_view_dirs(&dataset_dir, QUERY_DIRS, &frame_pattern)?);
        let gallery = into_samples(scan_view_dirs(&dataset_dir, GALLERY_DIRS, &frame_pattern)?);

        log::info!(
            "=> LPW loaded\n{}",
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

/// Walk every `(scene, view)` directory, descending into numeric
/// per-identity subdirectories. Non-numeric directory names are ignored;
/// files that are not plain `<frame>.jpg` are skipped with a warning.
fn scan_view_dirs(
    dataset_dir: &Path,
    dirs: &[ViewDir],
    frame_pattern: &Regex,
) -> Result<Vec<ViewEntry>, DatasetError> {
    let mut entries = Vec::new();
    for &(scene, view, camid) in dirs {
        let view_dir = dataset_dir.join(format!("scen{scene}")).join(format!("view{view}"));
        let read = std::fs::read_dir(&view_dir).map_err(|source| DatasetError::Scan {
            path: view_dir.clone(),
            source,
        })?;

        let mut pid_dirs: Vec<(u32, PathBuf)> = Vec::new();
        for entry in read {
            let entry = entry.map_err(|source| DatasetError::Scan {
                path: view_dir.clone(),
                source,
            })?;
            let path = entry.path();
            let pid = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.parse::<u32>().ok());
            if let (Some(pid), true) = (pid, path.is_dir()) {
                pid_dirs.push((pid, path));
            }
        }
        pid_dirs.sort();

        for (pid, pid_dir) in pid_dirs {
            for path in sorted_image_files(&pid_dir)? {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if !frame_pattern.is_match(name) {
                    log::warn!("{name} is not a valid file name, skipping");
                    continue;
                }
                entries.push(ViewEntry {
                    path,
                    scene,
                    pid,
                    camid,
                });
            }
        }
    }
    Ok(entries)
}

/// Dense labels over sorted `(scene, pid)` keys; identity numbering
/// restarts per scene, so the scene is part of the key.
fn relabel_by_scene(entries: Vec<ViewEntry>) -> Vec<Sample> {
    let keys: BTreeSet<(u32, u32)> = entries.iter().map(|e| (e.scene, e.pid)).collect();
    let key2label: HashMap<(u32, u32), u32> = keys
        .into_iter()
        .enumerate()
        .map(|(label, key)| (key, label as u32))
        .collect();
    entries
        .into_iter()
        .map(|e| Sample::new(e.path, key2label[&(e.scene, e.pid)], e.camid))
        .collect()
}

fn into_samples(entries: Vec<ViewEntry>) -> Vec<Sample> {
    entries
        .into_iter()
        .map(|e| Sample::new(e.path, e.pid, e.camid))
        .collect()
}

impl ImageDataset for Lpw {
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

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    fn lpw_root(root: &Path) -> PathBuf {
        root.join(Lpw::DIR_NAME)
    }

    fn make_empty_grid(root: &Path) {
        for &(scene, view, _) in TRAIN_DIRS {
            fs::create_dir_all(
                lpw_root(root)
                    .join(format!("scen{scene}"))
                    .join(format!("view{view}")),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_missing_root_fails_fast() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            Lpw::new(root.path()).unwrap_err(),
            DatasetError::MissingDirectory(_)
        ));
    }

    #[test]
    fn test_missing_view_dir_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(lpw_root(root.path())).unwrap();
        // Root exists but the scene/view grid does not.
        assert!(matches!(
            Lpw::new(root.path()).unwrap_err(),
            DatasetError::Scan { .. }
        ));
    }

    #[test]
    fn test_camera_ids_come_from_grid() {
        let root = tempfile::tempdir().unwrap();
        make_empty_grid(root.path());
        // scen2/view1 carries camera id 3 in the grid.
        touch(&lpw_root(root.path()).join("scen2/view1/17/000001.jpg"));

        let ds = Lpw::new(root.path()).unwrap();
        assert_eq!(ds.train().len(), 1);
        assert_eq!(ds.train()[0].camera_id, 3);
    }

    #[test]
    fn test_same_pid_across_scenes_splits() {
        let root = tempfile::tempdir().unwrap();
        make_empty_grid(root.path());
        touch(&lpw_root(root.path()).join("scen1/view1/5/000001.jpg"));
        touch(&lpw_root(root.path()).join("scen2/view1/5/000001.jpg"));

        let ds = Lpw::new(root.path()).unwrap();
        let pids: BTreeSet<u32> = ds.train().iter().map(|s| s.person_id).collect();
        assert_eq!(pids, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_same_pid_across_views_of_one_scene_agrees() {
        let root = tempfile::tempdir().unwrap();
        make_empty_grid(root.path());
        touch(&lpw_root(root.path()).join("scen3/view1/9/000001.jpg"));
        touch(&lpw_root(root.path()).join("scen3/view2/9/000004.jpg"));

        let ds = Lpw::new(root.path()).unwrap();
        assert_eq!(ds.train().len(), 2);
        assert_eq!(ds.train()[0].person_id, ds.train()[1].person_id);
        assert_ne!(ds.train()[0].camera_id, ds.train()[1].camera_id);
    }

    #[test]
    fn test_invalid_frame_names_skipped() {
        let root = tempfile::tempdir().unwrap();
        make_empty_grid(root.path());
        touch(&lpw_root(root.path()).join("scen1/view1/5/000001.jpg"));
        touch(&lpw_root(root.path()).join("scen1/view1/5/copy of frame.jpg"));

        let ds = Lpw::new(root.path()).unwrap();
        assert_eq!(ds.train().len(), 1);
    }

    #[test]
    fn test_non_numeric_identity_dirs_ignored() {
        let root = tempfile::tempdir().unwrap();
        make_empty_grid(root.path());
        touch(&lpw_root(root.path()).join("scen1/view1/notes/000001.jpg"));

        let ds = Lpw::new(root.path()).unwrap();
        assert!(ds.train().is_empty());
    }

    #[test]
    fn test_query_and_gallery_are_empty() {
        let root = tempfile::tempdir().unwrap();
        make_empty_grid(root.path());
        let ds = Lpw::new(root.path()).unwrap();
        assert!(ds.query().is_empty());
        assert!(ds.gallery().is_empty());
    }
}
