use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::sample::Sample;

use super::DatasetError;

/// One parsed image file before any relabeling.
pub(crate) struct RawEntry {
    pub path: PathBuf,
    pub pid: i64,
    pub camid: u32,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List a directory's image files in sorted filename order.
///
/// Sorting makes scan output independent of the filesystem's directory
/// iteration order, which dense train relabeling depends on.
pub(crate) fn sorted_image_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DatasetError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Scan one flat directory of `<pid>_c<camid>…` image files.
///
/// Filenames that do not match `pattern` are skipped with a warning, the
/// only recovered condition in dataset loading. Camera ids are 1-based on
/// disk and returned 0-based. With `skip_junk`, distractor files with
/// `pid == -1` are dropped silently.
pub(crate) fn scan_flat_dir(
    dir: &Path,
    pattern: &Regex,
    skip_junk: bool,
) -> Result<Vec<RawEntry>, DatasetError> {
    let mut entries = Vec::new();
    for path in sorted_image_files(dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let parsed = pattern.captures(name).and_then(|caps| {
            let pid = caps.get(1)?.as_str().parse::<i64>().ok()?;
            let camid = caps.get(2)?.as_str().parse::<u32>().ok()?;
            Some((pid, camid))
        });
        let Some((pid, camid)) = parsed else {
            log::warn!("{name} is not a valid file name, skipping");
            continue;
        };
        if skip_junk && pid == -1 {
            continue;
        }
        entries.push(RawEntry {
            path,
            pid,
            camid: camid.saturating_sub(1),
        });
    }
    Ok(entries)
}

/// Convert raw entries without relabeling (query/gallery keep raw pids).
pub(crate) fn into_samples(entries: Vec<RawEntry>) -> Vec<Sample> {
    entries
        .into_iter()
        .map(|e| Sample::new(e.path, e.pid as u32, e.camid))
        .collect()
}

/// Relabel train pids to a dense `[0, n)` range in sorted raw-pid order.
pub(crate) fn relabel_train(entries: Vec<RawEntry>) -> Vec<Sample> {
    let pids: BTreeSet<i64> = entries.iter().map(|e| e.pid).collect();
    let pid2label: HashMap<i64, u32> = pids
        .into_iter()
        .enumerate()
        .map(|(label, pid)| (pid, label as u32))
        .collect();
    entries
        .into_iter()
        .map(|e| Sample::new(e.path, pid2label[&e.pid], e.camid))
        .collect()
}
