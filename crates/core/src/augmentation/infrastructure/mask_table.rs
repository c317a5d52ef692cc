use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaskTableError {
    #[error("failed to read mask file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode mask file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_pickle::Error,
    },
    #[error("mask for '{name}' is ragged: row {row} has {got} columns, expected {expected}")]
    Ragged {
        name: String,
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// Foreground masks keyed by base image filename.
///
/// The serialized form is a pickled `filename -> 2D boolean array` mapping
/// (the format the mask-extraction tooling emits), e.g.
///
/// ```text
/// {
///     "4627_c8_f0118398.jpg": [[true, true, ...], ...],
///     "0580_c1_f0154127.jpg": [[true, true, ...], ...],
/// }
/// ```
///
/// Loaded eagerly and fully into memory; read-only afterward, so shared
/// access from multiple readers is safe.
#[derive(Debug)]
pub struct MaskTable {
    masks: HashMap<String, Array2<bool>>,
}

impl MaskTable {
    pub fn load(path: &Path) -> Result<Self, MaskTableError> {
        let file = File::open(path).map_err(|source| MaskTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: HashMap<String, Vec<Vec<bool>>> =
            serde_pickle::from_reader(BufReader::new(file), serde_pickle::DeOptions::new())
                .map_err(|source| MaskTableError::Decode {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut masks = HashMap::with_capacity(raw.len());
        for (name, rows) in raw {
            masks.insert(name.clone(), rows_to_mask(&name, rows)?);
        }
        Ok(Self { masks })
    }

    /// Build a table from already-materialized masks (tests, tooling).
    pub fn from_masks(masks: HashMap<String, Array2<bool>>) -> Self {
        Self { masks }
    }

    pub fn get(&self, image_name: &str) -> Option<&Array2<bool>> {
        self.masks.get(image_name)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

fn rows_to_mask(name: &str, rows: Vec<Vec<bool>>) -> Result<Array2<bool>, MaskTableError> {
    let height = rows.len();
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut flat = Vec::with_capacity(height * width);
    for (row_index, row) in rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(MaskTableError::Ragged {
                name: name.to_string(),
                row: row_index,
                got: row.len(),
                expected: width,
            });
        }
        flat.extend(row);
    }
    Ok(Array2::from_shape_vec((height, width), flat)
        .expect("rectangular rows produce a valid shape"))
}
