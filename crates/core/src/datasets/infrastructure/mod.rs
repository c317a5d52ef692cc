use std::path::PathBuf;

use thiserror::Error;

pub mod dukemtmc;
pub mod lpw;
pub mod market1501;
pub mod registry;
mod scan;
pub mod veri;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("unknown dataset '{name}' (known datasets: {known})")]
    UnknownName { name: String, known: String },
    #[error("'{0}' is not available")]
    MissingDirectory(PathBuf),
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
