use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::augmentation::domain::sample_transform::SampleTransform;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::sample::Sample;

/// Configuration for a batch augmentation run.
pub struct PipelineConfig {
    /// Called after each written sample with `(current, total)`; returning
    /// `false` aborts the run.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
    /// Seed for the transform's random generator; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            seed: None,
        }
    }
}

/// Abstracts how the read → transform → write batch is executed.
///
/// This is a port (application-layer interface). Infrastructure provides
/// concrete implementations (e.g. threaded, single-threaded). Output files
/// are keyed by each sample's base filename under `output_dir`.
pub trait PipelineExecutor: Send {
    fn execute(
        &self,
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        transform: Box<dyn SampleTransform>,
        samples: &[Sample],
        output_dir: &Path,
        config: PipelineConfig,
    ) -> Result<usize, Box<dyn std::error::Error>>;
}
