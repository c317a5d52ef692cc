use std::path::Path;

use crate::augmentation::domain::sample_transform::SampleTransform;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_executor::{PipelineConfig, PipelineExecutor};
use crate::shared::sample::Sample;

/// Batch augmentation pipeline: read → transform → write per sample.
///
/// Materializes a transformed copy of a partition (typically the merged
/// train list) under an output directory, keyed by base filename.
pub struct AugmentDatasetUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    transform: Box<dyn SampleTransform>,
    executor: Box<dyn PipelineExecutor>,
}

impl AugmentDatasetUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        transform: Box<dyn SampleTransform>,
        executor: Box<dyn PipelineExecutor>,
    ) -> Self {
        Self {
            reader,
            writer,
            transform,
            executor,
        }
    }

    /// Runs the batch, returning the number of samples written.
    pub fn execute(
        self,
        samples: &[Sample],
        output_dir: &Path,
        config: PipelineConfig,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let processed = self.executor.execute(
            self.reader,
            self.writer,
            self.transform,
            samples,
            output_dir,
            config,
        )?;
        log::info!(
            "Augmented {processed}/{} samples into {}",
            samples.len(),
            output_dir.display()
        );
        Ok(processed)
    }
}
