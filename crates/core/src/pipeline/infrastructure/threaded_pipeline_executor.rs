use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::augmentation::domain::sample_transform::SampleTransform;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_executor::{PipelineConfig, PipelineExecutor};
use crate::shared::frame::Frame;
use crate::shared::sample::Sample;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Executes the augmentation batch with dedicated threads for I/O.
///
/// Layout: `reader → main [transform] → writer`
///
/// Decoding and encoding run concurrently with the transform so they
/// overlap. The transform and its random generator stay on the main
/// thread, keeping randomness single-threaded.
pub struct ThreadedPipelineExecutor {
    channel_capacity: usize,
}

impl ThreadedPipelineExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedPipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineExecutor for ThreadedPipelineExecutor {
    fn execute(
        &self,
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        transform: Box<dyn SampleTransform>,
        samples: &[Sample],
        output_dir: &Path,
        config: PipelineConfig,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let cap = self.channel_capacity;
        let total = samples.len();

        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<Result<(String, Frame), SendError>>(cap);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<(PathBuf, Frame)>(cap);

        let reader_handle = spawn_reader(
            reader,
            samples.to_vec(),
            frame_tx,
            config.cancelled.clone(),
        );
        let writer_handle = spawn_writer(writer, write_rx);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (processed, main_error) = run_main_loop(
            frame_rx,
            &write_tx,
            &*transform,
            &mut rng,
            output_dir,
            total,
            &config,
        );

        drop(write_tx);

        join_threads(reader_handle, writer_handle, main_error)?;
        Ok(processed)
    }
}

fn spawn_reader(
    reader: Box<dyn ImageReader>,
    samples: Vec<Sample>,
    frame_tx: crossbeam_channel::Sender<Result<(String, Frame), SendError>>,
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for sample in samples {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let result = match sample.image_name() {
                Some(name) => reader
                    .read(&sample.image_path)
                    .map(|frame| (name.to_string(), frame))
                    .map_err(|e| -> SendError { e.to_string().into() }),
                None => Err(format!(
                    "sample path {} has no usable file name",
                    sample.image_path.display()
                )
                .into()),
            };
            if frame_tx.send(result).is_err() {
                break;
            }
        }
    })
}

fn spawn_writer(
    writer: Box<dyn ImageWriter>,
    write_rx: crossbeam_channel::Receiver<(PathBuf, Frame)>,
) -> std::thread::JoinHandle<Result<(), SendError>> {
    std::thread::spawn(move || {
        for (path, frame) in write_rx {
            writer
                .write(&path, &frame)
                .map_err(|e| -> SendError { e.to_string().into() })?;
        }
        Ok(())
    })
}

/// Runs the main thread loop: receive decoded frames, transform, and send
/// to the writer.
fn run_main_loop(
    frame_rx: crossbeam_channel::Receiver<Result<(String, Frame), SendError>>,
    write_tx: &crossbeam_channel::Sender<(PathBuf, Frame)>,
    transform: &dyn SampleTransform,
    rng: &mut StdRng,
    output_dir: &Path,
    total: usize,
    config: &PipelineConfig,
) -> (usize, Option<Box<dyn std::error::Error>>) {
    let mut processed = 0usize;

    for frame_result in frame_rx {
        if config.cancelled.load(Ordering::Relaxed) {
            break;
        }

        let (name, frame) = match frame_result {
            Ok(pair) => pair,
            Err(e) => return (processed, Some(e.to_string().into())),
        };

        let transformed = match transform.apply(&frame, &name, rng) {
            Ok(frame) => frame,
            Err(e) => return (processed, Some(e)),
        };

        if write_tx.send((output_dir.join(&name), transformed)).is_err() {
            return (processed, Some("Writer channel closed unexpectedly".into()));
        }
        processed += 1;

        if let Some(ref callback) = config.on_progress {
            if !callback(processed, total) {
                return (processed, Some("Cancelled".into()));
            }
        }
    }

    (processed, None)
}

/// Joins both I/O threads and coalesces the first error encountered.
fn join_threads(
    reader_handle: std::thread::JoinHandle<()>,
    writer_handle: std::thread::JoinHandle<Result<(), SendError>>,
    mut first_error: Option<Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    fn set_if_none(slot: &mut Option<Box<dyn std::error::Error>>, err: Box<dyn std::error::Error>) {
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    if reader_handle.join().is_err() {
        set_if_none(&mut first_error, "Reader thread panicked".into());
    }

    match writer_handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => set_if_none(&mut first_error, e.to_string().into()),
        Err(_) => set_if_none(&mut first_error, "Writer thread panicked".into()),
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
