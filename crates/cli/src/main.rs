use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use reidprep_core::augmentation::infrastructure::factory::{
    build_background_replace, BackgroundReplaceConfig,
};
use reidprep_core::datasets::domain::image_dataset::ImageDataset;
use reidprep_core::datasets::infrastructure::registry::{load_composite, DatasetKind};
use reidprep_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use reidprep_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use reidprep_core::pipeline::augment_dataset_use_case::AugmentDatasetUseCase;
use reidprep_core::pipeline::infrastructure::threaded_pipeline_executor::ThreadedPipelineExecutor;
use reidprep_core::pipeline::pipeline_executor::PipelineConfig;
use reidprep_core::shared::sample::format_statistics;

/// Dataset preparation for person re-identification training.
#[derive(Parser)]
#[command(name = "reidprep")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load datasets, merge them into one label space, and print statistics.
    Info {
        /// Root directory containing the dataset folders.
        #[arg(long)]
        root: PathBuf,

        /// Datasets to merge (comma-separated).
        #[arg(long, value_delimiter = ',')]
        datasets: Vec<String>,
    },

    /// Write background-replaced copies of the merged train partition.
    Augment {
        /// Root directory containing the dataset folders.
        #[arg(long)]
        root: PathBuf,

        /// Datasets to merge (comma-separated).
        #[arg(long, value_delimiter = ',')]
        datasets: Vec<String>,

        /// Output directory for augmented images.
        #[arg(long)]
        output: PathBuf,

        /// Pickled filename -> boolean-mask table.
        #[arg(long)]
        masks: PathBuf,

        /// Probability of replacing a sample's background (0.0-1.0).
        #[arg(long, default_value = "0.5")]
        probability: f64,

        /// Seed for reproducible runs; unseeded runs draw from entropy.
        #[arg(long)]
        seed: Option<u64>,

        /// Only process the first N samples.
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Info { root, datasets } => {
            validate_common(&root, &datasets)?;
            run_info(&root, &datasets)
        }
        Command::Augment {
            root,
            datasets,
            output,
            masks,
            probability,
            seed,
            limit,
        } => {
            validate_common(&root, &datasets)?;
            if !(0.0..=1.0).contains(&probability) {
                return Err(format!(
                    "Probability must be between 0.0 and 1.0, got {probability}"
                )
                .into());
            }
            run_augment(&root, &datasets, &output, &masks, probability, seed, limit)
        }
    }
}

fn run_info(root: &Path, datasets: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let composite = load_composite(datasets, root)?;
    println!("Composite of {}:", datasets.join(", "));
    println!(
        "{}",
        format_statistics(composite.train(), composite.query(), composite.gallery())
    );
    Ok(())
}

fn run_augment(
    root: &Path,
    datasets: &[String],
    output: &Path,
    masks: &Path,
    probability: f64,
    seed: Option<u64>,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = BackgroundReplaceConfig {
        masks_path: Some(masks.to_path_buf()),
        probability,
    };
    let transform = build_background_replace(&config)?
        .ok_or("A mask table is required for augmentation")?;

    let composite = load_composite(datasets, root)?;
    let train = composite.train();
    let count = limit.unwrap_or(train.len()).min(train.len());
    let samples = &train[..count];

    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(|current, total| {
        eprint!("\rAugmenting sample {current}/{total}");
        true
    });

    let use_case = AugmentDatasetUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(transform),
        Box::new(ThreadedPipelineExecutor::new()),
    );
    let processed = use_case.execute(
        samples,
        output,
        PipelineConfig {
            on_progress: Some(progress),
            seed,
            ..Default::default()
        },
    )?;
    eprintln!();
    log::info!("Wrote {processed} images to {}", output.display());
    Ok(())
}

fn validate_common(root: &Path, datasets: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if !root.is_dir() {
        return Err(format!("Data root not found: {}", root.display()).into());
    }
    if datasets.is_empty() {
        return Err(format!(
            "At least one dataset is required (known datasets: {})",
            DatasetKind::names().join(", ")
        )
        .into());
    }
    Ok(())
}
