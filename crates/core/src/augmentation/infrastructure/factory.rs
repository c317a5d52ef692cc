use std::path::PathBuf;

use crate::augmentation::infrastructure::background_replace::RandomBackgroundReplace;
use crate::augmentation::infrastructure::mask_table::{MaskTable, MaskTableError};
use crate::shared::constants::DEFAULT_REPLACE_PROBABILITY;

/// Configuration surface for the background-replacement augmentation.
///
/// An empty or absent mask path disables the augmentation entirely.
#[derive(Clone, Debug)]
pub struct BackgroundReplaceConfig {
    pub masks_path: Option<PathBuf>,
    pub probability: f64,
}

impl Default for BackgroundReplaceConfig {
    fn default() -> Self {
        Self {
            masks_path: None,
            probability: DEFAULT_REPLACE_PROBABILITY,
        }
    }
}

/// Build the transform from configuration, loading the mask table eagerly.
///
/// Returns `Ok(None)` when no mask path is configured.
pub fn build_background_replace(
    config: &BackgroundReplaceConfig,
) -> Result<Option<RandomBackgroundReplace>, MaskTableError> {
    let Some(path) = &config.masks_path else {
        return Ok(None);
    };
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    let masks = MaskTable::load(path)?;
    log::info!("Loaded {} foreground masks from {}", masks.len(), path.display());
    Ok(Some(RandomBackgroundReplace::new(masks, config.probability)))
}
