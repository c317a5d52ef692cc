use std::path::Path;

use crate::shared::frame::Frame;

/// Domain interface for encoding an RGB frame to an image file.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
