pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Kernel size for the alpha-softening blur applied before compositing.
pub const ALPHA_BLUR_KERNEL_SIZE: usize = 5;

pub const DEFAULT_REPLACE_PROBABILITY: f64 = 0.5;
