use ndarray::Array2;
use rand::{Rng, RngCore};
use thiserror::Error;

use crate::augmentation::domain::sample_transform::SampleTransform;
use crate::augmentation::infrastructure::gaussian::{
    gaussian_kernel_1d, separable_gaussian_blur_plane,
};
use crate::augmentation::infrastructure::mask_table::MaskTable;
use crate::shared::constants::ALPHA_BLUR_KERNEL_SIZE;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("mask shape {mask_height}x{mask_width} does not match image shape {image_height}x{image_width}")]
    ShapeMismatch {
        mask_height: usize,
        mask_width: usize,
        image_height: usize,
        image_width: usize,
    },
}

/// Randomized background replacement driven by precomputed foreground masks.
///
/// With probability `probability`, the subject (mask = true) is kept and
/// everything else is swapped for a solid random color; the mask edge is
/// softened with a fixed 5x5 Gaussian on the alpha plane so the silhouette
/// does not cut hard. Samples without a mask entry pass through unchanged.
pub struct RandomBackgroundReplace {
    masks: MaskTable,
    probability: f64,
}

impl RandomBackgroundReplace {
    pub fn new(masks: MaskTable, probability: f64) -> Self {
        Self { masks, probability }
    }

    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    fn create_random_background(width: u32, height: u32, rng: &mut dyn RngCore) -> Frame {
        let color: [u8; 3] = [
            rng.gen_range(0u16..256) as u8,
            rng.gen_range(0u16..256) as u8,
            rng.gen_range(0u16..256) as u8,
        ];
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&color);
        }
        Frame::new(data, width, height, 3)
    }

    /// Composite `image` over `background` using the blurred mask as alpha.
    ///
    /// `out = image * alpha + background * (1 - alpha)` in normalized pixel
    /// space, truncated back to u8.
    fn replace_background(
        mask: &Array2<bool>,
        image: &Frame,
        background: &Frame,
    ) -> Result<Frame, AugmentError> {
        let height = image.height() as usize;
        let width = image.width() as usize;
        let (mask_height, mask_width) = mask.dim();
        if (mask_height, mask_width) != (height, width)
            || (background.height() as usize, background.width() as usize) != (height, width)
        {
            return Err(AugmentError::ShapeMismatch {
                mask_height,
                mask_width,
                image_height: height,
                image_width: width,
            });
        }
        debug_assert_eq!(image.channels(), 3);
        debug_assert_eq!(background.channels(), 3);

        let mut alpha: Vec<f32> = mask.iter().map(|&m| if m { 1.0 } else { 0.0 }).collect();
        let kernel = gaussian_kernel_1d(ALPHA_BLUR_KERNEL_SIZE);
        separable_gaussian_blur_plane(&mut alpha, width, height, &kernel);

        let fg = image.data();
        let bg = background.data();
        let mut out = vec![0u8; fg.len()];
        for (pixel, &a) in alpha.iter().enumerate() {
            for channel in 0..3 {
                let index = pixel * 3 + channel;
                let lit = fg[index] as f32 / 255.0;
                let back = bg[index] as f32 / 255.0;
                let value = (lit * a + back * (1.0 - a)) * 255.0;
                // Truncate, matching the mask-extraction tooling's uint8 cast.
                out[index] = value.clamp(0.0, 255.0) as u8;
            }
        }
        Ok(Frame::new(out, image.width(), image.height(), 3))
    }
}

impl SampleTransform for RandomBackgroundReplace {
    fn apply(
        &self,
        frame: &Frame,
        image_name: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if rng.gen::<f64>() > self.probability {
            return Ok(frame.clone());
        }
        let Some(mask) = self.masks.get(image_name) else {
            return Ok(frame.clone());
        };
        let background = Self::create_random_background(frame.width(), frame.height(), rng);
        Ok(Self::replace_background(mask, frame, &background)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn table_with(name: &str, mask: Array2<bool>) -> MaskTable {
        let mut masks = HashMap::new();
        masks.insert(name.to_string(), mask);
        MaskTable::from_masks(masks)
    }

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 7 % 256) as u8);
                data.push((y * 13 % 256) as u8);
                data.push(128);
            }
        }
        Frame::new(data, width, height, 3)
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let transform = RandomBackgroundReplace::new(
            table_with("a.jpg", Array2::from_elem((4, 4), false)),
            0.0,
        );
        let frame = gradient_frame(4, 4);
        let mut rng = StdRng::seed_from_u64(7);
        let out = transform.apply(&frame, "a.jpg", &mut rng).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_missing_mask_is_identity() {
        let transform = RandomBackgroundReplace::new(MaskTable::from_masks(HashMap::new()), 1.0);
        let frame = gradient_frame(4, 4);
        let mut rng = StdRng::seed_from_u64(7);
        let out = transform.apply(&frame, "unknown.jpg", &mut rng).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_all_true_mask_keeps_subject() {
        let transform = RandomBackgroundReplace::new(
            table_with("a.jpg", Array2::from_elem((8, 8), true)),
            1.0,
        );
        let frame = gradient_frame(8, 8);
        let mut rng = StdRng::seed_from_u64(7);
        let out = transform.apply(&frame, "a.jpg", &mut rng).unwrap();

        // Constant alpha=1 blurs to (numerically) 1, so every pixel stays
        // within quantization distance of the original.
        for (a, b) in out.data().iter().zip(frame.data()) {
            assert!((*a as i16 - *b as i16).abs() <= 1);
        }
    }

    #[test]
    fn test_all_false_mask_becomes_background() {
        let transform = RandomBackgroundReplace::new(
            table_with("a.jpg", Array2::from_elem((8, 8), false)),
            1.0,
        );
        let frame = gradient_frame(8, 8);
        let mut rng = StdRng::seed_from_u64(7);
        let out = transform.apply(&frame, "a.jpg", &mut rng).unwrap();

        // Solid background: every pixel carries the same color.
        let first = &out.data()[..3];
        for pixel in out.data().chunks(3) {
            for c in 0..3 {
                assert!((pixel[c] as i16 - first[c] as i16).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_half_mask_mixes_subject_and_background() {
        // Left half subject, right half background.
        let mask = Array2::from_shape_fn((8, 8), |(_, x)| x < 4);
        let transform = RandomBackgroundReplace::new(table_with("a.jpg", mask), 1.0);
        let frame = Frame::new(vec![200u8; 8 * 8 * 3], 8, 8, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let out = transform.apply(&frame, "a.jpg", &mut rng).unwrap();

        let arr = out.as_ndarray();
        // Far from the seam the blur has no reach (5x5 kernel, radius 2).
        assert!((arr[[4, 0, 0]] as i16 - 200).abs() <= 1);
        // The replaced half is one solid color on every row.
        for y in 0..8 {
            for c in 0..3 {
                assert!((arr[[y, 7, c]] as i16 - arr[[0, 7, c]] as i16).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_shape_mismatch_is_fatal() {
        let transform = RandomBackgroundReplace::new(
            table_with("a.jpg", Array2::from_elem((4, 4), true)),
            1.0,
        );
        let frame = gradient_frame(5, 5);
        let mut rng = StdRng::seed_from_u64(7);
        let err = transform.apply(&frame, "a.jpg", &mut rng).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_same_seed_reproduces_output() {
        let mask = Array2::from_shape_fn((6, 6), |(y, x)| (x + y) % 2 == 0);
        let frame = gradient_frame(6, 6);

        let transform = RandomBackgroundReplace::new(table_with("a.jpg", mask), 1.0);
        let first = transform
            .apply(&frame, "a.jpg", &mut StdRng::seed_from_u64(11))
            .unwrap();
        let second = transform
            .apply(&frame, "a.jpg", &mut StdRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(first, second);
    }
}
