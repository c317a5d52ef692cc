use rand::RngCore;

use crate::shared::frame::Frame;

/// Domain interface for randomized per-sample image transforms.
///
/// The generator is passed in explicitly so callers control seeding and
/// sharing; implementations hold no random state of their own.
pub trait SampleTransform: Send {
    /// Produce the transformed frame. `image_name` is the sample's base
    /// filename, used to look up per-image auxiliary data such as masks.
    fn apply(
        &self,
        frame: &Frame,
        image_name: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}

/// Pass-through transform.
pub struct IdentityTransform;

impl SampleTransform for IdentityTransform {
    fn apply(
        &self,
        frame: &Frame,
        _image_name: &str,
        _rng: &mut dyn RngCore,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        Ok(frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_identity_returns_equal_frame() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 3);
        let mut rng = StdRng::seed_from_u64(0);
        let out = IdentityTransform
            .apply(&frame, "anything.jpg", &mut rng)
            .unwrap();
        assert_eq!(out, frame);
    }
}
