use super::augmentor::Augmentor;
use super::config::AugmentorConfig;
use super::geometry::GeometricTransform;
use anyhow::{Context, Result};
use rand::RngCore;

/// An ordered list of augmentors that acts as a single augmentor.
///
/// Each member samples against the size produced by the members before it,
/// and the sampled parameters come back as one
/// [`GeometricTransform::Sequence`], so coordinates can be replayed through
/// the whole list with the exact draws used for the image.
///
/// # Example
/// ```ignore
/// let augs = AugmentorList::new()
///     .with(ResizeShortestEdge::new(256, Interpolation::Linear)?)
///     .with(Flip::horizontal(0.5)?);
/// let image = augs.augment_with_coords(image, &mut keypoints, &mut rng)?;
/// ```
#[derive(Debug, Default)]
pub struct AugmentorList {
    augmentors: Vec<Box<dyn Augmentor>>,
}

impl AugmentorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an augmentor and returns the list.
    /// Enables chaining: `AugmentorList::new().with(a).with(b)`.
    pub fn with(mut self, augmentor: impl Augmentor + 'static) -> Self {
        self.push(Box::new(augmentor));
        self
    }

    pub fn push(&mut self, augmentor: Box<dyn Augmentor>) {
        self.augmentors.push(augmentor);
    }

    pub fn len(&self) -> usize {
        self.augmentors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.augmentors.is_empty()
    }

    /// Builds and validates every config, in order.
    pub fn from_configs(configs: &[AugmentorConfig]) -> Result<Self> {
        let augmentors = configs
            .iter()
            .enumerate()
            .map(|(i, config)| {
                config
                    .build()
                    .with_context(|| format!("Invalid augmentor config at index {}", i))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { augmentors })
    }

    /// Parses a JSON array of augmentor configs.
    ///
    /// ```text
    /// [
    ///   {"type": "resize_shortest_edge", "size": 256},
    ///   {"type": "flip", "horiz": true, "prob": 0.5}
    /// ]
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let configs: Vec<AugmentorConfig> =
            serde_json::from_str(json).context("Failed to parse augmentor configs")?;
        Self::from_configs(&configs)
    }
}

impl Augmentor for AugmentorList {
    fn sample_for_size(
        &self,
        height: u32,
        width: u32,
        rng: &mut dyn RngCore,
    ) -> GeometricTransform {
        let mut size = (height, width);
        let steps = self
            .augmentors
            .iter()
            .map(|aug| {
                let step = aug.sample_for_size(size.0, size.1, rng);
                size = step.output_size(size.0, size.1);
                step
            })
            .collect();
        GeometricTransform::Sequence(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::vision::{Flip, Interpolation, Resize, ResizeTransform, Transpose};
    use image::{DynamicImage, GenericImageView, GrayImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_list_is_noop() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let list = AugmentorList::new();
        let img = DynamicImage::ImageLuma8(GrayImage::new(3, 2));
        let mut coords = vec![[1.0, 2.0]];
        let out = list.augment_with_coords(img, &mut coords, &mut rng)?;

        assert!(list.is_empty());
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(coords, vec![[1.0, 2.0]]);
        Ok(())
    }

    #[test]
    fn test_members_sample_against_intermediate_size() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let list = AugmentorList::new()
            .with(Transpose::new(1.0)?)
            .with(Flip::horizontal(1.0)?)
            .with(Resize::new(10, 20, Interpolation::Nearest)?);

        let params = list.sample_for_size(4, 6, &mut rng);
        let GeometricTransform::Sequence(steps) = &params else {
            panic!("expected a sequence, got {:?}", params);
        };
        assert_eq!(list.len(), 3);
        assert_eq!(steps[0], GeometricTransform::Transpose);
        assert!(matches!(
            steps[1],
            GeometricTransform::Flip {
                height: 6,
                width: 4,
                ..
            }
        ));
        assert_eq!(
            steps[2],
            GeometricTransform::Resize(ResizeTransform::new(6, 4, 10, 20, Interpolation::Nearest))
        );

        // (1, 3) -> transpose (3, 1) -> flip in 4 wide (1, 1) -> resize x5, y/6*10
        let mut coords = vec![[1.0, 3.0]];
        list.apply_coords(&mut coords, &params);
        let [x, y] = coords[0];
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 10.0 / 6.0).abs() < 1e-9);
        Ok(())
    }
}
