use super::geometry::{GeometricTransform, Point};
use crate::transforms::Transform;
use crate::worker::with_worker_rng;
use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use rand::RngCore;
use std::fmt;

/// A geometric augmentation: sample parameters for an image, then apply
/// them to the image and, optionally, to its coordinate annotations.
///
/// Sampling is split from application so the same parameters can be used
/// for pixels and labels. The RNG is always passed in; implementations keep
/// no random state of their own.
///
/// Only [`Augmentor::sample_for_size`] is required. Every augmentor in this
/// crate samples from the image size alone, which lets
/// [`AugmentorList`](super::AugmentorList) chain sampling without building
/// intermediate images.
///
/// # Example
/// ```ignore
/// let flip = Flip::horizontal(0.5)?;
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut boxes = vec![[10.0, 20.0], [30.0, 40.0]];
/// let image = flip.augment_with_coords(image, &mut boxes, &mut rng)?;
/// ```
pub trait Augmentor: Send + Sync + fmt::Debug {
    /// Samples parameters for an image of `height x width`.
    fn sample_for_size(&self, height: u32, width: u32, rng: &mut dyn RngCore)
        -> GeometricTransform;

    /// Samples parameters for `img`.
    fn sample_params(&self, img: &DynamicImage, rng: &mut dyn RngCore) -> GeometricTransform {
        let (width, height) = img.dimensions();
        self.sample_for_size(height, width, rng)
    }

    fn apply_image(&self, img: DynamicImage, params: &GeometricTransform) -> Result<DynamicImage> {
        params.apply_image(img)
    }

    fn apply_coords(&self, coords: &mut [Point], params: &GeometricTransform) {
        params.apply_coords(coords)
    }

    /// Samples and applies in one step.
    fn augment(&self, img: DynamicImage, rng: &mut dyn RngCore) -> Result<DynamicImage> {
        let params = self.sample_params(&img, rng);
        self.apply_image(img, &params)
    }

    /// Samples once and applies the same parameters to `img` and `coords`.
    fn augment_with_coords(
        &self,
        img: DynamicImage,
        coords: &mut [Point],
        rng: &mut dyn RngCore,
    ) -> Result<DynamicImage> {
        let params = self.sample_params(&img, rng);
        let img = self.apply_image(img, &params)?;
        self.apply_coords(coords, &params);
        Ok(img)
    }
}

impl<A: Augmentor + ?Sized> Augmentor for Box<A> {
    fn sample_for_size(
        &self,
        height: u32,
        width: u32,
        rng: &mut dyn RngCore,
    ) -> GeometricTransform {
        (**self).sample_for_size(height, width, rng)
    }

    fn apply_image(&self, img: DynamicImage, params: &GeometricTransform) -> Result<DynamicImage> {
        (**self).apply_image(img, params)
    }

    fn apply_coords(&self, coords: &mut [Point], params: &GeometricTransform) {
        (**self).apply_coords(coords, params)
    }
}

// ============================================================================
// Pipeline adaptors
// ============================================================================

/// An image travelling through the pipeline together with its annotations.
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub image: DynamicImage,
    pub coords: Vec<Point>,
}

impl AnnotatedImage {
    pub fn new(image: DynamicImage, coords: Vec<Point>) -> Self {
        Self { image, coords }
    }
}

impl From<DynamicImage> for AnnotatedImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image, Vec::new())
    }
}

/// Runs an [`Augmentor`] as a pipeline [`Transform`] on bare images.
///
/// Randomness comes from the worker RNG, so results are reproducible for a
/// given `(seed, epoch, worker)`.
///
/// # Example
/// ```ignore
/// init_worker_rng(worker_id, epoch, seed);
/// let pipeline = Augment::new(Flip::horizontal(0.5)?)
///     .then(Augment::new(Resize::square(224, Interpolation::Linear)?));
/// let image = pipeline.apply(image)?;
/// ```
#[derive(Debug)]
pub struct Augment<A> {
    augmentor: A,
}

impl<A: Augmentor> Augment<A> {
    pub fn new(augmentor: A) -> Self {
        Self { augmentor }
    }

    pub fn augmentor(&self) -> &A {
        &self.augmentor
    }
}

impl<A: Augmentor> Transform<DynamicImage, DynamicImage> for Augment<A> {
    fn apply(&self, img: DynamicImage) -> Result<DynamicImage> {
        with_worker_rng(|rng| self.augmentor.augment(img, rng))
    }
}

/// Runs an [`Augmentor`] as a pipeline [`Transform`] on [`AnnotatedImage`]s,
/// keeping image and coordinates in lockstep.
#[derive(Debug)]
pub struct AugmentAnnotated<A> {
    augmentor: A,
}

impl<A: Augmentor> AugmentAnnotated<A> {
    pub fn new(augmentor: A) -> Self {
        Self { augmentor }
    }

    pub fn augmentor(&self) -> &A {
        &self.augmentor
    }
}

impl<A: Augmentor> Transform<AnnotatedImage, AnnotatedImage> for AugmentAnnotated<A> {
    fn apply(&self, sample: AnnotatedImage) -> Result<AnnotatedImage> {
        let AnnotatedImage { image, mut coords } = sample;
        let image =
            with_worker_rng(|rng| self.augmentor.augment_with_coords(image, &mut coords, rng))?;
        Ok(AnnotatedImage { image, coords })
    }
}
