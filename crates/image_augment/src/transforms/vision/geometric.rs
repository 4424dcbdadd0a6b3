use super::augmentor::Augmentor;
use super::geometry::{round_half_up, GeometricTransform, Interpolation, ResizeTransform};
use anyhow::{bail, ensure, Result};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

// ============================================================================
// Resize
// ============================================================================

/// Resizes every image to a fixed `height x width`.
///
/// # Interpolation
/// - `Nearest`: fastest
/// - `Linear`: good all-round default
/// - `Cubic`: sharper
/// - `Gaussian`: smoothing
/// - `Lanczos3`: highest quality, slowest
///
/// # Example
/// ```ignore
/// let resize = Resize::new(224, 320, Interpolation::Linear)?;
/// let resized = resize.augment(image, &mut rng)?; // 320 wide, 224 high
/// ```
#[derive(Debug, Clone)]
pub struct Resize {
    height: u32,
    width: u32,
    interp: Interpolation,
}

impl Resize {
    pub fn new(height: u32, width: u32, interp: Interpolation) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "Image dimensions must be positive after resizing (got {}x{})",
            height,
            width
        );
        Ok(Self {
            height,
            width,
            interp,
        })
    }

    /// Square target of `size x size`.
    pub fn square(size: u32, interp: Interpolation) -> Result<Self> {
        Self::new(size, size, interp)
    }

    /// Target `(height, width)`.
    pub fn shape(&self) -> (u32, u32) {
        (self.height, self.width)
    }
}

impl Augmentor for Resize {
    fn sample_for_size(&self, height: u32, width: u32, _: &mut dyn RngCore) -> GeometricTransform {
        ResizeTransform::new(height, width, self.height, self.width, self.interp).into()
    }
}

// ============================================================================
// ResizeShortestEdge
// ============================================================================

/// Scales the image so its shorter side is exactly `size`, keeping the
/// aspect ratio. The longer side is rounded half-up.
#[derive(Debug, Clone)]
pub struct ResizeShortestEdge {
    size: u32,
    interp: Interpolation,
}

impl ResizeShortestEdge {
    pub fn new(size: u32, interp: Interpolation) -> Result<Self> {
        ensure!(size > 0, "Shortest edge length must be positive (got {})", size);
        Ok(Self { size, interp })
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Augmentor for ResizeShortestEdge {
    fn sample_for_size(&self, height: u32, width: u32, _: &mut dyn RngCore) -> GeometricTransform {
        let scale = self.size as f64 / height.min(width) as f64;
        let (new_h, new_w) = if height < width {
            (self.size, round_half_up(scale * width as f64))
        } else {
            (round_half_up(scale * height as f64), self.size)
        };
        ResizeTransform::new(height, width, new_h, new_w, self.interp).into()
    }
}

// ============================================================================
// RandomResize
// ============================================================================

/// Sampling range for one axis of [`RandomResize`].
///
/// In JSON, an integer pair such as `[200, 400]` is `Pixels` and a pair with
/// a float such as `[0.8, 1.2]` is `Scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResizeRange {
    /// Absolute output length in pixels.
    Pixels(u32, u32),
    /// Factor applied to the input length.
    Scale(f64, f64),
}

impl ResizeRange {
    pub fn is_scale(&self) -> bool {
        matches!(self, Self::Scale(..))
    }

    fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Pixels(lo, hi) => (lo as f64, hi as f64),
            Self::Scale(lo, hi) => (lo, hi),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let (lo, hi) = self.bounds();
        ensure!(
            lo.is_finite() && hi.is_finite() && lo > 0.0,
            "{} bounds must be positive and finite (got {:?})",
            name,
            self
        );
        ensure!(lo <= hi, "{} lower bound exceeds upper bound (got {:?})", name, self);
        Ok(())
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let (lo, hi) = self.bounds();
        rng.random_range(lo..=hi)
    }
}

/// Rejection-sampling attempts before falling back to the original size.
const MAX_ATTEMPTS: usize = 50;
/// Slack on the aspect-ratio test so exact ratios survive rounding noise.
const ASPECT_RATIO_EPS: f64 = 1e-5;

/// Resizes to a randomly sampled size.
///
/// The width is drawn from `xrange` and the height from `yrange`, either as
/// scale factors or as pixel counts (both ranges must agree). Each side is
/// floored at `minimum`. With `aspect_ratio_thres == 0` the aspect ratio is
/// kept exactly and `yrange` is not used. Otherwise a sample is rejected when
/// the aspect ratio moves by a fraction of `aspect_ratio_thres` or more, and
/// after 50 rejections the image keeps its original size (with a warning).
///
/// # Example
/// ```ignore
/// // 0.8x..1.2x on each axis, aspect ratio within 15%
/// let aug = RandomResize::new(
///     ResizeRange::Scale(0.8, 1.2),
///     Some(ResizeRange::Scale(0.8, 1.2)),
///     (0, 0),
///     0.15,
///     Interpolation::Linear,
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct RandomResize {
    xrange: ResizeRange,
    yrange: ResizeRange,
    minimum: (u32, u32),
    aspect_ratio_thres: f64,
    interp: Interpolation,
}

impl RandomResize {
    /// `minimum` is `(x, y)`: the floor for width and height in pixels.
    pub fn new(
        xrange: ResizeRange,
        yrange: Option<ResizeRange>,
        minimum: (u32, u32),
        aspect_ratio_thres: f64,
        interp: Interpolation,
    ) -> Result<Self> {
        ensure!(
            aspect_ratio_thres >= 0.0 && aspect_ratio_thres.is_finite(),
            "aspect_ratio_thres must be a finite value >= 0 (got {})",
            aspect_ratio_thres
        );
        xrange.validate("xrange")?;

        let yrange = match yrange {
            Some(yrange) => {
                yrange.validate("yrange")?;
                ensure!(
                    xrange.is_scale() == yrange.is_scale(),
                    "xrange and yrange must both be scale factors or both be pixel counts \
                     (got {:?} and {:?})",
                    xrange,
                    yrange
                );
                if aspect_ratio_thres == 0.0 && xrange.is_scale() {
                    ensure!(
                        xrange == yrange,
                        "Preserving the aspect ratio with scale factors needs xrange == yrange \
                         (got {:?} and {:?})",
                        xrange,
                        yrange
                    );
                } else if aspect_ratio_thres == 0.0 {
                    tracing::warn!(
                        ?yrange,
                        "aspect_ratio_thres is 0, so yrange is not used; height follows the sampled width"
                    );
                }
                yrange
            }
            None if aspect_ratio_thres == 0.0 => xrange,
            None => bail!(
                "yrange is required unless aspect_ratio_thres is 0 (got {})",
                aspect_ratio_thres
            ),
        };

        Ok(Self {
            xrange,
            yrange,
            minimum,
            aspect_ratio_thres,
            interp,
        })
    }

    /// Draws one candidate `(dst_h, dst_w)` for a `height x width` input.
    fn propose(&self, height: u32, width: u32, rng: &mut dyn RngCore) -> (u32, u32) {
        let (h, w) = (height as f64, width as f64);
        let scale_mode = self.xrange.is_scale();

        let sx = self.xrange.sample(rng);
        let sy = match (self.aspect_ratio_thres == 0.0, scale_mode) {
            (true, true) => sx,
            (true, false) => sx * h / w,
            (false, _) => self.yrange.sample(rng),
        };

        let (dst_x, dst_y) = if scale_mode {
            (sx * w, sy * h)
        } else {
            (sx, sy)
        };
        let dst_w = round_half_up(dst_x.max(self.minimum.0 as f64)).max(1);
        let dst_h = round_half_up(dst_y.max(self.minimum.1 as f64)).max(1);
        (dst_h, dst_w)
    }

    fn accepts(&self, height: u32, width: u32, dst_h: u32, dst_w: u32) -> bool {
        if self.aspect_ratio_thres == 0.0 {
            return true;
        }
        let old_ratio = width as f64 / height as f64;
        let new_ratio = dst_w as f64 / dst_h as f64;
        (new_ratio - old_ratio).abs() / old_ratio < self.aspect_ratio_thres + ASPECT_RATIO_EPS
    }
}

impl Augmentor for RandomResize {
    fn sample_for_size(
        &self,
        height: u32,
        width: u32,
        rng: &mut dyn RngCore,
    ) -> GeometricTransform {
        for _ in 0..MAX_ATTEMPTS {
            let (dst_h, dst_w) = self.propose(height, width, rng);
            if self.accepts(height, width, dst_h, dst_w) {
                return ResizeTransform::new(height, width, dst_h, dst_w, self.interp).into();
            }
        }

        // TODO: offer a strict mode that returns an error here instead of the identity size.
        tracing::warn!(
            worker = crate::worker::worker_id(),
            height,
            width,
            attempts = MAX_ATTEMPTS,
            "RandomResize failed to sample a size within the aspect ratio threshold; keeping original size"
        );
        ResizeTransform::identity(height, width, self.interp).into()
    }
}
