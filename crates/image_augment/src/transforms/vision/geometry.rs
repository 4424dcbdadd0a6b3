use anyhow::Result;
use image::{imageops::FilterType, DynamicImage};
use serde::{Deserialize, Serialize};

/// A 2D annotation point `[x, y]` on the image's pixel grid.
pub type Point = [f64; 2];

/// Rounds half-up to the nearest pixel count (`floor(v + 0.5)`).
pub(crate) fn round_half_up(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}

// ============================================================================
// Interpolation
// ============================================================================

/// Resampling filter used by the resize family.
///
/// | Variant    | `image` filter |
/// |------------|----------------|
/// | `Nearest`  | `Nearest`      |
/// | `Linear`   | `Triangle`     |
/// | `Cubic`    | `CatmullRom`   |
/// | `Gaussian` | `Gaussian`     |
/// | `Lanczos3` | `Lanczos3`     |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
    Cubic,
    Gaussian,
    Lanczos3,
}

impl From<Interpolation> for FilterType {
    fn from(interp: Interpolation) -> Self {
        match interp {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Linear => FilterType::Triangle,
            Interpolation::Cubic => FilterType::CatmullRom,
            Interpolation::Gaussian => FilterType::Gaussian,
            Interpolation::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

// ============================================================================
// ResizeTransform
// ============================================================================

/// A fully specified resize from `(src_h, src_w)` to `(dst_h, dst_w)`.
///
/// Built once per image by the resize-family augmentors and applied to the
/// image and then, optionally, to its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTransform {
    pub src_h: u32,
    pub src_w: u32,
    pub dst_h: u32,
    pub dst_w: u32,
    pub interp: Interpolation,
}

impl ResizeTransform {
    pub fn new(src_h: u32, src_w: u32, dst_h: u32, dst_w: u32, interp: Interpolation) -> Self {
        Self {
            src_h,
            src_w,
            dst_h,
            dst_w,
            interp,
        }
    }

    /// A descriptor that keeps the image at `(height, width)`.
    pub fn identity(height: u32, width: u32, interp: Interpolation) -> Self {
        Self::new(height, width, height, width, interp)
    }

    pub fn is_identity(&self) -> bool {
        self.src_h == self.dst_h && self.src_w == self.dst_w
    }

    /// Resamples to exactly `dst_w x dst_h`; identity sizes skip resampling.
    pub fn apply_image(&self, img: DynamicImage) -> Result<DynamicImage> {
        if self.is_identity() {
            return Ok(img);
        }
        Ok(img.resize_exact(self.dst_w, self.dst_h, self.interp.into()))
    }

    pub fn apply_coords(&self, coords: &mut [Point]) {
        let sx = self.dst_w as f64 / self.src_w as f64;
        let sy = self.dst_h as f64 / self.src_h as f64;
        for [x, y] in coords.iter_mut() {
            *x *= sx;
            *y *= sy;
        }
    }
}

// ============================================================================
// GeometricTransform
// ============================================================================

/// Mirror direction. `Horizontal` mirrors left/right, `Vertical` top/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// The parameters sampled by an augmentor for one image.
///
/// A value is created per image, applied to that image and its coordinates,
/// then dropped. Augmentors never hold on to one.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometricTransform {
    /// Nothing sampled (e.g. a flip whose coin came up tails).
    Identity,
    /// Mirror an image of the recorded size.
    Flip {
        axis: FlipAxis,
        height: u32,
        width: u32,
    },
    Resize(ResizeTransform),
    /// Swap the two spatial axes.
    Transpose,
    /// Members applied in order.
    Sequence(Vec<GeometricTransform>),
}

impl GeometricTransform {
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Identity => true,
            Self::Resize(resize) => resize.is_identity(),
            Self::Sequence(steps) => steps.iter().all(Self::is_identity),
            Self::Flip { .. } | Self::Transpose => false,
        }
    }

    /// Size `(height, width)` of the output for an input of `(height, width)`.
    pub fn output_size(&self, height: u32, width: u32) -> (u32, u32) {
        match self {
            Self::Identity | Self::Flip { .. } => (height, width),
            Self::Resize(resize) => (resize.dst_h, resize.dst_w),
            Self::Transpose => (width, height),
            Self::Sequence(steps) => steps
                .iter()
                .fold((height, width), |(h, w), step| step.output_size(h, w)),
        }
    }

    pub fn apply_image(&self, img: DynamicImage) -> Result<DynamicImage> {
        match self {
            Self::Identity => Ok(img),
            Self::Flip { axis, .. } => Ok(match axis {
                FlipAxis::Horizontal => img.fliph(),
                FlipAxis::Vertical => img.flipv(),
            }),
            Self::Resize(resize) => resize.apply_image(img),
            // rotate90 maps (x, y) to (h-1-y, x); mirroring that row gives (y, x)
            Self::Transpose => Ok(img.rotate90().fliph()),
            Self::Sequence(steps) => steps
                .iter()
                .try_fold(img, |img, step| step.apply_image(img)),
        }
    }

    pub fn apply_coords(&self, coords: &mut [Point]) {
        match self {
            Self::Identity => {}
            Self::Flip {
                axis,
                height,
                width,
            } => match axis {
                FlipAxis::Horizontal => {
                    let w = *width as f64;
                    coords.iter_mut().for_each(|p| p[0] = w - p[0]);
                }
                FlipAxis::Vertical => {
                    let h = *height as f64;
                    coords.iter_mut().for_each(|p| p[1] = h - p[1]);
                }
            },
            Self::Resize(resize) => resize.apply_coords(coords),
            Self::Transpose => coords.iter_mut().for_each(|p| p.swap(0, 1)),
            Self::Sequence(steps) => steps.iter().for_each(|step| step.apply_coords(coords)),
        }
    }
}

impl From<ResizeTransform> for GeometricTransform {
    fn from(resize: ResizeTransform) -> Self {
        Self::Resize(resize)
    }
}
