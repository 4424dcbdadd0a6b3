use super::augmentor::Augmentor;
use super::geometry::{FlipAxis, GeometricTransform};
use anyhow::{ensure, Result};
use rand::{Rng, RngCore};

fn check_prob(prob: f64) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&prob),
        "Probability must be in [0.0, 1.0] range (got {})",
        prob
    );
    Ok(())
}

/// Draws `u` in `[0, 1)` and returns `u < prob`.
fn coin(prob: f64, rng: &mut dyn RngCore) -> bool {
    rng.random::<f64>() < prob
}

// ============================================================================
// Flip
// ============================================================================

/// Randomly mirrors images, and their coordinates, along one axis.
///
/// Exactly one of `horiz`/`vert` must be set. A horizontal flip maps a point
/// `(x, y)` to `(w - x, y)`; a vertical flip maps it to `(x, h - y)`.
///
/// # Example
/// ```ignore
/// let flip = Flip::horizontal(0.5)?; // 50% flip chance
/// let augmented = flip.augment(image, &mut rng)?;
/// ```
#[derive(Debug, Clone)]
pub struct Flip {
    axis: FlipAxis,
    prob: f64,
}

impl Flip {
    /// Fails unless exactly one of `horiz`/`vert` is set and `prob` is in [0, 1].
    pub fn new(horiz: bool, vert: bool, prob: f64) -> Result<Self> {
        ensure!(
            horiz != vert,
            "Flip needs exactly one of horiz/vert (got horiz={}, vert={})",
            horiz,
            vert
        );
        check_prob(prob)?;
        let axis = if horiz {
            FlipAxis::Horizontal
        } else {
            FlipAxis::Vertical
        };
        Ok(Self { axis, prob })
    }

    pub fn horizontal(prob: f64) -> Result<Self> {
        Self::new(true, false, prob)
    }

    pub fn vertical(prob: f64) -> Result<Self> {
        Self::new(false, true, prob)
    }

    pub fn axis(&self) -> FlipAxis {
        self.axis
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }
}

impl Augmentor for Flip {
    fn sample_for_size(
        &self,
        height: u32,
        width: u32,
        rng: &mut dyn RngCore,
    ) -> GeometricTransform {
        if coin(self.prob, rng) {
            GeometricTransform::Flip {
                axis: self.axis,
                height,
                width,
            }
        } else {
            GeometricTransform::Identity
        }
    }
}

// ============================================================================
// Transpose
// ============================================================================

/// Randomly swaps the spatial axes; a point `(x, y)` becomes `(y, x)`.
#[derive(Debug, Clone)]
pub struct Transpose {
    prob: f64,
}

impl Transpose {
    pub fn new(prob: f64) -> Result<Self> {
        check_prob(prob)?;
        Ok(Self { prob })
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }
}

impl Augmentor for Transpose {
    fn sample_for_size(&self, _: u32, _: u32, rng: &mut dyn RngCore) -> GeometricTransform {
        if coin(self.prob, rng) {
            GeometricTransform::Transpose
        } else {
            GeometricTransform::Identity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 2x1 image: left = red, right = blue.
    fn red_blue() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_flip_requires_exactly_one_axis() {
        assert!(Flip::new(true, true, 0.5).is_err());
        let err = Flip::new(false, false, 0.5).unwrap_err();
        assert!(err.to_string().contains("exactly one of horiz/vert"));
        assert!(Flip::horizontal(1.5).is_err());
        assert!(Flip::vertical(-0.1).is_err());
        assert!(Transpose::new(f64::NAN).is_err());
    }

    #[test]
    fn test_horizontal_flip_always() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let flip = Flip::horizontal(1.0)?;
        let mut coords = vec![[0.5, 0.25]];
        let flipped = flip.augment_with_coords(red_blue(), &mut coords, &mut rng)?;

        assert_eq!(flipped.as_bytes(), &[0, 0, 255, 255, 0, 0]);
        assert_eq!(coords, vec![[1.5, 0.25]]);
        Ok(())
    }

    #[test]
    fn test_flip_never() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let flip = Flip::vertical(0.0)?;
        let original = red_blue();
        let mut coords = vec![[1.0, 1.0]];
        let out = flip.augment_with_coords(original.clone(), &mut coords, &mut rng)?;

        assert_eq!(out.as_bytes(), original.as_bytes());
        assert_eq!(coords, vec![[1.0, 1.0]]);
        Ok(())
    }

    #[test]
    fn test_flip_records_source_size() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let params = Flip::vertical(1.0)?.sample_for_size(30, 40, &mut rng);
        assert_eq!(
            params,
            GeometricTransform::Flip {
                axis: FlipAxis::Vertical,
                height: 30,
                width: 40
            }
        );
        Ok(())
    }

    #[test]
    fn test_flip_rate_tracks_prob() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let flip = Flip::horizontal(0.3)?;
        let flips = (0..10_000)
            .filter(|_| !flip.sample_for_size(4, 4, &mut rng).is_identity())
            .count();
        assert!((2_700..3_300).contains(&flips), "got {} flips", flips);
        Ok(())
    }

    #[test]
    fn test_transpose_preserves_colour_type() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let img = red_blue();
        let out = Transpose::new(1.0)?.augment(img.clone(), &mut rng)?;
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.color(), img.color());
        assert_eq!(out.as_bytes(), img.as_bytes());
        Ok(())
    }
}
