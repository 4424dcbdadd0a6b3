//! Serializable augmentor configuration.
//!
//! Each variant mirrors one augmentor's constructor. `build()` runs the same
//! validation, so a bad config fails when the pipeline is assembled rather
//! than on the first image.
//!
//! ```text
//! {"type": "flip", "horiz": true, "prob": 0.5}
//! {"type": "resize", "shape": [224, 320], "interp": "cubic"}
//! {"type": "resize", "shape": 224}
//! {"type": "resize_shortest_edge", "size": 256}
//! {"type": "random_resize", "xrange": [0.8, 1.2], "yrange": [0.8, 1.2], "aspect_ratio_thres": 0.15}
//! {"type": "transpose", "prob": 0.5}
//! ```

use super::augmentation::{Flip, Transpose};
use super::augmentor::Augmentor;
use super::geometric::{RandomResize, Resize, ResizeRange, ResizeShortestEdge};
use super::geometry::Interpolation;
use anyhow::Result;
use serde::{Deserialize, Serialize};

fn default_prob() -> f64 {
    0.5
}

fn default_aspect_ratio_thres() -> f64 {
    0.15
}

/// Target shape for [`Resize`]: one integer for a square, or `[height, width]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResizeShape {
    Square(u32),
    HeightWidth(u32, u32),
}

impl ResizeShape {
    /// `(height, width)`
    pub fn dims(self) -> (u32, u32) {
        match self {
            Self::Square(size) => (size, size),
            Self::HeightWidth(height, width) => (height, width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum AugmentorConfig {
    Flip {
        #[serde(default)]
        horiz: bool,
        #[serde(default)]
        vert: bool,
        #[serde(default = "default_prob")]
        prob: f64,
    },
    Resize {
        shape: ResizeShape,
        #[serde(default)]
        interp: Interpolation,
    },
    ResizeShortestEdge {
        size: u32,
        #[serde(default)]
        interp: Interpolation,
    },
    RandomResize {
        xrange: ResizeRange,
        #[serde(default)]
        yrange: Option<ResizeRange>,
        /// `(x, y)` floor in pixels
        #[serde(default)]
        minimum: (u32, u32),
        #[serde(default = "default_aspect_ratio_thres")]
        aspect_ratio_thres: f64,
        #[serde(default)]
        interp: Interpolation,
    },
    Transpose {
        #[serde(default = "default_prob")]
        prob: f64,
    },
}

impl AugmentorConfig {
    /// Validates the config and constructs the augmentor.
    pub fn build(&self) -> Result<Box<dyn Augmentor>> {
        Ok(match *self {
            Self::Flip { horiz, vert, prob } => Box::new(Flip::new(horiz, vert, prob)?),
            Self::Resize { shape, interp } => {
                let (height, width) = shape.dims();
                Box::new(Resize::new(height, width, interp)?)
            }
            Self::ResizeShortestEdge { size, interp } => {
                Box::new(ResizeShortestEdge::new(size, interp)?)
            }
            Self::RandomResize {
                xrange,
                yrange,
                minimum,
                aspect_ratio_thres,
                interp,
            } => Box::new(RandomResize::new(
                xrange,
                yrange,
                minimum,
                aspect_ratio_thres,
                interp,
            )?),
            Self::Transpose { prob } => Box::new(Transpose::new(prob)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AugmentorConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults_fill_in() {
        assert_eq!(
            parse(r#"{"type": "flip", "vert": true}"#),
            AugmentorConfig::Flip {
                horiz: false,
                vert: true,
                prob: 0.5
            }
        );
        assert_eq!(
            parse(r#"{"type": "resize", "shape": 64}"#),
            AugmentorConfig::Resize {
                shape: ResizeShape::Square(64),
                interp: Interpolation::Linear
            }
        );
    }

    #[test]
    fn test_range_kind_follows_json_numbers() {
        let config = parse(r#"{"type": "random_resize", "xrange": [100, 200], "yrange": [0.5, 1.5]}"#);
        let AugmentorConfig::RandomResize {
            xrange,
            yrange,
            aspect_ratio_thres,
            ..
        } = config
        else {
            panic!("expected random_resize");
        };
        assert_eq!(xrange, ResizeRange::Pixels(100, 200));
        assert_eq!(yrange, Some(ResizeRange::Scale(0.5, 1.5)));
        assert_eq!(aspect_ratio_thres, 0.15);
    }

    #[test]
    fn test_build_validates() {
        let mixed = parse(r#"{"type": "random_resize", "xrange": [100, 200], "yrange": [0.5, 1.5]}"#);
        assert!(mixed.build().is_err());

        let both = parse(r#"{"type": "flip", "horiz": true, "vert": true}"#);
        assert!(both.build().is_err());

        let shape = parse(r#"{"type": "resize", "shape": [32, 48], "interp": "lanczos3"}"#);
        assert!(shape.build().is_ok());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<AugmentorConfig, _> =
            serde_json::from_str(r#"{"type": "transpose", "probability": 0.5}"#);
        assert!(result.is_err());
    }
}
