//! src/transforms/vision/mod.rs
//!
//! Geometric augmentations for images and their coordinate annotations.
//!
//! # Module Organization
//!
//! ```text
//! transforms/vision/
//! ├── geometry.rs      → Sampled parameters (GeometricTransform, ResizeTransform)
//! ├── augmentor.rs     → Augmentor trait + pipeline adaptors
//! ├── augmentation.rs  → Flip, Transpose
//! ├── geometric.rs     → Resize, ResizeShortestEdge, RandomResize
//! ├── list.rs          → AugmentorList (sequential composition)
//! └── config.rs        → Serde configs for building augmentors
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use image_augment::transforms::vision::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let augs = AugmentorList::new()
//!     .with(ResizeShortestEdge::new(256, Interpolation::Linear)?)
//!     .with(Flip::horizontal(0.5)?);
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let mut corners = vec![[12.0, 40.0], [96.0, 150.0]];
//! let image = augs.augment_with_coords(image, &mut corners, &mut rng)?;
//! ```

pub mod augmentation;
pub mod augmentor;
pub mod config;
pub mod geometric;
pub mod geometry;
pub mod list;

pub use augmentation::{Flip, Transpose};
pub use augmentor::{AnnotatedImage, Augment, AugmentAnnotated, Augmentor};
pub use config::{AugmentorConfig, ResizeShape};
pub use geometric::{RandomResize, Resize, ResizeRange, ResizeShortestEdge};
pub use geometry::{FlipAxis, GeometricTransform, Interpolation, Point, ResizeTransform};
pub use list::AugmentorList;
