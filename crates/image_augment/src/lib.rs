pub mod transforms;
pub mod worker;

pub use transforms::vision::{
    Augmentor, AugmentorList, Flip, GeometricTransform, Interpolation, Point, RandomResize, Resize,
    ResizeRange, ResizeShortestEdge, ResizeTransform, Transpose,
};
pub use transforms::Transform;
