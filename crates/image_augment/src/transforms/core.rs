use anyhow::{Context, Result};
use std::marker::PhantomData;

/// A single preprocessing step in a data-loading pipeline.
///
/// `Transform<I, O>` turns an input of type `I` into an output of type `O`.
/// Steps compose with `.then(...)`, which checks at compile time that the
/// output of one step is the input of the next:
///
/// ```ignore
/// let pipeline = Augment::new(Flip::horizontal(0.5)?)
///     .then(Augment::new(ResizeShortestEdge::new(256, Interpolation::Linear)?));
/// let image = pipeline.apply(image)?;
/// ```
pub trait Transform<I, O>: Send + Sync {
    /// Applies the transformation to the input
    fn apply(&self, input: I) -> Result<O>;

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: Transform<O, M>,
        O: Send,
        M: Send,
    {
        Chain::new(self, next)
    }
}

/// Two transforms run back to back (`A` then `B`).
/// `M` pins the intermediate type.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Builds a chain directly. Useful when the steps come from a
    /// runtime configuration rather than a literal `.then()` expression.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<I, M, O, A, B> Transform<I, O> for Chain<A, B, M>
where
    A: Transform<I, M>,
    B: Transform<M, O>,
    M: Send,
{
    fn apply(&self, input: I) -> Result<O> {
        self.first
            .apply(input)
            .and_then(|mid| self.second.apply(mid))
            .with_context(|| {
                format!(
                    "Transform chain failed: {} → {} → {}",
                    std::any::type_name::<A>(),
                    std::any::type_name::<B>(),
                    std::any::type_name::<O>()
                )
            })
    }
}
