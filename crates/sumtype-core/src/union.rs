//! The shared contract of every generated union.

use std::any::Any;

use crate::error::UnionError;

/// A value holding exactly one payload out of a fixed, ordered set of variant
/// types.
///
/// Implementations are generated; the enum variants themselves are the
/// converting constructors and each variant type gets a `From` impl.
pub trait TaggedUnion: Sized + 'static {
    /// Wire tags of the variants, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Index of the active variant.
    fn tag(&self) -> usize;

    /// The payload, erased to `dyn Any`.
    fn value(&self) -> &dyn Any;

    /// Rebuild a union from an erased payload.
    ///
    /// Fails instead of storing a payload under a tag it does not belong to.
    fn from_payload(tag: usize, payload: Box<dyn Any>) -> Result<Self, UnionError>;

    /// Number of declared variants.
    fn arity() -> usize {
        Self::VARIANTS.len()
    }

    /// Wire tag of the active variant.
    fn variant_name(&self) -> &'static str {
        Self::VARIANTS[self.tag()]
    }

    /// The payload if its exact runtime type is `T`.
    fn is<T: Any>(&self) -> Option<&T> {
        self.value().downcast_ref::<T>()
    }

    /// True when the payload's exact runtime type is `T`.
    fn holds<T: Any>(&self) -> bool {
        self.value().is::<T>()
    }
}
