use std::{hash, marker::PhantomData};

use derive_where::derive_where;

pub use rustc_hash::FxHasher;

/// A [`hash::BuildHasher`] for hashers with a [`Default`] constructor which, unlike
/// [`std::hash::BuildHasherDefault`], can be constructed in `const` contexts.
#[derive_where(Debug, Copy, Clone, Default)]
pub struct ConstBuildHasherDefault<T> {
    _ty: PhantomData<fn() -> T>,
}

impl<T> ConstBuildHasherDefault<T> {
    pub const fn new() -> Self {
        Self { _ty: PhantomData }
    }
}

impl<T: Default + hash::Hasher> hash::BuildHasher for ConstBuildHasherDefault<T> {
    type Hasher = T;

    fn build_hasher(&self) -> Self::Hasher {
        T::default()
    }
}

pub type FxBuildHasher = ConstBuildHasherDefault<FxHasher>;
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
pub type FxHashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;
