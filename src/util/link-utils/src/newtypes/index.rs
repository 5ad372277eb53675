use std::{fmt, hash, marker::PhantomData, ops, slice};

use derive_where::derive_where;

// === Index === //

pub trait Index: fmt::Debug + Copy + hash::Hash + Eq + Ord {
    type Prim: num_traits::PrimInt;

    fn try_from_usize(idx: usize) -> Option<Self>;

    fn from_usize(idx: usize) -> Self {
        match Self::try_from_usize(idx) {
            Some(idx) => idx,
            None => panic!("index {idx} does not fit in {}", std::any::type_name::<Self>()),
        }
    }

    fn as_usize(self) -> usize;

    fn from_raw(idx: Self::Prim) -> Self;

    fn as_raw(self) -> Self::Prim;
}

#[doc(hidden)]
pub mod define_index_internals {
    pub use {
        super::Index,
        std::{convert::TryFrom, option::Option, primitive::usize},
    };
}

#[macro_export]
macro_rules! define_index {
    ($(
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty;
    )*) => {$(
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
        $vis struct $name(pub $ty);

        impl $crate::newtypes::define_index_internals::Index for $name {
            type Prim = $ty;

            fn try_from_usize(idx: $crate::newtypes::define_index_internals::usize) -> $crate::newtypes::define_index_internals::Option<Self> {
                <$ty as $crate::newtypes::define_index_internals::TryFrom<_>>::try_from(idx).ok().map(Self)
            }

            fn as_usize(self) -> $crate::newtypes::define_index_internals::usize {
                self.0 as $crate::newtypes::define_index_internals::usize
            }

            fn from_raw(raw: $ty) -> Self {
                Self(raw)
            }

            fn as_raw(self) -> $ty {
                self.0
            }
        }
    )*};
}

pub use define_index;

// === IndexVec === //

#[derive_where(Clone; V)]
#[derive_where(Default)]
pub struct IndexVec<K, V> {
    _ty: PhantomData<fn(K) -> K>,
    raw: Vec<V>,
}

impl<K, V: fmt::Debug> fmt::Debug for IndexVec<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl<K, V> IndexVec<K, V> {
    pub const fn new() -> Self {
        Self::from_raw(Vec::new())
    }

    pub const fn from_raw(raw: Vec<V>) -> Self {
        Self {
            _ty: PhantomData,
            raw,
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, V> {
        self.raw.iter()
    }
}

impl<K, V> FromIterator<V> for IndexVec<K, V> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self::from_raw(Vec::from_iter(iter))
    }
}

impl<K: Index, V> IndexVec<K, V> {
    pub fn push(&mut self, value: V) -> K {
        let new_index = K::from_usize(self.raw.len());
        self.raw.push(value);
        new_index
    }

    pub fn get(&self, idx: K) -> Option<&V> {
        self.raw.get(idx.as_usize())
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + Clone {
        (0..self.raw.len()).map(K::from_usize)
    }

    pub fn enumerate(&self) -> impl Iterator<Item = (K, &V)> + Clone {
        self.keys().zip(self.raw.iter())
    }
}

impl<K: Index, V> ops::Index<K> for IndexVec<K, V> {
    type Output = V;

    fn index(&self, index: K) -> &Self::Output {
        &self.raw[index.as_usize()]
    }
}

impl<K: Index, V> ops::IndexMut<K> for IndexVec<K, V> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.raw[index.as_usize()]
    }
}
