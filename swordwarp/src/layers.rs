//! Collision layers and layer masks.
//!
//! Layers are declared as a `#[repr(u8)]` enum whose discriminant is the bit index, and masks
//! are a small bitmask container over any primitive integer. Ground probing filters by mask and
//! the weapon maps the struck layer onto an embed classification.

use num_traits::{One, PrimInt};

/// Trait implemented by layer-like enums that occupy one bit of a mask.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A set of flags packed into a primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(flags: &[U]) -> Self {
        let mut out = Self::empty();
        for &flag in flags {
            out.add(flag);
        }
        out
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a bit-indexed enum and implement [`FlagBitmask`] for it.
///
/// ```ignore
/// define_bitmask_flags!(Layer, u32, { Default, Ground, Wall });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::layers::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(Layer, u32, {
    Default,
    Ground,
    Wall,
    Ceiling,
    Enemy,
    Player,
    Weapon,
});

pub type LayerMask = BitmaskFlags<u32>;

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        LayerMask::from_flags(&[layer])
    }
}

/// Mask used by the default grounded probe.
pub fn ground_mask() -> LayerMask {
    LayerMask::from(Layer::Ground)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_bits_are_distinct() {
        let mut seen = 0u32;
        for layer in Layer::ALL {
            let m = layer.mask();
            assert_eq!(m.count_ones(), 1);
            assert_eq!(seen & m, 0, "{layer:?} overlaps another layer");
            seen |= m;
        }
    }

    #[test]
    fn mask_membership() {
        let mut mask = LayerMask::from_flags(&[Layer::Ground, Layer::Wall]);
        assert!(mask.has(Layer::Ground));
        assert!(mask.has(Layer::Wall));
        assert!(!mask.has(Layer::Enemy));

        mask.remove(Layer::Ground);
        assert!(!mask.has(Layer::Ground));
        mask.remove(Layer::Wall);
        assert!(mask.is_empty());
    }
}
