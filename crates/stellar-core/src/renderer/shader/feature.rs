// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of shader features, one bit per feature.
///
/// Feature bits are assigned by name through a
/// [`ShaderLibrary`](super::ShaderLibrary). Masks are compared exactly when a
/// variation is selected: a variation matches only if its mask is equal to
/// the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct FeatureMask(u32);

impl FeatureMask {
    /// The number of distinct features a mask can hold.
    pub const MAX_FEATURES: usize = u32::BITS as usize;

    /// The mask without any feature.
    pub const EMPTY: Self = Self(0);

    /// Creates a mask from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Creates a mask holding only the feature with the given bit index.
    pub const fn from_index(index: usize) -> Self {
        assert!(index < Self::MAX_FEATURES);
        Self(1 << index)
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if no feature is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every feature of `other` is set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both masks.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterates over the bit indices of the set features, lowest first.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..Self::MAX_FEATURES).filter(move |&i| self.0 & (1 << i) != 0)
    }
}

impl BitOr for FeatureMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for FeatureMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FeatureMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_contains() {
        let solid = FeatureMask::from_index(0);
        let skinned = FeatureMask::from_index(3);
        let both = solid | skinned;
        assert_eq!(both.bits(), 0b1001);
        assert!(both.contains(solid));
        assert!(both.contains(skinned));
        assert!(!solid.contains(both));
        assert!(both.contains(FeatureMask::EMPTY));
    }

    #[test]
    fn test_indices() {
        let mask = FeatureMask::from_bits(0b1010_0001);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 5, 7]);
        assert_eq!(FeatureMask::EMPTY.indices().count(), 0);
    }

    #[test]
    fn test_display_is_padded_hex() {
        assert_eq!(FeatureMask::from_bits(0x1f).to_string(), "0x0000001f");
        assert_eq!(FeatureMask::EMPTY.to_string(), "0x00000000");
    }
}
