//! Behaviour flags a container analyzer requests when it descends.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// A small set of independent traversal flags, combined by union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContainerBehaviour(u8);

impl ContainerBehaviour {
    /// No flag requested.
    pub const NONE: Self = Self(0);

    /// Recurse into this entity's own children.
    pub const FOLLOW_CHILDREN: Self = Self(1);

    /// Once this interpretation succeeded, suppress alternative container
    /// interpretations of the same entity.
    pub const BLOCK_OTHER: Self = Self(1 << 1);

    /// Whether every flag of `other` is set in `self`.
    #[inline]
    #[must_use = "returns the flag test"]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether [`ContainerBehaviour::FOLLOW_CHILDREN`] is set.
    #[inline]
    #[must_use = "returns the flag test"]
    pub const fn follow_children(self) -> bool {
        self.contains(Self::FOLLOW_CHILDREN)
    }

    /// Whether [`ContainerBehaviour::BLOCK_OTHER`] is set.
    #[inline]
    #[must_use = "returns the flag test"]
    pub const fn block_other(self) -> bool {
        self.contains(Self::BLOCK_OTHER)
    }
}

impl BitOr for ContainerBehaviour {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ContainerBehaviour {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
