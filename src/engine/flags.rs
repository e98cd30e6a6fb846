//! Side-effect flags carried by each fiber.
//!
//! `flags` marks work on the fiber itself, `subtree_flags` is the union of
//! everything below it. Both are cleared whenever a fiber is derived for a
//! new pass.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        /// Insert or move the host instance.
        const PLACEMENT = 1 << 1;

        /// Props or content changed.
        const UPDATE = 1 << 2;

        /// One or more children must be removed.
        const CHILD_DELETION = 1 << 4;

        /// Ref must be attached or detached.
        const REF = 1 << 5;

        /// Everything the mutation step of a commit looks at.
        const MUTATION_MASK = Self::PLACEMENT.bits()
            | Self::UPDATE.bits()
            | Self::CHILD_DELETION.bits()
            | Self::REF.bits();
    }
}

impl Flags {
    /// No pending effects.
    pub const NO_FLAGS: Self = Self::empty();

    /// Check if any mutation effect is pending.
    #[inline]
    pub fn has_effects(self) -> bool {
        self.intersects(Self::MUTATION_MASK)
    }

    /// Fold a child's own and subtree flags into a parent's subtree flags.
    #[inline]
    pub fn bubble(&mut self, child_flags: Self, child_subtree_flags: Self) {
        *self |= child_flags | child_subtree_flags;
    }
}
