//! Work-in-progress derivation.
//!
//! Every tree position has at most two fibers: the one reflected in the host
//! ("current") and the one being built for the next commit. Deriving a
//! work-in-progress fiber either allocates the second one (first update of
//! the position) or reuses it in place (every update after that), so a
//! surviving position costs no allocation per render.

use crate::error::FiberResult;
use crate::types::Props;

use super::fiber::{FiberId, FiberNode};
use super::flags::Flags;
use super::tree::FiberTree;

impl FiberTree {
    /// Derive the work-in-progress counterpart of `current` for a new pass.
    ///
    /// - No alternate yet: allocate one with `current`'s tag and key, share
    ///   its `state_node`, and link the two as alternates.
    /// - Alternate exists: reuse it, overwriting `pending_props` and clearing
    ///   effect flags left over from an earlier (possibly abandoned) pass.
    ///
    /// Either way the baseline `fiber_type`, `update_queue`, `child`,
    /// `memoized_props` and `memoized_state` are copied from `current`.
    /// `sibling`, `return_fiber` and `index` are left for the walker.
    ///
    /// Calling it again on the same `current` returns the same fiber.
    ///
    /// # Errors
    /// [`MissingFiber`](crate::FiberError::MissingFiber) if `current` is not
    /// live, [`BrokenAlternate`](crate::FiberError::BrokenAlternate) if its
    /// alternate link is one-sided. Both abort the pass.
    pub fn create_work_in_progress(&mut self, current: FiberId, pending_props: Props) -> FiberResult<FiberId> {
        let pass = self.render_pass;

        let wip = match self.alternate_of(current)? {
            None => {
                let source = self.fiber(current)?;
                let mut fiber = FiberNode::new(source.tag, pending_props, source.key.clone());
                fiber.state_node = source.state_node.clone();

                let wip = self.fibers.insert(fiber);
                self.link_alternates(current, wip)?;
                tracing::trace!(?current, ?wip, pass, "allocated work-in-progress fiber");
                wip
            }
            Some(wip) => {
                let fiber = self.fiber_mut(wip)?;
                fiber.pending_props = pending_props;
                fiber.flags = Flags::NO_FLAGS;
                fiber.subtree_flags = Flags::NO_FLAGS;
                tracing::trace!(?current, ?wip, pass, "reused work-in-progress fiber");
                wip
            }
        };

        let source = self.fiber(current)?;
        let fiber_type = source.fiber_type.clone();
        let update_queue = source.update_queue.clone();
        let child = source.child;
        let memoized_props = source.memoized_props.clone();
        let memoized_state = source.memoized_state.clone();

        let fiber = self.fiber_mut(wip)?;
        fiber.fiber_type = fiber_type;
        fiber.update_queue = update_queue;
        fiber.child = child;
        fiber.memoized_props = memoized_props;
        fiber.memoized_state = memoized_state;
        fiber.derived_in_pass = pass;

        Ok(wip)
    }
}
