//! Fiber Tree - Arena that owns every fiber and root of a mounted tree.
//!
//! Manages:
//! - Fiber allocation and release (slotmap, O(1) reuse of freed slots)
//! - Alternate bookkeeping (the link is always symmetric)
//! - Sibling-list helpers for the reconciliation walker
//! - The render pass counter stamped on derived fibers
//!
//! Fibers refer to each other by [`FiberId`]. A stale id is an error, never
//! a panic.

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{FiberError, FiberResult};
use crate::types::{Key, Props, WorkTag};

use super::fiber::{FiberId, FiberNode};
use super::root::{FiberRootNode, RootId};

// =============================================================================
// Config
// =============================================================================

/// Knobs for a [`FiberTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Fiber slots reserved up front.
    pub initial_capacity: usize,
    /// Log a warning when an element type cannot be classified.
    pub element_diagnostics: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            element_diagnostics: true,
        }
    }
}

// =============================================================================
// Tree State
// =============================================================================

#[derive(Debug)]
pub struct FiberTree {
    pub(crate) fibers: SlotMap<FiberId, FiberNode>,
    pub(crate) roots: SlotMap<RootId, FiberRootNode>,
    pub(crate) config: TreeConfig,
    pub(crate) render_pass: u64,
}

impl Default for FiberTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FiberTree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            fibers: SlotMap::with_capacity_and_key(config.initial_capacity),
            roots: SlotMap::with_key(),
            config,
            render_pass: 0,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocate a blank fiber.
    pub fn create_fiber(&mut self, tag: WorkTag, pending_props: Props, key: Option<Key>) -> FiberId {
        self.fibers.insert(FiberNode::new(tag, pending_props, key))
    }

    /// Delete a whole tree position: the fiber, its alternate, and every
    /// child position reachable from either generation.
    ///
    /// The position is spliced out of its parent's child list in both
    /// generations and the remaining siblings are re-indexed. A root's
    /// finished work is always the alternate of its current tree, so it is
    /// covered by the same check.
    ///
    /// # Returns
    /// How many fibers were removed.
    ///
    /// # Errors
    /// [`FiberError::RootInUse`] if the position holds some root's current
    /// tree. Nothing is touched in that case.
    pub fn release(&mut self, id: FiberId) -> FiberResult<usize> {
        let alternate = self.fiber(id)?.alternate;
        let doomed = self.collect_position(id);

        if let Some((root, node)) = self.roots.iter().find(|(_, node)| doomed.contains_key(node.current)) {
            return Err(FiberError::RootInUse {
                root,
                fiber: node.current,
            });
        }

        // Parents outside the released subtree, in both generations.
        let mut parents: Vec<FiberId> = Vec::new();
        for position in [Some(id), alternate].into_iter().flatten() {
            let Some(parent) = self.fibers.get(position).and_then(|f| f.return_fiber) else {
                continue;
            };
            let alternate = self.fibers.get(parent).and_then(|f| f.alternate);
            for parent in [Some(parent), alternate].into_iter().flatten() {
                if self.fibers.contains_key(parent) && !doomed.contains_key(parent) && !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }
        let mut kept = Vec::with_capacity(parents.len());
        for &parent in &parents {
            let children: Vec<FiberId> = self
                .children(parent)?
                .into_iter()
                .filter(|child| !doomed.contains_key(*child))
                .collect();
            kept.push((parent, children));
        }

        for (fiber, ()) in &doomed {
            self.fibers.remove(fiber);
        }
        for (parent, children) in kept {
            self.relink(parent, &children)?;
        }

        Ok(doomed.len())
    }

    /// Every fiber belonging to the position at `id`, across both generations.
    ///
    /// Children can be shared between generations after derivation; each
    /// fiber is listed once.
    fn collect_position(&self, id: FiberId) -> SecondaryMap<FiberId, ()> {
        let mut doomed = SecondaryMap::new();
        // (fiber, whether its siblings belong to the released subtree)
        let mut pending = vec![(id, false)];

        while let Some((id, with_siblings)) = pending.pop() {
            let Some(fiber) = self.fibers.get(id) else {
                continue;
            };
            if doomed.insert(id, ()).is_some() {
                continue;
            }

            if let Some(alternate) = fiber.alternate {
                pending.push((alternate, with_siblings));
            }
            if with_siblings {
                if let Some(sibling) = fiber.sibling {
                    pending.push((sibling, true));
                }
            }
            if let Some(child) = fiber.child {
                pending.push((child, true));
            }
        }

        doomed
    }

    /// Number of fibers currently alive across both generations.
    pub fn live_fibers(&self) -> usize {
        self.fibers.len()
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.fibers.contains_key(id)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn fiber(&self, id: FiberId) -> FiberResult<&FiberNode> {
        self.fibers.get(id).ok_or(FiberError::MissingFiber(id))
    }

    pub fn fiber_mut(&mut self, id: FiberId) -> FiberResult<&mut FiberNode> {
        self.fibers.get_mut(id).ok_or(FiberError::MissingFiber(id))
    }

    /// The alternate of `id`, after checking that it points back.
    pub fn alternate_of(&self, id: FiberId) -> FiberResult<Option<FiberId>> {
        let Some(alternate) = self.fiber(id)?.alternate else {
            return Ok(None);
        };
        match self.fibers.get(alternate) {
            Some(other) if other.alternate == Some(id) => Ok(Some(alternate)),
            _ => Err(FiberError::BrokenAlternate {
                fiber: id,
                alternate,
            }),
        }
    }

    /// Link two fibers as each other's alternate.
    pub(crate) fn link_alternates(&mut self, a: FiberId, b: FiberId) -> FiberResult<()> {
        self.fiber_mut(a)?.alternate = Some(b);
        self.fiber_mut(b)?.alternate = Some(a);
        Ok(())
    }

    // =========================================================================
    // Sibling Lists
    // =========================================================================

    /// Children of `parent` in sibling order.
    ///
    /// A sibling chain longer than the number of live fibers can only be a
    /// cycle and is reported as [`FiberError::ChildCycle`].
    pub fn children(&self, parent: FiberId) -> FiberResult<Vec<FiberId>> {
        let mut out = Vec::new();
        let mut next = self.fiber(parent)?.child;
        while let Some(id) = next {
            if out.len() >= self.fibers.len() {
                return Err(FiberError::ChildCycle { parent, child: id });
            }
            out.push(id);
            next = self.fiber(id)?.sibling;
        }
        Ok(out)
    }

    /// Make `children` the child list of `parent`, in order.
    ///
    /// Sets `return_fiber`, `sibling` and `index` on each child and `child`
    /// on the parent. An empty slice clears the list.
    ///
    /// # Errors
    /// [`FiberError::ChildCycle`] if a child is `parent` or one of its
    /// ancestors, [`FiberError::DuplicateChild`] if an id is listed twice.
    /// Nothing is touched on error.
    pub fn append_children(&mut self, parent: FiberId, children: &[FiberId]) -> FiberResult<()> {
        self.fiber(parent)?;

        let ancestors = self.ancestors(parent)?;
        let mut seen = SecondaryMap::new();
        for &child in children {
            self.fiber(child)?;
            if child == parent || ancestors.contains(&child) {
                return Err(FiberError::ChildCycle { parent, child });
            }
            if seen.insert(child, ()).is_some() {
                return Err(FiberError::DuplicateChild { parent, child });
            }
        }

        for &child in children {
            self.fiber_mut(child)?.return_fiber = Some(parent);
        }
        self.relink(parent, children)
    }

    /// `return_fiber` chain above `id`, nearest first.
    fn ancestors(&self, id: FiberId) -> FiberResult<Vec<FiberId>> {
        let mut out = Vec::new();
        let mut next = self.fiber(id)?.return_fiber;
        while let Some(ancestor) = next {
            if ancestor == id || out.len() >= self.fibers.len() {
                return Err(FiberError::ChildCycle { parent: id, child: ancestor });
            }
            out.push(ancestor);
            next = self.fibers.get(ancestor).and_then(|f| f.return_fiber);
        }
        Ok(out)
    }

    /// Rewrite `child`, `sibling` and `index` for an already validated list.
    /// `return_fiber` is left alone: shared children keep their parent.
    fn relink(&mut self, parent: FiberId, children: &[FiberId]) -> FiberResult<()> {
        for (index, &child) in children.iter().enumerate() {
            let fiber = self.fiber_mut(child)?;
            fiber.index = index;
            fiber.sibling = children.get(index + 1).copied();
        }
        self.fiber_mut(parent)?.child = children.first().copied();
        Ok(())
    }

    // =========================================================================
    // Render Passes
    // =========================================================================

    /// Start a new render pass. Fibers derived from now on are stamped with it.
    pub fn begin_pass(&mut self) -> u64 {
        self.render_pass += 1;
        tracing::trace!(pass = self.render_pass, "begin render pass");
        self.render_pass
    }

    pub fn render_pass(&self) -> u64 {
        self.render_pass
    }
}
