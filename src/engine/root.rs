//! FiberRootNode - Handle for one mounted tree.
//!
//! Owns the host container, points at the fiber tree reflected in the host
//! (`current`) and at the most recently completed work tree
//! (`finished_work`). Committing swaps `current` over to the finished tree;
//! applying the side effects themselves is up to the caller.

use crate::error::{FiberError, FiberResult};
use crate::types::{Container, StateNode};

use super::fiber::FiberId;
use super::tree::FiberTree;

slotmap::new_key_type! {
    /// Stable handle of a mounted root inside a [`FiberTree`].
    pub struct RootId;
}

#[derive(Debug, Clone)]
pub struct FiberRootNode {
    pub container: Container,
    pub(crate) current: FiberId,
    pub(crate) finished_work: Option<FiberId>,
}

impl FiberRootNode {
    /// Host root fiber currently reflected in the host.
    pub fn current(&self) -> FiberId {
        self.current
    }

    /// Latest completed work root, not yet committed.
    pub fn finished_work(&self) -> Option<FiberId> {
        self.finished_work
    }
}

impl FiberTree {
    /// Mount a root on `container` with `host_root_fiber` as its current tree.
    ///
    /// The host root fiber's `state_node` is pointed back at the new root.
    pub fn create_fiber_root(&mut self, container: Container, host_root_fiber: FiberId) -> FiberResult<RootId> {
        self.fiber(host_root_fiber)?;

        let root = self.roots.insert(FiberRootNode {
            container,
            current: host_root_fiber,
            finished_work: None,
        });
        self.fiber_mut(host_root_fiber)?.state_node = StateNode::Root(root);

        tracing::debug!(?root, current = ?host_root_fiber, "created fiber root");
        Ok(root)
    }

    pub fn root(&self, id: RootId) -> FiberResult<&FiberRootNode> {
        self.roots.get(id).ok_or(FiberError::MissingRoot(id))
    }

    pub fn root_mut(&mut self, id: RootId) -> FiberResult<&mut FiberRootNode> {
        self.roots.get_mut(id).ok_or(FiberError::MissingRoot(id))
    }

    /// Record the completed work root of this pass.
    ///
    /// # Errors
    /// [`FiberError::FinishedWorkPending`] if the previous pass's work has not
    /// been consumed yet, [`FiberError::UnrelatedFinishedWork`] if `work` is
    /// not a host root whose alternate is the root's current tree.
    pub fn set_finished_work(&mut self, root: RootId, work: FiberId) -> FiberResult<()> {
        let current = self.root(root)?.current;
        let is_host_root = self.fiber(work)?.is_host_root();
        if !is_host_root || self.alternate_of(work)? != Some(current) {
            return Err(FiberError::UnrelatedFinishedWork { root, work });
        }

        let node = self.root_mut(root)?;
        if node.finished_work.is_some() {
            return Err(FiberError::FinishedWorkPending(root));
        }
        node.finished_work = Some(work);
        Ok(())
    }

    /// Consume the finished work root, leaving the slot empty.
    pub fn take_finished_work(&mut self, root: RootId) -> FiberResult<Option<FiberId>> {
        Ok(self.root_mut(root)?.finished_work.take())
    }

    /// Swap `current` over to the finished work root.
    ///
    /// Returns the new current host root fiber. The previous one stays
    /// alive as its alternate, ready to be reused by the next pass.
    pub fn commit_root(&mut self, root: RootId) -> FiberResult<FiberId> {
        let finished = self
            .root(root)?
            .finished_work
            .ok_or(FiberError::NoFinishedWork(root))?;
        self.fiber(finished)?;

        let node = self.root_mut(root)?;
        node.finished_work = None;
        let previous = std::mem::replace(&mut node.current, finished);

        tracing::debug!(?root, ?previous, current = ?finished, "committed fiber root");
        Ok(finished)
    }
}
