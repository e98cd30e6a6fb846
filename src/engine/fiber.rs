//! FiberNode - One unit of work at one tree position in one render generation.
//!
//! A fiber holds:
//! - Identity: work tag, key, element type
//! - Structure: `return_fiber`, `child`, `sibling`, `index` (children are a linked list)
//! - Work payload: pending props for the upcoming pass, memoized props/state
//!   from the last committed pass, the update queue
//! - Effects: `flags` and `subtree_flags`
//! - `alternate`: the same position in the other generation
//!
//! Links are [`FiberId`]s into the owning [`FiberTree`](super::FiberTree), so
//! back-references (`return_fiber`, `alternate`) never own anything.

use crate::types::{FiberType, Key, MemoizedState, Props, Ref, StateNode, UpdateQueue, WorkTag};

use super::flags::Flags;

slotmap::new_key_type! {
    /// Stable handle of a fiber inside a [`FiberTree`](super::FiberTree).
    pub struct FiberId;
}

#[derive(Debug, Clone)]
pub struct FiberNode {
    pub tag: WorkTag,
    pub key: Option<Key>,
    pub fiber_type: FiberType,
    pub state_node: StateNode,

    pub return_fiber: Option<FiberId>,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    pub index: usize,

    pub ref_handle: Option<Ref>,

    pub pending_props: Props,
    pub memoized_props: Option<Props>,
    pub memoized_state: Option<MemoizedState>,
    pub update_queue: Option<UpdateQueue>,

    pub flags: Flags,
    pub subtree_flags: Flags,

    pub(crate) alternate: Option<FiberId>,
    pub(crate) derived_in_pass: u64,
}

impl FiberNode {
    /// Create a blank fiber: no links, no payload, no effects.
    pub fn new(tag: WorkTag, pending_props: Props, key: Option<Key>) -> Self {
        Self {
            tag,
            key,
            fiber_type: FiberType::Empty,
            state_node: StateNode::None,

            return_fiber: None,
            child: None,
            sibling: None,
            index: 0,

            ref_handle: None,

            pending_props,
            memoized_props: None,
            memoized_state: None,
            update_queue: None,

            flags: Flags::NO_FLAGS,
            subtree_flags: Flags::NO_FLAGS,

            alternate: None,
            derived_in_pass: 0,
        }
    }

    /// The same position in the other generation, if one was ever derived.
    ///
    /// Read-only: the link is kept symmetric by the tree.
    #[inline]
    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    /// Render pass this fiber was last derived in (0 = created fresh, never derived).
    #[inline]
    pub fn derived_in_pass(&self) -> u64 {
        self.derived_in_pass
    }

    #[inline]
    pub fn is_host_root(&self) -> bool {
        self.tag == WorkTag::HostRoot
    }

    /// Record the pending props as committed. Called when this fiber's pass completes.
    pub fn memoize(&mut self) {
        self.memoized_props = Some(self.pending_props.clone());
    }
}
