//! Errors raised by the fiber tree.
//!
//! Contract violations (a stale id, a one-sided alternate link) are fatal to
//! the pass that hit them and propagate with `?` so a partial tree is never
//! committed. Unknown element shapes are not fatal; see
//! [`crate::FiberTree::create_fiber_from_element`] for how they are downgraded
//! to a diagnostic.

use crate::engine::{FiberId, RootId};

pub type FiberResult<T> = Result<T, FiberError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FiberError {
    #[error("missing fiber: {0:?} is not live in this tree")]
    MissingFiber(FiberId),

    #[error("missing root: {0:?} is not mounted in this tree")]
    MissingRoot(RootId),

    #[error("broken alternate: {fiber:?} points at {alternate:?}, which does not point back")]
    BrokenAlternate { fiber: FiberId, alternate: FiberId },

    #[error("unknown element type: {0}")]
    UnknownElementType(String),

    #[error("no finished work on root {0:?}")]
    NoFinishedWork(RootId),

    #[error("finished work already pending on root {0:?}")]
    FinishedWorkPending(RootId),

    #[error("unrelated finished work: {work:?} is not the alternate host root of root {root:?}")]
    UnrelatedFinishedWork { root: RootId, work: FiberId },

    #[error("child cycle: {child:?} is {parent:?} or one of its ancestors")]
    ChildCycle { parent: FiberId, child: FiberId },

    #[error("duplicate child: {child:?} listed twice under {parent:?}")]
    DuplicateChild { parent: FiberId, child: FiberId },

    #[error("root in use: {fiber:?} is the current tree of root {root:?}")]
    RootInUse { root: RootId, fiber: FiberId },
}

impl FiberError {
    pub fn unknown_element_type(msg: impl Into<String>) -> Self {
        Self::UnknownElementType(msg.into())
    }

    /// True for errors that mean the calling pass must be abandoned.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::UnknownElementType(_))
    }
}
