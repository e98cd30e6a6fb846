//! Fiber engine - The double-buffered tree and the operations on it.
//!
//! The engine manages:
//! - FiberTree: arena owning every fiber and root (ids, not pointers)
//! - FiberNode: one tree position in one render generation
//! - Work-in-progress derivation: allocate or reuse the alternate
//! - Fiber-from-element: fresh fibers on first mount
//! - FiberRootNode: container, current tree, finished work
//!
//! # Double Buffering
//!
//! ```text
//!            alternate
//! current  <----------->  work-in-progress
//!    |                          |
//!  child                      child (copied from current, re-linked by the walker)
//! ```
//!
//! Each position has at most two fibers. Commit flips which one is current;
//! the next pass reuses the other one in place.

mod element;
mod fiber;
mod flags;
mod root;
mod tree;
mod work_in_progress;

pub use element::*;
pub use fiber::*;
pub use flags::*;
pub use root::*;
pub use tree::*;
