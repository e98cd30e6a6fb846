//! # spark-fiber
//!
//! Double-buffered fiber tree for incremental UI reconciliation.
//!
//! ## Architecture
//!
//! Every position of a component tree is represented by up to two fibers:
//! the one currently reflected in the host and the one being built for the
//! next commit. They are each other's `alternate`. A new pass derives its
//! work-in-progress fiber from the current one, reusing the alternate in
//! place when it exists, so unchanged positions allocate nothing.
//!
//! ```text
//! Element tree → create_fiber_from_element / create_work_in_progress
//!              → finished work on FiberRootNode → commit_root swaps current
//! ```
//!
//! Diffing, scheduling, hooks and the host commit step live elsewhere; they
//! read and write fibers through [`FiberTree`].
//!
//! ## Modules
//!
//! - [`types`] - Work tags, elements, props, opaque host handles
//! - [`engine`] - FiberTree, FiberNode, derivation, roots, flags
//! - [`error`] - FiberError / FiberResult

pub mod engine;
pub mod error;
pub mod types;

pub use types::*;

pub use engine::{
    classify_element_type, FiberId, FiberNode, FiberRootNode, FiberTree, Flags, RootId,
    TreeConfig,
};

pub use error::{FiberError, FiberResult};
