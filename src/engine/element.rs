//! Fiber-from-element construction (first mount of a tree position).

use crate::error::{FiberError, FiberResult};
use crate::types::{Element, ElementType, WorkTag};

use super::fiber::FiberId;
use super::tree::FiberTree;

/// Work tag for an element type.
///
/// A string type is a host element and a callable is a function component.
/// Anything else is reported as [`FiberError::UnknownElementType`].
pub fn classify_element_type(element_type: &ElementType) -> FiberResult<WorkTag> {
    match element_type {
        ElementType::Host(_) => Ok(WorkTag::HostComponent),
        ElementType::Function(_) => Ok(WorkTag::FunctionComponent),
        ElementType::Other(value) => Err(FiberError::unknown_element_type(value.to_string())),
    }
}

impl FiberTree {
    /// Create a fresh fiber for `element`.
    ///
    /// Never fails. An element type that cannot be classified is logged (when
    /// [`TreeConfig::element_diagnostics`](super::TreeConfig) is on) and
    /// treated as a function component.
    pub fn create_fiber_from_element(&mut self, element: &Element) -> FiberId {
        let tag = classify_element_type(&element.element_type).unwrap_or_else(|err| {
            if self.config.element_diagnostics {
                tracing::warn!(key = ?element.key, "{err}; defaulting to function component");
            }
            WorkTag::FunctionComponent
        });

        let id = self.create_fiber(tag, element.props.clone(), element.key.clone());
        if let Some(fiber) = self.fibers.get_mut(id) {
            fiber.fiber_type = element.element_type.clone().into();
        }
        id
    }
}
