//! Core types for spark-fiber.
//!
//! These are the values a fiber carries around: what kind of work it is,
//! the element it came from, and the opaque payloads owned by the host and
//! by the state-update machinery. The tree itself never looks inside them.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::engine::RootId;

// =============================================================================
// Work Tag
// =============================================================================

/// What kind of work a fiber represents.
///
/// Fixed at creation and copied to the alternate; never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkTag {
    FunctionComponent = 0,
    HostRoot = 3,
    HostComponent = 5,
    HostText = 6,
    Fragment = 7,
}

impl WorkTag {
    /// Whether fibers of this kind are backed by a host instance.
    pub const fn is_host(self) -> bool {
        matches!(self, Self::HostComponent | Self::HostText)
    }
}

// =============================================================================
// Key
// =============================================================================

/// Identity token used by list reconciliation. Opaque to the tree.
pub type Key = String;

// =============================================================================
// Props
// =============================================================================

/// Props for one element.
///
/// Reference counted: cloning shares the same map, which is how props are
/// "copied" across alternates.
#[derive(Clone, Default, PartialEq)]
pub struct Props(Rc<Map<String, Value>>);

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build props from a JSON value. Anything but an object yields empty props.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(Rc::new(map)),
            _ => Self::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if both share the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<Value> for Props {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

// =============================================================================
// Opaque Handles
// =============================================================================

/// Shared handle to a value the tree stores but never interprets.
///
/// Equality is identity: two handles are equal only if they point at the
/// same allocation.
#[derive(Clone)]
pub struct Opaque(Rc<dyn Any>);

impl Opaque {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({:p})", Rc::as_ptr(&self.0))
    }
}

/// Host mount target (a DOM container, a terminal surface, ...).
pub type Container = Opaque;

/// Host-side instance backing a host fiber.
pub type HostInstance = Opaque;

/// Pending-update payload, interpreted by the state-update machinery.
pub type UpdateQueue = Opaque;

/// Committed component state.
pub type MemoizedState = Opaque;

/// Host-attached handle.
pub type Ref = Opaque;

// =============================================================================
// Components and Elements
// =============================================================================

/// Render function of a function component.
pub type RenderFn = Rc<dyn Fn(&Props) -> Option<Element>>;

/// A function component: a name for diagnostics plus its render function.
///
/// Identity is the render function pointer, so two components compare equal
/// only if they share it.
#[derive(Clone)]
pub struct Component {
    pub name: String,
    pub render: RenderFn,
}

impl Component {
    pub fn new(name: impl Into<String>, render: impl Fn(&Props) -> Option<Element> + 'static) -> Self {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// The `type` of a declarative element, as handed over by the producer.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// String type, e.g. `"div"`.
    Host(String),
    /// Callable type.
    Function(Component),
    /// Anything else the producer sent along.
    Other(Value),
}

/// A declarative element: `{ type, key, props }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub element_type: ElementType,
    pub key: Option<Key>,
    pub props: Props,
}

impl Element {
    pub fn new(element_type: ElementType, props: Props) -> Self {
        Self {
            element_type,
            key: None,
            props,
        }
    }

    /// Host element, e.g. `Element::host("div", json!({ "id": "a" }))`.
    pub fn host(tag: impl Into<String>, props: impl Into<Props>) -> Self {
        Self::new(ElementType::Host(tag.into()), props.into())
    }

    /// Function component element.
    pub fn component(component: Component, props: impl Into<Props>) -> Self {
        Self::new(ElementType::Function(component), props.into())
    }

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }
}

// =============================================================================
// Fiber Payloads
// =============================================================================

/// A fiber's `type` field. Shape is fixed by the fiber's work tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FiberType {
    /// Not set yet, or a host root (which has no element type).
    #[default]
    Empty,
    Host(String),
    Function(Component),
    /// An unrecognized element type, kept verbatim.
    Unknown(Value),
}

impl From<ElementType> for FiberType {
    fn from(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Host(tag) => Self::Host(tag),
            ElementType::Function(component) => Self::Function(component),
            ElementType::Other(value) => Self::Unknown(value),
        }
    }
}

/// What a fiber's `stateNode` points at.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StateNode {
    #[default]
    None,
    /// The owning root of a host root fiber.
    Root(RootId),
    Host(HostInstance),
}
