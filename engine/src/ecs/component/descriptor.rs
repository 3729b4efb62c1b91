use std::{
    any::{Any, TypeId},
    fmt,
    ptr::NonNull,
};

use log::{debug, warn};

use crate::ecs::component::{Component, Id, Instance, Shape, id};

/// Writes a fully-initialized component value into the pointed-to buffer.
///
/// Contract: the pointer must be valid for writes of the descriptor's shape,
/// aligned to it, and uninitialized (any previous value is not dropped).
type InitFn = Box<dyn Fn(NonNull<u8>) + Send + Sync>;

/// The registered record for one component kind.
///
/// A descriptor binds a process-wide [`Id`], the [`Shape`] of the component's
/// data, a display name, and an initializer that materializes new values.
/// It is created once per distinct component kind, typically during
/// application bootstrap, and lives for the remainder of the process. Apart
/// from the display name it is never mutated after construction.
///
/// The descriptor owns no instances: every call to [`Descriptor::allocate`]
/// hands exclusive ownership of the new [`Instance`] to the caller.
pub struct Descriptor {
    /// The unique component type id.
    id: Id,

    /// The shape of the component's data.
    shape: Shape,

    /// The display name. Derived from the declared type name, overridable
    /// via [`Descriptor::set_name`].
    name: String,

    /// Initializes freshly allocated storage, either from the registered
    /// default value or from the type's `Default` impl. Captured at
    /// registration so the allocation path never branches on validity.
    init: InitFn,
}

impl Descriptor {
    /// Register a new component kind with no explicit default value.
    ///
    /// The shape and display name are derived from `T`; new instances are
    /// initialized with `T::default()`. Never fails.
    pub fn new<T: Component + Default>() -> Self {
        Self::new_in::<T>(id::allocator())
    }

    /// Register a new component kind with a type-erased default value.
    ///
    /// The supplied default must be a value of `T`; every allocated instance
    /// is initialized with a clone of it. A default of any other type is a
    /// configuration error: registration fails before an id is consumed, and
    /// the caller decides whether to abort, log, or retry with a corrected
    /// default.
    pub fn with_default<T: Component + Clone>(
        default: Box<dyn Any + Send + Sync>,
    ) -> Result<Self, DescriptorError> {
        Self::with_default_in::<T>(id::allocator(), default)
    }

    /// Registration with no default against a specific allocator.
    pub(crate) fn new_in<T: Component + Default>(ids: &id::Allocator) -> Self {
        let init: InitFn = Box::new(|dst| {
            // SAFETY: dst satisfies the InitFn contract for T's shape.
            unsafe { dst.cast::<T>().write(T::default()) }
        });
        Self::register::<T>(ids, init)
    }

    /// Registration with a default value against a specific allocator.
    ///
    /// Validates assignability before consuming an id, so a failed
    /// registration leaves the allocator untouched.
    pub(crate) fn with_default_in<T: Component + Clone>(
        ids: &id::Allocator,
        default: Box<dyn Any + Send + Sync>,
    ) -> Result<Self, DescriptorError> {
        let found = default.as_ref().type_id();
        let default = default
            .downcast::<T>()
            .map_err(|_| DescriptorError::DefaultNotAssignable {
                component: std::any::type_name::<T>(),
                expected: TypeId::of::<T>(),
                found,
            })?;

        let value = *default;
        let init: InitFn = Box::new(move |dst| {
            // SAFETY: dst satisfies the InitFn contract for T's shape.
            unsafe { dst.cast::<T>().write(value.clone()) }
        });
        Ok(Self::register::<T>(ids, init))
    }

    /// Shared registration tail: capture the shape, derive the display name,
    /// and consume a fresh id.
    fn register<T: Component>(ids: &id::Allocator, init: InitFn) -> Self {
        let shape = Shape::of::<T>();
        let name = display_name(shape.type_name()).to_string();
        let id = ids.next();
        debug!("registered component type '{}' as {:?}", name, id);
        Self {
            id,
            shape,
            name,
            init,
        }
    }

    /// Get the component type id.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the shape of the component's data.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Override the display name, returning the descriptor for chaining.
    ///
    /// The only validation is non-emptiness: an empty name is ignored with a
    /// warning. Later calls simply overwrite. The id is unaffected.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if name.is_empty() {
            warn!(
                "ignoring empty display name for component type {:?} ('{}')",
                self.id, self.name
            );
            return self;
        }
        self.name = name;
        self
    }

    /// Allocate a new, independently owned instance of this component kind.
    ///
    /// The returned instance is sized and aligned per the descriptor's shape
    /// and initialized from the registered default (or `T::default()` when
    /// none was registered). All validation happened at registration; this
    /// path never fails, and it is safe to call concurrently once the
    /// descriptor is constructed.
    pub fn allocate(&self) -> Instance {
        let mut instance = Instance::uninit(self.id, self.shape);
        (self.init)(instance.as_non_null());
        instance
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Derive a display name from a declared type name: the bare name of the
/// outermost type, with its module path stripped.
fn display_name(type_name: &'static str) -> &'static str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    match base.rfind("::") {
        Some(index) => &type_name[index + 2..],
        None => type_name,
    }
}

/// Error type for component type registration failures.
///
/// Registration failures are configuration errors: a mismatched default
/// indicates a programming mistake, not a transient condition, so there is
/// no local recovery path. The error carries enough context for the host to
/// log and exit cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorError {
    /// The supplied default value is not a value of the registered component
    /// type.
    DefaultNotAssignable {
        /// The declared name of the component type being registered.
        component: &'static str,
        /// The TypeId the default value was expected to have.
        expected: TypeId,
        /// The TypeId the default value actually had.
        found: TypeId,
    },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::DefaultNotAssignable { component, .. } => {
                write!(
                    f,
                    "default value is not assignable to component type: {}",
                    component
                )
            }
        }
    }
}

impl std::error::Error for DescriptorError {}
