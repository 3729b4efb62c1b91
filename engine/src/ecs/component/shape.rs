use std::{alloc::Layout, any::TypeId, ptr::NonNull};

/// Structural metadata about a component kind.
///
/// A `Shape` is captured from a concrete Rust type at registration time and
/// carries everything needed to work with type-erased storage of that kind:
/// memory layout, runtime type identity, the declared type name, and a drop
/// function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    /// The memory layout of the component value.
    layout: Layout,

    /// The Rust TypeId for runtime type checking.
    type_id: TypeId,

    /// The declared type name of the component, including its module path.
    type_name: &'static str,

    /// The drop function for the value (may be a no-op).
    drop_fn: unsafe fn(NonNull<u8>),
}

impl Shape {
    /// Capture the shape of type `T`.
    pub fn of<T: 'static>() -> Self {
        let drop_fn = if std::mem::needs_drop::<T>() {
            Self::drop_impl::<T>
        } else {
            Self::drop_noop
        };
        Self {
            layout: Layout::new::<T>(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            drop_fn,
        }
    }

    /// Get the memory layout.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the declared type name, including its module path.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Get the size of the value in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Get the required alignment of the value in bytes.
    #[inline]
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Check if this is a zero-sized shape.
    #[inline]
    pub fn is_zero_sized(&self) -> bool {
        self.layout.size() == 0
    }

    /// Get the drop function.
    #[inline]
    pub fn drop_fn(&self) -> unsafe fn(NonNull<u8>) {
        self.drop_fn
    }

    /// Drop implementation for types that need drop.
    unsafe fn drop_impl<T>(ptr: NonNull<u8>) {
        unsafe {
            std::ptr::drop_in_place(ptr.as_ptr() as *mut T);
        }
    }

    /// No-op drop for types that don't need drop.
    unsafe fn drop_noop(_ptr: NonNull<u8>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position {
        #[allow(dead_code)]
        x: f32,
        #[allow(dead_code)]
        y: f32,
    }

    struct Tag;

    #[test]
    fn shape_captures_layout_and_identity() {
        // When
        let shape = Shape::of::<Position>();

        // Then
        assert_eq!(shape.layout(), Layout::new::<Position>());
        assert_eq!(shape.size(), std::mem::size_of::<Position>());
        assert_eq!(shape.align(), std::mem::align_of::<Position>());
        assert_eq!(shape.type_id(), TypeId::of::<Position>());
        assert!(shape.type_name().ends_with("Position"));
        assert!(!shape.is_zero_sized());
    }

    #[test]
    fn zero_sized_shape_is_detected() {
        // When
        let shape = Shape::of::<Tag>();

        // Then
        assert_eq!(shape.size(), 0);
        assert!(shape.is_zero_sized());
    }

    #[test]
    fn drop_function_runs_the_value_drop() {
        // Given
        use std::sync::atomic::{AtomicBool, Ordering};

        static DROP_CALLED: AtomicBool = AtomicBool::new(false);

        struct DropTracker;

        impl Drop for DropTracker {
            fn drop(&mut self) {
                DROP_CALLED.store(true, Ordering::Relaxed);
            }
        }

        let shape = Shape::of::<DropTracker>();
        let mut value = std::mem::ManuallyDrop::new(DropTracker);
        let ptr = NonNull::from(&mut *value).cast::<u8>();

        // When
        unsafe {
            (shape.drop_fn())(ptr);
        }

        // Then
        assert!(DROP_CALLED.load(Ordering::Relaxed));
    }
}
