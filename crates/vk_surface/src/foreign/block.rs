//! Caller-owned, zero-initialized foreign memory blocks

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use bytemuck::Zeroable;

use crate::error::ForeignAllocError;
use crate::foreign::ForeignRef;

/// A zero-initialized array of `T` owned by the caller and handed across the
/// FFI boundary by pointer.
///
/// Acquired by [`ForeignBlock::allocate`], released when dropped. Foreign
/// objects obtained by address are [`ForeignRef`]s instead and can never end
/// up here.
pub struct ForeignBlock<T: Zeroable> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// SAFETY: the block uniquely owns its elements, like `Box<[T]>`.
unsafe impl<T: Zeroable + Send> Send for ForeignBlock<T> {}
// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: Zeroable + Sync> Sync for ForeignBlock<T> {}

impl<T: Zeroable> ForeignBlock<T> {
    /// Allocate `count` zero-initialized elements.
    ///
    /// `count == 0` (or a zero-sized `T`) performs no allocation and yields an
    /// empty but valid block.
    pub fn allocate(count: usize) -> Result<Self, ForeignAllocError> {
        let element_size = std::mem::size_of::<T>();
        let layout = Layout::array::<T>(count)
            .map_err(|_| ForeignAllocError::CapacityOverflow { count, element_size })?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // SAFETY: layout has a non-zero size.
            let raw = unsafe { alloc::alloc_zeroed(layout) };
            NonNull::new(raw.cast::<T>())
                .ok_or(ForeignAllocError::OutOfMemory { count, element_size })?
        };

        Ok(Self {
            ptr,
            len: count,
            layout,
        })
    }

    /// Number of elements in the block
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the block holds no elements
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the block in bytes
    pub const fn size_in_bytes(&self) -> usize {
        self.layout.size()
    }

    /// Borrow the elements
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid (or dangling with len 0 / zero-sized T) and
        // every element was zero-initialized, which `Zeroable` makes valid.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Mutably borrow the elements
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Reference to the first element, or `None` for an empty block
    pub fn handle(&self) -> Option<ForeignRef<'_, T>> {
        (!self.is_empty()).then(|| self.first())
    }

    fn first(&self) -> ForeignRef<'_, T> {
        ForeignRef::from_non_null(self.ptr)
    }
}

impl<T: Zeroable> Drop for ForeignBlock<T> {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: allocated in `allocate` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
        }
    }
}

impl<T: Zeroable> fmt::Debug for ForeignBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("size_in_bytes", &self.layout.size())
            .finish()
    }
}

/// Reference to the value in `slot`, allocating one zeroed element first if
/// the slot is absent or empty.
///
/// For foreign APIs that need a non-null output slot whether or not the
/// caller pre-allocated one. The fresh block is stored back into `slot`, so
/// it is released together with it.
pub fn pass_ref<T: Zeroable>(
    slot: &mut Option<ForeignBlock<T>>,
) -> Result<ForeignRef<'_, T>, ForeignAllocError> {
    let block = match slot.take() {
        Some(block) if !block.is_empty() => block,
        _ => ForeignBlock::allocate(1)?,
    };
    Ok(slot.insert(block).first())
}
