//! Borrowed references to foreign-owned objects

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Non-owning, non-null reference to an object whose memory the foreign
/// system owns.
///
/// The Rust side never reads through this pointer; it is only forwarded to
/// foreign calls. There is no way to free the target through a
/// `ForeignRef`.
#[repr(transparent)]
pub struct ForeignRef<'a, T> {
    ptr: NonNull<T>,
    _borrow: PhantomData<&'a T>,
}

impl<'a, T> ForeignRef<'a, T> {
    /// Wrap an address obtained from elsewhere, typically a windowing toolkit.
    ///
    /// Returns `None` for the null address.
    ///
    /// # Safety
    ///
    /// A non-null `address` must point to a live foreign object of type `T`
    /// that stays alive for `'a`. Nothing here checks that.
    pub unsafe fn from_address(address: usize) -> Option<Self> {
        // SAFETY: forwarded to the caller's contract.
        unsafe { Self::from_ptr(address as *mut T) }
    }

    /// Wrap a raw pointer obtained from elsewhere.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// Same contract as [`ForeignRef::from_address`].
    pub unsafe fn from_ptr(ptr: *mut T) -> Option<Self> {
        NonNull::new(ptr).map(Self::from_non_null)
    }

    pub(crate) const fn from_non_null(ptr: NonNull<T>) -> Self {
        Self {
            ptr,
            _borrow: PhantomData,
        }
    }

    /// The raw pointer, for handing to a foreign call
    pub const fn as_ptr(self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// The address as an integer
    pub fn address(self) -> usize {
        self.ptr.as_ptr() as usize
    }
}

impl<T> Clone for ForeignRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ForeignRef<'_, T> {}

impl<T> PartialEq for ForeignRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for ForeignRef<'_, T> {}

impl<T> fmt::Debug for ForeignRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignRef<{}>({:p})", std::any::type_name::<T>(), self.ptr)
    }
}
