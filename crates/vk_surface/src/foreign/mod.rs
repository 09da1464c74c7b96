//! Proxies for memory and objects owned on the other side of the FFI boundary
//!
//! Two kinds of proxy exist and are never interchangeable:
//!
//! - [`ForeignRef`] borrows an object the foreign system owns (a native window,
//!   for example). It has no release path.
//! - [`ForeignBlock`] owns a zero-initialized block the caller allocated. It is
//!   released exactly once when dropped.
//!
//! Opaque native types such as [`ANativeWindow`] are declared with
//! [`opaque_foreign_type!`] so each foreign resource kind gets its own nominal type.

mod block;
mod reference;

pub use block::{pass_ref, ForeignBlock};
pub use reference::ForeignRef;

/// Declares a zero-sized marker type standing in for an opaque C struct.
///
/// The generated type cannot be constructed, moved by value, or sent across
/// threads from safe code; it only ever appears behind a [`ForeignRef`].
macro_rules! opaque_foreign_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: ::std::marker::PhantomData<(*mut u8, ::std::marker::PhantomPinned)>,
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!(stringify!($name), "@{:p}"), self)
            }
        }
    };
}

opaque_foreign_type!(
    /// `ANativeWindow` from the Android NDK (`android/native_window.h`)
    ANativeWindow
);

opaque_foreign_type!(
    /// An AppKit `NSView` backed by a `CAMetalLayer`, as expected by MoltenVK
    NSView
);
