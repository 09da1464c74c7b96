//! Platform variants of window-surface creation
//!
//! Every supported window system implements [`SurfacePlatform`]. Only the
//! variant matching `target_os` is compiled, and it is exposed as
//! `ActivePlatform`; there is no runtime branching between platforms. Test
//! and documentation builds compile every variant.

use std::ffi::CStr;
use std::os::raw::c_char;

use ash::extensions::khr;
use ash::vk;
use raw_window_handle::RawWindowHandle;

use crate::error::SurfaceResult;
use crate::foreign::ForeignRef;

#[cfg(any(test, doc, target_os = "android"))]
pub mod android;
#[cfg(any(test, doc, target_os = "macos"))]
pub mod macos;

#[cfg(any(test, doc, target_os = "android"))]
pub use android::Android;
#[cfg(any(test, doc, target_os = "macos"))]
pub use macos::MacOs;

/// Android builds create surfaces through `VK_KHR_android_surface`
#[cfg(target_os = "android")]
pub type ActivePlatform = Android;

/// macOS builds create surfaces through `VK_MVK_macos_surface`
#[cfg(target_os = "macos")]
pub type ActivePlatform = MacOs;

/// Signature shared by every `vkCreate*SurfaceKHR`-style entry point
pub type CreateSurfaceFn<I> = unsafe extern "system" fn(
    instance: vk::Instance,
    p_create_info: *const I,
    p_allocator: *const vk::AllocationCallbacks,
    p_surface: *mut vk::SurfaceKHR,
) -> vk::Result;

/// One window system's way of turning a native window into a `VkSurfaceKHR`
pub trait SurfacePlatform {
    /// Human-readable platform name, used in logs
    const NAME: &'static str;

    /// Discriminator tag the foreign call expects in `CreateInfo::s_type`
    const STRUCTURE_TYPE: vk::StructureType;

    /// Name of the surface-creation command, for `vkGetInstanceProcAddr`
    const ENTRY_POINT: &'static CStr;

    /// Spec version of the platform surface extension these bindings target
    const EXTENSION_SPEC_VERSION: u32;

    /// Opaque native window type the surface is bound to
    type Window;

    /// Native-layout request struct passed to the entry point
    type CreateInfo;

    /// Name of the platform surface extension
    fn extension_name() -> &'static CStr;

    /// Build the request for `window`: tag set, no chain, no flags.
    fn surface_request(window: ForeignRef<'_, Self::Window>) -> Self::CreateInfo;

    /// Extract this platform's native window from a windowing toolkit handle.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::UnsupportedWindowHandle`](crate::SurfaceError::UnsupportedWindowHandle)
    /// if `handle` belongs to another window system or carries a null window.
    ///
    /// # Safety
    ///
    /// The window referenced by `handle` must stay alive for `'a`.
    unsafe fn window_from_raw<'a>(
        handle: RawWindowHandle,
    ) -> SurfaceResult<ForeignRef<'a, Self::Window>>;

    /// Instance extensions needed to create surfaces on this platform, in
    /// the order they should be enabled
    fn required_instance_extensions() -> [&'static CStr; 2] {
        [khr::Surface::name(), Self::extension_name()]
    }

    /// [`SurfacePlatform::required_instance_extensions`] as pointers for
    /// `vk::InstanceCreateInfo::pp_enabled_extension_names`
    fn required_instance_extension_ptrs() -> [*const c_char; 2] {
        Self::required_instance_extensions().map(CStr::as_ptr)
    }
}

/// Short name of a `RawWindowHandle` variant for error messages
pub(crate) const fn raw_handle_kind(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::UiKit(_) => "UiKit",
        RawWindowHandle::AppKit(_) => "AppKit",
        RawWindowHandle::Orbital(_) => "Orbital",
        RawWindowHandle::Xlib(_) => "Xlib",
        RawWindowHandle::Xcb(_) => "Xcb",
        RawWindowHandle::Wayland(_) => "Wayland",
        RawWindowHandle::Drm(_) => "Drm",
        RawWindowHandle::Gbm(_) => "Gbm",
        RawWindowHandle::Win32(_) => "Win32",
        RawWindowHandle::WinRt(_) => "WinRt",
        RawWindowHandle::Web(_) => "Web",
        RawWindowHandle::AndroidNdk(_) => "AndroidNdk",
        RawWindowHandle::Haiku(_) => "Haiku",
        _ => "unknown",
    }
}
