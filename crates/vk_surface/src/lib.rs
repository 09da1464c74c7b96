//! # vk_surface
//!
//! Typed Vulkan window-surface creation for Android (`VK_KHR_android_surface`)
//! and macOS (`VK_MVK_macos_surface`).
//!
//! - [`foreign`]: proxies for foreign-owned objects ([`ForeignRef`]) and
//!   caller-owned zeroed blocks ([`ForeignBlock`]), kept apart at the type level
//! - [`platform`]: one [`SurfacePlatform`] per window system; the build's
//!   platform is `ActivePlatform`
//! - [`bridge`]: the single foreign surface-creation call
//! - [`OwnedSurface`]: destroys the surface on drop
//! - [`instance`]: creates instances with the required extensions enabled
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vk_surface::{instance, ForeignRef, InstanceConfig, OwnedSurface, SurfacePlatform};
//!
//! fn present_to<P: SurfacePlatform>(window_address: usize) -> Result<(), Box<dyn std::error::Error>> {
//!     let entry = instance::load_entry()?;
//!     let instance = instance::create_instance::<P>(&entry, &InstanceConfig::default())?;
//!
//!     let window = unsafe { ForeignRef::<P::Window>::from_address(window_address) }
//!         .ok_or("no native window")?;
//!     let surface = unsafe { OwnedSurface::new::<P>(&entry, &instance, window, None)? };
//!
//!     drop(surface);
//!     unsafe { instance.destroy_instance(None) };
//!     Ok(())
//! }
//! ```
//!
//! On Android and macOS builds, `P` is `ActivePlatform`, and
//! `create_window_surface` makes the same call without naming it.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod foreign;
pub mod instance;
pub mod logging;
pub mod platform;
mod surface;

pub use bridge::{create_window_surface_for, create_window_surface_with, SurfaceEntryPoint, ENTRY_POINT_MISSING};
pub use config::{Config, ConfigError, InstanceConfig};
pub use error::{ForeignAllocError, SurfaceError, SurfaceResult};
pub use foreign::{pass_ref, ForeignBlock, ForeignRef};
pub use platform::{CreateSurfaceFn, SurfacePlatform};
pub use surface::OwnedSurface;

#[cfg(any(target_os = "android", target_os = "macos"))]
pub use platform::ActivePlatform;

/// Surface-creation entry point of the build's platform
#[cfg(any(target_os = "android", target_os = "macos"))]
pub type ActiveSurfaceEntryPoint = SurfaceEntryPoint<ActivePlatform>;

/// Instance extensions the build's platform needs for surface creation
#[cfg(any(target_os = "android", target_os = "macos"))]
pub fn required_instance_extensions() -> [&'static std::ffi::CStr; 2] {
    ActivePlatform::required_instance_extensions()
}

/// Create a surface for a native window of the build's platform.
///
/// Resolves the platform's entry point for `instance` and makes the single
/// foreign call. The status code comes back unchanged; if the entry point is
/// missing the result is [`ENTRY_POINT_MISSING`]
/// (`VK_ERROR_EXTENSION_NOT_PRESENT`) and `surface` is left untouched. On
/// success the caller owns the surface and must destroy it with
/// `vkDestroySurfaceKHR` before destroying `instance`.
///
/// # Safety
///
/// Same as [`create_window_surface_for`].
#[cfg(any(target_os = "android", target_os = "macos"))]
pub unsafe fn create_window_surface(
    entry: &ash::Entry,
    instance: &ash::Instance,
    window: ForeignRef<'_, <ActivePlatform as SurfacePlatform>::Window>,
    allocation_callbacks: Option<&ash::vk::AllocationCallbacks>,
    surface: &mut ash::vk::SurfaceKHR,
) -> ash::vk::Result {
    // SAFETY: forwarded to the caller's contract.
    unsafe { create_window_surface_for::<ActivePlatform>(entry, instance, window, allocation_callbacks, surface) }
}
