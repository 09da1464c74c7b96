//! Owned Vulkan surfaces
//!
//! Wraps a created `VkSurfaceKHR` so it is destroyed exactly once, before the
//! caller lets go of the instance.

use std::marker::PhantomData;

use ash::{extensions::khr, vk};
use raw_window_handle::RawWindowHandle;

use crate::bridge::SurfaceEntryPoint;
use crate::error::{SurfaceError, SurfaceResult};
use crate::foreign::ForeignRef;
use crate::platform::SurfacePlatform;

/// Vulkan surface wrapper for presentation
///
/// Borrows the instance it was created from, so the `ash::Instance` cannot be
/// moved or dropped while the surface is alive:
///
/// ```rust,no_run
/// use vk_surface::OwnedSurface;
///
/// fn adopt(entry: &ash::Entry, instance: ash::Instance, raw: ash::vk::SurfaceKHR) {
///     let surface = unsafe { OwnedSurface::from_raw(entry, &instance, raw, None) };
///     drop(surface);
///     unsafe { instance.destroy_instance(None) };
/// }
/// ```
///
/// ```rust,compile_fail
/// use vk_surface::OwnedSurface;
///
/// fn adopt(entry: &ash::Entry, instance: ash::Instance, raw: ash::vk::SurfaceKHR) {
///     let surface = unsafe { OwnedSurface::from_raw(entry, &instance, raw, None) };
///     drop(instance);
///     drop(surface);
/// }
/// ```
///
/// `ash::Instance::destroy_instance` only needs `&self`, so the borrow alone
/// cannot stop it; the constructors' safety contracts cover that case.
pub struct OwnedSurface<'i> {
    surface_loader: khr::Surface,
    surface: vk::SurfaceKHR,
    allocation_callbacks: Option<vk::AllocationCallbacks>,
    _instance: PhantomData<&'i ash::Instance>,
}

impl<'i> OwnedSurface<'i> {
    /// Create a surface for a native window of platform `P`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::EntryPointMissing`] if the platform extension is not
    /// enabled on `instance`, or [`SurfaceError::Api`] with the foreign status
    /// code if creation fails.
    ///
    /// # Safety
    ///
    /// - `instance` must be a live instance created from `entry`, and must
    ///   not be destroyed before the returned surface is dropped.
    /// - `window` must reference a live native window of `P`'s kind that
    ///   outlives the returned surface.
    /// - `allocation_callbacks` must satisfy Vulkan's allocator rules for the
    ///   surface's whole lifetime.
    pub unsafe fn new<P: SurfacePlatform>(
        entry: &ash::Entry,
        instance: &'i ash::Instance,
        window: ForeignRef<'_, P::Window>,
        allocation_callbacks: Option<vk::AllocationCallbacks>,
    ) -> SurfaceResult<Self> {
        let entry_point = SurfaceEntryPoint::<P>::load(entry, instance)?;
        // SAFETY: forwarded to the caller's contract.
        let surface = unsafe { entry_point.try_create_window_surface(window, allocation_callbacks.as_ref())? };

        // SAFETY: `surface` was just created from `instance`.
        Ok(unsafe { Self::from_raw(entry, instance, surface, allocation_callbacks) })
    }

    /// Create a surface from a windowing toolkit's raw handle.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::UnsupportedWindowHandle`] if `handle` is not a window
    /// of platform `P`, otherwise as [`OwnedSurface::new`].
    ///
    /// # Safety
    ///
    /// - `instance` must be a live instance created from `entry`, and must
    ///   not be destroyed before the returned surface is dropped.
    /// - The window behind `handle` must outlive the returned surface.
    pub unsafe fn from_raw_window_handle<P: SurfacePlatform>(
        entry: &ash::Entry,
        instance: &'i ash::Instance,
        handle: RawWindowHandle,
    ) -> SurfaceResult<Self> {
        // SAFETY: forwarded to the caller's contract.
        unsafe {
            let window = P::window_from_raw(handle)?;
            Self::new::<P>(entry, instance, window, None)
        }
    }

    /// Take ownership of a surface created elsewhere.
    ///
    /// # Safety
    ///
    /// - `surface` must have been created from `instance` with
    ///   `allocation_callbacks`, and nothing else may destroy it.
    /// - `instance` must not be destroyed before the returned surface is
    ///   dropped.
    pub unsafe fn from_raw(
        entry: &ash::Entry,
        instance: &'i ash::Instance,
        surface: vk::SurfaceKHR,
        allocation_callbacks: Option<vk::AllocationCallbacks>,
    ) -> Self {
        Self {
            surface_loader: khr::Surface::new(entry, instance),
            surface,
            allocation_callbacks,
            _instance: PhantomData,
        }
    }

    /// Get the underlying surface handle
    pub const fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Get the surface loader
    pub const fn loader(&self) -> &khr::Surface {
        &self.surface_loader
    }

    /// Give up ownership without destroying the surface
    #[must_use = "the returned surface must be destroyed with vkDestroySurfaceKHR"]
    pub fn into_raw(self) -> vk::SurfaceKHR {
        let surface = self.surface;
        std::mem::forget(self);
        surface
    }

    /// Check if a queue family supports presentation to this surface
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Api`] if the query fails.
    pub fn supports_present(&self, physical_device: vk::PhysicalDevice, queue_family_index: u32) -> SurfaceResult<bool> {
        // SAFETY: the surface is alive while `self` is.
        unsafe {
            self.surface_loader
                .get_physical_device_surface_support(physical_device, queue_family_index, self.surface)
                .map_err(SurfaceError::Api)
        }
    }

    /// Get surface capabilities for a physical device
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Api`] if the query fails.
    pub fn capabilities(&self, physical_device: vk::PhysicalDevice) -> SurfaceResult<vk::SurfaceCapabilitiesKHR> {
        // SAFETY: the surface is alive while `self` is.
        unsafe {
            self.surface_loader
                .get_physical_device_surface_capabilities(physical_device, self.surface)
                .map_err(SurfaceError::Api)
        }
    }
}

impl Drop for OwnedSurface<'_> {
    fn drop(&mut self) {
        // SAFETY: `self` owns the surface and destroys it exactly once.
        unsafe {
            self.surface_loader
                .destroy_surface(self.surface, self.allocation_callbacks.as_ref());
        }
    }
}

impl std::fmt::Debug for OwnedSurface<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedSurface")
            .field("surface", &self.surface)
            .field("custom_allocator", &self.allocation_callbacks.is_some())
            .finish_non_exhaustive()
    }
}
