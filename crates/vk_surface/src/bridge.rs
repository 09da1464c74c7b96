//! The surface-creation call itself
//!
//! [`create_window_surface_with`] builds the platform's request struct and
//! makes exactly one foreign call. It does not retry, log, or interpret the
//! returned status code.
//!
//! A successfully created `VkSurfaceKHR` belongs to the caller and must be
//! destroyed with `vkDestroySurfaceKHR` before the instance is destroyed.
//! [`OwnedSurface`](crate::OwnedSurface) does that automatically.

use std::fmt;
use std::ptr;

use ash::vk;
use log::debug;

use crate::error::{SurfaceError, SurfaceResult};
use crate::foreign::ForeignRef;
use crate::platform::{CreateSurfaceFn, SurfacePlatform};

/// Create a surface for `window` by calling `create_surface` once.
///
/// Returns the foreign status code unchanged. On `vk::Result::SUCCESS`,
/// `surface` holds a handle the caller owns; on any other code its contents
/// must not be used.
///
/// # Safety
///
/// - `create_surface` must be `P::ENTRY_POINT` resolved for `instance`.
/// - `instance` must be a live, non-null instance that no other thread
///   destroys during the call.
/// - `window` must reference a live native window of `P`'s kind.
/// - `allocation_callbacks`, if present, must satisfy Vulkan's allocator rules.
pub unsafe fn create_window_surface_with<P: SurfacePlatform>(
    create_surface: CreateSurfaceFn<P::CreateInfo>,
    instance: vk::Instance,
    window: ForeignRef<'_, P::Window>,
    allocation_callbacks: Option<&vk::AllocationCallbacks>,
    surface: &mut vk::SurfaceKHR,
) -> vk::Result {
    debug_assert_ne!(instance, vk::Instance::null());

    let request = P::surface_request(window);
    let p_allocator = allocation_callbacks.map_or(ptr::null(), ptr::from_ref);

    // SAFETY: forwarded to the caller's contract; `request` outlives the call.
    unsafe { create_surface(instance, &request, p_allocator, surface) }
}

/// Status returned by [`create_window_surface_for`] when the instance does not
/// expose the platform's surface-creation command
pub const ENTRY_POINT_MISSING: vk::Result = vk::Result::ERROR_EXTENSION_NOT_PRESENT;

/// Resolve `P`'s entry point for `instance` and create a surface for `window`.
///
/// Returns the foreign status code unchanged, or [`ENTRY_POINT_MISSING`] without
/// touching `surface` if the entry point cannot be resolved (usually because
/// `P`'s surface extension was not enabled on `instance`). On
/// `vk::Result::SUCCESS` the caller owns the surface and must destroy it with
/// `vkDestroySurfaceKHR` before destroying `instance`.
///
/// # Safety
///
/// - `instance` must be a live instance created from `entry` that no other
///   thread destroys during the call.
/// - `window` must reference a live native window of `P`'s kind.
/// - `allocation_callbacks`, if present, must satisfy Vulkan's allocator rules.
pub unsafe fn create_window_surface_for<P: SurfacePlatform>(
    entry: &ash::Entry,
    instance: &ash::Instance,
    window: ForeignRef<'_, P::Window>,
    allocation_callbacks: Option<&vk::AllocationCallbacks>,
    surface: &mut vk::SurfaceKHR,
) -> vk::Result {
    let entry_point = SurfaceEntryPoint::<P>::load(entry, instance);
    // SAFETY: forwarded to the caller's contract.
    unsafe { create_with_loaded(entry_point, window, allocation_callbacks, surface) }
}

unsafe fn create_with_loaded<P: SurfacePlatform>(
    entry_point: SurfaceResult<SurfaceEntryPoint<P>>,
    window: ForeignRef<'_, P::Window>,
    allocation_callbacks: Option<&vk::AllocationCallbacks>,
    surface: &mut vk::SurfaceKHR,
) -> vk::Result {
    match entry_point {
        // SAFETY: forwarded to the caller's contract.
        Ok(entry_point) => unsafe { entry_point.create_window_surface(window, allocation_callbacks, surface) },
        Err(_) => ENTRY_POINT_MISSING,
    }
}

/// A platform's surface-creation command resolved for one instance
pub struct SurfaceEntryPoint<P: SurfacePlatform> {
    instance: vk::Instance,
    create_surface: CreateSurfaceFn<P::CreateInfo>,
}

impl<P: SurfacePlatform> SurfaceEntryPoint<P> {
    /// Resolve `P::ENTRY_POINT` through `vkGetInstanceProcAddr`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::EntryPointMissing`] if the loader returns null, which
    /// usually means the platform extension was not enabled on `instance`.
    pub fn load(entry: &ash::Entry, instance: &ash::Instance) -> SurfaceResult<Self> {
        let handle = instance.handle();
        // SAFETY: `instance` is a live instance created from `entry`, and
        // ENTRY_POINT is NUL-terminated.
        let address = unsafe { entry.get_instance_proc_addr(handle, P::ENTRY_POINT.as_ptr()) };

        let Some(address) = address else {
            return Err(SurfaceError::EntryPointMissing {
                name: P::ENTRY_POINT.to_string_lossy().into_owned(),
            });
        };

        // SAFETY: the loader returned the command named ENTRY_POINT, whose
        // signature is CreateSurfaceFn<P::CreateInfo>.
        let create_surface = unsafe {
            std::mem::transmute::<unsafe extern "system" fn(), CreateSurfaceFn<P::CreateInfo>>(address)
        };

        debug!("Resolved {:?} for {} surfaces", P::ENTRY_POINT, P::NAME);

        Ok(Self {
            instance: handle,
            create_surface,
        })
    }

    /// Use an already-resolved entry point, for custom loaders.
    ///
    /// # Safety
    ///
    /// `create_surface` must have `P::ENTRY_POINT`'s semantics for `instance`.
    pub const unsafe fn from_raw(
        instance: vk::Instance,
        create_surface: CreateSurfaceFn<P::CreateInfo>,
    ) -> Self {
        Self {
            instance,
            create_surface,
        }
    }

    /// Instance the entry point was resolved for
    pub const fn instance(&self) -> vk::Instance {
        self.instance
    }

    /// Create a surface for `window`, returning the raw status code.
    ///
    /// See [`create_window_surface_with`] for the result contract.
    ///
    /// # Safety
    ///
    /// The instance must still be alive, `window` must reference a live
    /// native window, and `allocation_callbacks` must satisfy Vulkan's
    /// allocator rules.
    pub unsafe fn create_window_surface(
        &self,
        window: ForeignRef<'_, P::Window>,
        allocation_callbacks: Option<&vk::AllocationCallbacks>,
        surface: &mut vk::SurfaceKHR,
    ) -> vk::Result {
        // SAFETY: forwarded to the caller's contract.
        unsafe {
            create_window_surface_with::<P>(
                self.create_surface,
                self.instance,
                window,
                allocation_callbacks,
                surface,
            )
        }
    }

    /// Like [`SurfaceEntryPoint::create_window_surface`], but returns the
    /// handle or the status code as an error.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Api`] carrying the foreign status code unchanged.
    ///
    /// # Safety
    ///
    /// Same as [`SurfaceEntryPoint::create_window_surface`].
    pub unsafe fn try_create_window_surface(
        &self,
        window: ForeignRef<'_, P::Window>,
        allocation_callbacks: Option<&vk::AllocationCallbacks>,
    ) -> SurfaceResult<vk::SurfaceKHR> {
        let mut surface = vk::SurfaceKHR::null();
        // SAFETY: forwarded to the caller's contract.
        match unsafe { self.create_window_surface(window, allocation_callbacks, &mut surface) } {
            vk::Result::SUCCESS => Ok(surface),
            code => Err(SurfaceError::Api(code)),
        }
    }
}

impl<P: SurfacePlatform> Clone for SurfaceEntryPoint<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: SurfacePlatform> Copy for SurfaceEntryPoint<P> {}

impl<P: SurfacePlatform> fmt::Debug for SurfaceEntryPoint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceEntryPoint")
            .field("platform", &P::NAME)
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foreign::{ANativeWindow, NSView};
    use crate::platform::{Android, MacOs};
    use ash::vk::Handle;
    use std::cell::Cell;

    const STUB_SURFACE: u64 = 0xfeed_0001;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct SeenRequest {
        instance: u64,
        s_type: vk::StructureType,
        next_is_null: bool,
        flags: u32,
        window: usize,
        allocator: usize,
    }

    thread_local! {
        static SEEN: Cell<Option<SeenRequest>> = const { Cell::new(None) };
    }

    fn take_seen() -> SeenRequest {
        SEEN.with(Cell::take).expect("stub was not called")
    }

    unsafe extern "system" fn android_success(
        instance: vk::Instance,
        p_create_info: *const vk::AndroidSurfaceCreateInfoKHR,
        p_allocator: *const vk::AllocationCallbacks,
        p_surface: *mut vk::SurfaceKHR,
    ) -> vk::Result {
        let info = unsafe { &*p_create_info };
        SEEN.with(|seen| {
            seen.set(Some(SeenRequest {
                instance: instance.as_raw(),
                s_type: info.s_type,
                next_is_null: info.p_next.is_null(),
                flags: info.flags.as_raw(),
                window: info.window as usize,
                allocator: p_allocator as usize,
            }));
        });
        unsafe { *p_surface = vk::SurfaceKHR::from_raw(STUB_SURFACE) };
        vk::Result::SUCCESS
    }

    unsafe extern "system" fn android_window_in_use(
        _instance: vk::Instance,
        _p_create_info: *const vk::AndroidSurfaceCreateInfoKHR,
        _p_allocator: *const vk::AllocationCallbacks,
        _p_surface: *mut vk::SurfaceKHR,
    ) -> vk::Result {
        vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR
    }

    unsafe extern "system" fn macos_success(
        instance: vk::Instance,
        p_create_info: *const vk::MacOSSurfaceCreateInfoMVK,
        p_allocator: *const vk::AllocationCallbacks,
        p_surface: *mut vk::SurfaceKHR,
    ) -> vk::Result {
        let info = unsafe { &*p_create_info };
        SEEN.with(|seen| {
            seen.set(Some(SeenRequest {
                instance: instance.as_raw(),
                s_type: info.s_type,
                next_is_null: info.p_next.is_null(),
                flags: info.flags.as_raw(),
                window: info.p_view as usize,
                allocator: p_allocator as usize,
            }));
        });
        unsafe { *p_surface = vk::SurfaceKHR::from_raw(STUB_SURFACE + 1) };
        vk::Result::SUCCESS
    }

    unsafe extern "system" fn macos_out_of_memory(
        _instance: vk::Instance,
        _p_create_info: *const vk::MacOSSurfaceCreateInfoMVK,
        _p_allocator: *const vk::AllocationCallbacks,
        _p_surface: *mut vk::SurfaceKHR,
    ) -> vk::Result {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY
    }

    fn test_instance() -> vk::Instance {
        vk::Instance::from_raw(0x1234_5678)
    }

    fn android_window(address: usize) -> ForeignRef<'static, ANativeWindow> {
        unsafe { ForeignRef::from_address(address) }.unwrap()
    }

    fn macos_view(address: usize) -> ForeignRef<'static, NSView> {
        unsafe { ForeignRef::from_address(address) }.unwrap()
    }

    #[test]
    fn test_android_request_is_well_formed() {
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe {
            create_window_surface_with::<Android>(
                android_success,
                test_instance(),
                android_window(0xa000),
                None,
                &mut surface,
            )
        };

        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(
            take_seen(),
            SeenRequest {
                instance: 0x1234_5678,
                s_type: vk::StructureType::ANDROID_SURFACE_CREATE_INFO_KHR,
                next_is_null: true,
                flags: 0,
                window: 0xa000,
                allocator: 0,
            }
        );
    }

    #[test]
    fn test_macos_request_is_well_formed() {
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe {
            create_window_surface_with::<MacOs>(
                macos_success,
                test_instance(),
                macos_view(0xb000),
                None,
                &mut surface,
            )
        };

        assert_eq!(result, vk::Result::SUCCESS);
        let seen = take_seen();
        assert_eq!(seen.s_type, vk::StructureType::MACOS_SURFACE_CREATE_INFO_MVK);
        assert!(seen.next_is_null);
        assert_eq!(seen.flags, 0);
        assert_eq!(seen.window, 0xb000);
    }

    #[test]
    fn test_success_populates_out_surface() {
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe {
            create_window_surface_with::<Android>(
                android_success,
                test_instance(),
                android_window(0xa000),
                None,
                &mut surface,
            )
        };
        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(surface.as_raw(), STUB_SURFACE);
    }

    #[test]
    fn test_failure_code_is_propagated() {
        let mut surface = vk::SurfaceKHR::null();
        let android = unsafe {
            create_window_surface_with::<Android>(
                android_window_in_use,
                test_instance(),
                android_window(0xa000),
                None,
                &mut surface,
            )
        };
        let macos = unsafe {
            create_window_surface_with::<MacOs>(
                macos_out_of_memory,
                test_instance(),
                macos_view(0xb000),
                None,
                &mut surface,
            )
        };

        assert_eq!(android, vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR);
        assert_eq!(macos, vk::Result::ERROR_OUT_OF_HOST_MEMORY);
    }

    #[test]
    fn test_allocation_callbacks_are_forwarded() {
        let callbacks = vk::AllocationCallbacks::default();
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe {
            create_window_surface_with::<Android>(
                android_success,
                test_instance(),
                android_window(0xa000),
                Some(&callbacks),
                &mut surface,
            )
        };
        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(take_seen().allocator, ptr::from_ref(&callbacks) as usize);
    }

    #[test]
    fn test_entry_point_wraps_instance() {
        let entry_point = unsafe { SurfaceEntryPoint::<MacOs>::from_raw(test_instance(), macos_success) };
        let surface = unsafe { entry_point.try_create_window_surface(macos_view(0xc000), None) }.unwrap();

        assert_eq!(surface.as_raw(), STUB_SURFACE + 1);
        let seen = take_seen();
        assert_eq!(seen.instance, 0x1234_5678);
        assert_eq!(seen.window, 0xc000);
    }

    #[test]
    fn test_loaded_entry_point_is_called_once() {
        let entry_point = unsafe { SurfaceEntryPoint::<Android>::from_raw(test_instance(), android_success) };
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe { create_with_loaded(Ok(entry_point), android_window(0xd000), None, &mut surface) };

        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(surface.as_raw(), STUB_SURFACE);
        assert_eq!(take_seen().window, 0xd000);
    }

    #[test]
    fn test_loaded_entry_point_failure_is_raw_code() {
        let entry_point = unsafe { SurfaceEntryPoint::<MacOs>::from_raw(test_instance(), macos_out_of_memory) };
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe { create_with_loaded(Ok(entry_point), macos_view(0xb000), None, &mut surface) };

        assert_eq!(result, vk::Result::ERROR_OUT_OF_HOST_MEMORY);
    }

    #[test]
    fn test_missing_entry_point_reports_extension_not_present() {
        let missing = Err(SurfaceError::EntryPointMissing {
            name: Android::ENTRY_POINT.to_string_lossy().into_owned(),
        });
        let mut surface = vk::SurfaceKHR::null();
        let result = unsafe { create_with_loaded::<Android>(missing, android_window(0xa000), None, &mut surface) };

        assert_eq!(result, ENTRY_POINT_MISSING);
        assert_eq!(result, vk::Result::ERROR_EXTENSION_NOT_PRESENT);
        assert_eq!(surface, vk::SurfaceKHR::null());
        assert!(SEEN.with(Cell::take).is_none());
    }

    #[test]
    fn test_try_create_reports_code() {
        let entry_point =
            unsafe { SurfaceEntryPoint::<Android>::from_raw(test_instance(), android_window_in_use) };
        let result = unsafe { entry_point.try_create_window_surface(android_window(0xa000), None) };

        match result {
            Err(SurfaceError::Api(code)) => assert_eq!(code, vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
