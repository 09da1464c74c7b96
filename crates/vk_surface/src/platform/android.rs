//! `VK_KHR_android_surface`: surfaces for an NDK `ANativeWindow`

use std::ffi::CStr;
use std::ptr;

use ash::extensions::khr;
use ash::vk;
use raw_window_handle::RawWindowHandle;

use crate::error::{SurfaceError, SurfaceResult};
use crate::foreign::{ANativeWindow, ForeignRef};
use crate::platform::{raw_handle_kind, SurfacePlatform};

/// Android window system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Android {}

impl SurfacePlatform for Android {
    const NAME: &'static str = "android";
    const STRUCTURE_TYPE: vk::StructureType = vk::StructureType::ANDROID_SURFACE_CREATE_INFO_KHR;
    const ENTRY_POINT: &'static CStr = c"vkCreateAndroidSurfaceKHR";
    const EXTENSION_SPEC_VERSION: u32 = 6;

    type Window = ANativeWindow;
    type CreateInfo = vk::AndroidSurfaceCreateInfoKHR;

    fn extension_name() -> &'static CStr {
        khr::AndroidSurface::name()
    }

    fn surface_request(window: ForeignRef<'_, ANativeWindow>) -> vk::AndroidSurfaceCreateInfoKHR {
        vk::AndroidSurfaceCreateInfoKHR {
            s_type: Self::STRUCTURE_TYPE,
            p_next: ptr::null(),
            flags: vk::AndroidSurfaceCreateFlagsKHR::empty(),
            window: window.as_ptr().cast(),
        }
    }

    unsafe fn window_from_raw<'a>(
        handle: RawWindowHandle,
    ) -> SurfaceResult<ForeignRef<'a, ANativeWindow>> {
        let RawWindowHandle::AndroidNdk(android) = handle else {
            return Err(SurfaceError::UnsupportedWindowHandle {
                kind: raw_handle_kind(&handle),
            });
        };
        // SAFETY: the caller keeps the window alive for 'a.
        unsafe { ForeignRef::from_ptr(android.a_native_window.cast()) }
            .ok_or(SurfaceError::UnsupportedWindowHandle { kind: "null ANativeWindow" })
    }
}
