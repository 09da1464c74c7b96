//! `VK_MVK_macos_surface`: MoltenVK surfaces for an AppKit `NSView`

use std::ffi::CStr;
use std::ptr;

use ash::extensions::mvk;
use ash::vk;
use raw_window_handle::RawWindowHandle;

use crate::error::{SurfaceError, SurfaceResult};
use crate::foreign::{ForeignRef, NSView};
use crate::platform::{raw_handle_kind, SurfacePlatform};

/// macOS window system via MoltenVK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacOs {}

impl SurfacePlatform for MacOs {
    const NAME: &'static str = "macos";
    const STRUCTURE_TYPE: vk::StructureType = vk::StructureType::MACOS_SURFACE_CREATE_INFO_MVK;
    const ENTRY_POINT: &'static CStr = c"vkCreateMacOSSurfaceMVK";
    const EXTENSION_SPEC_VERSION: u32 = 1;

    type Window = NSView;
    type CreateInfo = vk::MacOSSurfaceCreateInfoMVK;

    fn extension_name() -> &'static CStr {
        mvk::MacOSSurface::name()
    }

    fn surface_request(window: ForeignRef<'_, NSView>) -> vk::MacOSSurfaceCreateInfoMVK {
        vk::MacOSSurfaceCreateInfoMVK {
            s_type: Self::STRUCTURE_TYPE,
            p_next: ptr::null(),
            flags: vk::MacOSSurfaceCreateFlagsMVK::empty(),
            p_view: window.as_ptr().cast_const().cast(),
        }
    }

    unsafe fn window_from_raw<'a>(handle: RawWindowHandle) -> SurfaceResult<ForeignRef<'a, NSView>> {
        let RawWindowHandle::AppKit(appkit) = handle else {
            return Err(SurfaceError::UnsupportedWindowHandle {
                kind: raw_handle_kind(&handle),
            });
        };
        // The view, not the window, carries the layer MoltenVK renders into.
        // SAFETY: the caller keeps the view alive for 'a.
        unsafe { ForeignRef::from_ptr(appkit.ns_view.cast()) }
            .ok_or(SurfaceError::UnsupportedWindowHandle { kind: "null NSView" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{AndroidNdkWindowHandle, AppKitWindowHandle};

    #[test]
    fn test_request_fields() {
        let view = unsafe { ForeignRef::<NSView>::from_address(0x6000_0040) }.unwrap();
        let request = MacOs::surface_request(view);

        assert_eq!(request.s_type, vk::StructureType::MACOS_SURFACE_CREATE_INFO_MVK);
        assert!(request.p_next.is_null());
        assert_eq!(request.flags.as_raw(), 0);
        assert_eq!(request.p_view as usize, 0x6000_0040);
    }

    #[test]
    fn test_view_from_appkit_handle() {
        let mut appkit = AppKitWindowHandle::empty();
        appkit.ns_window = 0x1000 as *mut _;
        appkit.ns_view = 0x2000 as *mut _;

        let view = unsafe { MacOs::window_from_raw(RawWindowHandle::AppKit(appkit)) }.unwrap();
        assert_eq!(view.address(), 0x2000);
    }

    #[test]
    fn test_missing_view_is_rejected() {
        let mut appkit = AppKitWindowHandle::empty();
        appkit.ns_window = 0x1000 as *mut _;
        let result = unsafe { MacOs::window_from_raw(RawWindowHandle::AppKit(appkit)) };
        assert!(matches!(result, Err(SurfaceError::UnsupportedWindowHandle { .. })));
    }

    #[test]
    fn test_android_handle_is_rejected() {
        let ndk = AndroidNdkWindowHandle::empty();
        let result = unsafe { MacOs::window_from_raw(RawWindowHandle::AndroidNdk(ndk)) };
        match result {
            Err(SurfaceError::UnsupportedWindowHandle { kind }) => assert_eq!(kind, "AndroidNdk"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
