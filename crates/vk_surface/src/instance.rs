//! Surface-capable instance creation
//!
//! Creates an `ash::Instance` with the extensions a platform needs for
//! surface creation, and reports which of them the installed loader offers.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use ash::vk;
use log::{debug, info, warn};

use crate::config::InstanceConfig;
use crate::error::{SurfaceError, SurfaceResult};
use crate::platform::SurfacePlatform;

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";
const PORTABILITY_ENUMERATION: &CStr = c"VK_KHR_portability_enumeration";
const ENGINE_NAME: &CStr = c"vk_surface";

/// Whether one required extension is offered by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionSupport {
    /// Extension name
    pub name: &'static CStr,
    /// Whether the loader lists it
    pub supported: bool,
}

/// Load the system Vulkan loader
///
/// # Errors
///
/// [`SurfaceError::Loading`] if no loader library can be found.
pub fn load_entry() -> SurfaceResult<ash::Entry> {
    // SAFETY: the loader is only unloaded when the returned Entry is dropped.
    unsafe { ash::Entry::load() }.map_err(|e| SurfaceError::Loading(e.to_string()))
}

/// Check each of `P`'s required extensions against what `entry` offers
///
/// # Errors
///
/// [`SurfaceError::Api`] if the loader cannot enumerate extensions.
pub fn supported_extensions<P: SurfacePlatform>(entry: &ash::Entry) -> SurfaceResult<Vec<ExtensionSupport>> {
    let available = entry.enumerate_instance_extension_properties(None)?;
    Ok(check_support(&P::required_instance_extensions(), &available))
}

fn check_support(required: &[&'static CStr], available: &[vk::ExtensionProperties]) -> Vec<ExtensionSupport> {
    let available: Vec<&CStr> = available
        .iter()
        .filter_map(|properties| property_name(&properties.extension_name))
        .collect();

    required
        .iter()
        .map(|&name| ExtensionSupport {
            name,
            supported: available.contains(&name),
        })
        .collect()
}

fn property_name(raw: &[c_char]) -> Option<&CStr> {
    CStr::from_bytes_until_nul(bytemuck::cast_slice(raw)).ok()
}

/// Extensions to enable for `P`: the required ones first, then the
/// configured extras in order, without duplicates
///
/// # Errors
///
/// [`SurfaceError::InvalidName`] if an extra name contains a NUL byte.
pub fn enabled_extension_names<P: SurfacePlatform>(config: &InstanceConfig) -> SurfaceResult<Vec<CString>> {
    let mut names: Vec<CString> = P::required_instance_extensions()
        .iter()
        .map(|&name| name.to_owned())
        .collect();

    for extra in &config.extra_extensions {
        let name = CString::new(extra.as_str()).map_err(|_| SurfaceError::InvalidName(extra.clone()))?;
        if !names.contains(&name) {
            names.push(name);
        }
    }

    Ok(names)
}

/// Create an instance that can create surfaces on platform `P`
///
/// The validation layer is skipped with a warning when requested but not
/// installed.
///
/// # Errors
///
/// [`SurfaceError::InvalidName`] for names with interior NULs, or
/// [`SurfaceError::Api`] if the loader rejects the instance.
pub fn create_instance<P: SurfacePlatform>(entry: &ash::Entry, config: &InstanceConfig) -> SurfaceResult<ash::Instance> {
    let app_name = CString::new(config.application_name.as_str())
        .map_err(|_| SurfaceError::InvalidName(config.application_name.clone()))?;
    let app_info = vk::ApplicationInfo::builder()
        .application_name(&app_name)
        .application_version(config.packed_application_version())
        .engine_name(ENGINE_NAME)
        .engine_version(vk::make_api_version(0, 0, 1, 0))
        .api_version(config.packed_api_version());

    let extensions = enabled_extension_names::<P>(config)?;
    let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();

    let layers = if config.enable_validation && layer_available(entry, VALIDATION_LAYER)? {
        vec![VALIDATION_LAYER.as_ptr()]
    } else {
        if config.enable_validation {
            warn!("{:?} requested but not installed; continuing without it", VALIDATION_LAYER);
        }
        Vec::new()
    };

    let flags = if extensions.iter().any(|name| name.as_c_str() == PORTABILITY_ENUMERATION) {
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    };

    let create_info = vk::InstanceCreateInfo::builder()
        .flags(flags)
        .application_info(&app_info)
        .enabled_extension_names(&extension_ptrs)
        .enabled_layer_names(&layers);

    info!(
        "Creating {} surface instance for {:?} with extensions {:?}",
        P::NAME,
        app_name,
        extensions
    );

    // SAFETY: every pointer in `create_info` outlives the call.
    let instance = unsafe { entry.create_instance(&create_info, None) }?;
    debug!("Instance {:?} created", instance.handle());
    Ok(instance)
}

fn layer_available(entry: &ash::Entry, layer: &CStr) -> SurfaceResult<bool> {
    let layers = entry.enumerate_instance_layer_properties()?;
    Ok(layers
        .iter()
        .any(|properties| property_name(&properties.layer_name) == Some(layer)))
}
