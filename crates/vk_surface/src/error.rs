//! Error types for surface creation and foreign memory management

use ash::vk;
use thiserror::Error;

/// Failure to allocate a caller-owned foreign block
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignAllocError {
    /// The global allocator could not satisfy the request
    #[error("Out of memory: {count} element(s) of {element_size} bytes")]
    OutOfMemory {
        /// Number of elements requested
        count: usize,
        /// Size of a single element in bytes
        element_size: usize,
    },

    /// The requested block size does not fit in `isize`
    #[error("Capacity overflow: {count} element(s) of {element_size} bytes")]
    CapacityOverflow {
        /// Number of elements requested
        count: usize,
        /// Size of a single element in bytes
        element_size: usize,
    },
}

/// Surface-related error types
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The foreign call returned a non-success status code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// `vkGetInstanceProcAddr` returned null for a required entry point
    #[error("Entry point not available: {name}")]
    EntryPointMissing {
        /// Name of the Vulkan command that failed to resolve
        name: String,
    },

    /// A window handle of the wrong kind (or a null one) was supplied
    #[error("Unsupported window handle: {kind}")]
    UnsupportedWindowHandle {
        /// Short description of the handle variant that was received
        kind: &'static str,
    },

    /// The Vulkan loader library could not be loaded
    #[error("Failed to load Vulkan: {0}")]
    Loading(String),

    /// An extension or layer name contained an interior NUL byte
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Caller-owned foreign memory could not be allocated
    #[error(transparent)]
    Alloc(#[from] ForeignAllocError),
}

impl From<vk::Result> for SurfaceError {
    fn from(result: vk::Result) -> Self {
        Self::Api(result)
    }
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;
