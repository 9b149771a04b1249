//! Render error type.

use std::fmt;

/// Errors from GPU setup and shader compilation.
#[derive(Debug)]
pub enum RenderError {
    /// WGSL failed to parse or validate. `log` is the compiler diagnostic.
    ShaderCompilation { label: String, log: String },
    /// Window surface could not be created.
    CreateSurface(wgpu::CreateSurfaceError),
    /// No GPU adapter compatible with the surface.
    NoAdapter(wgpu::RequestAdapterError),
    /// Adapter refused to create a device.
    RequestDevice(wgpu::RequestDeviceError),
    /// Surface reports no supported texture formats.
    NoSurfaceFormat,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ShaderCompilation { label, log } => {
                write!(f, "shader '{}' failed to compile:\n{}", label, log)
            }
            RenderError::CreateSurface(e) => write!(f, "failed to create surface: {}", e),
            RenderError::NoAdapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            RenderError::RequestDevice(e) => write!(f, "failed to create GPU device: {}", e),
            RenderError::NoSurfaceFormat => write!(f, "surface has no supported formats"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::CreateSurface(e) => Some(e),
            RenderError::NoAdapter(e) => Some(e),
            RenderError::RequestDevice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::CreateSurface(e)
    }
}

impl From<wgpu::RequestAdapterError> for RenderError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        RenderError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::RequestDevice(e)
    }
}
