//! Shader Loading Utilities
//!
//! WGSL sources are embedded at compile time and checked with naga before a
//! wgpu module is created, so a broken shader is reported with its compiler
//! log instead of surfacing later as a device error.

use super::error::RenderError;

/// Cube mesh shader (vs_main / fs_main).
pub const CUBE_SHADER: &str = include_str!("../../../shaders/cube.wgsl");

/// Parse and validate WGSL source.
pub fn validate_wgsl(label: &str, source: &str) -> Result<naga::Module, RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| RenderError::ShaderCompilation {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| RenderError::ShaderCompilation {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    Ok(module)
}

/// Validate `source`, then create the wgpu shader module.
pub fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    validate_wgsl(label, source)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}
