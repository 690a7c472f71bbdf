//! # Graphics Context
//!
//! Creates the WebGPU instance, adapter, device and queue for headless rendering.
//! No window or surface is involved; frames are drawn into offscreen targets.

use log::info;
use wgpu::{Adapter, Device, Features, Instance, Queue};

use crate::core::StSystem;

use super::error::{RenderError, RenderResult};

/// Features the renderer cannot run without.
///
/// Multi-draw issues the whole draw list at once, and non-zero first instances let
/// each draw select its chunk record.
pub fn required_features() -> Features {
    Features::MULTI_DRAW_INDIRECT | Features::INDIRECT_FIRST_INSTANCE
}

/// Features enabled when the adapter has them.
///
/// Line polygon mode backs the wireframe pipeline.
pub fn optional_features() -> Features {
    Features::POLYGON_MODE_LINE
}

/// The features to request from a device on an adapter offering `adapter_features`.
///
/// # Errors
/// `RenderError::MissingFeatures` if any of [`required_features`] is absent.
pub fn device_features(adapter_features: Features) -> RenderResult<Features> {
    let required = required_features();
    if !adapter_features.contains(required) {
        return Err(RenderError::MissingFeatures(required));
    }
    Ok(required | (adapter_features & optional_features()))
}

/// Handles to the GPU used by every other system.
pub struct GraphicsContext {
    /// The WebGPU instance
    pub instance: Instance,
    /// The selected adapter
    pub adapter: Adapter,
    /// Shared handle to the logical device
    pub device: StSystem<Device>,
    /// Shared handle to the command queue
    pub queue: StSystem<Queue>,
}

impl GraphicsContext {
    /// Initializes the GPU without a presentation surface.
    ///
    /// Blocks on the adapter and device requests.
    ///
    /// # Errors
    /// Fails if no adapter is available, if the adapter lacks
    /// [`required_features`], or if the device request is rejected.
    pub fn new_headless() -> RenderResult<Self> {
        pollster::block_on(Self::create())
    }

    async fn create() -> RenderResult<Self> {
        // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::empty(),
            backend_options: wgpu::BackendOptions::from_env_or_default(),
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter '{}' ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let required_features = device_features(adapter.features())?;
        if !required_features.contains(optional_features()) {
            info!("Adapter has no line polygon mode, wireframe rendering is unavailable");
        }

        let adapter_limits = adapter.limits();
        let required_limits = wgpu::Limits {
            max_buffer_size: adapter_limits.max_buffer_size,
            max_storage_buffer_binding_size: adapter_limits.max_storage_buffer_binding_size,
            ..wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features,
                required_limits,
                label: Some("voxel_render_device"),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            instance,
            adapter,
            device: StSystem::new(Box::new(device)),
            queue: StSystem::new(Box::new(queue)),
        })
    }
}
