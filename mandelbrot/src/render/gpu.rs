use std::{iter, mem, sync::mpsc};

use log::{debug, info, warn};
use shared::{bytemuck, Params, WORKGROUP_SIZE};

use super::Backend;
use crate::error::RenderError;

/// Runs the rust-gpu build of the kernel as a wgpu compute pass.
///
/// Device buffers are created on the first dispatch, kept while the pixel
/// count stays the same and replaced when it changes.
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    buffers: Option<FrameBuffers>,
}

struct FrameBuffers {
    pixels: u32,
    storage: wgpu::Buffer,
    staging: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Drop for FrameBuffers {
    fn drop(&mut self) {
        self.storage.destroy();
        self.staging.destroy();
    }
}

impl GpuBackend {
    pub fn new() -> Result<Self, RenderError> {
        pollster::block_on(Self::init())
    }

    async fn init() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        let adapter_limits = adapter.limits();
        info!("using GPU adapter {:?}", adapter.get_info().name);

        let features = wgpu::Features::PUSH_CONSTANTS | wgpu::Features::SHADER_F64;
        let limits = wgpu::Limits {
            max_push_constant_size: 128,
            max_storage_buffer_binding_size: adapter_limits.max_storage_buffer_binding_size,
            max_buffer_size: adapter_limits.max_buffer_size,
            ..Default::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features,
                    limits,
                    label: Some("mandelbrot"),
                },
                None,
            )
            .await?;

        let shader = device.create_shader_module(wgpu::include_spirv!(env!("shader.spv")));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("counts"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let push_constant_range = wgpu::PushConstantRange {
            stages: wgpu::ShaderStages::COMPUTE,
            range: 0..mem::size_of::<Params>() as u32,
        };

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[push_constant_range],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("escape-time"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "main_cs",
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            buffers: None,
        })
    }

    fn allocate(&self, pixels: u32) -> Result<FrameBuffers, RenderError> {
        let size = pixels as u64 * mem::size_of::<u32>() as u64;
        let limits = self.device.limits();
        if size > limits.max_buffer_size || size > limits.max_storage_buffer_binding_size as u64 {
            return Err(RenderError::OutOfMemory {
                pixels: pixels as u64,
            });
        }
        debug!("allocating device buffers for {pixels} pixels ({size} bytes)");

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let storage = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("counts"),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("counts-readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: storage.as_entire_binding(),
            }],
        });

        if pollster::block_on(self.device.pop_error_scope()).is_some() {
            return Err(RenderError::OutOfMemory {
                pixels: pixels as u64,
            });
        }

        Ok(FrameBuffers {
            pixels,
            storage,
            staging,
            bind_group,
        })
    }
}

impl Backend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn dispatch(
        &mut self,
        params: &Params,
        block_size: u32,
        out: &mut [u32],
    ) -> Result<(), RenderError> {
        if block_size != WORKGROUP_SIZE {
            warn!("gpu workgroup size is fixed at {WORKGROUP_SIZE}, ignoring block size {block_size}");
        }

        let groups = params.pixels.div_ceil(WORKGROUP_SIZE);
        let max_groups = self.device.limits().max_compute_workgroups_per_dimension;
        let groups_x = groups.min(max_groups).max(1);
        let groups_y = groups.div_ceil(groups_x);

        let mut params = *params;
        params.dispatch_width = groups_x * WORKGROUP_SIZE;

        let buffers = match self.buffers.take() {
            Some(buffers) if buffers.pixels == params.pixels => buffers,
            stale => {
                // Release the old pair before asking for a new one.
                drop(stale);
                self.allocate(params.pixels)?
            }
        };
        let size = buffers.storage.size();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor { label: None });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &buffers.bind_group, &[]);
            pass.set_push_constants(0, bytemuck::bytes_of(&params));
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        encoder.copy_buffer_to_buffer(&buffers.storage, 0, &buffers.staging, 0, size);
        self.queue.submit(iter::once(encoder.finish()));

        let slice = buffers.staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv().unwrap_or(Err(wgpu::BufferAsyncError))?;

        {
            let mapped = slice.get_mapped_range();
            out.copy_from_slice(&bytemuck::cast_slice::<u8, u32>(&mapped)[..out.len()]);
        }
        buffers.staging.unmap();
        self.buffers = Some(buffers);

        Ok(())
    }
}
