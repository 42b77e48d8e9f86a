pub mod program;

use std::{slice, mem};
use wgpu::util::DeviceExt;
use winit::window::Window;
use winit::dpi::PhysicalSize;
use log::{info, error};
use crate::{Result, Error};
use crate::shared::{Vertex, Globals};

pub use program::Program;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const SAMPLES: u32 = 4;
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
  r: 0.1,
  g: 0.1,
  b: 0.1,
  a: 1.0,
};

pub struct Renderer {
  pub surface: wgpu::Surface,
  pub device: wgpu::Device,
  pub queue: wgpu::Queue,
  pub textures: Textures,
  config: wgpu::SurfaceConfiguration,
  globals_buf: wgpu::Buffer,
  globals_bind_group: wgpu::BindGroup,
  pipeline_layout: wgpu::PipelineLayout,
  vert_buf: wgpu::Buffer,
  vert_count: u32,
}

impl Renderer {
  pub async fn init(window: &Window) -> Result<Self> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let surface =
      unsafe { instance.create_surface(window) }.map_err(|e| Error::Surface(e.to_string()))?;
    let adapter = instance
      .request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
      })
      .await
      .ok_or_else(|| Error::Context("no compatible graphics adapter".into()))?;
    let adapter_info = adapter.get_info();
    info!("Using {} ({:?})", adapter_info.name, adapter_info.backend);
    let (device, queue) = adapter
      .request_device(
        &wgpu::DeviceDescriptor {
          features: wgpu::Features::empty(),
          limits: adapter.limits(),
          label: None,
        },
        None,
      )
      .await
      .map_err(|e| Error::Context(e.to_string()))?;
    device.on_uncaptured_error(Box::new(|e| error!("Uncaptured wgpu error: {}", e)));

    let caps = surface.get_capabilities(&adapter);
    let format = caps
      .formats
      .iter()
      .copied()
      .find(|f| f.is_srgb())
      .or_else(|| caps.formats.first().copied())
      .ok_or_else(|| Error::Surface("surface is not supported by the adapter".into()))?;
    let size = window.inner_size();
    let config = wgpu::SurfaceConfiguration {
      usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
      format,
      width: size.width.max(1),
      height: size.height.max(1),
      // uncapped, shader edits show up without waiting on vsync
      present_mode: wgpu::PresentMode::AutoNoVsync,
      alpha_mode: wgpu::CompositeAlphaMode::Auto,
      view_formats: vec![],
    };
    surface.configure(&device, &config);
    let textures = Textures::new(&device, &config);

    let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
      size: mem::size_of::<Globals>() as _,
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
      label: Some("globals"),
    });
    let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      entries: &[wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT | wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
          ty: wgpu::BufferBindingType::Uniform,
          has_dynamic_offset: false,
          min_binding_size: None,
        },
        count: None,
      }],
      label: Some("globals"),
    });
    let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      layout: &globals_layout,
      entries: &[wgpu::BindGroupEntry {
        binding: 0,
        resource: globals_buf.as_entire_binding(),
      }],
      label: Some("globals"),
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
      bind_group_layouts: &[&globals_layout],
      push_constant_ranges: &[],
      label: None,
    });
    let vert_buf = device.create_buffer(&wgpu::BufferDescriptor {
      size: 0,
      usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
      label: Some("vertices"),
    });

    Ok(Self {
      surface,
      device,
      queue,
      textures,
      config,
      globals_buf,
      globals_bind_group,
      pipeline_layout,
      vert_buf,
      vert_count: 0,
    })
  }

  pub fn resize(&mut self, size: PhysicalSize<u32>) {
    if !drawable(size) {
      return;
    }
    self.config.width = size.width;
    self.config.height = size.height;
    self.surface.configure(&self.device, &self.config);
    self.textures = Textures::new(&self.device, &self.config);
  }

  /// Recovers a lost or outdated surface at the window's current size. A
  /// zero-sized window is left alone, configuring it would fail.
  pub fn reconfigure(&mut self, size: PhysicalSize<u32>) {
    if !drawable(size) {
      return;
    }
    if (size.width, size.height) == (self.config.width, self.config.height) {
      self.surface.configure(&self.device, &self.config);
    } else {
      self.resize(size);
    }
  }

  pub fn format(&self) -> wgpu::TextureFormat {
    self.config.format
  }

  /// Replaces the vertex buffer contents, growing the buffer if needed.
  pub fn upload_mesh(&mut self, vertices: &[Vertex]) {
    let data = cast_slice(vertices);
    if (self.vert_buf.size() as usize) < data.len() {
      self.vert_buf = self
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
          contents: data,
          usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
          label: Some("vertices"),
        });
    } else {
      self.queue.write_buffer(&self.vert_buf, 0, data);
    }
    self.vert_count = vertices.len() as _;
  }

  /// Clears, draws the current mesh once with `program` and presents.
  /// Without a linked render program only the clear happens.
  pub fn frame(
    &mut self,
    program: Option<&Program>,
    globals: &Globals,
  ) -> std::result::Result<(), wgpu::SurfaceError> {
    let surface = self.surface.get_current_texture()?;
    let surface_view = surface
      .texture
      .create_view(&wgpu::TextureViewDescriptor::default());
    self.queue.write_buffer(&self.globals_buf, 0, cast(globals));

    let mut encoder = self
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
    {
      let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
          view: &self.textures.fb,
          resolve_target: Some(&surface_view),
          ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(CLEAR_COLOR),
            store: wgpu::StoreOp::Store,
          },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
          view: &self.textures.depth,
          depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: wgpu::StoreOp::Store,
          }),
          stencil_ops: None,
        }),
        occlusion_query_set: None,
        timestamp_writes: None,
        label: None,
      });
      if let Some(Program::Render(pipeline)) = program {
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vert_buf.slice(..));
        render_pass.draw(0..self.vert_count, 0..1);
      }
    }
    self.queue.submit([encoder.finish()]);
    surface.present();
    Ok(())
  }
}

pub struct Textures {
  pub fb: wgpu::TextureView,
  pub depth: wgpu::TextureView,
}

impl Textures {
  fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
    let desc = wgpu::TextureDescriptor {
      size: wgpu::Extent3d {
        width: config.width,
        height: config.height,
        depth_or_array_layers: 1,
      },
      mip_level_count: 1,
      sample_count: SAMPLES,
      dimension: wgpu::TextureDimension::D2,
      format: config.format,
      usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
      view_formats: &[],
      label: None,
    };
    Self {
      fb: device
        .create_texture(&desc)
        .create_view(&wgpu::TextureViewDescriptor::default()),
      depth: device
        .create_texture(&wgpu::TextureDescriptor {
          format: DEPTH_FORMAT,
          ..desc
        })
        .create_view(&wgpu::TextureViewDescriptor::default()),
    }
  }
}

/// Whether a surface of this size can be configured and drawn to.
pub fn drawable(size: PhysicalSize<u32>) -> bool {
  size.width > 0 && size.height > 0
}

pub fn cast_slice<T: Copy>(t: &[T]) -> &[u8] {
  unsafe { slice::from_raw_parts(t.as_ptr() as _, mem::size_of_val(t)) }
}

pub fn cast<T: Copy>(t: &T) -> &[u8] {
  cast_slice(slice::from_ref(t))
}
