use std::sync::Arc;

use log::{debug, info};
use winit::window::Window;

use wgpu::*;
use super::*;
use crate::error::GfxError;
use crate::render::{DrawContext, Material, RenderVertex};

const MSAA_SAMPLES: u32 = 4;
const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth24Plus;

/// Vertex or index buffer that only ever grows.
#[derive(Debug)]
struct GrowBuffer {
  label: &'static str,
  usage: BufferUsages,
  buffer: Buffer,
  len: u64,
}
impl GrowBuffer {
  fn new(device: &Device, label: &'static str, usage: BufferUsages) -> Self {
    let usage = usage | BufferUsages::COPY_DST;
    let buffer = device.create_buffer(&BufferDescriptor {
      label: Some(label),
      size: 1024,
      usage,
      mapped_at_creation: false,
    });
    Self { label, usage, buffer, len: 0 }
  }
  fn upload(&mut self, device: &Device, queue: &Queue, data: &[u8]) {
    self.len = data.len() as u64;
    if data.is_empty() {
      return;
    }
    if self.len > self.buffer.size() {
      let size = self.len.next_power_of_two();
      debug!("growing {} to {} bytes", self.label, size);
      self.buffer.destroy();
      self.buffer = device.create_buffer(&BufferDescriptor {
        label: Some(self.label),
        size,
        usage: self.usage,
        mapped_at_creation: false,
      });
    }
    queue.write_buffer(&self.buffer, 0, data);
  }
  fn slice(&self) -> BufferSlice<'_> {
    self.buffer.slice(..self.len)
  }
}

/// Depth tested and untested variants of one pipeline.
#[derive(Debug)]
struct PipelinePair {
  depth: RenderPipeline,
  no_depth: RenderPipeline,
}
impl PipelinePair {
  fn pick(&self, depth_test: bool) -> &RenderPipeline {
    if depth_test { &self.depth } else { &self.no_depth }
  }
}

/// wgpu resources for presenting a recorded [`DrawContext`] to a window.
#[derive(Debug)]
pub struct GpuContext {
  win_surface: Surface<'static>,
  surface_format: TextureFormat,
  device: Device,
  queue: Queue,
  pub config: SurfaceConfiguration,
  msaa: Texture,
  zbuffer: Texture,
  uniform_buffer: Buffer,
  bind_group: BindGroup,
  mesh_pipelines: PipelinePair,
  line_pipelines: PipelinePair,
  vertex_buffer: GrowBuffer,
  index_buffer: GrowBuffer,
  line_buffer: GrowBuffer,
}
impl GpuContext {
  // Creating some of the wgpu types requires async code
  pub async fn new(window: Arc<Window>) -> Result<Self, GfxError> {
    let size = window.inner_size();

    // The instance is a handle to our GPU
    let instance = Instance::new(InstanceDescriptor {
      backends: Backends::PRIMARY,
      ..Default::default()
    });
    let win_surface = instance.create_surface(window)?;

    // handle for graphics card
    let adapter = instance.request_adapter(&RequestAdapterOptions {
      power_preference: PowerPreference::default(),
      compatible_surface: Some(&win_surface),
      force_fallback_adapter: false,
    }).await.ok_or(GfxError::NoAdapter)?;
    info!("using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter.request_device(
      &DeviceDescriptor {
        required_features: Features::empty(),
        required_limits: Limits::default(),
        label: None,
        memory_hints: MemoryHints::Performance,
      },
      None, // Trace path
    ).await?;

    let surface_caps = win_surface.get_capabilities(&adapter);
    let surface_format = surface_caps.formats.iter()
      .find(|f| f.is_srgb())
      .or_else(|| surface_caps.formats.first())
      .copied()
      .ok_or(GfxError::NoSurfaceFormat)?;
    let config = SurfaceConfiguration {
      usage: TextureUsages::RENDER_ATTACHMENT,
      format: surface_format,
      width: size.width.max(1),
      height: size.height.max(1),
      present_mode: PresentMode::AutoNoVsync,
      alpha_mode: surface_caps.alpha_modes.first().copied().unwrap_or(CompositeAlphaMode::Auto),
      view_formats: vec![],
      desired_maximum_frame_latency: 2,
    };
    win_surface.configure(&device, &config);

    let msaa = create_target(&device, "msaa-texture", surface_format, config.width, config.height);
    let zbuffer = create_target(&device, "zbuffer-texture", DEPTH_FORMAT, config.width, config.height);

    // shared frame uniform
    let uniform_buffer = device.create_buffer(&BufferDescriptor {
      label: Some("frame-uniform-buffer"),
      size: std::mem::size_of::<FrameUniforms>() as u64,
      usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });
    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
      label: Some("bind-group0-layout"),
      entries: &[BindGroupLayoutEntry {
        binding: 0,
        visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
        ty: BindingType::Buffer {
          ty: BufferBindingType::Uniform,
          has_dynamic_offset: false,
          min_binding_size: None,
        },
        count: None,
      }],
    });
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
      label: Some("bind-group-0"),
      layout: &bind_group_layout,
      entries: &[BindGroupEntry {
        binding: 0,
        resource: uniform_buffer.as_entire_binding(),
      }],
    });
    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
      label: Some("pipeline-layout"),
      bind_group_layouts: &[&bind_group_layout],
      push_constant_ranges: &[],
    });

    let mesh_attrs = vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];
    let mesh_layout = VertexBufferLayout {
      array_stride: std::mem::size_of::<RenderVertex>() as BufferAddress,
      step_mode: VertexStepMode::Vertex,
      attributes: &mesh_attrs,
    };
    let line_attrs = vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4, 3 => Float32x3];
    let line_layout = VertexBufferLayout {
      array_stride: std::mem::size_of::<LineVertex>() as BufferAddress,
      step_mode: VertexStepMode::Vertex,
      attributes: &line_attrs,
    };
    let mesh_shader = device.create_shader_module(ShaderModuleDescriptor {
      label: Some("mesh-shader"),
      source: ShaderSource::Wgsl(include_str!("../embed_assets/mesh.wgsl").into()),
    });
    let line_shader = device.create_shader_module(ShaderModuleDescriptor {
      label: Some("line-shader"),
      source: ShaderSource::Wgsl(include_str!("../embed_assets/lines.wgsl").into()),
    });
    let mesh_pipelines = PipelinePair {
      depth: build_pipeline(&device, &pipeline_layout, &mesh_shader, mesh_layout.clone(), surface_format, true),
      no_depth: build_pipeline(&device, &pipeline_layout, &mesh_shader, mesh_layout, surface_format, false),
    };
    let line_pipelines = PipelinePair {
      depth: build_pipeline(&device, &pipeline_layout, &line_shader, line_layout.clone(), surface_format, true),
      no_depth: build_pipeline(&device, &pipeline_layout, &line_shader, line_layout, surface_format, false),
    };

    let vertex_buffer = GrowBuffer::new(&device, "vertex-buffer", BufferUsages::VERTEX);
    let index_buffer = GrowBuffer::new(&device, "index-buffer", BufferUsages::INDEX);
    let line_buffer = GrowBuffer::new(&device, "line-buffer", BufferUsages::VERTEX);

    Ok(Self {
      win_surface,
      surface_format,
      device,
      queue,
      config,
      msaa,
      zbuffer,
      uniform_buffer,
      bind_group,
      mesh_pipelines,
      line_pipelines,
      vertex_buffer,
      index_buffer,
      line_buffer,
    })
  }
  // update surface/surface textures on resize
  pub fn resize(&mut self, width: u32, height: u32) {
    if width > 0 && height > 0 {
      self.config.width = width;
      self.config.height = height;
      self.win_surface.configure(&self.device, &self.config);

      let msaa = create_target(&self.device, "msaa-texture", self.surface_format, width, height);
      self.msaa.destroy();
      self.msaa = msaa;
      let zbuffer = create_target(&self.device, "zbuffer-texture", DEPTH_FORMAT, width, height);
      self.zbuffer.destroy();
      self.zbuffer = zbuffer;
    }
  }
  /// Reconfigures the surface with its current size after a lost frame.
  pub fn reconfigure(&mut self) {
    let (width, height) = (self.config.width, self.config.height);
    self.resize(width, height);
  }
  pub fn size(&self) -> (u32, u32) {
    (self.config.width, self.config.height)
  }
  // exposed render method
  pub fn render(&mut self, ctx: &DrawContext) -> Result<(), SurfaceError> {
    self.upload(ctx);
    let output = self.win_surface.get_current_texture()?;
    let target = output.texture.create_view(&TextureViewDescriptor::default());
    let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
      label: Some("Render Encoder"),
    });
    // separate encoding to handle borrow checking
    self.render_impl(&mut encoder, &target, ctx);
    self.queue.submit(std::iter::once(encoder.finish()));
    output.present();
    Ok(())
  }
  fn upload(&mut self, ctx: &DrawContext) {
    let viewport = ctx.viewport();
    let (width, height) = if viewport.width > 0 && viewport.height > 0 {
      (viewport.width, viewport.height)
    } else {
      self.size()
    };
    let lighting = if ctx.state().lighting { 1.0 } else { 0.0 };
    let uniforms = FrameUniforms {
      projection: *ctx.projection(),
      viewport: [width as f32, height as f32, lighting, 0.0],
    };
    self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

    let lines = expand_lines(ctx.lines());
    self.vertex_buffer.upload(&self.device, &self.queue, bytemuck::cast_slice(ctx.vertices()));
    self.index_buffer.upload(&self.device, &self.queue, bytemuck::cast_slice(ctx.indices()));
    self.line_buffer.upload(&self.device, &self.queue, bytemuck::cast_slice(&lines));
  }
  // core render actions to feed into encoder
  fn render_impl(&self, encoder: &mut CommandEncoder, target: &TextureView, ctx: &DrawContext) {
    let view = self.msaa.create_view(&TextureViewDescriptor::default());
    let zbuffer_view = self.zbuffer.create_view(&TextureViewDescriptor::default());
    let [r, g, b, a] = ctx.state().clear_color;
    let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
      label: Some("Primary Render Pass"),
      color_attachments: &[Some(RenderPassColorAttachment {
        view: &view, // render onto MSAA texture
        resolve_target: Some(target), // copy MSAA output onto target
        ops: Operations {
          load: LoadOp::Clear(Material::rgba(r, g, b, a).into()),
          store: StoreOp::Store,
        }
      })],
      depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
        view: &zbuffer_view,
        depth_ops: Some(Operations {
          load: LoadOp::Clear(1.0),
          store: StoreOp::Store
        }),
        stencil_ops: None,
      }),
      ..Default::default()
    });
    if let Some((x, y, w, h)) = self.clamped_viewport(ctx) {
      pass.set_viewport(x, y, w, h, 0.0, 1.0);
    }
    pass.set_bind_group(0, &self.bind_group, &[]);
    let depth_test = ctx.state().depth_test;

    let index_count = ctx.indices().len() as u32;
    if index_count > 0 {
      pass.set_pipeline(self.mesh_pipelines.pick(depth_test));
      pass.set_vertex_buffer(0, self.vertex_buffer.slice());
      pass.set_index_buffer(self.index_buffer.slice(), IndexFormat::Uint32);
      pass.draw_indexed(0..index_count, 0, 0..1);
    }
    let line_count = (self.line_buffer.len / std::mem::size_of::<LineVertex>() as u64) as u32;
    if line_count > 0 {
      pass.set_pipeline(self.line_pipelines.pick(depth_test));
      pass.set_vertex_buffer(0, self.line_buffer.slice());
      pass.draw(0..line_count, 0..1);
    }
  }
  // viewport limited to the render target, none when empty
  fn clamped_viewport(&self, ctx: &DrawContext) -> Option<(f32, f32, f32, f32)> {
    let vp = ctx.viewport();
    let (tw, th) = self.size();
    let x = (vp.x.max(0) as u32).min(tw);
    let y = (vp.y.max(0) as u32).min(th);
    let w = vp.width.min(tw - x);
    let h = vp.height.min(th - y);
    if w == 0 || h == 0 {
      return None;
    }
    Some((x as f32, y as f32, w as f32, h as f32))
  }
  // destroy all resources
  pub fn destroy(&mut self) {
    self.vertex_buffer.buffer.destroy();
    self.index_buffer.buffer.destroy();
    self.line_buffer.buffer.destroy();
    self.uniform_buffer.destroy();
    self.msaa.destroy();
    self.zbuffer.destroy();
    self.device.destroy();
  }
}

// multisampled render target matching the surface size
fn create_target(device: &Device, label: &str, format: TextureFormat, width: u32, height: u32) -> Texture {
  device.create_texture(&TextureDescriptor {
    label: Some(label),
    size: Extent3d { width, height, depth_or_array_layers: 1 },
    sample_count: MSAA_SAMPLES,
    mip_level_count: 1,
    dimension: TextureDimension::D2,
    format,
    usage: TextureUsages::RENDER_ATTACHMENT,
    view_formats: &[]
  })
}

fn build_pipeline(
  device: &Device,
  layout: &PipelineLayout,
  shader: &ShaderModule,
  vertex_layout: VertexBufferLayout,
  target_format: TextureFormat,
  depth_test: bool,
) -> RenderPipeline {
  device.create_render_pipeline(&RenderPipelineDescriptor {
    label: Some(if depth_test { "render-pipeline" } else { "render-pipeline-no-depth" }),
    layout: Some(layout),
    vertex: VertexState {
      module: shader,
      entry_point: Some("vertex_main"),
      buffers: &[vertex_layout],
      compilation_options: PipelineCompilationOptions::default(),
    },
    fragment: Some(FragmentState {
      module: shader,
      entry_point: Some("fragment_main"),
      targets: &[Some(ColorTargetState {
        format: target_format,
        blend: Some(BlendState {
          color: BlendComponent {
            operation: BlendOperation::Add,
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::OneMinusSrcAlpha
          },
          alpha: BlendComponent {
            operation: BlendOperation::Add,
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::OneMinusSrcAlpha
          }
        }),
        write_mask: ColorWrites::ALL
      })],
      compilation_options: PipelineCompilationOptions::default(),
    }),
    multisample: MultisampleState {
      count: MSAA_SAMPLES,
      mask: !0,
      alpha_to_coverage_enabled: false,
    },
    // the pass always carries a depth buffer, untested pipelines just ignore it
    depth_stencil: Some(DepthStencilState {
      format: DEPTH_FORMAT,
      depth_write_enabled: depth_test,
      depth_compare: if depth_test { CompareFunction::LessEqual } else { CompareFunction::Always },
      stencil: StencilState::default(),
      bias: DepthBiasState::default(),
    }),
    primitive: PrimitiveState {
      cull_mode: None,
      polygon_mode: PolygonMode::Fill,
      topology: PrimitiveTopology::TriangleList,
      ..PrimitiveState::default()
    },
    multiview: None,
    cache: None,
  })
}
