use std::mem;
use std::borrow::Cow;
use naga::front::glsl;
use crate::gfx::{Renderer, DEPTH_FORMAT, SAMPLES};
use crate::pipeline::Backend;
use crate::shader::StageKind;
use crate::shared::Vertex;

const ENTRY_POINT: &str = "main";

/// A linked program. Compute programs are validated and kept but never
/// dispatched by the frame loop.
pub enum Program {
  Render(wgpu::RenderPipeline),
  Compute(wgpu::ComputePipeline),
}

fn naga_stage(kind: StageKind) -> Option<naga::ShaderStage> {
  match kind {
    StageKind::Vertex => Some(naga::ShaderStage::Vertex),
    StageKind::Fragment => Some(naga::ShaderStage::Fragment),
    StageKind::Compute => Some(naga::ShaderStage::Compute),
    _ => None,
  }
}

impl Renderer {
  /// Runs `f` inside a validation error scope and turns a captured error into
  /// its diagnostic text.
  fn scoped<T>(&self, f: impl FnOnce(&wgpu::Device) -> T) -> Result<T, String> {
    self.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f(&self.device);
    match pollster::block_on(self.device.pop_error_scope()) {
      Some(e) => Err(e.to_string()),
      None => Ok(value),
    }
  }

  fn render_pipeline(
    &self,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
  ) -> Result<wgpu::RenderPipeline, String> {
    let format = self.format();
    self.scoped(|device| {
      device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        layout: Some(&self.pipeline_layout),
        vertex: wgpu::VertexState {
          module: vertex,
          entry_point: ENTRY_POINT,
          buffers: &[wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as _,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
          }],
        },
        fragment: Some(wgpu::FragmentState {
          module: fragment,
          entry_point: ENTRY_POINT,
          targets: &[Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
          })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
          format: DEPTH_FORMAT,
          depth_write_enabled: true,
          depth_compare: wgpu::CompareFunction::Less,
          stencil: wgpu::StencilState::default(),
          bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
          count: SAMPLES,
          mask: !0,
          alpha_to_coverage_enabled: false,
        },
        multiview: None,
        label: Some("designer"),
      })
    })
  }

  fn compute_pipeline(&self, module: &wgpu::ShaderModule) -> Result<wgpu::ComputePipeline, String> {
    self.scoped(|device| {
      device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        layout: Some(&self.pipeline_layout),
        module,
        entry_point: ENTRY_POINT,
        label: Some("designer"),
      })
    })
  }
}

impl Backend for Renderer {
  type Module = wgpu::ShaderModule;
  type Program = Program;

  fn compile(&mut self, kind: StageKind, source: &str) -> Result<wgpu::ShaderModule, String> {
    let stage = naga_stage(kind)
      .ok_or_else(|| format!("{} shaders are not supported by the wgpu backend", kind.name()))?;
    // wgpu panics on GLSL it cannot parse, so syntax errors are caught here first
    glsl::Frontend::default()
      .parse(&glsl::Options::from(stage), source)
      .map_err(|errors| {
        errors
          .iter()
          .map(|e| e.to_string())
          .collect::<Vec<_>>()
          .join("\n")
      })?;
    self.scoped(|device| {
      device.create_shader_module(wgpu::ShaderModuleDescriptor {
        source: wgpu::ShaderSource::Glsl {
          shader: Cow::Borrowed(source),
          stage,
          defines: Default::default(),
        },
        label: Some(kind.name()),
      })
    })
  }

  fn link(&mut self, stages: &[(StageKind, &wgpu::ShaderModule)]) -> Result<Program, String> {
    let find = |kind| stages.iter().find(|(k, _)| *k == kind).map(|(_, m)| *m);
    match (
      find(StageKind::Vertex),
      find(StageKind::Fragment),
      find(StageKind::Compute),
      stages.len(),
    ) {
      (Some(vertex), Some(fragment), None, 2) => {
        self.render_pipeline(vertex, fragment).map(Program::Render)
      }
      (None, None, Some(compute), 1) => self.compute_pipeline(compute).map(Program::Compute),
      (_, _, Some(_), _) => Err("a compute stage cannot be linked with other stages".into()),
      (None, _, _, _) => Err("program has no vertex stage".into()),
      (_, None, _, _) => Err("program has no fragment stage".into()),
      _ => Err(format!(
        "unsupported stage combination: {}",
        stages
          .iter()
          .map(|(k, _)| k.name())
          .collect::<Vec<_>>()
          .join(", ")
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_supported_stages() {
    assert_eq!(naga_stage(StageKind::Vertex), Some(naga::ShaderStage::Vertex));
    assert_eq!(naga_stage(StageKind::Compute), Some(naga::ShaderStage::Compute));
    assert_eq!(naga_stage(StageKind::Geometry), None);
    assert_eq!(naga_stage(StageKind::TessControl), None);
  }

  #[test]
  fn sample_shaders_parse() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/shaders/");
    for (file, stage) in [
      ("basic.vert", naga::ShaderStage::Vertex),
      ("basic.frag", naga::ShaderStage::Fragment),
      ("waves.vert", naga::ShaderStage::Vertex),
      ("noise.comp", naga::ShaderStage::Compute),
    ] {
      let source = std::fs::read_to_string(format!("{}{}", root, file)).unwrap();
      let result = glsl::Frontend::default().parse(&glsl::Options::from(stage), &source);
      assert!(result.is_ok(), "{}: {:?}", file, result.err());
    }
  }

  #[test]
  fn broken_sample_fails_to_parse() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/shaders/");
    let source = std::fs::read_to_string(format!("{}broken.frag", root)).unwrap();
    let result =
      glsl::Frontend::default().parse(&glsl::Options::from(naga::ShaderStage::Fragment), &source);
    assert!(result.is_err());
  }
}
