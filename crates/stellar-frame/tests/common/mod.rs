// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(dead_code)]

use stellar_core::math::Mat4;
use stellar_core::renderer::shader::{
    FeatureMask, Shader, ShaderInstance, ShaderLibrary, ShaderValue, ShaderValueType,
    ShaderVariableDesc, ShaderVariation,
};
use stellar_core::renderer::{
    BatchFilter, BatchType, ClearFlags, DrawItem, MeshId, RenderDevice, RenderError,
    RenderTarget, RenderTargetDescriptor, RenderTargetId, ResourceError, SceneSource,
    SortingMode,
};

/// Everything the recording device observed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateTarget(String),
    DestroyTarget(RenderTargetId),
    BeginPass {
        target: String,
        clear: ClearFlags,
        shader: Option<String>,
    },
    BeginBatch(BatchType),
    Draw {
        mesh: MeshId,
        shader: String,
        variation: Option<String>,
        mvp: Option<Mat4>,
    },
    Fullscreen {
        shader: String,
        variation: Option<String>,
    },
    EndBatch,
    EndPass,
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub events: Vec<Event>,
    pub live_targets: Vec<RenderTargetId>,
    pub fail_draws: bool,
    next_id: usize,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A compact trace of the pass structure, e.g. `["pass:scene", "batch", "draw", "end", ...]`.
    pub fn trace(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::BeginPass { target, .. } => Some(format!("pass:{target}")),
                Event::BeginBatch(t) => Some(format!("batch:{t:?}")),
                Event::Draw { mesh, .. } => Some(format!("draw:{}", mesh.0)),
                Event::Fullscreen { shader, .. } => Some(format!("quad:{shader}")),
                Event::EndBatch => Some("end_batch".to_string()),
                Event::EndPass => Some("end_pass".to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Draw { .. }))
            .collect()
    }
}

fn variation_name(shader: &ShaderInstance) -> Option<String> {
    shader.active_variation().map(|v| v.name().to_string())
}

impl RenderDevice for RecordingDevice {
    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTargetId, ResourceError> {
        let id = RenderTargetId(self.next_id);
        self.next_id += 1;
        self.live_targets.push(id);
        self.events.push(Event::CreateTarget(descriptor.label.clone()));
        Ok(id)
    }

    fn destroy_render_target(&mut self, id: RenderTargetId) -> Result<(), ResourceError> {
        let index = self
            .live_targets
            .iter()
            .position(|t| *t == id)
            .ok_or(ResourceError::InvalidHandle(id))?;
        self.live_targets.remove(index);
        self.events.push(Event::DestroyTarget(id));
        Ok(())
    }

    fn begin_pass(
        &mut self,
        target: &RenderTarget,
        shader: Option<&ShaderInstance>,
    ) -> Result<(), RenderError> {
        self.events.push(Event::BeginPass {
            target: target.name().to_string(),
            clear: target.clear_flags(),
            shader: shader.map(|s| s.name().to_string()),
        });
        Ok(())
    }

    fn begin_batch(&mut self, batch_type: BatchType) -> Result<(), RenderError> {
        self.events.push(Event::BeginBatch(batch_type));
        Ok(())
    }

    fn draw(&mut self, item: &DrawItem, shader: &ShaderInstance) -> Result<(), RenderError> {
        if self.fail_draws {
            return Err(RenderError::RenderingFailed("draw rejected".to_string()));
        }
        let mvp = shader
            .variable_by_semantic("ModelViewProjection")
            .and_then(|v| match v.value() {
                ShaderValue::Matrix(m) => Some(m),
                _ => None,
            });
        self.events.push(Event::Draw {
            mesh: item.mesh,
            shader: shader.name().to_string(),
            variation: variation_name(shader),
            mvp,
        });
        Ok(())
    }

    fn draw_fullscreen_quad(&mut self, shader: &ShaderInstance) -> Result<(), RenderError> {
        self.events.push(Event::Fullscreen {
            shader: shader.name().to_string(),
            variation: variation_name(shader),
        });
        Ok(())
    }

    fn end_batch(&mut self) -> Result<(), RenderError> {
        self.events.push(Event::EndBatch);
        Ok(())
    }

    fn end_pass(&mut self) -> Result<(), RenderError> {
        self.events.push(Event::EndPass);
        Ok(())
    }
}

/// A scene holding a fixed list of items per batch type.
#[derive(Debug, Default)]
pub struct StaticScene {
    pub items: Vec<(BatchType, DrawItem)>,
}

impl StaticScene {
    pub fn with(mut self, batch_type: BatchType, item: DrawItem) -> Self {
        self.items.push((batch_type, item));
        self
    }
}

impl SceneSource for StaticScene {
    fn gather(&self, filter: &BatchFilter, sorting: SortingMode, out: &mut Vec<DrawItem>) {
        let start = out.len();
        out.extend(
            self.items
                .iter()
                .filter(|(t, _)| *t == filter.batch_type)
                .map(|(_, item)| *item),
        );
        if sorting == SortingMode::ByState {
            out[start..].sort_by_key(|item| item.mesh);
        }
    }
}

/// A library with feature bits `Solid` = 0b01 and `Skinned` = 0b10 and the shaders
/// `depth`, `standard` and `compose`.
pub fn library() -> ShaderLibrary {
    let mut library = ShaderLibrary::new();
    let solid = library.feature_mask("Solid").unwrap();
    let skinned = library.feature_mask("Skinned").unwrap();

    let mvp = ShaderVariableDesc::new("mvp", ShaderValueType::Matrix)
        .with_semantic("ModelViewProjection");
    let ambient = ShaderVariableDesc::new("GlobalAmbient", ShaderValueType::Vector).shared();

    let mut depth = Shader::new("depth");
    depth
        .add_variation(ShaderVariation::new("depth", FeatureMask::EMPTY))
        .unwrap();
    depth.declare_variable(mvp.clone()).unwrap();
    library.register(depth).unwrap();

    let mut standard = Shader::new("standard");
    standard
        .add_variation(ShaderVariation::new("solid", solid))
        .unwrap();
    standard
        .add_variation(ShaderVariation::new("solid_skinned", solid | skinned))
        .unwrap();
    standard.declare_variable(mvp).unwrap();
    standard.declare_variable(ambient.clone()).unwrap();
    standard
        .declare_variable(ShaderVariableDesc::new("Tint", ShaderValueType::Vector))
        .unwrap();
    library.register(standard).unwrap();

    let mut compose = Shader::new("compose");
    compose
        .add_variation(ShaderVariation::new("compose", FeatureMask::EMPTY))
        .unwrap();
    compose.declare_variable(ambient).unwrap();
    compose
        .declare_variable(ShaderVariableDesc::new("Exposure", ShaderValueType::Float))
        .unwrap();
    library.register(compose).unwrap();

    library
}
