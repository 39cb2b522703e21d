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

use crate::context::FrameContext;
use stellar_core::renderer::shader::{ShaderInstance, ShaderVariableInstance};
use stellar_core::renderer::{RenderError, SharedRenderTarget};

/// A full-screen pass run after every [`FramePass`](crate::FramePass) of a frame.
///
/// A post effect must be [`discard`](Self::discard)ed before it is dropped.
#[derive(Debug)]
pub struct FramePostEffect {
    name: String,
    render_target: Option<SharedRenderTarget>,
    shader: Option<ShaderInstance>,
    variables: Vec<ShaderVariableInstance>,
}

impl FramePostEffect {
    /// Creates a post effect drawing into `render_target` with `shader`.
    pub fn new(
        name: impl Into<String>,
        render_target: SharedRenderTarget,
        shader: ShaderInstance,
    ) -> Self {
        Self {
            name: name.into(),
            render_target: Some(render_target),
            shader: Some(shader),
            variables: Vec::new(),
        }
    }

    /// The effect name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The render target, until the effect is discarded.
    pub fn render_target(&self) -> Option<&SharedRenderTarget> {
        self.render_target.as_ref()
    }

    /// The shader instance, until the effect is discarded.
    pub fn shader(&self) -> Option<&ShaderInstance> {
        self.shader.as_ref()
    }

    /// Mutable access to the shader instance, e.g. to select a variation.
    pub fn shader_mut(&mut self) -> Option<&mut ShaderInstance> {
        self.shader.as_mut()
    }

    /// Adds a variable instance applied each time the effect renders.
    pub fn add_variable(&mut self, variable: ShaderVariableInstance) {
        self.variables.push(variable);
    }

    /// Applies the effect variables and draws a full-screen quad into the target.
    ///
    /// # Panics
    ///
    /// Panics if the effect has been discarded or its render target is no longer valid.
    pub fn render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), RenderError> {
        let (Some(target), Some(shader)) = (&self.render_target, &self.shader) else {
            panic!("FramePostEffect '{}': rendered after discard", self.name);
        };
        let target = target.borrow();
        assert!(
            target.is_valid(),
            "FramePostEffect '{}': render target '{}' is not valid",
            self.name,
            target.name()
        );

        for variable in &self.variables {
            variable.apply();
        }

        ctx.device.begin_pass(&target, Some(shader))?;
        let draw = ctx.device.draw_fullscreen_quad(shader);
        let end = ctx.device.end_pass();
        draw.and(end)
    }

    /// Releases the shader instance, the render target reference and the variable instances.
    pub fn discard(&mut self) {
        self.shader = None;
        self.render_target = None;
        self.variables.clear();
    }
}

impl Drop for FramePostEffect {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(
                self.shader.is_none() && self.render_target.is_none() && self.variables.is_empty(),
                "FramePostEffect '{}' dropped without discard()",
                self.name
            );
        }
    }
}
