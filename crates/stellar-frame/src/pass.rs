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

use crate::batch::FrameBatch;
use crate::context::FrameContext;
use stellar_core::math::LinearRgba;
use stellar_core::renderer::shader::{ShaderInstance, ShaderVariableInstance};
use stellar_core::renderer::{ClearFlags, RenderError, SharedRenderTarget};

/// One render pass of a frame: a render target, its clear state, an optional
/// pass-level shader, pass variables, and the batches drawn into the target.
///
/// A pass must be [`discard`](Self::discard)ed before it is dropped.
#[derive(Debug)]
pub struct FramePass {
    name: String,
    render_target: Option<SharedRenderTarget>,
    shader: Option<ShaderInstance>,
    clear_flags: ClearFlags,
    clear_color: LinearRgba,
    clear_depth: f32,
    clear_stencil: u32,
    variables: Vec<ShaderVariableInstance>,
    batches: Vec<FrameBatch>,
}

impl FramePass {
    /// Creates a pass drawing into `render_target` that clears nothing.
    pub fn new(name: impl Into<String>, render_target: SharedRenderTarget) -> Self {
        Self {
            name: name.into(),
            render_target: Some(render_target),
            shader: None,
            clear_flags: ClearFlags::EMPTY,
            clear_color: LinearRgba::BLACK,
            clear_depth: 1.0,
            clear_stencil: 0,
            variables: Vec::new(),
            batches: Vec::new(),
        }
    }

    /// The pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The render target, until the pass is discarded.
    pub fn render_target(&self) -> Option<&SharedRenderTarget> {
        self.render_target.as_ref()
    }

    /// Sets the pass-level shader instance handed to the device when the pass begins.
    pub fn set_shader(&mut self, shader: ShaderInstance) {
        self.shader = Some(shader);
    }

    /// The pass-level shader instance.
    pub fn shader(&self) -> Option<&ShaderInstance> {
        self.shader.as_ref()
    }

    /// Clears the color attachment to `color` when the pass begins.
    pub fn set_clear_color(&mut self, color: LinearRgba) {
        self.clear_color = color;
        self.clear_flags.insert(ClearFlags::COLOR);
    }

    /// Clears the depth attachment to `depth` when the pass begins.
    pub fn set_clear_depth(&mut self, depth: f32) {
        self.clear_depth = depth;
        self.clear_flags.insert(ClearFlags::DEPTH);
    }

    /// Clears the stencil attachment to `stencil` when the pass begins.
    pub fn set_clear_stencil(&mut self, stencil: u32) {
        self.clear_stencil = stencil;
        self.clear_flags.insert(ClearFlags::STENCIL);
    }

    /// The aspects cleared when the pass begins.
    pub fn clear_flags(&self) -> ClearFlags {
        self.clear_flags
    }

    /// Adds a variable instance applied each time the pass renders.
    pub fn add_variable(&mut self, variable: ShaderVariableInstance) {
        self.variables.push(variable);
    }

    /// Appends a batch. Batches render in insertion order.
    pub fn add_batch(&mut self, batch: FrameBatch) {
        self.batches.push(batch);
    }

    /// The batches, in render order.
    pub fn batches(&self) -> &[FrameBatch] {
        &self.batches
    }

    /// Renders the pass: applies the clear state and the pass variables,
    /// begins the pass on the device, renders every batch, then ends the pass.
    ///
    /// `end_pass` is issued even if a batch fails; the first error is returned.
    ///
    /// # Panics
    ///
    /// Panics if the pass has been discarded or its render target is no longer valid.
    pub fn render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), RenderError> {
        let target = self
            .render_target
            .as_ref()
            .unwrap_or_else(|| panic!("FramePass '{}': rendered after discard", self.name));
        {
            let mut target = target.borrow_mut();
            assert!(
                target.is_valid(),
                "FramePass '{}': render target '{}' is not valid",
                self.name,
                target.name()
            );
            target.set_clear_flags(self.clear_flags);
            target.set_clear_color(self.clear_color);
            target.set_clear_depth(self.clear_depth);
            target.set_clear_stencil(self.clear_stencil);
        }

        for variable in &self.variables {
            variable.apply();
        }

        ctx.device
            .begin_pass(&target.borrow(), self.shader.as_ref())?;
        let batches = self
            .batches
            .iter_mut()
            .try_for_each(|batch| batch.render(ctx));
        let end = ctx.device.end_pass();
        batches.and(end)
    }

    /// Releases the shader instance, the render target reference, the
    /// variable instances and every batch.
    pub fn discard(&mut self) {
        self.shader = None;
        self.render_target = None;
        self.variables.clear();
        for batch in &mut self.batches {
            batch.discard();
        }
        self.batches.clear();
    }

    fn holds_resources(&self) -> bool {
        self.shader.is_some()
            || self.render_target.is_some()
            || !self.variables.is_empty()
            || !self.batches.is_empty()
    }
}

impl Drop for FramePass {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(
                !self.holds_resources(),
                "FramePass '{}' dropped without discard()",
                self.name
            );
        }
    }
}
