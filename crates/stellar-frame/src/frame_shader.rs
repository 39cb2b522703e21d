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
use crate::pass::FramePass;
use crate::post_effect::FramePostEffect;
use std::collections::BTreeMap;
use stellar_core::renderer::shader::ShaderVariableInstance;
use stellar_core::renderer::{RenderDevice, RenderError, SharedRenderTarget};

/// A complete frame: named render targets, frame-wide variables, passes and
/// post effects.
///
/// Rendering applies the frame variables, then renders every pass in order,
/// then every post effect in order. A frame shader owns the device resources
/// of its render targets and must be [`discard`](Self::discard)ed before it
/// is dropped.
#[derive(Debug)]
pub struct FrameShader {
    name: String,
    main_render_target: Option<SharedRenderTarget>,
    render_targets: BTreeMap<String, SharedRenderTarget>,
    variables: Vec<ShaderVariableInstance>,
    passes: Vec<FramePass>,
    post_effects: Vec<FramePostEffect>,
}

impl FrameShader {
    /// Creates an empty frame shader.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main_render_target: None,
            render_targets: BTreeMap::new(),
            variables: Vec::new(),
            passes: Vec::new(),
            post_effects: Vec::new(),
        }
    }

    /// The frame shader name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Takes ownership of a render target under `name`.
    ///
    /// Returns the previous target with that name, which the caller must discard.
    pub fn add_render_target(
        &mut self,
        name: impl Into<String>,
        target: SharedRenderTarget,
    ) -> Option<SharedRenderTarget> {
        self.render_targets.insert(name.into(), target)
    }

    /// Marks a target as the one the frame finally presents.
    pub fn set_main_render_target(&mut self, target: SharedRenderTarget) {
        self.main_render_target = Some(target);
    }

    /// Adds a frame-wide variable instance, applied before any pass renders.
    pub fn add_variable(&mut self, variable: ShaderVariableInstance) {
        self.variables.push(variable);
    }

    /// Appends a pass. Passes render in insertion order.
    pub fn add_pass(&mut self, pass: FramePass) {
        self.passes.push(pass);
    }

    /// Appends a post effect. Post effects render in insertion order, after all passes.
    pub fn add_post_effect(&mut self, effect: FramePostEffect) {
        self.post_effects.push(effect);
    }

    /// The main render target, if one is set.
    pub fn main_render_target(&self) -> Option<&SharedRenderTarget> {
        self.main_render_target.as_ref()
    }

    /// Looks up a render target by name.
    pub fn render_target(&self, name: &str) -> Option<&SharedRenderTarget> {
        self.render_targets.get(name)
    }

    /// The render target names, sorted.
    pub fn render_target_names(&self) -> impl Iterator<Item = &str> {
        self.render_targets.keys().map(String::as_str)
    }

    /// The frame-wide variable instances.
    pub fn variables(&self) -> &[ShaderVariableInstance] {
        &self.variables
    }

    /// Looks up a pass by name.
    pub fn pass(&self, name: &str) -> Option<&FramePass> {
        self.passes.iter().find(|p| p.name() == name)
    }

    /// Looks up a pass by name for modification.
    pub fn pass_mut(&mut self, name: &str) -> Option<&mut FramePass> {
        self.passes.iter_mut().find(|p| p.name() == name)
    }

    /// The passes, in render order.
    pub fn passes(&self) -> &[FramePass] {
        &self.passes
    }

    /// Looks up a post effect by name.
    pub fn post_effect(&self, name: &str) -> Option<&FramePostEffect> {
        self.post_effects.iter().find(|e| e.name() == name)
    }

    /// Looks up a post effect by name for modification.
    pub fn post_effect_mut(&mut self, name: &str) -> Option<&mut FramePostEffect> {
        self.post_effects.iter_mut().find(|e| e.name() == name)
    }

    /// The post effects, in render order.
    pub fn post_effects(&self) -> &[FramePostEffect] {
        &self.post_effects
    }

    /// Renders one frame.
    pub fn render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), RenderError> {
        for variable in &self.variables {
            variable.apply();
        }
        for pass in &mut self.passes {
            pass.render(ctx)?;
        }
        for effect in &mut self.post_effects {
            effect.render(ctx)?;
        }
        Ok(())
    }

    /// Releases every resource: the main target reference, the render
    /// targets and their device resources, the variables, the passes and the
    /// post effects.
    ///
    /// A render target whose device resource cannot be destroyed is logged
    /// and skipped.
    pub fn discard(&mut self, device: &mut dyn RenderDevice) {
        // The main target is usually also in the map; discarding twice is a no-op.
        let main = self.main_render_target.take().map(|target| {
            let name = target.borrow().name().to_string();
            (name, target)
        });
        let targets = std::mem::take(&mut self.render_targets);
        for (name, target) in targets.into_iter().chain(main) {
            if let Err(e) = target.borrow_mut().discard(device) {
                log::warn!(
                    "FrameShader '{}': failed to destroy render target '{}': {}",
                    self.name,
                    name,
                    e
                );
            }
        }
        self.variables.clear();
        for mut pass in self.passes.drain(..) {
            pass.discard();
        }
        for mut effect in self.post_effects.drain(..) {
            effect.discard();
        }
        log::debug!("FrameShader '{}': discarded", self.name);
    }

    fn holds_resources(&self) -> bool {
        self.main_render_target.is_some()
            || !self.render_targets.is_empty()
            || !self.variables.is_empty()
            || !self.passes.is_empty()
            || !self.post_effects.is_empty()
    }
}

impl Drop for FrameShader {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(
                !self.holds_resources(),
                "FrameShader '{}' dropped without discard()",
                self.name
            );
        }
    }
}
