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

//! Builds live frame shaders from their descriptions.

use crate::batch::FrameBatch;
use crate::description::{
    FrameBatchDescription, FramePassDescription, FrameShaderDescription, PostEffectDescription,
    VariableDescription,
};
use crate::error::FrameSetupError;
use crate::frame_shader::FrameShader;
use crate::pass::FramePass;
use crate::post_effect::FramePostEffect;
use std::rc::Rc;
use stellar_core::math::LinearRgba;
use stellar_core::renderer::shader::{ShaderInstance, ShaderLibrary, ShaderVariableInstance};
use stellar_core::renderer::{RenderDevice, RenderTarget, RenderTargetDescriptor, SharedRenderTarget};

impl FrameShader {
    /// Builds a frame shader from `description`.
    ///
    /// Render targets are created on `device`, shaders are instantiated from
    /// `library`, and feature names are registered in `library` as they are
    /// encountered. Frame-level variables must name shared variables of
    /// shaders used by the frame. If any step fails, everything created so
    /// far is discarded before the error is returned.
    pub fn from_description(
        description: &FrameShaderDescription,
        library: &mut ShaderLibrary,
        device: &mut dyn RenderDevice,
    ) -> Result<Self, FrameSetupError> {
        let mut frame = FrameShader::new(description.name.clone());
        match populate(&mut frame, description, library, device) {
            Ok(()) => {
                log::info!(
                    "FrameShader '{}': built {} render target(s), {} pass(es), {} post effect(s)",
                    frame.name(),
                    description.render_targets.len(),
                    frame.passes().len(),
                    frame.post_effects().len()
                );
                Ok(frame)
            }
            Err(e) => {
                log::error!("FrameShader '{}': setup failed: {}", frame.name(), e);
                frame.discard(device);
                Err(e)
            }
        }
    }

    /// Parses RON text and builds the frame shader it describes.
    pub fn from_ron_str(
        text: &str,
        library: &mut ShaderLibrary,
        device: &mut dyn RenderDevice,
    ) -> Result<Self, FrameSetupError> {
        let description = FrameShaderDescription::from_ron_str(text)?;
        Self::from_description(&description, library, device)
    }
}

fn populate(
    frame: &mut FrameShader,
    description: &FrameShaderDescription,
    library: &mut ShaderLibrary,
    device: &mut dyn RenderDevice,
) -> Result<(), FrameSetupError> {
    let mut main: Option<&str> = None;
    for desc in &description.render_targets {
        if frame.render_target(&desc.name).is_some() {
            return Err(FrameSetupError::DuplicateRenderTarget(desc.name.clone()));
        }
        if desc.main {
            if let Some(first) = main {
                return Err(FrameSetupError::MultipleMainTargets {
                    first: first.to_string(),
                    second: desc.name.clone(),
                });
            }
            main = Some(&desc.name);
        }

        let target = RenderTarget::setup_shared(
            device,
            &RenderTargetDescriptor {
                label: desc.name.clone(),
                width: desc.width,
                height: desc.height,
                format: desc.format,
                depth_stencil: desc.depth_stencil,
            },
        )?;
        if desc.main {
            frame.set_main_render_target(Rc::clone(&target));
        }
        frame.add_render_target(desc.name.clone(), target);
    }

    for desc in &description.passes {
        let pass = build_pass(frame, desc, library)?;
        frame.add_pass(pass);
    }
    for desc in &description.post_effects {
        let effect = build_post_effect(frame, desc, library)?;
        frame.add_post_effect(effect);
    }

    let user = format!("frame '{}'", description.name);
    for desc in &description.variables {
        let variable = resolve_variable(library, None, desc, &user)?;
        frame.add_variable(variable);
    }
    Ok(())
}

fn build_pass(
    frame: &FrameShader,
    desc: &FramePassDescription,
    library: &mut ShaderLibrary,
) -> Result<FramePass, FrameSetupError> {
    let user = format!("pass '{}'", desc.name);
    let target = lookup_target(frame, &desc.render_target, &user)?;
    let shader = desc
        .shader
        .as_deref()
        .map(|name| instantiate(library, name, &desc.features))
        .transpose()?;
    let variables = resolve_variables(library, shader.as_ref(), &desc.variables, &user)?;
    let batches = desc
        .batches
        .iter()
        .map(|batch| build_batch(library, batch, &desc.name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pass = FramePass::new(desc.name.clone(), target);
    if let Some(shader) = shader {
        pass.set_shader(shader);
    }
    if let Some(color) = desc.clear.color {
        pass.set_clear_color(LinearRgba::from_array(color));
    }
    if let Some(depth) = desc.clear.depth {
        pass.set_clear_depth(depth);
    }
    if let Some(stencil) = desc.clear.stencil {
        pass.set_clear_stencil(stencil);
    }
    for variable in variables {
        pass.add_variable(variable);
    }
    for batch in batches {
        pass.add_batch(batch);
    }
    Ok(pass)
}

fn build_batch(
    library: &mut ShaderLibrary,
    desc: &FrameBatchDescription,
    pass_name: &str,
) -> Result<FrameBatch, FrameSetupError> {
    let user = format!("{:?} batch of pass '{}'", desc.batch_type, pass_name);
    let features = library.feature_mask(&desc.features)?;
    let shader = library.create_instance(&desc.shader)?;
    let variables = resolve_variables(library, Some(&shader), &desc.variables, &user)?;

    let mut batch = FrameBatch::new(desc.batch_type, shader)
        .with_features(features)
        .with_lighting(desc.lighting)
        .with_sorting(desc.sorting);
    for variable in variables {
        batch.add_variable(variable);
    }
    Ok(batch)
}

fn build_post_effect(
    frame: &FrameShader,
    desc: &PostEffectDescription,
    library: &mut ShaderLibrary,
) -> Result<FramePostEffect, FrameSetupError> {
    let user = format!("post effect '{}'", desc.name);
    let target = lookup_target(frame, &desc.render_target, &user)?;
    let shader = instantiate(library, &desc.shader, &desc.features)?;
    let variables = resolve_variables(library, Some(&shader), &desc.variables, &user)?;

    let mut effect = FramePostEffect::new(desc.name.clone(), target, shader);
    for variable in variables {
        effect.add_variable(variable);
    }
    Ok(effect)
}

fn lookup_target(
    frame: &FrameShader,
    name: &str,
    user: &str,
) -> Result<SharedRenderTarget, FrameSetupError> {
    frame
        .render_target(name)
        .map(Rc::clone)
        .ok_or_else(|| FrameSetupError::UnknownRenderTarget {
            target: name.to_string(),
            user: user.to_string(),
        })
}

/// Creates an instance of `shader` with the variation for `features` active.
fn instantiate(
    library: &mut ShaderLibrary,
    shader: &str,
    features: &str,
) -> Result<ShaderInstance, FrameSetupError> {
    let mask = library.feature_mask(features)?;
    let mut instance = library.create_instance(shader)?;
    if !instance.shader().variations().is_empty() {
        instance.select_active_variation(mask);
    }
    Ok(instance)
}

fn resolve_variables(
    library: &ShaderLibrary,
    shader: Option<&ShaderInstance>,
    descs: &[VariableDescription],
    user: &str,
) -> Result<Vec<ShaderVariableInstance>, FrameSetupError> {
    descs
        .iter()
        .map(|desc| resolve_variable(library, shader, desc, user))
        .collect()
}

/// Binds a described value to the variable of that name in `shader`, falling
/// back to the library's shared variables.
fn resolve_variable(
    library: &ShaderLibrary,
    shader: Option<&ShaderInstance>,
    desc: &VariableDescription,
    user: &str,
) -> Result<ShaderVariableInstance, FrameSetupError> {
    let variable = shader
        .and_then(|s| s.variable_by_name(&desc.name))
        .or_else(|| library.shared_variable(&desc.name))
        .ok_or_else(|| FrameSetupError::UnknownVariable {
            variable: desc.name.clone(),
            user: user.to_string(),
        })?;

    let value = desc.value.to_shader_value();
    if !value.matches(variable.value_type(), variable.array_size()) {
        return Err(FrameSetupError::ValueMismatch {
            variable: desc.name.clone(),
            expected: variable.value_type(),
            expected_count: variable.array_size(),
            found: value.value_type(),
            found_count: value.element_count(),
        });
    }

    let mut instance = ShaderVariableInstance::new(Rc::clone(variable));
    instance.set_value(value);
    Ok(instance)
}
