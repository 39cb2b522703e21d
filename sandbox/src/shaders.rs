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

//! The shaders the demo frame refers to.

use stellar_core::renderer::shader::{
    Shader, ShaderLibrary, ShaderValueType, ShaderVariableDesc, ShaderVariation,
};
use stellar_core::renderer::ShaderError;
use stellar_core::TransformKind;

fn transform(kind: TransformKind) -> ShaderVariableDesc {
    ShaderVariableDesc::new(format!("u_{kind:?}"), ShaderValueType::Matrix)
        .with_semantic(kind.semantic())
}

pub fn build_library() -> Result<ShaderLibrary, ShaderError> {
    let mut library = ShaderLibrary::new();
    let solid = library.feature_mask("Solid")?;
    let alpha = library.feature_mask("Alpha")?;
    let skinned = library.feature_mask("Skinned")?;
    let ambient = ShaderVariableDesc::new("GlobalAmbient", ShaderValueType::Vector).shared();

    let mut depth = Shader::new("depth");
    depth.add_variation(ShaderVariation::new("depth", Default::default()))?;
    depth.add_variation(ShaderVariation::new("depth_skinned", skinned))?;
    depth.declare_variable(transform(TransformKind::ModelViewProj))?;
    depth.declare_variable(
        ShaderVariableDesc::new("u_joints", ShaderValueType::Matrix).with_array_size(4),
    )?;
    library.register(depth)?;

    let mut standard = Shader::new("standard");
    standard.add_variation(ShaderVariation::new("solid", solid))?;
    standard.add_variation(ShaderVariation::new("solid_skinned", solid | skinned))?;
    standard.add_variation(ShaderVariation::new("alpha", alpha).with_passes(2))?;
    for kind in [
        TransformKind::Model,
        TransformKind::ViewProj,
        TransformKind::ModelViewProj,
    ] {
        standard.declare_variable(transform(kind))?;
    }
    standard.declare_variable(
        ShaderVariableDesc::new("u_eye", ShaderValueType::Vector).with_semantic("EyePos"),
    )?;
    standard.declare_variable(ambient.clone())?;
    standard.declare_variable(ShaderVariableDesc::new("Tint", ShaderValueType::Vector))?;
    library.register(standard)?;

    let mut compose = Shader::new("compose");
    compose.add_variation(ShaderVariation::new("compose", Default::default()))?;
    compose.declare_variable(ambient)?;
    compose.declare_variable(ShaderVariableDesc::new("Exposure", ShaderValueType::Float))?;
    library.register(compose)?;

    Ok(library)
}
