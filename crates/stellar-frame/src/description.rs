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

//! Serializable descriptions of frame shaders.
//!
//! A [`FrameShaderDescription`] is the stable, human-editable form of a
//! [`FrameShader`](crate::FrameShader), stored as RON. Shaders are referenced
//! by name and resolved against a
//! [`ShaderLibrary`](stellar_core::renderer::shader::ShaderLibrary) when the
//! frame shader is built. Feature sets are written as `|`-separated names,
//! e.g. `"Solid|Skinned"`.

use crate::error::FrameSetupError;
use serde::{Deserialize, Serialize};
use stellar_core::math::{Mat4, Vec4};
use stellar_core::renderer::shader::ShaderValue;
use stellar_core::renderer::{BatchType, LightingMode, SortingMode, TextureFormat};

/// The description of a whole frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameShaderDescription {
    /// The frame shader name.
    pub name: String,
    /// The render targets the frame owns.
    #[serde(default)]
    pub render_targets: Vec<RenderTargetDescription>,
    /// Frame-wide values for shared shader variables.
    #[serde(default)]
    pub variables: Vec<VariableDescription>,
    /// The passes, in render order.
    #[serde(default)]
    pub passes: Vec<FramePassDescription>,
    /// The post effects, in render order.
    #[serde(default)]
    pub post_effects: Vec<PostEffectDescription>,
}

/// A render target owned by the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTargetDescription {
    /// The name passes and post effects refer to.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// The color format.
    #[serde(default)]
    pub format: TextureFormat,
    /// Whether a depth/stencil attachment is created.
    #[serde(default)]
    pub depth_stencil: bool,
    /// Marks the target the frame finally presents. At most one target may be main.
    #[serde(default)]
    pub main: bool,
}

/// A named value for a shader variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescription {
    /// The variable name.
    pub name: String,
    /// The value to apply.
    pub value: ValueDescription,
}

/// A shader variable value as written in a description.
///
/// Matrices are column-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueDescription {
    /// A single integer.
    Int(i32),
    /// A single float.
    Float(f32),
    /// A single boolean.
    Bool(bool),
    /// A single vector.
    Vector([f32; 4]),
    /// A single matrix.
    Matrix([f32; 16]),
    /// An integer array.
    IntArray(Vec<i32>),
    /// A float array.
    FloatArray(Vec<f32>),
    /// A boolean array.
    BoolArray(Vec<bool>),
    /// A vector array.
    VectorArray(Vec<[f32; 4]>),
    /// A matrix array.
    MatrixArray(Vec<[f32; 16]>),
}

impl ValueDescription {
    /// Converts the description into a shader value.
    pub fn to_shader_value(&self) -> ShaderValue {
        match self {
            ValueDescription::Int(v) => ShaderValue::Int(*v),
            ValueDescription::Float(v) => ShaderValue::Float(*v),
            ValueDescription::Bool(v) => ShaderValue::Bool(*v),
            ValueDescription::Vector(v) => ShaderValue::Vector(Vec4::from_array(*v)),
            ValueDescription::Matrix(m) => ShaderValue::Matrix(Mat4::from_cols_array(m)),
            ValueDescription::IntArray(v) => ShaderValue::IntArray(v.clone()),
            ValueDescription::FloatArray(v) => ShaderValue::FloatArray(v.clone()),
            ValueDescription::BoolArray(v) => ShaderValue::BoolArray(v.clone()),
            ValueDescription::VectorArray(v) => {
                ShaderValue::VectorArray(v.iter().copied().map(Vec4::from_array).collect())
            }
            ValueDescription::MatrixArray(v) => {
                ShaderValue::MatrixArray(v.iter().map(Mat4::from_cols_array).collect())
            }
        }
    }
}

/// The clear state of a pass. Aspects left at `None` are not cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearDescription {
    /// The clear color, as linear RGBA.
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    /// The clear depth.
    #[serde(default)]
    pub depth: Option<f32>,
    /// The clear stencil value.
    #[serde(default)]
    pub stencil: Option<u32>,
}

/// A render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePassDescription {
    /// The pass name.
    pub name: String,
    /// The name of the render target the pass draws into.
    pub render_target: String,
    /// An optional pass-level shader.
    #[serde(default)]
    pub shader: Option<String>,
    /// Features selecting the variation of the pass-level shader.
    #[serde(default)]
    pub features: String,
    /// The clear state applied when the pass begins.
    #[serde(default)]
    pub clear: ClearDescription,
    /// Pass variables.
    #[serde(default)]
    pub variables: Vec<VariableDescription>,
    /// The batches, in render order.
    #[serde(default)]
    pub batches: Vec<FrameBatchDescription>,
}

/// A batch inside a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameBatchDescription {
    /// The kind of geometry drawn.
    pub batch_type: BatchType,
    /// The shader the batch draws with.
    pub shader: String,
    /// Features combined with each item's own features to select the variation.
    #[serde(default)]
    pub features: String,
    /// The lighting mode requested from the scene.
    #[serde(default)]
    pub lighting: LightingMode,
    /// The draw order.
    #[serde(default)]
    pub sorting: SortingMode,
    /// Batch variables.
    #[serde(default)]
    pub variables: Vec<VariableDescription>,
}

/// A full-screen post effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEffectDescription {
    /// The effect name.
    pub name: String,
    /// The name of the render target the effect draws into.
    pub render_target: String,
    /// The shader the effect draws with.
    pub shader: String,
    /// Features selecting the shader variation.
    #[serde(default)]
    pub features: String,
    /// Effect variables.
    #[serde(default)]
    pub variables: Vec<VariableDescription>,
}

impl FrameShaderDescription {
    /// Parses a description from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, FrameSetupError> {
        Ok(ron::de::from_str(text)?)
    }

    /// Parses a description from RON bytes.
    pub fn from_ron_bytes(data: &[u8]) -> Result<Self, FrameSetupError> {
        Ok(ron::de::from_bytes(data)?)
    }

    /// Writes the description as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, FrameSetupError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty_config)?)
    }
}
