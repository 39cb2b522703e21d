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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::shader::FeatureMask;
use crate::renderer::target::RenderTargetId;
use std::fmt;

/// An error related to the registration or instantiation of shaders.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A variation with the same feature mask was already registered on the shader.
    DuplicateVariation {
        /// The name of the shader being extended.
        shader: String,
        /// The conflicting feature mask.
        mask: FeatureMask,
    },
    /// A variable with the same name was already declared on the shader.
    DuplicateVariable {
        /// The name of the shader being extended.
        shader: String,
        /// The conflicting variable name.
        variable: String,
    },
    /// A shader with the same name is already registered in the library.
    DuplicateShader(String),
    /// No shader with the given name is registered in the library.
    UnknownShader(String),
    /// The feature registry is full and cannot assign a bit to a new feature name.
    TooManyFeatures {
        /// The feature name that could not be registered.
        feature: String,
    },
    /// Two shaders declare a shared variable with incompatible types or sizes.
    SharedVariableMismatch {
        /// The name of the shared variable.
        variable: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::DuplicateVariation { shader, mask } => {
                write!(f, "Shader '{shader}' already has a variation for mask {mask}")
            }
            ShaderError::DuplicateVariable { shader, variable } => {
                write!(f, "Shader '{shader}' already declares variable '{variable}'")
            }
            ShaderError::DuplicateShader(name) => {
                write!(f, "A shader named '{name}' is already registered")
            }
            ShaderError::UnknownShader(name) => write!(f, "Unknown shader '{name}'"),
            ShaderError::TooManyFeatures { feature } => {
                write!(
                    f,
                    "Cannot register feature '{feature}': all {} feature bits are in use",
                    FeatureMask::MAX_FEATURES
                )
            }
            ShaderError::SharedVariableMismatch { variable } => {
                write!(
                    f,
                    "Shared variable '{variable}' is declared with conflicting types"
                )
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or destruction of a GPU resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// The handle or ID used to reference a render target is invalid.
    InvalidHandle(RenderTargetId),
    /// A render target was requested with a zero-sized extent.
    InvalidExtent {
        /// The label of the offending render target.
        label: String,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidHandle(id) => {
                write!(f, "Invalid render target handle: {id:?}")
            }
            ResourceError::InvalidExtent { label } => {
                write!(f, "Render target '{label}' has a zero-sized extent")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error reported by the render device while executing a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A pass was started on a render target that has no device resource.
    InvalidRenderTarget(String),
    /// A critical rendering operation failed.
    RenderingFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// The graphics device was lost and needs to be reinitialized.
    DeviceLost,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidRenderTarget(name) => {
                write!(f, "Render target '{name}' is not valid for rendering")
            }
            RenderError::RenderingFailed(msg) => {
                write!(f, "A critical rendering operation failed: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::DeviceLost => write!(
                f,
                "The graphics device was lost and needs to be reinitialized."
            ),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::DuplicateVariation {
            shader: "standard".to_string(),
            mask: FeatureMask::from_bits(0b11),
        };
        assert_eq!(
            format!("{err}"),
            "Shader 'standard' already has a variation for mask 0x00000003"
        );

        let err = ShaderError::UnknownShader("missing".to_string());
        assert_eq!(format!("{err}"), "Unknown shader 'missing'");
    }

    #[test]
    fn resource_error_display() {
        let res_err = ResourceError::InvalidExtent {
            label: "shadow_map".to_string(),
        };
        assert_eq!(
            format!("{res_err}"),
            "Render target 'shadow_map' has a zero-sized extent"
        );
        assert!(res_err.source().is_none());
    }

    #[test]
    fn render_error_display_wrapping_resource_error() {
        let res_err = ResourceError::InvalidHandle(RenderTargetId(7));
        let render_err: RenderError = res_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Invalid render target handle: RenderTargetId(7)"
        );
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_none());
    }
}
